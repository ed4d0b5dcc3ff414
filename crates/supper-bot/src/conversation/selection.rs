//! Cursor-driven walk through the menu groups for one cart item.

use crate::model::{MenuGroup, MenuOption, PRICED_GROUP};
use std::collections::BTreeMap;

/// What the flow should do after a choice.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionStep {
    /// Prompt the group at this index.
    Next(usize),
    /// Every group has a choice; `flavor` and `sauce` are set.
    Complete,
    /// The pressed button does not belong to the current prompt.
    Stale(&'static str),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuSelection {
    cursor: usize,
    choices: BTreeMap<usize, MenuOption>,
    main_option_price: Option<f64>,
    flavor: String,
    sauce: String,
}

impl MenuSelection {
    /// Back to group 0 with nothing chosen.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn choices(&self) -> &BTreeMap<usize, MenuOption> {
        &self.choices
    }

    pub fn main_option_price(&self) -> Option<f64> {
        self.main_option_price
    }

    pub fn flavor(&self) -> &str {
        &self.flavor
    }

    pub fn sauce(&self) -> &str {
        &self.sauce
    }

    /// Records `option` of `group` against the snapshot the prompts were built from.
    pub fn choose(&mut self, groups: &[MenuGroup], group: usize, option: usize) -> SelectionStep {
        if group != self.cursor || group >= groups.len() {
            return SelectionStep::Stale("Option expired");
        }
        let Some(chosen) = groups[group].options.get(option) else {
            return SelectionStep::Stale("Option unavailable");
        };

        if group == PRICED_GROUP {
            self.main_option_price = Some(chosen.price());
            self.flavor = chosen.name().to_string();
        }
        self.choices.insert(group, chosen.clone());
        self.cursor += 1;

        if self.cursor >= groups.len() {
            self.fold(groups);
            SelectionStep::Complete
        } else {
            SelectionStep::Next(self.cursor)
        }
    }

    /// `flavor` is the priced group's choice; `sauce` joins the others as
    /// `"Title: value"` with `"; "`.
    fn fold(&mut self, groups: &[MenuGroup]) {
        if let Some(main) = self.choices.get(&PRICED_GROUP) {
            self.flavor = main.name().to_string();
        }
        self.sauce = self
            .choices
            .iter()
            .filter(|(index, _)| **index != PRICED_GROUP)
            .filter_map(|(index, option)| {
                groups
                    .get(*index)
                    .map(|group| format!("{}: {}", group.title, option.name()))
            })
            .collect::<Vec<_>>()
            .join("; ");
    }
}
