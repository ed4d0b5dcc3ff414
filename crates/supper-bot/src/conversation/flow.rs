//! Stage transitions. A [`Flow`] handles exactly one inbound event against a
//! conversation's context and collects what should be shown to the customer.

use super::context::{ConversationContext, Destination, PendingPickup};
use super::event::{Callback, Command, Control, Inbound, Update};
use super::render;
use super::selection::SelectionStep;
use super::stage::Stage;
use super::{ConversationError, Services};
use crate::model::{validate_name, validate_phone, CartItem, CustomerProfile, PRICED_GROUP};
use crate::transport::Outbound;
use chrono::{Local, NaiveDateTime};
use tracing::{debug, info, warn};

pub(crate) fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub(crate) struct Flow<'a> {
    pub(crate) ctx: &'a mut ConversationContext,
    pub(crate) services: &'a Services,
    pub(crate) update: &'a Update,
    pub(crate) out: Vec<Outbound>,
}

impl<'a> Flow<'a> {
    pub(crate) fn new(ctx: &'a mut ConversationContext, services: &'a Services, update: &'a Update) -> Self {
        Self {
            ctx,
            services,
            update,
            out: Vec::new(),
        }
    }

    pub(crate) async fn run(mut self) -> Result<Vec<Outbound>, ConversationError> {
        self.handle().await?;
        Ok(self.out)
    }

    pub(crate) fn say(&mut self, outbound: Outbound) {
        self.out.push(outbound);
    }

    async fn handle(&mut self) -> Result<(), ConversationError> {
        let update = self.update;
        match &update.input {
            Inbound::Command(command) => self.on_command(command).await,
            Inbound::Text(text) => self.on_text(text).await,
            Inbound::Callback(data) => match Callback::parse(data) {
                Some(callback) => self.on_callback(callback).await,
                None => {
                    debug!(%data, "Unrecognised button");
                    self.say(render::stale_button("Invalid selection"));
                    Ok(())
                }
            },
            Inbound::Photo {
                bytes,
                content_type,
            } => {
                if self.ctx.stage == Stage::Payment {
                    self.receive_receipt(bytes, content_type).await;
                } else {
                    debug!(stage = %self.ctx.stage, "Photo outside payment ignored");
                }
                Ok(())
            }
        }
    }

    async fn on_command(&mut self, command: &Command) -> Result<(), ConversationError> {
        match command {
            Command::Order => self.start_delivery_order().await,
            Command::Pickup => self.start_pickup_order().await,
            Command::Cancel => {
                self.cancel_by_text();
                Ok(())
            }
            Command::Start => {
                self.greet().await;
                Ok(())
            }
            Command::Help => {
                self.say(render::help());
                Ok(())
            }
            Command::Unknown(name) => {
                debug!(%name, "Unknown command");
                Ok(())
            }
        }
    }

    async fn greet(&mut self) {
        self.ctx.clear();
        let branding = self.services.branding.load(false).await;
        self.out.extend(render::welcome(&branding));
    }

    async fn on_text(&mut self, text: &str) -> Result<(), ConversationError> {
        if let Some(control) = Control::parse(text) {
            // keyboard phrases other than cancel/restart/order are plain input mid-flow
            if control.overrides_flow() || !self.ctx.stage.accepts_text() {
                return self.on_control(control).await;
            }
        }

        match self.ctx.stage {
            Stage::RegisterName => {
                self.register_name(text);
                Ok(())
            }
            Stage::RegisterPhone => self.register_phone(text).await,
            Stage::Payment => {
                self.say(render::photo_required());
                Ok(())
            }
            stage => {
                debug!(%stage, "Free text ignored");
                Ok(())
            }
        }
    }

    async fn on_control(&mut self, control: Control) -> Result<(), ConversationError> {
        match control {
            Control::CancelOrder => self.cancel_by_text(),
            Control::RestartOrder => self.restart(),
            Control::OrderNow => return self.start_delivery_order().await,
            Control::StartOver => self.greet().await,
            Control::Help => self.say(render::help()),
            Control::ShowMenu => {
                let groups = self.services.menu.load(true).await;
                self.say(render::menu_listing(&groups));
            }
            Control::ShowDeliveries => {
                let sessions = self.services.deliveries.active_sessions(now()).await?;
                self.say(render::delivery_schedule(&sessions));
            }
        }
        Ok(())
    }

    async fn on_callback(&mut self, callback: Callback) -> Result<(), ConversationError> {
        if callback == Callback::Cancel && self.ctx.stage.is_active() {
            self.cancel_by_button();
            return Ok(());
        }

        match (self.ctx.stage, callback) {
            (Stage::SelectDelivery, Callback::Delivery(id)) => self.select_delivery(&id).await,
            (Stage::SelectStore, Callback::Store(id)) => self.select_store(&id).await,
            (Stage::SelectPickupSlot, Callback::Slot(index)) => self.select_slot(index).await,
            (Stage::MenuSelection, Callback::Menu { group, option }) => {
                self.choose_option(group, option).await
            }
            (Stage::Quantity, Callback::Quantity(quantity)) => self.add_to_cart(quantity).await,
            (Stage::AddMoreItems, Callback::AddMore) => {
                self.ctx.selection.reset();
                self.prompt_group(0);
                Ok(())
            }
            (Stage::AddMoreItems, Callback::ProceedPayment) => {
                self.ctx.stage = Stage::Confirm;
                let summary = render::order_summary(self.ctx.destination.as_ref(), &self.ctx.cart);
                self.say(summary);
                Ok(())
            }
            (Stage::Confirm, Callback::Confirm) => self.confirm().await,
            (Stage::PaymentMethod, Callback::PayNow) => {
                self.say(render::pay_now_chosen());
                self.request_payment().await;
                Ok(())
            }
            (Stage::PaymentMethod, Callback::PayAtCounter) => {
                self.settle_at_counter().await;
                Ok(())
            }
            (stage, callback) => {
                debug!(%stage, ?callback, "Button does not belong to the current stage");
                self.say(render::stale_button("Option expired"));
                Ok(())
            }
        }
    }

    // --- entry ---

    async fn start_delivery_order(&mut self) -> Result<(), ConversationError> {
        self.ctx.clear();
        let sessions = self.services.deliveries.active_sessions(now()).await?;
        if sessions.is_empty() {
            warn!(user_id = self.update.user_id, "No active deliveries for new order");
            self.say(render::no_deliveries());
            return Ok(());
        }

        self.ctx.menu = self.services.menu.load(true).await;
        self.ctx.stage = Stage::SelectDelivery;
        info!(user_id = self.update.user_id, sessions = sessions.len(), "Delivery order started");
        self.say(render::delivery_prompt(&sessions));
        self.say(render::order_controls_hint());
        Ok(())
    }

    async fn start_pickup_order(&mut self) -> Result<(), ConversationError> {
        self.ctx.clear();
        let stores = self.services.pickups.active_stores().await?;
        if stores.is_empty() {
            warn!(user_id = self.update.user_id, "No pickup stores for new order");
            self.say(render::no_stores());
            return Ok(());
        }

        self.ctx.menu = self.services.menu.load(true).await;
        self.ctx.stage = Stage::SelectStore;
        info!(user_id = self.update.user_id, stores = stores.len(), "Pickup order started");
        self.say(render::store_prompt(&stores));
        self.say(render::order_controls_hint());
        Ok(())
    }

    async fn select_delivery(&mut self, id: &str) -> Result<(), ConversationError> {
        let session = self
            .services
            .deliveries
            .find(id)
            .await?
            .filter(|session| session.is_accepting(now()));

        let Some(session) = session else {
            warn!(delivery_id = id, "Selected delivery is gone");
            self.ctx.clear();
            self.say(render::delivery_not_found());
            return Ok(());
        };

        info!(delivery_id = %session.id, location = %session.location, "Delivery selected");
        self.ctx.destination = Some(Destination::Delivery(session));
        self.identify_customer().await;
        Ok(())
    }

    async fn select_store(&mut self, id: &str) -> Result<(), ConversationError> {
        let store = self
            .services
            .pickups
            .find(id)
            .await?
            .filter(|store| store.active);

        let Some(store) = store else {
            warn!(store_id = id, "Selected store is gone");
            self.ctx.clear();
            self.say(render::store_not_found());
            return Ok(());
        };

        let slots = store.upcoming_slots(now().date());
        if slots.is_empty() {
            self.ctx.clear();
            self.say(render::no_slots(&store));
            return Ok(());
        }

        self.ctx.stage = Stage::SelectPickupSlot;
        self.say(render::slot_prompt(&store, &slots));
        self.ctx.pending_pickup = Some(PendingPickup { store, slots });
        Ok(())
    }

    async fn select_slot(&mut self, index: usize) -> Result<(), ConversationError> {
        let chosen = self.ctx.pending_pickup.as_ref().and_then(|pending| {
            pending
                .slots
                .get(index)
                .map(|slot| (pending.store.clone(), slot.clone()))
        });
        let Some((store, slot)) = chosen else {
            self.say(render::stale_button("Option unavailable"));
            return Ok(());
        };

        info!(store_id = %store.id, slot = %slot.label(), "Pickup slot selected");
        self.ctx.pending_pickup = None;
        self.ctx.destination = Some(Destination::Pickup { store, slot });
        self.identify_customer().await;
        Ok(())
    }

    /// Known customers go straight to the menu; new ones register first.
    async fn identify_customer(&mut self) {
        let user_id = self.update.user_id;
        match self.services.users.find(user_id).await {
            Ok(Some(mut profile)) => {
                debug!(user_id, "Returning customer");
                if profile.handle.is_empty() {
                    profile.handle = self.update.handle.clone();
                }
                self.ctx.customer = Some(profile);
                self.start_menu();
            }
            Ok(None) => self.begin_registration(),
            Err(e) => {
                warn!(user_id, error = %e, "Profile lookup failed, registering afresh");
                self.begin_registration();
            }
        }
    }

    // --- registration ---

    fn begin_registration(&mut self) {
        self.ctx.stage = Stage::RegisterName;
        self.say(render::name_prompt());
    }

    fn register_name(&mut self, text: &str) {
        match validate_name(text) {
            Some(name) => {
                self.ctx.pending_name = Some(name);
                self.ctx.stage = Stage::RegisterPhone;
                self.say(render::phone_prompt());
            }
            None => self.say(render::invalid_name()),
        }
    }

    async fn register_phone(&mut self, text: &str) -> Result<(), ConversationError> {
        let Some(phone) = validate_phone(text) else {
            self.say(render::invalid_phone());
            return Ok(());
        };

        let handle = if self.update.handle.is_empty() {
            "N/A".to_string()
        } else {
            self.update.handle.clone()
        };
        let profile = CustomerProfile {
            user_id: self.update.user_id,
            name: self.ctx.pending_name.take().unwrap_or_else(|| "Unknown".to_string()),
            handle,
            phone,
        };

        if let Err(e) = self.services.users.save(profile.clone()).await {
            warn!(user_id = profile.user_id, error = %e, "Profile not saved, continuing");
        } else {
            info!(user_id = profile.user_id, "Customer registered");
        }

        self.ctx.customer = Some(profile);
        self.say(render::registration_complete());
        self.start_menu();
        Ok(())
    }

    // --- menu and cart ---

    fn start_menu(&mut self) {
        self.ctx.selection.reset();
        self.prompt_group(0);
    }

    fn prompt_group(&mut self, index: usize) {
        if index >= self.ctx.menu.len() {
            self.prompt_quantity();
            return;
        }
        self.ctx.stage = Stage::MenuSelection;
        let prompt = render::group_prompt(&self.ctx.menu, index);
        self.say(prompt);
    }

    fn prompt_quantity(&mut self) {
        self.ctx.stage = Stage::Quantity;
        self.say(render::quantity_prompt());
    }

    async fn choose_option(&mut self, group: usize, option: usize) -> Result<(), ConversationError> {
        if self.ctx.menu.is_empty() {
            self.ctx.menu = self.services.menu.load(true).await;
        }
        match self.ctx.selection.choose(&self.ctx.menu, group, option) {
            SelectionStep::Next(index) => self.prompt_group(index),
            SelectionStep::Complete => {
                debug!(
                    flavor = self.ctx.selection.flavor(),
                    sauce = self.ctx.selection.sauce(),
                    "Item configured"
                );
                self.prompt_quantity();
            }
            SelectionStep::Stale(alert) => self.say(render::stale_button(alert)),
        }
        Ok(())
    }

    async fn add_to_cart(&mut self, quantity: u32) -> Result<(), ConversationError> {
        if !(1..=render::MAX_QUANTITY).contains(&quantity) {
            self.say(render::stale_button("Option unavailable"));
            return Ok(());
        }

        let unit_price = self.unit_price().await;
        let item = CartItem::new(
            self.ctx.selection.flavor(),
            self.ctx.selection.sauce(),
            quantity,
            unit_price,
        );
        info!(
            flavor = %item.flavor,
            quantity,
            unit_price,
            "Item added to cart"
        );
        self.ctx.cart.push(item);
        self.ctx.stage = Stage::AddMoreItems;
        let prompt = render::cart_prompt(&self.ctx.cart);
        self.say(prompt);
        Ok(())
    }

    /// Price of the chosen main option; otherwise looked up in a fresh menu;
    /// otherwise the configured fallback.
    async fn unit_price(&self) -> f64 {
        if let Some(price) = self.ctx.selection.main_option_price() {
            return price;
        }
        let flavor = self.ctx.selection.flavor();
        let fresh = self.services.menu.load(true).await;
        fresh
            .get(PRICED_GROUP)
            .and_then(|group| group.options.iter().find(|option| option.name() == flavor))
            .map(|option| option.price())
            .unwrap_or(self.services.config.menu.fallback_unit_price)
    }

    async fn confirm(&mut self) -> Result<(), ConversationError> {
        let order_id = self.services.order_ids.next();
        info!(%order_id, total = self.ctx.cart.total_price(), "Order confirmed");
        self.ctx.order_id = Some(order_id.clone());

        let pickup = self
            .ctx
            .destination
            .as_ref()
            .is_some_and(Destination::is_pickup);
        if pickup {
            self.ctx.stage = Stage::PaymentMethod;
            self.say(render::payment_method_prompt(&order_id));
        } else {
            self.say(render::order_confirmed(&order_id));
            self.request_payment().await;
        }
        Ok(())
    }

    // --- exits ---

    /// Cancel via the text keyboard or `/cancel`.
    fn cancel_by_text(&mut self) {
        if self.ctx.order_id.is_some() {
            info!(order_id = ?self.ctx.order_id, "Payment cancelled");
            self.say(render::payment_cancelled());
        } else {
            info!(stage = %self.ctx.stage, "Order cancelled");
            self.say(render::order_cancelled());
        }
        self.ctx.clear();
    }

    /// Cancel via an inline button.
    fn cancel_by_button(&mut self) {
        if self.ctx.order_id.is_some() {
            self.cancel_by_text();
            return;
        }
        info!(stage = %self.ctx.stage, "Order cancelled");
        self.say(render::order_cancelled_by_button());
        self.ctx.clear();
    }

    fn restart(&mut self) {
        info!(stage = %self.ctx.stage, "Order restarted");
        self.ctx.clear();
        self.say(render::order_restarted());
    }
}
