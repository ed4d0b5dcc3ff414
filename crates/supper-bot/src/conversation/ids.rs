use chrono::Local;
use std::sync::atomic::{AtomicU32, Ordering};

/// Order ids: local time to the second followed by a four-digit sequence.
#[derive(Debug, Default)]
pub struct OrderIdGenerator {
    sequence: AtomicU32,
}

impl OrderIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> String {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) % 10_000;
        format!("{}{sequence:04}", Local::now().format("%Y%m%d%H%M%S"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_and_numeric() {
        let ids = OrderIdGenerator::new();
        let first = ids.next();
        let second = ids.next();

        assert_ne!(first, second);
        assert_eq!(first.len(), 18);
        assert!(first.chars().all(|c| c.is_ascii_digit()));
        assert!(first.ends_with("0000"));
        assert!(second.ends_with("0001"));
    }
}
