use serde::{Deserialize, Serialize};

/// Amount restored by a reset when the caller does not name one.
pub const DEFAULT_RESET_TICKETS: u32 = 10;

/// Draw credits. `available` never goes negative and `total_spent` only grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketLedger {
    available: u32,
    total_spent: u64,
}

/// Read-only view handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketBalance {
    pub available: u32,
    pub total_spent: u64,
}

impl TicketLedger {
    pub fn new(available: u32) -> Self {
        Self { available, total_spent: 0 }
    }

    /// Rebuild a ledger from persisted values.
    pub fn from_parts(available: u32, total_spent: u64) -> Self {
        Self { available, total_spent }
    }

    pub fn available(&self) -> u32 {
        self.available
    }

    pub fn total_spent(&self) -> u64 {
        self.total_spent
    }

    pub fn balance(&self) -> TicketBalance {
        TicketBalance { available: self.available, total_spent: self.total_spent }
    }

    pub fn add(&mut self, amount: u32) {
        self.available = self.available.saturating_add(amount);
    }

    /// Spend one ticket. Leaves the ledger untouched and returns false when empty.
    pub fn try_spend(&mut self) -> bool {
        if self.available == 0 {
            return false;
        }
        self.available -= 1;
        self.total_spent += 1;
        true
    }

    /// Set `available` to `amount`; `total_spent` is kept.
    pub fn reset(&mut self, amount: u32) {
        self.available = amount;
    }

    /// Assign `available`, clamping negatives to zero.
    pub fn set(&mut self, amount: i64) {
        self.available = amount.clamp(0, u32::MAX as i64) as u32;
    }
}

impl Default for TicketLedger {
    fn default() -> Self {
        Self::new(DEFAULT_RESET_TICKETS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spend_debits_one_and_counts() {
        let mut l = TicketLedger::new(3);
        assert!(l.try_spend());
        assert_eq!((l.available(), l.total_spent()), (2, 1));
    }

    #[test]
    fn spend_on_empty_is_noop() {
        let mut l = TicketLedger::from_parts(0, 7);
        assert!(!l.try_spend());
        assert_eq!(l.balance(), TicketBalance { available: 0, total_spent: 7 });
    }

    #[test]
    fn spend_counts_past_u32_range() {
        let mut l = TicketLedger::from_parts(1, u32::MAX as u64);
        assert!(l.try_spend());
        assert_eq!((l.available(), l.total_spent()), (0, u32::MAX as u64 + 1));
    }

    #[test]
    fn reset_keeps_total_spent() {
        let mut l = TicketLedger::new(2);
        l.try_spend();
        l.reset(DEFAULT_RESET_TICKETS);
        assert_eq!((l.available(), l.total_spent()), (10, 1));
    }

    #[test]
    fn set_clamps_negative() {
        let mut l = TicketLedger::new(5);
        l.set(-4);
        assert_eq!(l.available(), 0);
        l.set(12);
        assert_eq!(l.available(), 12);
    }

    #[test]
    fn add_saturates() {
        let mut l = TicketLedger::new(u32::MAX - 1);
        l.add(5);
        assert_eq!(l.available(), u32::MAX);
    }
}
