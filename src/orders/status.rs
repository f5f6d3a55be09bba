//! Allowed order status transitions.

use crate::model::OrderStatus;

impl OrderStatus {
    /// Whether no further transitions leave this status.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// The transition table:
    ///
    /// | From    | To                 |
    /// |---------|--------------------|
    /// | Pending | Shipped, Cancelled |
    /// | Shipped | Delivered          |
    ///
    /// Re-applying the current status is always allowed and idempotent (the
    /// inventory latch makes a repeated cancellation a status-only write).
    /// Everything else is rejected.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        if self == next {
            return true;
        }
        if self.is_terminal() {
            return false;
        }
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Shipped)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::Shipped, OrderStatus::Delivered)
        )
    }
}
