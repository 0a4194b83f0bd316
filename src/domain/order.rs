use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::error::OrderError;

/// Lifecycle of an order.
///
/// ```text
/// Processing -> Ready -> OnTheWay -> Verified -> Delivered
///                             \---------------> Delivered
/// any non-terminal ----------------------------> Rejected
/// ```
///
/// `Verified` is a driver-side sub-state for PIN-confirmed handoff between
/// `OnTheWay` and `Delivered`. `Delivered` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Processing,
    Ready,
    OnTheWay,
    Delivered,
    Rejected,
    Verified,
}

impl OrderStatus {
    /// Wire/storage code, kept stable for external consumers.
    pub fn code(self) -> u8 {
        match self {
            OrderStatus::Processing => 1,
            OrderStatus::Ready => 2,
            OrderStatus::OnTheWay => 3,
            OrderStatus::Delivered => 4,
            OrderStatus::Rejected => 5,
            OrderStatus::Verified => 6,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Rejected)
    }

    /// Whether `self -> to` is a legal transition. Pure rule table; guards
    /// that need surrounding state (driver availability, PIN match) live in
    /// the order service.
    pub fn can_transition(self, to: OrderStatus) -> bool {
        use OrderStatus::*;
        if to == Rejected {
            return !self.is_terminal();
        }
        matches!(
            (self, to),
            (Processing, Ready)
                | (Ready, OnTheWay)
                | (OnTheWay, Verified)
                | (OnTheWay, Delivered)
                | (Verified, Delivered)
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OrderStatus::Processing => "processing",
            OrderStatus::Ready => "ready",
            OrderStatus::OnTheWay => "on-the-way",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Rejected => "rejected",
            OrderStatus::Verified => "verified",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Cash,
    Card,
    OnlineWallet,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::OnlineWallet => "online-wallet",
        };
        write!(f, "{}", name)
    }
}

/// A single order line. Immutable after creation: `sub_total` snapshots the
/// product's effective price at placement time and is never recomputed when
/// the store later changes prices.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub product_id: String,
    pub quantity: u32,
    pub sub_total: Decimal,
}

/// An order together with the line items it owns. Lines are created with the
/// order and only go away with it.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: String,
    pub customer_id: String,
    pub store_id: String,
    pub driver_id: Option<String>,
    pub coupon_code: Option<String>,
    pub delivery_address: String,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    /// Pre-markup subtotal: sum of base prices times quantities.
    pub original_price: Decimal,
    /// Marked-up subtotal: sum of line `sub_total`s. Basis for discount and
    /// commission.
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub discount_amount: Decimal,
    pub driver_commission: Decimal,
    /// Commission percentage captured at creation; later configuration
    /// changes do not touch existing orders.
    pub driver_commission_percentage: Decimal,
    pub total: Decimal,
    /// Six decimal digits, assigned exactly once at creation. Not globally
    /// unique; collisions across live orders are an accepted risk.
    pub secret_pin: String,
    pub rejection_reason: Option<String>,
    pub lines: Vec<OrderLine>,
    pub created_at: DateTime<Utc>,
    pub picked_at: Option<DateTime<Utc>>,
}

impl Order {
    /// The money invariant that must hold after every save:
    /// `total = subtotal - discount_amount + delivery_fee`.
    pub fn totals_consistent(&self) -> bool {
        self.total == self.subtotal - self.discount_amount + self.delivery_fee
    }
}

/// A requested line item, before product resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLineInput {
    pub product_id: String,
    pub quantity: u32,
}

/// Everything a customer submits to place an order. The delivery fee comes
/// from the caller (an external distance service computes it), never from
/// this core.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub customer_id: String,
    pub store_id: String,
    pub lines: Vec<OrderLineInput>,
    pub address: Option<String>,
    pub use_current_location: bool,
    pub current_location: Option<String>,
    pub payment_method: PaymentMethod,
    pub coupon_code: Option<String>,
    pub delivery_fee: Decimal,
}

impl OrderDraft {
    /// An explicit address wins; otherwise the customer may opt in to
    /// delivery at their shared current location.
    pub fn resolve_address(&self) -> Result<String, OrderError> {
        if let Some(address) = &self.address {
            if !address.trim().is_empty() {
                return Ok(address.clone());
            }
        }
        if self.use_current_location {
            if let Some(location) = &self.current_location {
                if !location.trim().is_empty() {
                    return Ok(location.clone());
                }
            }
        }
        Err(OrderError::MissingAddress)
    }
}

/// What the customer gets back from a successful placement. The PIN is shown
/// once, to be quoted to the driver at handoff.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderReceipt {
    pub order_id: String,
    pub secret_pin: String,
    pub total: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn happy_path_transitions_are_legal() {
        use OrderStatus::*;
        assert!(Processing.can_transition(Ready));
        assert!(Ready.can_transition(OnTheWay));
        assert!(OnTheWay.can_transition(Verified));
        assert!(OnTheWay.can_transition(Delivered));
        assert!(Verified.can_transition(Delivered));
    }

    #[test]
    fn rejection_is_reachable_from_any_non_terminal_state() {
        use OrderStatus::*;
        for from in [Processing, Ready, OnTheWay, Verified] {
            assert!(from.can_transition(Rejected), "{from} should allow rejection");
        }
        assert!(!Delivered.can_transition(Rejected));
        assert!(!Rejected.can_transition(Rejected));
    }

    #[test]
    fn terminal_states_allow_nothing() {
        use OrderStatus::*;
        for to in [Processing, Ready, OnTheWay, Delivered, Rejected, Verified] {
            assert!(!Delivered.can_transition(to));
            assert!(!Rejected.can_transition(to));
        }
    }

    #[test]
    fn skipping_states_is_illegal() {
        use OrderStatus::*;
        assert!(!Processing.can_transition(OnTheWay));
        assert!(!Processing.can_transition(Delivered));
        assert!(!Ready.can_transition(Delivered));
        assert!(!Ready.can_transition(Verified));
        assert!(!Verified.can_transition(OnTheWay));
    }

    #[test]
    fn status_codes_are_stable() {
        use OrderStatus::*;
        let codes: Vec<u8> = [Processing, Ready, OnTheWay, Delivered, Rejected, Verified]
            .iter()
            .map(|s| s.code())
            .collect();
        assert_eq!(codes, vec![1, 2, 3, 4, 5, 6]);
    }

    fn draft() -> OrderDraft {
        OrderDraft {
            customer_id: "customer_1".to_string(),
            store_id: "store_1".to_string(),
            lines: vec![OrderLineInput {
                product_id: "product_1".to_string(),
                quantity: 1,
            }],
            address: None,
            use_current_location: false,
            current_location: None,
            payment_method: PaymentMethod::Cash,
            coupon_code: None,
            delivery_fee: dec!(0),
        }
    }

    #[test]
    fn address_resolution_prefers_explicit_address() {
        let mut d = draft();
        d.address = Some("Rua Augusta 100".to_string());
        d.use_current_location = true;
        d.current_location = Some("-23.55,-46.63".to_string());
        assert_eq!(d.resolve_address().unwrap(), "Rua Augusta 100");
    }

    #[test]
    fn address_resolution_falls_back_to_shared_location() {
        let mut d = draft();
        d.use_current_location = true;
        d.current_location = Some("-23.55,-46.63".to_string());
        assert_eq!(d.resolve_address().unwrap(), "-23.55,-46.63");
    }

    #[test]
    fn address_resolution_rejects_missing_address() {
        assert_eq!(draft().resolve_address(), Err(OrderError::MissingAddress));

        // Opting in to location sharing without actually sharing one is
        // still a missing address.
        let mut d = draft();
        d.use_current_location = true;
        assert_eq!(d.resolve_address(), Err(OrderError::MissingAddress));
    }
}
