use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Per-customer loyalty coupon, one-to-one with the customer.
///
/// Created lazily on the customer's first delivered order and never deleted.
/// `discount_percentage` accumulates one point per delivered order (capped at
/// 100) and is depleted on redemption (floored at 0). `order_count` tracks
/// how many orders the customer has completed or redeemed against.
#[derive(Debug, Clone, PartialEq)]
pub struct Coupon {
    pub code: String,
    pub customer_id: String,
    pub discount_percentage: Decimal,
    pub order_count: u32,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_to: Option<DateTime<Utc>>,
}

impl Coupon {
    pub fn new(code: impl Into<String>, customer_id: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            customer_id: customer_id.into(),
            discount_percentage: Decimal::ZERO,
            order_count: 0,
            valid_from: None,
            valid_to: None,
        }
    }
}
