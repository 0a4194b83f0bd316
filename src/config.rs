use rust_decimal::Decimal;

/// How a coupon qualifies for redemption at order placement.
///
/// The marketplace has historically run both rules; which one is active is an
/// integration choice, so it lives in configuration rather than in code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouponPolicy {
    /// The customer must have accumulated at least `threshold` orders.
    MinimumOrders { threshold: u32 },
    /// The coupon carries a `valid_from`/`valid_to` window and `now` must
    /// fall inside it.
    ValidityWindow,
}

/// Process-wide configuration, built once at startup and injected into the
/// order service. Read-only after construction.
#[derive(Debug, Clone)]
pub struct SystemConfig {
    /// Percentage of the marked-up subtotal paid to the delivering driver.
    /// Snapshotted into each order at creation time.
    pub driver_commission_percentage: Decimal,
    /// Active coupon eligibility rule.
    pub coupon_policy: CouponPolicy,
    /// Rejected-order count at which a driver receives a warning.
    pub rejection_warning_threshold: u32,
    /// Mailbox size for every actor channel.
    pub mailbox_size: usize,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            driver_commission_percentage: Decimal::from(5),
            coupon_policy: CouponPolicy::MinimumOrders { threshold: 10 },
            rejection_warning_threshold: 10,
            mailbox_size: 100,
        }
    }
}
