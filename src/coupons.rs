//! Coupon ledger: per-customer loyalty discounts, owned by the order service
//! so that coupon mutations commit in the same handler invocation as the
//! order state they belong to.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::info;

use crate::config::CouponPolicy;
use crate::domain::Coupon;
use crate::error::OrderError;

#[derive(Debug, Default)]
pub struct CouponLedger {
    /// Keyed by customer id; coupons are one-to-one with customers.
    coupons: HashMap<String, Coupon>,
}

impl CouponLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, customer_id: &str) -> Option<&Coupon> {
        self.coupons.get(customer_id)
    }

    /// Seed or replace a coupon. Used by wiring code and tests; the normal
    /// creation path is lazy, via [`CouponLedger::reward_delivery`].
    pub fn put(&mut self, coupon: Coupon) {
        self.coupons.insert(coupon.customer_id.clone(), coupon);
    }

    /// Check that `code` can be redeemed by `customer_id` under `policy`.
    ///
    /// The coupon must exist, belong to the requesting customer, and satisfy
    /// the configured eligibility rule. All failures collapse into
    /// [`OrderError::CouponIneligible`]; callers never learn whether a code
    /// exists for someone else.
    pub fn check_eligible(
        &self,
        customer_id: &str,
        code: &str,
        policy: CouponPolicy,
        now: DateTime<Utc>,
    ) -> Result<&Coupon, OrderError> {
        let coupon = self
            .coupons
            .get(customer_id)
            .filter(|c| c.code == code)
            .ok_or_else(|| {
                OrderError::CouponIneligible(format!(
                    "no coupon {} for customer {}",
                    code, customer_id
                ))
            })?;

        match policy {
            CouponPolicy::MinimumOrders { threshold } => {
                if coupon.order_count < threshold {
                    return Err(OrderError::CouponIneligible(format!(
                        "requires {} orders, customer has {}",
                        threshold, coupon.order_count
                    )));
                }
            }
            CouponPolicy::ValidityWindow => {
                let valid = match (coupon.valid_from, coupon.valid_to) {
                    (Some(from), Some(to)) => from <= now && now <= to,
                    _ => false,
                };
                if !valid {
                    return Err(OrderError::CouponIneligible(
                        "outside validity window".to_string(),
                    ));
                }
            }
        }

        Ok(coupon)
    }

    /// Deplete the coupon after a successful redemption: subtract the
    /// consumed percentage-points (floored at 0) and count the redemption.
    /// Must only be called once the order is certain to be persisted.
    pub fn consume(&mut self, customer_id: &str, consumed_points: Decimal) -> Option<&Coupon> {
        let coupon = self.coupons.get_mut(customer_id)?;
        coupon.discount_percentage =
            (coupon.discount_percentage - consumed_points).max(Decimal::ZERO);
        coupon.order_count += 1;
        info!(
            customer_id = %customer_id,
            coupon_code = %coupon.code,
            discount_percentage = %coupon.discount_percentage,
            order_count = coupon.order_count,
            "Coupon redeemed"
        );
        Some(&*coupon)
    }

    /// Credit one loyalty point for a delivered order, creating the coupon
    /// lazily on the customer's first delivery. Capped at 100 points.
    pub fn reward_delivery(&mut self, customer_id: &str) -> &Coupon {
        let coupon = self
            .coupons
            .entry(customer_id.to_string())
            .or_insert_with(|| {
                Coupon::new(format!("LOYAL-{}", customer_id.to_uppercase()), customer_id)
            });
        coupon.discount_percentage =
            (coupon.discount_percentage + Decimal::ONE).min(Decimal::ONE_HUNDRED);
        coupon.order_count += 1;
        info!(
            customer_id = %customer_id,
            coupon_code = %coupon.code,
            discount_percentage = %coupon.discount_percentage,
            order_count = coupon.order_count,
            "Loyalty point credited"
        );
        &*coupon
    }
}
