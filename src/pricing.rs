//! Pricing calculator: pure money arithmetic over resolved product
//! snapshots. All amounts are fixed-point [`Decimal`] rounded to 2 places;
//! nothing here touches actor state, so the order service can quote first
//! and only then mutate.

use rust_decimal::Decimal;

use crate::domain::Product;
use crate::error::OrderError;

/// One priced line. `sub_total` is the marked-up unit price times quantity,
/// snapshotted here and copied verbatim into the stored order line.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub product_id: String,
    pub quantity: u32,
    pub sub_total: Decimal,
}

/// Full breakdown for a candidate order.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    /// Sum of base prices times quantities, before markup.
    pub original_price: Decimal,
    /// Sum of line sub-totals (markup applied).
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub delivery_fee: Decimal,
    pub driver_commission: Decimal,
    pub total: Decimal,
    /// Percentage-points the coupon loses on redemption:
    /// `discount_amount / subtotal * 100`. This is the depletion rule as
    /// observed in production, applied literally.
    pub consumed_points: Decimal,
    pub lines: Vec<PricedLine>,
}

/// Price an order: `total = subtotal - discount + delivery_fee`, with the
/// driver commission computed on the marked-up subtotal.
///
/// `coupon_discount_percentage` must already have passed eligibility checks;
/// `None` means no coupon. The delivery fee is caller-supplied (external
/// distance service) and only validated for sign here.
pub fn quote(
    lines: &[(Product, u32)],
    delivery_fee: Decimal,
    coupon_discount_percentage: Option<Decimal>,
    commission_percentage: Decimal,
) -> Result<Quote, OrderError> {
    if lines.is_empty() {
        return Err(OrderError::EmptyOrder);
    }
    if delivery_fee < Decimal::ZERO {
        return Err(OrderError::ValidationError(format!(
            "delivery fee must not be negative, got {}",
            delivery_fee
        )));
    }

    let mut original_price = Decimal::ZERO;
    let mut subtotal = Decimal::ZERO;
    let mut priced = Vec::with_capacity(lines.len());

    for (product, quantity) in lines {
        if *quantity == 0 {
            return Err(OrderError::InvalidQuantity {
                product_id: product.id.clone(),
                quantity: *quantity,
            });
        }
        let qty = Decimal::from(*quantity);
        original_price += (product.base_price * qty).round_dp(2);
        let sub_total = (product.effective_price() * qty).round_dp(2);
        subtotal += sub_total;
        priced.push(PricedLine {
            product_id: product.id.clone(),
            quantity: *quantity,
            sub_total,
        });
    }

    let discount_amount = match coupon_discount_percentage {
        Some(percentage) => (subtotal * percentage / Decimal::ONE_HUNDRED).round_dp(2),
        None => Decimal::ZERO,
    };
    let driver_commission = (subtotal * commission_percentage / Decimal::ONE_HUNDRED).round_dp(2);
    let total = subtotal - discount_amount + delivery_fee;

    let consumed_points = if subtotal > Decimal::ZERO {
        (discount_amount / subtotal * Decimal::ONE_HUNDRED).round_dp(2)
    } else {
        Decimal::ZERO
    };

    Ok(Quote {
        original_price,
        subtotal,
        discount_amount,
        delivery_fee,
        driver_commission,
        total,
        consumed_points,
        lines: priced,
    })
}
