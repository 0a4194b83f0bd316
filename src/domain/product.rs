use rust_decimal::Decimal;

/// A product or menu item offered by a store.
///
/// Price and stock are managed by the store outside this core; orders only
/// read them, snapshotting prices into order lines at creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: String,
    pub store_id: String,
    pub name: String,
    pub base_price: Decimal,
    /// Percentage added on top of `base_price` for the customer-facing price.
    pub markup_percentage: Decimal,
    pub stock: u32,
}

impl Product {
    /// Customer-facing price: `base_price * (1 + markup/100)`, money-rounded.
    pub fn effective_price(&self) -> Decimal {
        (self.base_price * (Decimal::ONE + self.markup_percentage / Decimal::ONE_HUNDRED))
            .round_dp(2)
    }
}

/// Payload for listing a new product.
#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub store_id: String,
    pub name: String,
    pub base_price: Decimal,
    pub markup_percentage: Decimal,
    pub stock: u32,
}

/// Payload for store-side updates to a product.
#[derive(Debug, Clone)]
pub struct ProductPatch {
    pub base_price: Option<Decimal>,
    pub markup_percentage: Option<Decimal>,
    pub stock: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product(base: Decimal, markup: Decimal) -> Product {
        Product {
            id: "product_1".to_string(),
            store_id: "store_1".to_string(),
            name: "Feijoada".to_string(),
            base_price: base,
            markup_percentage: markup,
            stock: 10,
        }
    }

    #[test]
    fn effective_price_applies_markup() {
        assert_eq!(product(dec!(1000), dec!(0)).effective_price(), dec!(1000));
        assert_eq!(product(dec!(1000), dec!(10)).effective_price(), dec!(1100));
        assert_eq!(product(dec!(9.99), dec!(15)).effective_price(), dec!(11.49));
    }
}
