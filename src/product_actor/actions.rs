/// Store-side actions on a product. Stock is only ever read by the order
/// core; decrementing it stays with store management.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductAction {
    CheckStock,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProductActionResult {
    StockLevel(u32),
}
