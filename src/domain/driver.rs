/// A delivery driver. The rejected-order counter accumulates across orders
/// and drives the warning notification once it crosses the configured
/// threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Driver {
    pub id: String,
    pub name: String,
    pub rejected_orders: u32,
}

/// Payload for registering a driver.
#[derive(Debug, Clone)]
pub struct DriverCreate {
    pub name: String,
}
