/// Driver bookkeeping actions invoked by the order service.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverAction {
    /// Bump the driver's rejected-order counter; returns the new count so
    /// the caller can detect the warning threshold being crossed.
    RecordRejection,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DriverActionResult {
    RejectedCount(u32),
}
