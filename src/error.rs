use thiserror::Error;

use crate::domain::OrderStatus;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CustomerError {
    #[error("Customer not found: {0}")]
    NotFound(String),
    #[error("Customer validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(String),
    #[error("Product validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DriverError {
    #[error("Driver not found: {0}")]
    NotFound(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

/// Errors surfaced by the order service.
///
/// Categories, mapped at the client boundary:
/// - validation (`MissingAddress`, `EmptyOrder`, `InvalidQuantity`,
///   `ValidationError`) — rejected before any state is written.
/// - conflict (`DuplicateActiveOrder`, `AlreadyClaimed`, `DriverBusy`,
///   `InvalidTransition`, `PinVerificationFailed`) — the request lost a race
///   or asked for an impossible state change; nothing is mutated.
/// - not found (`NotFound`, `ProductNotFound`, `InvalidCustomer`,
///   `InvalidDriver`, `CouponIneligible`).
/// - infrastructure (`ActorCommunicationError`).
///
/// Notification failures never appear here: they are logged downstream and
/// do not affect the originating state change.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),
    #[error("Product not found: {0}")]
    ProductNotFound(String),
    #[error("Invalid customer: {0}")]
    InvalidCustomer(String),
    #[error("Invalid driver: {0}")]
    InvalidDriver(String),
    #[error("No delivery address provided and current location not shared")]
    MissingAddress,
    #[error("Order has no line items")]
    EmptyOrder,
    #[error("Invalid quantity {quantity} for product {product_id}")]
    InvalidQuantity { product_id: String, quantity: u32 },
    #[error("Customer {customer_id} already has an active order at store {store_id}")]
    DuplicateActiveOrder {
        customer_id: String,
        store_id: String,
    },
    #[error("Coupon not redeemable: {0}")]
    CouponIneligible(String),
    #[error("Order {0} was already claimed by another driver")]
    AlreadyClaimed(String),
    #[error("Driver {driver_id} already has an active delivery ({order_id})")]
    DriverBusy { driver_id: String, order_id: String },
    #[error("Illegal status transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
    #[error("PIN or received item count did not match")]
    PinVerificationFailed,
    #[error("Order validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
