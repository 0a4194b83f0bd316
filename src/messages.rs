use tokio::sync::oneshot;

use crate::domain::{Coupon, Order, OrderDraft, OrderReceipt, OrderStatus};
use crate::error::OrderError;

/// Generic type aliases for service communication.
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Typed messages for the order service. Each variant carries its parameters
/// plus a oneshot channel for the response.
///
/// Role scoping is by convention of the calling endpoint: `PlaceOrder` is
/// customer-side, `MarkReady` store-side, and `Claim`/`Verify`/
/// `MarkDelivered`/`Reject` driver-side.
#[derive(Debug)]
pub enum OrderRequest {
    PlaceOrder {
        draft: OrderDraft,
        respond_to: ServiceResponse<OrderReceipt, OrderError>,
    },
    GetOrder {
        id: String,
        respond_to: ServiceResponse<Option<Order>, OrderError>,
    },
    GetCoupon {
        customer_id: String,
        respond_to: ServiceResponse<Option<Coupon>, OrderError>,
    },
    MarkReady {
        id: String,
        store_id: String,
        respond_to: ServiceResponse<OrderStatus, OrderError>,
    },
    Claim {
        id: String,
        driver_id: String,
        respond_to: ServiceResponse<OrderStatus, OrderError>,
    },
    Verify {
        id: String,
        driver_id: String,
        pin: String,
        received_items: usize,
        respond_to: ServiceResponse<OrderStatus, OrderError>,
    },
    MarkDelivered {
        id: String,
        driver_id: String,
        respond_to: ServiceResponse<OrderStatus, OrderError>,
    },
    Reject {
        id: String,
        driver_id: String,
        reason: String,
        respond_to: ServiceResponse<OrderStatus, OrderError>,
    },
    Shutdown,
    #[cfg(test)]
    SeedCoupon {
        coupon: Coupon,
        respond_to: ServiceResponse<(), OrderError>,
    },
    #[cfg(test)]
    GetOrderCount {
        respond_to: ServiceResponse<usize, OrderError>,
    },
}
