use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

use crate::domain::{Coupon, Order, OrderDraft, OrderReceipt, OrderStatus};
use crate::error::OrderError;
use crate::messages::OrderRequest;

/// Generate an order-client method with the oneshot boilerplate and
/// automatic tracing.
macro_rules! client_method {
    ($client:ty => fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $request:ident::$variant:ident) => {
        impl $client {
            #[instrument(skip(self))]
            pub async fn $method(&self, $($param: $param_type),*) -> Result<$return_type, OrderError> {
                debug!("Sending request");
                let (respond_to, response) = oneshot::channel();
                self.sender.send($request::$variant {
                    $($param,)*
                    respond_to,
                }).await.map_err(|_| OrderError::ActorCommunicationError("Actor closed".to_string()))?;

                response.await.map_err(|_| OrderError::ActorCommunicationError("Actor dropped".to_string()))?
            }
        }
    };
}

/// Client for the order service. One method per lifecycle operation; the
/// role split (customer places, store readies, driver moves the order along)
/// is enforced by which endpoint calls which method.
#[derive(Clone)]
pub struct OrderClient {
    sender: mpsc::Sender<OrderRequest>,
}

impl OrderClient {
    pub fn new(sender: mpsc::Sender<OrderRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), OrderError> {
        debug!("Sending shutdown request");
        self.sender
            .send(OrderRequest::Shutdown)
            .await
            .map_err(|_| OrderError::ActorCommunicationError("Actor closed".to_string()))?;
        Ok(())
    }
}

client_method!(OrderClient => fn place_order(draft: OrderDraft) -> OrderReceipt as OrderRequest::PlaceOrder);
client_method!(OrderClient => fn get_order(id: String) -> Option<Order> as OrderRequest::GetOrder);
client_method!(OrderClient => fn get_coupon(customer_id: String) -> Option<Coupon> as OrderRequest::GetCoupon);
client_method!(OrderClient => fn mark_ready(id: String, store_id: String) -> OrderStatus as OrderRequest::MarkReady);
client_method!(OrderClient => fn claim(id: String, driver_id: String) -> OrderStatus as OrderRequest::Claim);
client_method!(OrderClient => fn verify(id: String, driver_id: String, pin: String, received_items: usize) -> OrderStatus as OrderRequest::Verify);
client_method!(OrderClient => fn mark_delivered(id: String, driver_id: String) -> OrderStatus as OrderRequest::MarkDelivered);
client_method!(OrderClient => fn reject(id: String, driver_id: String, reason: String) -> OrderStatus as OrderRequest::Reject);

// Test-only state inspection, following the cfg(test) message pattern.
#[cfg(test)]
client_method!(OrderClient => fn seed_coupon(coupon: Coupon) -> () as OrderRequest::SeedCoupon);
#[cfg(test)]
client_method!(OrderClient => fn get_order_count() -> usize as OrderRequest::GetOrderCount);
