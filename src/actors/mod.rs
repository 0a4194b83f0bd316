//! Root actor for the order lifecycle. Owns all order rows and the coupon
//! ledger; because a single task serializes every request, each handler
//! invocation is one transaction — either every mutation it makes lands, or
//! it replies with an error having touched nothing. This is also what makes
//! the claim operation an atomic conditional update: two concurrent claims
//! are handled one after the other and exactly one sees an unassigned order.

use std::collections::HashMap;

use chrono::Utc;
use rand::Rng;
use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

use crate::clients::{CustomerClient, DriverClient, OrderClient, ProductClient};
use crate::config::SystemConfig;
use crate::coupons::CouponLedger;
use crate::domain::{Order, OrderDraft, OrderReceipt, OrderStatus, Product};
use crate::error::OrderError;
use crate::messages::{OrderRequest, ServiceResponse};
use crate::notify::{NotificationEvent, Notifier};
use crate::pricing;

/// Reply with an error and bail out of the handler.
macro_rules! send_error {
    ($respond_to:expr, $error:expr) => {{
        let _ = $respond_to.send(Err($error));
        return;
    }};
}

pub struct OrderService {
    receiver: mpsc::Receiver<OrderRequest>,
    config: SystemConfig,
    customer_client: CustomerClient,
    product_client: ProductClient,
    driver_client: DriverClient,
    notifier: Notifier,
    orders: HashMap<String, Order>,
    coupons: CouponLedger,
    next_id: u64,
}

impl OrderService {
    pub fn new(
        config: SystemConfig,
        customer_client: CustomerClient,
        product_client: ProductClient,
        driver_client: DriverClient,
        notifier: Notifier,
    ) -> (Self, OrderClient) {
        let (sender, receiver) = mpsc::channel(config.mailbox_size);
        let service = Self {
            receiver,
            config,
            customer_client,
            product_client,
            driver_client,
            notifier,
            orders: HashMap::new(),
            coupons: CouponLedger::new(),
            next_id: 1,
        };
        let client = OrderClient::new(sender);
        (service, client)
    }

    #[instrument(name = "order_service", skip(self))]
    pub async fn run(mut self) {
        info!("OrderService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                OrderRequest::PlaceOrder { draft, respond_to } => {
                    self.handle_place_order(draft, respond_to).await;
                }
                OrderRequest::GetOrder { id, respond_to } => {
                    self.handle_get_order(id, respond_to);
                }
                OrderRequest::GetCoupon {
                    customer_id,
                    respond_to,
                } => {
                    let _ = respond_to.send(Ok(self.coupons.get(&customer_id).cloned()));
                }
                OrderRequest::MarkReady {
                    id,
                    store_id,
                    respond_to,
                } => {
                    self.handle_mark_ready(id, store_id, respond_to);
                }
                OrderRequest::Claim {
                    id,
                    driver_id,
                    respond_to,
                } => {
                    self.handle_claim(id, driver_id, respond_to).await;
                }
                OrderRequest::Verify {
                    id,
                    driver_id,
                    pin,
                    received_items,
                    respond_to,
                } => {
                    self.handle_verify(id, driver_id, pin, received_items, respond_to);
                }
                OrderRequest::MarkDelivered {
                    id,
                    driver_id,
                    respond_to,
                } => {
                    self.handle_mark_delivered(id, driver_id, respond_to);
                }
                OrderRequest::Reject {
                    id,
                    driver_id,
                    reason,
                    respond_to,
                } => {
                    self.handle_reject(id, driver_id, reason, respond_to).await;
                }
                OrderRequest::Shutdown => {
                    info!("OrderService shutting down");
                    break;
                }
                #[cfg(test)]
                OrderRequest::SeedCoupon { coupon, respond_to } => {
                    self.coupons.put(coupon);
                    let _ = respond_to.send(Ok(()));
                }
                #[cfg(test)]
                OrderRequest::GetOrderCount { respond_to } => {
                    let _ = respond_to.send(Ok(self.orders.len()));
                }
            }
        }

        info!("OrderService stopped");
    }

    /// Place a new order: validate, price, consume the coupon and persist the
    /// order with its lines — all before replying, so no partial state is
    /// ever observable.
    #[instrument(
        fields(
            customer_id = %draft.customer_id,
            store_id = %draft.store_id,
            line_count = draft.lines.len()
        ),
        skip(self, draft, respond_to)
    )]
    async fn handle_place_order(
        &mut self,
        draft: OrderDraft,
        respond_to: ServiceResponse<OrderReceipt, OrderError>,
    ) {
        info!("Processing place_order request");

        let delivery_address = match draft.resolve_address() {
            Ok(address) => address,
            Err(e) => {
                error!(error = %e, "Address validation failed");
                send_error!(respond_to, e);
            }
        };

        // Validate customer via CustomerService
        match self.customer_client.get_customer(draft.customer_id.clone()).await {
            Ok(Some(customer)) => {
                info!(customer_name = %customer.name, "Customer validation successful")
            }
            Ok(None) => {
                error!("Customer not found");
                send_error!(respond_to, OrderError::InvalidCustomer(draft.customer_id));
            }
            Err(e) => {
                error!(error = %e, "Customer validation failed");
                send_error!(
                    respond_to,
                    OrderError::ActorCommunicationError(e.to_string())
                );
            }
        }

        // One active order per store per customer. Anything not yet delivered
        // counts as active.
        if let Some(existing) = self.orders.values().find(|o| {
            o.customer_id == draft.customer_id
                && o.store_id == draft.store_id
                && o.status != OrderStatus::Delivered
        }) {
            error!(existing_order = %existing.id, "Duplicate active order");
            send_error!(
                respond_to,
                OrderError::DuplicateActiveOrder {
                    customer_id: draft.customer_id,
                    store_id: draft.store_id,
                }
            );
        }

        // Resolve every product up front; one missing product aborts the
        // whole order.
        let mut resolved: Vec<(Product, u32)> = Vec::with_capacity(draft.lines.len());
        for line in &draft.lines {
            match self.product_client.get_product(line.product_id.clone()).await {
                Ok(Some(product)) if product.store_id == draft.store_id => {
                    resolved.push((product, line.quantity));
                }
                Ok(_) => {
                    error!(product_id = %line.product_id, "Product not found at store");
                    send_error!(
                        respond_to,
                        OrderError::ProductNotFound(line.product_id.clone())
                    );
                }
                Err(e) => {
                    error!(error = %e, "Product lookup failed");
                    send_error!(
                        respond_to,
                        OrderError::ActorCommunicationError(e.to_string())
                    );
                }
            }
        }

        // Coupon eligibility, checked before any mutation.
        let coupon_discount: Option<Decimal> = match &draft.coupon_code {
            Some(code) => {
                match self.coupons.check_eligible(
                    &draft.customer_id,
                    code,
                    self.config.coupon_policy,
                    Utc::now(),
                ) {
                    Ok(coupon) => Some(coupon.discount_percentage),
                    Err(e) => {
                        error!(error = %e, "Coupon rejected");
                        send_error!(respond_to, e);
                    }
                }
            }
            None => None,
        };

        let quote = match pricing::quote(
            &resolved,
            draft.delivery_fee,
            coupon_discount,
            self.config.driver_commission_percentage,
        ) {
            Ok(quote) => quote,
            Err(e) => {
                error!(error = %e, "Pricing failed");
                send_error!(respond_to, e);
            }
        };

        // Point of no return: coupon depletion and order insertion happen
        // together in this invocation or not at all.
        if draft.coupon_code.is_some() {
            self.coupons.consume(&draft.customer_id, quote.consumed_points);
        }

        let order_id = format!("order_{}", self.next_id);
        self.next_id += 1;
        let secret_pin = generate_pin();

        let order = Order {
            id: order_id.clone(),
            customer_id: draft.customer_id.clone(),
            store_id: draft.store_id.clone(),
            driver_id: None,
            coupon_code: draft.coupon_code.clone(),
            delivery_address,
            payment_method: draft.payment_method,
            status: OrderStatus::Processing,
            original_price: quote.original_price,
            subtotal: quote.subtotal,
            delivery_fee: quote.delivery_fee,
            discount_amount: quote.discount_amount,
            driver_commission: quote.driver_commission,
            driver_commission_percentage: self.config.driver_commission_percentage,
            total: quote.total,
            secret_pin: secret_pin.clone(),
            rejection_reason: None,
            lines: quote
                .lines
                .iter()
                .map(|l| crate::domain::OrderLine {
                    product_id: l.product_id.clone(),
                    quantity: l.quantity,
                    sub_total: l.sub_total,
                })
                .collect(),
            created_at: Utc::now(),
            picked_at: None,
        };

        debug_assert!(order.totals_consistent());

        let total = order.total;
        self.orders.insert(order_id.clone(), order);

        self.notifier.notify(NotificationEvent::InvoiceCreated {
            order_id: order_id.clone(),
            customer_id: draft.customer_id.clone(),
            store_id: draft.store_id.clone(),
            total,
        });
        self.notifier.notify(NotificationEvent::OrderPlaced {
            order_id: order_id.clone(),
            customer_id: draft.customer_id,
            store_id: draft.store_id,
        });

        info!(order_id = %order_id, total = %total, "Order created successfully");
        let _ = respond_to.send(Ok(OrderReceipt {
            order_id,
            secret_pin,
            total,
        }));
    }

    #[instrument(fields(order_id = %id), skip(self, respond_to))]
    fn handle_get_order(&self, id: String, respond_to: ServiceResponse<Option<Order>, OrderError>) {
        debug!("Processing get_order request");
        let order = self.orders.get(&id).cloned();
        match &order {
            Some(order) => debug!(status = %order.status, "Order found"),
            None => debug!("Order not found"),
        }
        let _ = respond_to.send(Ok(order));
    }

    /// Store confirms the order is prepared: Processing -> Ready.
    #[instrument(fields(order_id = %id, store_id = %store_id), skip(self, respond_to))]
    fn handle_mark_ready(
        &mut self,
        id: String,
        store_id: String,
        respond_to: ServiceResponse<OrderStatus, OrderError>,
    ) {
        info!("Processing mark_ready request");

        let Some(order) = self.orders.get(&id) else {
            send_error!(respond_to, OrderError::NotFound(id));
        };
        if order.store_id != store_id {
            send_error!(
                respond_to,
                OrderError::ValidationError(format!(
                    "order {} does not belong to store {}",
                    id, store_id
                ))
            );
        }
        if !order.status.can_transition(OrderStatus::Ready) {
            send_error!(
                respond_to,
                OrderError::InvalidTransition {
                    from: order.status,
                    to: OrderStatus::Ready,
                }
            );
        }

        let new = self.transition(&id, OrderStatus::Ready);
        let _ = respond_to.send(Ok(new));
    }

    /// Driver claims a ready, unassigned order: Ready -> OnTheWay. The
    /// mailbox serializes claims, so of two concurrent attempts exactly one
    /// finds the order unassigned; the other gets `AlreadyClaimed`.
    #[instrument(fields(order_id = %id, driver_id = %driver_id), skip(self, respond_to))]
    async fn handle_claim(
        &mut self,
        id: String,
        driver_id: String,
        respond_to: ServiceResponse<OrderStatus, OrderError>,
    ) {
        info!("Processing claim request");

        match self.driver_client.get_driver(driver_id.clone()).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                error!("Driver not found");
                send_error!(respond_to, OrderError::InvalidDriver(driver_id));
            }
            Err(e) => {
                error!(error = %e, "Driver validation failed");
                send_error!(
                    respond_to,
                    OrderError::ActorCommunicationError(e.to_string())
                );
            }
        }

        let Some(order) = self.orders.get(&id) else {
            send_error!(respond_to, OrderError::NotFound(id));
        };
        if order.driver_id.is_some() {
            warn!("Order already claimed");
            send_error!(respond_to, OrderError::AlreadyClaimed(id));
        }
        if !order.status.can_transition(OrderStatus::OnTheWay) {
            send_error!(
                respond_to,
                OrderError::InvalidTransition {
                    from: order.status,
                    to: OrderStatus::OnTheWay,
                }
            );
        }

        // One active delivery per driver. Terminal orders (delivered or
        // rejected) no longer count against the driver.
        if let Some(active) = self
            .orders
            .values()
            .find(|o| o.driver_id.as_deref() == Some(driver_id.as_str()) && !o.status.is_terminal())
        {
            warn!(active_order = %active.id, "Driver already has an active delivery");
            send_error!(
                respond_to,
                OrderError::DriverBusy {
                    driver_id,
                    order_id: active.id.clone(),
                }
            );
        }

        if let Some(order) = self.orders.get_mut(&id) {
            order.driver_id = Some(driver_id);
            order.picked_at = Some(Utc::now());
        }

        let new = self.transition(&id, OrderStatus::OnTheWay);
        let _ = respond_to.send(Ok(new));
    }

    /// PIN-based handoff confirmation: OnTheWay -> Verified, only when the
    /// PIN matches and the driver confirms receipt of every line item. Any
    /// mismatch leaves the order on the way.
    #[instrument(fields(order_id = %id, driver_id = %driver_id), skip(self, pin, respond_to))]
    fn handle_verify(
        &mut self,
        id: String,
        driver_id: String,
        pin: String,
        received_items: usize,
        respond_to: ServiceResponse<OrderStatus, OrderError>,
    ) {
        info!("Processing verify request");

        let Some(order) = self.orders.get(&id) else {
            send_error!(respond_to, OrderError::NotFound(id));
        };
        if order.driver_id.as_deref() != Some(driver_id.as_str()) {
            send_error!(respond_to, OrderError::InvalidDriver(driver_id));
        }
        if !order.status.can_transition(OrderStatus::Verified) {
            send_error!(
                respond_to,
                OrderError::InvalidTransition {
                    from: order.status,
                    to: OrderStatus::Verified,
                }
            );
        }
        if order.secret_pin != pin || order.lines.len() != received_items {
            warn!(
                received_items,
                expected_items = order.lines.len(),
                "PIN verification failed"
            );
            send_error!(respond_to, OrderError::PinVerificationFailed);
        }

        let new = self.transition(&id, OrderStatus::Verified);
        let _ = respond_to.send(Ok(new));
    }

    /// Driver completes the delivery: OnTheWay/Verified -> Delivered. Credits
    /// a loyalty point (creating the coupon on first delivery) and triggers
    /// the final invoice.
    #[instrument(fields(order_id = %id, driver_id = %driver_id), skip(self, respond_to))]
    fn handle_mark_delivered(
        &mut self,
        id: String,
        driver_id: String,
        respond_to: ServiceResponse<OrderStatus, OrderError>,
    ) {
        info!("Processing mark_delivered request");

        let Some(order) = self.orders.get(&id) else {
            send_error!(respond_to, OrderError::NotFound(id));
        };
        if order.driver_id.as_deref() != Some(driver_id.as_str()) {
            send_error!(respond_to, OrderError::InvalidDriver(driver_id));
        }
        if !order.status.can_transition(OrderStatus::Delivered) {
            send_error!(
                respond_to,
                OrderError::InvalidTransition {
                    from: order.status,
                    to: OrderStatus::Delivered,
                }
            );
        }

        let customer_id = order.customer_id.clone();
        let store_id = order.store_id.clone();
        let total = order.total;

        let new = self.transition(&id, OrderStatus::Delivered);

        let coupon = self.coupons.reward_delivery(&customer_id);
        info!(
            coupon_code = %coupon.code,
            discount_percentage = %coupon.discount_percentage,
            "Delivery credited to loyalty coupon"
        );

        self.notifier.notify(NotificationEvent::InvoiceCreated {
            order_id: id,
            customer_id,
            store_id,
            total,
        });

        let _ = respond_to.send(Ok(new));
    }

    /// Driver declines the order: any non-terminal state -> Rejected. Once
    /// claimed, only the assigned driver may reject. The order is not
    /// re-queued; the driver's rejection counter is bumped and a warning goes
    /// out when it crosses the configured threshold.
    #[instrument(fields(order_id = %id, driver_id = %driver_id), skip(self, reason, respond_to))]
    async fn handle_reject(
        &mut self,
        id: String,
        driver_id: String,
        reason: String,
        respond_to: ServiceResponse<OrderStatus, OrderError>,
    ) {
        info!("Processing reject request");

        match self.driver_client.get_driver(driver_id.clone()).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                error!("Driver not found");
                send_error!(respond_to, OrderError::InvalidDriver(driver_id));
            }
            Err(e) => {
                error!(error = %e, "Driver validation failed");
                send_error!(
                    respond_to,
                    OrderError::ActorCommunicationError(e.to_string())
                );
            }
        }

        let Some(order) = self.orders.get_mut(&id) else {
            send_error!(respond_to, OrderError::NotFound(id));
        };
        // Any driver may decline an unassigned order, but a claimed order
        // can only be rejected by the driver carrying it.
        if order.driver_id.is_some() && order.driver_id.as_deref() != Some(driver_id.as_str()) {
            send_error!(respond_to, OrderError::InvalidDriver(driver_id));
        }
        if !order.status.can_transition(OrderStatus::Rejected) {
            send_error!(
                respond_to,
                OrderError::InvalidTransition {
                    from: order.status,
                    to: OrderStatus::Rejected,
                }
            );
        }

        info!(reason = %reason, "Order rejected by driver");
        order.rejection_reason = Some(reason);
        let new = self.transition(&id, OrderStatus::Rejected);

        match self.driver_client.record_rejection(driver_id.clone()).await {
            Ok(count) if count == self.config.rejection_warning_threshold => {
                warn!(rejected_count = count, "Driver crossed rejection warning threshold");
                self.notifier.notify(NotificationEvent::DriverWarning {
                    driver_id,
                    rejected_count: count,
                });
            }
            Ok(count) => {
                debug!(rejected_count = count, "Driver rejection recorded");
            }
            Err(e) => {
                // The rejection itself has committed; the counter is
                // bookkeeping and its failure must not undo the transition.
                error!(error = %e, "Failed to record driver rejection");
            }
        }

        let _ = respond_to.send(Ok(new));
    }

    /// Apply a validated transition: update status, log `old -> new`, and
    /// enqueue the status notification for customer and store.
    fn transition(&mut self, order_id: &str, to: OrderStatus) -> OrderStatus {
        if let Some(order) = self.orders.get_mut(order_id) {
            let old = order.status;
            order.status = to;

            info!(
                order_id = %order_id,
                old_status = %old,
                new_status = %to,
                "Order status changed"
            );
            self.notifier.notify(NotificationEvent::StatusChanged {
                order_id: order_id.to_string(),
                customer_id: order.customer_id.clone(),
                store_id: order.store_id.clone(),
                old,
                new: to,
            });
        }
        to
    }
}

/// Six random decimal digits. Independently generated per order; collisions
/// between live orders are an accepted risk.
fn generate_pin() -> String {
    format!("{:06}", rand::thread_rng().gen_range(0..1_000_000))
}

#[cfg(test)]
mod tests {
    use super::generate_pin;

    #[test]
    fn pin_is_six_decimal_digits() {
        for _ in 0..100 {
            let pin = generate_pin();
            assert_eq!(pin.len(), 6);
            assert!(pin.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
