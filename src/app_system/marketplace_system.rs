use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{error, info, instrument};

use crate::actor_framework::ResourceActor;
use crate::actors::OrderService;
use crate::clients::{CustomerClient, DriverClient, OrderClient, ProductClient};
use crate::config::SystemConfig;
use crate::domain::{Customer, Driver, Product};
use crate::notify::{LoggingSink, NotificationService, NotificationSink};

fn sequential_ids(prefix: &'static str) -> impl Fn() -> String + Send + Sync + 'static {
    let counter = Arc::new(AtomicU64::new(1));
    move || {
        let id = counter.fetch_add(1, Ordering::SeqCst);
        format!("{}_{}", prefix, id)
    }
}

/// Coordinates the whole actor system: starts sub-actors first, injects their
/// clients into the order service, and tears everything down in dependency
/// order.
pub struct MarketplaceSystem {
    pub order_client: OrderClient,
    pub customer_client: CustomerClient,
    pub product_client: ProductClient,
    pub driver_client: DriverClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl MarketplaceSystem {
    pub fn new(config: SystemConfig) -> Self {
        Self::with_sink(config, Box::new(LoggingSink))
    }

    /// Start the system with a custom notification sink (the real email/PDF
    /// integration, or a recording sink in tests).
    #[instrument(name = "marketplace_system", skip(config, sink))]
    pub fn with_sink(config: SystemConfig, sink: Box<dyn NotificationSink>) -> Self {
        let mut handles = Vec::new();

        info!("Starting marketplace system");

        // Sub-actors first: they have no dependencies.
        let (customer_actor, customer_resource) =
            ResourceActor::<Customer>::new(config.mailbox_size, sequential_ids("customer"));
        let customer_client = CustomerClient::new(customer_resource);
        handles.push(tokio::spawn(customer_actor.run()));

        let (product_actor, product_resource) =
            ResourceActor::<Product>::new(config.mailbox_size, sequential_ids("product"));
        let product_client = ProductClient::new(product_resource);
        handles.push(tokio::spawn(product_actor.run()));

        let (driver_actor, driver_resource) =
            ResourceActor::<Driver>::new(config.mailbox_size, sequential_ids("driver"));
        let driver_client = DriverClient::new(driver_resource);
        handles.push(tokio::spawn(driver_actor.run()));

        let (notification_service, notifier) =
            NotificationService::new(config.mailbox_size, sink);
        handles.push(tokio::spawn(notification_service.run()));

        // Root actor last, with sub-actor clients injected. The notifier
        // handle lives only inside the order service, so the notification
        // queue drains and stops once the order service does.
        let (order_service, order_client) = OrderService::new(
            config,
            customer_client.clone(),
            product_client.clone(),
            driver_client.clone(),
            notifier,
        );
        handles.push(tokio::spawn(order_service.run()));

        info!("Marketplace system started successfully");

        Self {
            order_client,
            customer_client,
            product_client,
            driver_client,
            handles,
        }
    }

    /// Gracefully shut down: stop the root actor first, then release every
    /// client handle so the sub-actors drain and stop, then wait for all
    /// tasks. Errors are logged but do not abort the shutdown.
    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down marketplace system");

        let Self {
            order_client,
            customer_client,
            product_client,
            driver_client,
            handles,
        } = self;

        if let Err(e) = order_client.shutdown().await {
            error!(error = %e, "Order service shutdown request failed");
        }

        drop(order_client);
        drop(customer_client);
        drop(product_client);
        drop(driver_client);

        for handle in handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Service shutdown error");
                return Err(format!("Service task failed: {:?}", e));
            }
        }

        info!("Marketplace system shutdown complete");
        Ok(())
    }
}
