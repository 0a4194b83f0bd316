//! Notification queue standing between the order service and the external
//! email/PDF sink. Events are enqueued fire-and-forget in the same handler
//! invocation that commits the state change and dispatched by a dedicated
//! actor; a failing sink is logged and never blocks or rolls back the
//! originating transition.

use rust_decimal::Decimal;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{error, info, instrument, warn};

use crate::domain::OrderStatus;

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationEvent {
    /// Invoice generated (at placement) or regenerated (at delivery) for
    /// customer and store.
    InvoiceCreated {
        order_id: String,
        customer_id: String,
        store_id: String,
        total: Decimal,
    },
    OrderPlaced {
        order_id: String,
        customer_id: String,
        store_id: String,
    },
    StatusChanged {
        order_id: String,
        customer_id: String,
        store_id: String,
        old: OrderStatus,
        new: OrderStatus,
    },
    /// Driver crossed the rejected-order warning threshold.
    DriverWarning {
        driver_id: String,
        rejected_count: u32,
    },
}

#[derive(Debug, Clone, Error)]
pub enum NotifyError {
    #[error("Notification sink failure: {0}")]
    SinkFailure(String),
}

/// The external delivery channel (email/PDF service). Implementations must
/// not panic; failures are reported through the `Result` and logged by the
/// dispatcher.
pub trait NotificationSink: Send + 'static {
    fn deliver(&mut self, event: &NotificationEvent) -> Result<(), NotifyError>;
}

/// Default sink: logs what the external service would send. Stands in for
/// the real email/PDF integration, which is out of scope for this core.
pub struct LoggingSink;

impl NotificationSink for LoggingSink {
    fn deliver(&mut self, event: &NotificationEvent) -> Result<(), NotifyError> {
        info!(event = ?event, "Notification dispatched");
        Ok(())
    }
}

/// Cloneable enqueue handle held by the order service.
#[derive(Clone)]
pub struct Notifier {
    sender: mpsc::Sender<NotificationEvent>,
}

impl Notifier {
    pub fn new(sender: mpsc::Sender<NotificationEvent>) -> Self {
        Self { sender }
    }

    /// Fire-and-forget enqueue. A full or closed queue is logged and
    /// swallowed; the business state change stays authoritative.
    pub fn notify(&self, event: NotificationEvent) {
        if let Err(e) = self.sender.try_send(event) {
            warn!(error = %e, "Dropping notification event");
        }
    }
}

/// Actor draining the notification queue into the sink. Runs until every
/// [`Notifier`] handle is dropped.
pub struct NotificationService {
    receiver: mpsc::Receiver<NotificationEvent>,
    sink: Box<dyn NotificationSink>,
}

impl NotificationService {
    pub fn new(
        buffer_size: usize,
        sink: Box<dyn NotificationSink>,
    ) -> (Self, Notifier) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        (Self { receiver, sink }, Notifier::new(sender))
    }

    #[instrument(name = "notification_service", skip(self))]
    pub async fn run(mut self) {
        info!("NotificationService starting");

        while let Some(event) = self.receiver.recv().await {
            if let Err(e) = self.sink.deliver(&event) {
                error!(error = %e, event = ?event, "Notification delivery failed");
            }
        }

        info!("NotificationService stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct RecordingSink(Arc<Mutex<Vec<NotificationEvent>>>);

    impl NotificationSink for RecordingSink {
        fn deliver(&mut self, event: &NotificationEvent) -> Result<(), NotifyError> {
            self.0.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    /// Fails on every odd delivery attempt.
    struct FlakySink {
        delivered: Arc<Mutex<Vec<NotificationEvent>>>,
        attempts: u32,
    }

    impl NotificationSink for FlakySink {
        fn deliver(&mut self, event: &NotificationEvent) -> Result<(), NotifyError> {
            self.attempts += 1;
            if self.attempts % 2 == 1 {
                return Err(NotifyError::SinkFailure("smtp timeout".to_string()));
            }
            self.delivered.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    fn warning(driver: &str) -> NotificationEvent {
        NotificationEvent::DriverWarning {
            driver_id: driver.to_string(),
            rejected_count: 10,
        }
    }

    #[tokio::test]
    async fn events_reach_the_sink_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (service, notifier) =
            NotificationService::new(10, Box::new(RecordingSink(seen.clone())));
        let handle = tokio::spawn(service.run());

        notifier.notify(warning("driver_1"));
        notifier.notify(warning("driver_2"));
        drop(notifier);
        handle.await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], warning("driver_1"));
        assert_eq!(seen[1], warning("driver_2"));
    }

    #[tokio::test]
    async fn sink_failures_do_not_stop_dispatch() {
        let delivered = Arc::new(Mutex::new(Vec::new()));
        let sink = FlakySink {
            delivered: delivered.clone(),
            attempts: 0,
        };
        let (service, notifier) = NotificationService::new(10, Box::new(sink));
        let handle = tokio::spawn(service.run());

        notifier.notify(warning("driver_1")); // fails
        notifier.notify(warning("driver_2")); // delivered
        notifier.notify(warning("driver_3")); // fails
        notifier.notify(warning("driver_4")); // delivered
        drop(notifier);
        handle.await.unwrap();

        let delivered = delivered.lock().unwrap();
        assert_eq!(delivered.len(), 2);
        assert_eq!(delivered[0], warning("driver_2"));
        assert_eq!(delivered[1], warning("driver_4"));
    }
}
