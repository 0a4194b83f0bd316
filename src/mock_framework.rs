//! Utilities for testing clients in isolation.
//!
//! [`create_mock_client`] returns a client plus the receiving end of its
//! channel, so a test can play the actor's role: inspect each request as it
//! arrives and answer it deterministically (success, failure, delay) without
//! spinning up a real `ResourceActor`.

use tokio::sync::{mpsc, oneshot};

use crate::actor_framework::{Entity, FrameworkError, ResourceClient, ResourceRequest};

pub fn create_mock_client<T: Entity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::from_sender(sender), receiver)
}

/// Assert the next message is a Create request and hand back its parts.
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::CreatePayload,
    oneshot::Sender<Result<T::Id, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { payload, respond_to }) => Some((payload, respond_to)),
        _ => None,
    }
}

/// Assert the next message is a Get request.
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<Option<T>, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Assert the next message is an Action request.
pub async fn expect_action<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::Id,
    T::Action,
    oneshot::Sender<Result<T::ActionResult, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{CustomerClient, ProductClient};
    use crate::domain::{Customer, CustomerCreate, Product};
    use crate::product_actor::{ProductAction, ProductActionResult};

    #[tokio::test]
    async fn mock_client_round_trip() {
        let (client, mut receiver) = create_mock_client::<Customer>(10);

        let create_task = tokio::spawn(async move {
            client
                .create(CustomerCreate {
                    name: "Alice".to_string(),
                    delivery_address: "Rua Augusta 100".to_string(),
                    default_location: None,
                })
                .await
        });

        let (payload, responder) = expect_create(&mut receiver)
            .await
            .expect("Expected Create request");
        assert_eq!(payload.name, "Alice");
        responder.send(Ok("customer_1".to_string())).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result, Ok("customer_1".to_string()));
    }

    #[tokio::test]
    async fn customer_client_passes_missing_lookups_through() {
        let (client, mut receiver) = create_mock_client::<Customer>(10);
        let customer_client = CustomerClient::new(client);

        let get_task =
            tokio::spawn(async move { customer_client.get_customer("customer_9".to_string()).await });

        let (id, responder) = expect_get(&mut receiver).await.expect("Expected Get request");
        assert_eq!(id, "customer_9");
        responder.send(Ok(None)).unwrap();

        assert_eq!(get_task.await.unwrap(), Ok(None));
    }

    #[tokio::test]
    async fn product_client_unwraps_stock_action_results() {
        let (client, mut receiver) = create_mock_client::<Product>(10);
        let product_client = ProductClient::new(client);

        let stock_task =
            tokio::spawn(async move { product_client.check_stock("product_7".to_string()).await });

        let (id, action, responder) = expect_action(&mut receiver)
            .await
            .expect("Expected Action request");
        assert_eq!(id, "product_7");
        assert_eq!(action, ProductAction::CheckStock);
        responder
            .send(Ok(ProductActionResult::StockLevel(4)))
            .unwrap();

        assert_eq!(stock_task.await.unwrap(), Ok(4));
    }
}
