pub mod macros;
mod order_client;

pub use order_client::OrderClient;

use tracing::{debug, instrument};

use crate::actor_framework::{FrameworkError, ResourceClient};
use crate::domain::{
    Customer, CustomerCreate, CustomerPatch, Driver, DriverCreate, Product, ProductCreate,
    ProductPatch,
};
use crate::driver_actor::{DriverAction, DriverActionResult};
use crate::error::{CustomerError, DriverError, ProductError};
use crate::product_actor::{ProductAction, ProductActionResult};
use crate::{impl_basic_client, impl_client_methods, impl_client_new};

// =============================================================================
// Customer Client
// =============================================================================

#[derive(Clone)]
pub struct CustomerClient {
    inner: ResourceClient<Customer>,
}

impl_basic_client!(CustomerClient, Customer, CustomerError, customer);

impl CustomerClient {
    #[instrument(skip(self, payload))]
    pub async fn create_customer(&self, payload: CustomerCreate) -> Result<String, CustomerError> {
        debug!("Sending request");
        match self.inner.create(payload).await {
            Ok(id) => Ok(id),
            Err(FrameworkError::Validation(msg)) => Err(CustomerError::ValidationError(msg)),
            Err(e) => Err(CustomerError::ActorCommunicationError(e.to_string())),
        }
    }

    #[instrument(skip(self, patch))]
    pub async fn update_customer(
        &self,
        id: String,
        patch: CustomerPatch,
    ) -> Result<Customer, CustomerError> {
        debug!("Sending request");
        match self.inner.update(id.clone(), patch).await {
            Ok(customer) => Ok(customer),
            Err(FrameworkError::NotFound(_)) => Err(CustomerError::NotFound(id)),
            Err(e) => Err(CustomerError::ActorCommunicationError(e.to_string())),
        }
    }
}

// =============================================================================
// Product Client
// =============================================================================

#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl_basic_client!(ProductClient, Product, ProductError, product);

impl ProductClient {
    #[instrument(skip(self, payload))]
    pub async fn create_product(&self, payload: ProductCreate) -> Result<String, ProductError> {
        debug!("Sending request");
        match self.inner.create(payload).await {
            Ok(id) => Ok(id),
            Err(FrameworkError::Validation(msg)) => Err(ProductError::ValidationError(msg)),
            Err(e) => Err(ProductError::ActorCommunicationError(e.to_string())),
        }
    }

    #[instrument(skip(self, patch))]
    pub async fn update_product(
        &self,
        id: String,
        patch: ProductPatch,
    ) -> Result<Product, ProductError> {
        debug!("Sending request");
        match self.inner.update(id.clone(), patch).await {
            Ok(product) => Ok(product),
            Err(FrameworkError::NotFound(_)) => Err(ProductError::NotFound(id)),
            Err(FrameworkError::Validation(msg)) => Err(ProductError::ValidationError(msg)),
            Err(e) => Err(ProductError::ActorCommunicationError(e.to_string())),
        }
    }

    #[instrument(skip(self))]
    pub async fn check_stock(&self, id: String) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id.clone(), ProductAction::CheckStock).await {
            Ok(ProductActionResult::StockLevel(level)) => Ok(level),
            Err(FrameworkError::NotFound(_)) => Err(ProductError::NotFound(id)),
            Err(e) => Err(ProductError::ActorCommunicationError(e.to_string())),
        }
    }
}

// =============================================================================
// Driver Client
// =============================================================================

#[derive(Clone)]
pub struct DriverClient {
    inner: ResourceClient<Driver>,
}

impl_basic_client!(DriverClient, Driver, DriverError, driver);

impl DriverClient {
    #[instrument(skip(self, payload))]
    pub async fn create_driver(&self, payload: DriverCreate) -> Result<String, DriverError> {
        debug!("Sending request");
        self.inner
            .create(payload)
            .await
            .map_err(|e| DriverError::ActorCommunicationError(e.to_string()))
    }

    /// Bump the driver's rejected-order counter, returning the new count.
    #[instrument(skip(self))]
    pub async fn record_rejection(&self, id: String) -> Result<u32, DriverError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(id.clone(), DriverAction::RecordRejection)
            .await
        {
            Ok(DriverActionResult::RejectedCount(count)) => Ok(count),
            Err(FrameworkError::NotFound(_)) => Err(DriverError::NotFound(id)),
            Err(e) => Err(DriverError::ActorCommunicationError(e.to_string())),
        }
    }
}
