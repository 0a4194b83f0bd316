use crate::actor_framework::{Entity, FrameworkError};
use crate::domain::{Customer, CustomerCreate, CustomerPatch};

impl Entity for Customer {
    type Id = String;
    type CreatePayload = CustomerCreate;
    type Patch = CustomerPatch;
    type Action = ();
    type ActionResult = ();

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create(id: String, payload: CustomerCreate) -> Result<Self, FrameworkError> {
        if payload.name.trim().is_empty() {
            return Err(FrameworkError::Validation("name required".to_string()));
        }
        Ok(Self {
            id,
            name: payload.name,
            delivery_address: payload.delivery_address,
            default_location: payload.default_location,
        })
    }

    fn on_update(&mut self, patch: CustomerPatch) -> Result<(), FrameworkError> {
        if let Some(address) = patch.delivery_address {
            self.delivery_address = address;
        }
        if let Some(location) = patch.default_location {
            self.default_location = Some(location);
        }
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), FrameworkError> {
        Ok(())
    }
}
