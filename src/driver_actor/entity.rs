use super::{DriverAction, DriverActionResult};
use crate::actor_framework::{Entity, FrameworkError};
use crate::domain::{Driver, DriverCreate};

impl Entity for Driver {
    type Id = String;
    type CreatePayload = DriverCreate;
    type Patch = ();
    type Action = DriverAction;
    type ActionResult = DriverActionResult;

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create(id: String, payload: DriverCreate) -> Result<Self, FrameworkError> {
        Ok(Self {
            id,
            name: payload.name,
            rejected_orders: 0,
        })
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), FrameworkError> {
        Ok(())
    }

    fn handle_action(&mut self, action: DriverAction) -> Result<DriverActionResult, FrameworkError> {
        match action {
            DriverAction::RecordRejection => {
                self.rejected_orders += 1;
                Ok(DriverActionResult::RejectedCount(self.rejected_orders))
            }
        }
    }
}
