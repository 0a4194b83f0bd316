use rust_decimal::Decimal;

use super::{ProductAction, ProductActionResult};
use crate::actor_framework::{Entity, FrameworkError};
use crate::domain::{Product, ProductCreate, ProductPatch};

impl Entity for Product {
    type Id = String;
    type CreatePayload = ProductCreate;
    type Patch = ProductPatch;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create(id: String, payload: ProductCreate) -> Result<Self, FrameworkError> {
        if payload.base_price < Decimal::ZERO {
            return Err(FrameworkError::Validation(
                "base price must not be negative".to_string(),
            ));
        }
        Ok(Self {
            id,
            store_id: payload.store_id,
            name: payload.name,
            base_price: payload.base_price,
            markup_percentage: payload.markup_percentage,
            stock: payload.stock,
        })
    }

    fn on_update(&mut self, patch: ProductPatch) -> Result<(), FrameworkError> {
        if let Some(base_price) = patch.base_price {
            if base_price < Decimal::ZERO {
                return Err(FrameworkError::Validation(
                    "base price must not be negative".to_string(),
                ));
            }
            self.base_price = base_price;
        }
        if let Some(markup) = patch.markup_percentage {
            self.markup_percentage = markup;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        Ok(())
    }

    fn handle_action(&mut self, action: ProductAction) -> Result<ProductActionResult, FrameworkError> {
        match action {
            ProductAction::CheckStock => Ok(ProductActionResult::StockLevel(self.stock)),
        }
    }
}
