mod actor_framework;
mod actors;
mod app_system;
mod clients;
mod config;
mod coupons;
mod customer_actor;
mod domain;
mod driver_actor;
mod error;
mod messages;
mod notify;
mod pricing;
mod product_actor;

#[cfg(test)]
mod mock_framework;

use rust_decimal_macros::dec;
use tracing::{error, info, Instrument};

use crate::app_system::{setup_tracing, MarketplaceSystem};
use crate::config::SystemConfig;
use crate::domain::{
    CustomerCreate, DriverCreate, OrderDraft, OrderLineInput, PaymentMethod, ProductCreate,
};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    info!("Starting marketplace order system");

    let system = MarketplaceSystem::new(SystemConfig::default());

    // Seed a customer, a store's products and a driver, then walk one order
    // through its whole lifecycle.
    let customer_id = system
        .customer_client
        .create_customer(CustomerCreate {
            name: "Alice".to_string(),
            delivery_address: "Rua Augusta 100".to_string(),
            default_location: None,
        })
        .await
        .map_err(|e| e.to_string())?;
    info!(customer_id = %customer_id, "Customer created");

    let feijoada_id = system
        .product_client
        .create_product(ProductCreate {
            store_id: "store_1".to_string(),
            name: "Feijoada".to_string(),
            base_price: dec!(1000),
            markup_percentage: dec!(10),
            stock: 20,
        })
        .await
        .map_err(|e| e.to_string())?;
    let juice_id = system
        .product_client
        .create_product(ProductCreate {
            store_id: "store_1".to_string(),
            name: "Orange juice".to_string(),
            base_price: dec!(500),
            markup_percentage: dec!(0),
            stock: 50,
        })
        .await
        .map_err(|e| e.to_string())?;
    info!(%feijoada_id, %juice_id, "Products created");

    let driver_id = system
        .driver_client
        .create_driver(DriverCreate {
            name: "Marcos".to_string(),
        })
        .await
        .map_err(|e| e.to_string())?;
    info!(driver_id = %driver_id, "Driver created");

    let draft = OrderDraft {
        customer_id: customer_id.clone(),
        store_id: "store_1".to_string(),
        lines: vec![
            OrderLineInput {
                product_id: feijoada_id,
                quantity: 2,
            },
            OrderLineInput {
                product_id: juice_id,
                quantity: 1,
            },
        ],
        address: Some("Rua Augusta 100".to_string()),
        use_current_location: false,
        current_location: None,
        payment_method: PaymentMethod::Card,
        coupon_code: None,
        delivery_fee: dec!(300),
    };

    let span = tracing::info_span!("order_lifecycle");
    let result = async {
        let receipt = system
            .order_client
            .place_order(draft)
            .await
            .map_err(|e| e.to_string())?;
        info!(
            order_id = %receipt.order_id,
            total = %receipt.total,
            "Order placed"
        );

        system
            .order_client
            .mark_ready(receipt.order_id.clone(), "store_1".to_string())
            .await
            .map_err(|e| e.to_string())?;
        system
            .order_client
            .claim(receipt.order_id.clone(), driver_id.clone())
            .await
            .map_err(|e| e.to_string())?;
        system
            .order_client
            .verify(
                receipt.order_id.clone(),
                driver_id.clone(),
                receipt.secret_pin.clone(),
                2,
            )
            .await
            .map_err(|e| e.to_string())?;
        let status = system
            .order_client
            .mark_delivered(receipt.order_id.clone(), driver_id.clone())
            .await
            .map_err(|e| e.to_string())?;
        info!(order_id = %receipt.order_id, status = %status, "Order delivered");

        Ok::<_, String>(receipt.order_id)
    }
    .instrument(span)
    .await;

    match result {
        Ok(order_id) => {
            let coupon = system
                .order_client
                .get_coupon(customer_id)
                .await
                .map_err(|e| e.to_string())?;
            if let Some(coupon) = coupon {
                info!(
                    order_id = %order_id,
                    coupon_code = %coupon.code,
                    discount_percentage = %coupon.discount_percentage,
                    "Loyalty coupon after delivery"
                );
            }
        }
        Err(e) => error!(error = %e, "Order lifecycle failed"),
    }

    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
