/*
[INPUT]:  API credentials from DERIBIT_CLIENT_ID / DERIBIT_CLIENT_SECRET
[OUTPUT]: Order creation/cancellation confirmations
[POS]:    Examples - trading operations
[UPDATE]: When trading API changes
*/

use deribit_adapter::*;
use rust_decimal::Decimal;

/// Example: Trading operations on testnet (requires API credentials)
#[tokio::main]
async fn main() {
    println!("=== Deribit Trading Example ===\n");

    let (Ok(client_id), Ok(client_secret)) = (
        std::env::var("DERIBIT_CLIENT_ID"),
        std::env::var("DERIBIT_CLIENT_SECRET"),
    ) else {
        eprintln!("Set DERIBIT_CLIENT_ID and DERIBIT_CLIENT_SECRET to run this example");
        return;
    };

    let client = match DeribitClient::new(true) {
        Ok(c) => c.with_credentials(Credentials::new(client_id, client_secret)),
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            return;
        }
    };
    println!("✓ HTTP client created with credentials");

    // Far below market so it rests on the book
    let order = OrderRequest::limit(
        Direction::Buy,
        "BTC-PERPETUAL",
        Decimal::from(10),
        Decimal::from(10_000),
    )
    .with_label("example-order")
    .post_only(true);
    println!("\nPlacing order: {:?}", order);

    let placed = match client.create_order(order).await {
        Ok(response) => {
            println!("✓ Order {} is {:?}", response.order.order_id, response.order.order_state);
            response.order
        }
        Err(e) => {
            println!("✗ Error: {}", e);
            return;
        }
    };

    match client.cancel_order(&placed.order_id).await {
        Ok(order) => println!("✓ Cancelled {} ({:?})", order.order_id, order.order_state),
        Err(e) => println!("✗ Error: {}", e),
    }

    println!("\n✓ Trading example complete");
}
