/*
[INPUT]:  Instrument name (e.g., "BTC-PERPETUAL")
[OUTPUT]: Market data (ticker, order book, funding history, server time)
[POS]:    Examples - public market data queries over HTTP
[UPDATE]: When adding new market data endpoints
*/

use deribit_adapter::*;

/// Example: Query market data (no authentication required)
///
/// Public methods work on testnet without API keys.
#[tokio::main]
async fn main() {
    println!("=== Deribit Market Data Example ===\n");

    let client = match DeribitClient::new(true) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            return;
        }
    };
    println!("✓ HTTP client created for {}\n", client.base_url());

    let instrument = "BTC-PERPETUAL";

    println!("Querying server time...");
    match client.get_time().await {
        Ok(ms) => println!("✓ Server time: {:?}", millis_to_utc(ms)),
        Err(e) => println!("✗ Error: {}", e),
    }

    println!("\nQuerying ticker for {}...", instrument);
    match client.get_ticker(instrument).await {
        Ok(ticker) => println!(
            "✓ Mark {} / index {} at {:?}",
            ticker.mark_price,
            ticker.index_price,
            ticker.datetime()
        ),
        Err(e) => println!("✗ Error: {}", e),
    }

    println!("\nQuerying order book for {}...", instrument);
    match client.get_order_book(instrument, Some(5)).await {
        Ok(book) => {
            println!("✓ Spread: {:?}", book.spread());
            for level in &book.bids {
                println!("  bid {} x {}", level.price(), level.amount());
            }
            for level in &book.asks {
                println!("  ask {} x {}", level.price(), level.amount());
            }
        }
        Err(e) => println!("✗ Error: {}", e),
    }

    println!("\nQuerying funding rate history for {}...", instrument);
    let end = chrono::Utc::now().timestamp_millis();
    let start = end - 8 * 60 * 60 * 1000;
    match client.get_funding_rate_history(instrument, start, end).await {
        Ok(entries) => println!("✓ {} funding entries", entries.len()),
        Err(e) => println!("✗ Error: {}", e),
    }

    println!("\n✓ Market data example complete");
}
