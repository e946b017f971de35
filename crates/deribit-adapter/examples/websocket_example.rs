/*
[INPUT]:  Testnet WebSocket endpoint and subscription channels
[OUTPUT]: Multiplexed calls and streamed ticker notifications
[POS]:    Examples - WebSocket transport usage
[UPDATE]: When WebSocket API changes
*/

use deribit_adapter::*;
use tokio::time::{Duration, timeout};

/// Example: one WebSocket connection carrying concurrent calls and a subscription
#[tokio::main]
async fn main() {
    println!("=== Deribit WebSocket Example ===\n");

    let mut ws = DeribitWebSocket::new(ClientConfig::testnet());
    let Some(mut notifications) = ws.take_notifications() else {
        eprintln!("Notification receiver already taken");
        return;
    };

    if let Err(e) = ws.connect().await {
        eprintln!("Failed to connect: {}", e);
        return;
    }
    println!("✓ Connected to {}", ws.url());

    // Both calls share the socket; responses are matched by id
    let (time, book) = tokio::join!(ws.get_time(), ws.get_order_book("ETH-PERPETUAL", Some(3)));
    match time {
        Ok(ms) => println!("✓ Server time: {:?}", millis_to_utc(ms)),
        Err(e) => println!("✗ Error: {}", e),
    }
    match book {
        Ok(book) => println!("✓ ETH-PERPETUAL spread: {:?}", book.spread()),
        Err(e) => println!("✗ Error: {}", e),
    }

    let channels = vec!["ticker.BTC-PERPETUAL.100ms".to_string()];
    match ws.subscribe(&channels).await {
        Ok(confirmed) => println!("✓ Subscribed: {:?}", confirmed),
        Err(e) => println!("✗ Error: {}", e),
    }

    for _ in 0..3 {
        match timeout(Duration::from_secs(5), notifications.recv()).await {
            Ok(Some(notification)) => println!(
                "  {} -> {}",
                notification.channel().unwrap_or("?"),
                notification.data().map(|d| d.to_string()).unwrap_or_default()
            ),
            Ok(None) => break,
            Err(_) => {
                println!("  no notification within 5s");
                break;
            }
        }
    }

    ws.close().await;
    println!("\n✓ WebSocket example complete");
}
