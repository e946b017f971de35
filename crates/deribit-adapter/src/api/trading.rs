/*
[INPUT]:  Order requests and order ids
[OUTPUT]: Order placement and cancellation results
[POS]:    API layer - private trading methods (require credentials)
[UPDATE]: When adding new trading endpoints or changing order flow
*/

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::info;

use crate::http::{DeribitError, Result};
use crate::jsonrpc::JsonRpcTransport;
use crate::types::{CancelOrderParams, Order, OrderRequest, OrderResponse, decode_record};

/// Private trading methods, available on every transport
#[async_trait]
pub trait TradingApi {
    /// Place an order via `private/buy` or `private/sell`, chosen by direction
    async fn create_order(&self, request: OrderRequest) -> Result<OrderResponse>;

    /// `private/cancel`
    async fn cancel_order(&self, order_id: &str) -> Result<Order>;
}

fn validate_order(request: &OrderRequest) -> Result<()> {
    if request.instrument_name.trim().is_empty() {
        return Err(DeribitError::InvalidArgument(
            "instrument name must not be empty".to_string(),
        ));
    }
    if request.amount <= Decimal::ZERO {
        return Err(DeribitError::InvalidArgument(format!(
            "order amount must be positive, got {}",
            request.amount
        )));
    }
    if request.order_type.requires_price() && request.price.is_none() {
        return Err(DeribitError::InvalidArgument(format!(
            "{:?} order requires a price",
            request.order_type
        )));
    }
    Ok(())
}

fn require_credentials<T: JsonRpcTransport>(transport: &T, method: &str) -> Result<()> {
    if transport.has_credentials() {
        Ok(())
    } else {
        Err(DeribitError::InvalidArgument(format!(
            "{method} requires API credentials"
        )))
    }
}

#[async_trait]
impl<T: JsonRpcTransport> TradingApi for T {
    async fn create_order(&self, request: OrderRequest) -> Result<OrderResponse> {
        let method = request.direction.order_method();
        require_credentials(self, method)?;
        validate_order(&request)?;

        let value = self.call_typed(method, &request).await?;
        let response: OrderResponse = decode_record("OrderResponse", value)?;
        info!(
            order_id = %response.order.order_id,
            instrument = %response.order.instrument_name,
            state = ?response.order.order_state,
            "order placed"
        );
        Ok(response)
    }

    async fn cancel_order(&self, order_id: &str) -> Result<Order> {
        require_credentials(self, "private/cancel")?;
        if order_id.trim().is_empty() {
            return Err(DeribitError::InvalidArgument(
                "order id must not be empty".to_string(),
            ));
        }
        let value = self
            .call_typed("private/cancel", CancelOrderParams { order_id })
            .await?;
        decode_record("Order", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClientConfig, Credentials};
    use crate::http::DeribitClient;
    use crate::types::{Direction, OrderState};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> DeribitClient {
        DeribitClient::with_config_and_base_url(
            ClientConfig::default(),
            &format!("{}/api/v2", server.uri()),
        )
        .unwrap()
    }

    fn order_json(direction: &str) -> serde_json::Value {
        json!({
            "order_id": "ETH-349249",
            "instrument_name": "ETH-PERPETUAL",
            "direction": direction,
            "amount": 40,
            "filled_amount": 0,
            "order_state": "open",
            "order_type": "limit",
            "creation_timestamp": 1590486335742i64,
            "last_update_timestamp": 1590486335742i64,
            "price": 190.5
        })
    }

    #[tokio::test]
    async fn test_create_order_requires_credentials() {
        let server = MockServer::start().await;
        let request = OrderRequest::limit(
            Direction::Buy,
            "ETH-PERPETUAL",
            Decimal::from(40),
            Decimal::new(1905, 1),
        );
        let err = client_for(&server).create_order(request).await.unwrap_err();
        assert!(matches!(err, DeribitError::InvalidArgument(_)));
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn test_limit_order_without_price_is_rejected() {
        let server = MockServer::start().await;
        let mut request = OrderRequest::limit(
            Direction::Sell,
            "ETH-PERPETUAL",
            Decimal::from(40),
            Decimal::new(1905, 1),
        );
        request.price = None;
        let client = client_for(&server).with_credentials(Credentials::new("id", "secret"));
        let err = client.create_order(request).await.unwrap_err();
        assert!(matches!(err, DeribitError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_create_order_routes_by_direction() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/private/sell"))
            .and(body_partial_json(json!({
                "method": "private/sell",
                "params": {"instrument_name": "ETH-PERPETUAL", "amount": 40.0, "type": "limit", "price": 190.5}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": {"order": order_json("sell"), "trades": []}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).with_credentials(Credentials::new("id", "secret"));
        let request = OrderRequest::limit(
            Direction::Sell,
            "ETH-PERPETUAL",
            Decimal::from(40),
            Decimal::new(1905, 1),
        );
        let response = client.create_order(request).await.unwrap();
        assert_eq!(response.order.direction, Direction::Sell);
        assert_eq!(response.order.order_state, OrderState::Open);
    }

    #[tokio::test]
    async fn test_cancel_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/private/cancel"))
            .and(body_partial_json(json!({"params": {"order_id": "ETH-349249"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": order_json("buy")
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).with_credentials(Credentials::new("id", "secret"));
        let order = client.cancel_order("ETH-349249").await.unwrap();
        assert_eq!(order.order_id, "ETH-349249");
    }
}
