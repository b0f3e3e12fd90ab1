//! HTTP surface: `GET /orderbook` and `GET /healthz`.

use crate::errors::{AppError, Result};
use crate::response::{ErrorBody, OrderBookResponse};
use crate::service::{BookQuery, OrderBookService};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug, Default, Deserialize)]
pub struct OrderBookParams {
    pub chain: Option<String>,
    pub pool: Option<String>,
    pub mode: Option<String>,
}

pub fn router(service: Arc<OrderBookService>) -> Router {
    Router::new()
        .route("/orderbook", get(order_book))
        .route("/healthz", get(healthz))
        .with_state(service)
}

pub async fn serve(addr: SocketAddr, service: Arc<OrderBookService>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "[HTTP] listening");
    axum::serve(listener, router(service)).await?;
    Ok(())
}

async fn order_book(
    State(service): State<Arc<OrderBookService>>,
    Query(params): Query<OrderBookParams>,
) -> std::result::Result<Json<OrderBookResponse>, AppError> {
    let query = BookQuery::parse(
        params.chain.as_deref(),
        params.pool.as_deref(),
        params.mode.as_deref(),
    )?;
    let response = service.order_book(query).await?;
    info!(
        chain = %query.chain,
        pool = ?query.pool,
        mode = %query.mode,
        bids = response.bids.len(),
        asks = response.asks.len(),
        cached = response.cached,
        "[HTTP] order book served"
    );
    Ok(Json(response))
}

async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::InvalidPool { details, .. } => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: self.to_string(),
                    details: Some(details.clone()),
                },
            ),
            e if e.is_client_error() => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: e.to_string(),
                    details: None,
                },
            ),
            e => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: e.to_string(),
                    details: None,
                },
            ),
        };
        if status.is_server_error() {
            error!(error = %body.error, "[HTTP] request failed");
        } else {
            warn!(error = %body.error, "[HTTP] request rejected");
        }
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::dex::ChainRegistry;
    use crate::pricing::MockMarketData;
    use crate::service::ServiceSettings;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use std::time::Duration;
    use tower::ServiceExt;

    fn app() -> Router {
        let service = OrderBookService::new(
            ChainRegistry::new(),
            Arc::new(MockMarketData::new()),
            Arc::new(MemoryCache::new(8)),
            ServiceSettings {
                max_tick_reads: 4,
                simple_ttl: Duration::from_secs(60),
                advanced_ttl: Duration::from_secs(120),
            },
        );
        router(Arc::new(service))
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_check() {
        let (status, body) = get_json("/healthz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn missing_pool_is_bad_request() {
        let (status, body) = get_json("/orderbook?chain=base").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Pool address required" }));
    }

    #[tokio::test]
    async fn unknown_chain_is_bad_request() {
        let (status, body) =
            get_json("/orderbook?chain=solana&pool=0x88e6a0c2ddd26feeb64f039a2c41296fcb3f5640")
                .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid chain");
    }

    #[tokio::test]
    async fn unknown_mode_is_bad_request() {
        let (status, _) =
            get_json("/orderbook?pool=0x88e6a0c2ddd26feeb64f039a2c41296fcb3f5640&mode=pro").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_pool_carries_details() {
        let response = AppError::InvalidPool {
            chain: "arbitrum".into(),
            details: "execution reverted".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_errors_map_to_500() {
        let response = AppError::Other("boom".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
