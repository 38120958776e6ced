pub mod response;

use std::{future::Future, net::SocketAddr, sync::Arc};

use anyhow::{anyhow, Result};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::{
    errors::ConfigError,
    models::{
        BorrowQuote, BorrowTx, DepositTx, LenderPosition, LiquidateTx, Loan, LoanHealth, MintTx,
        PoolState, RepayTx, RepaymentCheck, UserPosition, WithdrawTx,
    },
    quote_service::QuoteService,
    read_service::ReadService,
    state_cache::StateCache,
    tx_builder::TxBuilder,
};
use response::{ApiError, ApiResponse, ApiResult};

#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<StateCache>,
    pub read_service: Arc<ReadService>,
    /// `None` when no price oracle is configured
    pub quote_service: Option<Arc<QuoteService>>,
    pub tx_builder: Arc<TxBuilder>,
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .route("/pool/state", get(get_pool_state))
        .route("/users/:address/position", get(get_user_position))
        .route("/users/:address/lender-position", get(get_lender_position))
        .route("/users/:address/loans", get(list_user_loans))
        .route("/loans/:loan_id", get(get_loan))
        .route("/loans/:loan_id/health", get(get_loan_health))
        .route("/quote/borrow", post(quote_borrow))
        .route("/tx/deposit", post(build_deposit))
        .route("/tx/borrow", post(build_borrow))
        .route("/tx/repay", post(build_repay))
        .route("/tx/repay/check", post(check_repayment))
        .route("/tx/liquidate", post(build_liquidate))
        .route("/tx/withdraw", post(build_withdraw))
        .route("/tx/mint", post(build_mint));

    Router::new().nest("/api/v1", api).with_state(state)
}

/// Serves the API until `shutdown` resolves.
pub async fn serve(
    state: AppState,
    port: u16,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting API server on {}", addr);
    axum::Server::bind(&addr)
        .serve(router(state).into_make_service())
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| ApiError::input(e.to_string()))
}

fn loan_id(path: Result<Path<u64>, PathRejection>) -> Result<u64, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|_| ApiError::input("loanId must be a uint"))
}

async fn health(State(state): State<AppState>) -> Json<ApiResponse<Value>> {
    ApiResponse::success(json!({
        "status": "ok",
        "poolStateUpdatedAt": state.cache.pool_state_updated_at().map(|t| t.to_rfc3339()),
        "nativePriceUpdatedAt": state.cache.native_price_updated_at().map(|t| t.to_rfc3339()),
    }))
}

async fn get_pool_state(State(state): State<AppState>) -> ApiResult<PoolState> {
    Ok(ApiResponse::success(state.read_service.get_pool_state().await?))
}

async fn get_user_position(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> ApiResult<UserPosition> {
    Ok(ApiResponse::success(
        state.read_service.get_user_position(&address).await?,
    ))
}

async fn get_lender_position(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> ApiResult<LenderPosition> {
    Ok(ApiResponse::success(
        state.read_service.get_lender_position(&address).await?,
    ))
}

async fn list_user_loans(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> ApiResult<Vec<Loan>> {
    Ok(ApiResponse::success(
        state.read_service.list_user_loans(&address).await?,
    ))
}

async fn get_loan(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> ApiResult<Loan> {
    let loan_id = loan_id(path)?;
    Ok(ApiResponse::success(state.read_service.get_loan(loan_id).await?))
}

async fn get_loan_health(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> ApiResult<LoanHealth> {
    let loan_id = loan_id(path)?;
    Ok(ApiResponse::success(
        state.read_service.get_loan_health(loan_id).await?,
    ))
}

#[derive(Debug, Deserialize, Serialize)]
struct AmountRequest {
    amount: String,
}

async fn quote_borrow(
    State(state): State<AppState>,
    payload: Result<Json<AmountRequest>, JsonRejection>,
) -> ApiResult<BorrowQuote> {
    let request = json_body(payload)?;
    let quote_service = state
        .quote_service
        .as_ref()
        .ok_or_else(|| anyhow!(ConfigError::OracleNotConfigured))?;
    Ok(ApiResponse::success(
        quote_service.quote_borrow_collateral(&request.amount).await?,
    ))
}

async fn build_deposit(
    State(state): State<AppState>,
    payload: Result<Json<AmountRequest>, JsonRejection>,
) -> ApiResult<DepositTx> {
    let request = json_body(payload)?;
    Ok(ApiResponse::success(
        state.tx_builder.build_deposit(&request.amount)?,
    ))
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct BorrowRequest {
    amount: String,
    duration: u64,
    collateral_wei: String,
}

async fn build_borrow(
    State(state): State<AppState>,
    payload: Result<Json<BorrowRequest>, JsonRejection>,
) -> ApiResult<BorrowTx> {
    let request = json_body(payload)?;
    Ok(ApiResponse::success(state.tx_builder.build_borrow(
        &request.amount,
        request.duration,
        &request.collateral_wei,
    )?))
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoanRequest {
    // 0 is a valid loan id
    loan_id: u64,
}

async fn build_repay(
    State(state): State<AppState>,
    payload: Result<Json<LoanRequest>, JsonRejection>,
) -> ApiResult<RepayTx> {
    let request = json_body(payload)?;
    Ok(ApiResponse::success(
        state.tx_builder.build_repay(request.loan_id).await?,
    ))
}

async fn build_liquidate(
    State(state): State<AppState>,
    payload: Result<Json<LoanRequest>, JsonRejection>,
) -> ApiResult<LiquidateTx> {
    let request = json_body(payload)?;
    Ok(ApiResponse::success(
        state.tx_builder.build_liquidate(request.loan_id).await?,
    ))
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct RepaymentCheckRequest {
    loan_id: u64,
    approved_amount: String,
}

async fn check_repayment(
    State(state): State<AppState>,
    payload: Result<Json<RepaymentCheckRequest>, JsonRejection>,
) -> ApiResult<RepaymentCheck> {
    let request = json_body(payload)?;
    Ok(ApiResponse::success(
        state
            .tx_builder
            .check_repayment_current(request.loan_id, &request.approved_amount)
            .await?,
    ))
}

#[derive(Debug, Deserialize, Serialize)]
struct WithdrawRequest {
    shares: String,
}

async fn build_withdraw(
    State(state): State<AppState>,
    payload: Result<Json<WithdrawRequest>, JsonRejection>,
) -> ApiResult<WithdrawTx> {
    let request = json_body(payload)?;
    Ok(ApiResponse::success(
        state.tx_builder.build_withdraw(&request.shares)?,
    ))
}

#[derive(Debug, Deserialize, Serialize)]
struct MintRequest {
    to: String,
    amount: String,
}

async fn build_mint(
    State(state): State<AppState>,
    payload: Result<Json<MintRequest>, JsonRejection>,
) -> ApiResult<MintTx> {
    let request = json_body(payload)?;
    Ok(ApiResponse::success(
        state.tx_builder.build_mint(&request.to, &request.amount)?,
    ))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::blockchain_manager::{mock_transport::MockTransport, test_support::*};
    use alloy::primitives::U256;
    use axum::{http::StatusCode, response::IntoResponse};
    use contract_codec::calls;

    fn app_state(transport: &Arc<MockTransport>) -> AppState {
        let cache = Arc::new(StateCache::new());
        let gateway = gateway(transport, None);
        AppState {
            cache: cache.clone(),
            read_service: Arc::new(ReadService::new(gateway.clone(), cache)),
            quote_service: None,
            tx_builder: Arc::new(TxBuilder::new(gateway, TOKEN, Duration::from_secs(60))),
        }
    }

    #[tokio::test]
    async fn test_repay_handler() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(POOL, calls::loans(0), loan_output(123_456, true));

        let payload = Ok(Json(LoanRequest { loan_id: 0 }));
        let Json(body) = build_repay(State(app_state(&transport)), payload)
            .await
            .unwrap();
        assert_eq!(body.code, 0);
        assert_eq!(
            body.data.unwrap().quote.repayment_amount,
            U256::from(123_456u64)
        );
    }

    #[tokio::test]
    async fn test_quote_without_oracle_is_internal_error() {
        let transport = Arc::new(MockTransport::new());
        let payload = Ok(Json(AmountRequest {
            amount: "1000000".to_string(),
        }));
        let err = quote_borrow(State(app_state(&transport)), payload)
            .await
            .unwrap_err();
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_deposit_handler_rejects_bad_amount() {
        let transport = Arc::new(MockTransport::new());
        let payload = Ok(Json(AmountRequest {
            amount: "1.5".to_string(),
        }));
        let err = build_deposit(State(app_state(&transport)), payload)
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
