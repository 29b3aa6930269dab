//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use doku_client::RepaymentClient;
use doku_types::repayment::{NOTIFY_CONTINUE, NOTIFY_STOP};
use doku_types::{HandlerError, RepaymentHandler, WebhookError};

/// Application state shared across handlers.
pub struct AppState<H: RepaymentHandler> {
    pub client: RepaymentClient,
    pub handler: H,
}

/// Why a webhook was refused. Every rejection answers `STOP`.
#[derive(Debug)]
pub enum Rejection {
    Invalid(WebhookError),
    UnknownPaymentCode(String),
    Internal(String),
}

impl From<WebhookError> for Rejection {
    fn from(err: WebhookError) -> Self {
        Rejection::Invalid(err)
    }
}

impl From<HandlerError> for Rejection {
    fn from(err: HandlerError) -> Self {
        Rejection::Internal(err.to_string())
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        let status = match &self {
            Rejection::Invalid(err) => {
                tracing::warn!(reason = %err, "webhook rejected");
                StatusCode::BAD_REQUEST
            }
            Rejection::UnknownPaymentCode(code) => {
                tracing::warn!(payment_code = %code, "unknown payment code");
                StatusCode::NOT_FOUND
            }
            Rejection::Internal(msg) => {
                tracing::error!(error = %msg, "webhook handler failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, NOTIFY_STOP).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Payment code inquiry: verify, resolve the bill, reply with XML.
#[tracing::instrument(skip(state, body))]
pub async fn inquiry<H: RepaymentHandler>(
    State(state): State<Arc<AppState<H>>>,
    body: String,
) -> Result<Response, Rejection> {
    let req = state.client.parse_inquiry_request(&body)?;
    tracing::info!(
        payment_code = %req.payment_code,
        channel = %req.payment_channel,
        "inquiry received"
    );

    let bill = state
        .handler
        .find_bill(&req)
        .await?
        .ok_or_else(|| Rejection::UnknownPaymentCode(req.payment_code.clone()))?;

    let reply = state.client.inquiry_response(&req.payment_code, &bill);
    let xml = state
        .client
        .inquiry_response_xml(&reply)
        .map_err(|e| Rejection::Internal(e.to_string()))?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/xml")],
        xml,
    )
        .into_response())
}

/// Payment notification: verify, record, acknowledge.
#[tracing::instrument(skip(state, body))]
pub async fn notify<H: RepaymentHandler>(
    State(state): State<Arc<AppState<H>>>,
    body: String,
) -> Result<impl IntoResponse, Rejection> {
    let req = state.client.parse_notify_request(&body)?;
    tracing::info!(
        trans_id_merchant = %req.trans_id_merchant,
        response_code = %req.response_code,
        amount = %req.amount,
        "notify received"
    );

    state.handler.record_notify(req).await?;
    Ok((StatusCode::OK, NOTIFY_CONTINUE))
}
