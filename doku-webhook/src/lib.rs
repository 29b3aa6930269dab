//! # DOKU Webhook
//!
//! Axum adapter that receives DOKU repayment webhooks, verifies their WORDS
//! through [`doku_client::RepaymentClient`] and hands the verified requests
//! to a [`doku_types::RepaymentHandler`].
//!
//! Routes:
//!
//! - `GET /health`
//! - `POST /doku/inquiry` - replies with an `INQUIRY_RESPONSE` XML document
//! - `POST /doku/notify` - replies `CONTINUE`

mod handlers;
mod server;

pub use handlers::Rejection;
pub use server::WebhookServer;
