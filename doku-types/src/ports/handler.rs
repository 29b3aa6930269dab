//! Repayment webhook port trait.

use crate::dto::repayment::{Bill, InquiryRequest, NotifyRequest};
use crate::error::HandlerError;

/// Merchant-side handling of verified repayment webhooks.
///
/// Requests reach this trait only after their WORDS have been checked.
#[async_trait::async_trait]
pub trait RepaymentHandler: Send + Sync + 'static {
    /// Resolves the bill behind a payment code, `None` when unknown.
    async fn find_bill(&self, req: &InquiryRequest) -> Result<Option<Bill>, HandlerError>;

    /// Records a payment notification.
    async fn record_notify(&self, req: NotifyRequest) -> Result<(), HandlerError>;
}
