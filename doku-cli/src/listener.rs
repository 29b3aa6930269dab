//! Handler backing `doku webhook listen`.

use doku_types::repayment::{Bill, InquiryRequest, NotifyRequest};
use doku_types::{HandlerError, RepaymentHandler};

/// Bills every payment code at a fixed amount and prints notifications.
pub struct ConsoleHandler {
    amount: f64,
}

impl ConsoleHandler {
    pub fn new(amount: f64) -> Self {
        Self { amount }
    }
}

#[async_trait::async_trait]
impl RepaymentHandler for ConsoleHandler {
    async fn find_bill(&self, req: &InquiryRequest) -> Result<Option<Bill>, HandlerError> {
        println!("INQUIRY {} via channel {}", req.payment_code, req.payment_channel);
        Ok(Some(Bill {
            amount: self.amount,
            trans_id_merchant: req.payment_code.clone(),
            session_id: uuid::Uuid::new_v4().simple().to_string(),
            ..Default::default()
        }))
    }

    async fn record_notify(&self, req: NotifyRequest) -> Result<(), HandlerError> {
        let json =
            serde_json::to_string_pretty(&req).map_err(|e| HandlerError::new(e.to_string()))?;
        println!("NOTIFY");
        println!("{}", json);
        println!("----------------------------------------");
        Ok(())
    }
}
