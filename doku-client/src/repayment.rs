//! Payment code (repayment) client.

use chrono::{DateTime, FixedOffset, Utc};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use doku_crypto::WordsSigner;
use doku_types::repayment::{
    Bill, CHAIN_MERCHANT_NONE, CURRENCY_IDR, CheckStatusRequest, CheckStatusResponse,
    InquiryRequest, InquiryResponse, NotifyRequest, RESPONSE_CODE_SUCCESS,
};
use doku_types::{Environment, WebhookError, format_amount};

use crate::ClientError;
use crate::config::{ClientConfig, normalize_base_url};

/// DOKU timestamps are Jakarta local time (UTC+7).
const WIB_OFFSET_SECS: i32 = 7 * 3600;
const REQUEST_DATETIME_FORMAT: &str = "%Y%m%d%H%M%S";

/// Repayment API client.
#[derive(Debug, Clone)]
pub struct RepaymentClient {
    signer: WordsSigner,
    base_url: String,
    http: Client,
}

impl RepaymentClient {
    /// Creates a client for the production or staging preset.
    pub fn new(
        mall_id: impl Into<String>,
        shared_key: impl Into<String>,
        is_production: bool,
    ) -> Self {
        let config = ClientConfig::new(Environment::from_production_flag(is_production));
        Self {
            signer: WordsSigner::new(mall_id, shared_key),
            base_url: config.repayment_url(),
            http: Client::new(),
        }
    }

    /// Creates a client from explicit configuration.
    pub fn from_config(
        mall_id: impl Into<String>,
        shared_key: impl Into<String>,
        config: &ClientConfig,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            signer: WordsSigner::new(mall_id, shared_key),
            base_url: config.repayment_url(),
            http: config.http_client()?,
        })
    }

    /// Points the client at another base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = normalize_base_url(&base_url.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn signer(&self) -> &WordsSigner {
        &self.signer
    }

    pub fn mall_id(&self) -> &str {
        self.signer.mall_id()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Words
    // ─────────────────────────────────────────────────────────────────────────

    pub fn make_words(&self, amount: f64, trans_id_merchant: &str) -> String {
        self.signer.words(amount, trans_id_merchant)
    }

    pub fn make_words_for_inquiry(&self, payment_code: &str) -> String {
        self.signer.words_for_inquiry(payment_code)
    }

    pub fn make_words_for_notify(
        &self,
        amount: &str,
        trans_id_merchant: &str,
        result_msg: &str,
        verify_status: &str,
    ) -> String {
        self.signer
            .words_for_notify(amount, trans_id_merchant, result_msg, verify_status)
    }

    pub fn make_words_for_check_status(&self, trans_id_merchant: &str) -> String {
        self.signer.words_for_check_status(trans_id_merchant)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inbound webhooks
    // ─────────────────────────────────────────────────────────────────────────

    /// Parses and verifies a form-encoded payment code inquiry.
    pub fn parse_inquiry_request(&self, body: &str) -> Result<InquiryRequest, WebhookError> {
        let req: InquiryRequest = parse_form(body)?;

        require("PAYMENTCODE", &req.payment_code)?;
        require("WORDS", &req.words)?;

        if !self.signer.verify_inquiry(&req.payment_code, &req.words) {
            tracing::warn!(payment_code = %req.payment_code, "inquiry words mismatch");
            return Err(WebhookError::InvalidWords);
        }

        Ok(req)
    }

    /// Parses and verifies a form-encoded payment notification.
    pub fn parse_notify_request(&self, body: &str) -> Result<NotifyRequest, WebhookError> {
        let req: NotifyRequest = parse_form(body)?;

        require("AMOUNT", &req.amount)?;
        require("TRANSIDMERCHANT", &req.trans_id_merchant)?;
        require("RESULTMSG", &req.result_msg)?;
        require("VERIFYSTATUS", &req.verify_status)?;
        require("WORDS", &req.words)?;
        require("PAYMENTCODE", &req.payment_code)?;

        if !self.signer.verify_notify(
            &req.amount,
            &req.trans_id_merchant,
            &req.result_msg,
            &req.verify_status,
            &req.words,
        ) {
            tracing::warn!(trans_id_merchant = %req.trans_id_merchant, "notify words mismatch");
            return Err(WebhookError::InvalidWords);
        }

        Ok(req)
    }

    /// Builds the `INQUIRY_RESPONSE` reply for a verified inquiry.
    pub fn inquiry_response(&self, payment_code: &str, bill: &Bill) -> InquiryResponse {
        self.inquiry_response_at(payment_code, bill, Utc::now())
    }

    /// Same as [`Self::inquiry_response`] with an explicit request time.
    pub fn inquiry_response_at(
        &self,
        payment_code: &str,
        bill: &Bill,
        now: DateTime<Utc>,
    ) -> InquiryResponse {
        let amount = format_amount(bill.amount);
        InquiryResponse {
            payment_code: payment_code.to_string(),
            purchase_amount: amount.clone(),
            min_amount: format_amount(bill.min_amount.unwrap_or(bill.amount)),
            max_amount: format_amount(bill.max_amount.unwrap_or(bill.amount)),
            amount,
            trans_id_merchant: bill.trans_id_merchant.clone(),
            words: self.signer.words(bill.amount, &bill.trans_id_merchant),
            request_datetime: format_request_datetime(now),
            currency: CURRENCY_IDR.to_string(),
            purchase_currency: CURRENCY_IDR.to_string(),
            session_id: bill.session_id.clone(),
            email: bill.email.clone(),
            basket: bill.basket.clone(),
            additional_data: bill.additional_data.clone(),
            name: bill.name.clone(),
            response_code: RESPONSE_CODE_SUCCESS.to_string(),
        }
    }

    /// Serializes an inquiry reply to the XML DOKU expects.
    pub fn inquiry_response_xml(&self, response: &InquiryResponse) -> Result<String, ClientError> {
        Ok(quick_xml::se::to_string(response)?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Outbound
    // ─────────────────────────────────────────────────────────────────────────

    /// Queries the status of a transaction.
    ///
    /// A `RESPONSECODE` other than `0000` is a failure even on HTTP 200. A
    /// successful status is returned only when its WORDS verify.
    #[tracing::instrument(skip(self))]
    pub async fn check_status(
        &self,
        trans_id_merchant: &str,
        session_id: &str,
    ) -> Result<CheckStatusResponse, ClientError> {
        let req = CheckStatusRequest {
            mall_id: self.signer.mall_id().to_string(),
            chain_merchant: CHAIN_MERCHANT_NONE.to_string(),
            trans_id_merchant: trans_id_merchant.to_string(),
            session_id: session_id.to_string(),
            words: self.signer.words_for_check_status(trans_id_merchant),
        };

        let resp = self
            .http
            .post(format!("{}/Suite/CheckStatus", self.base_url))
            .form(&req)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        tracing::debug!(status = status.as_u16(), %body, "check status response");

        if status != StatusCode::OK {
            return Err(error_from_xml(status, &body));
        }

        let result: CheckStatusResponse = quick_xml::de::from_str(&body)?;
        if !result.is_success() {
            tracing::warn!(
                code = %result.response_code,
                message = %result.result_msg,
                "check status rejected"
            );
            return Err(ClientError::Vendor {
                code: result.response_code,
                message: result.result_msg,
            });
        }

        // Signed like a notify: amount, ids, result message, verify status.
        if !self.signer.verify_notify(
            &result.amount,
            &result.trans_id_merchant,
            &result.result_msg,
            &result.verify_status,
            &result.words,
        ) {
            tracing::warn!(
                trans_id_merchant = %result.trans_id_merchant,
                "check status words mismatch"
            );
            return Err(WebhookError::InvalidWords.into());
        }

        Ok(result)
    }
}

/// Decodes a form body. A repeated key keeps its first value.
fn parse_form<T: DeserializeOwned>(body: &str) -> Result<T, WebhookError> {
    let pairs: Vec<(String, String)> =
        serde_urlencoded::from_str(body).map_err(|e| WebhookError::Malformed(e.to_string()))?;

    let mut fields = serde_json::Map::new();
    for (key, value) in pairs {
        fields
            .entry(key)
            .or_insert(serde_json::Value::String(value));
    }

    serde_json::from_value(serde_json::Value::Object(fields))
        .map_err(|e| WebhookError::Malformed(e.to_string()))
}

fn require(field: &'static str, value: &str) -> Result<(), WebhookError> {
    if value.is_empty() {
        return Err(WebhookError::MissingField(field));
    }
    Ok(())
}

/// Non-200 bodies are read as `PAYMENT_STATUS` XML; when that yields no
/// `RESULTMSG` the raw body (or the status reason) becomes the message.
fn error_from_xml(status: StatusCode, body: &str) -> ClientError {
    let message = quick_xml::de::from_str::<CheckStatusResponse>(body)
        .ok()
        .map(|r| r.result_msg)
        .filter(|m| !m.is_empty())
        .or_else(|| Some(body.trim().to_string()).filter(|b| !b.is_empty()))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        });

    ClientError::Api {
        status: status.as_u16(),
        message,
    }
}

fn format_request_datetime(now: DateTime<Utc>) -> String {
    match FixedOffset::east_opt(WIB_OFFSET_SECS) {
        Some(wib) => now.with_timezone(&wib).format(REQUEST_DATETIME_FORMAT).to_string(),
        None => now.format(REQUEST_DATETIME_FORMAT).to_string(),
    }
}
