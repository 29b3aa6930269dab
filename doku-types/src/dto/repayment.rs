//! Repayment (payment code) form and XML payloads.
//!
//! DOKU names every field in uppercase without separators; the serde renames
//! below are the wire contract and must not change.

use serde::{Deserialize, Serialize};

/// Value sent as `CHAINMERCHANT` when the merchant has no chain.
pub const CHAIN_MERCHANT_NONE: &str = "NA";
/// `RESPONSECODE` of a successful operation.
pub const RESPONSE_CODE_SUCCESS: &str = "0000";
/// ISO 4217 numeric code of the rupiah, as used in `CURRENCY`.
pub const CURRENCY_IDR: &str = "360";
/// Acknowledgement body for an accepted notify webhook.
pub const NOTIFY_CONTINUE: &str = "CONTINUE";
/// Body returned for a rejected webhook.
pub const NOTIFY_STOP: &str = "STOP";

// ─────────────────────────────────────────────────────────────────────────────
// Inbound webhooks (form encoded)
// ─────────────────────────────────────────────────────────────────────────────

/// Payment code inquiry posted by DOKU before the customer pays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InquiryRequest {
    #[serde(rename = "MALLID")]
    pub mall_id: String,
    #[serde(rename = "CHAINMERCHANT")]
    pub chain_merchant: String,
    #[serde(rename = "PAYMENTCHANNEL")]
    pub payment_channel: String,
    #[serde(rename = "PAYMENTCODE")]
    pub payment_code: String,
    #[serde(rename = "WORDS")]
    pub words: String,
}

/// Payment notification posted by DOKU once a payment settles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyRequest {
    #[serde(rename = "AMOUNT")]
    pub amount: String,
    #[serde(rename = "TRANSIDMERCHANT")]
    pub trans_id_merchant: String,
    #[serde(rename = "WORDS")]
    pub words: String,
    #[serde(rename = "STATUSTYPE")]
    pub status_type: String,
    #[serde(rename = "RESPONSECODE")]
    pub response_code: String,
    #[serde(rename = "APPROVALCODE")]
    pub approval_code: String,
    #[serde(rename = "RESULTMSG")]
    pub result_msg: String,
    #[serde(rename = "PAYMENTCHANNEL")]
    pub payment_channel: String,
    #[serde(rename = "PAYMENTCODE")]
    pub payment_code: String,
    #[serde(rename = "SESSIONID")]
    pub session_id: String,
    #[serde(rename = "BANK")]
    pub bank: String,
    #[serde(rename = "MCN")]
    pub mcn: String,
    #[serde(rename = "PAYMENTDATETIME")]
    pub payment_datetime: String,
    #[serde(rename = "VERIFYID")]
    pub verify_id: String,
    #[serde(rename = "VERIFYSCORE")]
    pub verify_score: String,
    #[serde(rename = "VERIFYSTATUS")]
    pub verify_status: String,
    #[serde(rename = "CURRENCY")]
    pub currency: String,
    #[serde(rename = "PURCHASECURRENCY")]
    pub purchase_currency: String,
    #[serde(rename = "BRAND")]
    pub brand: String,
    #[serde(rename = "CHNAME")]
    pub chname: String,
    #[serde(rename = "THREEDSECURESTATUS")]
    pub threed_secure_status: String,
    #[serde(rename = "LIABILITY")]
    pub liability: String,
    #[serde(rename = "EDUSTATUS")]
    pub edu_status: String,
    #[serde(rename = "CUSTOMERID")]
    pub customer_id: String,
    #[serde(rename = "TOKENID")]
    pub token_id: String,
}

impl NotifyRequest {
    /// True when DOKU reports the payment as approved.
    pub fn is_success(&self) -> bool {
        self.response_code == RESPONSE_CODE_SUCCESS
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Inquiry reply (XML)
// ─────────────────────────────────────────────────────────────────────────────

/// Bill details a merchant resolves for a payment code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub amount: f64,
    pub trans_id_merchant: String,
    pub session_id: String,
    pub name: String,
    pub email: String,
    /// `item,price,qty,subtotal;` entries
    #[serde(default)]
    pub basket: String,
    #[serde(default)]
    pub additional_data: String,
    /// Defaults to `amount` when absent.
    #[serde(default)]
    pub min_amount: Option<f64>,
    /// Defaults to `amount` when absent.
    #[serde(default)]
    pub max_amount: Option<f64>,
}

/// `INQUIRY_RESPONSE` document returned to DOKU for a payment code inquiry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "INQUIRY_RESPONSE", default)]
pub struct InquiryResponse {
    #[serde(rename = "PAYMENTCODE")]
    pub payment_code: String,
    #[serde(rename = "AMOUNT")]
    pub amount: String,
    #[serde(rename = "PURCHASEAMOUNT")]
    pub purchase_amount: String,
    #[serde(rename = "MINAMOUNT")]
    pub min_amount: String,
    #[serde(rename = "MAXAMOUNT")]
    pub max_amount: String,
    #[serde(rename = "TRANSIDMERCHANT")]
    pub trans_id_merchant: String,
    #[serde(rename = "WORDS")]
    pub words: String,
    #[serde(rename = "REQUESTDATETIME")]
    pub request_datetime: String,
    #[serde(rename = "CURRENCY")]
    pub currency: String,
    #[serde(rename = "PURCHASECURRENCY")]
    pub purchase_currency: String,
    #[serde(rename = "SESSIONID")]
    pub session_id: String,
    #[serde(rename = "EMAIL")]
    pub email: String,
    #[serde(rename = "BASKET")]
    pub basket: String,
    #[serde(rename = "ADDITIONALDATA")]
    pub additional_data: String,
    #[serde(rename = "NAME")]
    pub name: String,
    #[serde(rename = "RESPONSECODE")]
    pub response_code: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Check status (form out, XML in)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckStatusRequest {
    #[serde(rename = "MALLID")]
    pub mall_id: String,
    #[serde(rename = "CHAINMERCHANT")]
    pub chain_merchant: String,
    #[serde(rename = "TRANSIDMERCHANT")]
    pub trans_id_merchant: String,
    #[serde(rename = "SESSIONID")]
    pub session_id: String,
    #[serde(rename = "WORDS")]
    pub words: String,
}

/// `PAYMENT_STATUS` document returned by `/Suite/CheckStatus`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "PAYMENT_STATUS", default)]
pub struct CheckStatusResponse {
    #[serde(rename = "AMOUNT")]
    pub amount: String,
    #[serde(rename = "TRANSIDMERCHANT")]
    pub trans_id_merchant: String,
    #[serde(rename = "WORDS")]
    pub words: String,
    #[serde(rename = "RESPONSECODE")]
    pub response_code: String,
    #[serde(rename = "APPROVALCODE")]
    pub approval_code: String,
    #[serde(rename = "RESULTMSG")]
    pub result_msg: String,
    #[serde(rename = "PAYMENTCHANNEL")]
    pub payment_channel: String,
    #[serde(rename = "PAYMENTCODE")]
    pub payment_code: String,
    #[serde(rename = "SESSIONID")]
    pub session_id: String,
    #[serde(rename = "BANK")]
    pub bank: String,
    #[serde(rename = "MCN")]
    pub mcn: String,
    #[serde(rename = "PAYMENTDATETIME")]
    pub payment_datetime: String,
    #[serde(rename = "VERIFYID")]
    pub verify_id: String,
    #[serde(rename = "VERIFYSCORE")]
    pub verify_score: String,
    #[serde(rename = "VERIFYSTATUS")]
    pub verify_status: String,
    #[serde(rename = "CURRENCY")]
    pub currency: String,
    #[serde(rename = "PURCHASECURRENCY")]
    pub purchase_currency: String,
    #[serde(rename = "BRAND")]
    pub brand: String,
    #[serde(rename = "CHNAME")]
    pub chname: String,
    #[serde(rename = "THREEDSECURESTATUS")]
    pub threed_secure_status: String,
    #[serde(rename = "LIABILITY")]
    pub liability: String,
    #[serde(rename = "EDUSTATUS")]
    pub edu_status: String,
}

impl CheckStatusResponse {
    pub fn is_success(&self) -> bool {
        self.response_code == RESPONSE_CODE_SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inquiry_form_field_names() {
        let body =
            "MALLID=M001&CHAINMERCHANT=NA&PAYMENTCHANNEL=36&PAYMENTCODE=8888000012345&WORDS=abc";
        let req: InquiryRequest = serde_urlencoded::from_str(body).unwrap();

        assert_eq!(req.mall_id, "M001");
        assert_eq!(req.chain_merchant, "NA");
        assert_eq!(req.payment_channel, "36");
        assert_eq!(req.payment_code, "8888000012345");
        assert_eq!(req.words, "abc");
    }

    #[test]
    fn test_notify_form_missing_fields_default_to_empty() {
        let req: NotifyRequest =
            serde_urlencoded::from_str("AMOUNT=100000.00&RESPONSECODE=0000&EXTRA=1").unwrap();

        assert_eq!(req.amount, "100000.00");
        assert!(req.is_success());
        assert!(req.result_msg.is_empty());
        assert!(req.token_id.is_empty());
    }

    #[test]
    fn test_check_status_request_form() {
        let req = CheckStatusRequest {
            mall_id: "M001".into(),
            chain_merchant: CHAIN_MERCHANT_NONE.into(),
            trans_id_merchant: "TX123".into(),
            session_id: "S1".into(),
            words: "w".into(),
        };
        assert_eq!(
            serde_urlencoded::to_string(&req).unwrap(),
            "MALLID=M001&CHAINMERCHANT=NA&TRANSIDMERCHANT=TX123&SESSIONID=S1&WORDS=w"
        );
    }

    #[test]
    fn test_check_status_response_from_xml() {
        let xml = r#"<?xml version="1.0"?>
            <PAYMENT_STATUS>
                <AMOUNT>100000.00</AMOUNT>
                <TRANSIDMERCHANT>TX123</TRANSIDMERCHANT>
                <WORDS>abc</WORDS>
                <RESPONSECODE>0000</RESPONSECODE>
                <RESULTMSG>SUCCESS</RESULTMSG>
                <PAYMENTCODE>8888000012345</PAYMENTCODE>
            </PAYMENT_STATUS>"#;
        let resp: CheckStatusResponse = quick_xml::de::from_str(xml).unwrap();

        assert!(resp.is_success());
        assert_eq!(resp.trans_id_merchant, "TX123");
        assert_eq!(resp.result_msg, "SUCCESS");
        assert!(resp.bank.is_empty());
    }

    #[test]
    fn test_inquiry_response_root_element() {
        let resp = InquiryResponse {
            payment_code: "8888000012345".into(),
            response_code: RESPONSE_CODE_SUCCESS.into(),
            ..Default::default()
        };
        let xml = quick_xml::se::to_string(&resp).unwrap();

        assert!(xml.starts_with("<INQUIRY_RESPONSE>"));
        assert!(xml.contains("<PAYMENTCODE>8888000012345</PAYMENTCODE>"));
        assert!(xml.contains("<RESPONSECODE>0000</RESPONSECODE>"));
    }
}
