//! Disbursement (KirimDoku cash-in) JSON payloads.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// ISO country code used for domestic transfers.
pub const DOMESTIC_COUNTRY_CODE: &str = "ID";
/// Currency code used for domestic transfers.
pub const DOMESTIC_CURRENCY_CODE: &str = "IDR";
/// Channel code of the bank transfer rail.
pub const BANK_TRANSFER_CHANNEL_CODE: &str = "07";

/// Largest magnitude below which every whole `f64` is an exact integer.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Writes whole amounts as JSON integers (`150000`, not `150000.0`).
fn serialize_amount<S: Serializer>(amount: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if amount.fract() == 0.0 && amount.abs() < MAX_EXACT_INTEGER {
        serializer.serialize_i64(*amount as i64)
    } else {
        serializer.serialize_f64(*amount)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared building blocks
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub code: String,
}

impl Country {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    pub fn indonesia() -> Self {
        Self::new(DOMESTIC_COUNTRY_CODE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
}

impl Currency {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    pub fn rupiah() -> Self {
        Self::new(DOMESTIC_CURRENCY_CODE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub code: String,
}

impl Channel {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    pub fn bank_transfer() -> Self {
        Self::new(BANK_TRANSFER_CHANNEL_CODE)
    }
}

/// Beneficiary bank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Bank {
    pub id: String,
    pub name: String,
    pub code: String,
    pub country_code: String,
}

/// Beneficiary bank account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    pub bank: Bank,
    pub number: String,
    pub name: String,
    pub address: String,
    pub city: String,
}

/// Sender or beneficiary identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(default)]
    pub id_token: String,
    #[serde(default)]
    pub country: Option<Country>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone_number: String,
    /// Format `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_id_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_id_country: Option<Country>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Responses
// ─────────────────────────────────────────────────────────────────────────────

/// Generic `{status, message}` envelope, used by ping and by every error body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageResponse {
    pub status: i32,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fees {
    #[serde(serialize_with = "serialize_amount")]
    pub total: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fund {
    pub fees: Fees,
}

/// Result of an inquiry. The token must be passed unchanged to remit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    #[serde(default)]
    pub id_token: String,
    /// Always present on the wire; a remit sends a zero fee total.
    #[serde(default, deserialize_with = "null_as_default")]
    pub fund: Fund,
}

impl Inquiry {
    /// Reference to a previous inquiry, as sent in a remit payload.
    pub fn from_token(token: impl Into<String>) -> Self {
        Self {
            id_token: token.into(),
            fund: Fund::default(),
        }
    }

    /// Total fee quoted by the inquiry, zero when absent.
    pub fn fee_total(&self) -> f64 {
        self.fund.fees.total
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InquiryResponse {
    #[serde(default)]
    pub status: i32,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub inquiry: Option<Inquiry>,
}

impl InquiryResponse {
    /// The opaque token to thread into remit, if the vendor returned one.
    pub fn token(&self) -> Option<&str> {
        self.inquiry
            .as_ref()
            .map(|i| i.id_token.as_str())
            .filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Remit {
    pub transaction_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemitResponse {
    #[serde(default)]
    pub status: i32,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub remit: Option<Remit>,
}

impl RemitResponse {
    /// Vendor transaction identifier of the committed transfer.
    pub fn transaction_id(&self) -> Option<&str> {
        self.remit
            .as_ref()
            .map(|r| r.transaction_id.as_str())
            .filter(|t| !t.is_empty())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Requests
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryRequest {
    pub sender_country: Country,
    pub sender_currency: Currency,
    pub beneficiary_country: Country,
    pub beneficiary_currency: Currency,
    pub channel: Channel,
    #[serde(serialize_with = "serialize_amount")]
    pub sender_amount: f64,
    pub beneficiary_account: Account,
}

impl InquiryRequest {
    /// Domestic IDR bank transfer inquiry.
    pub fn domestic(amount: f64, account: Account) -> Self {
        Self {
            sender_country: Country::indonesia(),
            sender_currency: Currency::rupiah(),
            beneficiary_country: Country::indonesia(),
            beneficiary_currency: Currency::rupiah(),
            channel: Channel::bank_transfer(),
            sender_amount: amount,
            beneficiary_account: account,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemitRequest {
    pub sender_country: Country,
    pub sender_currency: Currency,
    pub beneficiary_country: Country,
    pub beneficiary_currency: Currency,
    pub channel: Channel,
    #[serde(serialize_with = "serialize_amount")]
    pub sender_amount: f64,
    pub inquiry: Inquiry,
    pub sender_note: String,
    pub sender: Person,
    pub beneficiary: Person,
    pub beneficiary_account: Account,
}

impl RemitRequest {
    /// Domestic IDR bank transfer commit for a previous inquiry token.
    pub fn domestic(
        token: impl Into<String>,
        amount: f64,
        account: Account,
        sender: Person,
        beneficiary: Person,
        note: impl Into<String>,
    ) -> Self {
        Self {
            sender_country: Country::indonesia(),
            sender_currency: Currency::rupiah(),
            beneficiary_country: Country::indonesia(),
            beneficiary_currency: Currency::rupiah(),
            channel: Channel::bank_transfer(),
            sender_amount: amount,
            inquiry: Inquiry::from_token(token),
            sender_note: note.into(),
            sender,
            beneficiary,
            beneficiary_account: account,
        }
    }
}
