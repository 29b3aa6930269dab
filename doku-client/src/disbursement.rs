//! KirimDoku disbursement client.

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;

use doku_crypto::generate_signature;
use doku_types::{Credentials, Environment};
use doku_types::disbursement::{
    Account, InquiryRequest, InquiryResponse, MessageResponse, Person, RemitRequest,
    RemitResponse,
};

use crate::ClientError;
use crate::config::{ClientConfig, normalize_base_url};
use crate::transport::{ExactCaseTransport, RawResponse};

/// Header carrying the agent key. DOKU matches header names case-sensitively,
/// so these requests go through [`ExactCaseTransport`].
pub const AGENT_KEY_HEADER: &str = "agentKey";
/// Header carrying the caller's request id.
pub const REQUEST_ID_HEADER: &str = "requestId";
/// Header carrying the AES signature of `agentKey + requestId`.
pub const SIGNATURE_HEADER: &str = "signature";

/// Disbursement (cash-in) API client.
#[derive(Debug, Clone)]
pub struct DisbursementClient {
    credentials: Credentials,
    base_url: String,
    transport: ExactCaseTransport,
}

impl DisbursementClient {
    /// Creates a client for the production or staging preset.
    pub fn new(
        agent_key: impl Into<String>,
        enc_key: impl Into<String>,
        is_production: bool,
    ) -> Self {
        let config = ClientConfig::new(Environment::from_production_flag(is_production));
        Self {
            credentials: Credentials::new(agent_key, enc_key),
            base_url: config.disbursement_url(),
            transport: ExactCaseTransport::default(),
        }
    }

    /// Creates a client from explicit configuration.
    pub fn from_config(
        agent_key: impl Into<String>,
        enc_key: impl Into<String>,
        config: &ClientConfig,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            credentials: Credentials::new(agent_key, enc_key),
            base_url: config.disbursement_url(),
            transport: config.exact_case_transport(),
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

    /// Builds the three signing headers, in order, with their exact names.
    pub fn credential_headers(
        &self,
        request_id: &str,
    ) -> Result<Vec<(&'static str, String)>, ClientError> {
        let signature = generate_signature(
            self.credentials.id(),
            request_id,
            self.credentials.secret(),
        )?;
        Ok(vec![
            (AGENT_KEY_HEADER, self.credentials.id().to_string()),
            (REQUEST_ID_HEADER, request_id.to_string()),
            (SIGNATURE_HEADER, signature),
        ])
    }

    /// Checks that the API is reachable and the credentials are accepted.
    #[tracing::instrument(skip(self))]
    pub async fn ping(&self, request_id: &str) -> Result<MessageResponse, ClientError> {
        self.get("/ping", request_id).await
    }

    /// Quotes a domestic IDR bank transfer.
    ///
    /// The returned `inquiry.idToken` must be passed unchanged to [`Self::remit`].
    #[tracing::instrument(skip(self, account), fields(bank = %account.bank.code))]
    pub async fn inquiry(
        &self,
        request_id: &str,
        amount: f64,
        account: &Account,
    ) -> Result<InquiryResponse, ClientError> {
        let req = InquiryRequest::domestic(amount, account.clone());
        self.post("/cashin/inquiry", request_id, &req).await
    }

    /// Commits the transfer quoted by a previous inquiry.
    #[allow(clippy::too_many_arguments)]
    #[tracing::instrument(skip(self, account, sender, beneficiary, note))]
    pub async fn remit(
        &self,
        request_id: &str,
        token: &str,
        amount: f64,
        account: &Account,
        sender: &Person,
        beneficiary: &Person,
        note: &str,
    ) -> Result<RemitResponse, ClientError> {
        let req = RemitRequest::domestic(
            token,
            amount,
            account.clone(),
            sender.clone(),
            beneficiary.clone(),
            note,
        );
        self.post("/cashin/remit", request_id, &req).await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        request_id: &str,
    ) -> Result<T, ClientError> {
        let headers = self.request_headers(request_id, false)?;
        let resp = self
            .transport
            .send("GET", &format!("{}{}", self.base_url, path), &headers, None)
            .await?;
        handle_response(resp)
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        request_id: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let payload = serde_json::to_vec(body)?;
        let headers = self.request_headers(request_id, true)?;
        let resp = self
            .transport
            .send(
                "POST",
                &format!("{}{}", self.base_url, path),
                &headers,
                Some(payload.as_slice()),
            )
            .await?;
        handle_response(resp)
    }

    /// Content negotiation headers followed by the signing headers.
    fn request_headers(
        &self,
        request_id: &str,
        json_body: bool,
    ) -> Result<Vec<(&'static str, String)>, ClientError> {
        let mut headers = vec![("Accept", "application/json".to_string())];
        if json_body {
            headers.push(("Content-Type", "application/json".to_string()));
        }
        headers.extend(self.credential_headers(request_id)?);
        Ok(headers)
    }
}

/// Any status other than 200 is decoded as a `{status, message}` envelope.
fn handle_response<T: DeserializeOwned>(resp: RawResponse) -> Result<T, ClientError> {
    let body = resp.text();
    tracing::debug!(status = resp.status, %body, "disbursement response");

    if resp.status != StatusCode::OK.as_u16() {
        let error: MessageResponse = serde_json::from_str(&body)?;
        tracing::warn!(
            status = resp.status,
            message = %error.message,
            "disbursement call failed"
        );
        return Err(ClientError::Api {
            status: resp.status,
            message: error.message,
        });
    }

    Ok(serde_json::from_str(&body)?)
}
