//! `ContentStore` over an upload endpoint plus a read gateway, such as a
//! pinning service fronted by an IPFS HTTP gateway.
//!
//! Uploads return the store-issued address. Reads go through the gateway,
//! which answers 404 until the upload has propagated; that is reported as
//! not-yet-resolvable so callers back off and retry.

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use roastduel_core::content::ContentAddress;
use roastduel_core::error::DuelError;
use roastduel_core::ports::ContentStore;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::status::{error_from_response, map_send_error};

#[derive(Debug, Deserialize)]
struct UploadResponse {
    cid: String,
}

/// Gateway-backed content store.
#[derive(Debug, Clone)]
pub struct GatewayContentStore {
    client: reqwest::Client,
    upload_url: String,
    gateway_url: String,
    token: Option<String>,
}

impl GatewayContentStore {
    /// Creates a store that uploads to `upload_url` and reads from
    /// `{gateway_url}/{address}`.
    #[must_use]
    pub fn new(
        upload_url: impl Into<String>,
        gateway_url: impl Into<String>,
        token: Option<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            upload_url: upload_url.into(),
            gateway_url: gateway_url.into().trim_end_matches('/').to_owned(),
            token,
        }
    }
}

#[async_trait]
impl ContentStore for GatewayContentStore {
    #[instrument(skip_all, fields(bytes = bytes.len()))]
    async fn put(&self, bytes: &[u8]) -> Result<ContentAddress, DuelError> {
        let operation = "store.put";
        let mut request = self
            .client
            .post(&self.upload_url)
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(bytes.to_vec());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|err| map_send_error(operation, &err))?;
        if !response.status().is_success() {
            return Err(error_from_response(operation, response).await);
        }

        let upload: UploadResponse = response
            .json()
            .await
            .map_err(|err| DuelError::MalformedResponse(format!("{operation}: {err}")))?;
        let address = ContentAddress::new(upload.cid);
        if !address.is_well_formed() {
            return Err(DuelError::MalformedResponse(format!(
                "{operation}: store issued an unusable address {address:?}"
            )));
        }
        debug!(%address, "content uploaded");
        Ok(address)
    }

    #[instrument(skip_all, fields(%address))]
    async fn get(&self, address: &ContentAddress) -> Result<Vec<u8>, DuelError> {
        let operation = "store.get";
        if !address.is_well_formed() {
            return Err(DuelError::Validation(format!(
                "malformed content address {address:?}"
            )));
        }
        let url = format!("{}/{}", self.gateway_url, address);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| map_send_error(operation, &err))?;

        match response.status() {
            status if status.is_success() => {
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|err| map_send_error(operation, &err))?;
                Ok(bytes.to_vec())
            }
            StatusCode::NOT_FOUND => Err(DuelError::NotYetResolvable(address.clone())),
            StatusCode::GONE => Err(DuelError::ContentNotFound(address.clone())),
            _ => Err(error_from_response(operation, response).await),
        }
    }
}
