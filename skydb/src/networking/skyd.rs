// Copyright 2025 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use super::{BlobTransport, RegistryTransport, TransportError};
use crate::client::config::{ClientConfig, ConfigError};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use sky_protocol::{
    constants::SIGNATURE_SIZE, Bytes, DataKey, PublicKey, RegistryEntryType, RegistryValue,
    Signature, SignedRegistryValue, Skylink,
};
use std::time::Duration;
use url::Url;

const REGISTRY_PATH: &str = "skynet/registry";
const SKYFILE_PATH: &str = "skynet/skyfile";
const SKYLINK_PATH: &str = "skynet/skylink";

/// Name given to every uploaded blob.
const UPLOAD_FILENAME: &str = "data.json";
/// skyd parses the `mode` parameter as octal.
const UPLOAD_FILE_MODE: u32 = 0o644;

/// Talks to a skyd node over its HTTP API.
#[derive(Clone)]
pub struct SkydClient {
    http: reqwest::Client,
    base_url: Url,
    api_password: Option<String>,
    registry_lookup_timeout: Option<Duration>,
}

impl std::fmt::Debug for SkydClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkydClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl SkydClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let base_url = config.base_url()?;
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout)
            .build()
            .map_err(ConfigError::HttpClient)?;
        debug!("Created skyd client for {base_url}");

        Ok(Self {
            http,
            base_url,
            api_password: config.api_password.clone(),
            registry_lookup_timeout: config.registry_lookup_timeout,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path)
            .map_err(|err| TransportError::InvalidRequest(format!("{path}: {err}")))
    }

    fn upload_url(&self, siapath: &str) -> Result<Url, TransportError> {
        let mut url = self.endpoint(&format!("{SKYFILE_PATH}/{siapath}"))?;
        let _ = url
            .query_pairs_mut()
            .append_pair("filename", UPLOAD_FILENAME)
            .append_pair("force", "true")
            .append_pair("mode", &format!("{UPLOAD_FILE_MODE:o}"));
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_password {
            Some(password) => request.basic_auth("", Some(password)),
            None => request,
        }
    }
}

#[async_trait]
impl RegistryTransport for SkydClient {
    async fn registry_read(
        &self,
        public_key: &PublicKey,
        data_key: &DataKey,
    ) -> Result<SignedRegistryValue, TransportError> {
        let mut url = self.endpoint(REGISTRY_PATH)?;
        {
            let mut query = url.query_pairs_mut();
            let _ = query
                .append_pair("publickey", &public_key.to_string())
                .append_pair("datakey", &data_key.to_hex());
            if let Some(timeout) = self.registry_lookup_timeout {
                let _ = query.append_pair("timeout", &timeout.as_secs().max(1).to_string());
            }
        }

        trace!("GET {url}");
        let response = self.authorized(self.http.get(url)).send().await?;
        if !response.status().is_success() {
            let (status, message) = api_error(response).await;
            return Err(registry_read_error(status, message));
        }
        let body: RegistryReadResponse = response.json().await?;
        body.into_signed_value(*data_key)
    }

    async fn registry_update(
        &self,
        public_key: &PublicKey,
        data_key: &DataKey,
        revision: u64,
        signature: &Signature,
        skylink: &Skylink,
    ) -> Result<(), TransportError> {
        let url = self.endpoint(REGISTRY_PATH)?;
        let body = RegistryUpdateRequest {
            publickey: SiaPublicKey {
                algorithm: public_key.algorithm(),
                key: STANDARD.encode(public_key.to_bytes()),
            },
            datakey: data_key.to_hex(),
            revision,
            signature: signature.to_bytes().to_vec(),
            data: STANDARD.encode(skylink.to_bytes()),
            entry_type: RegistryEntryType::WithoutPubkey.into(),
        };

        trace!("POST {url} revision {revision}");
        let response = self
            .authorized(self.http.post(url))
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            let (status, message) = api_error(response).await;
            return Err(registry_update_error(status, message));
        }
        Ok(())
    }
}

#[async_trait]
impl BlobTransport for SkydClient {
    async fn upload(&self, data: Bytes) -> Result<String, TransportError> {
        let siapath = hex::encode(rand::random::<[u8; 16]>());
        let url = self.upload_url(&siapath)?;

        trace!("POST {url} with {} bytes", data.len());
        let response = self
            .authorized(self.http.post(url))
            .body(data)
            .send()
            .await?;
        if !response.status().is_success() {
            let (status, message) = api_error(response).await;
            return Err(TransportError::Api {
                status: status.as_u16(),
                message,
            });
        }
        let body: UploadResponse = response.json().await?;
        Ok(body.skylink)
    }

    async fn download(&self, skylink: &str) -> Result<Bytes, TransportError> {
        let url = self.endpoint(&format!("{SKYLINK_PATH}/{skylink}"))?;

        trace!("GET {url}");
        let response = self.authorized(self.http.get(url)).send().await?;
        if !response.status().is_success() {
            let (status, message) = api_error(response).await;
            return Err(download_error(status, message));
        }
        Ok(response.bytes().await?)
    }
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Status and message of a failed request. skyd wraps its messages in JSON, anything
/// else is passed through as is.
async fn api_error(response: Response) -> (StatusCode, String) {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|err| err.message)
        .unwrap_or(body);
    (status, message)
}

const ENTRY_NOT_FOUND: &str = "registry entry not found";
const LOOKUP_TIMEOUT: &str = "registry entry not found within given time";
const ROOT_NOT_FOUND: &str = "failed to fetch root object";

/// skyd reports a missing entry and a timed out lookup with the same status, only the
/// message tells them apart.
fn registry_read_error(status: StatusCode, message: String) -> TransportError {
    if message.contains(LOOKUP_TIMEOUT) {
        return TransportError::RegistryLookupTimeout;
    }
    if message.contains(ENTRY_NOT_FOUND) {
        return TransportError::RegistryEntryNotFound;
    }
    TransportError::Api {
        status: status.as_u16(),
        message,
    }
}

/// Hosts refuse revisions that are not higher than the stored one.
fn registry_update_error(status: StatusCode, message: String) -> TransportError {
    if status == StatusCode::BAD_REQUEST && message.contains("revision number") {
        return TransportError::RevisionConflict(message);
    }
    TransportError::Api {
        status: status.as_u16(),
        message,
    }
}

fn download_error(status: StatusCode, message: String) -> TransportError {
    if message.contains(ROOT_NOT_FOUND) {
        return TransportError::RootNotFound;
    }
    TransportError::Api {
        status: status.as_u16(),
        message,
    }
}

#[derive(Deserialize)]
struct RegistryReadResponse {
    /// Hex
    data: String,
    revision: u64,
    /// Hex
    signature: String,
    #[serde(rename = "type", default = "default_entry_type")]
    entry_type: u8,
}

fn default_entry_type() -> u8 {
    RegistryEntryType::WithoutPubkey.into()
}

impl RegistryReadResponse {
    fn into_signed_value(self, data_key: DataKey) -> Result<SignedRegistryValue, TransportError> {
        let data = hex::decode(&self.data).map_err(|err| {
            TransportError::InvalidResponse(format!("registry data is not hex: {err}"))
        })?;
        let signature = hex::decode(&self.signature).map_err(|err| {
            TransportError::InvalidResponse(format!("registry signature is not hex: {err}"))
        })?;
        let signature: [u8; SIGNATURE_SIZE] = signature.as_slice().try_into().map_err(|_| {
            TransportError::InvalidResponse(format!(
                "registry signature has {} bytes, expected {SIGNATURE_SIZE}",
                signature.len()
            ))
        })?;
        let entry_type = RegistryEntryType::try_from(self.entry_type)
            .map_err(|err| TransportError::InvalidResponse(err.to_string()))?;

        let value = RegistryValue::new(data_key, Bytes::from(data), self.revision, entry_type);
        Ok(SignedRegistryValue::new_with_signature(
            value,
            Signature::from_bytes(&signature),
        ))
    }
}

#[derive(Serialize)]
struct SiaPublicKey {
    algorithm: &'static str,
    /// Base64
    key: String,
}

#[derive(Serialize)]
struct RegistryUpdateRequest {
    publickey: SiaPublicKey,
    /// Hex
    datakey: String,
    revision: u64,
    /// A JSON array of bytes.
    signature: Vec<u8>,
    /// Base64
    data: String,
    #[serde(rename = "type")]
    entry_type: u8,
}

#[derive(Deserialize)]
struct UploadResponse {
    skylink: String,
}
