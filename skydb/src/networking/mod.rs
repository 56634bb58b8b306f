// Copyright 2025 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

//! The two services SkyDB needs from the network, and their implementations.
//!
//! [`SkydClient`] talks to a skyd node over HTTP. [`MemoryNetwork`] keeps everything in
//! process and is what the tests run against.

mod memory;
mod skyd;

pub use memory::MemoryNetwork;
pub use skyd::SkydClient;

use async_trait::async_trait;
use sky_protocol::{Bytes, DataKey, PublicKey, Signature, SignedRegistryValue, Skylink};

/// Errors returned by the transports.
///
/// Variants are structured so that callers never need to inspect the message text.
/// Only the HTTP transport maps skyd's error messages onto them.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("registry entry not found")]
    RegistryEntryNotFound,
    #[error("registry entry not found within given time")]
    RegistryLookupTimeout,
    #[error("failed to fetch root object")]
    RootNotFound,
    #[error("registry update rejected: {0}")]
    RevisionConflict(String),
    #[error("skyd responded with status {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl TransportError {
    /// The two registry read outcomes that mean "nothing usable is stored".
    pub fn is_registry_not_found(&self) -> bool {
        matches!(
            self,
            Self::RegistryEntryNotFound | Self::RegistryLookupTimeout
        )
    }
}

/// Read and update signed registry entries.
#[async_trait]
pub trait RegistryTransport: Send + Sync {
    /// Fetch the latest entry stored under `(public_key, data_key)`.
    ///
    /// The returned value is unverified.
    async fn registry_read(
        &self,
        public_key: &PublicKey,
        data_key: &DataKey,
    ) -> Result<SignedRegistryValue, TransportError>;

    /// Submit a signed update holding `skylink` at `revision`.
    ///
    /// The entry is of type [`sky_protocol::RegistryEntryType::WithoutPubkey`], and
    /// `signature` must cover the corresponding value.
    async fn registry_update(
        &self,
        public_key: &PublicKey,
        data_key: &DataKey,
        revision: u64,
        signature: &Signature,
        skylink: &Skylink,
    ) -> Result<(), TransportError>;
}

/// Upload and download immutable blobs addressed by skylink.
#[async_trait]
pub trait BlobTransport: Send + Sync {
    /// Upload `data`, returning the skylink of the stored blob in text form.
    async fn upload(&self, data: Bytes) -> Result<String, TransportError>;

    /// Download the full content behind `skylink`.
    async fn download(&self, skylink: &str) -> Result<Bytes, TransportError>;
}
