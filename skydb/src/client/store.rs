// Copyright 2025 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use super::{
    config::{ClientConfig, ConfigError},
    registry::{Registry, RegistryError},
    ErrorKind,
};
use crate::networking::{
    BlobTransport, MemoryNetwork, RegistryTransport, SkydClient, TransportError,
};
use async_trait::async_trait;
use sky_protocol::{Bytes, DataKey, Keypair};

/// Errors of the SkyDB store.
#[derive(Debug, thiserror::Error)]
pub enum SkyDbError {
    /// Nothing usable is stored under the key. Covers missing entries, registry
    /// lookups that timed out and entries whose data can no longer be fetched.
    #[error("SkyDB entry not found")]
    NotFound,
    #[error("Failed to upload data: {0}")]
    Upload(#[source] TransportError),
    #[error("Failed to write to the registry: {0}")]
    RegistryWrite(#[source] RegistryError),
    #[error("Failed to read from the registry: {0}")]
    RegistryRead(#[source] RegistryError),
    #[error("Failed to download data: {0}")]
    Download(#[source] TransportError),
}

impl SkyDbError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound => ErrorKind::NotFound,
            Self::Upload(_) => ErrorKind::Upload,
            Self::RegistryWrite(err) | Self::RegistryRead(err) => err.kind(),
            Self::Download(_) => ErrorKind::Download,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// The store operations, for callers that want to swap the implementation.
#[async_trait]
pub trait SkyDbApi: Send + Sync {
    /// The data stored under `data_key` and the revision of its registry entry.
    async fn read(&self, data_key: &DataKey) -> Result<(Bytes, u64), SkyDbError>;

    /// Store `data` under `data_key` at `revision`, which must be higher than the
    /// revision currently stored.
    async fn write(
        &self,
        data: Bytes,
        data_key: &DataKey,
        revision: u64,
    ) -> Result<(), SkyDbError>;
}

/// A key-value store where every key is a registry slot pointing at uploaded data.
#[derive(Debug)]
pub struct SkyDb<R, B> {
    registry: Registry<R>,
    blobs: B,
}

/// A store backed by a skyd node.
pub type SkydSkyDb = SkyDb<SkydClient, SkydClient>;
/// A store kept in process memory.
pub type MemorySkyDb = SkyDb<MemoryNetwork, MemoryNetwork>;

impl SkyDb<SkydClient, SkydClient> {
    pub fn new(keypair: Keypair, config: ClientConfig) -> Result<Self, ConfigError> {
        let client = SkydClient::new(&config)?;
        Ok(Self::with_transports(keypair, client.clone(), client))
    }

    /// Connect with [`ClientConfig::from_env`].
    pub fn with_default_config(keypair: Keypair) -> Result<Self, ConfigError> {
        Self::new(keypair, ClientConfig::from_env()?)
    }
}

impl SkyDb<MemoryNetwork, MemoryNetwork> {
    /// A store on a fresh [`MemoryNetwork`], reachable through
    /// [`SkyDb::blob_transport`].
    pub fn in_memory(keypair: Keypair) -> Self {
        let network = MemoryNetwork::new();
        Self::with_transports(keypair, network.clone(), network)
    }
}

impl<R: RegistryTransport, B: BlobTransport> SkyDb<R, B> {
    pub fn with_transports(keypair: Keypair, registry_transport: R, blobs: B) -> Self {
        Self {
            registry: Registry::new(registry_transport, keypair),
            blobs,
        }
    }

    pub fn registry(&self) -> &Registry<R> {
        &self.registry
    }

    pub fn blob_transport(&self) -> &B {
        &self.blobs
    }

    /// Fetch the data stored under `data_key` and the revision it was written at.
    ///
    /// A missing entry, a timed out lookup and an entry pointing at data that is gone
    /// all come back as [`SkyDbError::NotFound`].
    pub async fn read(&self, data_key: &DataKey) -> Result<(Bytes, u64), SkyDbError> {
        let (skylink, revision) = match self.registry.read(data_key).await {
            Ok(found) => found,
            Err(RegistryError::Read(err)) if err.is_registry_not_found() => {
                debug!("No registry entry for {data_key:?}: {err}");
                return Err(SkyDbError::NotFound);
            }
            Err(err) => {
                warn!("Failed to read registry entry {data_key:?}: {err}");
                return Err(SkyDbError::RegistryRead(err));
            }
        };

        let data = match self.blobs.download(&skylink.to_string()).await {
            Ok(data) => data,
            Err(TransportError::RootNotFound) => {
                warn!("Registry entry {data_key:?} points at {skylink:?} which is gone");
                return Err(SkyDbError::NotFound);
            }
            Err(err) => return Err(SkyDbError::Download(err)),
        };

        debug!(
            "Read {} bytes at revision {revision} for {data_key:?}",
            data.len()
        );
        Ok((data, revision))
    }

    /// Upload `data` and point the slot `data_key` at it.
    ///
    /// If the registry update fails the upload is left behind, unreferenced.
    pub async fn write(
        &self,
        data: Bytes,
        data_key: &DataKey,
        revision: u64,
    ) -> Result<(), SkyDbError> {
        let size = data.len();
        let skylink = self.blobs.upload(data).await.map_err(|err| {
            warn!("Failed to upload {size} bytes for {data_key:?}: {err}");
            SkyDbError::Upload(err)
        })?;

        let _ = self
            .registry
            .write(&skylink, data_key, revision)
            .await
            .map_err(SkyDbError::RegistryWrite)?;

        debug!("Wrote {size} bytes at revision {revision} for {data_key:?}");
        Ok(())
    }
}

#[async_trait]
impl<R: RegistryTransport, B: BlobTransport> SkyDbApi for SkyDb<R, B> {
    async fn read(&self, data_key: &DataKey) -> Result<(Bytes, u64), SkyDbError> {
        SkyDb::read(self, data_key).await
    }

    async fn write(
        &self,
        data: Bytes,
        data_key: &DataKey,
        revision: u64,
    ) -> Result<(), SkyDbError> {
        SkyDb::write(self, data, data_key, revision).await
    }
}
