// Copyright 2025 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use super::{BlobTransport, RegistryTransport, TransportError};
use async_trait::async_trait;
use sky_protocol::{
    constants::SECTOR_SIZE,
    encoding::{hash_bytes, Hash},
    registry_entry_id, Bytes, DataKey, PublicKey, RegistryEntryType, RegistryValue, Signature,
    SignedRegistryValue, Skylink,
};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

/// An in-process registry and blob store.
///
/// Updates are signature checked and must strictly increase the revision, the way
/// hosts enforce it. Blobs are addressed by the hash of their content. Clones share
/// the same state.
#[derive(Clone, Default)]
pub struct MemoryNetwork {
    state: Arc<RwLock<State>>,
}

#[derive(Default)]
struct State {
    /// Keyed by registry entry id.
    entries: HashMap<Hash, SignedRegistryValue>,
    blobs: HashMap<Hash, Bytes>,
    lookup_timeout: bool,
}

impl std::fmt::Debug for MemoryNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryNetwork").finish_non_exhaustive()
    }
}

impl MemoryNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// While enabled, every registry read fails with
    /// [`TransportError::RegistryLookupTimeout`].
    pub async fn set_lookup_timeout(&self, enabled: bool) {
        self.state.write().await.lookup_timeout = enabled;
    }

    /// Drop the blob behind `skylink`. Returns whether it was stored.
    pub async fn remove_blob(&self, skylink: &Skylink) -> bool {
        self.state
            .write()
            .await
            .blobs
            .remove(skylink.merkle_root())
            .is_some()
    }

    /// Store an entry as is, skipping the signature and revision checks.
    pub async fn insert_entry(&self, owner: &PublicKey, value: SignedRegistryValue) {
        let id = registry_entry_id(owner, value.data_key());
        let _ = self.state.write().await.entries.insert(id, value);
    }

    pub async fn entry(
        &self,
        owner: &PublicKey,
        data_key: &DataKey,
    ) -> Option<SignedRegistryValue> {
        let id = registry_entry_id(owner, data_key);
        self.state.read().await.entries.get(&id).cloned()
    }

    pub async fn blob_count(&self) -> usize {
        self.state.read().await.blobs.len()
    }
}

#[async_trait]
impl RegistryTransport for MemoryNetwork {
    async fn registry_read(
        &self,
        public_key: &PublicKey,
        data_key: &DataKey,
    ) -> Result<SignedRegistryValue, TransportError> {
        let state = self.state.read().await;
        if state.lookup_timeout {
            return Err(TransportError::RegistryLookupTimeout);
        }
        state
            .entries
            .get(&registry_entry_id(public_key, data_key))
            .cloned()
            .ok_or(TransportError::RegistryEntryNotFound)
    }

    async fn registry_update(
        &self,
        public_key: &PublicKey,
        data_key: &DataKey,
        revision: u64,
        signature: &Signature,
        skylink: &Skylink,
    ) -> Result<(), TransportError> {
        let value = RegistryValue::new(
            *data_key,
            Bytes::copy_from_slice(&skylink.to_bytes()),
            revision,
            RegistryEntryType::WithoutPubkey,
        );
        let signed = SignedRegistryValue::new_with_signature(value, *signature);
        signed
            .verify(public_key)
            .map_err(|err| TransportError::Api {
                status: 400,
                message: err.to_string(),
            })?;

        let id = registry_entry_id(public_key, data_key);
        let mut state = self.state.write().await;
        if let Some(existing) = state.entries.get(&id) {
            if revision < existing.revision() {
                return Err(TransportError::RevisionConflict(
                    "provided revision number is invalid".to_string(),
                ));
            }
            if revision == existing.revision() {
                return Err(TransportError::RevisionConflict(
                    "provided revision number is already registered".to_string(),
                ));
            }
        }
        trace!("Registry entry {data_key:?} of {public_key:?} updated to revision {revision}");
        let _ = state.entries.insert(id, signed);
        Ok(())
    }
}

#[async_trait]
impl BlobTransport for MemoryNetwork {
    async fn upload(&self, data: Bytes) -> Result<String, TransportError> {
        let root = hash_bytes(&data);
        let fetch_size = (data.len() as u64).clamp(1, SECTOR_SIZE);
        let skylink = Skylink::new_v1(root, 0, fetch_size)
            .map_err(|err| TransportError::InvalidRequest(err.to_string()))?;

        trace!("Stored blob of {} bytes at {skylink}", data.len());
        let _ = self.state.write().await.blobs.insert(root, data);
        Ok(skylink.to_string())
    }

    async fn download(&self, skylink: &str) -> Result<Bytes, TransportError> {
        let skylink: Skylink = skylink
            .parse()
            .map_err(|err: sky_protocol::Error| TransportError::InvalidRequest(err.to_string()))?;
        if !skylink.is_v1() {
            return Err(TransportError::InvalidRequest(
                "only V1 skylinks point at blobs".to_string(),
            ));
        }
        self.state
            .read()
            .await
            .blobs
            .get(skylink.merkle_root())
            .cloned()
            .ok_or(TransportError::RootNotFound)
    }
}
