// Copyright 2025 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use super::ErrorKind;
use crate::networking::{RegistryTransport, TransportError};
use sky_protocol::{
    Bytes, DataKey, Error as ProtocolError, Keypair, PublicKey, RegistryEntryType, RegistryValue,
    Skylink,
};

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Failed to load skylink data: {0}")]
    Decode(#[source] ProtocolError),
    #[error("Failed to read from the registry: {0}")]
    Read(#[source] TransportError),
    #[error("Failed to update the registry: {0}")]
    Write(#[source] TransportError),
    #[error("The value we read failed validation: {0}")]
    Validation(#[source] ProtocolError),
    #[error("The registry entry does not hold a V1 skylink: {0}")]
    CorruptEntry(#[source] ProtocolError),
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Decode(_) => ErrorKind::Decode,
            Self::Read(_) => ErrorKind::RegistryRead,
            Self::Write(TransportError::RevisionConflict(_)) => ErrorKind::RevisionConflict,
            Self::Write(_) => ErrorKind::RegistryWrite,
            Self::Validation(_) => ErrorKind::Validation,
            Self::CorruptEntry(_) => ErrorKind::CorruptEntry,
        }
    }
}

/// Reads and writes the registry slots owned by one keypair. Each slot, named by a
/// [`DataKey`], holds a V1 skylink.
pub struct Registry<T> {
    transport: T,
    keypair: Keypair,
    public_key: PublicKey,
}

impl<T> std::fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

impl<T: RegistryTransport> Registry<T> {
    pub fn new(transport: T, keypair: Keypair) -> Self {
        let public_key = keypair.public_key();
        Self {
            transport,
            keypair,
            public_key,
        }
    }

    /// The key all slots are read and written under.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Read the skylink stored under `data_key` and its revision.
    ///
    /// The entry is only trusted once its signature verifies against our public key.
    pub async fn read(&self, data_key: &DataKey) -> Result<(Skylink, u64), RegistryError> {
        let signed = self
            .transport
            .registry_read(&self.public_key, data_key)
            .await
            .map_err(RegistryError::Read)?;

        signed.verify(&self.public_key).map_err(|err| {
            error!(
                "Registry entry {data_key:?} of {:?} failed verification: {err}",
                self.public_key
            );
            RegistryError::Validation(err)
        })?;

        let skylink = Skylink::from_bytes(signed.data()).map_err(RegistryError::CorruptEntry)?;
        if !skylink.is_v1() {
            return Err(RegistryError::CorruptEntry(
                ProtocolError::UnsupportedSkylinkVersion(skylink.version()),
            ));
        }

        debug!(
            "Read {skylink:?} at revision {} from registry entry {data_key:?}",
            signed.revision()
        );
        Ok((skylink, signed.revision()))
    }

    /// Point the slot `data_key` at `skylink`, given in any text form a skylink accepts.
    ///
    /// Returns the V2 skylink that resolves through the slot.
    pub async fn write(
        &self,
        skylink: &str,
        data_key: &DataKey,
        revision: u64,
    ) -> Result<Skylink, RegistryError> {
        let skylink: Skylink = skylink.parse().map_err(RegistryError::Decode)?;

        let signed = RegistryValue::new(
            *data_key,
            Bytes::copy_from_slice(&skylink.to_bytes()),
            revision,
            RegistryEntryType::WithoutPubkey,
        )
        .sign(&self.keypair);

        self.transport
            .registry_update(
                &self.public_key,
                data_key,
                signed.revision(),
                signed.signature(),
                &skylink,
            )
            .await
            .map_err(RegistryError::Write)?;

        info!("Registry entry {data_key:?} now points at {skylink:?} (revision {revision})");
        Ok(Skylink::new_v2(&self.public_key, data_key))
    }
}
