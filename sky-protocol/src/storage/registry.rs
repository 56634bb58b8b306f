// Copyright 2025 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use super::DataKey;
use crate::{
    constants::REGISTRY_DATA_SIZE,
    encoding::{hash_bytes, Hash, SiaEncoder},
    error::{Error, Result},
    keys::{Keypair, PublicKey, Signature},
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Format of the data carried by a registry entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum RegistryEntryType {
    /// The data is opaque to the network, e.g. a skylink.
    WithoutPubkey = 1,
    /// The data starts with the hash of a public key.
    WithPubkey = 2,
}

impl TryFrom<u8> for RegistryEntryType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Self::WithoutPubkey),
            2 => Ok(Self::WithPubkey),
            other => Err(Error::InvalidRegistryEntryType(other)),
        }
    }
}

impl From<RegistryEntryType> for u8 {
    fn from(value: RegistryEntryType) -> Self {
        value as u8
    }
}

/// The unsigned content of a registry slot.
#[derive(Clone, PartialEq, Eq)]
pub struct RegistryValue {
    data_key: DataKey,
    data: Bytes,
    /// Caller managed. The network keeps the entry with the highest revision.
    revision: u64,
    entry_type: RegistryEntryType,
}

impl RegistryValue {
    pub fn new(
        data_key: DataKey,
        data: Bytes,
        revision: u64,
        entry_type: RegistryEntryType,
    ) -> Self {
        Self {
            data_key,
            data,
            revision,
            entry_type,
        }
    }

    pub fn data_key(&self) -> &DataKey {
        &self.data_key
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn entry_type(&self) -> RegistryEntryType {
        self.entry_type
    }

    /// The canonical encoding that gets hashed and signed.
    ///
    /// Entries of type [`RegistryEntryType::WithoutPubkey`] predate the type field
    /// and leave it out, every other type appends it.
    pub fn bytes_for_signature(&self) -> Vec<u8> {
        let mut enc = SiaEncoder::new();
        enc.write_fixed(self.data_key.as_bytes())
            .write_prefixed(&self.data)
            .write_u64(self.revision);
        if self.entry_type != RegistryEntryType::WithoutPubkey {
            enc.write_u64(u64::from(u8::from(self.entry_type)));
        }
        enc.into_bytes()
    }

    pub fn hash(&self) -> Hash {
        hash_bytes(&self.bytes_for_signature())
    }

    /// Returns an error if the data does not fit in a registry entry.
    pub fn check_size(&self) -> Result<()> {
        if self.data.len() > REGISTRY_DATA_SIZE {
            return Err(Error::RegistryDataTooLarge {
                size: self.data.len(),
                max: REGISTRY_DATA_SIZE,
            });
        }
        Ok(())
    }

    /// Sign the value with the slot owner's key.
    pub fn sign(self, owner: &Keypair) -> SignedRegistryValue {
        let signature = owner.sign_hash(&self.hash());
        SignedRegistryValue {
            value: self,
            signature,
        }
    }
}

impl fmt::Debug for RegistryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryValue")
            .field("data_key", &self.data_key)
            .field("data", &format!("({} bytes)", self.data.len()))
            .field("revision", &self.revision)
            .field("entry_type", &self.entry_type)
            .finish()
    }
}

/// A registry value together with the owner's signature over its hash.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedRegistryValue {
    value: RegistryValue,
    signature: Signature,
}

impl SignedRegistryValue {
    /// Wrap a value with an existing signature, e.g. one received from the network.
    /// It is the caller's responsibility to [`SignedRegistryValue::verify`] it.
    pub fn new_with_signature(value: RegistryValue, signature: Signature) -> Self {
        Self { value, signature }
    }

    pub fn value(&self) -> &RegistryValue {
        &self.value
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn data_key(&self) -> &DataKey {
        self.value.data_key()
    }

    pub fn data(&self) -> &Bytes {
        self.value.data()
    }

    pub fn revision(&self) -> u64 {
        self.value.revision()
    }

    pub fn entry_type(&self) -> RegistryEntryType {
        self.value.entry_type()
    }

    /// Verify the signature against `public_key`, hashing with the entry type carried
    /// by the value itself.
    pub fn verify(&self, public_key: &PublicKey) -> Result<()> {
        self.value.check_size()?;
        if !public_key.verify_hash(&self.value.hash(), &self.signature) {
            debug!("Signature of {self:?} does not verify against {public_key:?}");
            return Err(Error::InvalidSignature);
        }
        Ok(())
    }

    pub fn into_parts(self) -> (RegistryValue, Signature) {
        (self.value, self.signature)
    }
}

impl fmt::Debug for SignedRegistryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedRegistryValue")
            .field("value", &self.value)
            .field("signature", &hex::encode(self.signature.to_bytes()))
            .finish()
    }
}
