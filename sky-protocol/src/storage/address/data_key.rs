// Copyright 2025 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::{
    constants::HASH_SIZE,
    encoding::SiaEncoder,
    error::{Error, Result},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A caller chosen 256 bit key. Together with the owner's public key it
/// addresses exactly one registry slot.
#[derive(
    Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
pub struct DataKey([u8; HASH_SIZE]);

impl DataKey {
    pub const fn new(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }

    /// Derive a data key from a human readable name, hashing the encoded string
    /// the same way the Skynet SDKs do.
    pub fn from_name(name: &str) -> Self {
        let mut enc = SiaEncoder::new();
        enc.write_prefixed(name.as_bytes());
        Self(enc.hash())
    }

    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(hex: &str) -> Result<Self> {
        let bytes = hex::decode(hex)?;
        let bytes: [u8; HASH_SIZE] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| Error::InvalidLength {
                    got: bytes.len(),
                    expected: HASH_SIZE,
                })?;
        Ok(Self(bytes))
    }
}

impl From<[u8; HASH_SIZE]> for DataKey {
    fn from(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for DataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for DataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DataKey({})", &self.to_hex()[0..6])
    }
}
