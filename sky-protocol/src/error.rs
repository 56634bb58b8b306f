// Copyright 2025 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use hex::FromHexError;
use thiserror::Error;

/// A specialised `Result` type for protocol crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error types for the SkyDB protocol.
#[derive(Error, Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum Error {
    // ---------- Skylink errors
    #[error("Invalid skylink length: got {0} bytes")]
    InvalidSkylinkLength(usize),
    #[error("Failed to decode skylink text: {0}")]
    SkylinkEncoding(String),
    #[error("Skylink declares unsupported version {0}")]
    UnsupportedSkylinkVersion(u16),
    #[error("Invalid skylink bitfield: {0}")]
    InvalidBitfield(&'static str),
    #[error("Invalid offset {offset} and fetch size {fetch_size} combination")]
    InvalidOffsetAndFetchSize { offset: u64, fetch_size: u64 },

    // ---------- Key errors
    #[error("Failed to decode hex string: {0}")]
    HexDecoding(#[from] FromHexError),
    #[error("Invalid length: got {got} bytes, expected {expected}")]
    InvalidLength { got: usize, expected: usize },
    #[error("Unsupported public key algorithm: {0:?}")]
    UnsupportedKeyAlgorithm(String),
    #[error("Invalid ed25519 public key")]
    InvalidPublicKey,

    // ---------- Registry errors
    #[error("Registry entry carries {size} bytes of data, the maximum is {max}")]
    RegistryDataTooLarge { size: usize, max: usize },
    #[error("Invalid registry entry type: {0}")]
    InvalidRegistryEntryType(u8),
    #[error("Registry entry signature is invalid")]
    InvalidSignature,
}
