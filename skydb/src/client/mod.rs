// Copyright 2025 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

pub mod config;
pub mod registry;
pub mod store;

/// The closed set of failure kinds callers branch on.
///
/// Obtained through [`registry::RegistryError::kind`] or [`store::SkyDbError::kind`];
/// the kind never depends on the text of the wrapped errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No usable value: the slot was never written, the lookup timed out, or the
    /// skylink it holds points at data that is gone.
    NotFound,
    /// A skylink could not be decoded. Caller error.
    Decode,
    /// The registry entry's signature does not verify against our public key.
    Validation,
    /// The registry entry verifies but does not hold a V1 skylink.
    CorruptEntry,
    /// The network refused a write because the slot has an equal or higher revision.
    RevisionConflict,
    Upload,
    RegistryWrite,
    RegistryRead,
    Download,
}

impl ErrorKind {
    /// Whether retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            Self::Decode | Self::Validation | Self::CorruptEntry | Self::RevisionConflict
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trust_and_caller_errors_are_not_retryable() {
        for kind in [
            ErrorKind::Decode,
            ErrorKind::Validation,
            ErrorKind::CorruptEntry,
            ErrorKind::RevisionConflict,
        ] {
            assert!(!kind.is_retryable(), "{kind:?}");
        }
        for kind in [
            ErrorKind::NotFound,
            ErrorKind::Upload,
            ErrorKind::RegistryWrite,
            ErrorKind::RegistryRead,
            ErrorKind::Download,
        ] {
            assert!(kind.is_retryable(), "{kind:?}");
        }
    }
}
