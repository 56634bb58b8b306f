// Copyright 2025 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::{
    constants::HASH_SIZE,
    encoding::{Hash, SiaEncoder},
    error::{Error, Result},
};
use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use std::{fmt, str::FromStr};

pub use ed25519_dalek::Signature;

const ED25519_ALGORITHM: &str = "ed25519";

/// Sia writes the key algorithm as a zero padded 16 byte specifier.
const SPECIFIER_SIZE: usize = 16;

/// The ed25519 keypair owning registry slots.
///
/// ed25519 signatures are deterministic, signing the same entry twice yields the
/// same signature.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a new keypair from the OS rng.
    pub fn random() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut rand::rngs::OsRng),
        }
    }

    /// Restore a keypair from its 32 byte secret seed.
    pub fn from_seed(seed: &[u8; HASH_SIZE]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// The secret seed. Treat it like a password.
    pub fn seed(&self) -> [u8; HASH_SIZE] {
        self.signing_key.to_bytes()
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.signing_key.verifying_key())
    }

    /// Sign a 32 byte hash, which is what the registry signs.
    pub fn sign_hash(&self, hash: &Hash) -> Signature {
        self.signing_key.sign(hash)
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

/// An ed25519 public key as the Sia network knows it.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey(VerifyingKey);

impl PublicKey {
    pub fn from_bytes(bytes: &[u8; HASH_SIZE]) -> Result<Self> {
        VerifyingKey::from_bytes(bytes)
            .map(Self)
            .map_err(|_| Error::InvalidPublicKey)
    }

    pub fn to_bytes(&self) -> [u8; HASH_SIZE] {
        self.0.to_bytes()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// The algorithm name skyd expects next to the key.
    pub fn algorithm(&self) -> &'static str {
        ED25519_ALGORITHM
    }

    /// Append the Sia encoding of the key: the algorithm specifier and the
    /// length prefixed key bytes.
    pub fn encode_into(&self, enc: &mut SiaEncoder) {
        let mut specifier = [0u8; SPECIFIER_SIZE];
        specifier[..ED25519_ALGORITHM.len()].copy_from_slice(ED25519_ALGORITHM.as_bytes());
        enc.write_fixed(&specifier).write_prefixed(&self.to_bytes());
    }

    pub fn verify_hash(&self, hash: &Hash, signature: &Signature) -> bool {
        self.0.verify(hash, signature).is_ok()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ED25519_ALGORITHM}:{}", self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", &self.to_hex()[0..6])
    }
}

/// Parses the `ed25519:<hex>` form used by skyd.
impl FromStr for PublicKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (algorithm, key) = s
            .split_once(':')
            .ok_or_else(|| Error::UnsupportedKeyAlgorithm(String::new()))?;
        if algorithm != ED25519_ALGORITHM {
            return Err(Error::UnsupportedKeyAlgorithm(algorithm.to_string()));
        }
        let bytes = hex::decode(key)?;
        let bytes: [u8; HASH_SIZE] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| Error::InvalidLength {
                got: bytes.len(),
                expected: HASH_SIZE,
            })?;
        Self::from_bytes(&bytes)
    }
}
