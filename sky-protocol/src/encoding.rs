// Copyright 2025 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

//! The Sia binary encoding, restricted to what registry entries need.
//!
//! Integers are written as 8 byte little endian values, byte slices are prefixed with
//! their length (itself an 8 byte integer) and fixed size arrays are written as is.
//! Hashing an object means hashing its encoding with BLAKE2b-256.

use crate::constants::HASH_SIZE;
use blake2::{digest::consts::U32, Blake2b, Digest};

/// A 32 byte BLAKE2b digest.
pub type Hash = [u8; HASH_SIZE];

type Blake2b256 = Blake2b<U32>;

/// Hash raw bytes with BLAKE2b-256.
pub fn hash_bytes(data: &[u8]) -> Hash {
    let digest = Blake2b256::digest(data);
    let mut hash = [0u8; HASH_SIZE];
    hash.copy_from_slice(&digest);
    hash
}

/// Builds the Sia encoding of a sequence of objects.
#[derive(Debug, Default, Clone)]
pub struct SiaEncoder {
    buf: Vec<u8>,
}

impl SiaEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a fixed size array, no length prefix.
    pub fn write_fixed(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn write_u64(&mut self, value: u64) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// Write a variable length byte slice, prefixed with its length.
    pub fn write_prefixed(&mut self, bytes: &[u8]) -> &mut Self {
        self.write_u64(bytes.len() as u64);
        self.write_fixed(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Hash everything written so far.
    pub fn hash(&self) -> Hash {
        hash_bytes(&self.buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_bytes_carry_little_endian_length() {
        let mut enc = SiaEncoder::new();
        enc.write_prefixed(b"abc").write_u64(258);

        let bytes = enc.into_bytes();
        assert_eq!(&bytes[..8], &[3, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(&bytes[8..11], b"abc");
        assert_eq!(&bytes[11..], &[2, 1, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_hash_matches_hash_of_encoding() {
        let mut enc = SiaEncoder::new();
        enc.write_fixed(&[7u8; 32]).write_u64(1);
        assert_eq!(enc.hash(), hash_bytes(enc.as_bytes()));
        assert_ne!(enc.hash(), hash_bytes(&[]));
    }
}
