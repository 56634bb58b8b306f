// Copyright 2025 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

/// Maximum number of data bytes a registry entry can carry.
pub const REGISTRY_DATA_SIZE: usize = 113;

/// Size of a hash, a data key or a merkle root.
pub const HASH_SIZE: usize = 32;

/// Size of an ed25519 signature.
pub const SIGNATURE_SIZE: usize = 64;

/// Raw skylink: a 2 byte little endian bitfield followed by a 32 byte merkle root.
pub const RAW_SKYLINK_SIZE: usize = 2 + HASH_SIZE;

/// Length of a skylink in its base64 (url safe, unpadded) text form.
pub const BASE64_SKYLINK_SIZE: usize = 46;

/// Length of a skylink in its base32 (hex alphabet, unpadded) text form.
pub const BASE32_SKYLINK_SIZE: usize = 55;

/// Size of a host sector. A V1 skylink cannot address bytes past it.
pub const SECTOR_SIZE: u64 = 1 << 22;
