// Copyright 2025 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

//! Protocol types for SkyDB: skylinks, registry entries and the keys that sign them.
//!
//! Nothing in this crate talks to the network. It owns the byte-exact encodings that
//! skyd and the hosts agree on, so every type here must round-trip with the existing
//! network without loss.

#[macro_use]
extern crate tracing;

pub mod constants;
pub mod encoding;
pub mod error;
pub mod keys;
pub mod storage;

pub use self::{
    error::{Error, Result},
    keys::{Keypair, PublicKey, Signature},
    storage::{
        registry_entry_id, DataKey, RegistryEntryType, RegistryValue, SignedRegistryValue,
        Skylink,
    },
};

#[doc(no_inline)]
pub use bytes::Bytes;
