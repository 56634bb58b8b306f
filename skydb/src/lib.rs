// Copyright 2025 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

//! Mutable key-value storage on top of the Skynet registry.
//!
//! # Example
//!
//! ```no_run
//! use skydb::{Bytes, ClientConfig, DataKey, Keypair, SkyDb};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = SkyDb::new(Keypair::random(), ClientConfig::from_env()?)?;
//!     let data_key = DataKey::from_name("profile.json");
//!
//!     db.write(Bytes::from(r#"{"v":1}"#), &data_key, 1).await?;
//!     let (data, revision) = db.read(&data_key).await?;
//!     assert_eq!(revision, 1);
//!     println!("{}", String::from_utf8_lossy(&data));
//!     Ok(())
//! }
//! ```
//!
//! # Layers
//!
//! - [`sky_protocol`] encodes, signs and verifies registry entries and skylinks.
//! - [`Registry`] binds a keypair to a [`RegistryTransport`] and reads/writes one slot
//!   per data key, the slot holding a skylink.
//! - [`SkyDb`] uploads the data through a [`BlobTransport`], stores the resulting
//!   skylink in the registry, and reverses the process on reads.
//!
//! Revisions are managed by the caller. Every write must use a revision higher than
//! the one currently stored, or the network rejects it.

#[macro_use]
extern crate tracing;

pub mod client;
pub mod networking;

pub use client::{
    config::{ClientConfig, ConfigError},
    registry::{Registry, RegistryError},
    store::{MemorySkyDb, SkyDb, SkyDbApi, SkyDbError, SkydSkyDb},
    ErrorKind,
};
pub use networking::{BlobTransport, MemoryNetwork, RegistryTransport, SkydClient, TransportError};

// Re-exports of the protocol types
pub use sky_protocol::{
    DataKey, Keypair, PublicKey, RegistryEntryType, RegistryValue, Signature,
    SignedRegistryValue, Skylink,
};

#[doc(no_inline)] // Place this under 'Re-exports' in the docs.
pub use bytes::Bytes;
