// Copyright 2025 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

mod data_key;

pub use data_key::DataKey;

use crate::{
    encoding::{Hash, SiaEncoder},
    keys::PublicKey,
};

/// The id under which the network stores the registry slot of `(owner, data_key)`.
///
/// A V2 skylink carries this id in place of a merkle root.
pub fn registry_entry_id(owner: &PublicKey, data_key: &DataKey) -> Hash {
    let mut enc = SiaEncoder::new();
    owner.encode_into(&mut enc);
    enc.write_fixed(data_key.as_bytes());
    enc.hash()
}
