// Copyright 2025 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use thiserror::Error;

pub(crate) type Result<T> = std::result::Result<T, Error>;

/// Internal error.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid logging targets: {0}")]
    ParseTargets(#[from] tracing_subscriber::filter::ParseError),

    #[error("Could not reload the log filter: {0}")]
    Reload(#[from] tracing_subscriber::reload::Error),

    #[error("Logging configuration error: {0}")]
    LoggingConfiguration(String),
}
