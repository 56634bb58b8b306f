// Copyright 2025 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use std::{
    env,
    ffi::OsString,
    fs,
    io::ErrorKind as IoErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};
use url::Url;

/// Address of a local skyd node.
pub const DEFAULT_API_ADDR: &str = "localhost:9980";
/// skyd only answers requests carrying this user agent.
pub const DEFAULT_USER_AGENT: &str = "Sia-Agent";
/// Overrides [`DEFAULT_API_ADDR`].
pub const API_ADDR_ENV: &str = "SKYD_API_ADDR";
/// The skyd API password. Takes precedence over the password file.
pub const API_PASSWORD_ENV: &str = "SIA_API_PASSWORD";
/// The Sia data directory holding the `apipassword` file, the same variable skyd reads.
pub const SIA_DATA_DIR_ENV: &str = "SIA_DATA_DIR";

const API_PASSWORD_FILE: &str = "apipassword";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read the API password from {path:?}: {source}")]
    PasswordFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid skyd API address {addr:?}: {source}")]
    InvalidApiAddr {
        addr: String,
        source: url::ParseError,
    },
    #[error("Failed to build the HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// How to reach the skyd node.
#[derive(Clone)]
pub struct ClientConfig {
    /// `host:port` of the skyd API.
    pub api_addr: String,
    pub user_agent: String,
    /// Sent as the basic auth password when set.
    pub api_password: Option<String>,
    /// Upper bound on every HTTP request.
    pub request_timeout: Duration,
    /// How long skyd may search the network for a registry entry. skyd's own default
    /// applies when unset.
    pub registry_lookup_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_addr: DEFAULT_API_ADDR.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            api_password: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            registry_lookup_timeout: None,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_addr", &self.api_addr)
            .field("user_agent", &self.user_agent)
            .field("api_password", &self.api_password.as_ref().map(|_| "<redacted>"))
            .field("request_timeout", &self.request_timeout)
            .field("registry_lookup_timeout", &self.registry_lookup_timeout)
            .finish()
    }
}

impl ClientConfig {
    /// The defaults, overridden by `SKYD_API_ADDR`, with the API password taken from
    /// `SIA_API_PASSWORD` or the `apipassword` file in the Sia data directory.
    ///
    /// Unlike skyd, a missing password file is not created: the client only reads the
    /// password skyd generated on its first start, and goes without one if there is none.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(addr) = env::var(API_ADDR_ENV) {
            debug!("Using skyd API address {addr} from {API_ADDR_ENV}");
            config.api_addr = addr;
        }
        config.api_password = api_password_from_env()?;
        Ok(config)
    }

    pub fn with_api_addr(mut self, api_addr: impl Into<String>) -> Self {
        self.api_addr = api_addr.into();
        self
    }

    pub fn with_api_password(mut self, password: impl Into<String>) -> Self {
        self.api_password = Some(password.into());
        self
    }

    /// Root URL of the skyd API, always ending in `/`.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let with_scheme = if self.api_addr.contains("://") {
            self.api_addr.clone()
        } else {
            format!("http://{}", self.api_addr)
        };
        let with_slash = if with_scheme.ends_with('/') {
            with_scheme
        } else {
            format!("{with_scheme}/")
        };
        Url::parse(&with_slash).map_err(|source| ConfigError::InvalidApiAddr {
            addr: self.api_addr.clone(),
            source,
        })
    }
}

fn api_password_from_env() -> Result<Option<String>, ConfigError> {
    if let Ok(password) = env::var(API_PASSWORD_ENV) {
        return Ok(Some(password));
    }
    match sia_data_dir(env::var_os(SIA_DATA_DIR_ENV)) {
        Some(dir) => read_api_password(&dir),
        None => {
            warn!("No Sia data directory, skyd requests will not be authenticated");
            Ok(None)
        }
    }
}

/// `SIA_DATA_DIR` when set and not empty, skyd's per platform default otherwise.
fn sia_data_dir(from_env: Option<OsString>) -> Option<PathBuf> {
    match from_env {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => default_sia_data_dir(),
    }
}

fn default_sia_data_dir() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        dirs_next::data_local_dir().map(|dir| dir.join("Sia"))
    } else if cfg!(target_os = "macos") {
        dirs_next::data_dir().map(|dir| dir.join("Sia"))
    } else {
        dirs_next::home_dir().map(|home| home.join(".sia"))
    }
}

/// Read the password file in `sia_dir`. A missing file means no password.
fn read_api_password(sia_dir: &Path) -> Result<Option<String>, ConfigError> {
    let path = sia_dir.join(API_PASSWORD_FILE);
    match fs::read_to_string(&path) {
        Ok(contents) => Ok(Some(contents.trim().to_string())),
        Err(err) if err.kind() == IoErrorKind::NotFound => {
            debug!("No API password file at {path:?}");
            Ok(None)
        }
        Err(source) => Err(ConfigError::PasswordFile { path, source }),
    }
}
