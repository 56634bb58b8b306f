// Copyright 2025 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

//! Logging setup shared by SkyDB binaries, examples and tests.

// Allow expect usage in logging initialization
#![allow(clippy::expect_used)]

mod error;
mod layers;

use crate::error::Result;
use layers::TracingLayers;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_core::dispatcher::DefaultGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

pub use error::Error;
pub use layers::{ReloadHandle, SKYDB_LOG_ENV};
pub use tracing_appender::non_blocking::WorkerGuard;

// re-exporting the tracing crate's Level as it is used in our public API
pub use tracing_core::Level;

#[derive(Debug, Clone)]
pub enum LogOutputDest {
    Stderr,
    Stdout,
    Path(PathBuf),
}

impl LogOutputDest {
    pub fn parse_from_str(val: &str) -> Result<Self> {
        match val {
            "stdout" => Ok(LogOutputDest::Stdout),
            "stderr" => Ok(LogOutputDest::Stderr),
            "data-dir" => {
                let timestamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
                let dir = match dirs_next::data_dir() {
                    Some(dir) => dir.join("skydb").join("logs").join(format!("log_{timestamp}")),
                    None => {
                        return Err(Error::LoggingConfiguration(
                            "could not obtain data directory path".to_string(),
                        ));
                    }
                };
                Ok(LogOutputDest::Path(dir))
            }
            // The directory does not need to exist yet, it is created on initialization.
            value => Ok(LogOutputDest::Path(PathBuf::from(value))),
        }
    }
}

impl std::fmt::Display for LogOutputDest {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            LogOutputDest::Stderr => write!(f, "stderr"),
            LogOutputDest::Stdout => write!(f, "stdout"),
            LogOutputDest::Path(p) => write!(f, "{}", p.to_string_lossy()),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LogFormat {
    Default,
    Json,
}

impl LogFormat {
    pub fn parse_from_str(val: &str) -> Result<Self> {
        match val {
            "default" => Ok(LogFormat::Default),
            "json" => Ok(LogFormat::Json),
            _ => Err(Error::LoggingConfiguration(
                "The only valid values for this argument are \"default\" or \"json\"".to_string(),
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Default => "default",
            LogFormat::Json => "json",
        }
    }
}

pub struct LogBuilder {
    default_logging_targets: Vec<(String, Level)>,
    output_dest: LogOutputDest,
    format: LogFormat,
    /// Setting this would print the sky_logging related updates to stdout.
    print_updates_to_stdout: bool,
}

impl LogBuilder {
    /// Create a new builder.
    /// The default_logging_targets are used if the `SKYDB_LOG` env variable is not set.
    ///
    /// By default, we log to stderr with the default format.
    pub fn new(default_logging_targets: Vec<(String, Level)>) -> Self {
        Self {
            default_logging_targets,
            output_dest: LogOutputDest::Stderr,
            format: LogFormat::Default,
            print_updates_to_stdout: true,
        }
    }

    pub fn output_dest(&mut self, output_dest: LogOutputDest) {
        self.output_dest = output_dest;
    }

    pub fn format(&mut self, format: LogFormat) {
        self.format = format
    }

    /// Setting this to false would prevent sky_logging from printing things to stdout.
    pub fn print_updates_to_stdout(&mut self, print: bool) {
        self.print_updates_to_stdout = print;
    }

    /// Installs the global subscriber, returning the reload handle and the
    /// non-blocking writer guard. The guard should be held for the life of the program.
    ///
    /// Logging should be instantiated only once.
    pub fn initialize(self) -> Result<(ReloadHandle, Option<WorkerGuard>)> {
        let mut layers = TracingLayers::default();

        let reload_handle = layers.fmt_layer(
            self.default_logging_targets,
            &self.output_dest,
            self.format,
            self.print_updates_to_stdout,
        )?;

        if tracing_subscriber::registry()
            .with(layers.layers)
            .try_init()
            .is_err()
        {
            eprintln!("Tried to initialize and set global default subscriber more than once");
        }

        Ok((reload_handle, layers.log_appender_guard))
    }

    /// Logs to the test output for the current thread only. Should be called from a
    /// single threaded tokio/non-tokio context; the returned guard uninstalls the
    /// subscriber when dropped.
    ///
    /// Honours `SKYDB_LOG`, defaulting to TRACE for our crates.
    pub fn init_single_threaded_tokio_test() -> DefaultGuard {
        let value = std::env::var(SKYDB_LOG_ENV).unwrap_or_else(|_| "all".to_string());
        let targets = layers::parse_targets(&value)
            .or_else(|_| layers::parse_targets("all"))
            .expect("the default test targets are valid");

        let layer = tracing_subscriber::fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_filter(targets);
        let guard = tracing_subscriber::registry().with(layer).set_default();

        let test_name = std::thread::current()
            .name()
            .unwrap_or("unknown_test")
            .to_string();
        tracing::info!("Running test: {test_name}");
        guard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::parse_targets;
    use std::{
        io::{self, Write},
        sync::{Arc, Mutex},
    };
    use tracing::{trace, warn};
    use tracing_subscriber::{
        fmt as tracing_fmt,
        layer::{Filter, SubscriberExt},
        reload, Registry,
    };

    /// Collects everything written to it.
    #[derive(Clone, Default)]
    struct BufWriter(Arc<Mutex<Vec<u8>>>);

    impl BufWriter {
        fn lines(&self) -> Vec<String> {
            let buf = self.0.lock().expect("buffer lock");
            String::from_utf8_lossy(&buf)
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    impl Write for BufWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("buffer lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn reload_handle_should_change_log_levels() -> color_eyre::Result<()> {
        let writer = BufWriter::default();
        let make_writer = {
            let writer = writer.clone();
            move || writer.clone()
        };

        let layer = tracing_fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_writer(make_writer)
            .boxed();

        let test_target = "sky_logging::tests";
        let target_filters: Box<dyn Filter<Registry> + Send + Sync> =
            Box::new(parse_targets(&format!("{test_target}=TRACE"))?);
        let (filter, handle) = reload::Layer::new(target_filters);
        let reload_handle = ReloadHandle(handle);
        let _guard = tracing_subscriber::registry()
            .with(layer.with_filter(filter))
            .set_default();

        trace!("First trace event");
        assert_eq!(writer.lines().len(), 1);
        assert!(writer.lines()[0].contains("First trace event"));

        reload_handle.modify_log_level(&format!("{test_target}=WARN"))?;

        // trace should not be logged now.
        trace!("Second trace event");
        warn!("First warn event");

        let lines = writer.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("First warn event"));
        Ok(())
    }

    #[test]
    fn output_dest_and_format_parsing() -> color_eyre::Result<()> {
        assert!(matches!(
            LogOutputDest::parse_from_str("stdout")?,
            LogOutputDest::Stdout
        ));
        assert!(matches!(
            LogOutputDest::parse_from_str("/tmp/skydb-logs")?,
            LogOutputDest::Path(_)
        ));
        assert_eq!(LogFormat::parse_from_str("json")?, LogFormat::Json);
        assert_eq!(LogFormat::Json.as_str(), "json");
        assert!(LogFormat::parse_from_str("yaml").is_err());
        Ok(())
    }
}
