// Copyright 2025 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::{
    error::{Error, Result},
    LogFormat, LogOutputDest,
};
use std::str::FromStr;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_core::Level;
use tracing_subscriber::{
    filter::Targets,
    fmt as tracing_fmt,
    layer::{Filter, Layer},
    reload, Registry,
};

/// Environment variable overriding the default logging targets.
pub const SKYDB_LOG_ENV: &str = "SKYDB_LOG";

const LOG_FILE_NAME: &str = "skydb.log";

/// Crates enabled at TRACE by the `all` keyword.
const ALL_TARGETS: [&str; 3] = ["sky_logging", "sky_protocol", "skydb"];

/// Handle that can change the log levels at runtime.
pub struct ReloadHandle(
    pub(crate) reload::Handle<Box<dyn Filter<Registry> + Send + Sync>, Registry>,
);

impl ReloadHandle {
    /// Modify the log level to the provided CSV value
    /// Example input: `info`, `all`, `skydb=trace,sky_protocol=debug`
    pub fn modify_log_level(&self, logging_value: &str) -> Result<()> {
        let targets = parse_targets(logging_value)?;
        self.0.modify(|old_filter| {
            let new_filter: Box<dyn Filter<Registry> + Send + Sync> = Box::new(targets);
            *old_filter = new_filter;
        })?;
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct TracingLayers {
    pub(crate) layers: Vec<Box<dyn Layer<Registry> + Send + Sync>>,
    pub(crate) log_appender_guard: Option<WorkerGuard>,
}

impl TracingLayers {
    pub(crate) fn fmt_layer(
        &mut self,
        default_logging_targets: Vec<(String, Level)>,
        output_dest: &LogOutputDest,
        format: LogFormat,
        print_updates_to_stdout: bool,
    ) -> Result<ReloadHandle> {
        let (writer, guard) = match output_dest {
            LogOutputDest::Stdout => tracing_appender::non_blocking(std::io::stdout()),
            LogOutputDest::Stderr => tracing_appender::non_blocking(std::io::stderr()),
            LogOutputDest::Path(dir) => {
                std::fs::create_dir_all(dir)?;
                if print_updates_to_stdout {
                    println!("Logging to directory: {dir:?}");
                }
                let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
                tracing_appender::non_blocking(appender)
            }
        };
        self.log_appender_guard = Some(guard);

        let use_ansi = matches!(output_dest, LogOutputDest::Stdout | LogOutputDest::Stderr);
        let layer = match format {
            LogFormat::Json => tracing_fmt::layer()
                .json()
                .flatten_event(true)
                .with_writer(writer)
                .boxed(),
            LogFormat::Default => tracing_fmt::layer()
                .with_ansi(use_ansi)
                .with_target(true)
                .with_writer(writer)
                .boxed(),
        };

        let targets = match std::env::var(SKYDB_LOG_ENV) {
            Ok(value) => {
                if print_updates_to_stdout {
                    println!("Using {SKYDB_LOG_ENV}={value}");
                }
                parse_targets(&value)?
            }
            Err(_) => Targets::new().with_targets(default_logging_targets),
        };

        let target_filters: Box<dyn Filter<Registry> + Send + Sync> = Box::new(targets);
        let (filter, handle) = reload::Layer::new(target_filters);
        self.layers.push(layer.with_filter(filter).boxed());

        Ok(ReloadHandle(handle))
    }
}

/// Parse a `target=level,...` list. A bare level sets the default for every target,
/// the `all` keyword enables our own crates at TRACE.
pub(crate) fn parse_targets(value: &str) -> Result<Targets> {
    let expanded = value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .flat_map(|part| {
            if part.eq_ignore_ascii_case("all") {
                ALL_TARGETS
                    .iter()
                    .map(|target| format!("{target}=TRACE"))
                    .collect::<Vec<_>>()
            } else {
                vec![part.to_string()]
            }
        })
        .collect::<Vec<_>>()
        .join(",");

    if expanded.is_empty() {
        return Err(Error::LoggingConfiguration(
            "no logging targets provided".to_string(),
        ));
    }
    Ok(Targets::from_str(&expanded)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_keyword_enables_our_crates() -> color_eyre::Result<()> {
        let targets = parse_targets("all")?;
        for target in ALL_TARGETS {
            assert!(targets.would_enable(target, &Level::TRACE));
        }
        assert!(!targets.would_enable("hyper", &Level::ERROR));
        Ok(())
    }

    #[test]
    fn bare_level_is_a_default() -> color_eyre::Result<()> {
        let targets = parse_targets("info")?;
        assert!(targets.would_enable("anything", &Level::INFO));
        assert!(!targets.would_enable("anything", &Level::DEBUG));

        let targets = parse_targets("hyper=warn, all")?;
        assert!(targets.would_enable("skydb", &Level::TRACE));
        assert!(targets.would_enable("hyper", &Level::WARN));
        assert!(!targets.would_enable("hyper", &Level::INFO));
        Ok(())
    }

    #[test]
    fn empty_targets_are_rejected() {
        assert!(parse_targets(" , ").is_err());
    }
}
