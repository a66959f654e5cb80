//! Command-line configuration shared by the binaries.

use std::path::PathBuf;

use knapsack_crh::DEFAULT_DIMENSION;
use membership_circuits::MAX_TREE_DEPTH;
use thiserror::Error;

/// Tree depth used when `--depth` is not given.
pub const DEFAULT_DEPTH: usize = MAX_TREE_DEPTH;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown argument `{0}`")]
    UnknownArgument(String),
    #[error("missing value for `{0}`")]
    MissingValue(&'static str),
    #[error("invalid value `{value}` for `{flag}`")]
    InvalidValue { flag: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CliConfig {
    pub depth: usize,
    pub dimension: usize,
    pub out_dir: PathBuf,
    pub help: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            dimension: DEFAULT_DIMENSION,
            out_dir: PathBuf::from("keys"),
            help: false,
        }
    }
}

impl CliConfig {
    /// Parse `--depth N`, `--dimension D`, `--out DIR` and `--help`.
    /// `args` excludes the program name.
    pub fn parse<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter().map(Into::into);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--depth" => config.depth = parse_positive("--depth", args.next())?,
                "--dimension" => config.dimension = parse_positive("--dimension", args.next())?,
                "--out" => {
                    config.out_dir = args.next().ok_or(ConfigError::MissingValue("--out"))?.into()
                }
                "--help" | "-h" => config.help = true,
                _ => return Err(ConfigError::UnknownArgument(arg)),
            }
        }
        Ok(config)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::parse(std::env::args().skip(1))
    }
}

fn parse_positive(flag: &'static str, value: Option<String>) -> Result<usize, ConfigError> {
    let value = value.ok_or(ConfigError::MissingValue(flag))?;
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidValue { flag, value }),
    }
}

/// Install the `RUST_LOG`-driven subscriber used by the binaries.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::parse(Vec::<String>::new()).unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.depth, 16);
        assert_eq!(config.dimension, 1);
    }

    #[test]
    fn test_parse_flags() {
        let config = CliConfig::parse(["--depth", "8", "--dimension", "2", "--out", "/tmp/k"]).unwrap();
        assert_eq!(config.depth, 8);
        assert_eq!(config.dimension, 2);
        assert_eq!(config.out_dir, PathBuf::from("/tmp/k"));
        assert!(!config.help);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            CliConfig::parse(["--depth"]),
            Err(ConfigError::MissingValue("--depth"))
        );
        assert_eq!(
            CliConfig::parse(["--depth", "0"]),
            Err(ConfigError::InvalidValue {
                flag: "--depth",
                value: "0".into()
            })
        );
        assert_eq!(
            CliConfig::parse(["--verbose"]),
            Err(ConfigError::UnknownArgument("--verbose".into()))
        );
    }
}
