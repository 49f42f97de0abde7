/*!
Configuration loading and logger setup
*/

use anyhow::Context;
use cbor_print::config::{Colors, Config, Mode};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

const PKG_NAME: &str = env!("CARGO_PKG_NAME");
const CONFIG_FILE_ENV: &str = "CBOR_PRINT_CONFIG_FILE";
const ENV_PREFIX: &str = "CBOR_PRINT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Designates very low priority, often extremely verbose, information.
    #[value(name = "trace")]
    Trace,

    /// Designates lower priority information.
    #[value(name = "debug")]
    Debug,

    /// Designates useful information.
    #[value(name = "info")]
    Info,

    /// Designates hazardous situations.
    #[value(name = "warn")]
    Warn,

    /// Designates very serious errors.
    #[value(name = "error")]
    Error,
}

impl From<Verbosity> for tracing::Level {
    fn from(value: Verbosity) -> Self {
        match value {
            Verbosity::Trace => tracing::Level::TRACE,
            Verbosity::Debug => tracing::Level::DEBUG,
            Verbosity::Info => tracing::Level::INFO,
            Verbosity::Warn => tracing::Level::WARN,
            Verbosity::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct Settings {
    // Logging level when --verbose is not given, default 'warn'
    pub log_level: Option<Verbosity>,

    // Rendering mode, 'plain' or 'pretty'
    pub mode: Mode,

    // Escape sequences for the pretty mode
    pub colors: Colors,
}

pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "cbor-print", PKG_NAME)
        .map(|proj_dirs| proj_dirs.config_local_dir().to_path_buf())
}

impl Settings {
    /// Load settings from a TOML file and `CBOR_PRINT_*` environment
    /// variables. Also returns a description of where the file came from.
    pub fn load(path: Option<&Path>) -> anyhow::Result<(Self, String)> {
        let mut b = config::Config::builder();

        let config_source: String;
        if let Some(path) = path {
            config_source = format!(
                "Using configuration file '{}' specified on command line",
                path.display()
            );
            b = b.add_source(config::File::from(path).format(config::FileFormat::Toml));
        } else if let Ok(source) = std::env::var(CONFIG_FILE_ENV) {
            config_source = format!(
                "Using configuration file '{source}' specified by {CONFIG_FILE_ENV} environment variable"
            );
            b = b.add_source(config::File::with_name(&source).format(config::FileFormat::Toml));
        } else if let Some(dir) = config_dir() {
            let path = dir.join(format!("{PKG_NAME}.toml"));
            config_source = format!(
                "Using optional configuration file '{}'",
                path.display()
            );
            b = b.add_source(
                config::File::from(path)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        } else {
            config_source = "No configuration file".to_string();
        }

        // Pull in environment vars, e.g. CBOR_PRINT_COLORS__HEADER
        b = b.add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"));

        let settings = b
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;
        Ok((settings, config_source))
    }

    pub fn printer_config(&self) -> Config {
        Config {
            mode: self.mode,
            colors: self.colors.clone(),
        }
    }
}

pub fn init_logger(level: Option<tracing::Level>) {
    let level = level.unwrap_or(tracing::Level::WARN);
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(level > tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();
}
