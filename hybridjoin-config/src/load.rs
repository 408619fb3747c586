use std::io;
use std::path::{Path, PathBuf};

use config::{File, FileFormat, FileSourceFile};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::environment::Environment;

/// Directory, relative to the working directory, that [`load_config`] reads from.
const CONFIGURATION_DIR: &str = "configuration";

/// Extensions tried, in order, for every configuration file.
const FILE_EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

/// Environment overrides look like `APP_JOIN__WINDOW_CAPACITY=500`.
const ENV_PREFIX: &str = "APP";
const ENV_PREFIX_SEPARATOR: &str = "_";
const ENV_NESTING_SEPARATOR: &str = "__";
const ENV_LIST_SEPARATOR: &str = ",";

/// Implemented by configuration roots loadable with [`load_config`].
pub trait Config {
    /// Keys whose environment override is a comma separated list.
    const LIST_PARSE_KEYS: &'static [&'static str];
}

/// Errors raised while locating, parsing or merging configuration sources.
#[derive(Debug, Error)]
pub enum LoadConfigError {
    #[error("could not determine the working directory: {0}")]
    CurrentDir(#[source] io::Error),

    #[error("configuration directory `{0}` does not exist")]
    MissingConfigurationDirectory(PathBuf),

    /// No file with a supported extension exists for a layer.
    #[error("no {layer} configuration file in `{directory}`, tried {attempted}")]
    ConfigurationFileMissing {
        layer: String,
        directory: PathBuf,
        attempted: String,
    },

    /// A layer's file exists but cannot be parsed on its own.
    #[error("{layer} configuration file `{path}` is invalid: {source}")]
    ConfigurationFileLoad {
        layer: String,
        path: PathBuf,
        source: config::ConfigError,
    },

    #[error("could not merge configuration sources: {0}")]
    Builder(#[source] config::ConfigError),

    #[error("configuration does not match the expected structure: {0}")]
    Deserialization(#[source] config::ConfigError),

    /// `APP_ENVIRONMENT` holds an unknown value.
    #[error("invalid runtime environment: {0}")]
    Environment(#[from] io::Error),
}

/// Loads configuration from `./configuration`. See [`load_config_from`].
pub fn load_config<T>() -> Result<T, LoadConfigError>
where
    T: Config + DeserializeOwned,
{
    let working_dir = std::env::current_dir().map_err(LoadConfigError::CurrentDir)?;

    load_config_from(working_dir.join(CONFIGURATION_DIR))
}

/// Loads configuration from `directory` in three layers, later ones overriding earlier ones:
///
/// 1. `base.{yaml,yml,json}`
/// 2. `{environment}.{yaml,yml,json}`, where the environment comes from `APP_ENVIRONMENT`
/// 3. `APP_`-prefixed environment variables, nested with `__`
pub fn load_config_from<T>(directory: impl AsRef<Path>) -> Result<T, LoadConfigError>
where
    T: Config + DeserializeOwned,
{
    let directory = directory.as_ref();
    if !directory.is_dir() {
        return Err(LoadConfigError::MissingConfigurationDirectory(
            directory.to_path_buf(),
        ));
    }

    let environment = Environment::load()?;
    let base = layer_file(directory, "base")?;
    let overrides = layer_file(directory, environment.as_str())?;

    let mut env_source = config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_PREFIX_SEPARATOR)
        .separator(ENV_NESTING_SEPARATOR)
        .try_parsing(true);
    if !T::LIST_PARSE_KEYS.is_empty() {
        env_source = env_source.list_separator(ENV_LIST_SEPARATOR);
        for key in T::LIST_PARSE_KEYS {
            env_source = env_source.with_list_parse_key(key);
        }
    }

    config::Config::builder()
        .add_source(base)
        .add_source(overrides)
        .add_source(env_source)
        .build()
        .map_err(LoadConfigError::Builder)?
        .try_deserialize()
        .map_err(LoadConfigError::Deserialization)
}

/// Finds the file of one layer and checks that it parses on its own, so that a broken file is
/// reported by path instead of as a merge failure.
fn layer_file(
    directory: &Path,
    layer: &str,
) -> Result<File<FileSourceFile, FileFormat>, LoadConfigError> {
    let candidates: Vec<PathBuf> = FILE_EXTENSIONS
        .iter()
        .map(|extension| directory.join(format!("{layer}.{extension}")))
        .collect();

    let Some(path) = candidates.iter().find(|path| path.is_file()) else {
        let attempted = candidates
            .iter()
            .map(|path| format!("`{}`", path.display()))
            .collect::<Vec<_>>()
            .join(", ");

        return Err(LoadConfigError::ConfigurationFileMissing {
            layer: layer.to_string(),
            directory: directory.to_path_buf(),
            attempted,
        });
    };

    let file = File::from(path.as_path());
    config::Config::builder()
        .add_source(file.clone())
        .build()
        .map_err(|source| LoadConfigError::ConfigurationFileLoad {
            layer: layer.to_string(),
            path: path.clone(),
            source,
        })?;

    Ok(file)
}
