// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! `vela.toml` loading.
//!
//! Search order: the `--config` path, then `./vela.toml`, then defaults.
//!
//! ```toml
//! [doctest]
//! backends = ["Simulator"]
//! fence_policy = "warn"
//! ```

use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::Deserialize;
use vela_doctest::DocTestConfig;

use crate::error::CliError;

const LOCAL_CONFIG: &str = "vela.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    doctest: DocTestConfig,
}

pub fn load_config(explicit_path: Option<&Path>) -> Result<DocTestConfig, CliError> {
    if let Some(path) = explicit_path {
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local = Path::new(LOCAL_CONFIG);
    if local.exists() {
        info!(path = local.display().to_string(); "Loading configuration from local path");
        return load_config_file(local);
    }

    debug!("No configuration file found, using default configuration");
    Ok(DocTestConfig::default())
}

fn load_config_file(path: &Path) -> Result<DocTestConfig, CliError> {
    if !path.exists() {
        return Err(CliError::MissingConfig(path.to_path_buf()));
    }
    let content = fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_path_buf(), source })?;
    parse_config(&content).map_err(|message| CliError::Config { path: path.to_path_buf(), message })
}

fn parse_config(content: &str) -> Result<DocTestConfig, String> {
    let file: ConfigFile = toml::from_str(content).map_err(|e| e.to_string())?;
    Ok(file.doctest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_doctest::FencePolicy;

    #[test]
    fn doctest_table() {
        let config = parse_config("[doctest]\nbackends = [\"Simulator\"]\nfence_policy = \"warn\"\n").unwrap();
        assert_eq!(config.backends, vec!["Simulator"]);
        assert_eq!(config.fence_policy, FencePolicy::Warn);
        assert_eq!(config.default_namespace, "Vela.DocTests");
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(parse_config("").unwrap(), DocTestConfig::default());
    }

    #[test]
    fn unknown_keys_are_errors() {
        assert!(parse_config("[doctest]\nbackend = \"Simulator\"\n").is_err());
        assert!(parse_config("[doctests]\n").is_err());
    }

    #[test]
    fn explicit_path_must_exist() {
        let err = load_config(Some(Path::new("/nonexistent/vela.toml"))).unwrap_err();
        assert!(matches!(err, CliError::MissingConfig(_)));
    }
}
