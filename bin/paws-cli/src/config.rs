//! Configuration types for the CLI client, loaded from `paws.toml`.
//!
//! Every value can be overridden from the environment with a `PAWS__`
//! prefix and `__` between path segments, e.g. `PAWS__API__BASE_URL` or
//! `PAWS__SESSION__USER_ID`.

use paws_adapters::http_api::DEFAULT_BASE_URL;
use paws_runtime::core::types::{Session, SpeciesEntry};
use serde::Deserialize;

/// Top-level client configuration.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PawsConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: Session,
    /// Replaces the built-in species table, in declared order.
    #[serde(default)]
    pub species: Vec<SpeciesEntry>,
}

/// Which backend the client talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum BackendKind {
    /// The Pawsibilities REST API.
    #[default]
    Http,
    /// A process-local store seeded with demo pets.
    Memory,
}

/// Backend connection settings.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiConfig {
    #[serde(default)]
    pub backend: BackendKind,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-call deadline for favorite and image-label requests.
    pub request_timeout_ms: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { backend: BackendKind::default(), base_url: default_base_url(), request_timeout_ms: None }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("PAWS").prefix_separator("__").separator("__").try_parsing(true)
}

/// Load configuration from an optional TOML file plus `PAWS__*` variables.
///
/// # Errors
/// Returns an error if the file exists but cannot be parsed, or a value has the wrong type.
pub(crate) fn load_config(path: &str) -> eyre::Result<PawsConfig> {
    load_with_env(path, environment())
}

fn load_with_env(path: &str, env: config::Environment) -> eyre::Result<PawsConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(path).required(false))
        .add_source(env)
        .build()?;
    let cfg: PawsConfig = settings.try_deserialize()?;
    cfg.validate()?;
    Ok(cfg)
}

impl PawsConfig {
    /// Blank names would match every label during species inference.
    fn validate(&self) -> eyre::Result<()> {
        for (index, entry) in self.species.iter().enumerate() {
            if entry.name.trim().is_empty() {
                eyre::bail!("species entry #{} has a blank name", index + 1);
            }
            if entry.breeds.iter().any(|b| b.trim().is_empty()) {
                eyre::bail!("species '{}' lists a blank breed", entry.name);
            }
        }
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::io::Write;

    use paws_runtime::core::types::{UserId, UserRole};

    use super::*;

    fn write_toml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn no_env() -> config::Environment {
        environment().source(Some(config::Map::new()))
    }

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        environment().source(Some(
            vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect(),
        ))
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let cfg = load_with_env(path.to_str().unwrap(), no_env()).unwrap();

        assert_eq!(cfg.api.backend, BackendKind::Http);
        assert_eq!(cfg.api.base_url, DEFAULT_BASE_URL);
        assert!(cfg.api.request_timeout_ms.is_none());
        assert!(!cfg.session.is_logged_in());
        assert!(cfg.species.is_empty());
    }

    #[test]
    fn parse_full_toml() {
        let file = write_toml(
            r#"
[api]
backend = "memory"
base_url = "http://localhost:5000/api"
request_timeout_ms = 8000

[session]
user_id = "64f0aa"
role = "adopter"

[[species]]
name = "ferret"
breeds = ["Standard", "Angora"]

[[species]]
name = "dog"
breeds = ["Beagle"]
"#,
        );

        let cfg = load_with_env(file.path().to_str().unwrap(), no_env()).unwrap();

        assert_eq!(cfg.api.backend, BackendKind::Memory);
        assert_eq!(cfg.api.base_url, "http://localhost:5000/api");
        assert_eq!(cfg.api.request_timeout_ms, Some(8000));
        assert_eq!(cfg.session.user_id, Some(UserId::from("64f0aa")));
        assert_eq!(cfg.session.role, Some(UserRole::Adopter));
        assert_eq!(cfg.species.len(), 2);
        assert_eq!(cfg.species[0].name, "ferret");
        assert_eq!(cfg.species[1].breeds, ["Beagle"]);
    }

    #[test]
    fn environment_overrides_file() {
        let file = write_toml(
            r#"
[api]
base_url = "http://localhost:5000/api"
"#,
        );

        let cfg = load_with_env(
            file.path().to_str().unwrap(),
            env(&[
                ("PAWS__API__BASE_URL", "https://staging.example/api"),
                ("PAWS__API__REQUEST_TIMEOUT_MS", "2500"),
                ("PAWS__SESSION__USER_ID", "u-9"),
            ]),
        )
        .unwrap();

        assert_eq!(cfg.api.base_url, "https://staging.example/api");
        assert_eq!(cfg.api.request_timeout_ms, Some(2500));
        assert_eq!(cfg.session.user_id, Some(UserId::from("u-9")));
    }

    #[test]
    fn blank_species_rows_are_rejected() {
        let blank_name = write_toml(
            r#"
[[species]]
name = "  "
breeds = ["Angora"]
"#,
        );
        let err = load_with_env(blank_name.path().to_str().unwrap(), no_env()).unwrap_err();
        assert!(err.to_string().contains("blank name"));

        let blank_breed = write_toml(
            r#"
[[species]]
name = "ferret"
breeds = ["Angora", ""]
"#,
        );
        let err = load_with_env(blank_breed.path().to_str().unwrap(), no_env()).unwrap_err();
        assert!(err.to_string().contains("blank breed"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let file = write_toml("[api\nbase_url = ");
        assert!(load_with_env(file.path().to_str().unwrap(), no_env()).is_err());
    }
}
