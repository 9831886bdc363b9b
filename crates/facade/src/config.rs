//! Facade configuration

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable selecting fixture-backed serving
pub const MOCK_MODE_VAR: &str = "MOCK_MODE";

#[derive(Debug, Clone, Deserialize)]
pub struct FacadeConfig {
    /// HTTP listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the fixture documents served in mock mode
    #[serde(default = "default_fixtures_dir")]
    pub fixtures_dir: PathBuf,

    /// Explicit kubeconfig path
    #[serde(default)]
    pub kubeconfig: Option<PathBuf>,

    #[serde(skip)]
    pub mock: bool,
}

fn default_port() -> u16 {
    4000
}

fn default_fixtures_dir() -> PathBuf {
    PathBuf::from("./fixtures")
}

impl FacadeConfig {
    /// Load `SCHEDVIEW_*` settings and the process-wide mock flag
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("SCHEDVIEW"))
            .build()?;

        let mut facade: FacadeConfig = config
            .try_deserialize()
            .context("Invalid SCHEDVIEW_* configuration")?;
        facade.mock = mock_flag(std::env::var(MOCK_MODE_VAR).ok().as_deref());

        Ok(facade)
    }

    /// Kubeconfig to load, if any: explicit setting, then `KUBECONFIG`, then `~/.kube/config`
    pub fn kubeconfig_path(&self) -> Option<PathBuf> {
        resolve_kubeconfig(
            self.kubeconfig.as_deref(),
            std::env::var("KUBECONFIG").ok(),
            dirs_next::home_dir(),
        )
    }
}

fn resolve_kubeconfig(
    explicit: Option<&Path>,
    env: Option<String>,
    home: Option<PathBuf>,
) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| env.filter(|v| !v.is_empty()).map(PathBuf::from))
        .or_else(|| home.map(|h| h.join(".kube").join("config")))
}

/// `MOCK_MODE` value, surrounding whitespace ignored; unset or unparseable is false
fn mock_flag(value: Option<&str>) -> bool {
    value.and_then(|v| parse_bool(v.trim())).unwrap_or(false)
}

/// Boolean spellings accepted for `MOCK_MODE`; anything else is not a boolean
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
