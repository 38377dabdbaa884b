//! Client config load/save for `~/.coaching-zone/config.yaml`.
//! Every field is optional; missing fields fall back to the built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::category::Categories;
use crate::error::ConfigError;
use crate::glossary::Glossary;

pub const DEFAULT_WEBHOOK_URL: &str = "http://127.0.0.1:5678/webhook/coaching-zone/chat";
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// Starter prompt shown next to the question field.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Example {
    pub label: String,
    #[serde(alias = "q")]
    pub question: String,
    #[serde(default, alias = "bucket", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Example {
    fn new(label: &str, question: &str, category: &str) -> Self {
        Self {
            label: label.into(),
            question: question.into(),
            category: Some(category.into()),
        }
    }
}

/// Full client config. Built once at startup and passed by reference.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    pub webhook_url: String,
    pub mount_id: String,
    pub history_key: String,
    pub request_timeout_ms: u64,
    /// Pass HTML (and fenced HTML blocks) from the webhook through unescaped.
    pub trust_remote_html: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
    pub categories: Categories,
    pub glossary: Glossary,
    pub examples: Vec<Example>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            webhook_url: DEFAULT_WEBHOOK_URL.into(),
            mount_id: "coaching-zone".into(),
            history_key: "coaching-zone-history".into(),
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
            trust_remote_html: true,
            storage_dir: None,
            categories: Categories::default(),
            glossary: default_glossary(),
            examples: default_examples(),
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn default_glossary() -> Glossary {
    [
        ("clear", "Hoher, weiter Schlag in die hintere Feldhälfte (Clear)."),
        ("lift", "Defensiver hoher Schlag aus der vorderen/hinteren Feldhälfte (Lift)."),
        ("longline", "Platzierung entlang der Seitenlinie (Longline)."),
        ("drop", "Kurzer, präziser Schlag aus dem Hinterfeld ins Vorderfeld (Drop)."),
        ("split-step", "Kleiner beidbeiniger Absprung zur Vorbereitung eines Richtungswechsels."),
    ]
    .into_iter()
    .collect()
}

fn default_examples() -> Vec<Example> {
    vec![
        Example::new(
            "Übung: Lift-Longline sicher lernen",
            "Welche 3-Phasen-Übung eignet sich, um den Lift Longline technisch sauber zu festigen – inkl. Progressionen für U13?",
            "schlagtechnik",
        ),
        Example::new(
            "Footwork: Einstieg Split-Step",
            "Wie vermittle ich den Split-Step Einsteigern, inkl. 10-Minuten-Aufwärmblock und Fehlerbildern?",
            "lauftechnik",
        ),
        Example::new(
            "Taktik: Doppel-Return-Varianten",
            "Welche Return-Varianten im Doppel gegen hohes Serve sind sinnvoll und wie trainiere ich die Entscheidung?",
            "taktik",
        ),
        Example::new(
            "Athletik im Jugendtraining",
            "Gib mir einen 15-Minuten-Athletikblock ohne Geräte für U11 nach dem RAMP-Schema.",
            "athletik",
        ),
        Example::new(
            "Trainingsprozess planen",
            "Plane eine 60-Minuten-Einheit Schwerpunkt Netzdrop für gemischte Gruppe (U15–U17) mit Differenzierung.",
            "trainingsprozess",
        ),
    ]
}

/// Returns the default config file path: `~/.coaching-zone/config.yaml` (platform-specific).
pub fn default_config_path() -> Option<PathBuf> {
    let home = home_dir()?;
    Some(home.join(".coaching-zone").join("config.yaml"))
}

#[cfg(unix)]
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

#[cfg(windows)]
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE").map(PathBuf::from)
}

#[cfg(not(any(unix, windows)))]
fn home_dir() -> Option<PathBuf> {
    None
}

/// Load config from a YAML file. Path is typically `~/.coaching-zone/config.yaml`.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    // An empty file is valid and means "all defaults".
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(serde_yaml::from_str(&contents)?)
}

/// Like [`load`], but a missing file yields the defaults.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }
    load(path)
}

/// Save config to a YAML file. Creates parent directory if missing.
pub fn save(path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let contents = serde_yaml::to_string(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}
