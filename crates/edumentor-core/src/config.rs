use crate::prompts::PromptTemplates;
use crate::types::TopicRule;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Value shipped in sample `.env` files. Treated the same as a missing key.
pub const PLACEHOLDER_API_KEY: &str = "your_gemini_api_key_here";

/// Top-level application configuration, loaded from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    pub server: ServerConfig,
    pub prompts: PromptTemplates,
    /// Ordered classifier table. Earlier entries win ties.
    pub topics: Vec<TopicRule>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            server: ServerConfig::default(),
            prompts: PromptTemplates::default(),
            topics: default_topics(),
        }
    }
}

impl AppConfig {
    /// Load configuration from default path (~/.config/edumentor/config.toml),
    /// falling back to defaults if the file doesn't exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Write current configuration to the default path.
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::default_path())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Default config file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("edumentor")
            .join("config.toml")
    }
}

/// Completion provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL for the OpenAI-compatible API.
    pub api_base: String,
    /// API key. Takes precedence over `api_key_env`.
    pub api_key: Option<String>,
    /// Environment variable consulted when `api_key` is unset.
    pub api_key_env: String,
    /// Candidate models, tried in order during initialization.
    pub models: Vec<String>,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Upper bound on a single completion request, smoke prompts included.
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_base: "https://generativelanguage.googleapis.com/v1beta/openai".into(),
            api_key: None,
            api_key_env: "GEMINI_API_KEY".into(),
            models: vec![
                "gemini-2.5-flash".into(),
                "gemini-2.5-pro".into(),
                "gemini-2.0-flash".into(),
                "gemini-flash-latest".into(),
                "gemini-pro-latest".into(),
            ],
            max_tokens: 1024,
            temperature: 0.7,
            timeout_secs: 20,
        }
    }
}

impl ProviderConfig {
    /// Resolve the credential from config or environment.
    ///
    /// Returns `None` when the key is missing, blank, or still the placeholder.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .map(|key| key.trim().to_string())
            .filter(|key| is_usable_key(key))
    }
}

fn is_usable_key(key: &str) -> bool {
    !key.is_empty() && key != PLACEHOLDER_API_KEY
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Port.
    pub port: u16,
    /// Enable CORS.
    pub cors: bool,
    /// Name reported by the health endpoint.
    pub service_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8000,
            cors: true,
            service_name: "edumentor-api".into(),
        }
    }
}

/// The built-in classifier table.
pub fn default_topics() -> Vec<TopicRule> {
    vec![
        TopicRule::new(
            "Photosynthesis",
            &["photosynthesis", "chlorophyll", "plant", "farming", "crop"],
        ),
        TopicRule::new(
            "Newton's Laws",
            &["newton", "force", "motion", "inertia", "momentum"],
        ),
        TopicRule::new("Gravity", &["gravity", "weight", "mass", "fall"]),
        TopicRule::new(
            "Electricity",
            &["electric", "current", "voltage", "solar", "power", "energy"],
        ),
        TopicRule::new(
            "Cell Biology",
            &["cell", "nucleus", "mitochondria", "membrane", "biology"],
        ),
        TopicRule::new(
            "Water Cycle",
            &["water cycle", "evaporation", "condensation", "rain", "precipitation"],
        ),
        TopicRule::new(
            "Chemistry",
            &["atom", "molecule", "element", "chemical", "reaction"],
        ),
        TopicRule::new("Energy", &["energy", "kinetic", "potential", "thermal"]),
        TopicRule::new(
            "Evolution",
            &["evolution", "natural selection", "species", "darwin"],
        ),
        TopicRule::new(
            "Mathematics",
            &["equation", "algebra", "geometry", "calculus", "function"],
        ),
        TopicRule::new(
            "Physics",
            &["physics", "velocity", "acceleration", "trajectory"],
        ),
        TopicRule::new(
            "Astronomy",
            &["planet", "star", "solar system", "space", "universe"],
        ),
    ]
}
