//! Configuration models for smcgen.
//!
//! All tunable parameters live here and are resolved at runtime from a TOML
//! config file, with field-level defaults so a minimal file works.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration for smcgen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// External verifier (SMCDEL) configuration
    #[serde(default)]
    pub verifier: VerifierConfig,

    /// Random problem generation settings
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Worker pool configuration
    #[serde(default)]
    pub workers: PoolConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Which transport to use for the external verifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerifierMode {
    /// Pipe queries to a local `smcdel` binary.
    #[default]
    Command,
    /// POST queries to an smcdelweb endpoint.
    Http,
}

/// External verifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Transport selection
    #[serde(default)]
    pub mode: VerifierMode,

    /// Base URL of the smcdelweb endpoint (http mode)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path to the smcdel binary (command mode)
    #[serde(default = "default_binary")]
    pub binary: PathBuf,

    /// Per-call timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on transient transport failure
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_base_url() -> String {
    "https://w4eg.de/malvin/illc/smcdelweb".to_string()
}

fn default_binary() -> PathBuf {
    PathBuf::from("smcdel")
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            mode: VerifierMode::default(),
            base_url: default_base_url(),
            binary: default_binary(),
            timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
        }
    }
}

/// A predicate template available to the generator.
///
/// Templates use an explicit `{agent}` slot; the generator instantiates one
/// variable per (predicate, agent) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredicateSpec {
    /// Template, e.g. "{agent} is muddy"
    pub template: String,
    /// Negated template, e.g. "{agent} is not muddy"
    pub negated: String,
}

/// Random generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Number of agents per problem
    #[serde(default = "default_n_agents")]
    pub n_agents: usize,

    /// Predicate templates; one variable is created per (predicate, agent)
    #[serde(default = "default_predicates")]
    pub predicates: Vec<PredicateSpec>,

    /// Expression recursion depth
    #[serde(default = "default_depth")]
    pub depth: u32,

    /// Knowledge statement nesting depth
    #[serde(default = "default_knowledge_depth")]
    pub knowledge_depth: u32,

    /// Number of public announcements per problem
    #[serde(default = "default_n_announcements")]
    pub n_announcements: usize,

    /// Variables each agent directly observes
    #[serde(default = "default_n_observations")]
    pub n_observations: usize,

    /// Generate a random depth-1 law instead of the trivial Top law
    #[serde(default)]
    pub random_law: bool,

    /// Add someone/everyone/not-everyone quantifier atoms to the pool
    #[serde(default)]
    pub include_quantifiers: bool,

    /// Maximum sanity-check regeneration attempts per problem
    #[serde(default = "default_max_sanity_retries")]
    pub max_sanity_retries: u32,
}

fn default_n_agents() -> usize {
    2
}

fn default_predicates() -> Vec<PredicateSpec> {
    vec![PredicateSpec {
        template: "{agent} is muddy".to_string(),
        negated: "{agent} is not muddy".to_string(),
    }]
}

fn default_depth() -> u32 {
    1
}

fn default_knowledge_depth() -> u32 {
    1
}

fn default_n_announcements() -> usize {
    1
}

fn default_n_observations() -> usize {
    1
}

fn default_max_sanity_retries() -> u32 {
    10
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            n_agents: default_n_agents(),
            predicates: default_predicates(),
            depth: default_depth(),
            knowledge_depth: default_knowledge_depth(),
            n_announcements: default_n_announcements(),
            n_observations: default_n_observations(),
            random_law: false,
            include_quantifiers: false,
            max_sanity_retries: default_max_sanity_retries(),
        }
    }
}

/// Worker pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Number of concurrent generation workers
    #[serde(default = "default_pool_size")]
    pub size: usize,
}

fn default_pool_size() -> usize {
    4
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            size: default_pool_size(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output JSONL file path
    #[serde(default = "default_output_path")]
    pub path: PathBuf,

    /// Keep records the verifier labeled as tautologies
    #[serde(default)]
    pub include_degenerate: bool,
}

fn default_output_path() -> PathBuf {
    PathBuf::from("output/dataset.jsonl")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            include_degenerate: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_owned(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_owned(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.generator;
        if g.n_agents < 2 {
            // random_knowledge excludes the enclosing agent, so a single
            // agent cannot satisfy the adjacent-level constraint.
            return Err(ConfigError::Invalid(
                "generator.n_agents must be at least 2".to_string(),
            ));
        }
        if g.predicates.is_empty() {
            return Err(ConfigError::Invalid(
                "generator.predicates must not be empty".to_string(),
            ));
        }
        for p in &g.predicates {
            if !p.template.contains(crate::logic::AGENT_SLOT)
                || !p.negated.contains(crate::logic::AGENT_SLOT)
            {
                return Err(ConfigError::Invalid(format!(
                    "predicate template {:?} must contain the {} slot",
                    p.template,
                    crate::logic::AGENT_SLOT
                )));
            }
        }
        if g.n_observations == 0 || g.n_observations > g.n_agents * g.predicates.len() {
            return Err(ConfigError::Invalid(
                "generator.n_observations must be between 1 and the variable count".to_string(),
            ));
        }
        if g.max_sanity_retries == 0 {
            return Err(ConfigError::Invalid(
                "generator.max_sanity_retries must be at least 1".to_string(),
            ));
        }
        if self.workers.size == 0 {
            return Err(ConfigError::Invalid(
                "workers.size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_parses_with_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.verifier.mode, VerifierMode::Command);
        assert_eq!(config.generator.n_agents, 2);
        assert_eq!(config.generator.max_sanity_retries, 10);
        assert_eq!(config.workers.size, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_config_overrides_defaults() {
        let config: Config = toml::from_str(
            r#"
            [verifier]
            mode = "http"
            timeout_secs = 10

            [generator]
            n_agents = 3
            n_announcements = 2
            include_quantifiers = true
            "#,
        )
        .unwrap();
        assert_eq!(config.verifier.mode, VerifierMode::Http);
        assert_eq!(config.verifier.timeout_secs, 10);
        assert_eq!(config.verifier.max_retries, 3);
        assert_eq!(config.generator.n_agents, 3);
        assert!(config.generator.include_quantifiers);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn single_agent_config_is_rejected() {
        let config: Config = toml::from_str("[generator]\nn_agents = 1\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn predicate_without_agent_slot_is_rejected() {
        let config: Config = toml::from_str(
            r#"
            [[generator.predicates]]
            template = "the lamp is on"
            negated = "the lamp is off"
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }
}
