//! Pipeline configuration
//!
//! Every field has a default, so a TOML file only needs the values it changes:
//!
//! ```toml
//! validate = true
//! max_parallel_files = 8
//!
//! [defaults]
//! framework = "vue"
//!
//! [cache]
//! ttl_secs = 600
//! ```

use crate::error::ConfigError;
use crate::types::GenerationOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Run the Validate stage
    pub validate: bool,
    /// Run the Optimize stage
    pub optimize: bool,
    /// Per-file concurrency in Validate/Optimize
    pub max_parallel_files: usize,
    /// Re-run Prepare/Generate after a stage failure
    pub retry_on_failure: bool,
    /// Maximum re-runs when `retry_on_failure` is set
    pub max_retries: u32,
    /// Technology defaults for requests that leave flags unset
    pub defaults: TechDefaults,
    /// Result cache settings
    pub cache: CacheConfig,
    /// Flags passed to the code optimizer
    pub optimizer: OptimizerConfig,
}

impl PipelineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With validation on or off
    #[inline]
    #[must_use]
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validate = enabled;
        self
    }

    /// With optimization on or off
    #[inline]
    #[must_use]
    pub fn with_optimization(mut self, enabled: bool) -> Self {
        self.optimize = enabled;
        self
    }

    /// With per-file concurrency (at least 1)
    #[inline]
    #[must_use]
    pub fn with_max_parallel_files(mut self, n: usize) -> Self {
        self.max_parallel_files = n.max(1);
        self
    }

    /// With retries after stage failures
    #[inline]
    #[must_use]
    pub fn with_retries(mut self, max_retries: u32) -> Self {
        self.retry_on_failure = max_retries > 0;
        self.max_retries = max_retries;
        self
    }

    /// With technology defaults
    #[inline]
    #[must_use]
    pub fn with_defaults(mut self, defaults: TechDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// With cache settings
    #[inline]
    #[must_use]
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// With optimizer flags
    #[inline]
    #[must_use]
    pub fn with_optimizer(mut self, optimizer: OptimizerConfig) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Number of retries the orchestrator may attempt
    #[inline]
    #[must_use]
    pub fn effective_retries(&self) -> u32 {
        if self.retry_on_failure {
            self.max_retries
        } else {
            0
        }
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// Returns an error on malformed TOML or inconsistent values
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.check()?;
        Ok(config)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check value consistency
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] describing the first bad value
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.max_parallel_files == 0 {
            return Err(ConfigError::Invalid("max_parallel_files must be at least 1".into()));
        }
        if self.cache.enabled && self.cache.max_capacity == 0 {
            return Err(ConfigError::Invalid("cache.max_capacity must be positive when the cache is enabled".into()));
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            validate: true,
            optimize: true,
            max_parallel_files: 4,
            retry_on_failure: false,
            max_retries: 0,
            defaults: TechDefaults::default(),
            cache: CacheConfig::default(),
            optimizer: OptimizerConfig::default(),
        }
    }
}

/// Technology defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechDefaults {
    /// UI framework
    pub framework: String,
    /// Source language
    pub language: String,
    /// Styling approach
    pub style: String,
}

impl TechDefaults {
    /// Fill unset request flags from the defaults
    #[must_use]
    pub fn resolve(&self, options: &GenerationOptions) -> GenerationOptions {
        let pick = |value: &Option<String>, default: &str| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
                .to_string()
        };
        GenerationOptions {
            framework: Some(pick(&options.framework, &self.framework)),
            language: Some(pick(&options.language, &self.language)),
            style: Some(pick(&options.style, &self.style)),
        }
    }
}

impl Default for TechDefaults {
    fn default() -> Self {
        Self {
            framework: "react".to_string(),
            language: "typescript".to_string(),
            style: "tailwind".to_string(),
        }
    }
}

/// Result cache settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Consult and fill the cache
    pub enabled: bool,
    /// Maximum cached results
    pub max_capacity: u64,
    /// Entry lifetime in seconds
    pub ttl_secs: u64,
    /// Derive a content key when the request carries none
    pub derive_keys: bool,
}

impl CacheConfig {
    /// Entry lifetime
    #[inline]
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_capacity: 256,
            ttl_secs: 3600,
            derive_keys: false,
        }
    }
}

/// Flags passed to the code optimizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Normalize whitespace
    pub format: bool,
    /// Strip `console.log` calls
    pub remove_console: bool,
    /// Strip whole-line comments
    pub remove_comments: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            format: true,
            remove_console: false,
            remove_comments: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = PipelineConfig::default();
        assert!(config.validate && config.optimize);
        assert_eq!(config.max_parallel_files, 4);
        assert_eq!(config.effective_retries(), 0);
        assert_eq!(config.defaults.framework, "react");
        assert_eq!(config.cache.ttl(), Duration::from_secs(3600));
        assert!(config.optimizer.format && !config.optimizer.remove_console);
    }

    #[test]
    fn partial_toml() {
        let config = PipelineConfig::from_toml_str(
            "optimize = false\nmax_parallel_files = 8\n[defaults]\nframework = \"vue\"\n[cache]\nttl_secs = 60\n",
        )
        .unwrap();

        assert!(!config.optimize);
        assert_eq!(config.max_parallel_files, 8);
        assert_eq!(config.defaults.framework, "vue");
        assert_eq!(config.defaults.language, "typescript");
        assert_eq!(config.cache.ttl_secs, 60);
        assert_eq!(config.cache.max_capacity, 256);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            PipelineConfig::from_toml_str("max_parallel_files = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            PipelineConfig::from_toml_str("validate = \"yes\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "retry_on_failure = true\nmax_retries = 2").unwrap();

        let config = PipelineConfig::load(file.path()).unwrap();
        assert_eq!(config.effective_retries(), 2);

        assert!(matches!(
            PipelineConfig::load("/nonexistent/appforge.toml"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn builder() {
        let config = PipelineConfig::new()
            .with_validation(false)
            .with_max_parallel_files(0)
            .with_retries(3);
        assert!(!config.validate);
        assert_eq!(config.max_parallel_files, 1);
        assert!(config.retry_on_failure);
    }

    #[test]
    fn resolve_options() {
        let resolved = TechDefaults::default().resolve(&GenerationOptions {
            framework: Some("svelte".into()),
            language: Some("  ".into()),
            style: None,
        });
        assert_eq!(resolved.framework.as_deref(), Some("svelte"));
        assert_eq!(resolved.language.as_deref(), Some("typescript"));
        assert_eq!(resolved.style.as_deref(), Some("tailwind"));
    }
}
