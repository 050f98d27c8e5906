//! Shared configuration loader for the statprobe toolchain.
//!
//! `defaults/statprobe.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`StatprobeConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use statprobe_parser::statute::synthetic::{RenderStyle, SyntheticRenderer};
use statprobe_parser::statute::uslm::ParserOptions;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../defaults/statprobe.default.toml");

/// Top-level configuration consumed by statprobe applications.
#[derive(Debug, Clone, Deserialize)]
pub struct StatprobeConfig {
    pub generator: GeneratorConfig,
    pub render: RenderConfig,
    pub uslm: ParserOptions,
    pub logging: LoggingConfig,
}

/// Shape and term source of generated statutes.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    pub depth: usize,
    pub width: usize,
    pub seed: u64,
    #[serde(default)]
    pub nonce_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    pub section_number: String,
    pub style: RenderStyle,
    pub sentence_prefix: String,
}

impl RenderConfig {
    /// Renderer carrying the configured section number and sentence prefix.
    pub fn renderer(&self) -> SyntheticRenderer {
        SyntheticRenderer::new(self.section_number.clone())
            .with_sentence_prefix(self.sentence_prefix.clone())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub filter: String,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<StatprobeConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<StatprobeConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.generator.depth, 2);
        assert_eq!(config.generator.width, 2);
        assert_eq!(config.generator.seed, 42);
        assert_eq!(config.generator.nonce_file, None);
        assert_eq!(config.render.style, RenderStyle::Statute);
        assert_eq!(config.render.section_number, "1001");
        assert!(config.uslm.exception_identifiers.is_empty());
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("render.style", "compact")
            .expect("override to apply")
            .set_override("generator.depth", 3_i64)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.render.style, RenderStyle::Compact);
        assert_eq!(config.generator.depth, 3);
    }

    #[test]
    fn user_file_layers_over_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("statprobe.toml");
        fs::write(
            &path,
            "[uslm]\nexception_identifiers = [\"/us/usc/t26/s152/d\"]\n\n[render]\nsection_number = \"2002\"\n",
        )
        .expect("write config");

        let config = Loader::new().with_file(&path).build().expect("config to build");
        assert_eq!(config.uslm.exception_identifiers, vec!["/us/usc/t26/s152/d"]);
        assert_eq!(config.render.section_number, "2002");
        assert_eq!(config.render.style, RenderStyle::Statute);
        assert_eq!(config.generator.width, 2);
    }

    #[test]
    fn overrides_win_over_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("statprobe.toml");
        fs::write(&path, "[generator]\ndepth = 4\nwidth = 3\nseed = 9\n").expect("write config");

        let config = Loader::new()
            .with_file(&path)
            .set_override("generator.depth", 1_i64)
            .expect("override to apply")
            .set_override("generator.seed", 7_u64)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.generator.depth, 1);
        assert_eq!(config.generator.width, 3);
        assert_eq!(config.generator.seed, 7);
    }

    #[test]
    fn missing_required_file_fails() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result = Loader::new().with_file(dir.path().join("absent.toml")).build();
        assert!(result.is_err());
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = Loader::new()
            .with_optional_file(dir.path().join("absent.toml"))
            .build()
            .expect("config to build");
        assert_eq!(config.generator.seed, 42);
    }

    #[test]
    fn renderer_uses_configured_prefix() {
        let config = load_defaults().expect("defaults to deserialize");
        let renderer = config.render.renderer();
        assert_eq!(renderer.section, "1001");
        assert_eq!(renderer.sentence_prefix.as_deref(), Some("Sentence {}: "));
    }
}
