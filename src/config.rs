use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::Deserialize;

use crate::catalog::ContentType;
use crate::error::PipelineError;

/// Inclusive range of Unicode scalar values that identifies the target script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ScriptRange {
    pub start: u32,
    pub end: u32,
}

impl ScriptRange {
    /// Tibetan block, U+0F00..=U+0FFF.
    pub const TIBETAN: ScriptRange = ScriptRange {
        start: 0x0F00,
        end: 0x0FFF,
    };

    pub fn contains(&self, ch: char) -> bool {
        (self.start..=self.end).contains(&(ch as u32))
    }
}

impl Default for ScriptRange {
    fn default() -> Self {
        Self::TIBETAN
    }
}

/// Settings for one pipeline run.
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// catalog_path = "assets/quiz_data/levels.json"
/// audio_root = "assets/audios"
/// skip_types = ["image", "audio"]
/// script_range = { start = 0x0F00, end = 0x0FFF }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Builder)]
#[serde(default)]
#[builder(default, setter(into))]
pub struct PipelineConfig {
    /// Catalog JSON listing levels and sublevels.
    pub catalog_path: PathBuf,
    /// Root directory for generated audio.
    pub audio_root: PathBuf,
    /// Directory that relative sublevel paths are resolved against.
    /// `None` resolves them against the working directory.
    #[builder(setter(into, strip_option))]
    pub asset_root: Option<PathBuf>,
    /// Sublevel content types that are never loaded.
    pub skip_types: Vec<ContentType>,
    pub script_range: ScriptRange,
    /// Sample rate of the written WAV files.
    pub sample_rate: u32,
    /// Output file extension, without the dot.
    pub extension: String,
    /// Plan and log only; nothing is synthesized or written.
    pub dry_run: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("assets/quiz_data/levels.json"),
            audio_root: PathBuf::from("assets/facebook_audios"),
            asset_root: None,
            skip_types: vec![ContentType::Image],
            script_range: ScriptRange::default(),
            sample_rate: 16000,
            extension: "wav".to_string(),
            dry_run: false,
        }
    }
}

impl PipelineConfig {
    /// Load a config from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let content = std::fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
        let config: Self = toml::from_str(&content).map_err(|source| PipelineError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.script_range.start > self.script_range.end {
            return Err(PipelineError::Config(format!(
                "script_range start U+{:04X} is past end U+{:04X}",
                self.script_range.start, self.script_range.end
            )));
        }
        if self.sample_rate == 0 {
            return Err(PipelineError::Config("sample_rate must be positive".to_string()));
        }
        if self.extension.is_empty() || self.extension.contains(['/', '\\', '.']) {
            return Err(PipelineError::Config(format!(
                "extension {:?} must be a bare file extension",
                self.extension
            )));
        }
        Ok(())
    }

    /// Resolve a sublevel's unit path against `asset_root`.
    pub fn resolve_unit_path(&self, path: &Path) -> PathBuf {
        match &self.asset_root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }

    pub fn is_skipped(&self, content_type: &ContentType) -> bool {
        self.skip_types.contains(content_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_asset_layout() {
        let config = PipelineConfig::default();
        assert_eq!(config.catalog_path, PathBuf::from("assets/quiz_data/levels.json"));
        assert_eq!(config.skip_types, vec![ContentType::Image]);
        assert_eq!(config.script_range, ScriptRange::TIBETAN);
        assert_eq!(config.sample_rate, 16000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: PipelineConfig = toml::from_str(
            r#"
            audio_root = "out/audio"
            skip_types = ["image", "audio"]
            script_range = { start = 0x0900, end = 0x097F }
            "#,
        )
        .unwrap();
        assert_eq!(config.audio_root, PathBuf::from("out/audio"));
        assert_eq!(config.skip_types, vec![ContentType::Image, ContentType::Audio]);
        assert!(config.script_range.contains('क'));
        assert!(!config.script_range.contains('ཀ'));
        assert_eq!(config.extension, "wav");
    }

    #[test]
    fn load_reads_file_and_rejects_inverted_range() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.toml");
        std::fs::write(&good, "dry_run = true\n").unwrap();
        assert!(PipelineConfig::load(&good).unwrap().dry_run);

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "script_range = { start = 10, end = 1 }\n").unwrap();
        assert!(matches!(
            PipelineConfig::load(&bad),
            Err(PipelineError::Config(_))
        ));

        assert!(matches!(
            PipelineConfig::load(&dir.path().join("absent.toml")),
            Err(PipelineError::Io { .. })
        ));
    }

    #[test]
    fn builder_overrides_selected_fields() {
        let config = PipelineConfigBuilder::default()
            .catalog_path("levels.json")
            .asset_root("content")
            .skip_types(Vec::<ContentType>::new())
            .build()
            .unwrap();
        assert_eq!(config.catalog_path, PathBuf::from("levels.json"));
        assert_eq!(config.asset_root, Some(PathBuf::from("content")));
        assert!(config.skip_types.is_empty());
        assert_eq!(config.audio_root, PathBuf::from("assets/facebook_audios"));
    }

    #[test]
    fn relative_unit_paths_resolve_against_asset_root() {
        let mut config = PipelineConfig::default();
        assert_eq!(
            config.resolve_unit_path(Path::new("level-1/a.json")),
            PathBuf::from("level-1/a.json")
        );
        config.asset_root = Some(PathBuf::from("/srv/app"));
        assert_eq!(
            config.resolve_unit_path(Path::new("level-1/a.json")),
            PathBuf::from("/srv/app/level-1/a.json")
        );
    }
}
