//! Lesson catalog and lesson unit documents.
//!
//! Every optional field has a defined default (empty sequence, empty metadata,
//! `text` content type), so partially authored files still load.

use std::convert::Infallible;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::error::PipelineError;

/// Top-level catalog: an ordered list of levels.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub levels: Vec<Level>,
}

impl Catalog {
    /// Load the catalog. Missing or malformed catalogs are fatal for a run.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let content = std::fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
        serde_json::from_str(&content).map_err(|e| PipelineError::json(path, e))
    }

    pub fn sublevel_count(&self) -> usize {
        self.levels.iter().map(|l| l.sublevels.len()).sum()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Level {
    /// Numeric level identifier (1, 2, 3, ...).
    #[serde(rename = "level")]
    pub number: u32,
    #[serde(default)]
    pub sublevels: Vec<Sublevel>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sublevel {
    /// Dotted code, e.g. `"1.1"`.
    #[serde(rename = "level")]
    pub code: String,
    /// Absent, `null` and non-string tags all read as [`ContentType::Text`].
    #[serde(rename = "type", default, deserialize_with = "content_type_or_text")]
    pub content_type: ContentType,
    /// Location of the sublevel's unit file.
    pub path: PathBuf,
}

/// Content-type tag of a sublevel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum ContentType {
    #[default]
    Text,
    Image,
    Audio,
    Mixed,
    Other(String),
}

impl ContentType {
    pub fn as_str(&self) -> &str {
        match self {
            ContentType::Text => "text",
            ContentType::Image => "image",
            ContentType::Audio => "audio",
            ContentType::Mixed => "mixed",
            ContentType::Other(tag) => tag,
        }
    }
}

impl From<String> for ContentType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "text" => ContentType::Text,
            "image" => ContentType::Image,
            "audio" => ContentType::Audio,
            "mixed" => ContentType::Mixed,
            _ => ContentType::Other(tag),
        }
    }
}

impl FromStr for ContentType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ContentType::from(s.to_string()))
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One sublevel's unit file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LessonUnit {
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl LessonUnit {
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let content = std::fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
        serde_json::from_str(&content).map_err(|e| PipelineError::json(path, e))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Exercise {
    /// Foreign-script text of the exercise. Non-string values read as `None`.
    #[serde(rename = "tibetanText", default, deserialize_with = "string_or_none")]
    pub script_text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Metadata {
    /// Entries such as `"ཀ(ka)"`. Non-string members are dropped.
    #[serde(rename = "vocabularyIntroduced", default, deserialize_with = "strings_only")]
    pub vocabulary: Vec<String>,
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

fn content_type_or_text<'de, D>(deserializer: D) -> Result<ContentType, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(tag) => ContentType::from(tag),
        _ => ContentType::Text,
    })
}

fn strings_only<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_catalog_with_default_type() {
        let catalog: Catalog = serde_json::from_str(
            r#"{"levels": [
                {"level": 1, "sublevels": [
                    {"level": "1.1", "type": "text", "path": "assets/quiz_data/level-1/alphabet.json"},
                    {"level": "1.2", "path": "assets/quiz_data/level-1/vowels.json"},
                    {"level": "1.3", "type": "quiz-audio", "path": "x.json"}
                ]},
                {"level": 2}
            ]}"#,
        )
        .unwrap();
        assert_eq!(catalog.levels.len(), 2);
        assert_eq!(catalog.sublevel_count(), 3);
        let subs = &catalog.levels[0].sublevels;
        assert_eq!(subs[0].code, "1.1");
        assert_eq!(subs[1].content_type, ContentType::Text);
        assert_eq!(
            subs[2].content_type,
            ContentType::Other("quiz-audio".to_string())
        );
        assert!(catalog.levels[1].sublevels.is_empty());
    }

    #[test]
    fn null_type_reads_as_text() {
        let catalog: Catalog = serde_json::from_str(
            r#"{"levels": [{"level": 1, "sublevels": [
                {"level": "1.1", "type": null, "path": "x.json"},
                {"level": "1.2", "type": 3, "path": "y.json"},
                {"level": "1.3", "type": "image", "path": "z.json"}
            ]}]}"#,
        )
        .unwrap();
        let subs = &catalog.levels[0].sublevels;
        assert_eq!(subs[0].content_type, ContentType::Text);
        assert_eq!(subs[1].content_type, ContentType::Text);
        assert_eq!(subs[2].content_type, ContentType::Image);
    }

    #[test]
    fn unit_tolerates_missing_and_mistyped_fields() {
        let unit: LessonUnit = serde_json::from_str(
            r#"{"exercises": [
                {"tibetanText": "ཀ", "options": ["a", "b"]},
                {"tibetanText": 42},
                {"question": "no script text"}
            ],
            "metadata": {"vocabularyIntroduced": ["ཁ(kha)", 7, null]}}"#,
        )
        .unwrap();
        assert_eq!(unit.exercises.len(), 3);
        assert_eq!(unit.exercises[0].script_text.as_deref(), Some("ཀ"));
        assert_eq!(unit.exercises[1].script_text, None);
        assert_eq!(unit.exercises[2].script_text, None);
        assert_eq!(unit.metadata.vocabulary, vec!["ཁ(kha)".to_string()]);

        let empty: LessonUnit = serde_json::from_str("{}").unwrap();
        assert!(empty.exercises.is_empty());
        assert!(empty.metadata.vocabulary.is_empty());
    }

    #[test]
    fn missing_catalog_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Catalog::load(&dir.path().join("levels.json")).unwrap_err();
        assert!(matches!(err, PipelineError::Io { .. }));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(Catalog::load(&bad), Err(PipelineError::Json { .. })));
    }

    #[test]
    fn content_type_parses_from_cli_strings() {
        assert_eq!("image".parse::<ContentType>().unwrap(), ContentType::Image);
        assert_eq!(ContentType::Mixed.to_string(), "mixed");
    }
}
