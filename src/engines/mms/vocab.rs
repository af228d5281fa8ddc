use std::collections::HashMap;
use std::path::Path;

use super::model::MmsError;

/// Token id used for interleaved blanks (the vocabulary's id 0).
pub const BLANK_ID: i64 = 0;

/// Character-level tokenizer of an MMS VITS checkpoint.
#[derive(Debug, Clone)]
pub struct MmsTokenizer {
    vocab: HashMap<char, i64>,
    /// Interleave [`BLANK_ID`] around every token.
    pub add_blank: bool,
    /// Lowercase input before lookup.
    pub normalize: bool,
}

impl MmsTokenizer {
    /// Load `vocab.json` and, when present, `tokenizer_config.json` from a
    /// model directory.
    pub fn load(model_dir: &Path) -> Result<Self, MmsError> {
        let vocab = load_vocab(&model_dir.join("vocab.json"))?;

        let mut tokenizer = Self {
            vocab,
            add_blank: true,
            normalize: true,
        };

        let config_path = model_dir.join("tokenizer_config.json");
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let json: serde_json::Value = serde_json::from_str(&content)
                .map_err(|e| MmsError::Config(format!("tokenizer_config.json: {e}")))?;
            if let Some(add_blank) = json.get("add_blank").and_then(|v| v.as_bool()) {
                tokenizer.add_blank = add_blank;
            }
            if let Some(normalize) = json.get("normalize").and_then(|v| v.as_bool()) {
                tokenizer.normalize = normalize;
            }
            if json.get("is_uroman").and_then(|v| v.as_bool()) == Some(true) {
                log::warn!("Checkpoint expects romanized input; text is passed through unchanged");
            }
        } else {
            log::warn!("tokenizer_config.json not found, using add_blank=true normalize=true");
        }

        Ok(tokenizer)
    }

    pub fn from_vocab(vocab: HashMap<char, i64>) -> Self {
        Self {
            vocab,
            add_blank: true,
            normalize: true,
        }
    }

    /// Map text to token ids. Characters outside the vocabulary are dropped.
    pub fn encode(&self, text: &str) -> Vec<i64> {
        let normalized = if self.normalize {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        let tokens = normalized.chars().filter_map(|ch| self.vocab.get(&ch).copied());

        if !self.add_blank {
            return tokens.collect();
        }

        let mut ids = vec![BLANK_ID];
        for id in tokens {
            ids.push(id);
            ids.push(BLANK_ID);
        }
        if ids.len() == 1 {
            ids.clear();
        }
        ids
    }
}

/// Load a `vocab.json` mapping single characters to token ids.
///
/// Multi-character entries (`<pad>`, `<unk>`) are skipped.
pub fn load_vocab(vocab_path: &Path) -> Result<HashMap<char, i64>, MmsError> {
    let content = std::fs::read_to_string(vocab_path)?;
    let json: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| MmsError::Config(format!("Failed to parse vocab.json: {e}")))?;

    let vocab_obj = json
        .as_object()
        .ok_or_else(|| MmsError::Config("vocab.json must be an object".to_string()))?;

    let mut map = HashMap::new();
    for (k, v) in vocab_obj {
        let mut chars = k.chars();
        let (Some(ch), None) = (chars.next(), chars.next()) else {
            log::debug!("Skipping multi-character vocab entry {k:?}");
            continue;
        };
        let id = v
            .as_i64()
            .ok_or_else(|| MmsError::Config(format!("Non-integer vocab value for key {k:?}")))?;
        map.insert(ch, id);
    }

    if map.is_empty() {
        return Err(MmsError::Config("vocab.json has no character entries".to_string()));
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenizer() -> MmsTokenizer {
        MmsTokenizer::from_vocab([('ཀ', 5), ('ཁ', 6), ('་', 7), ('a', 8)].into_iter().collect())
    }

    #[test]
    fn interleaves_blanks() {
        assert_eq!(tokenizer().encode("ཀ་ཁ"), vec![0, 5, 0, 7, 0, 6, 0]);
    }

    #[test]
    fn drops_unknown_characters_and_lowercases() {
        let t = tokenizer();
        assert_eq!(t.encode("ཀ(ka)"), vec![0, 5, 0, 8, 0]);
        assert_eq!(t.encode("A"), vec![0, 8, 0]);
        assert!(t.encode("xyz").is_empty());
    }

    #[test]
    fn plain_encoding_without_blanks() {
        let mut t = tokenizer();
        t.add_blank = false;
        t.normalize = false;
        assert_eq!(t.encode("ཀAa"), vec![5, 8]);
    }

    #[test]
    fn loads_vocab_and_tokenizer_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("vocab.json"),
            r#"{"<pad>": 0, "ཀ": 1, "ཁ": 2, " ": 3}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("tokenizer_config.json"),
            r#"{"add_blank": false, "normalize": true, "is_uroman": false}"#,
        )
        .unwrap();

        let t = MmsTokenizer::load(dir.path()).unwrap();
        assert!(!t.add_blank);
        assert_eq!(t.encode("ཀ ཁ"), vec![1, 3, 2]);
    }

    #[test]
    fn rejects_non_integer_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.json");
        std::fs::write(&path, r#"{"ཀ": "one"}"#).unwrap();
        assert!(matches!(load_vocab(&path), Err(MmsError::Config(_))));
    }
}
