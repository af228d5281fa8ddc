use std::path::{Path, PathBuf};

use ndarray::Array2;
use ort::execution_providers::CPUExecutionProvider;
use ort::inputs;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::TensorRef;

use super::vocab::MmsTokenizer;

/// Sample rate of MMS checkpoints when `config.json` does not say otherwise.
pub const DEFAULT_SAMPLE_RATE: u32 = 16000;

/// Crossfade (in samples) used when concatenating chunk audio.
const CHUNK_CROSSFADE_SAMPLES: usize = 160; // 10ms @ 16kHz

#[derive(thiserror::Error, Debug)]
pub enum MmsError {
    #[error("ONNX runtime error: {0}")]
    Ort(#[from] ort::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
    #[error("No characters of {0:?} are in the model vocabulary")]
    Untokenizable(String),
    #[error("Model not loaded. Call load_model() first.")]
    ModelNotLoaded,
    #[error("Invalid model config: {0}")]
    Config(String),
}

/// Internal MMS VITS ONNX model state.
pub struct MmsModel {
    session: Session,
    tokenizer: MmsTokenizer,
    sample_rate: u32,
    /// Detected input name: "input_ids" or "text"
    ids_input_name: String,
    /// True if the graph also declares an `attention_mask` input
    has_attention_mask: bool,
}

impl MmsModel {
    /// Load an MMS model from a directory.
    ///
    /// The directory must contain:
    /// - An `.onnx` file (preferably `model.onnx`)
    /// - A `vocab.json` character vocabulary
    /// - Optionally `tokenizer_config.json` and `config.json`
    pub fn load(model_dir: &Path, num_threads: Option<usize>) -> Result<Self, MmsError> {
        let onnx_path = find_onnx_file(model_dir)?;
        log::info!("Loading MMS model from {}", onnx_path.display());

        let session = init_session(&onnx_path, num_threads)?;

        let ids_input_name = detect_ids_input(&session);
        let has_attention_mask = session.inputs().iter().any(|i| i.name() == "attention_mask");
        log::info!(
            "Detected: ids_input='{}', attention_mask={}",
            ids_input_name,
            has_attention_mask
        );

        let tokenizer = MmsTokenizer::load(model_dir)?;
        let sample_rate = read_sample_rate(&model_dir.join("config.json"))?;

        Ok(Self {
            session,
            tokenizer,
            sample_rate,
            ids_input_name,
            has_attention_mask,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Synthesize audio from text, splitting it into chunks of at most
    /// `max_chunk_chars` characters.
    pub fn synthesize_text(
        &mut self,
        text: &str,
        max_chunk_chars: usize,
    ) -> Result<Vec<f32>, MmsError> {
        let mut combined = Vec::new();

        for chunk in split_text(text, max_chunk_chars) {
            let ids = self.tokenizer.encode(chunk);
            if ids.is_empty() {
                log::debug!("Chunk {chunk:?} produced no tokens, skipping");
                continue;
            }

            let audio = self.synthesize_ids(&ids)?;
            if combined.is_empty() {
                combined = audio;
            } else {
                append_with_crossfade(&mut combined, &audio, CHUNK_CROSSFADE_SAMPLES);
            }
        }

        if combined.is_empty() && !text.trim().is_empty() {
            return Err(MmsError::Untokenizable(text.to_string()));
        }
        Ok(combined)
    }

    /// Run ONNX inference on a single token sequence.
    fn synthesize_ids(&mut self, ids: &[i64]) -> Result<Vec<f32>, MmsError> {
        let ids_arr = Array2::from_shape_vec((1, ids.len()), ids.to_vec())?;

        let output = if self.has_attention_mask {
            let mask_arr = Array2::<i64>::ones((1, ids.len()));
            let inputs = inputs![
                self.ids_input_name.as_str() => TensorRef::from_array_view(ids_arr.view())?,
                "attention_mask" => TensorRef::from_array_view(mask_arr.view())?,
            ];
            self.session.run(inputs)?
        } else {
            let inputs = inputs![
                self.ids_input_name.as_str() => TensorRef::from_array_view(ids_arr.view())?,
            ];
            self.session.run(inputs)?
        };

        // First output is the waveform, shape [1, samples]
        let first_output = output
            .iter()
            .next()
            .ok_or_else(|| MmsError::Ort(ort::Error::new("No output from model")))?;
        let waveform = first_output.1.try_extract_array::<f32>()?;

        Ok(waveform.iter().copied().collect())
    }
}

/// Find the ONNX model file in the given directory.
///
/// Prefers `model.onnx`, then falls back to the first `.onnx` file found.
fn find_onnx_file(model_dir: &Path) -> Result<PathBuf, MmsError> {
    let preferred = model_dir.join("model.onnx");
    if preferred.exists() {
        return Ok(preferred);
    }

    for entry in std::fs::read_dir(model_dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) == Some("onnx") {
            log::info!("Using ONNX file: {}", path.display());
            return Ok(path);
        }
    }

    Err(MmsError::Io(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        format!("No .onnx file found in {}", model_dir.display()),
    )))
}

fn init_session(onnx_path: &Path, num_threads: Option<usize>) -> Result<Session, MmsError> {
    let providers = vec![CPUExecutionProvider::default().build()];

    let mut builder = Session::builder()?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_execution_providers(providers)?;

    if let Some(threads) = num_threads {
        builder = builder
            .with_intra_threads(threads)?
            .with_inter_threads(threads)?;
    }

    Ok(builder.commit_from_file(onnx_path)?)
}

fn detect_ids_input(session: &Session) -> String {
    for input in session.inputs() {
        if input.name() == "input_ids" || input.name() == "text" {
            return input.name().to_string();
        }
    }
    "input_ids".to_string()
}

/// Read `sampling_rate` from a transformers `config.json`, if present.
fn read_sample_rate(config_path: &Path) -> Result<u32, MmsError> {
    if !config_path.exists() {
        log::warn!(
            "config.json not found, assuming {} Hz output",
            DEFAULT_SAMPLE_RATE
        );
        return Ok(DEFAULT_SAMPLE_RATE);
    }

    let content = std::fs::read_to_string(config_path)?;
    let json: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| MmsError::Config(format!("config.json: {e}")))?;

    match json.get("sampling_rate") {
        None => Ok(DEFAULT_SAMPLE_RATE),
        Some(v) => v
            .as_u64()
            .and_then(|rate| u32::try_from(rate).ok())
            .filter(|&rate| rate > 0)
            .ok_or_else(|| MmsError::Config(format!("invalid sampling_rate {v}"))),
    }
}

/// Split text into chunks of at most `max_chars` characters, preferring to
/// break after a shad (`།`) or whitespace.
fn split_text(text: &str, max_chars: usize) -> Vec<&str> {
    let text = text.trim();
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let Some((limit, _)) = rest.char_indices().nth(max_chars) else {
            chunks.push(rest);
            break;
        };

        let split = rest[..limit]
            .char_indices()
            .rev()
            .find(|&(_, ch)| ch == '།' || ch.is_whitespace())
            .map(|(i, ch)| i + ch.len_utf8())
            .unwrap_or(limit);

        let chunk = rest[..split].trim();
        if !chunk.is_empty() {
            chunks.push(chunk);
        }
        rest = rest[split..].trim_start();
    }

    chunks
}

fn append_with_crossfade(dst: &mut Vec<f32>, src: &[f32], crossfade_samples: usize) {
    let overlap = crossfade_samples.min(dst.len()).min(src.len());
    if overlap == 0 {
        dst.extend_from_slice(src);
        return;
    }

    let dst_start = dst.len() - overlap;
    for i in 0..overlap {
        let t = (i + 1) as f32 / (overlap as f32 + 1.0);
        dst[dst_start + i] = dst[dst_start + i] * (1.0 - t) + src[i] * t;
    }

    dst.extend_from_slice(&src[overlap..]);
}
