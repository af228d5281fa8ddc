use std::path::{Path, PathBuf};

use crate::{SynthesisEngine, SynthesisResult};

use super::model::{MmsError, MmsModel};

/// Parameters for configuring MMS model loading.
#[derive(Debug, Clone, Default)]
pub struct MmsModelParams {
    /// Number of CPU threads to use for inference.
    /// `None` uses the ORT default (typically all available cores).
    pub num_threads: Option<usize>,
}

/// Parameters for configuring an MMS synthesis request.
#[derive(Debug, Clone)]
pub struct MmsInferenceParams {
    /// Longest text span, in characters, sent to the model in one pass.
    /// Longer input is split at shads or spaces and crossfaded back together.
    pub max_chunk_chars: usize,
}

impl Default for MmsInferenceParams {
    fn default() -> Self {
        Self {
            max_chunk_chars: 200,
        }
    }
}

/// MMS (Massively Multilingual Speech) VITS text-to-speech engine.
///
/// Loads a per-language checkpoint such as `facebook/mms-tts-bod` exported
/// to ONNX. Tokenization is character-level, so no external phonemizer is
/// needed.
///
/// ```rust,no_run
/// use lesson_tts::{SynthesisEngine, engines::mms::MmsEngine};
/// use std::path::PathBuf;
///
/// let mut engine = MmsEngine::new();
/// engine.load_model(&PathBuf::from("models/mms-tts-bod"))?;
/// let result = engine.synthesize("བོད་ཡིག", None)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Default)]
pub struct MmsEngine {
    model: Option<MmsModel>,
    model_path: Option<PathBuf>,
}

impl MmsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory of the loaded model, if any.
    pub fn model_path(&self) -> Option<&Path> {
        self.model_path.as_deref()
    }
}

impl Drop for MmsEngine {
    fn drop(&mut self) {
        self.unload_model();
    }
}

impl SynthesisEngine for MmsEngine {
    type SynthesisParams = MmsInferenceParams;
    type ModelParams = MmsModelParams;

    fn load_model_with_params(
        &mut self,
        model_path: &Path,
        params: Self::ModelParams,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let model = MmsModel::load(model_path, params.num_threads)?;
        self.model = Some(model);
        self.model_path = Some(model_path.to_path_buf());
        Ok(())
    }

    fn unload_model(&mut self) {
        self.model = None;
        self.model_path = None;
    }

    fn synthesize(
        &mut self,
        text: &str,
        params: Option<Self::SynthesisParams>,
    ) -> Result<SynthesisResult, Box<dyn std::error::Error>> {
        let model = self.model.as_mut().ok_or(MmsError::ModelNotLoaded)?;

        let p = params.unwrap_or_default();
        let samples = model.synthesize_text(text, p.max_chunk_chars)?;

        Ok(SynthesisResult {
            samples,
            sample_rate: model.sample_rate(),
        })
    }
}
