use std::path::Path;

use crate::{SynthesisEngine, SynthesisResult};

/// Parameters for the placeholder engine.
#[derive(Debug, Clone)]
pub struct PlaceholderParams {
    /// Length of the generated clip in seconds.
    pub duration_secs: f32,
    pub sample_rate: u32,
}

impl Default for PlaceholderParams {
    fn default() -> Self {
        Self {
            duration_secs: 1.0,
            sample_rate: 44100,
        }
    }
}

/// Engine that ignores its input text and returns silence.
///
/// Useful for generating the expected asset tree before a real model is
/// available; every artifact is a valid, playable WAV file.
#[derive(Debug, Default)]
pub struct PlaceholderEngine {
    defaults: PlaceholderParams,
}

impl PlaceholderEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(defaults: PlaceholderParams) -> Self {
        Self { defaults }
    }
}

impl SynthesisEngine for PlaceholderEngine {
    type SynthesisParams = PlaceholderParams;
    type ModelParams = ();

    fn load_model_with_params(
        &mut self,
        _model_path: &Path,
        _params: Self::ModelParams,
    ) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }

    fn unload_model(&mut self) {}

    fn synthesize(
        &mut self,
        text: &str,
        params: Option<Self::SynthesisParams>,
    ) -> Result<SynthesisResult, Box<dyn std::error::Error>> {
        let p = params.unwrap_or_else(|| self.defaults.clone());
        let frames = (p.duration_secs.max(0.0) * p.sample_rate as f32) as usize;
        log::debug!("Placeholder audio ({frames} frames) for {text:?}");

        Ok(SynthesisResult {
            samples: vec![0.0; frames],
            sample_rate: p.sample_rate,
        })
    }
}
