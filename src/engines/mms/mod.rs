//! MMS (Massively Multilingual Speech) text-to-speech engine implementation.
//!
//! This module runs the per-language VITS checkpoints published as
//! `facebook/mms-tts-<iso>` through ONNX Runtime. The default pipeline target
//! is Central Tibetan (`mms-tts-bod`).
//!
//! # Model Directory Layout
//!
//! ```text
//! models/mms-tts-bod/
//! ├── model.onnx              # VITS graph exported with `optimum-cli export onnx`
//! ├── vocab.json              # character → token id
//! ├── tokenizer_config.json   # add_blank / normalize flags (optional)
//! └── config.json             # sampling_rate (optional, default 16000)
//! ```
//!
//! # Tokenization
//!
//! Input is lowercased when `normalize` is set, characters missing from
//! `vocab.json` are dropped, and with `add_blank` the blank id `0` is
//! interleaved around every token, matching the reference tokenizer.
//!
//! # Examples
//!
//! ```rust,no_run
//! use lesson_tts::{SynthesisEngine, engines::mms::{MmsEngine, MmsInferenceParams}};
//! use std::path::PathBuf;
//!
//! let mut engine = MmsEngine::new();
//! engine.load_model(&PathBuf::from("models/mms-tts-bod"))?;
//!
//! let params = MmsInferenceParams { max_chunk_chars: 120 };
//! engine.synthesize_to_file("བཀྲ་ཤིས་བདེ་ལེགས།", &PathBuf::from("out.wav"), Some(params))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod engine;
pub mod model;
pub mod vocab;

pub use engine::{MmsEngine, MmsInferenceParams, MmsModelParams};
pub use model::MmsError;
