//! Speech synthesis engines.
//!
//! This module contains implementations of text-to-speech engines.
//!
//! # Available Engines
//!
//! - `placeholder` - fixed-length silence, for wiring up asset layouts without a model
//!
//! Enable further engines via Cargo features:
//! - `mms` - Massively Multilingual Speech VITS checkpoints exported to ONNX

#[cfg(feature = "mms")]
pub mod mms;
pub mod placeholder;
