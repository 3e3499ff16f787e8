//! Website imagery generation through the Gemini `generateContent` API.
//!
//! A [`GeminiClient`] turns an [`ImageRequest`] (prompt, optional reference
//! images, aspect ratio and size hints) into image bytes; a [`Runner`] walks a
//! [`JobSet`] one job at a time and writes each result under the output root.

pub mod config;
pub mod error;
pub mod gemini;
pub mod jobs;
pub mod logger;
pub mod models;
pub mod output;

pub use config::{GeminiConfig, RunConfig};
pub use error::{GenerationError, Result};
pub use gemini::{GeminiClient, ImageClient, ImageGenerator};
pub use jobs::{presets, JobOutcome, RunReport, Runner};
pub use models::{GeneratedImage, ImageFormat, ImageJob, ImageRequest, JobSet, ReferenceImage};
