pub mod presets;
pub mod runner;

pub use runner::{JobOutcome, RunReport, Runner};
