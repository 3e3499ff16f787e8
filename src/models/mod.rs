pub mod image;
pub mod job;
pub mod wire;

pub use image::*;
pub use job::*;
