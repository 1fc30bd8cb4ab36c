// PDF backend: turns laid-out pages into document bytes.

pub mod pdf;

pub use pdf::{write_pdf, Logo, RenderError};
