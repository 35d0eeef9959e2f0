//! Output generation for pipeline results.
//!
//! # Submodules
//!
//! - [`json`]: Writes a [`crate::models::PipelineResult`] to a dated JSON file
//! - [`text`]: Renders a result as plain text for the terminal
//!
//! The narration audio itself is written by [`crate::speech`].

pub mod json;
pub mod text;
