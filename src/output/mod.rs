//! Output rendering module
//!
//! Turns classified diff lines into terminal text.

mod render;

pub use render::{render, Palette};
