//! Cutline Core - Foundation types for the timeline store
//!
//! This crate provides the types shared by every Cutline crate:
//! - Error taxonomy (validation, not-found, engine, conflict)
//! - Frame rate representation with `"numerator/denominator"` parsing
//! - Store configuration

pub mod config;
pub mod error;
pub mod rate;

pub use config::StoreConfig;
pub use error::{CutlineError, Result};
pub use rate::FrameRate;
