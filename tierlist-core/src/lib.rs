//! tierlist-core: shared domain utilities for the tier-list backend
//!
//! Pure helpers (count formatting, tier colors, upload validation,
//! vote scoring) plus configuration loading. No I/O beyond config files.

pub mod colors;
pub mod config;
pub mod email;
pub mod error;
pub mod format;
pub mod scoring;
pub mod upload;

pub use config::AppConfig;
pub use error::{CoreError, Result};
