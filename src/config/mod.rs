//! Configuration module for quotedesk
//!
//! This module provides configuration management including:
//! - Platform path resolution
//! - User settings persistence (quote defaults)

pub mod paths;
pub mod settings;

pub use paths::QuotePaths;
pub use settings::Settings;
