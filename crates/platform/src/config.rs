//! Application configuration and constants
//!
//! Central configuration values used across the control core. Branding and
//! shared sizing constants live here rather than being hardcoded at call
//! sites.

/// The application name
pub const APP_NAME: &str = "Lark";

/// The application type/category
pub const APP_TYPE: &str = "MP3 player";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Bytes pushed to the codec data port per data-request assertion.
///
/// The codec accepts short bursts after raising its data-request line; 32
/// bytes per burst keeps each SPI transaction comfortably inside one
/// request window.
pub const CODEC_CHUNK_LEN: usize = 32;
