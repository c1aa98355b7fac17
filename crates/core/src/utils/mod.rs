//! Shared helpers.

pub mod serde_formats;
pub mod time_utils;
