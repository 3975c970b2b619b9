//! mat2-menu Library
//!
//! Selection processing for the "Clean Metadata" file manager entry,
//! kept free of any file manager types.

pub mod config;
pub mod error;
pub mod formats;
pub mod menu;
pub mod notify;
pub mod paths;
pub mod processor;
pub mod summary;
pub mod tool;
