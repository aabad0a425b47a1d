pub mod cell;
pub mod config;
pub mod error;
pub mod format;
pub mod ids;
pub mod import;
pub mod models;
pub mod options;
pub mod sync;
