//! Command-line interface module.

mod args;
pub mod bundle;
pub mod decode;
pub mod serve;

pub use args::{BundleArgs, Cli, Commands};
