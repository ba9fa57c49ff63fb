//! Bundlebox - on-demand CSS/JS combining and minification.
//!
//! Pages register fragments (inline text, local files, remote URLs) into
//! an [`Asset`]; its tag points at `/<prefix>/<version>/<token>.<ext>`,
//! where the token encodes the fragment fingerprints. The first request
//! for that path resolves, minifies and concatenates the fragments into
//! one file; later requests reuse it.
//!
//! # Module Structure
//!
//! ```text
//! asset/     fragments, raw store, minifiers
//! bundle/    fingerprint lists, identity tokens, HTML tags
//! source/    fragment payload resolution (file, HTTP)
//! pipeline/  resolve -> minify -> concatenate -> write
//! cache/     single-flight build cache
//! assetbox/  AssetBox facade and the Asset aggregator
//! config/    bundlebox.toml
//! ```

pub mod logger;

pub mod asset;
pub mod assetbox;
pub mod bundle;
pub mod cache;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod source;
pub mod utils;

pub use asset::{Fragment, FragmentKind, MediaKind};
pub use assetbox::{Asset, AssetBox, ServeError};
pub use bundle::{Bundle, Identity};
pub use error::{BundleError, Result};
