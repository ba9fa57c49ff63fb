//! Fragments, the raw store and minification.

mod fragment;
mod kind;
pub mod minify;
mod store;

pub use fragment::{Fragment, FragmentKind};
pub use kind::{CSS, JAVASCRIPT, MediaKind};
pub use minify::{AssetMinifier, Minify, MinifyError};
pub use store::RawStore;
