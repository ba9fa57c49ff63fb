//! Configuration section definitions.
//!
//! | Section      | Purpose                                   |
//! |--------------|-------------------------------------------|
//! | `[paths]`    | Fragment root and artifact directory      |
//! | `[serve]`    | Asset server (interface, port, prefix)    |
//! | `[fetch]`    | Remote fragment timeout                   |
//! | `[build]`    | Build version path segment                |
//! | `[[bundle]]` | Bundles registered at startup             |

mod build;
mod bundle;
mod fetch;
mod paths;
mod serve;

pub use build::BuildConfig;
pub use bundle::BundleConfig;
pub use fetch::FetchConfig;
pub use paths::PathsConfig;
pub use serve::ServeConfig;
