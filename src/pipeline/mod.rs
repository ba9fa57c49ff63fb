//! Combine pipeline: fingerprints -> resolved, minified, concatenated output.
//!
//! ```text
//! Bundle ─► RawStore lookup ─► SourceResolver ─► Minify ─┐
//!   (per fragment, parallel with rayon, order kept)      ▼
//!                                        concatenate (no separator)
//!                                                        ▼
//!                              <dst>/.<name>.<pid>.tmp ─► rename ─► <dst>/<token>.<ext>
//! ```
//!
//! Any fragment failure aborts the whole build and nothing is published.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;

use crate::asset::{MediaKind, Minify, RawStore};
use crate::bundle::Bundle;
use crate::debug;
use crate::error::{BundleError, Result};
use crate::source::SourceResolver;

/// Resolves, minifies and concatenates the fragments of a bundle.
#[derive(Clone)]
pub struct CombinePipeline {
    store: Arc<RawStore>,
    resolver: SourceResolver,
    minifier: Arc<dyn Minify>,
}

impl CombinePipeline {
    pub fn new(store: Arc<RawStore>, resolver: SourceResolver, minifier: Arc<dyn Minify>) -> Self {
        Self {
            store,
            resolver,
            minifier,
        }
    }

    /// Write the combined output of `bundle` into `dst` and return its path.
    ///
    /// The file is written under a temporary name and renamed into place,
    /// so a reader never sees a partial artifact.
    pub fn build(&self, bundle: &Bundle, dst: &Path) -> Result<PathBuf> {
        let name = bundle.file_name();
        if name.is_empty() {
            return Err(BundleError::UnexpectedEmpty);
        }
        let parts = self.minify_all(bundle)?;

        fs::create_dir_all(dst).map_err(|e| BundleError::io(dst, e))?;
        let target = dst.join(&name);
        let tmp = dst.join(format!(".{name}.{}.tmp", std::process::id()));
        if let Err(e) = write_parts(&tmp, &parts) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        fs::rename(&tmp, &target).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            BundleError::io(&target, e)
        })?;

        debug!("build"; "{} ({} fragments)", target.display(), parts.len());
        Ok(target)
    }

    /// Stream the combined output of `bundle` into `w`.
    ///
    /// Nothing is written unless every fragment resolves and minifies.
    pub fn combine(&self, bundle: &Bundle, w: &mut impl Write) -> Result<()> {
        let parts = self.minify_all(bundle)?;
        for part in &parts {
            w.write_all(part.as_bytes())
                .map_err(|e| BundleError::io("<writer>", e))?;
        }
        Ok(())
    }

    /// Minified text of every fragment, in bundle order.
    fn minify_all(&self, bundle: &Bundle) -> Result<Vec<String>> {
        let media = bundle.media();
        bundle
            .fingerprints()
            .par_iter()
            .map(|&fingerprint| self.minify_fragment(media, fingerprint))
            .collect()
    }

    fn minify_fragment(&self, media: MediaKind, fingerprint: u32) -> Result<String> {
        // Arc clone: the store lock is released before any I/O
        let fragment = self
            .store
            .lookup(fingerprint)
            .ok_or(BundleError::FragmentNotFound(fingerprint))?;
        let bytes = self
            .resolver
            .resolve(&fragment)
            .map_err(|source| BundleError::ResolutionFailed {
                fingerprint,
                source,
            })?;
        self.minifier
            .minify_bytes(media, &bytes)
            .map_err(|source| BundleError::MinificationFailed {
                fingerprint,
                source,
            })
    }
}

impl std::fmt::Debug for CombinePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombinePipeline")
            .field("fragments", &self.store.len())
            .finish_non_exhaustive()
    }
}

fn write_parts(path: &Path, parts: &[String]) -> Result<()> {
    let file = File::create(path).map_err(|e| BundleError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    for part in parts {
        writer
            .write_all(part.as_bytes())
            .map_err(|e| BundleError::io(path, e))?;
    }
    writer.flush().map_err(|e| BundleError::io(path, e))
}
