//! A bundle under construction, bound to its box.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use url::Url;

use super::AssetBox;
use crate::asset::{Fragment, FragmentKind, MediaKind};
use crate::bundle::tag::{html_tag, preload_link};
use crate::bundle::{Bundle, Identity};
use crate::error::{BundleError, Result};
use crate::utils::path::{clean_relative, file_path_to_url, join_url};

/// A CSS or JS asset assembled from fragments.
///
/// Every `add*` call fingerprints its input, stores it in the box's raw
/// store and appends the fingerprint. Inputs listed before a failing one
/// stay in the asset.
#[derive(Debug, Clone)]
pub struct Asset<'a> {
    assets: &'a AssetBox,
    bundle: Bundle,
}

impl<'a> Asset<'a> {
    pub(super) fn new(assets: &'a AssetBox, bundle: Bundle) -> Self {
        Self { assets, bundle }
    }

    pub fn bundle(&self) -> &Bundle {
        &self.bundle
    }

    pub fn media(&self) -> MediaKind {
        self.bundle.media()
    }

    /// Add slices of bytes. Empty slices are skipped.
    pub fn add<I, B>(&mut self, bufs: I) -> Result<()>
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        for buf in bufs {
            let buf = buf.as_ref();
            if buf.is_empty() {
                continue;
            }
            self.append(Fragment::inline(buf));
        }
        Ok(())
    }

    /// Add strings. Each is trimmed; blank strings are skipped.
    pub fn add_string<I, S>(&mut self, strs: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for s in strs {
            let s = s.as_ref().trim();
            if s.is_empty() {
                continue;
            }
            self.append(Fragment::inline(s));
        }
        Ok(())
    }

    /// Add files by name, relative to the box's source directory.
    ///
    /// Absolute names and `..` are resolved inside the source directory.
    /// Only checks that the file exists; content is read at build time.
    pub fn add_file<I, P>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for name in names {
            let file = clean_relative(name.as_ref());
            if file == Path::new(".") {
                return Err(BundleError::UnexpectedEmpty);
            }
            let path = self.assets.src().join(file);
            fs::metadata(&path).map_err(|e| BundleError::io(&path, e))?;
            self.append(Fragment::file(path.to_string_lossy()));
        }
        Ok(())
    }

    /// Add absolute URLs, fetched at build time.
    pub fn add_url<I, S>(&mut self, urls: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for raw in urls {
            let raw = raw.as_ref().trim();
            if raw.is_empty() {
                return Err(BundleError::UnexpectedEmpty);
            }
            let url = Url::parse(raw).map_err(|source| BundleError::InvalidUrl {
                url: raw.to_string(),
                source,
            })?;
            self.append(Fragment::url(url.as_str()));
        }
        Ok(())
    }

    fn append(&mut self, fragment: Fragment) {
        let fingerprint = self.assets.store().insert(fragment);
        self.bundle.push(fingerprint);
    }

    /// Write the combined, minified content to `w`.
    pub fn combine(&self, w: &mut impl Write) -> Result<()> {
        self.assets.pipeline().combine(&self.bundle, w)
    }

    /// Build the artifact (or reuse the cached one) and return its path.
    pub fn materialize(&self) -> Result<PathBuf> {
        self.assets.materialize(&self.bundle)
    }

    /// URL path of the combined asset: `/<root>/<build version>/<token>.<ext>`.
    ///
    /// Empty when the asset has no fragment.
    pub fn path(&self, root: &str) -> String {
        let name = self.bundle.file_name();
        if name.is_empty() {
            return String::new();
        }
        join_url(&[&file_path_to_url(root), self.assets.build_version(), &name])
    }

    /// HTML5 tag linking to the combined asset.
    pub fn tag(&self, root: &str) -> String {
        let path = self.path(root);
        if path.is_empty() {
            return String::new();
        }
        html_tag(self.media(), &path, false)
    }

    /// `Link` response header value to preload the combined asset.
    pub fn link(&self, root: &str) -> String {
        let path = self.path(root);
        if path.is_empty() {
            return String::new();
        }
        preload_link(self.media(), &path)
    }

    /// One tag per original fragment, for development servers.
    ///
    /// File fragments become root-relative links with the first matching
    /// `strip_prefix` removed.
    pub fn src_tags(&self, strip_prefix: &[&str]) -> String {
        let store = self.assets.store();
        let tags: Vec<String> = self
            .bundle
            .fingerprints()
            .iter()
            .filter_map(|&fp| store.lookup(fp))
            .map(|fragment| match fragment.kind() {
                FragmentKind::Inline => html_tag(self.media(), &fragment.as_str(), true),
                FragmentKind::Url => html_tag(self.media(), &fragment.as_str(), false),
                FragmentKind::File => {
                    let mut path = file_path_to_url(&fragment.as_str());
                    if let Some(rest) = strip_prefix
                        .iter()
                        .find_map(|p| path.strip_prefix(&file_path_to_url(p)))
                    {
                        path = rest.to_string();
                    }
                    html_tag(self.media(), &join_url(&[&path]), false)
                }
            })
            .collect();
        tags.join("\n")
    }
}

impl Identity for Asset<'_> {
    fn token(&self) -> String {
        self.bundle.token()
    }
}
