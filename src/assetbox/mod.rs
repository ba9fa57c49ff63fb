//! The asset box: one raw store, one build cache, one pipeline.
//!
//! A box is created once at startup and shared (by reference or `Arc`)
//! with everything that assembles or serves bundles. It owns every
//! registry; there is no process-global state.
//!
//! ```ignore
//! let assets = AssetBox::new("./src", "./combine");
//! let mut css = assets.new_css();
//! css.add_file(["reset.css"])?;
//! css.add_url(["https://cdn.example.com/theme.css"])?;
//! println!("{}", css.tag("/min/"));   // <link rel="stylesheet" href="/min/<version>/<token>.css">
//!
//! // later, when `/min/<version>/<token>.css` is requested:
//! let path = assets.open(request_path)?;
//! ```

mod asset;

pub use asset::Asset;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

use crate::asset::{AssetMinifier, MediaKind, Minify, RawStore};
use crate::bundle::Bundle;
use crate::cache::{BuildCache, BuildState, Claim};
use crate::config::{BoxConfig, BundleConfig};
use crate::error::{BundleError, Result};
use crate::log;
use crate::pipeline::CombinePipeline;
use crate::source::{HttpGet, SourceResolver, UreqClient};
use crate::utils::path::clean_dir;

/// Failure at the serving boundary.
#[derive(Debug, Error)]
pub enum ServeError {
    /// The request path does not name a bundle.
    #[error("not found: {0}")]
    NotFound(#[source] BundleError),

    /// The bundle exists by name but could not be built.
    #[error("bad gateway: {0}")]
    Build(#[source] BundleError),
}

/// Virtual folder storing fragments and serving their combined artifacts.
pub struct AssetBox {
    src: PathBuf,
    dst: PathBuf,
    build_version: String,
    store: Arc<RawStore>,
    builds: BuildCache,
    http: Arc<dyn HttpGet>,
    minifier: Arc<dyn Minify>,
    pipeline: CombinePipeline,
}

impl AssetBox {
    /// Box reading files under `src` and writing artifacts into `dst`.
    ///
    /// Uses the default HTTP client (2s timeout), the oxc/lightningcss
    /// minifier and the current Unix time as build version.
    pub fn new(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Self {
        let store = Arc::new(RawStore::new());
        let http: Arc<dyn HttpGet> = Arc::new(UreqClient::default());
        let minifier: Arc<dyn Minify> = Arc::new(AssetMinifier);
        let pipeline = CombinePipeline::new(
            Arc::clone(&store),
            SourceResolver::new(Arc::clone(&http)),
            Arc::clone(&minifier),
        );
        Self {
            src: clean_dir(src.as_ref()),
            dst: clean_dir(dst.as_ref()),
            build_version: unix_timestamp().to_string(),
            store,
            builds: BuildCache::new(),
            http,
            minifier,
            pipeline,
        }
    }

    /// Box configured from `bundlebox.toml`.
    pub fn from_config(config: &BoxConfig) -> Self {
        let assets = Self::new(config.src_dir(), config.dst_dir())
            .with_http_client(Arc::new(UreqClient::new(config.fetch.timeout())));
        match &config.build.version {
            Some(version) => assets.with_build_version(version.clone()),
            None => assets,
        }
    }

    /// Use another HTTP client (proxy, mock, ...).
    pub fn with_http_client(mut self, http: Arc<dyn HttpGet>) -> Self {
        self.http = http;
        self.rebuild_pipeline();
        self
    }

    /// Use another minifier.
    pub fn with_minifier(mut self, minifier: Arc<dyn Minify>) -> Self {
        self.minifier = minifier;
        self.rebuild_pipeline();
        self
    }

    /// Override the build version segment used in asset paths.
    ///
    /// Changing it forces browsers to fetch assets again.
    pub fn with_build_version(mut self, version: impl Into<String>) -> Self {
        self.build_version = version.into();
        self
    }

    fn rebuild_pipeline(&mut self) {
        self.pipeline = CombinePipeline::new(
            Arc::clone(&self.store),
            SourceResolver::new(Arc::clone(&self.http)),
            Arc::clone(&self.minifier),
        );
    }

    pub fn src(&self) -> &Path {
        &self.src
    }

    pub fn dst(&self) -> &Path {
        &self.dst
    }

    pub fn build_version(&self) -> &str {
        &self.build_version
    }

    pub fn store(&self) -> &RawStore {
        &self.store
    }

    pub fn builds(&self) -> &BuildCache {
        &self.builds
    }

    pub(crate) fn pipeline(&self) -> &CombinePipeline {
        &self.pipeline
    }

    /// New, empty CSS asset.
    pub fn new_css(&self) -> Asset<'_> {
        Asset::new(self, Bundle::new(MediaKind::Stylesheet))
    }

    /// New, empty JS asset.
    pub fn new_js(&self) -> Asset<'_> {
        Asset::new(self, Bundle::new(MediaKind::Script))
    }

    /// Asset of `media` identified by `token`.
    pub fn to_asset(&self, media: MediaKind, token: &str) -> Result<Asset<'_>> {
        Ok(Asset::new(self, Bundle::from_token(media, token)?))
    }

    /// Asset holding the fragments listed by a `[[bundle]]` table.
    pub fn register(&self, bundle: &BundleConfig) -> Result<Asset<'_>> {
        let mut asset = Asset::new(self, Bundle::new(bundle.kind));
        asset.add_string(&bundle.inline)?;
        asset.add_file(&bundle.files)?;
        asset.add_url(&bundle.urls)?;
        Ok(asset)
    }

    /// Path of the built artifact for `bundle`, building it on first use.
    ///
    /// Concurrent calls for the same bundle build once; the others wait and
    /// share the result. A failed build leaves no cache entry behind.
    pub fn materialize(&self, bundle: &Bundle) -> Result<PathBuf> {
        let identity = bundle.identity()?;
        let guard = match self.builds.claim_or_await(&identity) {
            Claim::Ready(path) => return Ok(path),
            Claim::Build(guard) => guard,
        };
        match self.pipeline.build(bundle, &self.dst) {
            Ok(path) => {
                log!("build"; "{}", path.display());
                Ok(guard.complete(path))
            }
            Err(e) => {
                log!("error"; "{}.{}: {}", identity, bundle.media().extension(), e);
                guard.fail(e.to_string());
                Err(e)
            }
        }
    }

    /// Resolve a request path such as `/min/1700000000/12.0.3.css`.
    ///
    /// Only the last segment matters; the prefix and build version are
    /// ignored.
    pub fn open(&self, request_path: &str) -> std::result::Result<PathBuf, ServeError> {
        let name = request_path.rsplit('/').next().unwrap_or_default();
        let bundle = Bundle::from_file_name(name).map_err(ServeError::NotFound)?;
        self.materialize(&bundle).map_err(ServeError::Build)
    }

    /// Every bundle the cache knows, with its state.
    pub fn report(&self) -> Vec<(String, BuildState)> {
        self.builds.entries()
    }
}

impl std::fmt::Debug for AssetBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetBox")
            .field("src", &self.src)
            .field("dst", &self.dst)
            .field("build_version", &self.build_version)
            .field("fragments", &self.store.len())
            .field("builds", &self.builds.len())
            .finish_non_exhaustive()
    }
}

/// Current Unix timestamp in seconds.
fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::MinifyError;
    use crate::bundle::{Identity, decode};
    use crate::source::{HttpResponse, TransportError};
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tempfile::TempDir;

    /// `/f1.css` and `/f1.js` exist, everything else is 404.
    struct FakeHttp;

    impl HttpGet for FakeHttp {
        fn get(&self, url: &str) -> std::result::Result<HttpResponse, TransportError> {
            if !url.starts_with("http") {
                return Err(TransportError("no transport".into()));
            }
            if url.ends_with("/f1.css") {
                Ok(HttpResponse::new(200, "/* an other comment */\n.red{\n\tcolor:#f00;\n}"))
            } else if url.ends_with("/f1.js") {
                Ok(HttpResponse::new(200, "document.location = \"/home.html\";"))
            } else {
                Ok(HttpResponse::new(404, r#"{"success":false,"error":404}"#))
            }
        }
    }

    /// Real minifier that counts invocations and slows down a little.
    #[derive(Default)]
    struct Counting(AtomicUsize);

    impl Minify for Counting {
        fn minify(&self, media: MediaKind, source: &str) -> std::result::Result<String, MinifyError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(10));
            AssetMinifier.minify(media, source)
        }
    }

    fn site() -> (TempDir, AssetBox) {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        let dst = dir.path().join("combine");
        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(&dst).unwrap();
        fs::write(src.join("f1.js"), "var a=1;").unwrap();
        fs::write(src.join("f1.css"), ".show{display:block;}").unwrap();
        let assets = AssetBox::new(&src, &dst)
            .with_http_client(Arc::new(FakeHttp))
            .with_build_version("");
        (dir, assets)
    }

    #[test]
    fn test_script_bundle_end_to_end() {
        let (_dir, assets) = site();
        let mut js = assets.new_js();
        js.add_string(["alert('hi')"]).unwrap();
        js.add_file(["f1.js"]).unwrap();

        let fps = decode(&js.token()).unwrap();
        assert_eq!(fps, js.bundle().fingerprints());
        assert_eq!(fps[0], crate::utils::hash::fingerprint("alert('hi')"));

        let path = js.materialize().unwrap();
        assert_eq!(path, assets.dst().join(js.bundle().file_name()));

        // The global from f1.js survives minification
        assert_eq!(fs::read_to_string(&path).unwrap(), "alert(`hi`);var a=1;");
    }

    #[test]
    fn test_empty_bundle_fails_before_build() {
        let (_dir, assets) = site();
        let js = assets.new_js();
        assert!(matches!(js.materialize(), Err(BundleError::UnexpectedEmpty)));
        assert!(assets.builds().is_empty());
    }

    #[test]
    fn test_concurrent_materialize_builds_once() {
        const N: usize = 12;
        let (_dir, assets) = site();
        let counting = Arc::new(Counting::default());
        let assets = assets.with_minifier(counting.clone());

        let mut css = assets.new_css();
        css.add_string([".rv{color:#333;}"]).unwrap();
        css.add_file(["f1.css"]).unwrap();
        let bundle = css.bundle().clone();

        let barrier = std::sync::Barrier::new(N);
        let paths: Vec<PathBuf> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..N)
                .map(|_| {
                    s.spawn(|| {
                        barrier.wait();
                        assets.materialize(&bundle).unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        // Two fragments minified by exactly one build
        assert_eq!(counting.0.load(Ordering::SeqCst), 2);
        assert!(paths.iter().all(|p| p == &paths[0]));
        assert_eq!(
            fs::read_to_string(&paths[0]).unwrap(),
            ".rv{color:#333}.show{display:block}"
        );
    }

    #[test]
    fn test_failed_build_can_retry() {
        let (_dir, assets) = site();
        let mut css = assets.new_css();
        css.add_url(["http://www.css.com/fail.css"]).unwrap();
        let identity = css.token();

        let err = css.materialize().unwrap_err();
        assert!(err.is_not_found());
        assert!(assets.builds().lookup(&identity).is_none());

        // Still failing, but the second attempt runs instead of wedging
        assert!(css.materialize().is_err());
        assert!(assets.builds().lookup(&identity).is_none());
    }

    #[test]
    fn test_cache_hit_skips_rebuild() {
        let (_dir, assets) = site();
        let counting = Arc::new(Counting::default());
        let assets = assets.with_minifier(counting.clone());
        let mut js = assets.new_js();
        js.add_url(["https://www.js.com/f1.js"]).unwrap();

        let first = js.materialize().unwrap();
        let second = js.materialize().unwrap();
        assert_eq!(first, second);
        assert_eq!(counting.0.load(Ordering::SeqCst), 1);
        assert_eq!(assets.report().len(), 1);
    }

    #[test]
    fn test_open() {
        let (_dir, assets) = site();
        let mut css = assets.new_css();
        css.add_string(["body { color: red; }"]).unwrap();

        let path = assets.open(&css.path("/min/")).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "body{color:red}");

        assert!(matches!(
            assets.open("/min/nothing.html"),
            Err(ServeError::NotFound(_))
        ));
        assert!(matches!(assets.open("/min/42.css"), Err(ServeError::NotFound(_))));
        // Well-formed name, unknown fragment
        assert!(matches!(
            assets.open("/min/42.0.css"),
            Err(ServeError::Build(BundleError::FragmentNotFound(42)))
        ));
    }

    #[test]
    fn test_register_bundle_table() {
        let (_dir, assets) = site();
        let config = crate::config::test_parse_config(
            r#"
            [[bundle]]
            name = "app"
            kind = "js"
            inline = ["alert('hi')"]
            files = ["f1.js"]
            urls = ["https://www.js.com/f1.js"]
            "#,
        );
        let js = assets.register(&config.bundles[0]).unwrap();
        assert_eq!(js.media(), MediaKind::Script);
        assert_eq!(js.bundle().fingerprints().len(), 3);

        let missing = crate::config::test_parse_config(
            "[[bundle]]\nname = \"x\"\nkind = \"css\"\nfiles = [\"nope.css\"]",
        );
        assert!(assets.register(&missing.bundles[0]).is_err());
    }

    #[test]
    fn test_to_asset_round_trip() {
        let (_dir, assets) = site();
        let mut js = assets.new_js();
        js.add_string(["var a = 56;"]).unwrap();
        let copy = assets.to_asset(MediaKind::Script, &js.token()).unwrap();
        assert_eq!(copy.bundle(), js.bundle());
        assert!(assets.to_asset(MediaKind::Script, "").is_err());
    }
}
