//! Turn fragment descriptors into bytes.

use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use super::http::{HttpGet, TransportError};
use crate::asset::{Fragment, FragmentKind};

/// Why a fragment could not be turned into bytes.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("GET {url}: status {status}")]
    Status { url: String, status: u16 },

    #[error("GET {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: TransportError,
    },
}

/// Resolves inline, file and URL fragments into bytes.
///
/// Stateless apart from the HTTP client: a failed resolution leaves the
/// fragment usable for the next attempt.
#[derive(Clone)]
pub struct SourceResolver {
    http: Arc<dyn HttpGet>,
}

impl SourceResolver {
    pub fn new(http: Arc<dyn HttpGet>) -> Self {
        Self { http }
    }

    pub fn resolve<'a>(&self, fragment: &'a Fragment) -> Result<Cow<'a, [u8]>, ResolveError> {
        match fragment.kind() {
            FragmentKind::Inline => Ok(Cow::Borrowed(fragment.payload())),
            FragmentKind::File => {
                let path = PathBuf::from(fragment.as_str().into_owned());
                fs::read(&path)
                    .map(Cow::Owned)
                    .map_err(|source| ResolveError::Io { path, source })
            }
            FragmentKind::Url => self.fetch(&fragment.as_str()).map(Cow::Owned),
        }
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>, ResolveError> {
        let response = self.http.get(url).map_err(|source| ResolveError::Transport {
            url: url.to_string(),
            source,
        })?;
        if response.status >= 400 {
            return Err(ResolveError::Status {
                url: url.to_string(),
                status: response.status,
            });
        }
        Ok(response.body)
    }
}

impl std::fmt::Debug for SourceResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceResolver").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::http::HttpResponse;
    use tempfile::TempDir;

    /// Serves `/ok.css`, 404s everything else, refuses non-http URLs.
    struct FakeHttp;

    impl HttpGet for FakeHttp {
        fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
            if !url.starts_with("http") {
                return Err(TransportError("no transport".into()));
            }
            if url.ends_with("/ok.css") {
                Ok(HttpResponse::new(200, ".red{color:#f00}"))
            } else {
                Ok(HttpResponse::new(404, "Not Found"))
            }
        }
    }

    fn resolver() -> SourceResolver {
        SourceResolver::new(Arc::new(FakeHttp))
    }

    #[test]
    fn test_inline_is_borrowed() {
        let fragment = Fragment::inline("alert('hi')");
        let bytes = resolver().resolve(&fragment).unwrap();
        assert!(matches!(bytes, Cow::Borrowed(_)));
        assert_eq!(&*bytes, b"alert('hi')");
    }

    #[test]
    fn test_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("f1.js");
        fs::write(&path, "var a=1;").unwrap();

        let fragment = Fragment::file(path.to_string_lossy());
        assert_eq!(&*resolver().resolve(&fragment).unwrap(), b"var a=1;");
    }

    #[test]
    fn test_missing_file_keeps_os_error() {
        let dir = TempDir::new().unwrap();
        let fragment = Fragment::file(dir.path().join("gone.js").to_string_lossy());
        let err = resolver().resolve(&fragment).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::Io { ref source, .. } if source.kind() == io::ErrorKind::NotFound
        ));
    }

    #[test]
    fn test_url_ok() {
        let fragment = Fragment::url("http://cdn.test/ok.css");
        assert_eq!(&*resolver().resolve(&fragment).unwrap(), b".red{color:#f00}");
    }

    #[test]
    fn test_url_error_status() {
        let fragment = Fragment::url("http://cdn.test/fail.css");
        let err = resolver().resolve(&fragment).unwrap_err();
        assert!(matches!(err, ResolveError::Status { status: 404, .. }));
        assert_eq!(err.to_string(), "GET http://cdn.test/fail.css: status 404");
    }

    #[test]
    fn test_url_transport_error() {
        let fragment = Fragment::url("ftp://cdn.test/ok.css");
        let err = resolver().resolve(&fragment).unwrap_err();
        assert!(matches!(err, ResolveError::Transport { .. }));
        assert!(err.to_string().ends_with("no transport"));
    }
}
