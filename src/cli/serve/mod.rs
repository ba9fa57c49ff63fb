//! Asset server: builds combined assets on first request.
//!
//! ```text
//! GET /                          index page (tags of configured bundles)
//! GET <prefix><version>/<token>.<ext>
//!       ├─ bad name / token      404
//!       ├─ build failed          502
//!       └─ built (or cached)     200, artifact from <dst>
//! ```

mod index;
mod lifecycle;
mod path;
mod response;

use anyhow::Result;
use bundlebox::config::BoxConfig;
use bundlebox::{AssetBox, ServeError, debug, log};
use std::sync::Arc;
use tiny_http::{Request, Server};

use index::Index;

/// Worker threads answering requests.
const REQUEST_THREADS: usize = 4;

/// Everything a request handler reads.
struct ServeContext {
    assets: AssetBox,
    prefix: String,
    index: Index,
}

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
}

/// Bind the HTTP server without starting the request loop
pub fn bind_server(config: &BoxConfig) -> Result<BoundServer> {
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    crate::core::register_server(Arc::clone(&server));

    log!("serve"; "http://{}", addr);

    Ok(BoundServer { server })
}

impl BoundServer {
    /// Register configured bundles, then run the request loop (blocking).
    pub fn run(self, assets: AssetBox, config: &BoxConfig) -> Result<()> {
        let index = Index::build(&assets, config)?;
        let ctx = Arc::new(ServeContext {
            assets,
            prefix: config.serve.prefix.clone(),
            index,
        });
        run_request_loop(&self.server, &ctx)?;

        for (identity, state) in ctx.assets.report() {
            debug!("serve"; "{identity}: {state:?}");
        }
        Ok(())
    }
}

fn run_request_loop(server: &Server, ctx: &Arc<ServeContext>) -> Result<()> {
    // Builds block their worker; other requests keep flowing
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(REQUEST_THREADS)
        .build()?;

    for request in server.incoming_requests() {
        let ctx = Arc::clone(ctx);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &ctx) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

/// Handle a single HTTP request
fn handle_request(request: Request, ctx: &ServeContext) -> Result<()> {
    if crate::core::is_shutdown() {
        return response::respond_unavailable(request);
    }

    let url = path::normalize_url(request.url());
    debug!("serve"; "{} {}", request.method(), url);

    if path::is_index(&url) {
        return response::respond_html(request, &ctx.index.html, &ctx.index.link);
    }
    if !path::is_asset(&url, &ctx.prefix) {
        return response::respond_not_found(request);
    }

    match ctx.assets.open(&url) {
        Ok(file) => response::respond_file(request, &file),
        Err(ServeError::NotFound(e)) => {
            debug!("serve"; "{url}: {e}");
            response::respond_not_found(request)
        }
        Err(e @ ServeError::Build(_)) => response::respond_bad_gateway(request, &e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::net::SocketAddr;
    use tempfile::TempDir;

    /// Serve `n` requests on an ephemeral port.
    fn spawn_server(ctx: Arc<ServeContext>, n: usize) -> (SocketAddr, std::thread::JoinHandle<()>) {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let handle = std::thread::spawn(move || {
            for request in server.incoming_requests().take(n) {
                handle_request(request, &ctx).unwrap();
            }
        });
        (addr, handle)
    }

    fn get(url: &str) -> (u16, String) {
        match ureq::get(url).call() {
            Ok(resp) => (resp.status(), resp.into_string().unwrap()),
            Err(ureq::Error::Status(code, resp)) => (code, resp.into_string().unwrap()),
            Err(e) => panic!("transport error: {e}"),
        }
    }

    #[test]
    fn test_serve_round_trip() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.css"), ".a { color: #ff0000; }").unwrap();
        let assets = AssetBox::new(dir.path(), dir.path().join("combine")).with_build_version("v1");

        let mut css = assets.new_css();
        css.add_file(["a.css"]).unwrap();
        let path = css.path("/min/");
        let mut broken = assets.new_js();
        broken.add(["var = ;"]).unwrap();
        let broken_path = broken.path("/min/");

        let ctx = Arc::new(ServeContext {
            assets,
            prefix: "/min/".to_string(),
            index: Index::default(),
        });
        let (addr, handle) = spawn_server(Arc::clone(&ctx), 5);
        let base = format!("http://{addr}");

        assert_eq!(get(&format!("{base}{path}")), (200, ".a{color:red}".to_string()));
        // Cached artifact on the second request
        assert_eq!(get(&format!("{base}{path}")).0, 200);
        assert_eq!(get(&format!("{base}/min/v1/zz.css")).0, 404);
        assert_eq!(get(&format!("{base}/elsewhere/1.0.css")).0, 404);
        assert_eq!(get(&format!("{base}{broken_path}")).0, 502);

        handle.join().unwrap();
        assert_eq!(ctx.assets.report().len(), 1);
    }
}
