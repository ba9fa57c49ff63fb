//! HTTP response handlers.

use anyhow::{Context, Result, anyhow};
use bundlebox::utils::mime::types::{HTML, PLAIN};
use std::{fs, path::Path};
use tiny_http::{Header, Method, Request, Response, StatusCode};

/// Artifacts are content-addressed: a changed bundle has another name.
const IMMUTABLE: &str = "public, max-age=31536000, immutable";

/// Respond with a built artifact.
pub fn respond_file(request: Request, path: &Path) -> Result<()> {
    let content_type = bundlebox::utils::mime::from_path(path);

    if is_head_request(&request) {
        return send_head(request, 200, content_type);
    }

    if let Some(range) = get_range_header(&request) {
        let file_size = fs::metadata(path)
            .with_context(|| format!("Failed to stat {}", path.display()))?
            .len();
        if let Some((start, end)) = parse_range(&range, file_size) {
            return respond_range(request, path, content_type, start, end, file_size);
        }
    }

    let body = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let response = Response::from_data(body)
        .with_header(header("Content-Type", content_type)?)
        .with_header(header("Cache-Control", IMMUTABLE)?);
    request.respond(response)?;
    Ok(())
}

/// Stream bytes `start..=end` of the file.
fn respond_range(
    request: Request,
    path: &Path,
    content_type: &'static str,
    start: u64,
    end: u64,
    file_size: u64,
) -> Result<()> {
    use std::io::{Read, Seek, SeekFrom};

    let length = end - start + 1;

    let mut file = fs::File::open(path)?;
    file.seek(SeekFrom::Start(start))?;
    let reader = file.take(length);

    let content_range = format!("bytes {start}-{end}/{file_size}");
    let response = Response::new(
        StatusCode(206),
        vec![
            header("Content-Type", content_type)?,
            header("Content-Range", &content_range)?,
            header("Accept-Ranges", "bytes")?,
        ],
        reader,
        usize::try_from(length).ok(),
        None,
    );

    request.respond(response)?;
    Ok(())
}

/// Parse a Range header value (`bytes=start-end`) into inclusive offsets.
///
/// `None` when the range cannot be satisfied; the caller then sends the
/// whole file.
fn parse_range(range: &str, file_size: u64) -> Option<(u64, u64)> {
    let last = file_size.checked_sub(1)?;
    let range = range.trim();
    let range = range.strip_prefix("bytes=").unwrap_or(range);
    let (s, e) = range.split_once('-')?;
    let (s, e) = (s.trim(), e.trim());

    let (start, end) = match (s.is_empty(), e.is_empty()) {
        // "0-499" - specific range
        (false, false) => (s.parse().ok()?, e.parse::<u64>().ok()?.min(last)),
        // "500-" - from offset to end
        (false, true) => (s.parse().ok()?, last),
        // "-500" - last 500 bytes
        (true, false) => (file_size.saturating_sub(e.parse().ok()?), last),
        (true, true) => return None,
    };

    (start <= end).then_some((start, end))
}

/// Extract Range header from request.
fn get_range_header(request: &Request) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|h| h.field.as_str().as_str().eq_ignore_ascii_case("range"))
        .map(|h| h.value.to_string())
}

/// Respond with an HTML page and optional `Link` preload header.
pub fn respond_html(request: Request, body: &str, link: &str) -> Result<()> {
    if is_head_request(&request) {
        return send_head(request, 200, HTML);
    }
    let mut response =
        Response::from_string(body).with_header(header("Content-Type", HTML)?);
    if !link.is_empty() {
        response.add_header(header("Link", link)?);
    }
    request.respond(response)?;
    Ok(())
}

/// Respond with 404 Not Found.
pub fn respond_not_found(request: Request) -> Result<()> {
    if is_head_request(&request) {
        return send_head(request, 404, PLAIN);
    }
    send_body(request, 404, PLAIN, b"404 Not Found".to_vec())
}

/// Respond with 502 Bad Gateway: a fragment could not be fetched or built.
pub fn respond_bad_gateway(request: Request, error: &dyn std::error::Error) -> Result<()> {
    let body = format!("502 Bad Gateway\n{error}");
    send_body(request, 502, PLAIN, body.into_bytes())
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_body(request, 503, PLAIN, b"503 Service Unavailable".to_vec())
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn send_head(request: Request, status: u16, content_type: &'static str) -> Result<()> {
    let response =
        Response::empty(StatusCode(status)).with_header(header("Content-Type", content_type)?);
    request.respond(response)?;
    Ok(())
}

fn send_body(
    request: Request,
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
) -> Result<()> {
    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(header("Content-Type", content_type)?);
    request.respond(response)?;
    Ok(())
}

fn header(key: &'static str, value: &str) -> Result<Header> {
    Header::from_bytes(key, value).map_err(|()| anyhow!("invalid header {key}: {value}"))
}
