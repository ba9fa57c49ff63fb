//! `decode` command: show the fragment fingerprints behind a token.

use anyhow::Result;
use bundlebox::bundle::{Bundle, decode};
use bundlebox::MediaKind;

/// Print the media kind (for file names) and one fingerprint per line.
pub fn run_decode(token: &str) -> Result<()> {
    let (media, fingerprints) = decode_token(token)?;
    if let Some(media) = media {
        println!("{media}");
    }
    for fingerprint in fingerprints {
        println!("{fingerprint}");
    }
    Ok(())
}

/// Accept a bare token (`12.0.3`) or an artifact name (`12.0.3.css`).
fn decode_token(token: &str) -> Result<(Option<MediaKind>, Vec<u32>)> {
    let token = token.rsplit('/').next().unwrap_or(token);
    if let Ok(bundle) = Bundle::from_file_name(token) {
        return Ok((Some(bundle.media()), bundle.fingerprints().to_vec()));
    }
    Ok((None, decode(token)?))
}
