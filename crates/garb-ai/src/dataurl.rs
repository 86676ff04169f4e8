//! Minimal data-URL decoding for AI-returned images.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;

use crate::{Error, Result};

/// Decode a `data:<media-type>;base64,<payload>` URL into its media type
/// and raw bytes.
pub fn decode(url: &str) -> Result<(String, Vec<u8>)> {
  let rest = url.strip_prefix("data:").ok_or(Error::BadDataUrl)?;
  let (header, payload) = rest.split_once(',').ok_or(Error::BadDataUrl)?;
  let media_type = header
    .strip_suffix(";base64")
    .ok_or(Error::BadDataUrl)?
    .to_owned();
  let bytes = B64.decode(payload).map_err(|_| Error::BadDataUrl)?;
  Ok((media_type, bytes))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn decodes_png_payload() {
    let (media_type, bytes) = decode("data:image/png;base64,aGVsbG8=").unwrap();
    assert_eq!(media_type, "image/png");
    assert_eq!(bytes, b"hello");
  }

  #[test]
  fn rejects_non_base64_urls() {
    assert!(decode("data:image/png,plain").is_err());
    assert!(decode("https://example.com/a.png").is_err());
  }
}
