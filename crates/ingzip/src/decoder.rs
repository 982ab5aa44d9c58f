//! Buffered gzip decoding.
//!
//! The whole compressed payload is already in memory when decoding starts, so the
//! decoder simply drains a [`MultiGzDecoder`] over that buffer into a [`Writer`].

use crate::error::DecodeError;
use bytes::{Bytes, BytesMut};
use flate2::read::MultiGzDecoder;
use std::io;
use std::io::Read;
use tracing::trace;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

// inspired by the encoder writer of micro-web
struct Writer {
    buf: BytesMut,
}

impl Writer {
    fn with_capacity(capacity: usize) -> Self {
        Self { buf: BytesMut::with_capacity(capacity) }
    }

    fn freeze(self) -> Bytes {
        self.buf.freeze()
    }
}

impl io::Write for Writer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Decodes gzip payloads, optionally bounding the size of the decoded output.
#[derive(Debug, Default, Clone, Copy)]
pub struct GzipDecoder {
    max_decoded_len: Option<usize>,
}

impl GzipDecoder {
    pub fn new() -> Self {
        Self { max_decoded_len: None }
    }

    pub fn with_max_decoded_len(max_decoded_len: usize) -> Self {
        Self { max_decoded_len: Some(max_decoded_len) }
    }

    pub fn max_decoded_len(&self) -> Option<usize> {
        self.max_decoded_len
    }

    /// Decodes `raw` as one or more concatenated gzip members.
    ///
    /// Fails with [`DecodeError::InvalidHeader`] when `raw` does not start with a gzip
    /// header, and with [`DecodeError::Corrupted`] when the stream breaks off or its
    /// trailer does not match. Nothing partially decoded is returned on failure.
    pub fn decode(&self, raw: &[u8]) -> Result<Bytes, DecodeError> {
        let mut decoder = Self::open(raw)?;

        // the deflate payload usually expands, start from a few times the input
        let mut writer = Writer::with_capacity(raw.len().saturating_mul(4).min(64 * 1024));

        match self.max_decoded_len {
            Some(limit) => {
                let copied = io::copy(&mut decoder.by_ref().take((limit as u64).saturating_add(1)), &mut writer)?;
                if copied > limit as u64 {
                    trace!(limit, "decoded gzip body exceed the limit");
                    return Err(DecodeError::too_large(limit));
                }
            }
            None => {
                io::copy(&mut decoder, &mut writer)?;
            }
        }

        Ok(writer.freeze())
    }

    fn open(raw: &[u8]) -> Result<MultiGzDecoder<&[u8]>, DecodeError> {
        if !raw.starts_with(&GZIP_MAGIC) {
            return Err(DecodeError::InvalidHeader);
        }

        let decoder = MultiGzDecoder::new(raw);
        if decoder.header().is_none() {
            return Err(DecodeError::InvalidHeader);
        }

        Ok(decoder)
    }
}

#[cfg(test)]
mod tests {
    use crate::decoder::GzipDecoder;
    use crate::error::DecodeError;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    const CONTENT: &str = "Foobar Wibble Content";

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_decode() {
        let decoded = GzipDecoder::new().decode(&gzip(CONTENT.as_bytes())).unwrap();
        assert_eq!(decoded.as_ref(), CONTENT.as_bytes());
    }

    #[test]
    fn test_decode_empty_payload() {
        let decoded = GzipDecoder::new().decode(&gzip(b"")).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_decode_multi_member() {
        let mut raw = gzip(b"Foobar ");
        raw.extend_from_slice(&gzip(b"Wibble Content"));

        let decoded = GzipDecoder::new().decode(&raw).unwrap();
        assert_eq!(decoded.as_ref(), CONTENT.as_bytes());
    }

    #[test]
    fn test_decode_large_payload() {
        let content = CONTENT.repeat(10_000);
        let decoded = GzipDecoder::new().decode(&gzip(content.as_bytes())).unwrap();
        assert_eq!(decoded.as_ref(), content.as_bytes());
    }

    #[test]
    fn test_not_gzip() {
        let result = GzipDecoder::new().decode(CONTENT.as_bytes());
        assert!(matches!(result, Err(DecodeError::InvalidHeader)));
    }

    #[test]
    fn test_empty_input() {
        let result = GzipDecoder::new().decode(b"");
        assert!(matches!(result, Err(DecodeError::InvalidHeader)));
    }

    #[test]
    fn test_truncated() {
        let raw = gzip(CONTENT.as_bytes());
        let result = GzipDecoder::new().decode(&raw[..raw.len() - 6]);
        assert!(matches!(result, Err(DecodeError::Corrupted { .. })));
    }

    #[test]
    fn test_bad_checksum() {
        let mut raw = gzip(CONTENT.as_bytes());
        let crc_start = raw.len() - 8;
        raw[crc_start] ^= 0xff;

        let result = GzipDecoder::new().decode(&raw);
        assert!(matches!(result, Err(DecodeError::Corrupted { .. })));
    }

    #[test]
    fn test_limit() {
        let raw = gzip(CONTENT.as_bytes());

        let decoded = GzipDecoder::with_max_decoded_len(CONTENT.len()).decode(&raw).unwrap();
        assert_eq!(decoded.as_ref(), CONTENT.as_bytes());

        let result = GzipDecoder::with_max_decoded_len(CONTENT.len() - 1).decode(&raw);
        assert!(matches!(result, Err(DecodeError::TooLarge { limit }) if limit == CONTENT.len() - 1));
    }
}
