//! gzip block helper used by the frame codec.
//!
//! Early dialects compress every payload unconditionally; later ones only
//! compress payloads at or above a size threshold. Both cases funnel through
//! the two functions here, which wrap real gzip (header + deflate + crc +
//! size trailer), not raw deflate -- client builds in the wild expect an
//! actual gzip member.

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::{BanchoError, Result};

/// Maximum decompressed payload size accepted from the wire. Guards against
/// a maliciously crafted gzip member expanding without bound.
pub const MAX_DECOMPRESSED_SIZE: usize = 16 * 1024 * 1024;

/// Compress `data` into a standalone gzip member.
pub fn gzip_compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(data.len()), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| BanchoError::SinkError(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| BanchoError::SinkError(e.to_string()))
}

/// Decompress a gzip member, failing if the result would exceed
/// [`MAX_DECOMPRESSED_SIZE`] or the stream is malformed.
pub fn gzip_decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(data);
    let mut out = Vec::with_capacity(data.len() * 3);
    let mut chunk = [0u8; 8192];

    loop {
        let n = decoder
            .read(&mut chunk)
            .map_err(|_| BanchoError::DecompressionFailed)?;
        if n == 0 {
            break;
        }
        if out.len() + n > MAX_DECOMPRESSED_SIZE {
            return Err(BanchoError::DecompressionFailed);
        }
        out.extend_from_slice(&chunk[..n]);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_empty() {
        let compressed = gzip_compress(&[]).unwrap();
        let out = gzip_decompress(&compressed).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn roundtrip_small() {
        let data = b"Hello, World!";
        let compressed = gzip_compress(data).unwrap();
        assert_eq!(gzip_decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn roundtrip_large_repetitive() {
        let data = vec![0x41u8; 10_000];
        let compressed = gzip_compress(&data).unwrap();
        assert!(compressed.len() < data.len());
        assert_eq!(gzip_decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn decompress_garbage_fails() {
        let garbage = [1u8, 2, 3, 4, 5, 6, 7, 8];
        assert!(matches!(
            gzip_decompress(&garbage),
            Err(BanchoError::DecompressionFailed)
        ));
    }

    #[test]
    fn compressed_starts_with_gzip_magic() {
        let compressed = gzip_compress(b"some bytes").unwrap();
        assert_eq!(&compressed[0..2], &[0x1f, 0x8b]);
    }
}
