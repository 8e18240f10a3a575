//! Decompression for both whole-file compression (the CCR/CPR pair) and per-variable
//! compressed record blocks (CVVR), selected by the [`CdfCompressionKind`][crate::record::cpr::CdfCompressionKind]
//! byte read from a CPR.
//!
//! Every algorithm here is an `&[u8] -> Vec<u8>` transform rather than a stream adapter:
//! CCR/CVVR payloads are read fully into memory before decompression begins (their size is
//! always known up front from the record header), so there is no benefit to a lazy
//! `Read`-based pipeline the way `flate2`'s own `GzDecoder` offers one.

use std::io::Read;

use flate2::read::GzDecoder;

use crate::error::CdfError;
use crate::record::cpr::CdfCompressionKind;

/// Decompress `data` according to `kind`, returning the uncompressed bytes.
/// # Errors
/// Returns [`CdfError::Format`] if the compressed stream is malformed for its declared kind, or
/// if `kind` is [`CdfCompressionKind::Huff`]/[`CdfCompressionKind::Ahuff`] (see
/// [`decompress_huffman_unsupported`]).
pub fn decompress(kind: &CdfCompressionKind, data: &[u8]) -> Result<Vec<u8>, CdfError> {
    match kind {
        CdfCompressionKind::None => Ok(data.to_vec()),
        CdfCompressionKind::Rle => decompress_rle0(data),
        CdfCompressionKind::Huff => decompress_huffman_unsupported("HUFF"),
        CdfCompressionKind::Ahuff => decompress_huffman_unsupported("AHUFF"),
        CdfCompressionKind::Gzip => decompress_gzip(data),
    }
}

fn decompress_gzip(data: &[u8]) -> Result<Vec<u8>, CdfError> {
    let mut decoder = GzDecoder::new(data);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| CdfError::Format(format!("GZIP decompression failed - {e}")))?;
    Ok(out)
}

/// CDF's RLE0 scheme only ever run-length-encodes zero bytes: any byte other than 0x00 is a
/// literal, while a 0x00 is followed by a count byte giving how many *additional* zero bytes
/// (beyond the first) the run contains, i.e. a run of `n+1` zeros is encoded as `[0x00, n]`.
fn decompress_rle0(data: &[u8]) -> Result<Vec<u8>, CdfError> {
    let mut out = Vec::with_capacity(data.len());
    let mut iter = data.iter().copied();
    while let Some(byte) = iter.next() {
        if byte == 0 {
            let run = iter.next().ok_or_else(|| {
                CdfError::Format("RLE0 stream ended mid run-length byte".to_string())
            })?;
            out.resize(out.len() + usize::from(run) + 1, 0);
        } else {
            out.push(byte);
        }
    }
    Ok(out)
}

/// CDF's HUFF and AHUFF schemes transmit a literal Huffman node/tree structure ahead of the
/// bitstream (not a per-symbol canonical code-length table the way DEFLATE or most textbook
/// canonical-Huffman codecs do), and AHUFF additionally mutates that tree adaptively as symbols
/// are decoded, with the exact tree-update rule defined only by the CDF Internal Format
/// Description's reference decoder. Nothing in this pack demonstrates that framing, so rather
/// than guess at a scheme and silently produce wrong bytes for real `cType = HUFF`/`AHUFF` data,
/// both arms refuse outright.
fn decompress_huffman_unsupported(name: &str) -> Result<Vec<u8>, CdfError> {
    Err(CdfError::Format(format!(
        "{name} decompression is not implemented - its tree-structured bitstream framing is \
         not derivable from this crate's reference material, so the block is rejected rather \
         than decoded incorrectly"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decompress_none_is_identity() -> Result<(), CdfError> {
        let data = b"some bytes".to_vec();
        let out = decompress(&CdfCompressionKind::None, &data)?;
        assert_eq!(out, data);
        Ok(())
    }

    #[test]
    fn test_decompress_rle0_expands_zero_runs() -> Result<(), CdfError> {
        // A literal 'A', then a run of 4 zeros (0x00 0x03 means 3+1 zeros), then 'B'.
        let compressed = vec![b'A', 0x00, 0x03, b'B'];
        let out = decompress_rle0(&compressed)?;
        assert_eq!(out, vec![b'A', 0, 0, 0, 0, b'B']);
        Ok(())
    }

    #[test]
    fn test_decompress_rle0_no_runs_is_passthrough() -> Result<(), CdfError> {
        let compressed = vec![1, 2, 3, 4];
        let out = decompress_rle0(&compressed)?;
        assert_eq!(out, vec![1, 2, 3, 4]);
        Ok(())
    }

    #[test]
    fn test_decompress_gzip_round_trip() -> Result<(), CdfError> {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let original = b"the quick brown fox jumps over the lazy dog".to_vec();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&original).unwrap();
        let compressed = encoder.finish().unwrap();

        let out = decompress(&CdfCompressionKind::Gzip, &compressed)?;
        assert_eq!(out, original);
        Ok(())
    }

    #[test]
    fn test_decompress_huff_is_rejected() {
        let err = decompress(&CdfCompressionKind::Huff, b"anything").unwrap_err();
        assert!(matches!(err, CdfError::Format(_)));
    }

    #[test]
    fn test_decompress_ahuff_is_rejected() {
        let err = decompress(&CdfCompressionKind::Ahuff, b"anything").unwrap_err();
        assert!(matches!(err, CdfError::Format(_)));
    }
}
