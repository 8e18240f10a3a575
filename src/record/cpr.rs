#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    decode::{decode_version3_int4_int8, expect_record_type, read_record_header, Decodable, Decoder},
    error::CdfError,
    types::{CdfInt4, CdfInt8},
};
use std::{fmt, io};

/// Stores the different possible compressions that CDF files could make use of.
#[repr(i32)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub enum CdfCompressionKind {
    /// No compression
    None = 0,
    /// RLE compression
    Rle = 1,
    /// Huffman coding
    Huff = 2,
    /// Adaptive Huffman coding
    Ahuff = 3,
    /// Gzip compression
    Gzip = 5,
}

impl fmt::Display for CdfCompressionKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::None => write!(f, "CdfCompressionKind::None"),
            Self::Rle => write!(f, "CdfCompressionKind::Rle"),
            Self::Huff => write!(f, "CdfCompressionKind::Huff"),
            Self::Ahuff => write!(f, "CdfCompressionKind::Ahuff"),
            Self::Gzip => write!(f, "CdfCompressionKind::Gzip"),
        }
    }
}

impl TryFrom<i32> for CdfCompressionKind {
    type Error = CdfError;
    fn try_from(value: i32) -> Result<Self, CdfError> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Rle),
            2 => Ok(Self::Huff),
            3 => Ok(Self::Ahuff),
            5 => Ok(Self::Gzip),
            e => Err(CdfError::Other(format!(
                "Invalid discriminant for CdfCompressionKin - {e}."
            ))),
        }
    }
}

/// Stores the contents of a Compressed Parameters Record. A CPR is pointed to by either the CCR
/// (in case of full compression of the CDF file) or the VDR (in case of compression on individual
/// variables).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug)]
pub struct CompressedParametersRecord {
    /// Size of this record in bytes.
    pub record_size: CdfInt8,
    /// The type of record as defined in the CDF specfication as an integer.
    pub record_type: CdfInt4,
    /// The type of compression used.
    pub compression_type: CdfCompressionKind,
    /// Value reserved for future use.
    pub rfu_a: CdfInt4,
    /// Compression parameter count.
    pub compressed_parameter_count: CdfInt4,
    /// Compression level.
    pub compression_level: CdfInt4,
}

impl Decodable for CompressedParametersRecord {
    fn decode_be<R>(decoder: &mut Decoder<R>) -> Result<Self, CdfError>
    where
        R: io::Read + io::Seek,
    {
        let header = read_record_header(decoder)?;
        expect_record_type("CPR", 11, &header.record_type)?;
        let (record_size, record_type) = (header.record_size, header.record_type);

        let compression_type: i32 = CdfInt4::decode_be(decoder)?.into();
        let compression_type: CdfCompressionKind = compression_type.try_into()?;

        let compressed_parameter_count = CdfInt4::decode_be(decoder)?;

        let rfu_a = CdfInt4::decode_be(decoder)?;
        if *rfu_a != 0 {
            return Err(CdfError::Decode(format!(
                "Invalid rfu_a read from file in CPR - expected 0, received {}",
                *rfu_a
            )));
        }

        let compression_level = CdfInt4::decode_be(decoder)?;

        match &compression_type {
            CdfCompressionKind::Gzip => {
                if *compression_level == 0 {
                    return Err(CdfError::Decode(
                        "Invalid compression level read for kind Gzip, expected range 1-9."
                            .to_string(),
                    ));
                }
            }
            k => {
                if *compression_level != 0 {
                    return Err(CdfError::Decode(format!(
                        "Invalid compression level read for kind {k}, expected 0."
                    )));
                }
            }
        }

        Ok(CompressedParametersRecord {
            record_size,
            record_type,
            compression_type,
            rfu_a,
            compressed_parameter_count,
            compression_level,
        })
    }

    fn decode_le<R>(_: &mut Decoder<R>) -> Result<Self, CdfError>
    where
        R: io::Read + io::Seek,
    {
        unimplemented!(
            "Little-endian decoding is not supported for records, only for values within records."
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repr::FileVariant;
    use std::io::Cursor;

    fn cpr_bytes(compression_type: i32, compression_level: i32) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&28i64.to_be_bytes()); // record_size
        buf.extend_from_slice(&11i32.to_be_bytes()); // record_type
        buf.extend_from_slice(&compression_type.to_be_bytes());
        buf.extend_from_slice(&0i32.to_be_bytes()); // compressed_parameter_count
        buf.extend_from_slice(&0i32.to_be_bytes()); // rfu_a
        buf.extend_from_slice(&compression_level.to_be_bytes());
        buf
    }

    fn decoder_for(bytes: Vec<u8>) -> Result<Decoder<Cursor<Vec<u8>>>, CdfError> {
        let mut decoder = Decoder::new(Cursor::new(bytes))?;
        decoder.context.set_variant(FileVariant::V3 { compressed: true });
        Ok(decoder)
    }

    #[test]
    fn test_cpr_decodes_gzip_with_nonzero_level() -> Result<(), CdfError> {
        let mut decoder = decoder_for(cpr_bytes(5, 6))?;
        let cpr = CompressedParametersRecord::decode_be(&mut decoder)?;
        assert!(matches!(cpr.compression_type, CdfCompressionKind::Gzip));
        assert_eq!(*cpr.compression_level, 6);
        Ok(())
    }

    #[test]
    fn test_cpr_rejects_gzip_with_zero_level() {
        let mut decoder = decoder_for(cpr_bytes(5, 0)).expect("decoder");
        assert!(CompressedParametersRecord::decode_be(&mut decoder).is_err());
    }

    #[test]
    fn test_cpr_rejects_nonzero_level_for_non_gzip() {
        let mut decoder = decoder_for(cpr_bytes(1, 3)).expect("decoder");
        assert!(CompressedParametersRecord::decode_be(&mut decoder).is_err());
    }
}
