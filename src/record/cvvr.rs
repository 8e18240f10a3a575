#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    decode::{decode_version3_int4_int8, expect_record_type, read_record_header, Decodable, Decoder},
    error::CdfError,
    types::{CdfInt4, CdfInt8},
};
use std::io;

/// Stores the contents of a Compressed Variable Values record, which stores one section of
/// compressed variable value records (VVR).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug)]
pub struct CompressedVariableValuesRecord {
    /// The size of this record in bytes.
    pub record_size: CdfInt8,
    /// The type of record as defined in the CDF specfication as an integer.
    pub record_type: CdfInt4,
    /// Value reserved for future use.
    pub rfu_a: CdfInt4,
    /// Size in bytes of the post-compressed data.
    pub compressed_size: CdfInt8,
    /// Compressed data
    pub data: Vec<u8>,
}

impl Decodable for CompressedVariableValuesRecord {
    fn decode_be<R>(decoder: &mut Decoder<R>) -> Result<Self, CdfError>
    where
        R: io::Read + io::Seek,
    {
        let header = read_record_header(decoder)?;
        expect_record_type("CVVR", 13, &header.record_type)?;
        let (record_size, record_type) = (header.record_size, header.record_type);

        let rfu_a = CdfInt4::decode_be(decoder)?;
        if *rfu_a != 0 {
            return Err(CdfError::Decode(format!(
                "Invalid rfu_a read from file in CVVR - expected 0, received {}",
                *rfu_a
            )));
        }

        let compressed_size = decode_version3_int4_int8(decoder)?;

        // Read the compressed data.
        // prior to v3.0 there were no 8-byte ints.
        let mut data = vec![0u8; usize::try_from(*compressed_size)?];
        decoder.reader.read_exact(&mut data)?;

        Ok(Self {
            record_size,
            record_type,
            rfu_a,
            compressed_size,
            data,
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

    #[test]
    fn test_cvvr_decodes_compressed_block() -> Result<(), CdfError> {
        let payload = b"some-compressed-bytes".to_vec();
        let record_size = 24 + payload.len() as i64;

        let mut buf = Vec::new();
        buf.extend_from_slice(&record_size.to_be_bytes());
        buf.extend_from_slice(&13i32.to_be_bytes()); // record_type
        buf.extend_from_slice(&0i32.to_be_bytes()); // rfu_a
        buf.extend_from_slice(&(payload.len() as i64).to_be_bytes()); // compressed_size
        buf.extend_from_slice(&payload);

        let mut decoder = Decoder::new(Cursor::new(buf))?;
        decoder.context.set_variant(FileVariant::V3 { compressed: true });

        let cvvr = CompressedVariableValuesRecord::decode_be(&mut decoder)?;
        assert_eq!(*cvvr.compressed_size, payload.len() as i64);
        assert_eq!(cvvr.data, payload);
        Ok(())
    }
}
