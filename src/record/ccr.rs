#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    decode::{decode_version3_int4_int8, expect_record_type, read_record_header, Decodable, Decoder},
    error::CdfError,
    types::{CdfInt4, CdfInt8},
};
use std::io;

/// Stores compressed values in the case of full-file compression (as opposed to individual
/// variable data compression).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug)]
pub struct CompressedCdfRecord {
    /// Size of this record in bytes.
    pub record_size: CdfInt8,
    /// The type of record as defined in the CDF specfication as an integer.
    pub record_type: CdfInt4,
    /// File offset of the compressed parameters record.
    pub cpr_offset: CdfInt8,
    /// Size of the CDF in its uncompressed form.
    pub uncompressed_size: CdfInt8,
    /// Reserved for future use.
    pub rfu_a: CdfInt4,
    /// Compressed CDF data as a vector of u8.
    pub data: Vec<u8>,
}

impl Decodable for CompressedCdfRecord {
    fn decode_be<R>(decoder: &mut Decoder<R>) -> Result<Self, CdfError>
    where
        R: io::Read + io::Seek,
    {
        let header = read_record_header(decoder)?;
        expect_record_type("CCR", 10, &header.record_type)?;
        let (record_size, record_type) = (header.record_size, header.record_type);
        let cpr_offset = decode_version3_int4_int8(decoder)?;
        let uncompressed_size = decode_version3_int4_int8(decoder)?;

        let rfu_a = CdfInt4::decode_be(decoder)?;
        if *rfu_a != 0 {
            return Err(CdfError::Decode(format!(
                "Invalid rfu_a read from file in CCR - expected 0, received {}",
                *rfu_a
            )));
        }

        // Read the compressed data.
        // prior to v3.0 there were no 8-byte ints.
        let num_data = if decoder.context.offsets_are_64bit()? {
            usize::try_from(*record_size)? - 32
        } else {
            usize::try_from(*record_size)? - 20
        };
        let mut data = vec![0u8; num_data];
        decoder.reader.read_exact(&mut data)?;

        Ok(Self {
            record_size,
            record_type,
            cpr_offset,
            uncompressed_size,
            rfu_a,
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
    fn test_ccr_decodes_payload_sized_from_record_size() -> Result<(), CdfError> {
        let payload = b"compressed-bytes".to_vec();
        let record_size = 32 + payload.len() as i64;

        let mut buf = Vec::new();
        buf.extend_from_slice(&record_size.to_be_bytes());
        buf.extend_from_slice(&10i32.to_be_bytes()); // record_type
        buf.extend_from_slice(&40i64.to_be_bytes()); // cpr_offset
        buf.extend_from_slice(&999i64.to_be_bytes()); // uncompressed_size
        buf.extend_from_slice(&0i32.to_be_bytes()); // rfu_a
        buf.extend_from_slice(&payload);

        let mut decoder = Decoder::new(Cursor::new(buf))?;
        decoder.context.set_variant(FileVariant::V3 { compressed: true });

        let ccr = CompressedCdfRecord::decode_be(&mut decoder)?;
        assert_eq!(*ccr.cpr_offset, 40);
        assert_eq!(*ccr.uncompressed_size, 999);
        assert_eq!(ccr.data, payload);
        Ok(())
    }
}
