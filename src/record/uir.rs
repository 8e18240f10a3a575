#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    decode::{decode_version3_int4_int8, expect_record_type, read_record_header, Decodable, Decoder},
    error::CdfError,
    record::collection::RecordList,
    types::{CdfInt4, CdfInt8},
};
use std::io;

/// Stores the contents of an Unused Internal Record.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug)]
pub struct UnusedInternalRecord {
    /// The size of this record in bytes.
    pub record_size: CdfInt8,
    /// The type of record as defined in the CDF specfication as an integer.
    pub record_type: CdfInt4,
    /// Next UIR
    pub uir_next: Option<CdfInt8>,
    /// Preivous UIR
    pub uir_prev: Option<CdfInt8>,
    /// Remainder
    pub remainder: Vec<u8>,
}

impl Decodable for UnusedInternalRecord {
    fn decode_be<R>(decoder: &mut Decoder<R>) -> Result<Self, CdfError>
    where
        R: io::Read + io::Seek,
    {
        let header = read_record_header(decoder)?;
        expect_record_type("UIR", -1, &header.record_type)?;
        let (record_size, record_type) = (header.record_size, header.record_type);

        let uir_next = decode_version3_int4_int8(decoder).map(|v| (*v != 0).then_some(v))?;
        let uir_prev = decode_version3_int4_int8(decoder).map(|v| (*v != 0).then_some(v))?;

        // Read the remainder data.
        // prior to v3.0 there were no 8-byte ints.
        let num_data = if decoder.context.get_version()?.major < 3 {
            usize::try_from(*record_size)? - 16
        } else {
            usize::try_from(*record_size)? - 28
        };
        let mut remainder = vec![0u8; num_data];
        decoder.reader.read_exact(&mut remainder)?;

        Ok(UnusedInternalRecord {
            record_size,
            record_type,
            uir_next,
            uir_prev,
            remainder,
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

impl RecordList for UnusedInternalRecord {
    fn next_record(&self) -> Option<CdfInt8> {
        self.uir_next.clone()
    }
}

/// Stores the contents of an Unsociable Unused Internal Record. (yes, that is the official name)
/// There are isolated unused records that are not stored on the unused linked-list.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug)]
pub struct UnsociableUnusedInternalRecord {
    /// The size of this record in bytes.
    pub record_size: CdfInt8,
    /// The type of record as defined in the CDF specfication as an integer.
    pub record_type: CdfInt4,
    /// Remainder
    pub remainder: Vec<u8>,
}

impl Decodable for UnsociableUnusedInternalRecord {
    fn decode_be<R>(decoder: &mut Decoder<R>) -> Result<Self, CdfError>
    where
        R: io::Read + io::Seek,
    {
        let header = read_record_header(decoder)?;
        expect_record_type("UUIR", -1, &header.record_type)?;
        let (record_size, record_type) = (header.record_size, header.record_type);

        // Read the remainder data.
        // prior to v3.0 there were no 8-byte ints.
        let num_data = if decoder.context.get_version()?.major < 3 {
            usize::try_from(*record_size)? - 8
        } else {
            usize::try_from(*record_size)? - 12
        };
        let mut remainder = vec![0u8; num_data];
        decoder.reader.read_exact(&mut remainder)?;

        Ok(UnsociableUnusedInternalRecord {
            record_size,
            record_type,
            remainder,
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
    use crate::repr::CdfVersion;
    use std::io::Cursor;

    fn decoder_for(bytes: Vec<u8>) -> Result<Decoder<Cursor<Vec<u8>>>, CdfError> {
        let mut decoder = Decoder::new(Cursor::new(bytes))?;
        decoder.context.set_version(CdfVersion::new(3, 8, 1));
        Ok(decoder)
    }

    #[test]
    fn test_uir_decodes_remainder_sized_from_record_size() -> Result<(), CdfError> {
        let remainder = vec![0xabu8; 6];
        let record_size = 28 + remainder.len() as i64;

        let mut buf = Vec::new();
        buf.extend_from_slice(&record_size.to_be_bytes());
        buf.extend_from_slice(&(-1i32).to_be_bytes()); // record_type
        buf.extend_from_slice(&0i64.to_be_bytes()); // uir_next
        buf.extend_from_slice(&0i64.to_be_bytes()); // uir_prev
        buf.extend_from_slice(&remainder);

        let mut decoder = decoder_for(buf)?;
        let uir = UnusedInternalRecord::decode_be(&mut decoder)?;
        assert_eq!(uir.remainder, remainder);
        assert!(uir.uir_next.is_none());
        Ok(())
    }

    #[test]
    fn test_uuir_decodes_remainder_sized_from_record_size() -> Result<(), CdfError> {
        let remainder = vec![0xcdu8; 9];
        let record_size = 12 + remainder.len() as i64;

        let mut buf = Vec::new();
        buf.extend_from_slice(&record_size.to_be_bytes());
        buf.extend_from_slice(&(-1i32).to_be_bytes()); // record_type
        buf.extend_from_slice(&remainder);

        let mut decoder = decoder_for(buf)?;
        let uuir = UnsociableUnusedInternalRecord::decode_be(&mut decoder)?;
        assert_eq!(uuir.remainder, remainder);
        Ok(())
    }
}
