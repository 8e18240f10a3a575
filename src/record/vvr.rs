#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    decode::{expect_record_type, read_record_header, Decodable, Decoder},
    error::CdfError,
    types::{CdfInt4, CdfInt8},
};
use std::io::{self, Seek, SeekFrom};

/// Stores the contents of a Variable Values Record.
///
/// A VVR holds a run of a variable's raw record data, but has no idea what type or shape
/// that data is - `data_type`, `num_elements`, and the dimension sizes all live in the owning
/// RVDR/ZVDR. Rather than guess at that context here, this record only remembers where its
/// raw bytes begin and how many there are; the owning variable seeks back to `data_offset`
/// and decodes the bytes itself once it knows what they mean.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct VariableValuesRecord {
    /// The size of this record in bytes.
    pub record_size: CdfInt8,
    /// The type of record as defined in the CDF specfication as an integer.
    pub record_type: CdfInt4,
    /// File offset where this record's raw data bytes begin.
    pub data_offset: u64,
    /// Number of raw data bytes stored in this record.
    pub data_len: usize,
}

impl Decodable for VariableValuesRecord {
    fn decode_be<R>(decoder: &mut Decoder<R>) -> Result<Self, CdfError>
    where
        R: io::Read + io::Seek,
    {
        let header = read_record_header(decoder)?;
        expect_record_type("VVR", 7, &header.record_type)?;
        let (record_size, record_type) = (header.record_size, header.record_type);

        let offset_width: usize = if decoder.context.offsets_are_64bit()? {
            8
        } else {
            4
        };
        let header_width = offset_width + 4;
        let data_len = usize::try_from(*record_size)?.saturating_sub(header_width);
        let data_offset = decoder.reader.stream_position()?;

        // Skip over the raw data; the owning variable will seek back here on demand.
        decoder
            .reader
            .seek(SeekFrom::Current(i64::try_from(data_len)?))?;

        Ok(VariableValuesRecord {
            record_size,
            record_type,
            data_offset,
            data_len,
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
    use crate::decode::Decoder;
    use std::io::Cursor;

    #[test]
    fn test_vvr_records_raw_data_window() -> Result<(), CdfError> {
        // record_size=20 (8 byte header + 12 bytes data), record_type=7, then 12 data bytes.
        let mut bytes = vec![];
        bytes.extend_from_slice(&20i32.to_be_bytes());
        bytes.extend_from_slice(&7i32.to_be_bytes());
        bytes.extend_from_slice(&[0u8; 12]);

        let mut decoder = Decoder::new(Cursor::new(bytes))?;
        decoder.context.set_variant(crate::repr::FileVariant::PreV26);
        let vvr = VariableValuesRecord::decode_be(&mut decoder)?;
        assert_eq!(*vvr.record_size, 20);
        assert_eq!(vvr.data_offset, 8);
        assert_eq!(vvr.data_len, 12);
        Ok(())
    }
}
