#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    decode::{expect_record_type, read_record_header, Decodable, Decoder},
    error::CdfError,
    types::{CdfInt4, CdfInt8},
};
use std::io;

/// Stores the contents of a Sparseness Parameters Record, pointed to by a VDR's
/// `cpr_spr_offset` when that variable uses sparse-array storage (as opposed to per-record
/// compression via a CPR at the same offset). Its parameters describe how many dimensions,
/// and which ones, are stored sparsely.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug)]
pub struct SparsenessParametersRecord {
    /// Size of this record in bytes.
    pub record_size: CdfInt8,
    /// The type of record as defined in the CDF specfication as an integer.
    pub record_type: CdfInt4,
    /// Value reserved for future use.
    pub rfu_a: CdfInt4,
    /// Number of sparse array parameters that follow.
    pub parameter_count: CdfInt4,
    /// One parameter per sparse dimension.
    pub parameters: Vec<CdfInt4>,
}

impl Decodable for SparsenessParametersRecord {
    fn decode_be<R>(decoder: &mut Decoder<R>) -> Result<Self, CdfError>
    where
        R: io::Read + io::Seek,
    {
        let header = read_record_header(decoder)?;
        expect_record_type("SPR", 12, &header.record_type)?;
        let (record_size, record_type) = (header.record_size, header.record_type);

        let rfu_a = CdfInt4::decode_be(decoder)?;
        if *rfu_a != 0 {
            return Err(CdfError::Decode(format!(
                "Invalid rfu_a read from file in SPR - expected 0, received {}",
                *rfu_a
            )));
        }

        let parameter_count = CdfInt4::decode_be(decoder)?;
        let parameters = CdfInt4::decode_vec_be(decoder, &parameter_count)?;

        Ok(SparsenessParametersRecord {
            record_size,
            record_type,
            rfu_a,
            parameter_count,
            parameters,
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

    use crate::error::CdfError;
    use crate::testutil::{push_i32, push_i64};
    use std::io::Cursor;

    use super::*;

    fn build_spr_bytes() -> Vec<u8> {
        let mut buf = Vec::new();
        push_i64(&mut buf, 32); // record_size
        push_i32(&mut buf, 12); // record_type
        push_i32(&mut buf, 0); // rfu_a
        push_i32(&mut buf, 2); // parameter_count
        push_i32(&mut buf, 10); // parameters[0]
        push_i32(&mut buf, 20); // parameters[1]
        buf
    }

    #[test]
    fn test_spr_decodes_parameters() -> Result<(), CdfError> {
        let mut decoder = Decoder::new(Cursor::new(build_spr_bytes()))?;
        let spr = SparsenessParametersRecord::decode_be(&mut decoder)?;
        assert_eq!(*spr.record_type, 12);
        assert_eq!(*spr.parameter_count, 2);
        assert_eq!(spr.parameters.iter().map(|p| **p).collect::<Vec<_>>(), vec![10, 20]);
        Ok(())
    }
}
