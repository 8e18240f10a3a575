#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::decode::{
    decode_version3_int4_int8, expect_record_type, read_record_header, Decodable, Decoder,
};
use crate::error::CdfError;
use crate::record::collection::RecordList;
use crate::repr::Endian;
use crate::types::{CdfInt4, CdfInt8, CdfType};
use std::io;

/// Struct to store contents of an Attribute Entry Descriptor Record that stores information on
/// zVariable attributes.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug)]
pub struct AttributeZEntryDescriptorRecord {
    /// The size of this record in bytes.
    pub record_size: CdfInt8,
    /// The type of record as defined in the CDF specfication as an integer.
    pub record_type: CdfInt4,
    /// The file offset of the next AZEDR record.
    pub azedr_next: Option<CdfInt8>,
    /// The attribute number that this AZEDR correspond to.
    pub attr_num: CdfInt4,
    /// The type of data stored in this AZEDR stored as an integer identifier.
    pub data_type: CdfInt4,
    /// The numeric identifier for this AZEDR.
    pub num: CdfInt4,
    /// The number of elements stored within each value of this record. Usually 1, for Chars it is
    /// the length of the string.
    pub num_elements: CdfInt4,
    /// The number of strings stored within this record.
    pub num_strings: CdfInt4,
    /// A value reserved for future use.
    pub rfu_b: CdfInt4,
    /// A value reserved for future use.
    pub rfu_c: CdfInt4,
    /// A value reserved for future use.
    pub rfu_d: CdfInt4,
    /// A value reserved for future use.
    pub rfu_e: CdfInt4,
    /// The values stored inside this AZEDR.
    pub value: Vec<CdfType>,
}

impl Decodable for AttributeZEntryDescriptorRecord {
    /// Decode a value from the input that implements `io::Read`.
    fn decode_be<R>(decoder: &mut Decoder<R>) -> Result<Self, CdfError>
    where
        R: io::Read + io::Seek,
    {
        let header = read_record_header(decoder)?;
        expect_record_type("AZEDR", 9, &header.record_type)?;
        let (record_size, record_type) = (header.record_size, header.record_type);

        let azedr_next = decode_version3_int4_int8(decoder).map(|v| (*v != 0).then_some(v))?;

        let attr_num = CdfInt4::decode_be(decoder)?;
        let data_type = CdfInt4::decode_be(decoder)?;
        let num = CdfInt4::decode_be(decoder)?;
        let num_elements = CdfInt4::decode_be(decoder)?;
        let num_strings = CdfInt4::decode_be(decoder)?;

        let rfu_b = CdfInt4::decode_be(decoder)?;
        if *rfu_b != 0 {
            return Err(CdfError::Decode(format!(
                "Invalid rfu_b read from file in AZEDR - expected 0, received {}",
                *rfu_b
            )));
        }
        let rfu_c = CdfInt4::decode_be(decoder)?;
        if *rfu_c != 0 {
            return Err(CdfError::Decode(format!(
                "Invalid rfu_c read from file in AZEDR - expected 0, received {}",
                *rfu_c
            )));
        }
        let rfu_d = CdfInt4::decode_be(decoder)?;
        if *rfu_d != -1 {
            return Err(CdfError::Decode(format!(
                "Invalid rfu_d read from file in AZEDR - expected -1, received {}",
                *rfu_d
            )));
        }
        let rfu_e = CdfInt4::decode_be(decoder)?;
        if *rfu_e != -1 {
            return Err(CdfError::Decode(format!(
                "Invalid rfu_e read from file in AZEDR - expected -1, received {}",
                *rfu_e
            )));
        }

        // Read in the values of this attribute based on the encoding specified in the CDR.
        let endianness = decoder.context.get_encoding()?.get_endian()?;
        let value = match endianness {
            Endian::Big => CdfType::decode_vec_be(decoder, &data_type, &num_elements)?,
            Endian::Little => CdfType::decode_vec_le(decoder, &data_type, &num_elements)?,
        };

        Ok(AttributeZEntryDescriptorRecord {
            record_size,
            record_type,
            azedr_next,
            attr_num,
            data_type,
            num,
            num_elements,
            num_strings,
            rfu_b,
            rfu_c,
            rfu_d,
            rfu_e,
            value,
        })
    }

    fn decode_le<R>(_: &mut Decoder<R>) -> Result<Self, CdfError>
    where
        R: io::Read + io::Seek,
    {
        unreachable!(
            "Little-endian decoding is not supported for records, only for values within records."
        )
    }
}

impl RecordList for AttributeZEntryDescriptorRecord {
    fn next_record(&self) -> Option<CdfInt8> {
        self.azedr_next.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repr::{CdfEncoding, FileVariant};
    use std::io::Cursor;

    fn azedr_bytes_int4(num: i32, value: i32) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&56i64.to_be_bytes()); // record_size
        buf.extend_from_slice(&9i32.to_be_bytes()); // record_type
        buf.extend_from_slice(&0i64.to_be_bytes()); // azedr_next
        buf.extend_from_slice(&0i32.to_be_bytes()); // attr_num
        buf.extend_from_slice(&4i32.to_be_bytes()); // data_type = Int4
        buf.extend_from_slice(&num.to_be_bytes());
        buf.extend_from_slice(&1i32.to_be_bytes()); // num_elements
        buf.extend_from_slice(&0i32.to_be_bytes()); // num_strings
        buf.extend_from_slice(&0i32.to_be_bytes()); // rfu_b
        buf.extend_from_slice(&0i32.to_be_bytes()); // rfu_c
        buf.extend_from_slice(&(-1i32).to_be_bytes()); // rfu_d
        buf.extend_from_slice(&(-1i32).to_be_bytes()); // rfu_e
        buf.extend_from_slice(&value.to_be_bytes());
        buf
    }

    #[test]
    fn test_azedr_decodes_value() -> Result<(), CdfError> {
        let mut decoder = Decoder::new(Cursor::new(azedr_bytes_int4(2, 42)))?;
        decoder.context.set_variant(FileVariant::V3 { compressed: false });
        decoder.context.set_encoding(CdfEncoding::Network);

        let azedr = AttributeZEntryDescriptorRecord::decode_be(&mut decoder)?;
        assert_eq!(*azedr.num, 2);
        assert_eq!(azedr.value.len(), 1);
        match &azedr.value[0] {
            CdfType::Int4(i) => assert_eq!(i32::from(*i), 42),
            other => panic!("unexpected variant: {other:?}"),
        }
        Ok(())
    }
}
