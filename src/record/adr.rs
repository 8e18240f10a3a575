#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    decode::{decode_version3_int4_int8, expect_record_type, read_record_header, Decodable, Decoder},
    error::CdfError,
    record::{
        agredr::AttributeGREntryDescriptorRecord,
        azedr::AttributeZEntryDescriptorRecord,
        collection::{get_record_vec, RecordList},
    },
    types::{CdfInt4, CdfInt8, CdfString},
};
use std::io;

/// The Attribute Descriptor Record contains information on each attribute in the CDF.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug)]
pub struct AttributeDescriptorRecord {
    /// The size in bytes of this record.
    pub record_size: CdfInt8,
    /// The type of record as defined in the CDF specfication as an integer.
    pub record_type: CdfInt4,
    /// The file offset of the next ADR.
    pub adr_next: Option<CdfInt8>,
    /// The file offset of the first AGREDR corresponding to this ADR.
    pub agredr_head: Option<CdfInt8>,
    /// Scope.
    pub scope: CdfInt4,
    /// The numeric identifier for this attribute.
    pub num: CdfInt4,
    /// The number of GR attributes stored within this attribute.
    pub num_gr_entries: CdfInt4,
    /// The maximum GR entry.
    pub max_gr_entry: CdfInt4,
    /// A value reserved for future use.
    pub rfu_a: CdfInt4,
    /// The file offset of the first AZEDR corresponding to this ADR.
    pub azedr_head: Option<CdfInt8>,
    /// The number of Z attributes stored within this attribute.
    pub num_z_entries: CdfInt4,
    /// The maximum Z entry.
    pub max_z_entry: CdfInt4,
    /// A value reserved for future use.
    pub rfu_e: CdfInt4,
    /// Name of this attribute.
    pub name: CdfString,
    /// Store vec of AGREDRs associated with this attribute.
    pub agredr_vec: Vec<AttributeGREntryDescriptorRecord>,
    /// Store vec of AZEDRs associated with this attribute.
    pub azedr_vec: Vec<AttributeZEntryDescriptorRecord>,
}

impl Decodable for AttributeDescriptorRecord {
    fn decode_be<R>(decoder: &mut Decoder<R>) -> Result<Self, CdfError>
    where
        R: io::Read + io::Seek,
    {
        let cdf_version = decoder.context.get_version()?;

        let header = read_record_header(decoder)?;
        expect_record_type("ADR", 4, &header.record_type)?;
        let (record_size, record_type) = (header.record_size, header.record_type);

        let adr_next = decode_version3_int4_int8(decoder).map(|v| (*v != 0).then_some(v))?;
        let agredr_head = decode_version3_int4_int8(decoder).map(|v| (*v != 0).then_some(v))?;

        let scope = CdfInt4::decode_be(decoder)?;
        let num = CdfInt4::decode_be(decoder)?;
        let num_gr_entries = CdfInt4::decode_be(decoder)?;
        let max_gr_entry = CdfInt4::decode_be(decoder)?;

        let rfu_a = CdfInt4::decode_be(decoder)?;
        if *rfu_a != 0 {
            return Err(CdfError::Decode(format!(
                "Invalid rfu_a read from file in ADR - expected 0, received {}",
                *rfu_a
            )));
        }

        let azedr_head = decode_version3_int4_int8(decoder).map(|v| (*v != 0).then_some(v))?;

        let num_z_entries = CdfInt4::decode_be(decoder)?;
        let max_z_entry = CdfInt4::decode_be(decoder)?;

        let rfu_e = CdfInt4::decode_be(decoder)?;
        if *rfu_e != -1 {
            return Err(CdfError::Decode(format!(
                "Invalid rfu_e read from file in ADR - expected -1, received {}",
                *rfu_e
            )));
        }

        let name = if cdf_version.major < 3 {
            CdfString::decode_string_from_numbytes(decoder, 64)?
        } else {
            CdfString::decode_string_from_numbytes(decoder, 256)?
        };

        let agredr_vec = match &agredr_head {
            Some(head) => get_record_vec::<R, AttributeGREntryDescriptorRecord>(decoder, head)?,
            None => vec![],
        };
        if agredr_vec.len() != usize::try_from(*num_gr_entries).unwrap_or(usize::MAX) {
            log::warn!(
                "ADR declares {} g/r-entries but its AGREDR chain has {} links",
                *num_gr_entries,
                agredr_vec.len()
            );
        }

        let azedr_vec = match &azedr_head {
            Some(head) => get_record_vec::<R, AttributeZEntryDescriptorRecord>(decoder, head)?,
            None => vec![],
        };
        if azedr_vec.len() != usize::try_from(*num_z_entries).unwrap_or(usize::MAX) {
            log::warn!(
                "ADR declares {} z-entries but its AZEDR chain has {} links",
                *num_z_entries,
                azedr_vec.len()
            );
        }

        Ok(AttributeDescriptorRecord {
            record_size,
            record_type,
            adr_next,
            agredr_head,
            scope,
            num,
            num_gr_entries,
            max_gr_entry,
            rfu_a,
            azedr_head,
            num_z_entries,
            max_z_entry,
            rfu_e,
            name,
            agredr_vec,
            azedr_vec,
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

impl RecordList for AttributeDescriptorRecord {
    fn next_record(&self) -> Option<CdfInt8> {
        self.adr_next.clone()
    }
}

#[cfg(test)]
mod tests {

    use crate::error::CdfError;
    use crate::repr::{CdfVersion, FileVariant};
    use crate::testutil::{push_fixed_str, push_i32, push_i64};
    use std::io::Cursor;

    use super::*;

    fn build_adr_bytes() -> Vec<u8> {
        let mut buf = Vec::new();
        push_i64(&mut buf, 324); // record_size
        push_i32(&mut buf, 4); // record_type
        push_i64(&mut buf, 0); // adr_next
        push_i64(&mut buf, 0); // agredr_head
        push_i32(&mut buf, 1); // scope: global
        push_i32(&mut buf, 0); // num
        push_i32(&mut buf, 0); // num_gr_entries
        push_i32(&mut buf, -1); // max_gr_entry
        push_i32(&mut buf, 0); // rfu_a
        push_i64(&mut buf, 0); // azedr_head
        push_i32(&mut buf, 0); // num_z_entries
        push_i32(&mut buf, -1); // max_z_entry
        push_i32(&mut buf, -1); // rfu_e
        push_fixed_str(&mut buf, "global_attr", 256);
        buf
    }

    #[test]
    fn test_adr_decodes_fixed_fields() -> Result<(), CdfError> {
        let mut decoder = Decoder::new(Cursor::new(build_adr_bytes()))?;
        decoder.context.set_variant(FileVariant::V3 { compressed: false });
        decoder.context.set_version(CdfVersion::new(3, 8, 1));

        let adr = AttributeDescriptorRecord::decode_be(&mut decoder)?;
        assert_eq!(*adr.record_type, 4);
        assert_eq!(adr.adr_next, None);
        assert_eq!(*adr.scope, 1);
        assert_eq!(*adr.num_gr_entries, 0);
        assert_eq!(*adr.num_z_entries, 0);
        assert_eq!(*adr.name, "global_attr");
        assert!(adr.agredr_vec.is_empty());
        assert!(adr.azedr_vec.is_empty());
        Ok(())
    }
}
