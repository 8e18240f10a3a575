#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    decode::{decode_version3_int4_int8, expect_record_type, read_record_header, Decodable, Decoder},
    error::CdfError,
    record::{
        adr::AttributeDescriptorRecord,
        collection::get_record_vec,
        rvdr::RVariableDescriptorRecord,
        uir::UnusedInternalRecord,
        zvdr::ZVariableDescriptorRecord,
    },
    repr::CdfVersion,
    types::{CdfInt4, CdfInt8},
};
use std::io;

/// The Global Descriptor Record is present in all uncompressed CDF files after the CDF Descriptor
/// Record, at the file offset noted in the CDR `gdr_offset` attribute.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug)]
pub struct GlobalDescriptorRecord {
    /// The size of this record in bytes.
    pub record_size: CdfInt8,
    /// The type of record as defined in the CDF specfication as an integer.
    pub record_type: CdfInt4,
    /// The file-offset of the first R Variable Descriptor Record.
    pub rvdr_head: Option<CdfInt8>,
    /// The file-offset of the first Z Variable Descriptor Record.
    pub zvdr_head: Option<CdfInt8>,
    /// The file-offset of the first Attribute Descriptor Record.
    pub adr_head: Option<CdfInt8>,
    /// The file-offset representing the end-of-file.
    pub eof: Option<CdfInt8>,
    /// Number of R variables.
    pub num_rvars: CdfInt4,
    /// Number of attributes.
    pub num_attributes: CdfInt4,
    /// Maximum R variable.
    pub max_rvar: CdfInt4,
    /// Number of dimensions for R variables (Note: all R variables have the same dimension.)
    pub num_r_dims: CdfInt4,
    /// Number of Z variables.
    pub num_zvars: CdfInt4,
    /// The file offset for the Unused Internal Record.
    pub uir_head: Option<CdfInt8>,
    /// A value reserved for future use.
    pub rfu_c: CdfInt4,
    /// Date of last leapsecond update.
    pub date_last_leapsecond_update: CdfInt4,
    /// A value reserved for future use.
    pub rfu_e: CdfInt4,
    /// Sizes for R variables.
    pub size_r_dims: Vec<CdfInt4>,
    /// rVariable descriptor records, walked from `rvdr_head`.
    pub rvdr_vec: Vec<RVariableDescriptorRecord>,
    /// zVariable descriptor records, walked from `zvdr_head`.
    pub zvdr_vec: Vec<ZVariableDescriptorRecord>,
    /// Attribute descriptor records, walked from `adr_head`. Contains both global and
    /// variable attributes; callers split on `scope` to tell them apart.
    pub adr_vec: Vec<AttributeDescriptorRecord>,
    /// Unused internal records, walked from `uir_head`.
    pub uir_vec: Vec<UnusedInternalRecord>,
}

impl Decodable for GlobalDescriptorRecord {
    fn decode_be<R>(decoder: &mut Decoder<R>) -> Result<Self, CdfError>
    where
        R: io::Read + io::Seek,
    {
        let cdf_version = decoder.context.get_version()?;

        let header = read_record_header(decoder)?;
        expect_record_type("GDR", 2, &header.record_type)?;
        let (record_size, record_type) = (header.record_size, header.record_type);

        let rvdr_head = decode_version3_int4_int8(decoder).map(|v| (*v != 0).then_some(v))?;
        let zvdr_head = decode_version3_int4_int8(decoder)
            .map(|v| (*v != 0 && cdf_version >= CdfVersion::new(2, 2, 0)).then_some(v))?;

        let adr_head = decode_version3_int4_int8(decoder).map(|v| (*v != 0).then_some(v))?;

        // eof is undefined for CDF < v2.1
        let eof = decode_version3_int4_int8(decoder)
            .map(|eof| (cdf_version >= CdfVersion::new(2, 1, 0)).then_some(eof))?;

        let num_rvars = CdfInt4::decode_be(decoder)?;
        let num_attributes = CdfInt4::decode_be(decoder)?;
        let max_rvar = CdfInt4::decode_be(decoder)?;

        let num_r_dims = CdfInt4::decode_be(decoder)?;
        decoder
            .context
            .set_num_dimension_rvariable(num_r_dims.clone());

        let num_zvars = CdfInt4::decode_be(decoder)?;
        let uir_head = decode_version3_int4_int8(decoder).map(|v| (*v != 0).then_some(v))?;

        let rfu_c = CdfInt4::decode_be(decoder)?;
        if *rfu_c != 0 {
            return Err(CdfError::Decode(format!(
                "Invalid rfu_c read from file - expected 0, received {}",
                *rfu_c
            )));
        }

        let date_last_leapsecond_update = CdfInt4::decode_be(decoder)?;

        let rfu_e = CdfInt4::decode_be(decoder)?;
        if *rfu_e != -1 {
            return Err(CdfError::Decode(format!(
                "Invalid rfu_e read from file - expected -1, received {}",
                *rfu_e
            )));
        }

        let mut sizes_rvar = vec![CdfInt4::from(0); usize::try_from(*num_r_dims)?];
        for s in sizes_rvar.iter_mut() {
            // If there are rVariables present, read in their dimensions.
            *s = CdfInt4::decode_be(decoder)?;
        }

        let current_pos = decoder.reader.stream_position()?;

        let rvdr_vec = match &rvdr_head {
            Some(head) => get_record_vec::<R, RVariableDescriptorRecord>(decoder, head)?,
            None => vec![],
        };
        if rvdr_vec.len() != usize::try_from(*num_rvars).unwrap_or(usize::MAX) {
            log::warn!(
                "GDR declares {} rVariables but its RVDR chain has {} links",
                *num_rvars,
                rvdr_vec.len()
            );
        }
        let zvdr_vec = match &zvdr_head {
            Some(head) => get_record_vec::<R, ZVariableDescriptorRecord>(decoder, head)?,
            None => vec![],
        };
        if zvdr_vec.len() != usize::try_from(*num_zvars).unwrap_or(usize::MAX) {
            log::warn!(
                "GDR declares {} zVariables but its ZVDR chain has {} links",
                *num_zvars,
                zvdr_vec.len()
            );
        }
        let adr_vec = match &adr_head {
            Some(head) => get_record_vec::<R, AttributeDescriptorRecord>(decoder, head)?,
            None => vec![],
        };
        if adr_vec.len() != usize::try_from(*num_attributes).unwrap_or(usize::MAX) {
            log::warn!(
                "GDR declares {} attributes but its ADR chain has {} links",
                *num_attributes,
                adr_vec.len()
            );
        }
        let uir_vec = match &uir_head {
            Some(head) => get_record_vec::<R, UnusedInternalRecord>(decoder, head)?,
            None => vec![],
        };

        // The record chains above each seek on their own; leave the reader where the GDR's
        // own fixed-size fields end, not wherever the last chain walk left it.
        decoder.reader.seek(io::SeekFrom::Start(current_pos))?;

        Ok(Self {
            record_size,
            record_type,
            rvdr_head,
            zvdr_head,
            adr_head,
            eof,
            num_rvars,
            num_attributes,
            max_rvar,
            num_r_dims,
            num_zvars,
            uir_head,
            rfu_c,
            date_last_leapsecond_update,
            rfu_e,
            size_r_dims: sizes_rvar,
            rvdr_vec,
            zvdr_vec,
            adr_vec,
            uir_vec,
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
