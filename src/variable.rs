//! Resolves one variable's records against the VXR/VVR/CVVR chain a VDR points at, and shapes
//! the raw elements it reads into the logical value a caller asked for. Grounded on the VDR
//! record-resolution algorithm: walk the variance/max-record/VXR-chain checks in order, fall
//! back to pad or fill values for implicit records, then hand whatever raw bytes were found to
//! a [`crate::data_reader::DataReader`] and a [`Shaper`] to turn into a value.

use std::io::{self, Read, Seek, SeekFrom};

use crate::cdf::{RandomAccess, SharedReader};
use crate::data_reader::DataReader;
use crate::decode::{read_record_header, Decodable, Decoder};
use crate::error::CdfError;
use crate::record::cpr::{CdfCompressionKind, CompressedParametersRecord};
use crate::record::cvvr::CompressedVariableValuesRecord;
use crate::record::rvdr::RVariableDescriptorRecord;
use crate::record::vvr::VariableValuesRecord;
use crate::record::vxr::VariableIndexRecord;
use crate::record::zvdr::ZVariableDescriptorRecord;
use crate::repr::Endian;
use crate::shaper::{ShapeClass, ShapedValue, Shaper};
use crate::types::{CdfChar, CdfString, CdfType, DataType};
use crate::compression;

/// Maximum nesting depth the VXR tree resolver will follow before giving up; a correctly
/// formed file never nests VXRs anywhere near this deep, so hitting it means a cyclic or
/// corrupt chain.
const MAX_VXR_DEPTH: usize = 64;

/// A record-valued leaf found while walking a variable's VXR tree: either an uncompressed
/// block (a VVR) or a compressed one (a CVVR) that must be inflated before indexing into it.
enum Leaf {
    Vvr(VariableValuesRecord),
    Cvvr(CompressedVariableValuesRecord),
}

/// One variable's descriptor, generalised over the r- and z-variable record shapes so the
/// rest of this module (and the public contract below) doesn't need to care which kind it
/// came from.
pub struct Variable {
    name: CdfString,
    num: i32,
    is_z: bool,
    data_type: DataType,
    shaper: Shaper,
    record_variance: bool,
    max_record: i32,
    num_elements: i32,
    vxr_vec: Vec<VariableIndexRecord>,
    pad_value: Option<Vec<CdfType>>,
    compression: Option<CdfCompressionKind>,
    blocking_factor: i32,
    endianness: Endian,
    reader: SharedReader,
    data_reader: DataReader,
}

impl Variable {
    /// Builds a `Variable` over an r-variable's descriptor record.
    /// # Errors
    /// Returns a [`CdfError`] if the variable's compression parameters can't be resolved.
    pub fn from_rvdr(
        rvdr: RVariableDescriptorRecord,
        r_dim_sizes: Vec<i32>,
        row_major: bool,
        endianness: Endian,
        reader: SharedReader,
    ) -> Result<Self, CdfError> {
        let data_type = DataType::try_from(*rvdr.data_type)?;
        let compression = resolve_compression(&reader, rvdr.flags.is_compressed, rvdr.cpr_spr_offset)?;
        let shaper = Shaper::new(data_type, r_dim_sizes, rvdr.dim_variances, row_major);
        let num_elements = *rvdr.num_elements;
        let data_reader = DataReader::new(
            data_type,
            shaper.raw_item_count() as i32 * num_elements.max(1),
            i64::from(*rvdr.max_record) + 1,
        );
        Ok(Variable {
            name: rvdr.name,
            num: *rvdr.num,
            is_z: false,
            data_type,
            shaper,
            record_variance: rvdr.flags.variance,
            max_record: *rvdr.max_record,
            num_elements,
            vxr_vec: rvdr.vxr_vec,
            pad_value: rvdr.flags.has_padding.then_some(rvdr.pad_value),
            compression,
            blocking_factor: *rvdr.blocking_factor,
            endianness,
            reader,
            data_reader,
        })
    }

    /// Builds a `Variable` over a z-variable's descriptor record.
    /// # Errors
    /// Returns a [`CdfError`] if the variable's compression parameters can't be resolved.
    pub fn from_zvdr(
        zvdr: ZVariableDescriptorRecord,
        row_major: bool,
        endianness: Endian,
        reader: SharedReader,
    ) -> Result<Self, CdfError> {
        let data_type = DataType::try_from(*zvdr.data_type)?;
        let compression = resolve_compression(&reader, zvdr.flags.is_compressed, zvdr.cpr_spr_offset)?;
        let dim_sizes: Vec<i32> = zvdr.size_z_dims.iter().map(|s| **s).collect();
        let shaper = Shaper::new(data_type, dim_sizes, zvdr.dim_variances, row_major);
        let num_elements = *zvdr.num_elements;
        let data_reader = DataReader::new(
            data_type,
            shaper.raw_item_count() as i32 * num_elements.max(1),
            i64::from(*zvdr.max_record) + 1,
        );
        Ok(Variable {
            name: zvdr.name,
            num: *zvdr.num,
            is_z: true,
            data_type,
            shaper,
            record_variance: zvdr.flags.variance,
            max_record: *zvdr.max_record,
            num_elements,
            vxr_vec: zvdr.vxr_vec,
            pad_value: zvdr.flags.has_padding.then_some(zvdr.pad_value),
            compression,
            blocking_factor: *zvdr.blocking_factor,
            endianness,
            reader,
            data_reader,
        })
    }

    /// The variable's name.
    pub fn name(&self) -> &CdfString {
        &self.name
    }

    /// The variable's declared number (its index within its r- or z- list).
    pub fn num(&self) -> i32 {
        self.num
    }

    /// Whether this is a z-variable (as opposed to an r-variable).
    pub fn is_z_variable(&self) -> bool {
        self.is_z
    }

    /// The variable's element type.
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// The variable's dimension shaper.
    pub fn shaper(&self) -> &Shaper {
        &self.shaper
    }

    /// Whether this variable varies by record (`false` means every record reads the same,
    /// single stored value).
    pub fn record_variance(&self) -> bool {
        self.record_variance
    }

    /// The number of records this variable declares, counting from `maxRec + 1`.
    pub fn record_count(&self) -> i64 {
        i64::from(self.max_record) + 1
    }

    /// A short human-readable description of the variable, for diagnostics.
    pub fn summary(&self) -> String {
        format!(
            "{} ({:?}, {:?}, {} records)",
            self.name,
            self.data_type,
            self.shaper.shape_class(),
            self.record_count()
        )
    }

    /// Allocates a raw per-record work buffer suitable for passing to
    /// [`Self::read_shaped_record`], pre-filled with this variable's pad or default fill value.
    pub fn create_raw_value_array(&self) -> Vec<CdfType> {
        vec![self.fill_value(); self.shaper.raw_item_count()]
    }

    fn fill_value(&self) -> CdfType {
        self.pad_value
            .as_ref()
            .and_then(|v| v.first().cloned())
            .unwrap_or_else(|| self.data_type.default_fill())
    }

    /// Reads and shapes record `irec`, reusing `work` as scratch space.
    ///
    /// Implements the four-step resolution algorithm: non-record-varying variables always
    /// read record 0; records past `maxRec` are implicit and return the pad or fill value;
    /// otherwise the VXR chain is walked to find the VVR or CVVR holding `irec`'s bytes, which
    /// are read through a [`DataReader`] and shaped through this variable's [`Shaper`].
    /// # Errors
    /// Returns a [`CdfError`] if the VXR chain is malformed, decompression fails, or the
    /// underlying reader errors.
    pub fn read_shaped_record(
        &self,
        irec: i32,
        preserve_fixed_array: bool,
        work: &mut Vec<CdfType>,
    ) -> Result<ShapedValue, CdfError> {
        let r = if self.record_variance { irec } else { 0 };

        if work.len() != self.shaper.raw_item_count() {
            work.resize(self.shaper.raw_item_count(), self.fill_value());
        }

        if r > self.max_record {
            for slot in work.iter_mut() {
                *slot = self.fill_value();
            }
            return Ok(self.shaper.shape(work, preserve_fixed_array));
        }

        let raw = self.read_raw_record(r)?;
        match raw {
            Some(raw) => {
                let values = coalesce_chars(self.data_type, self.num_elements.max(1) as usize, raw);
                work.clear();
                work.extend(values);
            }
            None => {
                for slot in work.iter_mut() {
                    *slot = self.fill_value();
                }
            }
        }
        Ok(self.shaper.shape(work, preserve_fixed_array))
    }

    fn read_raw_record(&self, r: i32) -> Result<Option<Vec<CdfType>>, CdfError> {
        let mut guard = self
            .reader
            .lock()
            .map_err(|_| CdfError::Other("variable reader lock poisoned".to_string()))?;

        let Some((first, leaf)) = find_leaf(&mut *guard, &self.vxr_vec, r, 0)? else {
            return Ok(None);
        };

        let record_bytes = self.data_reader.num_elems() as usize * self.data_type.byte_width();
        let mut raw = self.data_reader.create_raw_value_array();

        match leaf {
            Leaf::Vvr(vvr) => {
                let offset = vvr.data_offset + u64::try_from(r - first)? * record_bytes as u64;
                self.data_reader.read_value(&mut guard, offset, &mut raw)?;
            }
            Leaf::Cvvr(cvvr) => {
                let kind = self.compression.clone().ok_or_else(|| {
                    CdfError::Format(
                        "Encountered a CVVR for a variable with no resolved compression type"
                            .to_string(),
                    )
                })?;
                let decompressed = compression::decompress(&kind, &cvvr.data)?;
                let start = usize::try_from(r - first)? * record_bytes;
                let end = start + record_bytes;
                if end > decompressed.len() {
                    return Err(CdfError::Format(format!(
                        "Decompressed CVVR block too short for record {r} ({end} > {})",
                        decompressed.len()
                    )));
                }
                let mut block_decoder = Decoder::new(io::Cursor::new(decompressed))?;
                block_decoder.context.set_endianness(self.endianness);
                self.data_reader
                    .read_value(&mut block_decoder, start as u64, &mut raw)?;
            }
        }
        Ok(Some(raw))
    }
}

/// Peeks the record type stored at `offset` without consuming it - the caller always re-seeks
/// to `offset` immediately afterwards to decode the record properly.
fn peek_record_type<R>(decoder: &mut Decoder<R>, offset: u64) -> Result<i32, CdfError>
where
    R: io::Read + io::Seek,
{
    decoder.reader.seek(SeekFrom::Start(offset))?;
    let header = read_record_header(decoder)?;
    decoder.reader.seek(SeekFrom::Start(offset))?;
    Ok(*header.record_type)
}

/// Walks a variable's (already-decoded) VXR chain looking for the entry covering record `r`.
/// VXR entries carry no explicit tag for what they point at, so a leaf offset is disambiguated
/// by peeking the record type actually stored there: a VVR, a CVVR, or (for a multi-level VXR
/// tree) a nested VXR the search then descends into.
fn find_leaf<R>(
    decoder: &mut Decoder<R>,
    chain: &[VariableIndexRecord],
    r: i32,
    depth: usize,
) -> Result<Option<(i32, Leaf)>, CdfError>
where
    R: io::Read + io::Seek,
{
    if depth > MAX_VXR_DEPTH {
        return Err(CdfError::Format(
            "VXR tree exceeded maximum nesting depth".to_string(),
        ));
    }

    for vxr in chain {
        let used = usize::try_from(*vxr.num_used_entries)?;
        for i in 0..used {
            let (Some(first), Some(last), Some(offset)) = (
                vxr.first.get(i).copied().flatten(),
                vxr.last.get(i).copied().flatten(),
                vxr.offset.get(i).copied().flatten(),
            ) else {
                continue;
            };
            if r < *first || r > *last {
                continue;
            }

            let off = u64::try_from(*offset)?;
            let tag = peek_record_type(decoder, off)?;
            return match tag {
                7 => Ok(Some((*first, Leaf::Vvr(VariableValuesRecord::decode_be(decoder)?)))),
                13 => Ok(Some((
                    *first,
                    Leaf::Cvvr(CompressedVariableValuesRecord::decode_be(decoder)?),
                ))),
                6 => {
                    let nested = VariableIndexRecord::decode_be(decoder)?;
                    find_leaf(decoder, std::slice::from_ref(&nested), r, depth + 1)
                }
                other => Err(CdfError::Format(format!(
                    "Unexpected record type {other} at VXR leaf offset {off}"
                ))),
            };
        }
    }
    Ok(None)
}

/// Resolves a variable's per-variable compression kind from its `cpr_spr_offset`, if it has
/// one and its VDR flags say it's compressed (as opposed to merely sparse, which points the
/// same field at an SPR instead).
fn resolve_compression(
    reader: &SharedReader,
    is_compressed: bool,
    cpr_spr_offset: Option<crate::types::CdfInt8>,
) -> Result<Option<CdfCompressionKind>, CdfError> {
    if !is_compressed {
        return Ok(None);
    }
    let Some(offset) = cpr_spr_offset else {
        return Ok(None);
    };
    let mut guard = reader
        .lock()
        .map_err(|_| CdfError::Other("variable reader lock poisoned".to_string()))?;
    guard.reader.seek(SeekFrom::Start(u64::try_from(*offset)?))?;
    let cpr = CompressedParametersRecord::decode_be(&mut *guard)?;
    Ok(Some(cpr.compression_type))
}

/// Coalesces consecutive runs of `num_elements` raw [`CdfType::Char`] values into a single
/// [`CdfType::String`] per value - mirroring what [`CdfType::decode_vec_be`] does for a bulk
/// read, except here the elements were decoded one at a time by [`DataReader`], which knows
/// nothing about string coalescing.
fn coalesce_chars(data_type: DataType, num_elements: usize, raw: Vec<CdfType>) -> Vec<CdfType> {
    if !data_type.is_char() || num_elements <= 1 {
        return raw;
    }
    raw.chunks(num_elements)
        .map(|chunk| {
            let chars: Vec<CdfChar> = chunk
                .iter()
                .filter_map(|v| match v {
                    CdfType::Char(c) => Some(c.clone()),
                    _ => None,
                })
                .collect();
            CdfType::String(CdfString::from_slice_chars(&chars))
        })
        .collect()
}
