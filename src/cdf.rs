//! Top-level orchestration: magic detection, optional whole-file decompression, and CDR/GDR
//! parsing. [`Cdf::decode_be`] is the low-level decode used directly by the record tests in
//! this crate; [`CdfReader::open`] is the public orchestrator that additionally builds the
//! [`CdfContent`] catalogue of variables and attributes, retaining a live reader so a
//! [`crate::variable::Variable`]'s data can be resolved lazily after `open` returns.

use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::sync::{Arc, Mutex};

use crate::attribute::{build_attributes, GlobalAttribute, VariableAttribute};
use crate::compression;
use crate::decode::{Decodable, Decoder};
use crate::error::CdfError;
use crate::record::ccr::CompressedCdfRecord;
use crate::record::cdr::CdfDescriptorRecord;
use crate::record::cpr::CompressedParametersRecord;
use crate::repr::FileVariant;
use crate::variable::Variable;

/// The whole decoded CDF file: the CDR, with the GDR (and everything it points to) embedded.
/// Used directly by unit tests that exercise one record's decoding in isolation; application
/// code should prefer [`CdfReader::open`].
#[derive(Debug)]
pub struct Cdf {
    /// The file's CDF Descriptor Record, with its embedded Global Descriptor Record.
    pub cdr: CdfDescriptorRecord,
}

impl Decodable for Cdf {
    fn decode_be<R>(decoder: &mut Decoder<R>) -> Result<Self, CdfError>
    where
        R: io::Read + io::Seek,
    {
        let variant = read_variant(decoder)?;
        decoder.context.set_variant(variant);

        if variant.is_compressed() {
            let (decompressed, _cpr) = decompress_whole_file(decoder)?;
            let mut inner = Decoder::new(Cursor::new(decompressed))?;
            inner.context.set_variant(variant);
            inner.reader.seek(SeekFrom::Start(8))?;
            let cdr = CdfDescriptorRecord::decode_be(&mut inner)?;
            reject_multi_file(&cdr)?;
            return Ok(Cdf { cdr });
        }

        let cdr = CdfDescriptorRecord::decode_be(decoder)?;
        reject_multi_file(&cdr)?;
        Ok(Cdf { cdr })
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

fn read_variant<R>(decoder: &mut Decoder<R>) -> Result<FileVariant, CdfError>
where
    R: io::Read + io::Seek,
{
    let mut magic = [0u8; 8];
    decoder.reader.read_exact(&mut magic)?;
    let m1 = u32::from_be_bytes([magic[0], magic[1], magic[2], magic[3]]);
    let m2 = u32::from_be_bytes([magic[4], magic[5], magic[6], magic[7]]);
    FileVariant::from_magic(m1, m2)
}

fn reject_multi_file(cdr: &CdfDescriptorRecord) -> Result<(), CdfError> {
    if !cdr.flags.single_file {
        return Err(CdfError::Format("Multi-file CDFs not supported".to_string()));
    }
    Ok(())
}

/// Parses the CCR at offset 8 and its CPR, decompresses the CCR payload, and prepends an
/// 8-byte zero prelude so that every offset recorded elsewhere in the file - which was
/// computed assuming the magic header occupies the first 8 bytes - still resolves correctly
/// against the returned buffer. This is the "padded compression" workaround: the magic bytes
/// are never actually present in the decompressed stream, only accounted for.
fn decompress_whole_file<R>(
    decoder: &mut Decoder<R>,
) -> Result<(Vec<u8>, CompressedParametersRecord), CdfError>
where
    R: io::Read + io::Seek,
{
    let ccr = CompressedCdfRecord::decode_be(decoder)?;
    decoder
        .reader
        .seek(SeekFrom::Start(u64::try_from(*ccr.cpr_offset)?))?;
    let cpr = CompressedParametersRecord::decode_be(decoder)?;
    let decompressed = compression::decompress(&cpr.compression_type, &ccr.data)?;

    let mut padded = Vec::with_capacity(decompressed.len() + 8);
    padded.resize(8, 0u8);
    padded.extend_from_slice(&decompressed);
    Ok((padded, cpr))
}

/// A random-access byte source a [`CdfReader`] can hold onto for the lifetime of the
/// [`CdfContent`] it produces, so that [`Variable`] reads can seek back into it lazily. Any
/// `Read + Seek + Send` type qualifies; the blanket impl below means callers never implement
/// this by hand.
pub trait RandomAccess: io::Read + io::Seek + Send {}
impl<T: io::Read + io::Seek + Send> RandomAccess for T {}

impl io::Read for Box<dyn RandomAccess> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read(buf)
    }
}

impl io::Seek for Box<dyn RandomAccess> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        (**self).seek(pos)
    }
}

/// A reader's shared handle into the (possibly decompressed) backing bytes, locked for the
/// duration of one seek-then-read so concurrent [`Variable::read_shaped_record`] calls from
/// multiple threads serialise against the single underlying source, per the concurrency model
/// in the design notes.
pub(crate) type SharedReader = Arc<Mutex<Decoder<Box<dyn RandomAccess>>>>;

/// The catalogue a [`CdfReader`] produces: every variable, every global attribute, and every
/// per-variable attribute found while walking the file's descriptor records.
pub struct CdfContent {
    variables: Vec<Variable>,
    global_attributes: Vec<GlobalAttribute>,
    variable_attributes: Vec<VariableAttribute>,
}

impl CdfContent {
    /// All variables declared in the file, r-variables followed by z-variables.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// All global-scoped attributes.
    pub fn global_attributes(&self) -> &[GlobalAttribute] {
        &self.global_attributes
    }

    /// All variable-scoped attributes.
    pub fn variable_attributes(&self) -> &[VariableAttribute] {
        &self.variable_attributes
    }
}

/// Top-level orchestrator: opens a random-access byte source and reads it into a
/// [`CdfContent`]. See spec.md §4.8 / the design notes for the parse sequence this follows.
pub struct CdfReader;

impl CdfReader {
    /// Reads `source` as a CDF file and returns its variable and attribute catalogue.
    ///
    /// The returned [`Variable`]s resolve their record data lazily against `source` (or, for a
    /// whole-file-compressed input, against the decompressed-and-repadded bytes produced
    /// during `open`) - no variable data is read here beyond the descriptor records
    /// themselves.
    /// # Errors
    /// Returns a [`CdfError`] if the magic bytes are unrecognised, the file is multi-file, any
    /// record fails its tag or field-level validation, or the underlying source errors.
    pub fn open<R>(source: R) -> Result<CdfContent, CdfError>
    where
        R: io::Read + io::Seek + Send + 'static,
    {
        let boxed: Box<dyn RandomAccess> = Box::new(source);
        let mut decoder = Decoder::new(boxed)?;

        let variant = read_variant(&mut decoder)?;
        decoder.context.set_variant(variant);

        let mut decoder = if variant.is_compressed() {
            let (padded, _cpr) = decompress_whole_file(&mut decoder)?;
            let boxed_inner: Box<dyn RandomAccess> = Box::new(Cursor::new(padded));
            let mut inner = Decoder::new(boxed_inner)?;
            inner.context.set_variant(variant);
            inner.reader.seek(SeekFrom::Start(8))?;
            inner
        } else {
            decoder
        };

        let cdr = CdfDescriptorRecord::decode_be(&mut decoder)?;
        reject_multi_file(&cdr)?;
        let endianness = decoder.context.get_endianness()?;

        let reader: SharedReader = Arc::new(Mutex::new(decoder));

        let row_major = cdr.flags.row_major;
        let r_dim_sizes: Vec<i32> = cdr.gdr.size_r_dims.iter().map(|s| **s).collect();

        let mut variables = Vec::with_capacity(cdr.gdr.rvdr_vec.len() + cdr.gdr.zvdr_vec.len());
        for rvdr in cdr.gdr.rvdr_vec {
            variables.push(Variable::from_rvdr(
                rvdr,
                r_dim_sizes.clone(),
                row_major,
                endianness,
                reader.clone(),
            )?);
        }
        for zvdr in cdr.gdr.zvdr_vec {
            variables.push(Variable::from_zvdr(zvdr, row_major, endianness, reader.clone())?);
        }

        let (global_attributes, variable_attributes) = build_attributes(cdr.gdr.adr_vec);

        Ok(CdfContent {
            variables,
            global_attributes,
            variable_attributes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{cdr_and_gdr_bytes, minimal_v3, minimal_v3_with_flags};
    use std::io::Cursor as StdCursor;

    #[test]
    fn test_open_minimal_v3_has_no_variables_or_attributes() -> Result<(), CdfError> {
        let content = CdfReader::open(StdCursor::new(minimal_v3()))?;
        assert!(content.variables().is_empty());
        assert!(content.global_attributes().is_empty());
        assert!(content.variable_attributes().is_empty());
        Ok(())
    }

    #[test]
    fn test_open_rejects_bad_magic() {
        let bytes = vec![0u8; 16];
        let err = CdfReader::open(StdCursor::new(bytes)).unwrap_err();
        match err {
            CdfError::Format(msg) => assert!(msg.contains("magic")),
            other => panic!("expected CdfError::Format, got {other:?}"),
        }
    }

    /// Scenario 6 from spec.md §8: a CDR with the single-file flag bit clear is rejected
    /// even though every other field parses fine.
    #[test]
    fn test_open_rejects_multi_file_cdf() {
        let bytes = minimal_v3_with_flags(1); // row_major set, single_file clear
        let err = CdfReader::open(StdCursor::new(bytes)).unwrap_err();
        match err {
            CdfError::Format(msg) => assert!(msg.contains("Multi-file")),
            other => panic!("expected CdfError::Format, got {other:?}"),
        }
    }

    /// Scenario 3 from spec.md §8: a whole-file-compressed CDF decompresses to the same
    /// catalogue as its uncompressed equivalent. Exercises the CCR/CPR parse and the
    /// "padded compression" workaround (decoder.rs/cdf.rs design notes): in-file offsets
    /// like the CDR's own `gdrOffset` are computed as if the 8-byte magic prelude were
    /// present in the decompressed stream, even though it never actually is.
    #[test]
    fn test_open_whole_file_gzip_compressed_matches_uncompressed() -> Result<(), CdfError> {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let payload = cdr_and_gdr_bytes(3);

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&payload).unwrap();
        let compressed = encoder.finish().unwrap();

        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0xcdf3_0001u32.to_be_bytes());
        bytes.extend_from_slice(&0xcccc_0001u32.to_be_bytes());

        let cpr_offset = 8 + 32 + compressed.len() as i64;
        bytes.extend_from_slice(&(32 + compressed.len() as i64).to_be_bytes()); // CCR record_size
        bytes.extend_from_slice(&10i32.to_be_bytes()); // CCR record_type
        bytes.extend_from_slice(&cpr_offset.to_be_bytes()); // cpr_offset
        bytes.extend_from_slice(&(payload.len() as i64).to_be_bytes()); // uncompressed_size
        bytes.extend_from_slice(&0i32.to_be_bytes()); // rfu_a
        bytes.extend_from_slice(&compressed);

        bytes.extend_from_slice(&28i64.to_be_bytes()); // CPR record_size
        bytes.extend_from_slice(&11i32.to_be_bytes()); // CPR record_type
        bytes.extend_from_slice(&5i32.to_be_bytes()); // compression_type = Gzip
        bytes.extend_from_slice(&0i32.to_be_bytes()); // compressed_parameter_count
        bytes.extend_from_slice(&0i32.to_be_bytes()); // rfu_a
        bytes.extend_from_slice(&6i32.to_be_bytes()); // compression_level

        let compressed_content = CdfReader::open(StdCursor::new(bytes))?;
        let uncompressed_content = CdfReader::open(StdCursor::new(minimal_v3()))?;

        assert_eq!(
            compressed_content.variables().len(),
            uncompressed_content.variables().len()
        );
        assert_eq!(
            compressed_content.global_attributes().len(),
            uncompressed_content.global_attributes().len()
        );
        Ok(())
    }
}
