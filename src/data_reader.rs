//! Allocates correctly-typed raw buffers for one variable's records and fills them from a
//! decoder positioned at a record's byte offset. Pairs with [`crate::shaper::Shaper`], which
//! takes the raw buffer this module fills and arranges it into a shaped value.

use std::io::{self, SeekFrom};

use crate::decode::Decoder;
use crate::error::CdfError;
use crate::repr::Endian;
use crate::types::{decode_cdf_type_be, decode_cdf_type_le, CdfType, DataType};

/// Reads one record's worth of raw elements for a variable of a fixed `data_type`,
/// `num_elems` (elements per record), and `n_rec` (declared record count).
#[derive(Debug, Clone, Copy)]
pub struct DataReader {
    data_type: DataType,
    num_elems: i32,
    n_rec: i64,
}

impl DataReader {
    /// Builds a reader for a variable's declared element type, per-record element count, and
    /// record count.
    pub fn new(data_type: DataType, num_elems: i32, n_rec: i64) -> Self {
        DataReader {
            data_type,
            num_elems,
            n_rec,
        }
    }

    /// The element type this reader decodes.
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Number of raw elements stored per record.
    pub fn num_elems(&self) -> i32 {
        self.num_elems
    }

    /// Declared record count.
    pub fn n_rec(&self) -> i64 {
        self.n_rec
    }

    /// Allocates a raw per-record work buffer, pre-filled with `data_type`'s default fill
    /// value. The caller (typically a [`crate::variable::Variable`] implementation) reuses
    /// this buffer across records to avoid allocating on the hot path.
    pub fn create_raw_value_array(&self) -> Vec<CdfType> {
        let len = self.num_elems.max(0) as usize;
        let fill = self.data_type.default_fill();
        vec![fill; len]
    }

    /// Fills `array` with this reader's `num_elems` raw elements read from `offset` in
    /// `decoder`'s underlying reader. `array` must be at least [`Self::num_elems`] long;
    /// excess slots are left untouched.
    /// # Errors
    /// Returns a [`CdfError`] if the seek or any element decode fails.
    pub fn read_value<R>(
        &self,
        decoder: &mut Decoder<R>,
        offset: u64,
        array: &mut [CdfType],
    ) -> Result<(), CdfError>
    where
        R: io::Read + io::Seek,
    {
        decoder.reader.seek(SeekFrom::Start(offset))?;
        let endianness = decoder.context.get_endianness()?;
        let data_type = self.data_type as i32;
        let n = (self.num_elems.max(0) as usize).min(array.len());
        for slot in array.iter_mut().take(n) {
            *slot = match endianness {
                Endian::Big => decode_cdf_type_be(decoder, data_type)?,
                Endian::Little => decode_cdf_type_le(decoder, data_type)?,
            };
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repr::CdfEncoding;
    use std::io::Cursor;

    #[test]
    fn test_create_raw_value_array_fills_with_default() {
        let reader = DataReader::new(DataType::Int4, 3, 1);
        let array = reader.create_raw_value_array();
        assert_eq!(array.len(), 3);
        for v in array {
            match v {
                CdfType::Int4(i) => assert_eq!(i32::from(i), -2_147_483_648),
                other => panic!("unexpected fill variant: {other:?}"),
            }
        }
    }

    #[test]
    fn test_read_value_decodes_n_elements_at_offset() -> Result<(), CdfError> {
        let mut bytes = vec![0xffu8; 4]; // leading padding before the payload
        bytes.extend_from_slice(&10i32.to_be_bytes());
        bytes.extend_from_slice(&20i32.to_be_bytes());
        bytes.extend_from_slice(&30i32.to_be_bytes());

        let mut decoder = Decoder::new(Cursor::new(bytes))?;
        decoder.context.set_encoding(CdfEncoding::Network);
        decoder.context.set_endianness(Endian::Big);

        let reader = DataReader::new(DataType::Int4, 3, 1);
        let mut array = reader.create_raw_value_array();
        reader.read_value(&mut decoder, 4, &mut array)?;

        let got: Vec<i32> = array
            .into_iter()
            .map(|v| match v {
                CdfType::Int4(i) => i32::from(i),
                other => panic!("unexpected variant: {other:?}"),
            })
            .collect();
        assert_eq!(got, vec![10, 20, 30]);
        Ok(())
    }
}
