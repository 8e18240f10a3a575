#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{error::CdfError, types::CdfInt4};

/// Data Encodings used in CDF (from CDF specification Table 5.11). Floating-point representations
/// other than IEEE754 are not implemented and will raise an error.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Clone)]
pub enum CdfEncoding {
    /// In case the encoding is unspecified.  This will raise an error.
    Unspecified = 0,
    /// eXternal Data Representation
    Network = 1,
    /// Sun Representation
    Sun = 2,
    /// VAX Representation
    Vax = 3,
    /// DECStation Representation
    DecStation = 4,
    /// SGi Representation
    Sgi = 5,
    /// Intel Windows, Linux, MacOS Intel, Solaris Intel
    IbmPc = 6,
    /// IBM RS-6000 Representation
    IbmRs = 7,
    /// Macintosh Power PC Representation
    MacPpc = 9,
    /// HP 9000 Series Representation
    Hp = 11,
    /// NeXT Representation
    Next = 12,
    /// DEC Alpha/OSF1 Representation
    AlphaOsf1 = 13,
    /// DEC Alpha/Open VMS Representation (Double precision floats in D_FLOAT encoding)
    AlphaVmsD = 14,
    /// DEC Alpha/Open VMS Representation (Double precision floats in G_FLOAT encoding)
    AlphaVmsG = 15,
    /// DEC Alpha/Open VMS Representation (Single/Double precision floats in IEEE 754 encoding)
    AlphaVmsI = 16,
    /// ARM little-endian Representation
    ArmLittle = 17,
    /// ARM big-endian Representation
    ArmBig = 18,
    /// Itanium 64 on OpenVMS Representation (Single/Double precision floats in IEEE 754 encoding)
    Ia64VmsI = 19,
    /// Itanium 64 on OpenVMS Representation (Single/Double precision floats in Digital D_FLOAT
    /// encoding)
    Ia64VmsD = 20,
    /// Itanium 64 on OpenVMS Representation (Single/Double precision floats in Digital G_FLOAT
    /// encoding)
    Ia64VmsG = 21,
}

impl CdfEncoding {
    /// Returns the endianness associated with this CDF data encoding.
    /// # Errors
    /// Returns a [`CdfError`] if the CDF encoding is invalid.
    pub fn get_endian(&self) -> Result<Endian, CdfError> {
        match &self {
            CdfEncoding::Network
            | CdfEncoding::Sun
            | CdfEncoding::Next
            | CdfEncoding::MacPpc
            | CdfEncoding::Sgi
            | CdfEncoding::IbmRs
            | CdfEncoding::ArmBig => Ok(Endian::Big),

            CdfEncoding::DecStation
            | CdfEncoding::IbmPc
            | CdfEncoding::AlphaOsf1
            | CdfEncoding::AlphaVmsI
            | CdfEncoding::ArmLittle
            | CdfEncoding::Ia64VmsI => Ok(Endian::Little),

            CdfEncoding::Unspecified => Err(CdfError::Decode(
                "A valid CDF encoding is not read in or is unspecified.".to_string(),
            )),

            _ => Err(CdfError::Decode(format!(
                "Encoding {self:?} not implemented."
            ))),
        }
    }
}

impl TryFrom<CdfInt4> for CdfEncoding {
    type Error = CdfError;
    fn try_from(value: CdfInt4) -> Result<Self, CdfError> {
        let value: i32 = value.into();
        match value {
            0 => Ok(CdfEncoding::Unspecified),
            1 => Ok(CdfEncoding::Network),
            2 => Ok(CdfEncoding::Sun),
            3 => Ok(CdfEncoding::Vax),
            4 => Ok(CdfEncoding::DecStation),
            5 => Ok(CdfEncoding::Sgi),
            6 => Ok(CdfEncoding::IbmPc),
            7 => Ok(CdfEncoding::IbmRs),
            9 => Ok(CdfEncoding::MacPpc),
            11 => Ok(CdfEncoding::Hp),
            12 => Ok(CdfEncoding::Next),
            13 => Ok(CdfEncoding::AlphaOsf1),
            14 => Ok(CdfEncoding::AlphaVmsD),
            15 => Ok(CdfEncoding::AlphaVmsG),
            16 => Ok(CdfEncoding::AlphaVmsI),
            17 => Ok(CdfEncoding::ArmLittle),
            18 => Ok(CdfEncoding::ArmBig),
            19 => Ok(CdfEncoding::Ia64VmsI),
            20 => Ok(CdfEncoding::Ia64VmsD),
            21 => Ok(CdfEncoding::Ia64VmsG),
            v => Err(CdfError::Decode(format!("Invalid encoding integer - {v}."))),
        }
    }
}

/// Enum to handle different endianess.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    /// Big-Endian
    Big,
    /// Little-Endian
    Little,
}

/// Stores the version of the CDF in a simple implementation of semantic versioning.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CdfVersion {
    /// Major version
    pub major: u16,
    /// Minor version
    pub minor: u16,
    /// Patch version
    pub patch: u16,
}

impl CdfVersion {
    /// Create a new instance of this struct using user-defined values.
    pub fn new(major: u16, minor: u16, patch: u16) -> Self {
        CdfVersion {
            major,
            minor,
            patch,
        }
    }
}

impl std::fmt::Display for CdfVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// The two 32-bit big-endian words at file offset 0 identify which generation of the CDF
/// on-disk layout the rest of the file follows. This governs the width of file offsets (32-
/// vs 64-bit), the width of the fixed-size name fields (64 vs 256 chars), and whether the
/// bulk of the file is whole-file compressed.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileVariant {
    /// CDF v3.x: 64-bit offsets, 256-char names.
    V3 {
        /// Whether the bulk of the file (everything after the CCR header) is compressed.
        compressed: bool,
    },
    /// CDF v2.6/v2.7: 32-bit offsets, 64-char names.
    V26 {
        /// Whether the bulk of the file (everything after the CCR header) is compressed.
        compressed: bool,
    },
    /// Pre-v2.6. Accepted where its layout coincides with v2.6 (32-bit offsets, 64-char
    /// names); see the open question in the design notes about the name-field width.
    PreV26,
}

impl FileVariant {
    /// Whether file offsets in this variant are stored as 8-byte (true) or 4-byte (false)
    /// integers.
    pub fn offsets_are_64bit(self) -> bool {
        matches!(self, FileVariant::V3 { .. })
    }

    /// Width, in bytes, of a fixed-size name field (VDR/ADR names).
    pub fn name_width(self) -> usize {
        match self {
            FileVariant::V3 { .. } => 256,
            FileVariant::V26 { .. } | FileVariant::PreV26 => 64,
        }
    }

    /// Whether the bulk of the file is whole-file compressed (a CCR sits at offset 8).
    pub fn is_compressed(self) -> bool {
        match self {
            FileVariant::V3 { compressed } | FileVariant::V26 { compressed } => compressed,
            FileVariant::PreV26 => false,
        }
    }

    /// Decode the two leading big-endian magic words into a [`FileVariant`].
    /// # Errors
    /// Returns [`CdfError::Format`] if the combination of `m1`/`m2` is not a known variant.
    pub fn from_magic(m1: u32, m2: u32) -> Result<Self, CdfError> {
        match (m1, m2) {
            (0xcdf3_0001, 0x0000_ffff) => Ok(FileVariant::V3 { compressed: false }),
            (0xcdf3_0001, 0xcccc_0001) => Ok(FileVariant::V3 { compressed: true }),
            (0xcdf2_6002, 0x0000_ffff) => Ok(FileVariant::V26 { compressed: false }),
            (0xcdf2_6002, 0xcccc_0001) => Ok(FileVariant::V26 { compressed: true }),
            (0x0000_ffff, 0x0000_ffff) => Ok(FileVariant::PreV26),
            _ => Err(CdfError::Format(format!(
                "Unrecognized CDF magic bytes - {m1:08x} {m2:08x}"
            ))),
        }
    }
}

/// Returns whether the first 8 bytes of a file look like a recognized CDF magic header,
/// without otherwise attempting to parse the file.
pub fn is_magic(bytes: &[u8; 8]) -> bool {
    let m1 = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let m2 = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    FileVariant::from_magic(m1, m2).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every row of the variant table in spec.md §3.
    #[test]
    fn test_from_magic_covers_every_known_variant() {
        assert_eq!(
            FileVariant::from_magic(0xcdf3_0001, 0x0000_ffff).unwrap(),
            FileVariant::V3 { compressed: false }
        );
        assert_eq!(
            FileVariant::from_magic(0xcdf3_0001, 0xcccc_0001).unwrap(),
            FileVariant::V3 { compressed: true }
        );
        assert_eq!(
            FileVariant::from_magic(0xcdf2_6002, 0x0000_ffff).unwrap(),
            FileVariant::V26 { compressed: false }
        );
        assert_eq!(
            FileVariant::from_magic(0xcdf2_6002, 0xcccc_0001).unwrap(),
            FileVariant::V26 { compressed: true }
        );
        assert_eq!(
            FileVariant::from_magic(0x0000_ffff, 0x0000_ffff).unwrap(),
            FileVariant::PreV26
        );
    }

    #[test]
    fn test_from_magic_rejects_unknown_combination() {
        assert!(FileVariant::from_magic(0x1234_5678, 0x0000_ffff).is_err());
    }

    #[test]
    fn test_offset_and_name_widths_follow_variant() {
        assert!(FileVariant::V3 { compressed: false }.offsets_are_64bit());
        assert_eq!(FileVariant::V3 { compressed: false }.name_width(), 256);
        assert!(!FileVariant::V26 { compressed: false }.offsets_are_64bit());
        assert_eq!(FileVariant::V26 { compressed: false }.name_width(), 64);
        assert!(!FileVariant::PreV26.offsets_are_64bit());
        assert_eq!(FileVariant::PreV26.name_width(), 64);
    }

    #[test]
    fn test_is_magic_matches_from_magic() {
        let mut bytes = [0u8; 8];
        bytes[..4].copy_from_slice(&0xcdf3_0001u32.to_be_bytes());
        bytes[4..].copy_from_slice(&0x0000_ffffu32.to_be_bytes());
        assert!(is_magic(&bytes));

        assert!(!is_magic(&[0u8; 8]));
    }

    /// Idempotence property from spec.md §8: detecting, then re-detecting the same bytes
    /// gives the same answer.
    #[test]
    fn test_is_magic_is_idempotent() {
        let mut bytes = [0u8; 8];
        bytes[..4].copy_from_slice(&0xcdf2_6002u32.to_be_bytes());
        bytes[4..].copy_from_slice(&0xcccc_0001u32.to_be_bytes());
        assert_eq!(is_magic(&bytes), is_magic(&bytes));
        assert!(is_magic(&bytes));
    }
}
