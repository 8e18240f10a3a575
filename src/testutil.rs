//! In-memory CDF byte fixtures shared by unit tests across `record` modules.
//!
//! The upstream test suite this crate's structure is modeled on exercises real sample CDF
//! files checked into the repository (`test_alltypes.cdf`, `ulysses.cdf`). Those binary
//! fixtures aren't available here, so tests build minimal valid byte sequences in memory
//! instead and decode them directly off a `Cursor`.
#![cfg(test)]

pub(crate) fn push_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_be_bytes());
}

pub(crate) fn push_i32(buf: &mut Vec<u8>, v: i32) {
    buf.extend_from_slice(&v.to_be_bytes());
}

pub(crate) fn push_i64(buf: &mut Vec<u8>, v: i64) {
    buf.extend_from_slice(&v.to_be_bytes());
}

pub(crate) fn push_fixed_str(buf: &mut Vec<u8>, s: &str, width: usize) {
    let mut bytes = s.as_bytes().to_vec();
    assert!(bytes.len() < width);
    bytes.resize(width, 0);
    buf.extend_from_slice(&bytes);
}

/// A minimal valid CDF v3, uncompressed, single-file container: magic header, a CDR
/// declaring version 3.8.1 / Network encoding, and a GDR with no variables, attributes, or
/// unused records. `Cdf::decode_be` over this buffer succeeds and produces an empty
/// variable/attribute universe - it exists so the record-walking scaffolding (CDR embeds
/// GDR directly, with no seek in between) has something to decode without a file on disk.
pub(crate) fn minimal_v3() -> Vec<u8> {
    minimal_v3_with_flags(3)
}

/// Same shape as [`minimal_v3`], but with a caller-supplied CDR `flags` word - used to build
/// e.g. a multi-file-flagged (non-single-file) variant for rejection tests.
pub(crate) fn minimal_v3_with_flags(flags: i32) -> Vec<u8> {
    let mut buf = Vec::new();

    // Magic: CDF v3, uncompressed.
    push_u32(&mut buf, 0xcdf3_0001);
    push_u32(&mut buf, 0x0000_ffff);
    buf.extend_from_slice(&cdr_and_gdr_bytes(flags));
    buf
}

/// The CDR+GDR byte sequence that follows the 8-byte magic header in [`minimal_v3`] - factored
/// out so whole-file-compressed test fixtures can compress exactly this payload and wrap it in
/// a CCR/CPR pair, per the "padded compression" scheme ([`crate::cdf`]'s design notes).
pub(crate) fn cdr_and_gdr_bytes(flags: i32) -> Vec<u8> {
    let mut buf = Vec::new();

    // CDR - fixed-size fields total 312 bytes.
    push_i64(&mut buf, 312); // record_size
    push_i32(&mut buf, 1); // record_type
    push_i64(&mut buf, 320); // gdr_offset (8 magic + 312 CDR)
    push_i32(&mut buf, 3); // version
    push_i32(&mut buf, 8); // release
    push_i32(&mut buf, 1); // encoding = Network
    push_i32(&mut buf, flags);
    push_i32(&mut buf, 0); // rfu_a
    push_i32(&mut buf, 0); // rfu_b
    push_i32(&mut buf, 1); // increment
    push_i32(&mut buf, 0); // identifier
    push_i32(&mut buf, -1); // rfu_e
    push_fixed_str(&mut buf, "Test copyright.", 256);

    // GDR - fixed-size fields total 84 bytes (num_r_dims=0, no size_r_dims entries).
    push_i64(&mut buf, 84); // record_size
    push_i32(&mut buf, 2); // record_type
    push_i64(&mut buf, 0); // rvdr_head
    push_i64(&mut buf, 0); // zvdr_head
    push_i64(&mut buf, 0); // adr_head
    push_i64(&mut buf, 404); // eof (8 + 312 + 84)
    push_i32(&mut buf, 0); // num_rvars
    push_i32(&mut buf, 0); // num_attributes
    push_i32(&mut buf, -1); // max_rvar
    push_i32(&mut buf, 0); // num_r_dims
    push_i32(&mut buf, 0); // num_zvars
    push_i64(&mut buf, 0); // uir_head
    push_i32(&mut buf, 0); // rfu_c
    push_i32(&mut buf, 20_170_101); // date_last_leapsecond_update
    push_i32(&mut buf, -1); // rfu_e

    buf
}
