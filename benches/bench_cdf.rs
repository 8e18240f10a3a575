//! Benchmarks the two costs the crate's design notes call out explicitly: the one-time parse
//! of a file's full descriptor-record graph (`CdfReader::open`), and the per-record hot path
//! (`Variable::read_shaped_record`) that the concurrency model says should be allocation-free
//! when a caller reuses its own work buffer.
//!
//! No on-disk sample CDFs ship with this crate, so both benchmarks build a minimal, valid
//! single-variable v3 CDF in memory - the same shape of fixture the `record` module unit
//! tests use, just large enough in record count to be worth timing.

use std::io::Cursor;

use cdf_reader::cdf::CdfReader;
use criterion::{criterion_group, criterion_main, Criterion};

fn push_i32(buf: &mut Vec<u8>, v: i32) {
    buf.extend_from_slice(&v.to_be_bytes());
}

fn push_i64(buf: &mut Vec<u8>, v: i64) {
    buf.extend_from_slice(&v.to_be_bytes());
}

fn push_fixed_str(buf: &mut Vec<u8>, s: &str, width: usize) {
    let mut bytes = s.as_bytes().to_vec();
    bytes.resize(width, 0);
    buf.extend_from_slice(&bytes);
}

/// Builds a single-file, uncompressed v3 CDF with one scalar INT4 z-variable holding
/// `n_records` sequential values, stored in one VVR reachable through one VXR.
fn one_variable_cdf(n_records: i32) -> Vec<u8> {
    let mut buf = Vec::new();

    // Magic: CDF v3, uncompressed.
    buf.extend_from_slice(&0xcdf3_0001u32.to_be_bytes());
    buf.extend_from_slice(&0x0000_ffffu32.to_be_bytes());

    // CDR at offset 8, 312 bytes, gdr_offset = 320.
    push_i64(&mut buf, 312);
    push_i32(&mut buf, 1); // record_type
    push_i64(&mut buf, 320); // gdr_offset
    push_i32(&mut buf, 3); // version
    push_i32(&mut buf, 8); // release
    push_i32(&mut buf, 1); // encoding = Network
    push_i32(&mut buf, 3); // flags: row_major | single_file
    push_i32(&mut buf, 0); // rfu_a
    push_i32(&mut buf, 0); // rfu_b
    push_i32(&mut buf, 1); // increment
    push_i32(&mut buf, 0); // identifier
    push_i32(&mut buf, -1); // rfu_e
    push_fixed_str(&mut buf, "bench fixture", 256);

    // GDR at offset 320, 84 bytes: no r-variables, no attributes, one z-variable at 404.
    push_i64(&mut buf, 84);
    push_i32(&mut buf, 2); // record_type
    push_i64(&mut buf, 0); // rvdr_head
    push_i64(&mut buf, 404); // zvdr_head
    push_i64(&mut buf, 0); // adr_head
    push_i64(&mut buf, 0); // eof (unused by the reader)
    push_i32(&mut buf, 0); // num_rvars
    push_i32(&mut buf, 0); // num_attributes
    push_i32(&mut buf, -1); // max_rvar
    push_i32(&mut buf, 0); // num_r_dims
    push_i32(&mut buf, 1); // num_zvars
    push_i64(&mut buf, 0); // uir_head
    push_i32(&mut buf, 0); // rfu_c
    push_i32(&mut buf, 20_170_101); // date_last_leapsecond_update
    push_i32(&mut buf, -1); // rfu_e

    // ZVDR at offset 404, 348 bytes (0 dims, one scalar INT4 pad value), vxr_head at 752.
    push_i64(&mut buf, 348);
    push_i32(&mut buf, 8); // record_type
    push_i64(&mut buf, 0); // zvdr_next
    push_i32(&mut buf, 4); // data_type = Int4
    push_i32(&mut buf, n_records - 1); // max_record
    push_i64(&mut buf, 752); // vxr_head
    push_i64(&mut buf, 752); // vxr_tail
    push_i32(&mut buf, 1); // flags: variance
    push_i32(&mut buf, 0); // sparse_records
    push_i32(&mut buf, 0); // rfu_b
    push_i32(&mut buf, -1); // rfu_c
    push_i32(&mut buf, -1); // rfu_f
    push_i32(&mut buf, 1); // num_elements
    push_i32(&mut buf, 0); // num
    push_i64(&mut buf, -1); // cpr_spr_offset = none
    push_i32(&mut buf, 1); // blocking_factor
    push_fixed_str(&mut buf, "counter", 256);
    push_i32(&mut buf, 0); // num_z_dims
    push_i32(&mut buf, 0); // pad_value (Int4)

    // VXR at offset 752, 44 bytes: one entry covering [0, n_records - 1] at the VVR below.
    push_i64(&mut buf, 44);
    push_i32(&mut buf, 6); // record_type
    push_i64(&mut buf, 0); // vxr_next
    push_i32(&mut buf, 1); // num_entries
    push_i32(&mut buf, 1); // num_used_entries
    push_i32(&mut buf, 0); // first[0]
    push_i32(&mut buf, n_records - 1); // last[0]
    push_i64(&mut buf, 796); // offset[0]

    // VVR at offset 796: n_records sequential INT4 values.
    push_i64(&mut buf, 12 + i64::from(n_records) * 4);
    push_i32(&mut buf, 7); // record_type
    for i in 0..n_records {
        push_i32(&mut buf, i);
    }

    buf
}

fn criterion_benchmark(c: &mut Criterion) {
    let small = one_variable_cdf(10);
    c.bench_function("open_cdf_small", |b| {
        b.iter(|| CdfReader::open(Cursor::new(small.clone())).unwrap())
    });

    let large = one_variable_cdf(10_000);
    c.bench_function("open_cdf_many_records", |b| {
        b.iter(|| CdfReader::open(Cursor::new(large.clone())).unwrap())
    });

    let content = CdfReader::open(Cursor::new(large)).unwrap();
    let variable = &content.variables()[0];
    let mut work = variable.create_raw_value_array();
    c.bench_function("read_all_shaped_records", |b| {
        b.iter(|| {
            for irec in 0..variable.record_count() as i32 {
                variable.read_shaped_record(irec, false, &mut work).unwrap();
            }
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
