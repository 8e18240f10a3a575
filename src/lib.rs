//! A reader for NASA's Common Data Format (CDF), the self-describing binary container used
//! throughout space physics and heliophysics archives.
//!
//! The entry point is [`cdf::CdfReader::open`], which takes any `Read + Seek + Send` byte
//! source and returns a [`cdf::CdfContent`] exposing the file's variables and attributes:
//!
//! ```no_run
//! use std::fs::File;
//! use cdf_reader::cdf::CdfReader;
//!
//! let file = File::open("example.cdf").unwrap();
//! let content = CdfReader::open(file).unwrap();
//! for variable in content.variables() {
//!     println!("{}", variable.summary());
//! }
//! ```
//!
//! This crate only reads CDF files; it never writes them, and it only supports single-file
//! CDFs (the deprecated multi-file `.cdf`/`.v1`/`.v2`/... layout is rejected up front).

pub mod attribute;
pub mod cdf;
pub mod compression;
pub mod data_reader;
pub mod decode;
pub mod error;
pub mod record;
pub mod repr;
pub mod shaper;
pub mod types;
pub mod variable;

#[cfg(test)]
mod testutil;

pub use attribute::{GlobalAttribute, VariableAttribute};
pub use cdf::{CdfContent, CdfReader};
pub use error::CdfError;
pub use variable::Variable;

