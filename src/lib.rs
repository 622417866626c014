//! Reading, validating and writing VCF text.
//!
//! The core works on lines: a [`HeaderSource`] supplies the header, a
//! [`LineSource`] the data lines, and a [`LineSink`] takes what a [`Writer`]
//! emits. [`TextSource`] and [`TextSink`] cover plain text; the [`bcftools`]
//! module covers compressed VCF and BCF through the external tool.

pub mod bcftools;
pub mod body;
pub mod error;
pub mod genotype;
pub mod header;
pub mod parser;

pub use body::{Variant, VariantType};
pub use error::{Error, Result};
pub use genotype::Genotype;
pub use header::{Header, HeaderLine};
pub use parser::{
    check_variant, HeaderSource, LineSink, LineSource, Records, Scanner, TextSink, TextSource,
    Writer,
};
