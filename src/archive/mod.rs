//! ZIP archive parsing and extraction.
//!
//! ## Architecture
//!
//! - [`structures`]: Data structures representing ZIP format elements (EOCD, file headers, etc.)
//! - [`parser`]: Low-level parsing of ZIP structures from raw bytes
//! - [`extractor`]: Decompression and writing entries to disk
//!
//! ## ZIP Format Overview
//!
//! A ZIP file consists of:
//! 1. Local file headers and compressed data for each file
//! 2. Central Directory with metadata for all files
//! 3. End of Central Directory (EOCD) record at the end
//!
//! The EOCD is read first, then the Central Directory, then each selected
//! entry's local header and data.
//!
//! ## Supported Features
//!
//! - ZIP64 extensions for files > 4GB
//! - STORED and DEFLATE compression methods
//! - CRC-32 verification of extracted data
//! - Unix permission bits from the external attributes
//!
//! ## Limitations
//!
//! - No encryption support
//! - No multi-disk archive support

mod extractor;
mod parser;
mod structures;

pub use extractor::{ZipExtractor, create_dir};
pub use parser::ZipParser;
pub use structures::*;
