//! # Utility Functions and Types
//!
//! - [`BitReader`] / [`BitWriter`] for headers with sub-byte fields
//! - [`Crc32Mpeg2`] for PSI section checksums
//! - [`SegmentBuffer`], the byte accumulator a segment is built in
//!
//! ```rust
//! use vdkio_ts::utils::Crc32Mpeg2;
//!
//! let crc = Crc32Mpeg2::calculate(&[0x01, 0x01]);
//! assert_eq!(crc, 0xD66FB816);
//! ```

/// Bit-level reading and writing
pub mod bits;

/// Segment byte accumulator
pub mod buffer;

/// CRC calculation for PSI tables
pub mod crc;

pub use bits::{BitReader, BitWriter};
pub use buffer::SegmentBuffer;
pub use crc::Crc32Mpeg2;
