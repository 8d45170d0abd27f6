//! # MPEG Transport Stream (TS) segmenting
//!
//! This module turns the samples of one elementary stream into MPEG-2
//! Transport Stream segments suitable for HLS delivery.
//!
//! ## Core Features
//!
//! - **PES generation**: Annex B / ADTS framing and 90 kHz timestamps
//! - **TS packetization**: PAT/PMT per segment, PCR on key frames, stuffing
//! - **SAMPLE-AES signalling**: encrypted stream types and setup descriptors
//! - **HLS alignment**: 32-byte segment padding
//! - **Output modes**: one file per segment, or one file with byte ranges
//!
//! ## Example Usage
//!
//! ```rust
//! use vdkio_ts::av::{Codec, MediaSample, StreamInfo};
//! use vdkio_ts::config::MuxerOptions;
//! use vdkio_ts::file::memory;
//! use vdkio_ts::format::ts::{SegmentInfo, TsMuxer};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = MuxerOptions::new().with_segment_template("memory://doc/seg_$Number$.ts");
//! let mut muxer = TsMuxer::new(options);
//! muxer.add_stream(StreamInfo::audio(Codec::Mp3, 90000))?;
//! muxer.initialize()?;
//!
//! let sample = MediaSample::new(vec![0u8; 417])
//!     .with_timestamp(0)
//!     .with_duration(2160)
//!     .with_key_flag(true);
//! muxer.add_media_sample(&sample)?;
//! muxer.finalize_segment(&SegmentInfo {
//!     start_timestamp: 0,
//!     duration: 2160,
//!     ..Default::default()
//! })?;
//! muxer.finalize()?;
//!
//! let segment = memory::read_file("memory://doc/seg_2.ts").unwrap();
//! assert_eq!(segment.len() % 32, 0);
//! # Ok(())
//! # }
//! ```

/// HLS 32-byte alignment padding
pub mod hls;

/// One file per segment
pub mod multi_file;

/// Top-level muxer driving one stream
pub mod muxer;

/// PES packet encoding
pub mod pes;

/// Sample to PES conversion
pub mod pes_generator;

/// Program map table writers
pub mod pmt;

mod psi;

/// Segment lifecycle shared by both output modes
pub mod segmenter;

/// All segments in one file
pub mod single_file;

/// Core TS types and constants
pub mod types;

/// TS packetization of PSI and PES
pub mod writer;

// Re-export commonly used types and constants
pub use hls::{hls32_padding, PaddingPlan, PADDINGS};
pub use multi_file::MultiFileOutput;
pub use muxer::{MuxerState, SegmentInfo, TsMuxer};
pub use pes::PesPacket;
pub use pes_generator::PesPacketGenerator;
pub use pmt::{AudioProgramMapTableWriter, ProgramMapTableWriter, VideoProgramMapTableWriter};
pub use segmenter::{SegmentOutput, TsSegmenter};
pub use single_file::SingleFileOutput;
pub use types::{TSHeader, PID_ELEMENTARY, PID_NULL, PID_PAT, PID_PMT, TS_PACKET_SIZE, TS_TIMESCALE};
pub use writer::TsWriter;
