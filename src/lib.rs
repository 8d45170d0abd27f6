#![doc(html_root_url = "https://docs.rs/vdkio-ts/0.1.0")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

//! # vdkio-ts - MPEG-2 Transport Stream segmenter
//!
//! `vdkio-ts` packages one audio or video stream into MPEG-2 Transport
//! Stream segments for HTTP Live Streaming. Segments go either to one file
//! each, named from a template, or back to back into a single file whose
//! byte ranges are reported for byte-range playlists.
//!
//! ## Features
//!
//! ### Codec Support
//! - H.264/AVC and H.265/HEVC, avcC/hvcC samples converted to Annex B
//! - AAC with ADTS framing, AC-3, E-AC-3 and MP3
//!
//! ### Transport Stream
//! - PAT/PMT at the start of every segment
//! - PCR on key frames, per-PID continuity counters
//! - SAMPLE-AES program map tables once encryption is signalled
//! - HLS 32-byte alignment padding
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vdkio_ts::av::{Codec, MediaSample, StreamInfo};
//! use vdkio_ts::config::MuxerOptions;
//! use vdkio_ts::event::LoggingListener;
//! use vdkio_ts::format::ts::{SegmentInfo, TsMuxer};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = MuxerOptions::from_env().with_output_file_name("out.ts");
//!     let mut muxer = TsMuxer::new(options).with_listener(Arc::new(LoggingListener));
//!
//!     muxer.add_stream(StreamInfo::audio(Codec::Ac3, 48000))?;
//!     muxer.initialize()?;
//!
//!     let frame = vec![0x0B, 0x77, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
//!     for i in 0..10 {
//!         let sample = MediaSample::new(frame.clone())
//!             .with_timestamp(i * 1536)
//!             .with_duration(1536)
//!             .with_key_flag(true);
//!         muxer.add_media_sample(&sample)?;
//!     }
//!     muxer.finalize_segment(&SegmentInfo {
//!         start_timestamp: 0,
//!         duration: 15360,
//!         ..Default::default()
//!     })?;
//!     muxer.finalize()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - `av`: stream descriptions and media samples
//! - `codec`: AAC, H.264 and H.265 configuration parsing, Annex B conversion
//! - `config`: muxer options, with environment overrides
//! - `event`: muxer listener notifications
//! - `file`: local and in-memory output files
//! - `format`: segment naming, byte ranges and the TS muxer itself
//! - `error`: error kinds and the crate `Result`
//! - `utils`: bit writing, CRC and the segment buffer

/// Audio/Video base types
pub mod av;

/// Codec configuration parsing and payload conversion
pub mod codec;

/// Configuration module
pub mod config;

/// Error types and utilities
pub mod error;

/// Muxer event notifications
pub mod event;

/// Output file handles
pub mod file;

/// Media format implementations
pub mod format;

/// Common utilities and helper functions
pub mod utils;

pub use error::{Result, VdkError};
