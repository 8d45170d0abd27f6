/// Segment file naming templates
pub mod naming;

/// Inclusive byte ranges within output files
pub mod range;

/// MPEG-2 Transport Stream segmenting and muxing
pub mod ts;

pub use self::range::Range;
pub use self::ts::{SegmentInfo, TsMuxer};
