//! AAC AudioSpecificConfig parsing and ADTS framing.

/// AudioSpecificConfig parsing
pub mod parser;
/// ADTS header and config types
pub mod types;

pub use parser::parse_audio_specific_config;
pub use types::{ADTSHeader, AudioSpecificConfig, ADTS_HEADER_SIZE, ADTS_MAX_FRAME_LENGTH, SAMPLE_RATES};
