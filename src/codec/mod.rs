/// AAC configuration and ADTS framing
pub mod aac;
/// Length-prefixed to Annex B conversion
pub mod annexb;
/// H.264 configuration records
pub mod h264;
/// H.265 configuration records
pub mod h265;

pub use annexb::{AnnexBConverter, DecoderConfigRecord, NalFlavor};
