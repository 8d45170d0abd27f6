use super::types::{AudioSpecificConfig, SAMPLE_RATES};
use crate::utils::BitReader;
use crate::{Result, VdkError};

/// Parses the leading fields of an AudioSpecificConfig (ISO/IEC 14496-3).
pub fn parse_audio_specific_config(data: &[u8]) -> Result<AudioSpecificConfig> {
    if data.len() < 2 {
        return Err(VdkError::muxer(format!(
            "AudioSpecificConfig too short: {} bytes",
            data.len()
        )));
    }
    let mut reader = BitReader::new(data);

    let mut audio_object_type = reader.read_bits(5)? as u8;
    if audio_object_type == 31 {
        audio_object_type = 32 + reader.read_bits(6)? as u8;
    }

    let sampling_frequency_index = reader.read_bits(4)? as u8;
    let sampling_frequency = if sampling_frequency_index == 0x0F {
        reader.read_bits(24)?
    } else {
        *SAMPLE_RATES
            .get(sampling_frequency_index as usize)
            .ok_or_else(|| {
                VdkError::muxer(format!(
                    "Invalid AAC sampling frequency index {}",
                    sampling_frequency_index
                ))
            })?
    };

    let channel_configuration = reader.read_bits(4)? as u8;

    Ok(AudioSpecificConfig {
        audio_object_type,
        sampling_frequency_index,
        sampling_frequency,
        channel_configuration,
    })
}
