use crate::error::{Result, VdkError};
use bytes::{BufMut, Bytes, BytesMut};

const START_CODE: [u8; 4] = [0x00, 0x00, 0x00, 0x01];

/// NAL unit flavour, which decides header layout and AUD bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NalFlavor {
    /// One-byte NAL header.
    H264,
    /// Two-byte NAL header.
    H265,
}

impl NalFlavor {
    fn nal_type(&self, nalu: &[u8]) -> u8 {
        match self {
            NalFlavor::H264 => nalu[0] & 0x1F,
            NalFlavor::H265 => (nalu[0] >> 1) & 0x3F,
        }
    }

    fn is_aud(&self, nal_type: u8) -> bool {
        match self {
            NalFlavor::H264 => nal_type == super::h264::NAL_AUD,
            NalFlavor::H265 => nal_type == super::h265::NAL_AUD,
        }
    }

    fn is_parameter_set(&self, nal_type: u8) -> bool {
        match self {
            NalFlavor::H264 => {
                nal_type == super::h264::NAL_SPS || nal_type == super::h264::NAL_PPS
            }
            NalFlavor::H265 => (super::h265::NAL_VPS..=super::h265::NAL_PPS).contains(&nal_type),
        }
    }

    fn access_unit_delimiter(&self) -> &'static [u8] {
        match self {
            // primary_pic_type 7: any slice type.
            NalFlavor::H264 => &[0x09, 0xF0],
            // pic_type 2, nuh_temporal_id_plus1 1.
            NalFlavor::H265 => &[0x46, 0x01, 0x50],
        }
    }
}

/// Fields of an avcC / hvcC record needed for Annex B conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecoderConfigRecord {
    /// Size of the big-endian length prefix: 1, 2 or 4.
    pub nalu_length_size: u8,
    /// SPS/PPS (and VPS) NAL units, in record order.
    pub parameter_sets: Vec<Bytes>,
}

/// Rewrites length-prefixed NAL units into an Annex B byte stream, leading
/// with an access unit delimiter and repeating parameter sets on key frames.
#[derive(Debug, Clone)]
pub struct AnnexBConverter {
    flavor: NalFlavor,
    config: DecoderConfigRecord,
}

impl AnnexBConverter {
    /// Fails on an unsupported NAL length size.
    pub fn new(flavor: NalFlavor, config: DecoderConfigRecord) -> Result<Self> {
        if !matches!(config.nalu_length_size, 1 | 2 | 4) {
            return Err(VdkError::muxer(format!(
                "Invalid NAL unit length size {}",
                config.nalu_length_size
            )));
        }
        Ok(Self { flavor, config })
    }

    /// Converts one sample. Fails when a length prefix overruns the sample.
    pub fn convert(&self, sample: &[u8], is_key_frame: bool) -> Result<Bytes> {
        let nalus = self.split(sample)?;
        let has_parameter_sets = nalus
            .iter()
            .any(|n| self.flavor.is_parameter_set(self.flavor.nal_type(n)));

        let mut out = BytesMut::with_capacity(sample.len() + 64);
        out.put_slice(&START_CODE);
        out.put_slice(self.flavor.access_unit_delimiter());

        if is_key_frame && !has_parameter_sets {
            for ps in &self.config.parameter_sets {
                out.put_slice(&START_CODE);
                out.put_slice(ps);
            }
        }

        for nalu in nalus {
            if self.flavor.is_aud(self.flavor.nal_type(nalu)) {
                continue;
            }
            out.put_slice(&START_CODE);
            out.put_slice(nalu);
        }
        Ok(out.freeze())
    }

    fn split<'a>(&self, mut data: &'a [u8]) -> Result<Vec<&'a [u8]>> {
        let len_size = self.config.nalu_length_size as usize;
        let mut nalus = Vec::new();
        while !data.is_empty() {
            if data.len() < len_size {
                return Err(VdkError::muxer("Truncated NAL unit length"));
            }
            let len = data[..len_size]
                .iter()
                .fold(0usize, |acc, &b| (acc << 8) | b as usize);
            data = &data[len_size..];
            if len == 0 || len > data.len() {
                return Err(VdkError::muxer(format!(
                    "Invalid NAL unit size {} with {} bytes left",
                    len,
                    data.len()
                )));
            }
            nalus.push(&data[..len]);
            data = &data[len..];
        }
        Ok(nalus)
    }
}
