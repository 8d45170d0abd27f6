use super::types::{write_timestamp, STREAM_ID_VIDEO};
use bytes::{BufMut, Bytes, BytesMut};

/// Fixed part of the PES header: start code, stream id, packet length,
/// two flag bytes and the header data length.
const PES_FIXED_HEADER_SIZE: usize = 9;
const TIMESTAMP_SIZE: usize = 5;

/// A Packetized Elementary Stream packet, timestamps in 90 kHz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PesPacket {
    /// PES stream id, e.g. 0xE0 for video.
    pub stream_id: u8,
    /// Presentation timestamp.
    pub pts: Option<i64>,
    /// Decode timestamp.
    pub dts: Option<i64>,
    /// Whether the payload starts a key frame.
    pub is_key_frame: bool,
    /// Elementary stream bytes.
    pub payload: Bytes,
}

impl PesPacket {
    /// A packet without timestamps.
    pub fn new(stream_id: u8, payload: impl Into<Bytes>) -> Self {
        Self {
            stream_id,
            pts: None,
            dts: None,
            is_key_frame: false,
            payload: payload.into(),
        }
    }

    /// Sets the presentation timestamp.
    pub fn with_pts(mut self, pts: i64) -> Self {
        self.pts = Some(pts);
        self
    }

    /// Sets the decode timestamp.
    pub fn with_dts(mut self, dts: i64) -> Self {
        self.dts = Some(dts);
        self
    }

    /// Marks the packet as a key frame.
    pub fn with_key_flag(mut self, is_key: bool) -> Self {
        self.is_key_frame = is_key;
        self
    }

    /// DTS when present, else PTS; the clock the PCR is derived from.
    pub fn decode_timestamp(&self) -> Option<i64> {
        self.dts.or(self.pts)
    }

    // A DTS equal to the PTS is redundant and left out.
    fn writes_dts(&self) -> bool {
        self.pts.is_some() && self.dts.is_some() && self.dts != self.pts
    }

    fn header_data_length(&self) -> usize {
        let mut n = 0;
        if self.pts.is_some() {
            n += TIMESTAMP_SIZE;
        }
        if self.writes_dts() {
            n += TIMESTAMP_SIZE;
        }
        n
    }

    /// Total encoded size in bytes.
    pub fn len(&self) -> usize {
        PES_FIXED_HEADER_SIZE + self.header_data_length() + self.payload.len()
    }

    /// True when there is no payload.
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Encodes the packet. Video and oversized packets use the unbounded
    /// (zero) PES_packet_length.
    pub fn write_to(&self, buf: &mut BytesMut) {
        buf.put_slice(&[0x00, 0x00, 0x01]);
        buf.put_u8(self.stream_id);

        let header_data_length = self.header_data_length();
        let packet_length = 3 + header_data_length + self.payload.len();
        if self.stream_id == STREAM_ID_VIDEO || packet_length > u16::MAX as usize {
            buf.put_u16(0);
        } else {
            buf.put_u16(packet_length as u16);
        }

        // '10' marker, no scrambling, data_alignment_indicator.
        buf.put_u8(0x84);

        let pts_dts_flags = match (self.pts.is_some(), self.writes_dts()) {
            (true, true) => 0xc0,
            (true, false) => 0x80,
            _ => 0x00,
        };
        buf.put_u8(pts_dts_flags);
        buf.put_u8(header_data_length as u8);

        if let Some(pts) = self.pts {
            let prefix = if self.writes_dts() { 0x3 } else { 0x2 };
            write_timestamp(buf, prefix, pts);
            if self.writes_dts() {
                if let Some(dts) = self.dts {
                    write_timestamp(buf, 0x1, dts);
                }
            }
        }

        buf.put_slice(&self.payload);
    }
}
