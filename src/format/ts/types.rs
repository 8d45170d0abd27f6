use bytes::{BufMut, BytesMut};

// Stream IDs
/// First video stream.
pub const STREAM_ID_VIDEO: u8 = 0xe0;
/// First MPEG audio stream.
pub const STREAM_ID_AUDIO: u8 = 0xc0;
/// Private stream 1, carrying AC-3 and E-AC-3.
pub const STREAM_ID_PRIVATE_1: u8 = 0xbd;

// PIDs
/// Program association table.
pub const PID_PAT: u16 = 0x0000;
/// Program map table.
pub const PID_PMT: u16 = 0x0020;
/// The single elementary stream.
pub const PID_ELEMENTARY: u16 = 0x0050;
/// Null packets.
pub const PID_NULL: u16 = 0x1fff;

// Table IDs
/// program_association_section.
pub const TABLE_ID_PAT: u8 = 0x00;
/// TS_program_map_section.
pub const TABLE_ID_PMT: u8 = 0x02;
/// The only program.
pub const PROGRAM_NUMBER: u16 = 1;
/// transport_stream_id of the PAT.
pub const TRANSPORT_STREAM_ID: u16 = 1;

// Elementary stream types, clear
/// MPEG-1 audio, used for MP3.
pub const STREAM_TYPE_MPEG1_AUDIO: u8 = 0x03;
/// AAC with ADTS transport syntax.
pub const STREAM_TYPE_AAC: u8 = 0x0f;
/// H.264.
pub const STREAM_TYPE_H264: u8 = 0x1b;
/// H.265.
pub const STREAM_TYPE_H265: u8 = 0x24;
/// AC-3 (ATSC).
pub const STREAM_TYPE_AC3: u8 = 0x81;
/// E-AC-3 (ATSC).
pub const STREAM_TYPE_EAC3: u8 = 0x87;

// Elementary stream types, SAMPLE-AES
/// SAMPLE-AES AC-3.
pub const STREAM_TYPE_ENCRYPTED_AC3: u8 = 0xc1;
/// SAMPLE-AES E-AC-3.
pub const STREAM_TYPE_ENCRYPTED_EAC3: u8 = 0xc2;
/// SAMPLE-AES AAC.
pub const STREAM_TYPE_ENCRYPTED_AAC: u8 = 0xcf;
/// SAMPLE-AES H.264.
pub const STREAM_TYPE_ENCRYPTED_H264: u8 = 0xdb;

// Descriptor tags
/// registration_descriptor.
pub const DESCRIPTOR_TAG_REGISTRATION: u8 = 0x05;
/// private_data_indicator_descriptor.
pub const DESCRIPTOR_TAG_PRIVATE_DATA_INDICATOR: u8 = 0x0f;

// Constants
/// Size of every TS packet.
pub const TS_PACKET_SIZE: usize = 188;
/// TS header without adaptation field.
pub const TS_HEADER_SIZE: usize = 4;
/// Payload bytes of a packet with no adaptation field.
pub const TS_MAX_PAYLOAD_SIZE: usize = TS_PACKET_SIZE - TS_HEADER_SIZE;
/// First byte of every packet.
pub const SYNC_BYTE: u8 = 0x47;
/// Adaptation field and section stuffing.
pub const STUFFING_BYTE: u8 = 0xff;
/// Ticks per second of every timestamp in the transport stream.
pub const TS_TIMESCALE: u32 = 90_000;
/// Encoded PCR length.
pub const PCR_FIELD_SIZE: usize = 6;

const TIMESTAMP_MASK: u64 = 0x1_FFFF_FFFF;

/// The 4-byte transport packet header.
#[derive(Debug, Default)]
pub struct TSHeader {
    /// A PES packet or PSI section starts in this packet.
    pub payload_unit_start: bool,
    /// 13-bit packet identifier.
    pub pid: u16,
    /// An adaptation field follows the header.
    pub adaptation_field_exists: bool,
    /// The packet carries payload.
    pub contains_payload: bool,
    /// 4-bit per-PID counter.
    pub continuity_counter: u8,
}

impl TSHeader {
    /// Appends the header to `buf`.
    pub fn write_to(&self, buf: &mut BytesMut) {
        buf.put_u8(SYNC_BYTE);

        let mut b1 = ((self.pid >> 8) & 0x1f) as u8;
        if self.payload_unit_start {
            b1 |= 0x40;
        }
        buf.put_u8(b1);
        buf.put_u8((self.pid & 0xff) as u8);

        let mut b3 = self.continuity_counter & 0x0f;
        if self.adaptation_field_exists {
            b3 |= 0x20;
        }
        if self.contains_payload {
            b3 |= 0x10;
        }
        buf.put_u8(b3);
    }
}

/// 4-bit per-PID continuity counter.
#[derive(Debug, Default, Clone)]
pub struct ContinuityCounter {
    counter: u8,
}

impl ContinuityCounter {
    /// A counter starting at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current value and advances.
    pub fn next(&mut self) -> u8 {
        let current = self.counter;
        self.counter = (self.counter + 1) & 0x0f;
        current
    }
}

/// Writes a 33-bit PCR base (extension 0) in its 6-byte adaptation field form.
pub fn write_pcr(buf: &mut BytesMut, pcr_base: i64) {
    let base = pcr_base as u64 & TIMESTAMP_MASK;
    buf.put_u8((base >> 25) as u8);
    buf.put_u8((base >> 17) as u8);
    buf.put_u8((base >> 9) as u8);
    buf.put_u8((base >> 1) as u8);
    buf.put_u8((((base & 0x01) << 7) as u8) | 0x7e);
    buf.put_u8(0x00);
}

/// Writes a PES PTS/DTS field: 4-bit prefix, 33-bit value and marker bits.
pub fn write_timestamp(buf: &mut BytesMut, prefix: u8, ts: i64) {
    let ts = ts as u64 & TIMESTAMP_MASK;
    buf.put_u8((prefix << 4) | (((ts >> 29) & 0x0e) as u8) | 0x01);
    buf.put_u16((((ts >> 14) & 0xfffe) | 0x01) as u16);
    buf.put_u16((((ts << 1) & 0xfffe) | 0x01) as u16);
}
