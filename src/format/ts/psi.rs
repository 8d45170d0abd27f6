use super::types::{ContinuityCounter, TSHeader, STUFFING_BYTE, TS_HEADER_SIZE, TS_PACKET_SIZE};
use crate::error::{Result, VdkError};
use crate::utils::{Crc32Mpeg2, SegmentBuffer};
use bytes::{BufMut, BytesMut};

/// Bytes between the section_length field and the section body.
const SECTION_HEADER_AFTER_LENGTH: usize = 5;
const CRC_SIZE: usize = 4;
/// Pointer field plus table_id and section_length.
const SECTION_PREFIX_SIZE: usize = 4;

/// Builds a long-form PSI section (PAT/PMT) including its trailing CRC.
pub(crate) fn psi_section(table_id: u8, table_id_extension: u16, version: u8, body: &[u8]) -> BytesMut {
    let section_length = SECTION_HEADER_AFTER_LENGTH + body.len() + CRC_SIZE;
    let mut section = BytesMut::with_capacity(3 + section_length);

    // Table ID
    section.put_u8(table_id);
    // section_syntax_indicator, '0', reserved, section_length
    section.put_u16(0xB000 | (section_length as u16 & 0x03FF));
    section.put_u16(table_id_extension);
    // Reserved, version, current_next_indicator
    section.put_u8(0xC1 | ((version & 0x1F) << 1));
    // Section number and last section number
    section.put_u8(0);
    section.put_u8(0);
    section.put_slice(body);

    let crc = Crc32Mpeg2::calculate(&section);
    section.put_u32(crc);
    section
}

/// Wraps a PSI section in a single TS packet and appends it to `buffer`.
pub(crate) fn write_psi_packet(
    pid: u16,
    section: &[u8],
    continuity_counter: &mut ContinuityCounter,
    buffer: &mut SegmentBuffer,
) -> Result<()> {
    if section.len() + 1 > TS_PACKET_SIZE - TS_HEADER_SIZE {
        return Err(VdkError::muxer(format!(
            "PSI section of {} bytes does not fit in one TS packet.",
            section.len()
        )));
    }

    let mut packet = BytesMut::with_capacity(TS_PACKET_SIZE);
    TSHeader {
        payload_unit_start: true,
        pid,
        adaptation_field_exists: false,
        contains_payload: true,
        continuity_counter: continuity_counter.next(),
    }
    .write_to(&mut packet);

    // Pointer field
    packet.put_u8(0);
    packet.put_slice(section);
    packet.resize(TS_PACKET_SIZE, STUFFING_BYTE);

    buffer.append_slice(&packet);
    Ok(())
}

/// Largest body a section can carry while still fitting in one packet.
pub(crate) const MAX_SECTION_BODY: usize =
    TS_PACKET_SIZE - TS_HEADER_SIZE - SECTION_PREFIX_SIZE - SECTION_HEADER_AFTER_LENGTH - CRC_SIZE;
