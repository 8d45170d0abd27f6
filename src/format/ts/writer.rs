use super::pes::PesPacket;
use super::pmt::ProgramMapTableWriter;
use super::psi::{psi_section, write_psi_packet};
use super::types::*;
use crate::error::Result;
use crate::utils::SegmentBuffer;
use bytes::{BufMut, BytesMut};
use std::cmp::min;

/// Adaptation field length byte, flags byte and PCR.
const PCR_ADAPTATION_FIELD_SIZE: usize = 2 + PCR_FIELD_SIZE;

const AF_FLAG_RANDOM_ACCESS: u8 = 0x40;
const AF_FLAG_PCR: u8 = 0x10;

/// Encodes one program with a single elementary stream into TS packets.
pub struct TsWriter {
    pmt_writer: Box<dyn ProgramMapTableWriter>,
    encrypted: bool,
    pat_continuity_counter: ContinuityCounter,
    elementary_stream_continuity_counter: ContinuityCounter,
}

impl TsWriter {
    /// Creates a clear writer using `pmt_writer` for the PMT.
    pub fn new(pmt_writer: Box<dyn ProgramMapTableWriter>) -> Self {
        Self {
            pmt_writer,
            encrypted: false,
            pat_continuity_counter: ContinuityCounter::new(),
            elementary_stream_continuity_counter: ContinuityCounter::new(),
        }
    }

    /// Starts a segment by writing the PAT and the PMT.
    pub fn new_segment(&mut self, buffer: &mut SegmentBuffer) -> Result<()> {
        let mut body = BytesMut::with_capacity(4);
        body.put_u16(PROGRAM_NUMBER);
        body.put_u16(0xE000 | PID_PMT);
        let pat = psi_section(TABLE_ID_PAT, TRANSPORT_STREAM_ID, 0, &body);
        write_psi_packet(PID_PAT, &pat, &mut self.pat_continuity_counter, buffer)?;

        if self.encrypted {
            self.pmt_writer.encrypted_segment_pmt(buffer)
        } else {
            self.pmt_writer.clear_segment_pmt(buffer)
        }
    }

    /// Subsequent segments announce the SAMPLE-AES PMT. Takes effect at the
    /// next [`new_segment`](Self::new_segment).
    pub fn signal_encrypted(&mut self) {
        self.encrypted = true;
    }

    /// Whether the SAMPLE-AES PMT is in use.
    pub fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    /// Splits `packet` into TS packets on the elementary stream PID.
    pub fn add_pes_packet(&mut self, packet: PesPacket, buffer: &mut SegmentBuffer) -> Result<()> {
        let mut pes = BytesMut::with_capacity(packet.len());
        packet.write_to(&mut pes);

        let pcr_base = if packet.is_key_frame {
            packet.decode_timestamp()
        } else {
            None
        };

        let mut ts = BytesMut::with_capacity((pes.len() / TS_MAX_PAYLOAD_SIZE + 1) * TS_PACKET_SIZE);
        let mut offset = 0;
        while offset < pes.len() {
            let first = offset == 0;
            let pcr = if first { pcr_base } else { None };
            let reserved = if pcr.is_some() { PCR_ADAPTATION_FIELD_SIZE } else { 0 };
            let take = min(pes.len() - offset, TS_MAX_PAYLOAD_SIZE - reserved);
            let adaptation_field_exists = pcr.is_some() || take < TS_MAX_PAYLOAD_SIZE;

            TSHeader {
                payload_unit_start: first,
                pid: PID_ELEMENTARY,
                adaptation_field_exists,
                contains_payload: true,
                continuity_counter: self.elementary_stream_continuity_counter.next(),
            }
            .write_to(&mut ts);

            if adaptation_field_exists {
                // Length excludes the length byte itself.
                let adaptation_field_length = TS_MAX_PAYLOAD_SIZE - 1 - take;
                ts.put_u8(adaptation_field_length as u8);
                if adaptation_field_length > 0 {
                    let mut flags = 0;
                    if first && packet.is_key_frame {
                        flags |= AF_FLAG_RANDOM_ACCESS;
                    }
                    if pcr.is_some() {
                        flags |= AF_FLAG_PCR;
                    }
                    ts.put_u8(flags);

                    let mut stuffing = adaptation_field_length - 1;
                    if let Some(pcr_base) = pcr {
                        write_pcr(&mut ts, pcr_base);
                        stuffing -= PCR_FIELD_SIZE;
                    }
                    ts.put_bytes(STUFFING_BYTE, stuffing);
                }
            }

            ts.put_slice(&pes[offset..offset + take]);
            offset += take;
        }

        buffer.append_slice(&ts);
        Ok(())
    }

    /// Appends a null packet.
    pub fn add_stuffing_packet(&mut self, buffer: &mut SegmentBuffer) -> Result<()> {
        let mut ts = BytesMut::with_capacity(TS_PACKET_SIZE);
        TSHeader {
            payload_unit_start: false,
            pid: PID_NULL,
            adaptation_field_exists: false,
            contains_payload: true,
            continuity_counter: 0,
        }
        .write_to(&mut ts);
        ts.put_bytes(STUFFING_BYTE, TS_MAX_PAYLOAD_SIZE);
        buffer.append_slice(&ts);
        Ok(())
    }
}

impl std::fmt::Debug for TsWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TsWriter")
            .field("encrypted", &self.encrypted)
            .finish_non_exhaustive()
    }
}
