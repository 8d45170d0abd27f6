//! HLS 32-byte segment alignment.
//!
//! A finished segment is topped up with whole null packets and then with
//! single filler bytes so that its size lands on a 32-byte boundary. The
//! amounts depend only on the pre-padding size modulo 32.

use super::types::TS_PACKET_SIZE;

/// Filler byte values, indexed by padding class.
pub const PADDINGS: [u8; 4] = [0x10, 0x0c, 0x08, 0x04];

const ALIGNMENT: u64 = 32;

/// What to append to a segment of a given size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaddingPlan {
    /// Null TS packets, appended first.
    pub stuffing_packets: usize,
    /// Count of filler bytes appended after the packets.
    pub padding_bytes: usize,
    /// Value repeated for every filler byte.
    pub padding_value: u8,
}

impl PaddingPlan {
    const fn new(stuffing_packets: usize, padding_bytes: usize, index: usize) -> Self {
        Self {
            stuffing_packets,
            padding_bytes,
            padding_value: PADDINGS[index],
        }
    }

    /// Number of bytes the plan adds.
    pub fn added_size(&self) -> u64 {
        (self.stuffing_packets * TS_PACKET_SIZE + self.padding_bytes) as u64
    }
}

/// Padding for a segment whose pre-padding size is `segment_size`.
pub fn hls32_padding(segment_size: u64) -> PaddingPlan {
    match segment_size % ALIGNMENT {
        0 => PaddingPlan::new(4, 16, 0),
        4 => PaddingPlan::new(5, 16, 0),
        8 => PaddingPlan::new(6, 16, 0),
        12 => PaddingPlan::new(7, 16, 0),
        16 => PaddingPlan::new(0, 16, 0),
        20 => PaddingPlan::new(0, 12, 1),
        24 => PaddingPlan::new(0, 8, 2),
        28 => PaddingPlan::new(0, 4, 3),
        _ => PaddingPlan::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_padding_table() {
        assert_eq!(
            hls32_padding(376),
            PaddingPlan {
                stuffing_packets: 0,
                padding_bytes: 8,
                padding_value: 0x08,
            }
        );
        assert_eq!(hls32_padding(188 * 8).stuffing_packets, 4);
        assert_eq!(hls32_padding(188).padding_value, 0x04);
        assert_eq!(hls32_padding(188 * 3).padding_value, 0x0c);
        assert_eq!(hls32_padding(188 * 5).stuffing_packets, 7);
        assert_eq!(hls32_padding(33), PaddingPlan::default());
        assert_eq!(hls32_padding(33).added_size(), 0);
    }

    #[quickcheck]
    fn prop_padding_aligns_multiple_of_four(size: u32) -> bool {
        let size = size as u64 * 4;
        (size + hls32_padding(size).added_size()) % ALIGNMENT == 0
    }

    #[quickcheck]
    fn prop_padding_depends_only_on_remainder(size: u32, shift: u16) -> bool {
        let size = size as u64;
        hls32_padding(size) == hls32_padding(size + shift as u64 * ALIGNMENT)
    }

    #[quickcheck]
    fn prop_packet_multiples_always_padded(packets: u16) -> bool {
        let size = packets as u64 * TS_PACKET_SIZE as u64;
        hls32_padding(size).padding_bytes > 0
    }
}
