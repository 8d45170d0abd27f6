use lazy_static::lazy_static;

/// Generator polynomial of the CRC32 used by ISO/IEC 13818-1 PSI sections.
const CRC32_MPEG2: u32 = 0x04C11DB7;

lazy_static! {
    static ref CRC_TABLE: [u32; 256] = build_table();
}

fn build_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    for (i, entry) in table.iter_mut().enumerate() {
        let mut crc = (i as u32) << 24;
        for _ in 0..8 {
            crc = if crc & 0x8000_0000 != 0 {
                (crc << 1) ^ CRC32_MPEG2
            } else {
                crc << 1
            };
        }
        *entry = crc;
    }
    table
}

/// MPEG-2 CRC32 (initial value 0xFFFFFFFF, no reflection, no final xor),
/// appended big-endian to every PAT / PMT section.
pub struct Crc32Mpeg2;

impl Crc32Mpeg2 {
    /// CRC of `data`.
    pub fn calculate(data: &[u8]) -> u32 {
        data.iter().fold(0xFFFF_FFFF, |crc, &byte| {
            let index = ((crc >> 24) ^ byte as u32) & 0xFF;
            (crc << 8) ^ CRC_TABLE[index as usize]
        })
    }
}
