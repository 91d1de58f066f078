use super::rom::{HeaderSettings, RomGenerator};

pub const INES_MAGIC: [u8; 4] = [0x4E, 0x45, 0x53, 0x1A];
pub const HEADER_SIZE: usize = 16;

impl HeaderSettings {
    pub fn to_header(&self) -> [u8; HEADER_SIZE] {
        let mut header = [0u8; HEADER_SIZE];
        header[..4].copy_from_slice(&INES_MAGIC);
        header[4] = self.prg;
        header[5] = self.chr;
        header[6] = self.mirroring as u8
            | (self.battery as u8) << 1
            | (self.fourscreen as u8) << 3
            | (self.mapper & 0x0F) << 4;
        header[7] = self.mapper >> 4;
        header
    }
}

impl RomGenerator {
    /// Header followed by every bank in order.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_SIZE + self.banks().len() * super::BANK_SIZE);
        bytes.extend_from_slice(&self.settings().to_header());
        for bank in self.banks() {
            bytes.extend_from_slice(bank.data());
        }
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_byte_packing() {
        let settings = HeaderSettings {
            mapper: 0x42,
            prg: 2,
            chr: 1,
            mirroring: true,
            battery: true,
            fourscreen: true,
        };
        let header = settings.to_header();
        assert_eq!(&header[..8], &[0x4E, 0x45, 0x53, 0x1A, 2, 1, 0x2B, 0x04]);
        assert!(header[8..].iter().all(|b| *b == 0));
    }

    #[test]
    fn image_is_header_then_banks() {
        let rom = RomGenerator::new(HeaderSettings {
            prg: 1,
            chr: 1,
            ..HeaderSettings::default()
        });
        let bytes = rom.to_bytes();
        assert_eq!(bytes.len(), HEADER_SIZE + 3 * super::super::BANK_SIZE);
        assert_eq!(bytes[..HEADER_SIZE], rom.settings().to_header());
        assert!(bytes[HEADER_SIZE..].iter().all(|b| *b == super::super::PAD_VALUE));
    }
}
