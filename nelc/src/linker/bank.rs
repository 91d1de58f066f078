use crate::ast::SourcePosition;
use crate::diag::{Diagnostics, Outcome};
use crate::error::Error;

pub const BANK_SIZE: usize = 8192;
pub const PAD_VALUE: u8 = 0xFF;

const ADDRESS_SPACE: u32 = 0x10000;

/// One 8 KiB window of the rom, anchored at an origin address.
#[derive(Debug, Clone)]
pub struct RomBank {
    data: Vec<u8>,
    origin: Option<u16>,
    position: usize,
    reserved: usize,
}

impl Default for RomBank {
    fn default() -> Self {
        Self::new()
    }
}

impl RomBank {
    pub fn new() -> Self {
        Self {
            data: vec![PAD_VALUE; BANK_SIZE],
            origin: None,
            position: 0,
            reserved: 0,
        }
    }

    pub fn origin(&self) -> Option<u16> {
        self.origin
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn reserved(&self) -> usize {
        self.reserved
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Absolute address of the cursor, once an origin is set.
    pub fn program_counter(&self) -> Option<u32> {
        self.origin.map(|origin| origin as u32 + self.position as u32)
    }

    /// Rewinds the cursor for the next pass. The reservation is kept.
    pub fn reset_position(&mut self) {
        self.position = 0;
    }

    pub fn expand(&mut self, amount: usize, pos: &SourcePosition, diag: &mut Diagnostics) -> Outcome<()> {
        let Some(origin) = self.origin else {
            return Err(diag.fatal(Error::NoOrigin, pos));
        };
        let end = origin as u32 + (self.position + amount) as u32;
        if end > ADDRESS_SPACE {
            return Err(diag.fatal(Error::AddressSpace(end), pos));
        }
        self.reserved += amount;
        self.position += amount;
        if self.reserved > BANK_SIZE {
            let error = Error::BankOverflow {
                capacity: BANK_SIZE,
                excess: self.reserved - BANK_SIZE,
            };
            return Err(diag.fatal(error, pos));
        }
        Ok(())
    }

    /// Sets the origin the first time, and moves forward afterwards.
    pub fn org(&mut self, addr: u16, pos: &SourcePosition, diag: &mut Diagnostics) -> Outcome<()> {
        let Some(current) = self.program_counter() else {
            self.origin = Some(addr);
            return Ok(());
        };
        let target = addr as u32;
        if target < current {
            let error = Error::MoveBackwards {
                from: current,
                to: target,
            };
            return Err(diag.fatal(error, pos));
        }
        self.expand((target - current) as usize, pos, diag)
    }

    /// Moves the cursor to `addr` inside the space reserved so far.
    pub fn seek(&mut self, addr: u16, pos: &SourcePosition, diag: &mut Diagnostics) -> Outcome<()> {
        let Some(origin) = self.origin else {
            return Err(diag.fatal(Error::NoOrigin, pos));
        };
        let offset = addr as i64 - origin as i64;
        if offset < 0 || offset as usize > self.reserved {
            return Err(diag.fatal(Error::SeekOutside, pos));
        }
        self.position = offset as usize;
        Ok(())
    }

    pub fn write_byte(&mut self, value: u16, pos: &SourcePosition, diag: &mut Diagnostics) -> Outcome<()> {
        self.ensure(1, pos, diag)?;
        if value > 0xFF {
            diag.error(Error::ByteRange(value), pos)?;
        }
        self.data[self.position] = value as u8;
        self.position += 1;
        Ok(())
    }

    /// Writes little-endian.
    pub fn write_word(&mut self, value: u16, pos: &SourcePosition, diag: &mut Diagnostics) -> Outcome<()> {
        self.write_bytes(&value.to_le_bytes(), pos, diag)
    }

    pub fn write_bytes(&mut self, bytes: &[u8], pos: &SourcePosition, diag: &mut Diagnostics) -> Outcome<()> {
        self.ensure(bytes.len(), pos, diag)?;
        self.data[self.position..self.position + bytes.len()].copy_from_slice(bytes);
        self.position += bytes.len();
        Ok(())
    }

    fn ensure(&self, amount: usize, pos: &SourcePosition, diag: &mut Diagnostics) -> Outcome<()> {
        if self.position + amount > self.reserved {
            return Err(diag.fatal(Error::WriteOutside, pos));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn here() -> SourcePosition {
        SourcePosition::new("bank.nel", 1, 1)
    }

    fn sink() -> Diagnostics {
        Diagnostics::new(&Config::quiet())
    }

    #[test]
    fn org_sets_origin_then_advances() {
        let mut diag = sink();
        let mut bank = RomBank::new();
        bank.org(0x8000, &here(), &mut diag).unwrap();
        assert_eq!(bank.program_counter(), Some(0x8000));
        bank.org(0x8010, &here(), &mut diag).unwrap();
        assert_eq!(bank.program_counter(), Some(0x8010));
        assert_eq!(bank.reserved(), 0x10);
        assert!(bank.org(0x8000, &here(), &mut diag).is_err());
        assert!(diag.reported()[0].fatal);
    }

    #[test]
    fn expand_requires_origin() {
        let mut diag = sink();
        assert!(RomBank::new().expand(1, &here(), &mut diag).is_err());
        assert_eq!(diag.reported()[0].message, "no origin point was set before bank was expanded.");
    }

    #[test]
    fn capacity_and_address_space() {
        let mut diag = sink();
        let mut bank = RomBank::new();
        bank.org(0x8000, &here(), &mut diag).unwrap();
        for _ in 0..BANK_SIZE / 256 {
            bank.expand(256, &here(), &mut diag).unwrap();
        }
        assert!(bank.expand(1, &here(), &mut diag).is_err());
        assert_eq!(
            diag.reported()[0].message,
            "bank expanded beyond its 8192 byte boundary by 1 bytes"
        );

        let mut diag = sink();
        let mut bank = RomBank::new();
        bank.org(0xFFF0, &here(), &mut diag).unwrap();
        bank.expand(16, &here(), &mut diag).unwrap();
        assert!(bank.expand(1, &here(), &mut diag).is_err());
        assert!(diag.reported()[0].message.contains("65537"));
    }

    #[test]
    fn writes_stay_inside_reservation() {
        let mut diag = sink();
        let mut bank = RomBank::new();
        bank.org(0xC000, &here(), &mut diag).unwrap();
        bank.expand(3, &here(), &mut diag).unwrap();
        bank.reset_position();
        bank.write_byte(0x4C, &here(), &mut diag).unwrap();
        bank.write_word(0xC123, &here(), &mut diag).unwrap();
        assert_eq!(&bank.data()[..4], &[0x4C, 0x23, 0xC1, PAD_VALUE]);
        assert!(bank.write_byte(0, &here(), &mut diag).is_err());
    }

    #[test]
    fn byte_range_is_recoverable() {
        let mut diag = sink();
        let mut bank = RomBank::new();
        bank.org(0, &here(), &mut diag).unwrap();
        bank.expand(2, &here(), &mut diag).unwrap();
        bank.reset_position();
        bank.write_byte(0x100, &here(), &mut diag).unwrap();
        assert_eq!(bank.position(), 1);
        assert_eq!(diag.count(), 1);
        assert!(!diag.reported()[0].fatal);
    }

    #[test]
    fn seek_within_reserved_space() {
        let mut diag = sink();
        let mut bank = RomBank::new();
        bank.org(0x8000, &here(), &mut diag).unwrap();
        bank.expand(8, &here(), &mut diag).unwrap();
        bank.reset_position();
        bank.seek(0x8004, &here(), &mut diag).unwrap();
        assert_eq!(bank.position(), 4);
        assert!(bank.seek(0x8009, &here(), &mut diag).is_err());
    }
}
