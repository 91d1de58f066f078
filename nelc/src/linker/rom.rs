use super::bank::RomBank;
use crate::ast::SourcePosition;
use crate::diag::{Diagnostics, Outcome};
use crate::error::Error;

const ADDRESS_SPACE: u32 = 0x10000;

/// Values taken from the program's ines header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeaderSettings {
    pub mapper: u8,
    pub prg: u8,
    pub chr: u8,
    pub mirroring: bool,
    pub battery: bool,
    pub fourscreen: bool,
}

impl HeaderSettings {
    /// Each 16 KiB prg unit takes two banks, each 8 KiB chr unit one.
    pub fn bank_count(&self) -> usize {
        self.prg as usize * 2 + self.chr as usize
    }
}

/// Owns every rom bank and the ram counter.
#[derive(Debug, Clone)]
pub struct RomGenerator {
    settings: HeaderSettings,
    banks: Vec<RomBank>,
    active: Option<usize>,
    ram: Option<u32>,
}

impl RomGenerator {
    pub fn new(settings: HeaderSettings) -> Self {
        Self {
            settings,
            banks: vec![RomBank::new(); settings.bank_count()],
            active: None,
            ram: None,
        }
    }

    pub fn settings(&self) -> &HeaderSettings {
        &self.settings
    }

    pub fn banks(&self) -> &[RomBank] {
        &self.banks
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_bank(&self) -> Option<&RomBank> {
        self.active.map(|index| &self.banks[index])
    }

    pub fn active_bank_mut(&mut self) -> Option<&mut RomBank> {
        self.active.map(|index| &mut self.banks[index])
    }

    pub fn switch_bank(&mut self, index: u16, pos: &SourcePosition, diag: &mut Diagnostics) -> Outcome<()> {
        if index as usize >= self.banks.len() {
            let error = Error::BankIndex {
                index,
                count: self.banks.len(),
            };
            return Err(diag.fatal(error, pos));
        }
        self.active = Some(index as usize);
        Ok(())
    }

    pub fn ram_counter(&self) -> Option<u32> {
        self.ram
    }

    pub fn move_ram(&mut self, addr: u16) {
        self.ram = Some(addr as u32);
    }

    pub fn expand_ram(&mut self, amount: usize, pos: &SourcePosition, diag: &mut Diagnostics) -> Outcome<()> {
        let Some(counter) = self.ram else {
            return Err(diag.fatal(Error::NoRamCounter, pos));
        };
        let end = counter + amount as u32;
        if end > ADDRESS_SPACE {
            return Err(diag.fatal(Error::RamOverflow(end), pos));
        }
        self.ram = Some(end);
        Ok(())
    }

    /// Rewinds every bank and deselects the active one, ready for emission.
    pub fn reset_rom_position(&mut self) {
        for bank in &mut self.banks {
            bank.reset_position();
        }
        self.active = None;
    }
}
