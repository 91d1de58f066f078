use super::{Context, Pass};
use crate::ast::{Relocation, RelocationStatement};
use crate::diag::Outcome;
use crate::error::Error;

const WHAT: &str = "rom relocation";

impl Pass for RelocationStatement {
    fn gather(&mut self, ctx: &mut Context) -> Outcome<()> {
        let Relocation::Ram { dest } = &self.target else {
            return Ok(());
        };
        let Some(addr) = ctx.fold(dest, true, false)? else {
            return Err(ctx.fatal(Error::UnresolvedRam, &self.pos));
        };
        let (rom, _) = ctx.rom_mut(&self.pos)?;
        rom.move_ram(addr);
        ctx.trace(|| format!("ram counter = ${:04X}", addr));
        Ok(())
    }

    fn size(&mut self, ctx: &mut Context) -> Outcome<()> {
        let Relocation::Rom { bank, dest } = &self.target else {
            return Ok(());
        };
        if let Some(bank) = bank {
            let Some(index) = ctx.fold(bank, true, true)? else {
                return Err(ctx.fatal(Error::UnresolvedBank, &self.pos));
            };
            let (rom, diag) = ctx.rom_mut(&self.pos)?;
            rom.switch_bank(index, &self.pos, diag)?;
        }
        if let Some(dest) = dest {
            let Some(addr) = ctx.fold(dest, true, true)? else {
                return Err(ctx.fatal(Error::UnresolvedRom, &self.pos));
            };
            let (bank, diag) = ctx.bank(WHAT, &self.pos)?;
            bank.org(addr, &self.pos, diag)?;
        }
        Ok(())
    }

    /// Replays the bank switch and moves the cursor to where `size` left it.
    fn emit(&mut self, ctx: &mut Context) -> Outcome<()> {
        let Relocation::Rom { bank, dest } = &self.target else {
            return Ok(());
        };
        if let Some(index) = bank.as_ref().and_then(|bank| bank.value()) {
            let (rom, diag) = ctx.rom_mut(&self.pos)?;
            rom.switch_bank(index, &self.pos, diag)?;
        }
        if let Some(addr) = dest.as_ref().and_then(|dest| dest.value()) {
            let (bank, diag) = ctx.bank(WHAT, &self.pos)?;
            bank.seek(addr, &self.pos, diag)?;
        }
        Ok(())
    }
}
