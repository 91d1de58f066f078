use super::{Context, Pass};
use crate::ast::{ConstantDeclaration, LabelDeclaration, VariableDeclaration};
use crate::diag::Outcome;
use crate::error::Error;
use crate::eval::{DefKind, Definition, LabelState};

impl Pass for ConstantDeclaration {
    fn gather(&mut self, ctx: &mut Context) -> Outcome<()> {
        let kind = DefKind::Constant {
            value: self.value.clone(),
            scope: ctx.symbols.current(),
        };
        let def = Definition::new(&self.name.text, self.name.pos.clone(), kind);
        ctx.symbols.put(def, &mut ctx.diag)?;
        Ok(())
    }
}

impl Pass for LabelDeclaration {
    fn gather(&mut self, ctx: &mut Context) -> Outcome<()> {
        let kind = DefKind::Label(LabelState::Unplaced);
        let def = Definition::new(&self.name.text, self.name.pos.clone(), kind);
        self.def = Some(ctx.symbols.put(def, &mut ctx.diag)?);
        Ok(())
    }

    /// A label sits at the program counter of the active bank.
    fn size(&mut self, ctx: &mut Context) -> Outcome<()> {
        let pos = &self.name.pos;
        let (bank, diag) = ctx.bank("label declaration", pos)?;
        let Some(pc) = bank.program_counter() else {
            return Err(diag.fatal(Error::LabelWithoutOrigin, pos));
        };
        let Ok(addr) = u16::try_from(pc) else {
            return ctx.error(Error::LabelOutOfRange(self.name.text.clone()), pos);
        };
        if let Some(def) = self.def {
            ctx.symbols.place_label(def, addr);
        }
        ctx.trace(|| format!("label {} = ${:04X}", self.name.text, addr));
        Ok(())
    }
}

impl Pass for VariableDeclaration {
    /// Variables take the next free ram addresses as soon as they are seen.
    fn gather(&mut self, ctx: &mut Context) -> Outcome<()> {
        let count = match &self.array_size {
            Some(expr) => match ctx.fold(expr, true, false)? {
                Some(0) => return ctx.error(Error::EmptyArray, &expr.pos),
                Some(count) => count as usize,
                None => return Ok(()),
            },
            None => 1,
        };
        let size = self.width.bytes() * count;

        for name in &self.names {
            let (rom, diag) = ctx.rom_mut(&name.pos)?;
            let Some(offset) = rom.ram_counter() else {
                return Err(diag.fatal(Error::NoRamCounter, &name.pos));
            };
            rom.expand_ram(size, &name.pos, diag)?;
            let kind = DefKind::Variable {
                offset: offset as u16,
            };
            ctx.symbols
                .put(Definition::new(&name.text, name.pos.clone(), kind), &mut ctx.diag)?;
        }
        Ok(())
    }
}
