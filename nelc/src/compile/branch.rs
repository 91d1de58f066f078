use super::{Context, Pass};
use crate::ast::{BranchKind, BranchStatement};
use crate::diag::Outcome;
use crate::error::Error;
use arch::mode::Mode;
use arch::op::Opcode;

const WHAT: &str = "branch";

impl BranchStatement {
    /// Size of the statement, or `None` after reporting why it cannot be encoded.
    fn check(&self, ctx: &mut Context) -> Outcome<Option<usize>> {
        let kind = self.kind;
        if matches!(kind, BranchKind::Nop | BranchKind::Return | BranchKind::Resume) {
            return Ok(Some(1));
        }
        let found = self.destination.as_ref().map(|dest| dest.mode);
        let Some(mode) = found.filter(|mode| mode.is_label()) else {
            let found = self.destination.as_ref().map(|d| d.to_string()).unwrap_or_default();
            let error = Error::BranchDestination {
                kind: kind.to_string(),
                found,
            };
            ctx.error(error, &self.pos)?;
            return Ok(None);
        };
        if kind == BranchKind::Call {
            if mode == Mode::IndirectLabel {
                ctx.error(Error::IndirectCall, &self.pos)?;
                return Ok(None);
            }
            return Ok(Some(3));
        }
        let Some(condition) = &self.condition else {
            return Ok(Some(3));
        };
        if !matches!(condition.flag.mode, Mode::Carry | Mode::Zero | Mode::Negative | Mode::Overflow) {
            ctx.error(Error::BranchFlag(condition.flag.to_string()), &condition.flag.pos)?;
            return Ok(None);
        }
        if mode == Mode::IndirectLabel {
            ctx.error(Error::ConditionalIndirect, &self.pos)?;
            return Ok(None);
        }
        Ok(Some(2))
    }

    fn opcode(&self) -> Option<Opcode> {
        let indirect = self.destination.as_ref().map(|d| d.mode) == Some(Mode::IndirectLabel);
        let opcode = match (self.kind, &self.condition) {
            (BranchKind::Nop, _) => Opcode::Nop,
            (BranchKind::Return, _) => Opcode::Rts,
            (BranchKind::Resume, _) => Opcode::Rti,
            (BranchKind::Call, _) => Opcode::Jsr,
            (BranchKind::Goto, None) if indirect => Opcode::JmpInd,
            (BranchKind::Goto, None) => Opcode::Jmp,
            (BranchKind::Goto, Some(condition)) => match (condition.flag.mode, condition.set) {
                (Mode::Carry, true) => Opcode::Bcs,
                (Mode::Carry, false) => Opcode::Bcc,
                (Mode::Zero, true) => Opcode::Beq,
                (Mode::Zero, false) => Opcode::Bne,
                (Mode::Negative, true) => Opcode::Bmi,
                (Mode::Negative, false) => Opcode::Bpl,
                (Mode::Overflow, true) => Opcode::Bvs,
                (Mode::Overflow, false) => Opcode::Bvc,
                _ => return None,
            },
        };
        Some(opcode)
    }
}

impl Pass for BranchStatement {
    fn size(&mut self, ctx: &mut Context) -> Outcome<()> {
        self.size = self.check(ctx)?;
        if let Some(size) = self.size {
            ctx.reserve(WHAT, size, &self.pos)?;
        }
        Ok(())
    }

    fn emit(&mut self, ctx: &mut Context) -> Outcome<()> {
        let Some(size) = self.size else {
            return Ok(());
        };
        let Some(opcode) = self.opcode() else {
            return Err(ctx.diag.internal("branch without an opcode", &self.pos));
        };
        ctx.write_byte(opcode.byte().into(), &self.pos)?;
        if size == 1 {
            return Ok(());
        }

        let Some(expr) = self.destination.as_ref().and_then(|d| d.expr.as_ref()) else {
            return Err(ctx.diag.internal("branch destination without an expression", &self.pos));
        };
        let target = ctx.fold(expr, true, true)?;
        if size == 3 {
            return ctx.write_word(target.unwrap_or(0), &expr.pos);
        }

        // Relative to the address just past the displacement byte.
        let (bank, diag) = ctx.bank(WHAT, &self.pos)?;
        let Some(pc) = bank.program_counter() else {
            return Err(diag.fatal(Error::NoOrigin, &self.pos));
        };
        let Some(target) = target else {
            return ctx.write_byte(0, &expr.pos);
        };
        let offset = target as i32 - (pc as i32 + 1);
        if !(-128..=127).contains(&offset) {
            ctx.error(Error::RelativeRange(offset), &expr.pos)?;
            return ctx.write_byte(0, &expr.pos);
        }
        ctx.write_byte(offset as i8 as u8 as u16, &expr.pos)
    }
}
