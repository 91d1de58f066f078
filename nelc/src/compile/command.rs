use super::select::{select, Encoding, Operand, Side};
use super::{Context, Pass};
use crate::ast::{Argument, CommandStatement, SourcePosition};
use crate::diag::Outcome;

const WHAT: &str = "command";

impl Pass for CommandStatement {
    fn size(&mut self, ctx: &mut Context) -> Outcome<()> {
        for command in &mut self.commands {
            command.selection = select(ctx, command.kind, &self.receiver, command.argument.as_ref(), &command.pos)?;
            if let Some(selection) = &command.selection {
                ctx.reserve(WHAT, selection.size(), &command.pos)?;
            }
        }
        Ok(())
    }

    fn emit(&mut self, ctx: &mut Context) -> Outcome<()> {
        for command in &self.commands {
            let Some(selection) = command.selection else {
                continue;
            };
            let (receiver, argument) = match (selection.swapped, command.argument.as_ref()) {
                (true, Some(argument)) => (argument, Some(&self.receiver)),
                (_, argument) => (&self.receiver, argument),
            };
            match selection.encoding {
                Encoding::Sequence(bytes) => ctx.write_bytes(bytes, &command.pos)?,
                Encoding::Instruction {
                    prefix,
                    opcode,
                    operand,
                } => {
                    if let Some(prefix) = prefix {
                        ctx.write_byte(prefix.byte().into(), &command.pos)?;
                    }
                    ctx.write_byte(opcode.byte().into(), &command.pos)?;
                    let carrier = |side| match side {
                        Side::Receiver => Some(receiver),
                        Side::Argument => argument,
                    };
                    match operand {
                        Operand::None => {}
                        Operand::Byte(side) => write_operand(ctx, carrier(side), 1, &command.pos)?,
                        Operand::Word(side) => write_operand(ctx, carrier(side), 2, &command.pos)?,
                    }
                }
            }
        }
        Ok(())
    }
}

/// Writes an operand value. An unresolved one was already reported by folding,
/// so zeros keep the following bytes where `size` put them.
fn write_operand(ctx: &mut Context, argument: Option<&Argument>, width: usize, pos: &SourcePosition) -> Outcome<()> {
    let Some(expr) = argument.and_then(|arg| arg.expr.as_ref()) else {
        return Err(ctx.diag.internal("memory operand without an address expression", pos));
    };
    let value = ctx.fold(expr, true, true)?.unwrap_or(0);
    match width {
        1 => ctx.write_byte(value, &expr.pos),
        _ => ctx.write_word(value, &expr.pos),
    }
}
