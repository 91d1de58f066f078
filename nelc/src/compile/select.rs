//! Instruction selection for commands.
//!
//! A command is first normalized so that `@mem: get a` and `a: put @mem`
//! share one spelling, then looked up in the encoding table. Memory operands
//! that exist in both zero-page and absolute form are decided here, once, so
//! that emission writes exactly the size that was reserved.

use super::Context;
use crate::ast::{Argument, CommandKind, SourcePosition};
use crate::diag::Outcome;
use crate::error::Error;
use arch::mode::Mode;
use arch::op::{self, Family, Opcode};

/// Which operand of a command carries the instruction's operand bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Receiver,
    Argument,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    None,
    /// Zero-page address or immediate value.
    Byte(Side),
    /// Absolute address, little-endian.
    Word(Side),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// A single instruction, optionally preceded by `clc`/`sec`.
    Instruction {
        prefix: Option<Opcode>,
        opcode: Opcode,
        operand: Operand,
    },
    /// A fixed run of instructions with no operand.
    Sequence(&'static [u8]),
}

/// The concrete encoding chosen for one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub kind: CommandKind,
    pub converted_from: Option<CommandKind>,
    /// Receiver and argument trade places relative to the source.
    pub swapped: bool,
    pub encoding: Encoding,
}

impl Selection {
    pub fn size(&self) -> usize {
        match self.encoding {
            Encoding::Sequence(bytes) => bytes.len(),
            Encoding::Instruction { prefix, operand, .. } => {
                let operand = match operand {
                    Operand::None => 0,
                    Operand::Byte(_) => 1,
                    Operand::Word(_) => 2,
                };
                prefix.map_or(0, |_| 1) + 1 + operand
            }
        }
    }
}

/// A command rewritten so that stores and loads are spelled from the register's side.
#[derive(Debug, Clone, Copy)]
pub struct Normalized<'a> {
    pub kind: CommandKind,
    pub converted_from: Option<CommandKind>,
    pub receiver: &'a Argument,
    pub argument: Option<&'a Argument>,
}

impl Normalized<'_> {
    pub fn swapped(&self) -> bool {
        self.converted_from.is_some()
    }
}

/// `@mem: get r` becomes `r: put @mem`, and `@mem: put r` becomes `r: get @mem`.
/// Only a register argument is swapped in, so the result never needs another pass.
pub fn normalize<'a>(kind: CommandKind, receiver: &'a Argument, argument: Option<&'a Argument>) -> Normalized<'a> {
    let unchanged = Normalized {
        kind,
        converted_from: None,
        receiver,
        argument,
    };
    let Some(arg) = argument else {
        return unchanged;
    };
    if arg.mode.is_memory() {
        return unchanged;
    }
    let kind = match kind {
        CommandKind::Get if receiver.mode.is_addressable() => CommandKind::Put,
        CommandKind::Put if receiver.mode.is_memory() => CommandKind::Get,
        _ => return unchanged,
    };
    Normalized {
        kind,
        converted_from: Some(unchanged.kind),
        receiver: arg,
        argument: Some(receiver),
    }
}

const NOT: &[u8] = &[Opcode::EorImm as u8, 0xFF];
const NEG: &[u8] = &[Opcode::Clc as u8, Opcode::EorImm as u8, 0xFF, Opcode::AdcImm as u8, 0x01];

const MEMORY_PAIR: &str = "receiver and argument may not both be memory terms";
const NEEDS_ARGUMENT: &str = "an argument is required";
const NO_ARGUMENT: &str = "no argument is allowed";
const GET_RECEIVER: &str = "receiver must be the register `a`, `x`, `y`, or `s`, or some memory term that is not an immediate value";
const GET_A: &str = "if receiver is the register `a`, then the argument must be the register `x` or `y`, an immediate value #foo, a direct memory term of form @foo, @foo[x] or @foo[y], or an indirect term of form @[foo[x]] or @[foo][y]";
const GET_X: &str = "if receiver is the register `x`, then the argument must be the register `a` or `s`, an immediate value #foo, or a direct memory term of form @foo or @foo[y]";
const GET_Y: &str = "if receiver is the register `y`, then the argument must be the register `a`, an immediate value #foo, or a direct memory term of form @foo or @foo[x]";
const TO_S: &str = "if receiver is the register `s`, then the argument must be the register `x`";
const PUT_RECEIVER: &str = "receiver must be the register `a`, `x`, `y`, or `s`, or some memory term";
const PUT_A: &str = "if receiver is the register `a`, then the argument must be the register `x` or `y`, a direct memory term of form @foo, @foo[x] or @foo[y], or an indirect term of form @[foo[x]] or @[foo][y]";
const PUT_X: &str = "if receiver is the register `x`, then the argument must be the register `a` or `s`, or a direct memory term of form @foo or @foo[y]";
const PUT_Y: &str = "if receiver is the register `y`, then the argument must be the register `a`, or a direct memory term of form @foo or @foo[x]";
const CMP_RECEIVER: &str = "receiver must be the register `a`, `x`, or `y`";
const CMP_INDEX: &str = "if receiver is an index register, then the argument must be an immediate value #foo, or a direct memory term of form @foo";
const A_RECEIVER: &str = "receiver must be the register `a`";
const ALU_ARGUMENT: &str = "argument must be an immediate value #foo, a direct memory term of form @foo, @foo[x] or @foo[y], or an indirect term of form @[foo[x]] or @[foo][y]";
const BIT_ARGUMENT: &str = "argument must be a direct memory term of form @foo";
const STEP_RECEIVER: &str = "receiver must be the register `x`, register `y`, or a direct memory term of form @foo, or @foo[x]";
const SHIFT_RECEIVER: &str = "receiver must be the register `a`, or a direct memory term of form @foo, or @foo[x]";
const STACK_RECEIVER: &str = "receiver must be the register `a` or `p`";
const P_RECEIVER: &str = "receiver must be the register `p`";
const SET_ARGUMENT: &str = "argument must be the p-flag `carry`, `interrupt`, or `decimal`";
const UNSET_ARGUMENT: &str = "argument must be the p-flag `carry`, `interrupt`, `decimal`, or `overflow`";

/// Memory operand forms an instruction family offers for one addressing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Form {
    Byte(Opcode),
    Word(Opcode),
    /// Chosen by whether the address fits in the zero page.
    Either { zp: Opcode, abs: Opcode },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Implied(Opcode),
    Memory {
        prefix: Option<Opcode>,
        form: Form,
        side: Side,
    },
    Sequence(&'static [u8]),
}

fn form(family: &Family, mode: Mode) -> Option<Form> {
    let pair = |zp: Option<Opcode>, abs: Option<Opcode>| match (zp, abs) {
        (Some(zp), Some(abs)) => Some(Form::Either { zp, abs }),
        (Some(zp), None) => Some(Form::Byte(zp)),
        (None, Some(abs)) => Some(Form::Word(abs)),
        (None, None) => None,
    };
    match mode {
        Mode::Immediate => family.imm.map(Form::Byte),
        Mode::ZpIndexedIndirect => family.ind_x.map(Form::Byte),
        Mode::ZpIndirectIndexed => family.ind_y.map(Form::Byte),
        Mode::Direct => pair(family.zp, family.abs),
        Mode::IndexedByX => pair(family.zp_x, family.abs_x),
        Mode::IndexedByY => pair(family.zp_y, family.abs_y),
        _ => None,
    }
}

fn memory(family: &Family, mode: Mode, side: Side, prefix: Option<Opcode>, reason: &'static str) -> Result<Shape, &'static str> {
    form(family, mode)
        .map(|form| Shape::Memory { prefix, form, side })
        .ok_or(reason)
}

fn implied(opcode: Opcode) -> Result<Shape, &'static str> {
    Ok(Shape::Implied(opcode))
}

/// The encoding table, keyed on a normalized command.
fn shape(kind: CommandKind, receiver: Mode, argument: Option<Mode>) -> Result<Shape, &'static str> {
    use CommandKind as K;
    use Opcode as O;
    use Side::{Argument as Arg, Receiver as Recv};

    let arg = match (kind.takes_argument(), argument) {
        (true, Some(arg)) => arg,
        (true, None) => return Err(NEEDS_ARGUMENT),
        (false, Some(_)) => return Err(NO_ARGUMENT),
        (false, None) => Mode::A,
    };

    match kind {
        K::Get => match (receiver, arg) {
            (Mode::A, Mode::X) => implied(O::Txa),
            (Mode::A, Mode::Y) => implied(O::Tya),
            (Mode::A, mode) => memory(&op::LDA, mode, Arg, None, GET_A),
            (Mode::X, Mode::A) => implied(O::Tax),
            (Mode::X, Mode::S) => implied(O::Tsx),
            (Mode::X, mode) => memory(&op::LDX, mode, Arg, None, GET_X),
            (Mode::Y, Mode::A) => implied(O::Tay),
            (Mode::Y, mode) => memory(&op::LDY, mode, Arg, None, GET_Y),
            (Mode::S, Mode::X) => implied(O::Txs),
            (Mode::S, _) => Err(TO_S),
            _ => Err(GET_RECEIVER),
        },
        K::Put => match (receiver, arg) {
            (Mode::A, Mode::X) => implied(O::Tax),
            (Mode::A, Mode::Y) => implied(O::Tay),
            (Mode::A, mode) => memory(&op::STA, mode, Arg, None, PUT_A),
            (Mode::X, Mode::A) => implied(O::Txa),
            (Mode::X, Mode::S) => implied(O::Txs),
            (Mode::X, mode) => memory(&op::STX, mode, Arg, None, PUT_X),
            (Mode::Y, Mode::A) => implied(O::Tya),
            (Mode::Y, mode) => memory(&op::STY, mode, Arg, None, PUT_Y),
            (Mode::S, Mode::X) => implied(O::Tsx),
            (Mode::S, _) => Err(TO_S),
            _ => Err(PUT_RECEIVER),
        },
        K::Cmp => match receiver {
            Mode::A => memory(&op::CMP, arg, Arg, None, ALU_ARGUMENT),
            Mode::X => memory(&op::CPX, arg, Arg, None, CMP_INDEX),
            Mode::Y => memory(&op::CPY, arg, Arg, None, CMP_INDEX),
            _ => Err(CMP_RECEIVER),
        },
        K::Add | K::Addc | K::Sub | K::Subc | K::Or | K::And | K::Xor | K::Bit => {
            if receiver != Mode::A {
                return Err(A_RECEIVER);
            }
            let (family, prefix, reason) = match kind {
                K::Add => (&op::ADC, Some(O::Clc), ALU_ARGUMENT),
                K::Addc => (&op::ADC, None, ALU_ARGUMENT),
                K::Sub => (&op::SBC, Some(O::Sec), ALU_ARGUMENT),
                K::Subc => (&op::SBC, None, ALU_ARGUMENT),
                K::Or => (&op::ORA, None, ALU_ARGUMENT),
                K::And => (&op::AND, None, ALU_ARGUMENT),
                K::Xor => (&op::EOR, None, ALU_ARGUMENT),
                _ => (&op::BIT, None, BIT_ARGUMENT),
            };
            memory(family, arg, Arg, prefix, reason)
        }
        K::Inc | K::Dec => {
            let inc = kind == K::Inc;
            match receiver {
                Mode::X => implied(if inc { O::Inx } else { O::Dex }),
                Mode::Y => implied(if inc { O::Iny } else { O::Dey }),
                mode => {
                    let family = if inc { &op::INC } else { &op::DEC };
                    memory(family, mode, Recv, None, STEP_RECEIVER)
                }
            }
        }
        K::Not | K::Neg => match receiver {
            Mode::A => Ok(Shape::Sequence(if kind == K::Not { NOT } else { NEG })),
            _ => Err(A_RECEIVER),
        },
        K::Shl | K::Shr | K::Rol | K::Ror => {
            let (accumulator, family) = match kind {
                K::Shl => (O::AslA, &op::ASL),
                K::Shr => (O::LsrA, &op::LSR),
                K::Rol => (O::RolA, &op::ROL),
                _ => (O::RorA, &op::ROR),
            };
            match receiver {
                Mode::A => implied(accumulator),
                mode => memory(family, mode, Recv, None, SHIFT_RECEIVER),
            }
        }
        K::Push | K::Pull => match (kind, receiver) {
            (K::Push, Mode::A) => implied(O::Pha),
            (K::Push, Mode::P) => implied(O::Php),
            (K::Pull, Mode::A) => implied(O::Pla),
            (K::Pull, Mode::P) => implied(O::Plp),
            _ => Err(STACK_RECEIVER),
        },
        K::Set => match (receiver, arg) {
            (Mode::P, Mode::Carry) => implied(O::Sec),
            (Mode::P, Mode::Interrupt) => implied(O::Sei),
            (Mode::P, Mode::Decimal) => implied(O::Sed),
            (Mode::P, _) => Err(SET_ARGUMENT),
            _ => Err(P_RECEIVER),
        },
        K::Unset => match (receiver, arg) {
            (Mode::P, Mode::Carry) => implied(O::Clc),
            (Mode::P, Mode::Interrupt) => implied(O::Cli),
            (Mode::P, Mode::Decimal) => implied(O::Cld),
            (Mode::P, Mode::Overflow) => implied(O::Clv),
            (Mode::P, _) => Err(UNSET_ARGUMENT),
            _ => Err(P_RECEIVER),
        },
    }
}

/// Picks the encoding of one command, or reports why none exists.
pub(crate) fn select(
    ctx: &mut Context,
    kind: CommandKind,
    receiver: &Argument,
    argument: Option<&Argument>,
    pos: &SourcePosition,
) -> Outcome<Option<Selection>> {
    let normalized = normalize(kind, receiver, argument);
    let shape = match argument {
        Some(arg) if receiver.mode.is_memory() && arg.mode.is_memory() => Err(MEMORY_PAIR),
        _ => shape(
            normalized.kind,
            normalized.receiver.mode,
            normalized.argument.map(|arg| arg.mode),
        ),
    };
    let shape = match shape {
        Ok(shape) => shape,
        Err(reason) => {
            let converted = match normalized.converted_from {
                Some(from) => match argument {
                    Some(arg) => format!(" (converted from `{}: {} {}`)", receiver, from, arg),
                    None => format!(" (converted from `{}: {}`)", receiver, from),
                },
                None => String::new(),
            };
            let error = Error::InvalidCommand {
                kind: normalized.kind,
                converted,
                reason,
            };
            ctx.error(error, pos)?;
            return Ok(None);
        }
    };

    let encoding = match shape {
        Shape::Implied(opcode) => Encoding::Instruction {
            prefix: None,
            opcode,
            operand: Operand::None,
        },
        Shape::Sequence(bytes) => Encoding::Sequence(bytes),
        Shape::Memory { prefix, form, side } => {
            let (opcode, operand) = match form {
                Form::Byte(opcode) => (opcode, Operand::Byte(side)),
                Form::Word(opcode) => (opcode, Operand::Word(side)),
                Form::Either { zp, abs } => {
                    let carrier = match side {
                        Side::Receiver => Some(normalized.receiver),
                        Side::Argument => normalized.argument,
                    };
                    if zero_page(ctx, carrier)? {
                        (zp, Operand::Byte(side))
                    } else {
                        (abs, Operand::Word(side))
                    }
                }
            };
            Encoding::Instruction {
                prefix,
                opcode,
                operand,
            }
        }
    };

    Ok(Some(Selection {
        kind: normalized.kind,
        converted_from: normalized.converted_from,
        swapped: normalized.swapped(),
        encoding,
    }))
}

/// Best effort: an address not known yet is assumed to be absolute.
fn zero_page(ctx: &mut Context, carrier: Option<&Argument>) -> Outcome<bool> {
    let Some(expr) = carrier.and_then(|arg| arg.expr.as_ref()) else {
        return Ok(false);
    };
    Ok(matches!(ctx.fold(expr, false, true)?, Some(value) if value < 0x100))
}
