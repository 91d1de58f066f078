use crate::reg::Builtin;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Operand shapes an argument can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[strum(serialize = "label")]
    Label,
    #[strum(serialize = "[label]")]
    IndirectLabel,
    #[strum(serialize = "a")]
    A,
    #[strum(serialize = "x")]
    X,
    #[strum(serialize = "y")]
    Y,
    #[strum(serialize = "s")]
    S,
    #[strum(serialize = "p")]
    P,
    #[strum(serialize = "carry")]
    Carry,
    #[strum(serialize = "interrupt")]
    Interrupt,
    #[strum(serialize = "decimal")]
    Decimal,
    #[strum(serialize = "overflow")]
    Overflow,
    #[strum(serialize = "zero")]
    Zero,
    #[strum(serialize = "negative")]
    Negative,
    #[strum(serialize = "#imm")]
    Immediate,
    #[strum(serialize = "@addr")]
    Direct,
    #[strum(serialize = "@addr[x]")]
    IndexedByX,
    #[strum(serialize = "@addr[y]")]
    IndexedByY,
    #[strum(serialize = "@[zp[x]]")]
    ZpIndexedIndirect,
    #[strum(serialize = "@[zp][y]")]
    ZpIndirectIndexed,
}

impl Mode {
    /// Operands that live in memory, immediates included.
    pub fn is_memory(self) -> bool {
        self == Mode::Immediate || self.is_addressable()
    }

    /// Memory operands that name a storage location.
    pub fn is_addressable(self) -> bool {
        matches!(
            self,
            Mode::Direct
                | Mode::IndexedByX
                | Mode::IndexedByY
                | Mode::ZpIndexedIndirect
                | Mode::ZpIndirectIndexed
        )
    }

    pub fn is_label(self) -> bool {
        matches!(self, Mode::Label | Mode::IndirectLabel)
    }

    pub fn builtin(self) -> Option<Builtin> {
        let builtin = match self {
            Mode::A => Builtin::A,
            Mode::X => Builtin::X,
            Mode::Y => Builtin::Y,
            Mode::S => Builtin::S,
            Mode::P => Builtin::P,
            Mode::Carry => Builtin::Carry,
            Mode::Interrupt => Builtin::Interrupt,
            Mode::Decimal => Builtin::Decimal,
            Mode::Overflow => Builtin::Overflow,
            Mode::Zero => Builtin::Zero,
            Mode::Negative => Builtin::Negative,
            _ => return None,
        };
        Some(builtin)
    }
}

impl From<Builtin> for Mode {
    fn from(builtin: Builtin) -> Self {
        match builtin {
            Builtin::A => Mode::A,
            Builtin::X => Mode::X,
            Builtin::Y => Mode::Y,
            Builtin::S => Mode::S,
            Builtin::P => Mode::P,
            Builtin::Carry => Mode::Carry,
            Builtin::Interrupt => Mode::Interrupt,
            Builtin::Decimal => Mode::Decimal,
            Builtin::Overflow => Mode::Overflow,
            Builtin::Zero => Mode::Zero,
            Builtin::Negative => Mode::Negative,
        }
    }
}
