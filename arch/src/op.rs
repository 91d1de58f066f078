use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive, Display)]
#[repr(u8)]
#[strum(serialize_all = "snake_case")]
pub enum Opcode {
    // Transfers
    Tax = 0xAA,
    Tay = 0xA8,
    Tsx = 0xBA,
    Txa = 0x8A,
    Txs = 0x9A,
    Tya = 0x98,

    // Loads
    LdaImm = 0xA9,
    LdaIndX = 0xA1,
    LdaIndY = 0xB1,
    LdaZp = 0xA5,
    LdaAbs = 0xAD,
    LdaZpX = 0xB5,
    LdaAbsX = 0xBD,
    LdaAbsY = 0xB9,
    LdxImm = 0xA2,
    LdxZp = 0xA6,
    LdxAbs = 0xAE,
    LdxZpY = 0xB6,
    LdxAbsY = 0xBE,
    LdyImm = 0xA0,
    LdyZp = 0xA4,
    LdyAbs = 0xAC,
    LdyZpX = 0xB4,
    LdyAbsX = 0xBC,

    // Stores
    StaIndX = 0x81,
    StaIndY = 0x91,
    StaZp = 0x85,
    StaAbs = 0x8D,
    StaZpX = 0x95,
    StaAbsX = 0x9D,
    StaAbsY = 0x99,
    StxZp = 0x86,
    StxAbs = 0x8E,
    StxZpY = 0x96,
    StyZp = 0x84,
    StyAbs = 0x8C,
    StyZpX = 0x94,

    // Comparisons
    CmpImm = 0xC9,
    CmpIndX = 0xC1,
    CmpIndY = 0xD1,
    CmpZp = 0xC5,
    CmpAbs = 0xCD,
    CmpZpX = 0xD5,
    CmpAbsX = 0xDD,
    CmpAbsY = 0xD9,
    CpxImm = 0xE0,
    CpxZp = 0xE4,
    CpxAbs = 0xEC,
    CpyImm = 0xC0,
    CpyZp = 0xC4,
    CpyAbs = 0xCC,
    BitZp = 0x24,
    BitAbs = 0x2C,

    // Arithmetic and logic
    AdcImm = 0x69,
    AdcIndX = 0x61,
    AdcIndY = 0x71,
    AdcZp = 0x65,
    AdcAbs = 0x6D,
    AdcZpX = 0x75,
    AdcAbsX = 0x7D,
    AdcAbsY = 0x79,
    SbcImm = 0xE9,
    SbcIndX = 0xE1,
    SbcIndY = 0xF1,
    SbcZp = 0xE5,
    SbcAbs = 0xED,
    SbcZpX = 0xF5,
    SbcAbsX = 0xFD,
    SbcAbsY = 0xF9,
    OraImm = 0x09,
    OraIndX = 0x01,
    OraIndY = 0x11,
    OraZp = 0x05,
    OraAbs = 0x0D,
    OraZpX = 0x15,
    OraAbsX = 0x1D,
    OraAbsY = 0x19,
    AndImm = 0x29,
    AndIndX = 0x21,
    AndIndY = 0x31,
    AndZp = 0x25,
    AndAbs = 0x2D,
    AndZpX = 0x35,
    AndAbsX = 0x3D,
    AndAbsY = 0x39,
    EorImm = 0x49,
    EorIndX = 0x41,
    EorIndY = 0x51,
    EorZp = 0x45,
    EorAbs = 0x4D,
    EorZpX = 0x55,
    EorAbsX = 0x5D,
    EorAbsY = 0x59,

    // Increment and decrement
    Inx = 0xE8,
    Iny = 0xC8,
    IncZp = 0xE6,
    IncAbs = 0xEE,
    IncZpX = 0xF6,
    IncAbsX = 0xFE,
    Dex = 0xCA,
    Dey = 0x88,
    DecZp = 0xC6,
    DecAbs = 0xCE,
    DecZpX = 0xD6,
    DecAbsX = 0xDE,

    // Shifts and rotates
    AslA = 0x0A,
    AslZp = 0x06,
    AslAbs = 0x0E,
    AslZpX = 0x16,
    AslAbsX = 0x1E,
    LsrA = 0x4A,
    LsrZp = 0x46,
    LsrAbs = 0x4E,
    LsrZpX = 0x56,
    LsrAbsX = 0x5E,
    RolA = 0x2A,
    RolZp = 0x26,
    RolAbs = 0x2E,
    RolZpX = 0x36,
    RolAbsX = 0x3E,
    RorA = 0x6A,
    RorZp = 0x66,
    RorAbs = 0x6E,
    RorZpX = 0x76,
    RorAbsX = 0x7E,

    // Stack
    Pha = 0x48,
    Php = 0x08,
    Pla = 0x68,
    Plp = 0x28,

    // Status flags
    Sec = 0x38,
    Sei = 0x78,
    Sed = 0xF8,
    Clc = 0x18,
    Cli = 0x58,
    Cld = 0xD8,
    Clv = 0xB8,

    // Control flow
    Bcs = 0xB0,
    Bcc = 0x90,
    Beq = 0xF0,
    Bne = 0xD0,
    Bmi = 0x30,
    Bpl = 0x10,
    Bvs = 0x70,
    Bvc = 0x50,
    Jmp = 0x4C,
    JmpInd = 0x6C,
    Jsr = 0x20,
    Rts = 0x60,
    Rti = 0x40,
    Nop = 0xEA,
}

impl Opcode {
    pub fn byte(self) -> u8 {
        self.into()
    }
}

/// One instruction across the memory addressing modes it supports.
#[derive(Debug, Clone, Copy)]
pub struct Family {
    pub imm: Option<Opcode>,
    pub ind_x: Option<Opcode>,
    pub ind_y: Option<Opcode>,
    pub zp: Option<Opcode>,
    pub abs: Option<Opcode>,
    pub zp_x: Option<Opcode>,
    pub abs_x: Option<Opcode>,
    pub zp_y: Option<Opcode>,
    pub abs_y: Option<Opcode>,
}

const NONE: Family = Family {
    imm: None,
    ind_x: None,
    ind_y: None,
    zp: None,
    abs: None,
    zp_x: None,
    abs_x: None,
    zp_y: None,
    abs_y: None,
};

macro_rules! group_one {
    ($imm:ident, $ind_x:ident, $ind_y:ident, $zp:ident, $abs:ident, $zp_x:ident, $abs_x:ident, $abs_y:ident) => {
        Family {
            imm: Some(Opcode::$imm),
            ind_x: Some(Opcode::$ind_x),
            ind_y: Some(Opcode::$ind_y),
            zp: Some(Opcode::$zp),
            abs: Some(Opcode::$abs),
            zp_x: Some(Opcode::$zp_x),
            abs_x: Some(Opcode::$abs_x),
            zp_y: None,
            abs_y: Some(Opcode::$abs_y),
        }
    };
}

macro_rules! read_modify_write {
    ($zp:ident, $abs:ident, $zp_x:ident, $abs_x:ident) => {
        Family {
            zp: Some(Opcode::$zp),
            abs: Some(Opcode::$abs),
            zp_x: Some(Opcode::$zp_x),
            abs_x: Some(Opcode::$abs_x),
            ..NONE
        }
    };
}

pub const LDA: Family = group_one!(LdaImm, LdaIndX, LdaIndY, LdaZp, LdaAbs, LdaZpX, LdaAbsX, LdaAbsY);
pub const CMP: Family = group_one!(CmpImm, CmpIndX, CmpIndY, CmpZp, CmpAbs, CmpZpX, CmpAbsX, CmpAbsY);
pub const ADC: Family = group_one!(AdcImm, AdcIndX, AdcIndY, AdcZp, AdcAbs, AdcZpX, AdcAbsX, AdcAbsY);
pub const SBC: Family = group_one!(SbcImm, SbcIndX, SbcIndY, SbcZp, SbcAbs, SbcZpX, SbcAbsX, SbcAbsY);
pub const ORA: Family = group_one!(OraImm, OraIndX, OraIndY, OraZp, OraAbs, OraZpX, OraAbsX, OraAbsY);
pub const AND: Family = group_one!(AndImm, AndIndX, AndIndY, AndZp, AndAbs, AndZpX, AndAbsX, AndAbsY);
pub const EOR: Family = group_one!(EorImm, EorIndX, EorIndY, EorZp, EorAbs, EorZpX, EorAbsX, EorAbsY);

pub const STA: Family = Family {
    ind_x: Some(Opcode::StaIndX),
    ind_y: Some(Opcode::StaIndY),
    zp: Some(Opcode::StaZp),
    abs: Some(Opcode::StaAbs),
    zp_x: Some(Opcode::StaZpX),
    abs_x: Some(Opcode::StaAbsX),
    abs_y: Some(Opcode::StaAbsY),
    ..NONE
};

pub const LDX: Family = Family {
    imm: Some(Opcode::LdxImm),
    zp: Some(Opcode::LdxZp),
    abs: Some(Opcode::LdxAbs),
    zp_y: Some(Opcode::LdxZpY),
    abs_y: Some(Opcode::LdxAbsY),
    ..NONE
};

pub const LDY: Family = Family {
    imm: Some(Opcode::LdyImm),
    zp: Some(Opcode::LdyZp),
    abs: Some(Opcode::LdyAbs),
    zp_x: Some(Opcode::LdyZpX),
    abs_x: Some(Opcode::LdyAbsX),
    ..NONE
};

pub const STX: Family = Family {
    zp: Some(Opcode::StxZp),
    abs: Some(Opcode::StxAbs),
    zp_y: Some(Opcode::StxZpY),
    ..NONE
};

pub const STY: Family = Family {
    zp: Some(Opcode::StyZp),
    abs: Some(Opcode::StyAbs),
    zp_x: Some(Opcode::StyZpX),
    ..NONE
};

pub const CPX: Family = Family {
    imm: Some(Opcode::CpxImm),
    zp: Some(Opcode::CpxZp),
    abs: Some(Opcode::CpxAbs),
    ..NONE
};

pub const CPY: Family = Family {
    imm: Some(Opcode::CpyImm),
    zp: Some(Opcode::CpyZp),
    abs: Some(Opcode::CpyAbs),
    ..NONE
};

pub const BIT: Family = Family {
    zp: Some(Opcode::BitZp),
    abs: Some(Opcode::BitAbs),
    ..NONE
};

pub const INC: Family = read_modify_write!(IncZp, IncAbs, IncZpX, IncAbsX);
pub const DEC: Family = read_modify_write!(DecZp, DecAbs, DecZpX, DecAbsX);
pub const ASL: Family = read_modify_write!(AslZp, AslAbs, AslZpX, AslAbsX);
pub const LSR: Family = read_modify_write!(LsrZp, LsrAbs, LsrZpX, LsrAbsX);
pub const ROL: Family = read_modify_write!(RolZp, RolAbs, RolZpX, RolAbsX);
pub const ROR: Family = read_modify_write!(RorZp, RorAbs, RorZpX, RorAbsX);
