use crate::ast::CommandKind;
use thiserror::Error;

// Every message the compiler can report
#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),

    #[error("Failed to parse `{0}`: {1}")]
    Yaml(String, #[source] serde_yaml::Error),

    #[error("too many errors ({0}), giving up")]
    TooManyErrors(usize),

    #[error("internal error: {0}")]
    Internal(String),

    // Symbols
    #[error("redefinition of symbol `{name}`, previously defined at {previous}")]
    Redefinition { name: String, previous: String },

    #[error("`{name}` is not a package but was treated as one, when trying to get attribute `{attribute}`")]
    NotAPackage { name: String, attribute: String },

    #[error("no package named `{package}` exists, needed to get attribute `{attribute}`")]
    NoPackage { package: String, attribute: String },

    #[error("no attribute named `{name}` exists in {within}, needed to get attribute `{attribute}`")]
    NoAttribute {
        name: String,
        within: String,
        attribute: String,
    },

    // Constant folding
    #[error("too many constant expansions required (exceeded max depth {depth}). are there mutually-dependent constants?{chain}")]
    TooManyExpansions { depth: usize, chain: String },

    #[error("{0} yields result which will overflow outside of 0..65535.")]
    Overflow(&'static str),

    #[error("subtraction yields result which will underflow outside of 0..65535.")]
    Underflow,

    #[error("division by zero is undefined.")]
    DivisionByZero,

    #[error("modulo by zero is undefined.")]
    ModuloByZero,

    #[error("package `{0}` may not be directly used in a numeric expression because it's a scope, not a value")]
    PackageAsValue(String),

    #[error("`{0}` is a register or flag and may not be used in a numeric expression")]
    BuiltinAsValue(String),

    #[error("attribute `{0}` has an indeterminate value.")]
    Indeterminate(String),

    // Rom and ram layout
    #[error("no origin point was set before bank was expanded.")]
    NoOrigin,

    #[error("bank's position went outside of addressable memory 0..65535 (attempted to expand to position = {0})")]
    AddressSpace(u32),

    #[error("bank expanded beyond its {capacity} byte boundary by {excess} bytes")]
    BankOverflow { capacity: usize, excess: usize },

    #[error("attempt to move backwards within the bank. (location {from:#06x} -> {to:#06x})")]
    MoveBackwards { from: u32, to: u32 },

    #[error("attempt to move outside of bank's reserved space.")]
    SeekOutside,

    #[error("attempt to write outside of bank's reserved space.")]
    WriteOutside,

    #[error("value {0} is outside of representable 8-bit range 0..255")]
    ByteRange(u16),

    #[error("bank {index} is out of range (the rom has {count} banks)")]
    BankIndex { index: u16, count: usize },

    #[error("ram counter went outside of addressable memory 0..65535 (attempted to expand to position = {0})")]
    RamOverflow(u32),

    #[error("variable declaration found, but the ram counter has not been set by a ram relocation yet")]
    NoRamCounter,

    // Header
    #[error("multiple ines headers found")]
    MultipleHeaders,

    #[error("ines header may only appear in the outermost block of the program")]
    HeaderInBlock,

    #[error("only constant declarations may appear before the ines header")]
    StatementBeforeHeader,

    #[error("no ines header found.")]
    MissingHeader,

    #[error("unrecognized ines header setting `{0}`")]
    UnknownSetting(String),

    #[error("duplicate ines header setting `{0}`")]
    DuplicateSetting(String),

    #[error("missing required ines header setting `{0}`")]
    MissingSetting(&'static str),

    #[error("ines header setting `{name}` = {value} is outside of allowed range {min}..{max}")]
    SettingRange {
        name: &'static str,
        value: u16,
        min: u16,
        max: u16,
    },

    #[error("ines header is invalid")]
    InvalidHeader,

    // Relocation
    #[error("could not resolve the destination address provided to this ram relocation statement")]
    UnresolvedRam,

    #[error("could not resolve the bank number provided to this rom relocation statement")]
    UnresolvedBank,

    #[error("could not resolve the destination address provided to this rom relocation statement")]
    UnresolvedRom,

    #[error("{0} found, but a rom bank hasn't been selected yet")]
    NoBank(&'static str),

    #[error("label declaration found, but the active bank has no origin yet")]
    LabelWithoutOrigin,

    #[error("label `{0}` would be placed outside of addressable memory 0..65535")]
    LabelOutOfRange(String),

    // Declarations and data
    #[error("array size of a variable declaration must be at least 1")]
    EmptyArray,

    #[error("could not read embedded file `{0}`: {1}")]
    Embed(String, #[source] std::io::Error),

    // Commands and branches
    #[error("invalid `{kind}` command{converted}: {reason}")]
    InvalidCommand {
        kind: CommandKind,
        converted: String,
        reason: &'static str,
    },

    #[error("`{0}` is not a valid branch condition; it must be the p-flag `carry`, `zero`, `negative`, or `overflow`")]
    BranchFlag(String),

    #[error("indirect jumps may not have a condition")]
    ConditionalIndirect,

    #[error("call destination may not be an indirect label")]
    IndirectCall,

    #[error("`{kind}` destination must be a label, found `{found}`")]
    BranchDestination { kind: String, found: String },

    #[error("relative jump is outside of range -128..127 (offset = {0})")]
    RelativeRange(i32),
}
