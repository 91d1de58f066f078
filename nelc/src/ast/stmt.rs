use super::{Expression, Name, SourcePosition};
use crate::compile::Selection;
use crate::eval::{DefId, ScopeId};
use arch::mode::Mode;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::Display;

/// The outermost block of a compilation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Program {
    pub statements: Vec<Statement>,
    #[serde(default)]
    pub pos: SourcePosition,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "statement", rename_all = "snake_case")]
pub enum Statement {
    Block(BlockStatement),
    Header(HeaderStatement),
    Relocation(RelocationStatement),
    Label(LabelDeclaration),
    Constant(ConstantDeclaration),
    Variable(VariableDeclaration),
    Data(DataStatement),
    Command(CommandStatement),
    Branch(BranchStatement),
    Embed(EmbedStatement),
}

impl Statement {
    pub fn pos(&self) -> &SourcePosition {
        match self {
            Statement::Block(s) => &s.pos,
            Statement::Header(s) => &s.pos,
            Statement::Relocation(s) => &s.pos,
            Statement::Label(s) => &s.name.pos,
            Statement::Constant(s) => &s.name.pos,
            Statement::Variable(s) => &s.pos,
            Statement::Data(s) => &s.pos,
            Statement::Command(s) => &s.receiver.pos,
            Statement::Branch(s) => &s.pos,
            Statement::Embed(s) => &s.pos,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// The implicit block around the whole program.
    Main,
    /// `begin ... end`
    Scope,
    /// `package name begin ... end`
    Package(Name),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockStatement {
    pub kind: BlockKind,
    pub statements: Vec<Statement>,
    #[serde(default)]
    pub pos: SourcePosition,
    #[serde(skip)]
    pub(crate) scope: Option<ScopeId>,
}

impl BlockStatement {
    pub fn new(kind: BlockKind, statements: Vec<Statement>, pos: SourcePosition) -> Self {
        Self {
            kind,
            statements,
            pos,
            scope: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderSetting {
    pub name: Name,
    pub value: Expression,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderStatement {
    pub settings: Vec<HeaderSetting>,
    #[serde(default)]
    pub pos: SourcePosition,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relocation {
    /// `rom bank, dest` / `rom dest`
    Rom {
        #[serde(default)]
        bank: Option<Expression>,
        #[serde(default)]
        dest: Option<Expression>,
    },
    /// `ram dest`
    Ram { dest: Expression },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelocationStatement {
    pub target: Relocation,
    #[serde(default)]
    pub pos: SourcePosition,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelDeclaration {
    pub name: Name,
    #[serde(skip)]
    pub(crate) def: Option<DefId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstantDeclaration {
    pub name: Name,
    pub value: Expression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "lowercase")]
pub enum Width {
    Byte,
    Word,
}

impl Width {
    pub fn bytes(self) -> usize {
        match self {
            Width::Byte => 1,
            Width::Word => 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableDeclaration {
    pub width: Width,
    pub names: Vec<Name>,
    #[serde(default)]
    pub array_size: Option<Expression>,
    #[serde(default)]
    pub pos: SourcePosition,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataItem {
    Expression(Expression),
    String {
        text: String,
        #[serde(default)]
        pos: SourcePosition,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataStatement {
    pub width: Width,
    pub items: Vec<DataItem>,
    #[serde(default)]
    pub pos: SourcePosition,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedStatement {
    pub path: String,
    #[serde(default)]
    pub pos: SourcePosition,
    #[serde(skip)]
    pub(crate) contents: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "lowercase")]
pub enum CommandKind {
    Get,
    Put,
    Add,
    Addc,
    Sub,
    Subc,
    Or,
    And,
    Xor,
    Cmp,
    Bit,
    Inc,
    Dec,
    Not,
    Neg,
    Shl,
    Shr,
    Rol,
    Ror,
    Push,
    Pull,
    Set,
    Unset,
}

impl CommandKind {
    /// Whether the command transfers between its receiver and an argument.
    pub fn takes_argument(self) -> bool {
        use CommandKind::*;
        matches!(
            self,
            Get | Put | Add | Addc | Sub | Subc | Or | And | Xor | Cmp | Bit | Set | Unset
        )
    }
}

/// An operand with its addressing mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Argument {
    pub mode: Mode,
    #[serde(default)]
    pub expr: Option<Expression>,
    #[serde(default)]
    pub pos: SourcePosition,
}

impl Argument {
    pub fn new(mode: Mode, expr: Option<Expression>, pos: SourcePosition) -> Self {
        Self { mode, expr, pos }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(expr) = &self.expr else {
            return write!(f, "{}", self.mode);
        };
        match self.mode {
            Mode::Label => write!(f, "{}", expr),
            Mode::IndirectLabel => write!(f, "[{}]", expr),
            Mode::Immediate => write!(f, "#{}", expr),
            Mode::Direct => write!(f, "@{}", expr),
            Mode::IndexedByX => write!(f, "@{}[x]", expr),
            Mode::IndexedByY => write!(f, "@{}[y]", expr),
            Mode::ZpIndexedIndirect => write!(f, "@[{}[x]]", expr),
            Mode::ZpIndirectIndexed => write!(f, "@[{}][y]", expr),
            mode => write!(f, "{}", mode),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Command {
    pub kind: CommandKind,
    #[serde(default)]
    pub argument: Option<Argument>,
    #[serde(default)]
    pub pos: SourcePosition,
    #[serde(skip)]
    pub(crate) selection: Option<Selection>,
}

impl Command {
    pub fn new(kind: CommandKind, argument: Option<Argument>, pos: SourcePosition) -> Self {
        Self {
            kind,
            argument,
            pos,
            selection: None,
        }
    }
}

/// `receiver: cmd arg, cmd arg, ...`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandStatement {
    pub receiver: Argument,
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "lowercase")]
pub enum BranchKind {
    Nop,
    Goto,
    Call,
    Return,
    Resume,
}

/// `when [not] flag`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchCondition {
    #[serde(default = "default_true")]
    pub set: bool,
    pub flag: Argument,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchStatement {
    pub kind: BranchKind,
    #[serde(default)]
    pub destination: Option<Argument>,
    #[serde(default)]
    pub condition: Option<BranchCondition>,
    #[serde(default)]
    pub pos: SourcePosition,
    #[serde(skip)]
    pub(crate) size: Option<usize>,
}
