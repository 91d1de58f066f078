use super::{Name, SourcePosition};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    #[strum(serialize = "*")]
    Mul,
    #[strum(serialize = "/")]
    Div,
    #[strum(serialize = "%")]
    Mod,
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "<<")]
    Shl,
    #[strum(serialize = ">>")]
    Shr,
    #[strum(serialize = "&")]
    And,
    #[strum(serialize = "^")]
    Xor,
    #[strum(serialize = "|")]
    Or,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExprKind {
    Number(u16),
    /// Dotted path such as `sound.channel.base`.
    Attribute(Vec<Name>),
    Operation {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
}

/// Memoized outcome of folding an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Folded {
    /// Not folded yet, or depends on something not known yet.
    #[default]
    Pending,
    Value(u16),
    /// Folding reported an error; it is not retried.
    Invalid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expression {
    pub kind: ExprKind,
    #[serde(default)]
    pub pos: SourcePosition,
    #[serde(skip)]
    pub(crate) cache: Cell<Folded>,
}

impl Expression {
    pub fn new(kind: ExprKind, pos: SourcePosition) -> Self {
        Self {
            kind,
            pos,
            cache: Cell::new(Folded::Pending),
        }
    }

    /// The value, if folding already succeeded.
    pub fn value(&self) -> Option<u16> {
        match self.cache.get() {
            Folded::Value(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Number(n) => write!(f, "{}", n),
            ExprKind::Attribute(path) => {
                for (i, piece) in path.iter().enumerate() {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(&piece.text)?;
                }
                Ok(())
            }
            ExprKind::Operation { op, left, right } => write!(f, "({} {} {})", left, op, right),
        }
    }
}
