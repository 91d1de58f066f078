mod expr;
mod stmt;

pub use expr::{BinaryOp, ExprKind, Expression, Folded};
pub use stmt::{
    Argument, BlockKind, BlockStatement, BranchCondition, BranchKind, BranchStatement, Command,
    CommandKind, CommandStatement, ConstantDeclaration, DataItem, DataStatement, EmbedStatement,
    HeaderSetting, HeaderStatement, LabelDeclaration, Program, Relocation, RelocationStatement,
    Statement, VariableDeclaration, Width,
};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourcePosition {
    pub file: String,
    pub line: usize,
    pub col: usize,
}

impl SourcePosition {
    pub fn new(file: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            file: file.into(),
            line,
            col,
        }
    }

    /// Resolves `path` against the directory of this position's file.
    pub fn sibling(&self, path: &str) -> PathBuf {
        let dir = Path::new(&self.file).parent().unwrap_or_else(|| Path::new(""));
        dir.join(path)
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}[{}]", self.file, self.line, self.col)
    }
}

/// An identifier as written, with where it was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    pub text: String,
    #[serde(default)]
    pub pos: SourcePosition,
}

impl Name {
    pub fn new(text: impl Into<String>, pos: SourcePosition) -> Self {
        Self {
            text: text.into(),
            pos,
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
