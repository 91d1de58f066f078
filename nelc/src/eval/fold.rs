use super::scope::{DefId, DefKind, LabelState, Lookup, ScopeId, SymbolTable};
use crate::ast::{BinaryOp, ExprKind, Expression, Folded, Name, SourcePosition};
use crate::diag::{Diagnostics, Outcome};
use crate::error::Error;

/// Nesting limit for constants defined in terms of other constants.
pub const MAX_EXPANSION_DEPTH: usize = 16;

/// Reduces expressions to 16-bit values using the bindings known so far.
pub struct Folder<'a> {
    symbols: &'a SymbolTable,
    diag: &'a mut Diagnostics,
    expansions: Vec<DefId>,
}

impl<'a> Folder<'a> {
    pub fn new(symbols: &'a SymbolTable, diag: &'a mut Diagnostics) -> Self {
        Self {
            symbols,
            diag,
            expansions: Vec::new(),
        }
    }

    /// `must_fold` reports an unresolved result as indeterminate.
    /// `forbid_undefined` reports references to missing symbols.
    pub fn fold(
        &mut self,
        expr: &Expression,
        scope: ScopeId,
        must_fold: bool,
        forbid_undefined: bool,
    ) -> Outcome<Folded> {
        if expr.cache.get() != Folded::Pending {
            return Ok(expr.cache.get());
        }
        let result = match &expr.kind {
            ExprKind::Number(n) => Folded::Value(*n),
            ExprKind::Attribute(path) => {
                self.attribute(path, &expr.pos, scope, must_fold, forbid_undefined)?
            }
            ExprKind::Operation { op, left, right } => {
                // Both sides are folded so every error surfaces at once.
                let lhs = self.fold(left, scope, must_fold, forbid_undefined)?;
                let rhs = self.fold(right, scope, must_fold, forbid_undefined)?;
                match (lhs, rhs) {
                    (Folded::Value(l), Folded::Value(r)) => self.operate(*op, l, r, &expr.pos)?,
                    (Folded::Invalid, _) | (_, Folded::Invalid) => Folded::Invalid,
                    _ => Folded::Pending,
                }
            }
        };
        expr.cache.set(result);
        Ok(result)
    }

    fn attribute(
        &mut self,
        path: &[Name],
        pos: &SourcePosition,
        scope: ScopeId,
        must_fold: bool,
        forbid_undefined: bool,
    ) -> Outcome<Folded> {
        let id = match self
            .symbols
            .resolve(scope, path, forbid_undefined, self.diag)?
        {
            Lookup::Found(id) => id,
            Lookup::Failed => return Ok(Folded::Invalid),
            Lookup::Missing => return self.unresolved(path, pos, must_fold),
        };
        let symbols = self.symbols;
        let def = symbols.def(id);
        match &def.kind {
            DefKind::Builtin(builtin) => {
                self.diag
                    .error(Error::BuiltinAsValue(builtin.to_string()), pos)?;
                Ok(Folded::Invalid)
            }
            DefKind::Package { .. } => {
                let name = symbols.qualified_name(id);
                self.diag.error(Error::PackageAsValue(name), pos)?;
                Ok(Folded::Invalid)
            }
            DefKind::Variable { offset } => Ok(Folded::Value(*offset)),
            DefKind::Label(LabelState::Placed(addr)) => Ok(Folded::Value(*addr)),
            DefKind::Label(LabelState::Unplaced) => self.unresolved(path, pos, must_fold),
            DefKind::Constant { value, scope } => {
                self.expand(id, value, *scope, pos, must_fold, forbid_undefined)
            }
        }
    }

    fn expand(
        &mut self,
        id: DefId,
        value: &Expression,
        scope: ScopeId,
        pos: &SourcePosition,
        must_fold: bool,
        forbid_undefined: bool,
    ) -> Outcome<Folded> {
        if self.expansions.len() >= MAX_EXPANSION_DEPTH {
            let mut chain = String::new();
            for id in self.expansions.iter().chain(std::iter::once(&id)) {
                let def = self.symbols.def(*id);
                let at = def.pos.as_ref().map(|p| p.to_string()).unwrap_or_default();
                chain.push_str(&format!("\n    `{}` at {}", def.name, at));
            }
            let error = Error::TooManyExpansions {
                depth: MAX_EXPANSION_DEPTH,
                chain,
            };
            return Err(self.diag.fatal(error, pos));
        }
        self.expansions.push(id);
        let result = self.fold(value, scope, must_fold, forbid_undefined);
        self.expansions.pop();
        result
    }

    fn unresolved(&mut self, path: &[Name], pos: &SourcePosition, must_fold: bool) -> Outcome<Folded> {
        if !must_fold {
            return Ok(Folded::Pending);
        }
        let name = path
            .iter()
            .map(|piece| piece.text.as_str())
            .collect::<Vec<_>>()
            .join(".");
        self.diag.error(Error::Indeterminate(name), pos)?;
        Ok(Folded::Invalid)
    }

    fn operate(&mut self, op: BinaryOp, l: u16, r: u16, pos: &SourcePosition) -> Outcome<Folded> {
        let (l, r) = (l as u32, r as u32);
        let value = match op {
            BinaryOp::Mul => Some(l * r).filter(|v| *v <= 0xFFFF).ok_or(Error::Overflow("multiplication")),
            BinaryOp::Div if r == 0 => Err(Error::DivisionByZero),
            BinaryOp::Div => Ok(l / r),
            BinaryOp::Mod if r == 0 => Err(Error::ModuloByZero),
            BinaryOp::Mod => Ok(l % r),
            BinaryOp::Add => Some(l + r).filter(|v| *v <= 0xFFFF).ok_or(Error::Overflow("addition")),
            BinaryOp::Sub => l.checked_sub(r).ok_or(Error::Underflow),
            BinaryOp::Shl if r > 16 || (l << r) > 0xFFFF => Err(Error::Overflow("logical shift left")),
            BinaryOp::Shl => Ok(l << r),
            BinaryOp::Shr => Ok(l.checked_shr(r).unwrap_or(0)),
            BinaryOp::And => Ok(l & r),
            BinaryOp::Xor => Ok(l ^ r),
            BinaryOp::Or => Ok(l | r),
        };
        match value {
            Ok(value) => Ok(Folded::Value(value as u16)),
            Err(error) => {
                self.diag.error(error, pos)?;
                Ok(Folded::Invalid)
            }
        }
    }
}
