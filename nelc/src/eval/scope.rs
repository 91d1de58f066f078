use crate::ast::{Expression, Name, SourcePosition};
use crate::diag::{Diagnostics, Outcome};
use crate::error::Error;
use arch::reg::Builtin;
use indexmap::IndexMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DefId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelState {
    Unplaced,
    Placed(u16),
}

#[derive(Debug, Clone)]
pub enum DefKind {
    Builtin(Builtin),
    /// Folded lazily, in the scope it was declared in.
    Constant { value: Expression, scope: ScopeId },
    Label(LabelState),
    Variable { offset: u16 },
    Package { scope: ScopeId },
}

#[derive(Debug, Clone)]
pub struct Definition {
    pub name: String,
    /// `None` for builtins.
    pub pos: Option<SourcePosition>,
    pub kind: DefKind,
}

impl Definition {
    pub fn new(name: impl Into<String>, pos: SourcePosition, kind: DefKind) -> Self {
        Self {
            name: name.into(),
            pos: Some(pos),
            kind,
        }
    }
}

#[derive(Debug)]
pub struct Scope {
    parent: Option<ScopeId>,
    package: Option<DefId>,
    names: IndexMap<String, DefId>,
}

/// Result of resolving a dotted attribute path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Found(DefId),
    /// Not found, and nothing was reported.
    Missing,
    /// Not found, and an error was reported.
    Failed,
}

/// Every scope and definition of a program, with the stack of entered scopes.
#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    defs: Vec<Definition>,
    /// Scope each definition was put into, by `DefId`.
    owners: Vec<ScopeId>,
    stack: Vec<ScopeId>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// Creates a table whose root scope holds the builtin registers and flags.
    pub fn new() -> Self {
        let mut table = Self {
            scopes: vec![Scope {
                parent: None,
                package: None,
                names: IndexMap::new(),
            }],
            defs: Vec::new(),
            owners: Vec::new(),
            stack: Vec::new(),
        };
        for builtin in Builtin::all() {
            let id = DefId(table.defs.len());
            table.defs.push(Definition {
                name: builtin.name().to_string(),
                pos: None,
                kind: DefKind::Builtin(builtin),
            });
            table.owners.push(ScopeId(0));
            table.scopes[0].names.insert(builtin.name().to_string(), id);
        }
        table
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn current(&self) -> ScopeId {
        self.stack.last().copied().unwrap_or(ScopeId(0))
    }

    pub fn enter(&mut self, scope: ScopeId) {
        self.stack.push(scope);
    }

    pub fn exit(&mut self) {
        self.stack.pop();
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    pub fn def(&self, id: DefId) -> &Definition {
        &self.defs[id.0]
    }

    pub fn create_scope(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            parent: Some(parent),
            package: None,
            names: IndexMap::new(),
        });
        id
    }

    /// Creates a scope under the current one and binds it to a package named `name`.
    pub fn create_package(&mut self, name: &Name, diag: &mut Diagnostics) -> Outcome<ScopeId> {
        let scope = self.create_scope(self.current());
        let def = Definition::new(&name.text, name.pos.clone(), DefKind::Package { scope });
        let id = self.put(def, diag)?;
        self.scopes[scope.0].package = Some(id);
        Ok(scope)
    }

    /// Inserts into the current scope. A redefinition is reported but still replaces the old binding.
    pub fn put(&mut self, def: Definition, diag: &mut Diagnostics) -> Outcome<DefId> {
        let scope = self.current();
        let id = DefId(self.defs.len());
        if let Some(previous) = self.scopes[scope.0].names.get(&def.name) {
            let previous = match &self.defs[previous.0].pos {
                Some(pos) => pos.to_string(),
                None => "<builtin>".to_string(),
            };
            let pos = def.pos.clone().unwrap_or_default();
            diag.error(
                Error::Redefinition {
                    name: def.name.clone(),
                    previous,
                },
                &pos,
            )?;
        }
        self.scopes[scope.0].names.insert(def.name.clone(), id);
        self.defs.push(def);
        self.owners.push(scope);
        Ok(id)
    }

    pub fn try_get(&self, scope: ScopeId, name: &str, inherit: bool) -> Option<DefId> {
        let mut cursor = Some(scope);
        while let Some(id) = cursor {
            let scope = self.scope(id);
            if let Some(def) = scope.names.get(name) {
                return Some(*def);
            }
            if !inherit {
                break;
            }
            cursor = scope.parent;
        }
        None
    }

    /// Resolves `a.b.c` left to right. Every piece but the last must name a package.
    pub fn resolve(
        &self,
        scope: ScopeId,
        path: &[Name],
        forbid_undefined: bool,
        diag: &mut Diagnostics,
    ) -> Outcome<Lookup> {
        let attribute = join(path);
        let mut cursor = scope;
        let mut inherit = true;
        for (i, piece) in path.iter().enumerate() {
            let last = i + 1 == path.len();
            let Some(id) = self.try_get(cursor, &piece.text, inherit) else {
                if !last {
                    let package = join(&path[..=i]);
                    diag.error(Error::NoPackage { package, attribute }, &piece.pos)?;
                    return Ok(Lookup::Failed);
                }
                if !forbid_undefined {
                    return Ok(Lookup::Missing);
                }
                let within = if i == 0 {
                    "the current scope".to_string()
                } else {
                    format!("the package `{}`", join(&path[..i]))
                };
                let name = piece.text.clone();
                diag.error(
                    Error::NoAttribute {
                        name,
                        within,
                        attribute,
                    },
                    &piece.pos,
                )?;
                return Ok(Lookup::Failed);
            };
            if last {
                return Ok(Lookup::Found(id));
            }
            match &self.def(id).kind {
                DefKind::Package { scope } => {
                    cursor = *scope;
                    inherit = false;
                }
                _ => {
                    let name = join(&path[..=i]);
                    diag.error(Error::NotAPackage { name, attribute }, &piece.pos)?;
                    return Ok(Lookup::Failed);
                }
            }
        }
        Ok(Lookup::Missing)
    }

    pub fn place_label(&mut self, id: DefId, addr: u16) {
        if let DefKind::Label(state) = &mut self.defs[id.0].kind {
            *state = LabelState::Placed(addr);
        }
    }

    /// The name with every package enclosing its declaration prefixed, e.g. `audio.noise.period`.
    pub fn qualified_name(&self, id: DefId) -> String {
        let mut pieces = vec![self.def(id).name.clone()];
        let mut cursor = Some(self.owners[id.0]);
        while let Some(s) = cursor {
            let scope = self.scope(s);
            if let Some(package) = scope.package {
                pieces.push(self.def(package).name.clone());
            }
            cursor = scope.parent;
        }
        pieces.reverse();
        pieces.join(".")
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

fn join(path: &[Name]) -> String {
    path.iter()
        .map(|name| name.text.as_str())
        .collect::<Vec<_>>()
        .join(".")
}
