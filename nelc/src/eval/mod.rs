pub mod fold;
pub mod scope;

pub use fold::{Folder, MAX_EXPANSION_DEPTH};
pub use scope::{DefId, DefKind, Definition, LabelState, Lookup, Scope, ScopeId, SymbolTable};
