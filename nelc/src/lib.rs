pub mod ast;
pub mod build;
pub mod compile;
pub mod config;
pub mod diag;
mod error;
pub mod eval;
pub mod linker;

pub use compile::{compile, normalize, Context, Failure, Normalized, Pass, Selection};
pub use config::Config;
pub use diag::{Abort, Diagnostic, Diagnostics, Outcome};
pub use error::Error;
pub use eval::{Folder, SymbolTable};
pub use linker::{RomBank, RomGenerator};
