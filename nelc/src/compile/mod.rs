mod block;
mod branch;
mod command;
mod data;
mod declare;
mod header;
mod relocate;
pub mod select;

pub use select::{normalize, Encoding, Normalized, Operand, Selection, Side};

use crate::ast::{BlockKind, BlockStatement, Expression, Folded, Program, SourcePosition, Statement};
use crate::config::Config;
use crate::diag::{Abort, Diagnostic, Diagnostics, Outcome};
use crate::error::Error;
use crate::eval::{Folder, ScopeId, SymbolTable};
use crate::linker::{RomBank, RomGenerator};

/// State shared by every pass over the tree.
pub struct Context {
    pub symbols: SymbolTable,
    pub diag: Diagnostics,
    pub config: Config,
    rom: Option<RomGenerator>,
}

impl Context {
    pub fn new(config: Config) -> Self {
        Self {
            symbols: SymbolTable::new(),
            diag: Diagnostics::new(&config),
            config,
            rom: None,
        }
    }

    /// Runs `f` with `scope` entered, leaving it again on every path.
    pub fn within<T>(&mut self, scope: ScopeId, f: impl FnOnce(&mut Self) -> Outcome<T>) -> Outcome<T> {
        self.symbols.enter(scope);
        let result = f(self);
        self.symbols.exit();
        result
    }

    /// Folds in the current scope.
    pub fn fold(&mut self, expr: &Expression, must_fold: bool, forbid_undefined: bool) -> Outcome<Option<u16>> {
        let scope = self.symbols.current();
        let folded = Folder::new(&self.symbols, &mut self.diag).fold(expr, scope, must_fold, forbid_undefined)?;
        Ok(match folded {
            Folded::Value(value) => Some(value),
            Folded::Pending | Folded::Invalid => None,
        })
    }

    pub fn error(&mut self, error: Error, pos: &SourcePosition) -> Outcome<()> {
        self.diag.error(error, pos)
    }

    pub fn fatal(&mut self, error: Error, pos: &SourcePosition) -> Abort {
        self.diag.fatal(error, pos)
    }

    pub fn rom(&self) -> Option<&RomGenerator> {
        self.rom.as_ref()
    }

    pub(crate) fn install(&mut self, rom: RomGenerator) {
        self.rom = Some(rom);
    }

    pub(crate) fn rom_mut(&mut self, pos: &SourcePosition) -> Outcome<(&mut RomGenerator, &mut Diagnostics)> {
        match self.rom.as_mut() {
            Some(rom) => Ok((rom, &mut self.diag)),
            None => Err(self.diag.internal("rom layout used before the ines header was resolved", pos)),
        }
    }

    /// The active bank; `what` names the statement that needs one.
    pub(crate) fn bank(&mut self, what: &'static str, pos: &SourcePosition) -> Outcome<(&mut RomBank, &mut Diagnostics)> {
        let (rom, diag) = self.rom_mut(pos)?;
        match rom.active_bank_mut() {
            Some(bank) => Ok((bank, diag)),
            None => Err(diag.fatal(Error::NoBank(what), pos)),
        }
    }

    pub(crate) fn reserve(&mut self, what: &'static str, amount: usize, pos: &SourcePosition) -> Outcome<()> {
        let (bank, diag) = self.bank(what, pos)?;
        bank.expand(amount, pos, diag)
    }

    pub(crate) fn write_byte(&mut self, value: u16, pos: &SourcePosition) -> Outcome<()> {
        let (bank, diag) = self.bank("data", pos)?;
        bank.write_byte(value, pos, diag)
    }

    pub(crate) fn write_word(&mut self, value: u16, pos: &SourcePosition) -> Outcome<()> {
        let (bank, diag) = self.bank("data", pos)?;
        bank.write_word(value, pos, diag)
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8], pos: &SourcePosition) -> Outcome<()> {
        let (bank, diag) = self.bank("data", pos)?;
        bank.write_bytes(bytes, pos, diag)
    }

    pub(crate) fn trace(&self, line: impl FnOnce() -> String) {
        if self.config.verbose {
            println!(" * {}", line());
        }
    }
}

/// One visit per pass, in tree order.
pub trait Pass {
    /// Collects declarations into the symbol table.
    fn gather(&mut self, _ctx: &mut Context) -> Outcome<()> {
        Ok(())
    }

    /// Reserves space and places labels.
    fn size(&mut self, _ctx: &mut Context) -> Outcome<()> {
        Ok(())
    }

    /// Writes bytes into the space reserved by `size`.
    fn emit(&mut self, _ctx: &mut Context) -> Outcome<()> {
        Ok(())
    }
}

impl Pass for Statement {
    fn gather(&mut self, ctx: &mut Context) -> Outcome<()> {
        match self {
            Statement::Block(s) => s.gather(ctx),
            Statement::Header(_) => Ok(()),
            Statement::Relocation(s) => s.gather(ctx),
            Statement::Label(s) => s.gather(ctx),
            Statement::Constant(s) => s.gather(ctx),
            Statement::Variable(s) => s.gather(ctx),
            Statement::Data(_) | Statement::Command(_) | Statement::Branch(_) | Statement::Embed(_) => Ok(()),
        }
    }

    fn size(&mut self, ctx: &mut Context) -> Outcome<()> {
        match self {
            Statement::Block(s) => s.size(ctx),
            Statement::Relocation(s) => s.size(ctx),
            Statement::Label(s) => s.size(ctx),
            Statement::Data(s) => s.size(ctx),
            Statement::Embed(s) => s.size(ctx),
            Statement::Command(s) => s.size(ctx),
            Statement::Branch(s) => s.size(ctx),
            Statement::Header(_) | Statement::Constant(_) | Statement::Variable(_) => Ok(()),
        }
    }

    fn emit(&mut self, ctx: &mut Context) -> Outcome<()> {
        match self {
            Statement::Block(s) => s.emit(ctx),
            Statement::Relocation(s) => s.emit(ctx),
            Statement::Data(s) => s.emit(ctx),
            Statement::Embed(s) => s.emit(ctx),
            Statement::Command(s) => s.emit(ctx),
            Statement::Branch(s) => s.emit(ctx),
            Statement::Header(_) | Statement::Label(_) | Statement::Constant(_) | Statement::Variable(_) => Ok(()),
        }
    }
}

/// Everything reported by a compilation that did not produce a rom.
#[derive(Debug, Clone)]
pub struct Failure {
    pub errors: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl Failure {
    pub fn messages(&self) -> Vec<String> {
        self.diagnostics.iter().map(|d| d.message.clone()).collect()
    }
}

/// Compiles a parsed program into an ines rom image.
pub fn compile(program: Program, config: Config) -> Result<Vec<u8>, Failure> {
    let mut ctx = Context::new(config);
    let mut main = BlockStatement::new(BlockKind::Main, program.statements, program.pos);
    let outcome = run(&mut main, &mut ctx);
    let Context { diag, .. } = ctx;
    match outcome {
        Ok(rom) if diag.is_clean() => Ok(rom),
        _ => Err(Failure {
            errors: diag.count(),
            diagnostics: diag.into_reported(),
        }),
    }
}

fn run(main: &mut BlockStatement, ctx: &mut Context) -> Outcome<Vec<u8>> {
    main.gather(ctx)?;
    ctx.trace(|| format!("gathered {} definitions", ctx.symbols.len()));

    main.size(ctx)?;
    if let Some(rom) = ctx.rom() {
        for (index, bank) in rom.banks().iter().enumerate() {
            if let Some(origin) = bank.origin() {
                ctx.trace(|| format!("bank {}: origin ${:04X}, {} bytes reserved", index, origin, bank.reserved()));
            }
        }
    }

    let (rom, _) = ctx.rom_mut(&main.pos)?;
    rom.reset_rom_position();
    main.emit(ctx)?;

    let (rom, _) = ctx.rom_mut(&main.pos)?;
    Ok(rom.to_bytes())
}
