//! Shorthand constructors for syntax trees, for tests and embedders.

use crate::ast::*;
use arch::mode::Mode;
use arch::reg::Builtin;

pub fn here() -> SourcePosition {
    SourcePosition::new("main.nel", 1, 1)
}

pub fn name(text: &str) -> Name {
    Name::new(text, here())
}

pub fn num(n: u16) -> Expression {
    Expression::new(ExprKind::Number(n), here())
}

/// `attr("a.b")` is the dotted reference `a.b`.
pub fn attr(path: &str) -> Expression {
    Expression::new(ExprKind::Attribute(path.split('.').map(name).collect()), here())
}

pub fn op(op: BinaryOp, left: Expression, right: Expression) -> Expression {
    let kind = ExprKind::Operation {
        op,
        left: Box::new(left),
        right: Box::new(right),
    };
    Expression::new(kind, here())
}

pub fn reg(builtin: Builtin) -> Argument {
    Argument::new(builtin.into(), None, here())
}

pub fn immediate(expr: Expression) -> Argument {
    Argument::new(Mode::Immediate, Some(expr), here())
}

pub fn direct(expr: Expression) -> Argument {
    Argument::new(Mode::Direct, Some(expr), here())
}

pub fn indexed_x(expr: Expression) -> Argument {
    Argument::new(Mode::IndexedByX, Some(expr), here())
}

pub fn indexed_y(expr: Expression) -> Argument {
    Argument::new(Mode::IndexedByY, Some(expr), here())
}

pub fn indirect_x(expr: Expression) -> Argument {
    Argument::new(Mode::ZpIndexedIndirect, Some(expr), here())
}

pub fn indirect_y(expr: Expression) -> Argument {
    Argument::new(Mode::ZpIndirectIndexed, Some(expr), here())
}

pub fn label_ref(path: &str) -> Argument {
    Argument::new(Mode::Label, Some(attr(path)), here())
}

pub fn indirect_label(path: &str) -> Argument {
    Argument::new(Mode::IndirectLabel, Some(attr(path)), here())
}

pub fn header(settings: &[(&str, u16)]) -> Statement {
    let settings = settings
        .iter()
        .map(|(key, value)| HeaderSetting {
            name: name(key),
            value: num(*value),
        })
        .collect();
    Statement::Header(HeaderStatement { settings, pos: here() })
}

/// `rom bank, dest`
pub fn rom(bank: Option<u16>, dest: Option<u16>) -> Statement {
    Statement::Relocation(RelocationStatement {
        target: Relocation::Rom {
            bank: bank.map(num),
            dest: dest.map(num),
        },
        pos: here(),
    })
}

pub fn ram(dest: u16) -> Statement {
    Statement::Relocation(RelocationStatement {
        target: Relocation::Ram { dest: num(dest) },
        pos: here(),
    })
}

pub fn label(text: &str) -> Statement {
    Statement::Label(LabelDeclaration {
        name: name(text),
        def: None,
    })
}

pub fn constant(text: &str, value: Expression) -> Statement {
    Statement::Constant(ConstantDeclaration { name: name(text), value })
}

pub fn var(width: Width, names: &[&str], array_size: Option<Expression>) -> Statement {
    Statement::Variable(VariableDeclaration {
        width,
        names: names.iter().copied().map(name).collect(),
        array_size,
        pos: here(),
    })
}

pub fn data(width: Width, items: Vec<DataItem>) -> Statement {
    Statement::Data(DataStatement { width, items, pos: here() })
}

pub fn text(text: &str) -> DataItem {
    DataItem::String {
        text: text.to_string(),
        pos: here(),
    }
}

pub fn embed(path: &str) -> Statement {
    Statement::Embed(EmbedStatement {
        path: path.to_string(),
        pos: here(),
        contents: None,
    })
}

pub fn command(kind: CommandKind, argument: Option<Argument>) -> Command {
    Command::new(kind, argument, here())
}

/// `receiver: kind argument, ...`
pub fn commands(receiver: Argument, commands: Vec<Command>) -> Statement {
    Statement::Command(CommandStatement { receiver, commands })
}

/// A single-command statement.
pub fn cmd(receiver: Argument, kind: CommandKind, argument: Option<Argument>) -> Statement {
    commands(receiver, vec![command(kind, argument)])
}

pub fn branch(kind: BranchKind, destination: Option<Argument>, condition: Option<(Builtin, bool)>) -> Statement {
    Statement::Branch(BranchStatement {
        kind,
        destination,
        condition: condition.map(|(flag, set)| BranchCondition { set, flag: reg(flag) }),
        pos: here(),
        size: None,
    })
}

pub fn goto(path: &str) -> Statement {
    branch(BranchKind::Goto, Some(label_ref(path)), None)
}

pub fn goto_when(path: &str, flag: Builtin, set: bool) -> Statement {
    branch(BranchKind::Goto, Some(label_ref(path)), Some((flag, set)))
}

pub fn call(path: &str) -> Statement {
    branch(BranchKind::Call, Some(label_ref(path)), None)
}

pub fn nop() -> Statement {
    branch(BranchKind::Nop, None, None)
}

pub fn scope(statements: Vec<Statement>) -> Statement {
    Statement::Block(BlockStatement::new(BlockKind::Scope, statements, here()))
}

pub fn package(text: &str, statements: Vec<Statement>) -> Statement {
    Statement::Block(BlockStatement::new(BlockKind::Package(name(text)), statements, here()))
}

pub fn program(statements: Vec<Statement>) -> Program {
    Program {
        statements,
        pos: here(),
    }
}
