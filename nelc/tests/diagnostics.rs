use arch::reg::Builtin::*;
use nelc::ast::{BinaryOp, BranchKind, CommandKind::*, DataItem, Statement, Width};
use nelc::build::*;
use nelc::{Config, Failure};

fn minimal() -> Vec<Statement> {
    vec![header(&[("mapper", 0), ("prg", 1), ("chr", 1)]), rom(Some(0), Some(0x8000))]
}

fn reject(statements: Vec<Statement>, config: Config) -> Failure {
    match nelc::compile(program(statements), config) {
        Ok(_) => panic!("compilation unexpectedly succeeded"),
        Err(failure) => {
            for message in failure.messages() {
                println!("{}", message);
            }
            failure
        }
    }
}

/// Compiles after the minimal preamble and checks every expected fragment
/// shows up, in order, in the reported messages.
fn assert(statements: Vec<Statement>, expects: &[&str]) {
    let mut all = minimal();
    all.extend(statements);
    let failure = reject(all, Config::quiet());
    assert_messages(&failure, expects);
}

fn assert_messages(failure: &Failure, expects: &[&str]) {
    let messages = failure.messages();
    assert!(messages.len() >= expects.len(), "expected at least {} messages", expects.len());
    for (message, expect) in messages.iter().zip(expects) {
        assert!(message.contains(expect), "`{}` does not contain `{}`", message, expect);
    }
}

macro_rules! case {
    ($name:ident, [$($stmt:expr),* $(,)?], [$($expect:expr),* $(,)?]) => {
        #[test]
        fn $name() {
            assert(vec![$($stmt),*], &[$($expect),*]);
        }
    };
}

fn expr(item: nelc::ast::Expression) -> DataItem {
    DataItem::Expression(item)
}

// Symbols
case!(label_redefinition, [label("start"), nop(), label("start")], ["redefinition of symbol `start`, previously defined at main.nel:1[1]"]);
case!(undefined_symbol, [data(Width::Byte, vec![expr(attr("missing"))])], ["no attribute named `missing` exists in the current scope"]);
case!(missing_package, [data(Width::Byte, vec![expr(attr("gfx.tiles"))])], ["no package named `gfx` exists, needed to get attribute `gfx.tiles`"]);
case!(not_a_package, [constant("n", num(1)), data(Width::Byte, vec![expr(attr("n.m"))])], ["`n` is not a package"]);
case!(package_as_value, [package("gfx", vec![]), data(Width::Byte, vec![expr(attr("gfx"))])], ["package `gfx` may not be directly used"]);
case!(package_named_where_declared, [
    package("gfx", vec![]),
    package("foo", vec![data(Width::Byte, vec![expr(attr("gfx"))])]),
], ["package `gfx` may not be directly used"]);
case!(mutual_constants, [
    constant("a", attr("b")),
    constant("b", attr("a")),
    data(Width::Byte, vec![expr(attr("a"))]),
], ["too many constant expansions required (exceeded max depth 16)"]);

// Arithmetic
case!(overflow, [data(Width::Word, vec![expr(op(BinaryOp::Add, num(0xFFFF), num(1)))])], ["addition yields result which will overflow"]);
case!(underflow, [data(Width::Word, vec![expr(op(BinaryOp::Sub, num(1), num(2)))])], ["subtraction yields result which will underflow"]);
case!(division_by_zero, [data(Width::Word, vec![expr(op(BinaryOp::Div, num(1), num(0)))])], ["division by zero"]);
case!(modulo_by_zero, [data(Width::Word, vec![expr(op(BinaryOp::Mod, num(1), num(0)))])], ["modulo by zero"]);
case!(byte_range, [data(Width::Byte, vec![expr(num(0x100))])], ["value 256 is outside of representable 8-bit range"]);

// Commands and branches
case!(store_immediate, [cmd(reg(A), Put, Some(immediate(num(1))))], ["invalid `put` command"]);
case!(get_into_immediate, [cmd(immediate(num(1)), Get, Some(reg(A)))], ["receiver must be the register"]);
case!(memory_pair, [cmd(direct(num(1)), Get, Some(direct(num(2))))], ["may not both be memory terms"]);
case!(swapped_store_reports_source, [cmd(direct(num(0x10)), Put, Some(reg(S)))], ["(converted from `@16: put s`)"]);
case!(bad_branch_flag, [goto_when("here", Decimal, true), label("here")], ["`decimal` is not a valid branch condition"]);
case!(indirect_call, [branch(BranchKind::Call, Some(indirect_label("vec")), None), label("vec")], ["call destination may not be an indirect label"]);
case!(conditional_indirect, [
    branch(BranchKind::Goto, Some(indirect_label("vec")), Some((Carry, true))),
    label("vec"),
], ["indirect jumps may not have a condition"]);
case!(branch_to_register, [branch(BranchKind::Goto, Some(reg(A)), None)], ["`goto` destination must be a label, found `a`"]);
case!(relative_range, [
    goto_when("far", Zero, true),
    data(Width::Byte, vec![expr(num(0)); 200]),
    label("far"),
], ["relative jump is outside of range -128..127 (offset = 200)"]);
case!(undefined_branch_target, [goto("nowhere")], ["no attribute named `nowhere`"]);

// Layout
case!(bank_overflow, [rom(None, Some(0xA001))], ["bank expanded beyond its 8192 byte boundary by 1 bytes"]);
case!(move_backwards, [nop(), rom(None, Some(0x7000))], ["attempt to move backwards within the bank. (location 0x8001 -> 0x7000)"]);
case!(bank_index, [rom(Some(3), None)], ["bank 3 is out of range (the rom has 3 banks)"]);
case!(address_space, [rom(Some(1), Some(0xFFFF)), data(Width::Word, vec![expr(num(0))])], ["outside of addressable memory 0..65535 (attempted to expand to position = 65537)"]);
case!(variable_without_ram, [var(Width::Byte, &["v"], None)], ["ram counter has not been set"]);
case!(empty_array, [ram(0), var(Width::Byte, &["v"], Some(num(0)))], ["array size of a variable declaration must be at least 1"]);
case!(unresolved_ram, [ram_at("later"), label("later")], ["attribute `later` has an indeterminate value", "could not resolve the destination address provided to this ram relocation"]);
case!(missing_embed, [embed("/nonexistent/nelc/tiles.chr")], ["could not read embedded file `/nonexistent/nelc/tiles.chr`"]);

fn ram_at(path: &str) -> Statement {
    use nelc::ast::{Relocation, RelocationStatement};
    Statement::Relocation(RelocationStatement {
        target: Relocation::Ram { dest: attr(path) },
        pos: here(),
    })
}

// Header
#[test]
fn missing_header() {
    let failure = reject(vec![nop(), header(&[("mapper", 0), ("prg", 1), ("chr", 1)])], Config::quiet());
    assert_messages(&failure, &["only constant declarations may appear before the ines header"]);

    let failure = reject(vec![constant("n", num(1))], Config::quiet());
    assert_messages(&failure, &["no ines header found."]);
}

#[test]
fn header_settings() {
    let failure = reject(vec![header(&[("mapper", 0), ("prg", 0), ("chr", 1), ("speed", 2)])], Config::quiet());
    assert_messages(
        &failure,
        &[
            "ines header setting `prg` = 0 is outside of allowed range 1..255",
            "unrecognized ines header setting `speed`",
            "ines header is invalid",
        ],
    );

    let failure = reject(vec![header(&[("mapper", 0), ("prg", 1)])], Config::quiet());
    assert_messages(&failure, &["missing required ines header setting `chr`", "ines header is invalid"]);
}

#[test]
fn header_placement() {
    let mut statements = minimal();
    statements.push(header(&[("mapper", 0), ("prg", 1), ("chr", 1)]));
    assert_messages(&reject(statements, Config::quiet()), &["multiple ines headers found"]);

    let mut statements = minimal();
    statements.push(scope(vec![header(&[("mapper", 0), ("prg", 1), ("chr", 1)])]));
    assert_messages(&reject(statements, Config::quiet()), &["ines header may only appear in the outermost block"]);
}

#[test]
fn errors_accumulate() {
    let mut statements = minimal();
    statements.push(cmd(reg(A), Put, Some(immediate(num(1)))));
    statements.push(label("ok"));
    statements.push(cmd(reg(X), Get, Some(indirect_x(num(1)))));
    let failure = reject(statements, Config::quiet());
    assert_eq!(failure.errors, 2);
    assert!(failure.diagnostics.iter().all(|d| !d.fatal));
}

#[test]
fn error_limit() {
    let mut statements = minimal();
    for _ in 0..40 {
        statements.push(cmd(reg(A), Put, Some(immediate(num(1)))));
    }
    let config = Config {
        error_limit: 5,
        ..Config::quiet()
    };
    let failure = reject(statements, config);
    assert_eq!(failure.errors, 5);
    let last = failure.diagnostics.last().map(|d| d.to_string()).unwrap_or_default();
    assert_eq!(last, "fatal: too many errors (5), giving up");
}

#[test]
fn positions_in_messages() {
    let mut statements = minimal();
    statements.push(data(Width::Byte, vec![expr(num(0x100))]));
    let failure = reject(statements, Config::quiet());
    let first = failure.diagnostics[0].to_string();
    assert_eq!(first, "main.nel:1[1]: value 256 is outside of representable 8-bit range 0..255");
}
