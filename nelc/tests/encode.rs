use arch::reg::Builtin::*;
use nelc::ast::{BinaryOp, BranchKind, CommandKind::*, DataItem, Statement, Width};
use nelc::build::*;
use nelc::linker::HEADER_SIZE;
use nelc::Config;

/// Compiles `statements` at the start of bank 0, origin $8000, and returns the
/// bytes from there on.
fn assemble(statements: Vec<Statement>) -> Vec<u8> {
    let mut all = vec![header(&[("mapper", 0), ("prg", 1), ("chr", 1)]), rom(Some(0), Some(0x8000))];
    all.extend(statements);
    match nelc::compile(program(all), Config::quiet()) {
        Ok(bytes) => bytes[HEADER_SIZE..].to_vec(),
        Err(failure) => {
            for message in failure.messages() {
                println!("{}", message);
            }
            panic!("compilation failed with {} error(s)", failure.errors);
        }
    }
}

fn assert(statements: Vec<Statement>, expects: &[u8]) {
    let bytes = assemble(statements);
    println!("{:02X?}", &bytes[..expects.len() + 1]);
    assert_eq!(&bytes[..expects.len()], expects);
    // Everything after the code is padding.
    assert_eq!(bytes[expects.len()], 0xFF);
}

macro_rules! case {
    ($name:ident, [$($stmt:expr),* $(,)?], [$($byte:expr),* $(,)?]) => {
        #[test]
        fn $name() {
            assert(vec![$($stmt),*], &[$($byte),*]);
        }
    };
}

fn byte(n: u16) -> DataItem {
    DataItem::Expression(num(n))
}

// Transfers, spelled from either side
case!(get_x_into_a, [cmd(reg(A), Get, Some(reg(X)))], [0x8A]);
case!(put_a_into_x, [cmd(reg(X), Put, Some(reg(A)))], [0x8A]);
case!(get_a_into_y, [cmd(reg(Y), Get, Some(reg(A)))], [0xA8]);
case!(stack_pointer, [cmd(reg(S), Get, Some(reg(X))), cmd(reg(X), Get, Some(reg(S)))], [0x9A, 0xBA]);

// Loads and stores
case!(load_immediate, [cmd(reg(A), Get, Some(immediate(num(0x42))))], [0xA9, 0x42]);
case!(load_zero_page, [cmd(reg(A), Get, Some(direct(num(0xFF))))], [0xA5, 0xFF]);
case!(load_absolute, [cmd(reg(A), Get, Some(direct(num(0x100))))], [0xAD, 0x00, 0x01]);
case!(store_as_get, [cmd(direct(num(0x10)), Get, Some(reg(A)))], [0x85, 0x10]);
case!(store_as_put, [cmd(reg(A), Put, Some(direct(num(0x2000))))], [0x8D, 0x00, 0x20]);
case!(load_x_zero_page_y, [cmd(reg(X), Get, Some(indexed_y(num(0x10))))], [0xB6, 0x10]);
case!(load_y_absolute_x, [cmd(reg(Y), Get, Some(indexed_x(num(0x0300))))], [0xBC, 0x00, 0x03]);
case!(load_indirect_x, [cmd(reg(A), Get, Some(indirect_x(num(0x20))))], [0xA1, 0x20]);
case!(load_indirect_y, [cmd(reg(A), Get, Some(indirect_y(num(0x20))))], [0xB1, 0x20]);
case!(store_absolute_y, [cmd(indexed_y(num(0x10)), Get, Some(reg(A)))], [0x99, 0x10, 0x00]);

// Arithmetic and logic
case!(add_clears_carry, [cmd(reg(A), Add, Some(immediate(num(1))))], [0x18, 0x69, 0x01]);
case!(sub_sets_carry, [cmd(reg(A), Sub, Some(immediate(num(1))))], [0x38, 0xE9, 0x01]);
case!(add_with_carry, [cmd(reg(A), Addc, Some(direct(num(0x10))))], [0x65, 0x10]);
case!(sub_with_carry, [cmd(reg(A), Subc, Some(immediate(num(2))))], [0xE9, 0x02]);
case!(bitwise, [
    cmd(reg(A), Or, Some(immediate(num(1)))),
    cmd(reg(A), And, Some(immediate(num(2)))),
    cmd(reg(A), Xor, Some(immediate(num(3)))),
], [0x09, 0x01, 0x29, 0x02, 0x49, 0x03]);
case!(bit_test, [cmd(reg(A), Bit, Some(direct(num(0x2002))))], [0x2C, 0x02, 0x20]);
case!(compare_absolute_y, [cmd(reg(A), Cmp, Some(indexed_y(num(0x10))))], [0xD9, 0x10, 0x00]);
case!(compare_index, [cmd(reg(X), Cmp, Some(immediate(num(8)))), cmd(reg(Y), Cmp, Some(direct(num(4))))], [0xE0, 0x08, 0xC4, 0x04]);
case!(not, [cmd(reg(A), Not, None)], [0x49, 0xFF]);
case!(negate, [cmd(reg(A), Neg, None)], [0x18, 0x49, 0xFF, 0x69, 0x01]);

// Read-modify-write
case!(step_registers, [cmd(reg(X), Inc, None), cmd(reg(Y), Dec, None)], [0xE8, 0x88]);
case!(step_memory, [cmd(direct(num(0x10)), Inc, None), cmd(indexed_x(num(0x1234)), Dec, None)], [0xE6, 0x10, 0xDE, 0x34, 0x12]);
case!(shifts, [
    cmd(reg(A), Shl, None),
    cmd(reg(A), Shr, None),
    cmd(direct(num(0x10)), Rol, None),
    cmd(direct(num(0x300)), Ror, None),
], [0x0A, 0x4A, 0x26, 0x10, 0x6E, 0x00, 0x03]);

// Stack and flags
case!(stack, [
    cmd(reg(A), Push, None),
    cmd(reg(P), Push, None),
    cmd(reg(P), Pull, None),
    cmd(reg(A), Pull, None),
], [0x48, 0x08, 0x28, 0x68]);
case!(flags, [
    cmd(reg(P), Set, Some(reg(Carry))),
    cmd(reg(P), Set, Some(reg(Interrupt))),
    cmd(reg(P), Unset, Some(reg(Decimal))),
    cmd(reg(P), Unset, Some(reg(Overflow))),
], [0x38, 0x78, 0xD8, 0xB8]);

// Chained commands share a receiver
case!(chained, [commands(reg(A), vec![
    command(Get, Some(immediate(num(1)))),
    command(Add, Some(immediate(num(2)))),
    command(Put, Some(direct(num(0x10)))),
])], [0xA9, 0x01, 0x18, 0x69, 0x02, 0x85, 0x10]);

// Branches
case!(branch_forward, [goto_when("skip", Zero, true), nop(), label("skip")], [0xF0, 0x01, 0xEA]);
case!(branch_backward, [label("loop"), cmd(reg(X), Dec, None), goto_when("loop", Zero, false)], [0xCA, 0xD0, 0xFD]);
case!(branch_carry, [label("here"), goto_when("here", Carry, false)], [0x90, 0xFE]);
case!(jump_forward, [goto("end"), label("end")], [0x4C, 0x03, 0x80]);
case!(call_and_return, [
    call("sub"),
    branch(BranchKind::Return, None, None),
    label("sub"),
    branch(BranchKind::Resume, None, None),
], [0x20, 0x04, 0x80, 0x60, 0x40]);
case!(jump_indirect, [
    branch(BranchKind::Goto, Some(indirect_label("vector")), None),
    label("vector"),
], [0x6C, 0x03, 0x80]);

// Zero-page selection decides the size, and so every later address
case!(zero_page_boundary_low, [
    cmd(reg(A), Get, Some(direct(num(0xFF)))),
    label("after"),
    data(Width::Word, vec![DataItem::Expression(attr("after"))]),
], [0xA5, 0xFF, 0x02, 0x80]);
case!(zero_page_boundary_high, [
    cmd(reg(A), Get, Some(direct(num(0x100)))),
    label("after"),
    data(Width::Word, vec![DataItem::Expression(attr("after"))]),
], [0xAD, 0x00, 0x01, 0x03, 0x80]);
// A label not placed yet is assumed to be absolute.
case!(forward_label_is_absolute, [
    cmd(reg(A), Get, Some(direct(attr("table")))),
    label("table"),
], [0xAD, 0x03, 0x80]);

// Data
case!(data_bytes, [data(Width::Byte, vec![byte(1), text("AB"), byte(0xFF)])], [0x01, 0x41, 0x42, 0xFF]);
case!(data_words, [data(Width::Word, vec![byte(0x1234), text("A")])], [0x34, 0x12, 0x41, 0x00]);

// Constants, packages and variables
case!(constant_expression, [
    constant("base", num(0x20)),
    constant("offset", op(BinaryOp::Add, attr("base"), num(2))),
    cmd(reg(A), Get, Some(immediate(attr("offset")))),
], [0xA9, 0x22]);
case!(constant_declared_later, [
    cmd(reg(A), Get, Some(immediate(attr("late")))),
    constant("late", op(BinaryOp::Shl, num(1), num(4))),
], [0xA9, 0x10]);
case!(package_attribute, [
    package("ppu", vec![constant("ctrl", num(0x2000))]),
    cmd(reg(A), Put, Some(direct(attr("ppu.ctrl")))),
], [0x8D, 0x00, 0x20]);
case!(package_label, [
    package("sub", vec![label("entry"), branch(BranchKind::Return, None, None)]),
    call("sub.entry"),
], [0x60, 0x20, 0x00, 0x80]);
case!(variables, [
    ram(0x10),
    var(Width::Byte, &["lo", "hi"], None),
    var(Width::Word, &["table"], Some(num(4))),
    var(Width::Byte, &["after"], None),
    cmd(reg(A), Get, Some(direct(attr("hi")))),
    cmd(reg(A), Get, Some(direct(attr("after")))),
], [0xA5, 0x11, 0xA5, 0x1A]);
case!(scope_shadows, [
    constant("n", num(1)),
    scope(vec![
        constant("n", num(2)),
        cmd(reg(A), Get, Some(immediate(attr("n")))),
    ]),
    cmd(reg(A), Get, Some(immediate(attr("n")))),
], [0xA9, 0x02, 0xA9, 0x01]);
// A constant folds where it was declared, not where it is used.
case!(constant_folds_in_declaring_scope, [
    constant("n", num(1)),
    constant("m", attr("n")),
    scope(vec![
        constant("n", num(2)),
        cmd(reg(A), Get, Some(immediate(attr("m")))),
    ]),
], [0xA9, 0x01]);

// Relocation inside a bank pads the gap.
case!(relocation_pads, [
    nop(),
    rom(None, Some(0x8003)),
    nop(),
], [0xEA, 0xFF, 0xFF, 0xEA]);
