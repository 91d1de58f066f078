use nelc::ast::{DataItem, Program, Width};
use nelc::build::*;
use nelc::linker::{BANK_SIZE, HEADER_SIZE, INES_MAGIC};
use nelc::Config;

fn assert(program: Program) -> Vec<u8> {
    match nelc::compile(program, Config::quiet()) {
        Ok(bytes) => bytes,
        Err(failure) => {
            for message in failure.messages() {
                println!("{}", message);
            }
            panic!("compilation failed with {} error(s)", failure.errors);
        }
    }
}

#[test]
fn minimal_rom() {
    let rom = assert(program(vec![header(&[("mapper", 0), ("prg", 1), ("chr", 1)])]));
    assert_eq!(rom.len(), HEADER_SIZE + 3 * BANK_SIZE);
    assert_eq!(rom[..4], INES_MAGIC);
    assert_eq!(rom[4..8], [1, 1, 0, 0]);
    assert!(rom[8..HEADER_SIZE].iter().all(|b| *b == 0));
    assert!(rom[HEADER_SIZE..].iter().all(|b| *b == 0xFF));
}

#[test]
fn header_flags() {
    let settings = [
        ("mapper", 0x12),
        ("prg", 2),
        ("chr", 1),
        ("mirroring", 1),
        ("battery", 1),
        ("fourscreen", 1),
    ];
    let rom = assert(program(vec![header(&settings)]));
    assert_eq!(rom.len(), HEADER_SIZE + 5 * BANK_SIZE);
    assert_eq!(rom[4..8], [2, 1, 0x2B, 0x01]);
}

#[test]
fn constants_before_header() {
    use nelc::ast::{HeaderSetting, HeaderStatement, Statement};
    let setting = |key: &str, value| HeaderSetting { name: name(key), value };
    let statement = Statement::Header(HeaderStatement {
        settings: vec![setting("mapper", num(0)), setting("prg", attr("banks")), setting("chr", num(1))],
        pos: here(),
    });
    let rom = assert(program(vec![constant("banks", num(2)), statement]));
    assert_eq!(rom[4], 2);
    assert_eq!(rom.len(), HEADER_SIZE + 5 * BANK_SIZE);
}

#[test]
fn banks_are_independent() {
    let rom = assert(program(vec![
        header(&[("mapper", 0), ("prg", 1), ("chr", 1)]),
        rom(Some(1), Some(0xA000)),
        data(Width::Byte, vec![DataItem::Expression(num(0xA1))]),
        rom(Some(0), Some(0x8000)),
        data(Width::Byte, vec![DataItem::Expression(num(0x80))]),
        rom(Some(1), None),
        data(Width::Byte, vec![DataItem::Expression(num(0xA2))]),
        rom(Some(2), Some(0x0000)),
        text_data("CHR"),
    ]));
    let bank = |index: usize| &rom[HEADER_SIZE + index * BANK_SIZE..HEADER_SIZE + (index + 1) * BANK_SIZE];
    assert_eq!(bank(0)[..2], [0x80, 0xFF]);
    assert_eq!(bank(1)[..3], [0xA1, 0xA2, 0xFF]);
    assert_eq!(bank(2)[..4], [b'C', b'H', b'R', 0xFF]);
}

fn text_data(value: &str) -> nelc::ast::Statement {
    data(Width::Byte, vec![text(value)])
}

#[test]
fn vectors_at_end_of_bank() {
    let rom = assert(program(vec![
        header(&[("mapper", 0), ("prg", 1), ("chr", 1)]),
        rom(Some(1), Some(0xE000)),
        label("reset"),
        goto("reset"),
        rom(None, Some(0xFFFA)),
        data(
            Width::Word,
            vec![
                DataItem::Expression(attr("reset")),
                DataItem::Expression(attr("reset")),
                DataItem::Expression(attr("reset")),
            ],
        ),
    ]));
    let end = HEADER_SIZE + 2 * BANK_SIZE;
    assert_eq!(rom[end - BANK_SIZE..end - BANK_SIZE + 3], [0x4C, 0x00, 0xE0]);
    assert_eq!(rom[end - 6..end], [0x00, 0xE0, 0x00, 0xE0, 0x00, 0xE0]);
}

#[test]
fn embedded_file() {
    let path = std::env::temp_dir().join(format!("nelc-embed-{}.bin", std::process::id()));
    std::fs::write(&path, [1, 2, 3]).unwrap();
    let rom = assert(program(vec![
        header(&[("mapper", 0), ("prg", 1), ("chr", 1)]),
        rom(Some(0), Some(0x8000)),
        embed(&path.display().to_string()),
        label("after"),
        data(Width::Word, vec![DataItem::Expression(attr("after"))]),
    ]));
    std::fs::remove_file(&path).unwrap();
    assert_eq!(rom[HEADER_SIZE..HEADER_SIZE + 6], [1, 2, 3, 0x03, 0x80, 0xFF]);
}

#[test]
fn program_from_yaml() {
    let source = r#"
statements:
  - statement: constant
    name: { text: value }
    value: { kind: { number: 66 } }
  - statement: header
    settings:
      - name: { text: mapper }
        value: { kind: { number: 0 } }
      - name: { text: prg }
        value: { kind: { number: 1 } }
      - name: { text: chr }
        value: { kind: { attribute: [ { text: value } ] } }
  - statement: relocation
    target:
      rom:
        bank: { kind: { number: 0 } }
        dest: { kind: { number: 32768 } }
  - statement: command
    receiver: { mode: a }
    commands:
      - kind: get
        argument: { mode: immediate, expr: { kind: { attribute: [ { text: value } ] } } }
      - kind: put
        argument: { mode: direct, expr: { kind: { number: 16 } } }
  - statement: branch
    kind: return
"#;
    let program: Program = serde_yaml::from_str(source).unwrap();
    let rom = match nelc::compile(program, Config::quiet()) {
        Ok(rom) => rom,
        Err(failure) => panic!("{:?}", failure.messages()),
    };
    // 66 chr units make for a large rom; only the header and code matter.
    assert_eq!(rom[5], 66);
    assert_eq!(rom[HEADER_SIZE..HEADER_SIZE + 6], [0xA9, 0x42, 0x85, 0x10, 0x60, 0xFF]);
}
