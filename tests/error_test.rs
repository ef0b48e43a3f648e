mod common;
use aegis::lang::ErrorCode;
use aegis::mach::{Compiler, Config};
use common::*;
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn test_unclosed_block() {
    let error = build("if 1\nvar x = 1").unwrap_err();
    assert!(error.is(ErrorCode::UnclosedBlock));
    let error = build("while 1").unwrap_err();
    assert!(error.is(ErrorCode::UnclosedBlock));
}

#[test]
fn test_block_mismatch() {
    let error = build("var x = 1\nendif").unwrap_err();
    assert!(error.is(ErrorCode::BlockMismatch));
    assert_eq!(error.line_number(), Some(2));
    assert_eq!(error.text(), "endif");
    let error = build("if 1\nendwhile").unwrap_err();
    assert!(error.is(ErrorCode::BlockMismatch));
    let error = build("exitwhile").unwrap_err();
    assert!(error.is(ErrorCode::BlockMismatch));
    let error = build("case 1").unwrap_err();
    assert!(error.is(ErrorCode::BlockMismatch));
}

#[test]
fn test_syntax_errors() {
    let error = build("var s = \"abc").unwrap_err();
    assert!(error.is(ErrorCode::SyntaxError));
    let error = build("var x = (1 + 2").unwrap_err();
    assert!(error.is(ErrorCode::SyntaxError));
    let error = build("var x = 1 + 2)").unwrap_err();
    assert!(error.is(ErrorCode::SyntaxError));
    assert_eq!(error.column(), 13..14);
    let error = build("var x = 1 2").unwrap_err();
    assert!(error.is(ErrorCode::SyntaxError));
    let error = build("var x = 1 +").unwrap_err();
    assert!(error.is(ErrorCode::SyntaxError));
    let error = build("if").unwrap_err();
    assert!(error.is(ErrorCode::SyntaxError));
}

#[test]
fn test_error_in_nested_call_keeps_source_line() {
    let error = build("var x = (nothing) + 1").unwrap_err();
    assert!(error.is(ErrorCode::UndefinedSymbol));
    assert_eq!(error.text(), "var x = (nothing) + 1");
    assert_eq!(error.column(), 0..0);
    assert!(error.to_string().contains("IN [$0=nothing]"));
}

#[test]
fn test_undefined_symbol() {
    let error = build("foo = 1").unwrap_err();
    assert!(error.is(ErrorCode::UndefinedSymbol));
    let error = build("var x = y").unwrap_err();
    assert!(error.is(ErrorCode::UndefinedSymbol));
}

#[test]
fn test_string_too_long() {
    let source = format!("var s = \"{}\"", "x".repeat(300));
    let error = build(&source).unwrap_err();
    assert!(error.is(ErrorCode::StringTooLong));
}

#[test]
fn test_block_break() {
    let error = build("__block").unwrap_err();
    assert!(error.is(ErrorCode::BlockBreak));
}

#[test]
fn test_too_many_blocks() {
    let config = Config {
        max_blocks: 2,
        ..Config::default()
    };
    let mut compiler = Compiler::with_config(config);
    let error = compiler
        .compile("test", "if 1\nendif\nif 1\nendif\nif 1\nendif")
        .unwrap_err();
    assert!(error.is(ErrorCode::TooManyBlocks));
    assert_eq!(error.line_number(), Some(5));
}

#[test]
fn test_too_many_switches() {
    let config = Config {
        max_switch_in_if: 1,
        ..Config::default()
    };
    let mut compiler = Compiler::with_config(config);
    let source = "if 1\nchoose 1\ncase 1\nchoose 2\n";
    let error = compiler.compile("test", source).unwrap_err();
    assert!(error.is(ErrorCode::TooManySwitches));
}

#[test]
fn test_error_sink() {
    let messages = Rc::new(RefCell::new(vec![]));
    let sink = messages.clone();
    let mut compiler = Compiler::new();
    compiler.set_error_sink(move |message| sink.borrow_mut().push(message.to_string()));
    assert!(compiler.compile("bad.aeg", "var x = 1\nendif").is_err());
    let messages = messages.borrow();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("IN bad.aeg LINE 2"));
    assert!(compiler.program().listing().as_str().contains("// ERROR"));
}

#[test]
fn test_comments() {
    let source = "var x = 1 // x = 2\n/* x = 3\nx = 4 */\nvar s = \"a//b\"";
    let var = run(source);
    assert_eq!(var.fetch("x"), aegis::mach::Val::Integer(1));
    assert_eq!(var.fetch("s"), aegis::mach::Val::from("a//b"));
}
