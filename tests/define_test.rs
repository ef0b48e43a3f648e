mod common;
use aegis::lang::{Constant, ErrorCode, Symbol};
use aegis::mach::{Compiler, Val};
use common::*;

#[test]
fn test_define_number() {
    assert_eq!(fetch("define A 5\nvar x = A + 1", "x"), Val::Integer(6));
    assert_eq!(fetch("define A 5\nvar x = #A#", "x"), Val::Integer(5));
}

#[test]
fn test_define_text() {
    let source = "define GREETING \"hi\"\nvar s = GREETING + \" there\"";
    assert_eq!(fetch(source, "s"), Val::from("hi there"));
}

#[test]
fn test_define_post_increment() {
    let source = "
define N 0
define A N++
define B N++
define C N--
var x = A
var y = B
var z = N
var w = C";
    let var = run(source);
    assert_eq!(var.fetch("x"), Val::Integer(0));
    assert_eq!(var.fetch("y"), Val::Integer(1));
    assert_eq!(var.fetch("w"), Val::Integer(2));
    assert_eq!(var.fetch("z"), Val::Integer(1));
}

#[test]
fn test_define_alias() {
    assert_eq!(fetch("define A 7\ndefine B A\nvar x = B", "x"), Val::Integer(7));
}

#[test]
fn test_constant_is_not_a_statement() {
    let error = build("define A 1\nA = 2").unwrap_err();
    assert!(error.is(ErrorCode::SyntaxError));
}

#[test]
fn test_reserved_word() {
    let error = build("var while = 1").unwrap_err();
    assert!(error.is(ErrorCode::ReservedWord));
    let error = build("define if 1").unwrap_err();
    assert!(error.is(ErrorCode::ReservedWord));
}

#[test]
fn test_load_enum() {
    let mut compiler = Compiler::new();
    compiler
        .load_enum("colors", "; colors\nRED, GREEN\nBLUE\n# 10\nBIG\n")
        .unwrap();
    let number = |n| Some(Symbol::Constant(Constant::Number(n)));
    assert_eq!(compiler.symbols().get("RED").cloned(), number(0));
    assert_eq!(compiler.symbols().get("GREEN").cloned(), number(1));
    assert_eq!(compiler.symbols().get("BLUE").cloned(), number(2));
    assert_eq!(compiler.symbols().get("BIG").cloned(), number(10));
    compiler.compile("test", "var x = BLUE + BIG").unwrap();
    let code = compiler.finish().unwrap().into_code();
    let mut runtime = aegis::mach::Runtime::new();
    runtime.start(code, 0, false).unwrap();
    runtime.run(&mut aegis::mach::Natives::new()).unwrap();
    assert_eq!(runtime.var().fetch("x"), Val::Integer(12));
}

#[test]
fn test_load_def() {
    let mut compiler = Compiler::new();
    compiler.load_def("limits", "LIMIT 40\n\nFLOOR 3\n").unwrap();
    assert_eq!(
        compiler.symbols().get("FLOOR").cloned(),
        Some(Symbol::Constant(Constant::Number(3)))
    );
    let error = compiler.load_def("limits", "LIMIT forty").unwrap_err();
    assert!(error.is(ErrorCode::SyntaxError));
    assert_eq!(error.line_number(), Some(1));
}

#[test]
fn test_defcmd() {
    let source = "defcmd show print\nshow \"hi\"";
    assert_eq!(printed(source), vec!["hi"]);
    let source = "defcmd loop while\nvar i = 0\nloop i < 2\n  i++\nendwhile";
    assert_eq!(fetch(source, "i"), Val::Integer(2));
}
