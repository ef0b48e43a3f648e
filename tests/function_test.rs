mod common;
use aegis::lang::ErrorCode;
use aegis::mach::{Compiler, Natives, Runtime, Val};
use common::*;

#[test]
fn test_call_statement() {
    assert_eq!(printed("print \"hello\""), vec!["hello"]);
    assert_eq!(printed("print 1 + 2"), vec!["3"]);
}

#[test]
fn test_call_in_expression() {
    assert_eq!(fetch("var x = sum 2, 3", "x"), Val::Integer(5));
    assert_eq!(fetch("var x = (sum 2 3) * 2", "x"), Val::Integer(10));
}

#[test]
fn test_nested_calls() {
    assert_eq!(printed("print (sum (sum 1 2) 4)"), vec!["7"]);
}

#[test]
fn test_optional_parameters() {
    assert_eq!(printed("say \"a\" \"b\""), vec!["a b 0"]);
    assert_eq!(printed("say"), vec!["0"]);
}

#[test]
fn test_missing_parameter() {
    let error = build("var x = sum 1").unwrap_err();
    assert!(error.is(ErrorCode::SyntaxError));
}

#[test]
fn test_blockcheck() {
    assert!(build("guard").is_ok());
    let error = build("if 1\n  guard\nendif").unwrap_err();
    assert!(error.is(ErrorCode::BlockCheck));
    assert_eq!(error.line_number(), Some(2));
}

#[test]
fn test_float_parameter() {
    let mut compiler = Compiler::new();
    compiler
        .compile("test", "declare half f 9\nvar x = half 3")
        .unwrap();
    let code = compiler.finish().unwrap().into_code();
    let mut natives = Natives::new();
    assert!(!natives.contains(9));
    natives.insert(9, |args, _| match &args[0] {
        Val::Float(n) => Ok(Val::Float(n / 2.0)),
        _ => Ok(Val::default()),
    });
    assert!(natives.contains(9));
    let mut runtime = Runtime::new();
    runtime.start(code, 0, false).unwrap();
    runtime.run(&mut natives).unwrap();
    assert_eq!(runtime.var().fetch("x"), Val::Float(1.5));
}

#[test]
fn test_native_sets_variables() {
    let mut compiler = Compiler::new();
    compiler
        .compile("test", "declare mark . 8\nvar marked\nmark\nvar y = marked + 1")
        .unwrap();
    let code = compiler.finish().unwrap().into_code();
    let mut natives = Natives::new();
    natives.insert(8, |_, var| {
        var.store(&"marked".into(), Val::Integer(41))?;
        Ok(Val::default())
    });
    let mut runtime = Runtime::new();
    runtime.start(code, 0, false).unwrap();
    runtime.run(&mut natives).unwrap();
    assert_eq!(runtime.var().fetch("y"), Val::Integer(42));
}

#[test]
fn test_function_failed() {
    let program = build("print \"x\"").unwrap();
    let mut natives = Natives::new();
    let mut runtime = Runtime::new();
    runtime.start(program.into_code(), 0, false).unwrap();
    let error = runtime.run(&mut natives).unwrap_err();
    assert!(error.is(ErrorCode::FunctionFailed));
    assert!(error.address().is_some());
    assert_eq!(natives.errors().len(), 1);
}
