mod common;
use aegis::lang::ErrorCode;
use aegis::mach::{disassemble, Event, Natives, Opcode, Program, Runtime, Val};
use common::*;
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn test_execute_in_batches() {
    let program = build("var i = 0\nwhile i < 100\n  i++\nendwhile").unwrap();
    let mut runtime = Runtime::new();
    let mut natives = Natives::new();
    runtime.start(program.into_code(), 0, false).unwrap();
    assert!(runtime.is_running());
    let mut batches = 0;
    loop {
        match runtime.execute(&mut natives, 10) {
            Event::Running => batches += 1,
            Event::Stopped => break,
            Event::Error(error) => panic!("{}", error),
        }
    }
    assert!(batches > 1);
    assert!(!runtime.is_running());
    assert_eq!(runtime.var().fetch("i"), Val::Integer(100));
}

#[test]
fn test_interrupt() {
    let program = build("while 1\nendwhile").unwrap();
    let mut runtime = Runtime::new();
    let mut natives = Natives::new();
    runtime.start(program.into_code(), 0, false).unwrap();
    assert!(matches!(runtime.execute(&mut natives, 100), Event::Running));
    runtime.interrupt();
    match runtime.execute(&mut natives, 100) {
        Event::Error(error) => assert!(error.is(ErrorCode::Interrupted)),
        event => panic!("{:?}", event),
    }
    assert!(matches!(runtime.execute(&mut natives, 100), Event::Stopped));
}

#[test]
fn test_goto_lock() {
    let program = build("var r = 0\nif 0\n  r = 1\nendif").unwrap();
    let mut runtime = Runtime::new();
    runtime.start(program.into_code(), 0, true).unwrap();
    runtime.run(&mut Natives::new()).unwrap();
    assert_eq!(runtime.var().fetch("r"), Val::Integer(1));
}

#[test]
fn test_scan() {
    let program = build("var r = 5\nprint r\nif 0\n  r = 1\nendif").unwrap();
    let code: Rc<[u8]> = program.into_code().into();
    let out = Rc::new(RefCell::new(vec![]));
    let mut runtime = Runtime::new();
    runtime.scan(code.clone(), 0, &mut natives(&out)).unwrap();
    assert_eq!(runtime.var().len(), 1);
    assert!(out.borrow().is_empty());
    let error = runtime.scan(code, 0, &mut Natives::new()).unwrap_err();
    assert!(error.is(ErrorCode::FunctionFailed));
}

#[test]
fn test_pop_without_push() {
    let mut program = Program::new();
    program.write_code(Opcode::Pop);
    program.write_var("x").unwrap();
    program.write_code(Opcode::End);
    let mut runtime = Runtime::new();
    runtime.start(program.into_code(), 0, false).unwrap();
    let error = runtime.run(&mut Natives::new()).unwrap_err();
    assert!(error.is(ErrorCode::StackUnderflow));
    assert_eq!(error.address(), Some(0));
}

#[test]
fn test_jump_out_of_range() {
    let mut program = Program::new();
    program.write_code(Opcode::Goto);
    program.write_num(100);
    program.write_code(Opcode::End);
    let mut runtime = Runtime::new();
    runtime.start(program.into_code(), 0, false).unwrap();
    let error = runtime.run(&mut Natives::new()).unwrap_err();
    assert!(error.is(ErrorCode::AddressOutOfRange));
}

#[test]
fn test_bad_streams() {
    let mut runtime = Runtime::new();
    runtime.start(vec![b'c', 99], 0, false).unwrap();
    let error = runtime.run(&mut Natives::new()).unwrap_err();
    assert!(error.is(ErrorCode::IllegalOpcode));
    assert_eq!(error.address(), Some(1));

    runtime.start(vec![b'x', 0], 0, false).unwrap();
    let error = runtime.run(&mut Natives::new()).unwrap_err();
    assert!(error.is(ErrorCode::UnexpectedTag));

    runtime.start(vec![b'c', Opcode::Goto as u8, b'n', 1], 0, false).unwrap();
    let error = runtime.run(&mut Natives::new()).unwrap_err();
    assert!(error.is(ErrorCode::UnexpectedEnd));

    assert!(runtime.start(vec![b'c', 0], 2, false).is_err());
}

#[test]
fn test_push_pop() {
    let mut program = Program::new();
    program.write_code(Opcode::Push);
    program.write_var("a").unwrap();
    program.write_code(Opcode::Pop);
    program.write_var("b").unwrap();
    program.write_code(Opcode::End);
    let mut runtime = Runtime::new();
    runtime.start(program.into_code(), 0, false).unwrap();
    runtime.set_var("a", Val::from("kept")).unwrap();
    runtime.run(&mut Natives::new()).unwrap();
    assert_eq!(runtime.var().fetch("b"), Val::from("kept"));
}

#[test]
fn test_disassemble() {
    let program = build("var x = 1\nif x > 0\n  print \"yes\"\nendif").unwrap();
    let text = disassemble(program.code()).unwrap();
    assert!(text.starts_with("// "));
    assert!(text.contains("crc32"));
    assert!(text.contains("mov x, 1"));
    assert!(text.contains("cmp x > 0"));
    assert!(text.contains("func 1(s: \"yes\" )"));
    assert!(text.trim_end().ends_with("end"));
}

#[test]
fn test_listing() {
    let program = build("var x = 1").unwrap();
    let listing = program.listing().to_string();
    assert!(listing.contains("// load test"));
    assert!(listing.contains("mov x 1"));
    assert!(listing.contains(&format!("crc32 {:08x}", program.checksum())));
}
