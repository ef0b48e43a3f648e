mod common;
use aegis::lang::ErrorCode;
use aegis::mach::Val;
use common::*;

fn pick(k: &str) -> Val {
    let source = format!(
        "var k = {}
var r = 0
choose k
case 1
  r = 10
  break
case 2
  r = 20
  break
case \"x\"
  r = 30
  break
default
  r = 99
endchoose",
        k
    );
    fetch(&source, "r")
}

#[test]
fn test_choose_cases() {
    assert_eq!(pick("1"), Val::Integer(10));
    assert_eq!(pick("2"), Val::Integer(20));
    assert_eq!(pick("\"X\""), Val::Integer(30));
    assert_eq!(pick("7"), Val::Integer(99));
}

#[test]
fn test_case_needs_same_kind() {
    assert_eq!(pick("\"1\""), Val::Integer(99));
}

#[test]
fn test_fall_through() {
    let source = "
var r = 0
choose 1
case 1
  r += 1
case 2
  r += 2
  break
endchoose";
    assert_eq!(fetch(source, "r"), Val::Integer(1));
}

#[test]
fn test_no_match_without_default() {
    let source = "var r = 5\nchoose 3\ncase 1\n  r = 1\n  break\nendchoose";
    assert_eq!(fetch(source, "r"), Val::Integer(5));
}

#[test]
fn test_case_restored_after_choose() {
    let source = "
var r = 0
choose 1
case 1
  choose 2
  case 2
    r = 2
    break
  endchoose
  r += $case
  break
endchoose";
    let var = run(source);
    assert_eq!(var.fetch("r"), Val::Integer(3));
    assert_eq!(var.fetch("$case"), Val::Integer(0));
}

#[test]
fn test_break_inside_if() {
    let source = "
var r = 0
choose 1
case 1
  if 1
    r = 1
    break
  endif
  r = 2
endchoose";
    assert_eq!(fetch(source, "r"), Val::Integer(1));
}

#[test]
fn test_call_as_selector() {
    let source = "var r = 0\nchoose sum 1 2\ncase 3\n  r = 1\n  break\nendchoose";
    assert_eq!(fetch(source, "r"), Val::Integer(1));
    let source = "var r = 0\nchoose (sum 2 2) * 2\ncase 8\n  r = 1\n  break\nendchoose";
    assert_eq!(fetch(source, "r"), Val::Integer(1));
}

#[test]
fn test_call_outside_case() {
    let error = build("choose 1\nprint \"x\"\nendchoose").unwrap_err();
    assert!(error.is(ErrorCode::IllegalInChoose));
    assert_eq!(error.line_number(), Some(2));
}

#[test]
fn test_command_outside_case() {
    let error = build("choose 1\nif 1\nendif\nendchoose").unwrap_err();
    assert!(error.is(ErrorCode::IllegalInChoose));
    let error = build("choose 1\ncase 1\nbreak\nbreak\nendchoose").unwrap_err();
    assert!(error.is(ErrorCode::IllegalInChoose));
    assert_eq!(error.line_number(), Some(4));
}

#[test]
fn test_choose_open_at_endif() {
    let error = build("if 1\nchoose 1\ncase 1\nendif").unwrap_err();
    assert!(error.is(ErrorCode::BlockMismatch));
}
