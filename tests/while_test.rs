mod common;
use aegis::mach::Val;
use common::*;

#[test]
fn test_while_sum() {
    let source = "
var i = 0
var total = 0
while i < 5
  total += i
  i++
endwhile";
    let var = run(source);
    assert_eq!(var.fetch("total"), Val::Integer(10));
    assert_eq!(var.fetch("i"), Val::Integer(5));
}

#[test]
fn test_while_never_entered() {
    assert_eq!(fetch("var r = 1\nwhile 0\n  r = 2\nendwhile", "r"), Val::Integer(1));
}

#[test]
fn test_exitwhile() {
    let source = "
var i = 0
while 1
  i++
  if i == 3
    exitwhile
  endif
endwhile";
    assert_eq!(fetch(source, "i"), Val::Integer(3));
}

#[test]
fn test_nested_exitwhile() {
    let source = "
var outer = 0
var inner = 0
while outer < 3
  outer++
  while 1
    inner++
    exitwhile
  endwhile
  if outer == 2
    exitwhile
  endif
endwhile";
    let var = run(source);
    assert_eq!(var.fetch("outer"), Val::Integer(2));
    assert_eq!(var.fetch("inner"), Val::Integer(2));
}

#[test]
fn test_while_prints() {
    let source = "var i = 0\nwhile i < 3\n  print i\n  i++\nendwhile";
    assert_eq!(printed(source), vec!["0", "1", "2"]);
}
