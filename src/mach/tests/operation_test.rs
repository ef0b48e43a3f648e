use super::*;

fn reduce(operands: Vec<Val>, operators: Vec<Operator>) -> Val {
    Operation::reduce(operands, operators).unwrap()
}

#[test]
fn test_reduce() {
    use Operator::*;
    let ints = |v: &[i64]| v.iter().map(|n| Val::Integer(*n)).collect::<Vec<_>>();
    assert_eq!(reduce(ints(&[2, 3, 4]), vec![Add, Mul]), Val::Integer(14));
    assert_eq!(reduce(ints(&[10, 2, 3]), vec![Sub, Mul]), Val::Integer(16));
    assert_eq!(reduce(ints(&[10, 2, 3]), vec![Sub, Sub]), Val::Integer(5));
    assert_eq!(reduce(ints(&[8, 2, 2]), vec![Div, Mul]), Val::Integer(8));
    assert_eq!(reduce(ints(&[7]), vec![]), Val::Integer(7));
}

#[test]
fn test_reduce_keeps_float_products() {
    use Operator::*;
    let operands = vec![Val::Integer(1), Val::Float(0.5), Val::Float(3.0)];
    assert_eq!(reduce(operands, vec![Add, Mul]), Val::Integer(2));
    let operands = vec![Val::Float(1.0), Val::Float(0.5), Val::Float(3.0)];
    assert_eq!(reduce(operands, vec![Add, Mul]), Val::Float(2.5));
}

#[test]
fn test_malformed() {
    assert!(Operation::reduce(vec![], vec![]).is_err());
    assert!(Operation::reduce(vec![Val::Integer(1)], vec![Operator::Add]).is_err());
}

#[test]
fn test_wrapping() {
    let max = Val::Integer(i64::max_value());
    assert_eq!(
        Operation::sum(max.clone(), Val::Integer(1)).unwrap(),
        Val::Integer(i64::min_value())
    );
    assert_eq!(Operation::increment(max), Val::Integer(i64::min_value()));
    assert_eq!(Operation::increment(Val::from("a")), Val::from("a"));
}

#[test]
fn test_equality() {
    assert!(Operation::equal(&Val::from("Straße"), &Val::from("STRASSE")).unwrap());
    assert!(Operation::equal(&Val::Float(0.1), &Val::Float(0.10001)).unwrap());
    assert!(!Operation::equal(&Val::Double(0.1), &Val::Double(0.2)).unwrap());
    assert!(Operation::equal(&Val::Integer(3), &Val::from("3")).unwrap());
    assert!(Operation::equal(&Val::Integer(3), &Val::from("x")).is_err());
}

#[test]
fn test_matches() {
    assert!(Operation::matches(&Val::Integer(3), &Val::Integer(3)).unwrap());
    assert!(!Operation::matches(&Val::Integer(3), &Val::from("3")).unwrap());
    assert!(Operation::matches(&Val::from("a"), &Val::from("A")).unwrap());
}

#[test]
fn test_apply() {
    use Operator::*;
    let apply = |op, l: i64, r: i64| Operation::apply(op, Val::Integer(l), Val::Integer(r)).unwrap();
    assert_eq!(apply(GreaterEqual, 3, 3), Val::Integer(1));
    assert_eq!(apply(LessEqual, 4, 3), Val::Integer(0));
    assert_eq!(apply(Or, 0, 0), Val::Integer(0));
    assert_eq!(apply(Mod, -7, 3), Val::Integer(-1));
    assert!(Operation::apply(End, Val::Integer(1), Val::Integer(1)).is_err());
}
