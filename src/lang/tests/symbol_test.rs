use super::*;

#[test]
fn test_commands_preloaded() {
    let table = SymbolTable::new();
    assert_eq!(table.get("while"), Some(&Symbol::Command(Word::While)));
    assert_eq!(table.get("__block"), Some(&Symbol::Command(Word::Block)));
    assert_eq!(table.len(), Word::all().len());
}

#[test]
fn test_reserved() {
    let mut table = SymbolTable::new();
    let error = table.set("endif", Symbol::Variable).unwrap_err();
    assert!(error.is(ErrorCode::ReservedWord));
    assert!(table.set("", Symbol::Variable).is_err());
}

#[test]
fn test_alias() {
    let mut table = SymbolTable::new();
    table.set("A", Symbol::Constant(Constant::Number(3))).unwrap();
    table.alias("B", "A").unwrap();
    assert_eq!(table.get("B"), Some(&Symbol::Constant(Constant::Number(3))));
    table.alias("loop", "while").unwrap();
    assert_eq!(table.get("loop"), Some(&Symbol::Command(Word::While)));
    let error = table.alias("C", "missing").unwrap_err();
    assert!(error.is(ErrorCode::UndefinedSymbol));
}
