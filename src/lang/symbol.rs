use super::Word;
use crate::error;
use crate::lang::Error;
use crate::mach::Param;
use std::collections::HashMap;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for Constant {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Constant::Number(n) => write!(f, "{}", n),
            Constant::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    Command(Word),
    Function { code: u16, params: Rc<[Param]> },
    Variable,
    Constant(Constant),
}

/// ## Symbol table
///
/// One live symbol per name. Registering a name again replaces it,
/// except for reserved commands.

#[derive(Debug, Clone)]
pub struct SymbolTable {
    map: HashMap<String, Symbol>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        SymbolTable::new()
    }
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        let map = Word::all()
            .iter()
            .map(|word| (word.as_str().to_string(), Symbol::Command(*word)))
            .collect();
        SymbolTable { map }
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.map.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        self.map.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        Word::all().iter().any(|word| word.as_str() == name)
    }

    pub fn set(&mut self, name: &str, symbol: Symbol) -> Result<()> {
        if name.is_empty() {
            return Err(error!(SyntaxError; "MISSING NAME"));
        }
        if self.is_reserved(name) {
            return Err(error!(ReservedWord; "[{}] CAN NOT BE REDEFINED", name));
        }
        self.map.insert(name.to_string(), symbol);
        Ok(())
    }

    /// Copies the full definition of `existing` onto `name`.
    pub fn alias(&mut self, name: &str, existing: &str) -> Result<()> {
        let symbol = match self.map.get(existing) {
            Some(symbol) => symbol.clone(),
            None => return Err(error!(UndefinedSymbol; "[{}] IS NOT DEFINED", existing)),
        };
        self.set(name, symbol)
    }
}
