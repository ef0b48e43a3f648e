use super::Val;
use crate::error;
use crate::lang::Error;
use std::collections::BTreeMap;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// Name of the sentinel variable present in every store.
pub const NULL: &str = "NULL";

/// Holds the value under test inside a `choose` block.
pub const CASE: &str = "$case";

/// ## Variable memory

#[derive(Debug, Clone)]
pub struct Var {
    vars: BTreeMap<Rc<str>, Val>,
}

impl Default for Var {
    fn default() -> Self {
        let mut var = Var {
            vars: BTreeMap::new(),
        };
        var.vars.insert(NULL.into(), Val::default());
        var
    }
}

impl Var {
    pub fn new() -> Var {
        Var::default()
    }

    pub fn clear(&mut self) {
        self.vars.clear();
        self.vars.insert(NULL.into(), Val::default());
    }

    /// Missing variables read as `NULL`.
    pub fn fetch(&self, var_name: &str) -> Val {
        match self.vars.get(var_name) {
            Some(val) => val.clone(),
            None => Val::default(),
        }
    }

    pub fn get(&self, var_name: &str) -> Option<&Val> {
        self.vars.get(var_name)
    }

    pub fn contains(&self, var_name: &str) -> bool {
        self.vars.contains_key(var_name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Rc<str>, &Val)> {
        self.vars.iter()
    }

    pub fn store(&mut self, var_name: &Rc<str>, value: Val) -> Result<()> {
        if self.vars.len() > u16::max_value() as usize {
            return Err(error!(OutOfMemory; "TOO MANY VARIABLES"));
        }
        match self.vars.get_mut(var_name) {
            Some(var) => *var = value,
            None => {
                self.vars.insert(var_name.clone(), value);
            }
        };
        Ok(())
    }
}
