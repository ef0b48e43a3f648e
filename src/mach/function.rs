use super::{Val, Var};
use crate::error;
use crate::lang::Error;
use std::collections::HashMap;
use std::convert::TryFrom;

type Result<T> = std::result::Result<T, Error>;

/// One character of a `declare` parameter shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    /// `s`: required, passed as a string.
    Str,
    /// `n`: required, passed as an integer.
    Num,
    /// `f`: required, passed as a float.
    Float,
    /// `v`: passed as evaluated. Only ever seen in hand-built streams.
    Value,
    /// `?`: optional and repeatable; ends the list when absent.
    Optional,
    /// `t`: one bare word in the source that is skipped.
    Skip,
    /// `.`: ignore the rest of the source line.
    Stop,
}

impl Param {
    /// Parses a whole shape string such as `sn?`.
    pub fn shape(s: &str) -> Result<Vec<Param>> {
        s.chars()
            .map(|ch| match ch {
                's' => Ok(Param::Str),
                'n' => Ok(Param::Num),
                'f' => Ok(Param::Float),
                '?' => Ok(Param::Optional),
                't' => Ok(Param::Skip),
                '.' => Ok(Param::Stop),
                _ => Err(error!(SyntaxError; "[{}] IS NOT A PARAMETER TYPE", ch)),
            })
            .collect()
    }

    pub fn as_char(self) -> char {
        match self {
            Param::Str => 's',
            Param::Num => 'n',
            Param::Float => 'f',
            Param::Value => 'v',
            Param::Optional => '?',
            Param::Skip => 't',
            Param::Stop => '.',
        }
    }

    /// Whether the type byte is written into the instruction stream.
    pub fn is_emitted(self) -> bool {
        !matches!(self, Param::Skip | Param::Stop)
    }
}

impl TryFrom<u8> for Param {
    type Error = Error;
    fn try_from(byte: u8) -> std::result::Result<Self, Self::Error> {
        Ok(match byte {
            b's' => Param::Str,
            b'n' => Param::Num,
            b'f' => Param::Float,
            b'v' => Param::Value,
            b'?' => Param::Optional,
            _ => return Err(error!(UnexpectedTag; "[{:#04x}] IS NOT A PARAMETER TYPE", byte)),
        })
    }
}

impl std::fmt::Display for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// ## Native functions
///
/// The runtime calls back into the host for every `func` instruction.

pub trait Host {
    fn call(&mut self, code: u16, args: &[Val], var: &mut Var) -> Result<Val>;

    /// Called instead of `call` while scanning. Nothing may change.
    fn check(&mut self, _code: u16, _args: &[Val]) -> Result<Val> {
        Ok(Val::default())
    }

    /// Receives every runtime diagnostic before it is returned.
    fn error(&mut self, _message: &str) {}
}

type Native = Box<dyn FnMut(&[Val], &mut Var) -> Result<Val>>;

/// A host built from closures keyed by function code.
#[derive(Default)]
pub struct Natives {
    functions: HashMap<u16, Native>,
    errors: Vec<String>,
}

impl Natives {
    pub fn new() -> Natives {
        Natives::default()
    }

    pub fn insert<F>(&mut self, code: u16, f: F)
    where
        F: FnMut(&[Val], &mut Var) -> Result<Val> + 'static,
    {
        self.functions.insert(code, Box::new(f));
    }

    pub fn contains(&self, code: u16) -> bool {
        self.functions.contains_key(&code)
    }

    /// Diagnostics received through `Host::error`.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

impl Host for Natives {
    fn call(&mut self, code: u16, args: &[Val], var: &mut Var) -> Result<Val> {
        match self.functions.get_mut(&code) {
            Some(f) => f(args, var),
            None => Err(error!(FunctionFailed; "NO NATIVE FUNCTION {}", code)),
        }
    }

    fn check(&mut self, code: u16, _args: &[Val]) -> Result<Val> {
        if self.functions.contains_key(&code) {
            Ok(Val::default())
        } else {
            Err(error!(FunctionFailed; "NO NATIVE FUNCTION {}", code))
        }
    }

    fn error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}
