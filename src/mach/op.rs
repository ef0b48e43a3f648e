use crate::error;
use crate::lang::Error;
use std::convert::TryFrom;

/// ## Expression operators
///
/// One byte follows every operand of an inline expression. `End`
/// terminates the expression. Precedence is resolved at run time.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Operator {
    End = 0,
    Equal = 1,
    NotEqual = 2,
    Greater = 3,
    Less = 4,
    And = 5,
    Or = 6,
    Add = 7,
    Sub = 8,
    Mul = 9,
    Div = 10,
    Mod = 11,
    GreaterEqual = 12,
    LessEqual = 13,
}

impl Operator {
    /// Characters that may form an operator in script text.
    pub const CHARS: &'static str = "%=+-/*&|><!";

    pub fn from_source(s: &str) -> Option<Operator> {
        use Operator::*;
        Some(match s {
            "=" | "==" => Equal,
            "!=" | "<>" => NotEqual,
            ">=" | "=>" => GreaterEqual,
            "<=" | "=<" => LessEqual,
            ">" => Greater,
            "<" => Less,
            "&&" | "&" => And,
            "||" | "|" => Or,
            "+" => Add,
            "-" => Sub,
            "*" => Mul,
            "/" => Div,
            "%" => Mod,
            _ => return None,
        })
    }

    pub fn is_multiplicative(self) -> bool {
        self == Operator::Mul || self == Operator::Div
    }
}

impl TryFrom<u8> for Operator {
    type Error = Error;
    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        use Operator::*;
        Ok(match byte {
            0 => End,
            1 => Equal,
            2 => NotEqual,
            3 => Greater,
            4 => Less,
            5 => And,
            6 => Or,
            7 => Add,
            8 => Sub,
            9 => Mul,
            10 => Div,
            11 => Mod,
            12 => GreaterEqual,
            13 => LessEqual,
            _ => return Err(error!(IllegalOperator; "[{}]", byte)),
        })
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Operator::*;
        let s = match self {
            End => ";",
            Equal => "==",
            NotEqual => "!=",
            Greater => ">",
            Less => "<",
            And => "&&",
            Or => "||",
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            GreaterEqual => ">=",
            LessEqual => "<=",
        };
        write!(f, "{}", s)
    }
}
