use crate::error;
use crate::lang::Error;
use std::convert::TryFrom;

/// ## Virtual machine instruction set
///
/// The Aegis virtual machine has no registers. Instructions name their
/// variables directly and carry whole expressions inline, e.g.
/// `x = 3 * y` compiles to `c Mov  v "x"  n 3  Mul  v "y"  End`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    /// Halt. The only way to leave the fetch loop without an error.
    End = 0,
    Mov = 1,
    Add = 2,
    Sub = 3,
    Mul = 4,
    Div = 5,
    Mod = 6,
    Inc = 7,
    Dec = 8,
    /// Evaluate an expression and jump to the following address when falsy.
    Cmp = 9,
    Goto = 10,
    /// Native function call: code word, typed parameters, `;`.
    Func = 11,
    /// Jump to the following address unless the expression equals `$case`.
    Case = 12,
    Push = 13,
    Pop = 14,
}

impl TryFrom<u8> for Opcode {
    type Error = Error;
    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        use Opcode::*;
        Ok(match byte {
            0 => End,
            1 => Mov,
            2 => Add,
            3 => Sub,
            4 => Mul,
            5 => Div,
            6 => Mod,
            7 => Inc,
            8 => Dec,
            9 => Cmp,
            10 => Goto,
            11 => Func,
            12 => Case,
            13 => Push,
            14 => Pop,
            _ => return Err(error!(IllegalOpcode; "[{}]", byte)),
        })
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Opcode::*;
        let s = match self {
            End => "end",
            Mov => "mov",
            Add => "add",
            Sub => "sub",
            Mul => "mul",
            Div => "div",
            Mod => "mod",
            Inc => "inc",
            Dec => "dec",
            Cmp => "cmp",
            Goto => "goto",
            Func => "func",
            Case => "case",
            Push => "push",
            Pop => "pop",
        };
        write!(f, "{}", s)
    }
}

/// Tag byte in front of every item of the instruction stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Tag {
    Code = b'c',
    Var = b'v',
    Num = b'n',
    Str = b's',
    Call = b'f',
}

impl TryFrom<u8> for Tag {
    type Error = Error;
    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Ok(match byte {
            b'c' => Tag::Code,
            b'v' => Tag::Var,
            b'n' => Tag::Num,
            b's' => Tag::Str,
            b'f' => Tag::Call,
            _ => return Err(error!(UnexpectedTag; "[{:#04x}]", byte)),
        })
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", *self as u8 as char)
    }
}
