use super::{Column, LineNumber};
use crate::mach::Address;

#[derive(Clone, PartialEq)]
pub struct Error {
    code: u16,
    file: Option<String>,
    line_number: LineNumber,
    column: Column,
    address: Option<Address>,
    text: String,
    message: String,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident, ..$col:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_column($col)
    };
    ($err:ident; $($arg:tt)+) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).message(&format!($($arg)+))
    };
    ($err:ident, ..$col:expr; $($arg:tt)+) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_column($col)
            .message(&format!($($arg)+))
    };
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error {
            code: code as u16,
            file: None,
            line_number: None,
            column: 0..0,
            address: None,
            text: String::new(),
            message: String::new(),
        }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn is(&self, code: ErrorCode) -> bool {
        self.code == code as u16
    }

    pub fn line_number(&self) -> LineNumber {
        self.line_number
    }

    pub fn column(&self) -> Column {
        self.column.clone()
    }

    pub fn address(&self) -> Option<Address> {
        self.address
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn in_file(self, file: &str) -> Error {
        if self.file.is_some() {
            return self;
        }
        Error {
            file: Some(file.to_string()),
            ..self
        }
    }

    pub fn in_line_number(self, line: LineNumber) -> Error {
        if self.line_number.is_some() {
            return self;
        }
        Error {
            line_number: line,
            ..self
        }
    }

    pub fn in_column(self, column: &Column) -> Error {
        debug_assert_eq!(self.column, 0..0);
        Error {
            column: column.clone(),
            ..self
        }
    }

    /// Errors raised while decoding keep the innermost address.
    pub fn at_address(self, address: Address) -> Error {
        if self.address.is_some() {
            return self;
        }
        Error {
            address: Some(address),
            ..self
        }
    }

    pub fn with_text(self, text: &str) -> Error {
        if !self.text.is_empty() {
            return self;
        }
        Error {
            text: text.trim().to_string(),
            ..self
        }
    }

    /// Columns of a rewritten statement do not map onto the source line,
    /// so they are replaced by the statement text in the message.
    pub fn in_fragment(self, fragment: &str) -> Error {
        let message = if self.message.is_empty() {
            format!("IN [{}]", fragment.trim())
        } else {
            format!("{} IN [{}]", self.message, fragment.trim())
        };
        Error {
            column: 0..0,
            message,
            ..self
        }
    }

    pub fn message(self, message: &str) -> Error {
        debug_assert_eq!(self.message.len(), 0);
        Error {
            message: message.to_string(),
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    SyntaxError = 2,
    UndefinedSymbol = 3,
    ReservedWord = 4,
    StringTooLong = 5,
    TypeMismatch = 13,
    BlockMismatch = 20,
    UnclosedBlock = 21,
    TooManyBlocks = 22,
    TooManyLinks = 23,
    TooManySwitches = 24,
    IllegalInChoose = 25,
    BlockCheck = 26,
    BlockBreak = 27,
    UnexpectedEnd = 30,
    UnexpectedTag = 31,
    IllegalOpcode = 32,
    IllegalOperator = 33,
    AddressOutOfRange = 34,
    StackUnderflow = 35,
    FunctionFailed = 40,
    OutOfMemory = 41,
    Interrupted = 42,
    InternalError = 51,
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let code_str = match self.code {
            2 => "SYNTAX ERROR",
            3 => "UNDEFINED SYMBOL",
            4 => "RESERVED WORD",
            5 => "STRING TOO LONG",
            13 => "TYPE MISMATCH",
            20 => "BLOCK MISMATCH",
            21 => "UNCLOSED BLOCK",
            22 => "TOO MANY BLOCKS",
            23 => "TOO MANY LINKS",
            24 => "TOO MANY CHOOSE IN IF",
            25 => "ILLEGAL IN CHOOSE",
            26 => "BLOCK NOT COMPLETE",
            27 => "BLOCK BREAK",
            30 => "UNEXPECTED END OF CODE",
            31 => "UNEXPECTED TAG",
            32 => "ILLEGAL OPCODE",
            33 => "ILLEGAL OPERATOR",
            34 => "ADDRESS OUT OF RANGE",
            35 => "POP WITHOUT PUSH",
            40 => "FUNCTION FAILED",
            41 => "OUT OF MEMORY",
            42 => "INTERRUPTED",
            51 => "INTERNAL ERROR",
            _ => "",
        };
        let mut suffix = String::new();
        if let Some(file) = &self.file {
            suffix.push_str(&format!(" IN {}", file));
        }
        if let Some(line_number) = self.line_number {
            suffix.push_str(&format!(" LINE {}", line_number));
        }
        if self.column != (0..0) {
            suffix.push_str(&format!(" ({}..{})", self.column.start, self.column.end));
        }
        if let Some(address) = self.address {
            suffix.push_str(&format!(" AT {:#x}", address));
        }
        if !self.message.is_empty() {
            suffix.push_str("; ");
            suffix.push_str(&self.message);
        }
        if !self.text.is_empty() {
            suffix.push_str(&format!(" [{}]", self.text));
        }
        if code_str.is_empty() {
            write!(f, "PROGRAM ERROR {}{}", self.code, suffix)
        } else {
            write!(f, "{}{}", code_str, suffix)
        }
    }
}

impl std::error::Error for Error {}
