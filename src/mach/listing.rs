use super::{Address, Cursor, Opcode, Operator, Param, Tag};
use crate::error;
use crate::lang::Error;
use std::convert::TryFrom;

type Result<T> = std::result::Result<T, Error>;

/// ## Compile listing
///
/// Human readable record of a compile run: one line per instruction,
/// prefixed with its address in hex, interleaved with `//` comments.

#[derive(Debug, Clone)]
pub struct Listing {
    enabled: bool,
    text: String,
}

impl Default for Listing {
    fn default() -> Self {
        Listing::new(true)
    }
}

impl Listing {
    pub fn new(enabled: bool) -> Listing {
        Listing {
            enabled,
            text: String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn line(&mut self, addr: Address) {
        if self.enabled {
            self.text.push_str(&format!("\n{:6x}: ", addr));
        }
    }

    pub fn put(&mut self, s: &str) {
        if self.enabled {
            self.text.push_str(s);
        }
    }

    pub fn comment(&mut self, s: &str) {
        if self.enabled {
            self.text.push_str("\n// ");
            self.text.push_str(s);
        }
    }

    pub fn error(&mut self, s: &str) {
        if self.enabled {
            self.text.push_str("\n// ERROR ");
            self.text.push_str(s);
        }
    }
}

impl std::fmt::Display for Listing {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.text.trim_start())
    }
}

/// Renders a finished instruction stream, one instruction per line.
pub fn disassemble(code: &[u8]) -> Result<String> {
    let mut cursor = Cursor::new(code.into());
    let mut out = format!(
        "// {} bytes crc32 {:08x}",
        code.len(),
        crc::crc32::checksum_ieee(code)
    );
    while !cursor.is_at_end() {
        let addr = cursor.position();
        let opcode = cursor.read_code()?;
        out.push_str(&format!("\n{:6x}: {}", addr, opcode));
        use Opcode::*;
        match opcode {
            End => {}
            Mov | Add | Sub | Mul | Div | Mod => {
                out.push_str(&format!(" {},", cursor.read_var()?));
                expression(&mut cursor, &mut out)?;
            }
            Inc | Dec | Push | Pop => out.push_str(&format!(" {}", cursor.read_var()?)),
            Cmp | Case => {
                expression(&mut cursor, &mut out)?;
                out.push_str(&format!(" else {:#x}", cursor.read_num()?));
            }
            Goto => out.push_str(&format!(" {:#x}", cursor.read_num()?)),
            Func => call(&mut cursor, &mut out)?,
        }
    }
    Ok(out)
}

fn expression(cursor: &mut Cursor, out: &mut String) -> Result<()> {
    loop {
        let at = cursor.position();
        match cursor.tag()? {
            Tag::Str => out.push_str(&format!(" \"{}\"", cursor.text()?)),
            Tag::Num => out.push_str(&format!(" {}", cursor.number()?)),
            Tag::Var => out.push_str(&format!(" {}", cursor.text()?)),
            Tag::Call => {
                let opcode = cursor.read_code()?;
                if opcode != Opcode::Func {
                    return Err(error!(UnexpectedTag; "CALL TO {}", opcode).at_address(at));
                }
                call(cursor, out)?;
            }
            Tag::Code => return Err(error!(UnexpectedTag; "CODE IN EXPRESSION").at_address(at)),
        }
        match Operator::try_from(cursor.byte()?)? {
            Operator::End => return Ok(()),
            op => out.push_str(&format!(" {}", op)),
        }
    }
}

fn call(cursor: &mut Cursor, out: &mut String) -> Result<()> {
    out.push_str(&format!(" {}(", cursor.word()?));
    let mut first = true;
    loop {
        let byte = cursor.byte()?;
        if byte == b';' {
            break;
        }
        let param = Param::try_from(byte)?;
        if !first {
            out.push(',');
        }
        first = false;
        out.push_str(&format!("{}:", param));
        expression(cursor, out)?;
    }
    out.push_str(" )");
    Ok(())
}
