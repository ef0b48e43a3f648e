use super::{Address, Opcode, Tag};
use crate::error;
use crate::lang::Error;
use std::convert::TryFrom;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// ## Instruction stream reader
///
/// A read position over shared program bytes. Every failure carries the
/// address at which decoding went wrong.

#[derive(Debug, Clone)]
pub struct Cursor {
    code: Rc<[u8]>,
    pos: Address,
}

impl Default for Cursor {
    fn default() -> Self {
        Cursor::new(Vec::new().into())
    }
}

impl Cursor {
    pub fn new(code: Rc<[u8]>) -> Cursor {
        Cursor { code, pos: 0 }
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub fn position(&self) -> Address {
        self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.code.len()
    }

    pub fn seek(&mut self, addr: Address) -> Result<()> {
        if addr >= self.code.len() {
            return Err(error!(AddressOutOfRange; "{:#x} OF {:#x}", addr, self.code.len()));
        }
        self.pos = addr;
        Ok(())
    }

    pub fn peek(&self) -> Result<u8> {
        match self.code.get(self.pos) {
            Some(byte) => Ok(*byte),
            None => Err(self.unexpected_end(1)),
        }
    }

    pub fn byte(&mut self) -> Result<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Ok(byte)
    }

    pub fn word(&mut self) -> Result<u16> {
        let mut bytes = [0; 2];
        bytes.copy_from_slice(self.take(2)?);
        Ok(u16::from_le_bytes(bytes))
    }

    pub fn tag(&mut self) -> Result<Tag> {
        let at = self.pos;
        Tag::try_from(self.byte()?).map_err(|e| e.at_address(at))
    }

    pub fn expect(&mut self, tag: Tag) -> Result<()> {
        let at = self.pos;
        let found = self.byte()?;
        if found == tag as u8 {
            Ok(())
        } else {
            Err(error!(UnexpectedTag; "EXPECTED {} FOUND {:#04x}", tag, found).at_address(at))
        }
    }

    pub fn read_code(&mut self) -> Result<Opcode> {
        self.expect(Tag::Code)?;
        let at = self.pos;
        Opcode::try_from(self.byte()?).map_err(|e| e.at_address(at))
    }

    pub fn read_num(&mut self) -> Result<i64> {
        self.expect(Tag::Num)?;
        self.number()
    }

    pub fn read_var(&mut self) -> Result<Rc<str>> {
        self.expect(Tag::Var)?;
        self.text()
    }

    pub fn read_str(&mut self) -> Result<Rc<str>> {
        self.expect(Tag::Str)?;
        self.text()
    }

    /// Payload of an `n` item whose tag was already consumed.
    pub fn number(&mut self) -> Result<i64> {
        let mut bytes = [0; 8];
        bytes.copy_from_slice(self.take(8)?);
        Ok(i64::from_le_bytes(bytes))
    }

    /// Payload of a `v` or `s` item whose tag was already consumed.
    pub fn text(&mut self) -> Result<Rc<str>> {
        let at = self.pos;
        let len = self.word()? as usize;
        if len == 0 {
            return Err(error!(UnexpectedTag; "ZERO LENGTH TEXT").at_address(at));
        }
        let bytes = self.take(len)?;
        let (text, nul) = bytes.split_at(len - 1);
        if nul[0] != 0 {
            return Err(error!(UnexpectedTag; "TEXT NOT TERMINATED").at_address(at));
        }
        match std::str::from_utf8(text) {
            Ok(s) => Ok(s.into()),
            Err(_) => Err(error!(UnexpectedTag; "TEXT IS NOT UTF-8").at_address(at)),
        }
    }

    fn take(&mut self, n: usize) -> Result<&[u8]> {
        let end = self.pos + n;
        if end > self.code.len() {
            return Err(self.unexpected_end(n));
        }
        let at = self.pos;
        self.pos = end;
        Ok(&self.code[at..end])
    }

    fn unexpected_end(&self, n: usize) -> Error {
        error!(UnexpectedEnd; "READ {} AT {:#x} OF {:#x}", n, self.pos, self.code.len())
            .at_address(self.pos)
    }
}
