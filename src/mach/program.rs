use super::{Address, Listing, Opcode, Operator, Param, Tag};
use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// ## Instruction stream
///
/// Append-only bytes plus the listing written alongside them.
/// Numbers are little endian; names and strings carry a `u16` length
/// that counts their trailing NUL.

#[derive(Debug, Clone, Default)]
pub struct Program {
    code: Vec<u8>,
    listing: Listing,
}

impl Program {
    pub fn new() -> Program {
        Program::default()
    }

    pub fn with_listing(enabled: bool) -> Program {
        Program {
            code: vec![],
            listing: Listing::new(enabled),
        }
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub fn position(&self) -> Address {
        self.code.len()
    }

    pub fn code(&self) -> &[u8] {
        &self.code
    }

    pub fn into_code(self) -> Vec<u8> {
        self.code
    }

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    pub fn listing_mut(&mut self) -> &mut Listing {
        &mut self.listing
    }

    pub fn checksum(&self) -> u32 {
        crc::crc32::checksum_ieee(&self.code)
    }

    pub fn write_code(&mut self, opcode: Opcode) {
        self.listing.line(self.position());
        self.listing.put(&opcode.to_string());
        self.code.push(Tag::Code as u8);
        self.code.push(opcode as u8);
    }

    pub fn write_var(&mut self, name: &str) -> Result<()> {
        self.listing.put(&format!(" {}", name));
        self.code.push(Tag::Var as u8);
        self.write_text(name)
    }

    pub fn write_str(&mut self, s: &str) -> Result<()> {
        self.listing.put(&format!(" \"{}\"", s));
        self.code.push(Tag::Str as u8);
        self.write_text(s)
    }

    pub fn write_num(&mut self, n: i64) {
        self.listing.put(&format!(" {}", n));
        self.code.push(Tag::Num as u8);
        self.code.extend_from_slice(&n.to_le_bytes());
    }

    /// Marks the `func` instruction that follows as an operand.
    pub fn write_call(&mut self) {
        self.listing.put(" call");
        self.code.push(Tag::Call as u8);
    }

    pub fn write_op(&mut self, op: Operator) {
        if op != Operator::End {
            self.listing.put(&format!(" {}", op));
        }
        self.code.push(op as u8);
    }

    pub fn write_func(&mut self, code: u16) {
        self.listing.put(&format!(" {}", code));
        self.code.extend_from_slice(&code.to_le_bytes());
    }

    pub fn write_param(&mut self, param: Param) {
        debug_assert!(param.is_emitted());
        self.listing.put(&format!(" {}:", param));
        self.code.push(param.as_char() as u8);
    }

    pub fn write_params_end(&mut self) {
        self.code.push(b';');
    }

    /// Overwrites the number item starting at `at`.
    pub fn patch_num(&mut self, at: Address, n: i64) -> Result<()> {
        match self.code.get(at) {
            Some(&tag) if tag == Tag::Num as u8 && at + 9 <= self.code.len() => {
                self.code[at + 1..at + 9].copy_from_slice(&n.to_le_bytes());
                Ok(())
            }
            _ => Err(error!(InternalError; "NO NUMBER TO PATCH AT {:#x}", at)),
        }
    }

    fn write_text(&mut self, s: &str) -> Result<()> {
        let len = s.len() + 1;
        if len > u16::max_value() as usize {
            return Err(error!(StringTooLong; "{} BYTES", s.len()));
        }
        self.code.extend_from_slice(&(len as u16).to_le_bytes());
        self.code.extend_from_slice(s.as_bytes());
        self.code.push(0);
        Ok(())
    }
}
