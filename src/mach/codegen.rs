use super::var::NULL;
use super::{Compiler, Label, Opcode, Operator, Param};
use crate::error;
use crate::lang::{Constant, Error, Line, Symbol};

type Result<T> = std::result::Result<T, Error>;

const OPERAND_STOP: &str = "%!=+-/*&|>< \t[],";

impl Compiler {
    /// Emits one expression: operands separated by operators and closed
    /// by the end operator. Returns false when no operand is present.
    pub(super) fn value(&mut self, line: &mut Line) -> Result<bool> {
        let mut first = true;
        loop {
            line.skip(" \t[");
            if !self.operand(line, first)? {
                return Ok(false);
            }
            first = false;
            line.skip(" \t,");
            let at = line.offset();
            let op = match line.operator(Operator::CHARS) {
                Some(op) => op,
                None => break,
            };
            match Operator::from_source(op) {
                Some(op) => self.program.write_op(op),
                None => {
                    return Err(
                        error!(SyntaxError, ..&(at..line.offset()); "[{}] IS NOT AN OPERATOR", op),
                    )
                }
            }
        }
        line.skip("]");
        self.program.write_op(Operator::End);
        Ok(true)
    }

    fn operand(&mut self, line: &mut Line, first: bool) -> Result<bool> {
        let at = line.offset();
        if line.rest().starts_with('"') {
            let text = match line.delimited('"') {
                Some(text) => text,
                None => {
                    let end = line.base().len();
                    return Err(error!(SyntaxError, ..&(at..end); "UNTERMINATED STRING"));
                }
            };
            if text.len() >= self.config.max_string_len {
                return Err(error!(StringTooLong, ..&(at..line.offset()); "{} BYTES", text.len()));
            }
            self.program.write_str(text)?;
            return Ok(true);
        }
        if line.rest().starts_with('#') {
            let name = match line.delimited('#') {
                Some(name) => name,
                None => return Err(error!(SyntaxError, ..&(at..at + 1); "MISSING CLOSING #")),
            };
            return match self.symbols.get(name).cloned() {
                Some(Symbol::Constant(constant)) => {
                    self.write_constant(&constant)?;
                    Ok(true)
                }
                _ => Err(
                    error!(UndefinedSymbol, ..&(at..line.offset()); "[{}] IS NOT A CONSTANT", name),
                ),
            };
        }
        let word = match line.word(OPERAND_STOP) {
            Some(word) if !word.is_empty() => word,
            _ if first => return Ok(false),
            _ => return Err(error!(SyntaxError, ..&(at..at + 1); "MISSING OPERAND")),
        };
        let col = at..line.offset();
        if is_number(word) {
            let n = parse_number(word).map_err(|e| e.in_column(&col))?;
            self.program.write_num(n);
            return Ok(true);
        }
        match self.symbols.get(word).cloned() {
            Some(Symbol::Variable) => self.program.write_var(word)?,
            Some(Symbol::Constant(constant)) => self.write_constant(&constant)?,
            Some(Symbol::Function { code, params }) => {
                self.program.write_call();
                self.function(line, code, &params)?;
            }
            Some(Symbol::Command(_)) => {
                return Err(
                    error!(SyntaxError, ..&col; "[{}] CAN NOT BE USED IN AN EXPRESSION", word),
                )
            }
            None => return Err(error!(UndefinedSymbol, ..&col; "[{}] IS NOT DEFINED", word)),
        }
        Ok(true)
    }

    fn write_constant(&mut self, constant: &Constant) -> Result<()> {
        match constant {
            Constant::Number(n) => {
                self.program.write_num(*n);
                Ok(())
            }
            Constant::Text(s) => self.program.write_str(s),
        }
    }

    /// Emits a `func` instruction and one expression per parameter.
    pub(super) fn function(&mut self, line: &mut Line, code: u16, params: &[Param]) -> Result<()> {
        self.check_switch_block(None)?;
        if self.block_check.contains(&code) && !self.block.is_complete() {
            return Err(error!(BlockCheck; "FUNCTION {} CALLED INSIDE {}", code, self.block.info()));
        }
        self.program.write_code(Opcode::Func);
        self.program.write_func(code);
        let mut index = 0;
        while let Some(&param) = params.get(index) {
            match param {
                Param::Stop => break,
                Param::Skip => {
                    line.skip(" \t");
                    line.word(" \t");
                    index += 1;
                }
                Param::Optional => {
                    self.program.write_param(param);
                    if !self.value(line)? {
                        self.program.write_var(NULL)?;
                        self.program.write_op(Operator::End);
                        break;
                    }
                }
                _ => {
                    self.program.write_param(param);
                    if !self.value(line)? {
                        return Err(error!(SyntaxError; "MISSING PARAMETER {} ({})", index + 1, param));
                    }
                    index += 1;
                }
            }
        }
        self.program.write_params_end();
        Ok(())
    }

    /// `name`, `name = e`, `name += e` and friends, `name++`, `name--`.
    pub(super) fn assign(&mut self, line: &mut Line, name: &str) -> Result<()> {
        line.skip(" \t");
        let at = line.offset();
        let op = match line.operator("=+-*/%") {
            Some(op) => op,
            None => return expect_end(line),
        };
        let opcode = match op {
            "=" => Opcode::Mov,
            "+=" => Opcode::Add,
            "-=" => Opcode::Sub,
            "*=" => Opcode::Mul,
            "/=" => Opcode::Div,
            "%=" => Opcode::Mod,
            "++" => Opcode::Inc,
            "--" => Opcode::Dec,
            _ => {
                return Err(
                    error!(SyntaxError, ..&(at..line.offset()); "[{}] IS NOT AN ASSIGNMENT", op),
                )
            }
        };
        self.program.write_code(opcode);
        self.program.write_var(name)?;
        if opcode == Opcode::Inc || opcode == Opcode::Dec {
            return expect_end(line);
        }
        if !self.value(line)? {
            return Err(error!(SyntaxError, ..&(at..line.offset()); "MISSING VALUE FOR {}", name));
        }
        expect_end(line)
    }

    /// Writes a jump operand whose address is patched at link time.
    pub(super) fn write_label(&mut self, label: Label) -> Result<()> {
        self.link
            .link_addr_to_label(self.program.position(), label);
        self.program.write_num(label.packed() as i64);
        Ok(())
    }

    pub(super) fn goto(&mut self, label: Label) -> Result<()> {
        self.program.write_code(Opcode::Goto);
        self.write_label(label)
    }
}

pub(super) fn expect_end(line: &mut Line) -> Result<()> {
    line.skip(" \t");
    if line.is_empty() {
        Ok(())
    } else {
        let at = line.offset();
        let end = line.base().len();
        Err(error!(SyntaxError, ..&(at..end); "UNEXPECTED [{}]", line.rest()))
    }
}

pub(super) fn is_number(word: &str) -> bool {
    !word.is_empty() && word.bytes().all(|b| b.is_ascii_digit())
}

pub(super) fn parse_number(word: &str) -> Result<i64> {
    word.parse::<i64>()
        .map_err(|_| error!(SyntaxError; "[{}] IS OUT OF RANGE", word))
}
