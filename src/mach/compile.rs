use super::codegen::{expect_end, is_number, parse_number};
use super::var::CASE;
use super::{Block, Label, Link, Opcode, Param, Program, Stack};
use crate::error;
use crate::lang::{lex, parse, Constant, Error, Line, Symbol, SymbolTable, Word};
use std::collections::BTreeSet;
use std::convert::TryFrom;
use std::rc::Rc;
use tracing::{debug, instrument};

type Result<T> = std::result::Result<T, Error>;

/// Compiles one script into a finished program.
pub fn compile(file: &str, source: &str) -> Result<Program> {
    let mut compiler = Compiler::new();
    compiler.compile(file, source)?;
    compiler.finish()
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Prefix of the temporaries created for parenthesized sub-expressions.
    pub temp_prefix: String,
    /// String literals must be shorter than this many bytes.
    pub max_string_len: usize,
    /// Open `choose` blocks allowed inside one `if` level.
    pub max_switch_in_if: usize,
    pub max_blocks: usize,
    pub listing: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            temp_prefix: "$".to_string(),
            max_string_len: 250,
            max_switch_in_if: 30,
            max_blocks: super::block::MAX_BLOCKS,
            listing: true,
        }
    }
}

type ErrorSink = Box<dyn FnMut(&str)>;

/// ## Script compiler
///
/// Translates source one line at a time. Several scripts may be compiled
/// into the same program before `finish` appends the final `end` and
/// patches every jump.

pub struct Compiler {
    pub(super) config: Config,
    pub(super) symbols: SymbolTable,
    pub(super) program: Program,
    pub(super) block: Block,
    pub(super) link: Link,
    pub(super) block_check: BTreeSet<u16>,
    structures: Stack<Word>,
    in_case: bool,
    switch_ends: Stack<Label>,
    switch_in_if: Vec<usize>,
    if_depth: usize,
    switch_depth: usize,
    while_label: Option<Label>,
    while_stack: Stack<Option<Label>>,
    file: String,
    sink: Option<ErrorSink>,
}

impl Default for Compiler {
    fn default() -> Self {
        Compiler::with_config(Config::default())
    }
}

impl Compiler {
    pub fn new() -> Compiler {
        Compiler::default()
    }

    pub fn with_config(config: Config) -> Compiler {
        Compiler {
            symbols: SymbolTable::new(),
            program: Program::with_listing(config.listing),
            block: Block::with_limit(config.max_blocks),
            link: Link::new(),
            block_check: BTreeSet::new(),
            structures: Stack::new("BLOCKS NESTED TOO DEEPLY", "BLOCK MISMATCH"),
            in_case: false,
            switch_ends: Stack::new("CHOOSE NESTED TOO DEEPLY", "BREAK WITHOUT CHOOSE"),
            switch_in_if: vec![0],
            if_depth: 0,
            switch_depth: 0,
            while_label: None,
            while_stack: Stack::new("WHILE NESTED TOO DEEPLY", "ENDWHILE WITHOUT WHILE"),
            file: String::new(),
            sink: None,
            config,
        }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn block(&self) -> &Block {
        &self.block
    }

    /// Receives every compile diagnostic, already formatted.
    pub fn set_error_sink<F>(&mut self, sink: F)
    where
        F: FnMut(&str) + 'static,
    {
        self.sink = Some(Box::new(sink));
    }

    #[instrument(level = "debug", skip(self, source))]
    pub fn compile(&mut self, file: &str, source: &str) -> Result<()> {
        self.file = file.to_string();
        self.program
            .listing_mut()
            .comment(&format!("load {}", file));
        for (index, text) in lex(source).iter().enumerate() {
            debug!(line = index + 1, text = text.as_str(), "analyze");
            if let Err(error) = self.analyze_line(text) {
                let error = error
                    .in_file(file)
                    .in_line_number(Some(index + 1))
                    .with_text(text);
                return Err(self.report(error));
            }
        }
        Ok(())
    }

    /// Appends the final `end` and patches every jump.
    pub fn finish(mut self) -> Result<Program> {
        if let Some(open) = self.structures.last() {
            let closer = match open {
                Word::While => Word::Endwhile,
                Word::Choose => Word::Endchoose,
                _ => Word::Endif,
            };
            let error = error!(UnclosedBlock; "{} WITHOUT {}", open, closer).in_file(&self.file);
            return Err(self.report(error));
        }
        self.program.listing_mut().comment("link");
        self.program.write_code(Opcode::End);
        if let Err(error) = self.link.link(&mut self.program, &self.block) {
            let error = error.in_file(&self.file);
            return Err(self.report(error));
        }
        let summary = format!(
            "{} bytes crc32 {:08x}",
            self.program.len(),
            self.program.checksum()
        );
        self.program.listing_mut().comment(&summary);
        debug!(bytes = self.program.len(), "linked");
        Ok(self.program)
    }

    /// Loads an enum file: `;` comments, `# n` resets the counter and
    /// every other word becomes the next numeric constant.
    pub fn load_enum(&mut self, file: &str, source: &str) -> Result<()> {
        self.file = file.to_string();
        let mut counter: i64 = 0;
        for (index, text) in source.lines().enumerate() {
            if let Err(error) = self.enum_line(text, &mut counter) {
                let error = error
                    .in_file(file)
                    .in_line_number(Some(index + 1))
                    .with_text(text);
                return Err(self.report(error));
            }
        }
        debug!(file, last = counter, "enum loaded");
        Ok(())
    }

    /// Loads a definition file of `name value` lines.
    pub fn load_def(&mut self, file: &str, source: &str) -> Result<()> {
        self.file = file.to_string();
        for (index, text) in source.lines().enumerate() {
            if let Err(error) = self.def_line(text) {
                let error = error
                    .in_file(file)
                    .in_line_number(Some(index + 1))
                    .with_text(text);
                return Err(self.report(error));
            }
        }
        Ok(())
    }

    fn report(&mut self, error: Error) -> Error {
        let message = error.to_string();
        self.program.listing_mut().error(&message);
        if let Some(sink) = &mut self.sink {
            sink(&message);
        }
        error
    }

    fn enum_line(&mut self, text: &str, counter: &mut i64) -> Result<()> {
        let mut line = Line::new(text);
        line.skip(" \t");
        if line.rest().starts_with(';') {
            return Ok(());
        }
        if line.rest().starts_with('#') {
            line.skip("#");
            line.skip(" \t");
            let word = line.word(" \t").unwrap_or("");
            *counter = match word.parse::<i64>() {
                Ok(n) => n,
                Err(_) => return Err(error!(SyntaxError; "[{}] IS NOT A NUMBER", word)),
            };
            return Ok(());
        }
        loop {
            line.skip(", \t");
            let name = match line.word(", \t") {
                Some(name) if !name.is_empty() && !name.starts_with("//") => name,
                _ => break,
            };
            self.symbols
                .set(name, Symbol::Constant(Constant::Number(*counter)))?;
            *counter += 1;
        }
        Ok(())
    }

    fn def_line(&mut self, text: &str) -> Result<()> {
        let mut line = Line::new(text);
        line.skip(" \t");
        let name = match line.word(" \t") {
            Some(name) if !name.is_empty() => name,
            _ => return Ok(()),
        };
        line.skip(" \t");
        let value = line.word(" \t").unwrap_or("");
        let number = match value.parse::<i64>() {
            Ok(n) => n,
            Err(_) => return Err(error!(SyntaxError; "[{}] IS NOT A NUMBER", value)),
        };
        self.symbols
            .set(name, Symbol::Constant(Constant::Number(number)))
    }

    fn analyze_line(&mut self, text: &str) -> Result<()> {
        let mut line = Line::new(text);
        line.skip(" \t");
        let head = match line.word(" \t(=+-*/[") {
            Some(head) => head,
            None => return Ok(()),
        };
        if head.is_empty() {
            let at = line.offset();
            return Err(error!(SyntaxError, ..&(at..at + 1); "UNEXPECTED [{}]", line.rest()));
        }
        match self.symbols.get(head).cloned() {
            Some(Symbol::Command(word)) => {
                self.check_switch_block(Some(word))?;
                self.control(word)?;
            }
            Some(_) => {}
            None if self.is_auto_var(head) => {}
            None => return Err(error!(UndefinedSymbol; "[{}] IS NOT DEFINED", head)),
        }
        let statements = parse(text, &self.config.temp_prefix)?;
        for statement in &statements {
            self.analyze_statement(statement).map_err(|e| {
                if statement.trim() == text.trim() {
                    e
                } else {
                    e.in_fragment(statement)
                }
            })?;
        }
        Ok(())
    }

    fn analyze_statement(&mut self, text: &str) -> Result<()> {
        let mut line = Line::new(text);
        line.skip(" \t");
        let head = match line.word(" \t(=+-*/%[") {
            Some(head) => head,
            None => return Ok(()),
        };
        if head.is_empty() {
            let at = line.offset();
            return Err(error!(SyntaxError, ..&(at..at + 1); "UNEXPECTED [{}]", line.rest()));
        }
        if !self.symbols.contains(head) && self.is_auto_var(head) {
            self.symbols.set(head, Symbol::Variable)?;
        }
        match self.symbols.get(head).cloned() {
            Some(Symbol::Command(word)) => self.command(word, &mut line),
            Some(Symbol::Function { code, params }) => self.function(&mut line, code, &params),
            Some(Symbol::Variable) => self.assign(&mut line, head),
            Some(Symbol::Constant(_)) => {
                Err(error!(SyntaxError; "CONSTANT [{}] IS NOT A STATEMENT", head))
            }
            None => Err(error!(UndefinedSymbol; "[{}] IS NOT DEFINED", head)),
        }
    }

    fn is_auto_var(&self, name: &str) -> bool {
        name.starts_with('$') || name.starts_with(self.config.temp_prefix.as_str())
    }

    /// Directly inside a `choose` and outside a case body only the
    /// words that continue the `choose` are legal.
    pub(super) fn check_switch_block(&self, word: Option<Word>) -> Result<()> {
        if self.in_case || self.structures.last() != Some(&Word::Choose) {
            return Ok(());
        }
        match word {
            Some(Word::Case) | Some(Word::Default) | Some(Word::Endchoose) => Ok(()),
            Some(word) => Err(error!(IllegalInChoose; "[{}] OUTSIDE CASE", word)),
            None => Err(error!(IllegalInChoose; "FUNCTION CALL OUTSIDE CASE")),
        }
    }

    /// Block bookkeeping for a control word. Runs before the statements
    /// of the line are emitted so branch targets land in front of them.
    /// `choose` is pushed by its handler once the selector is written.
    fn control(&mut self, word: Word) -> Result<()> {
        use Word::*;
        match word {
            If | While | Choose => {
                let start = self.block.start(self.program.position())?;
                self.program
                    .listing_mut()
                    .comment(&format!("{} {}", word, start));
                if word != Choose {
                    self.structures.push(word)?;
                }
            }
            Elseif | Else => {
                self.expect_structure(If, word)?;
                let end = self.block.end_label()?;
                self.goto(end)?;
                self.link_block(word)?;
            }
            Case | Default => {
                self.expect_structure(Choose, word)?;
                self.link_block(word)?;
            }
            Break => {
                let end = match self.switch_ends.last() {
                    Some(end) => *end,
                    None => return Err(error!(BlockMismatch; "BREAK WITHOUT CHOOSE")),
                };
                self.goto(end)?;
            }
            Endif | Endwhile | Endchoose => {
                let opener = match word {
                    Endif => If,
                    Endwhile => While,
                    _ => Choose,
                };
                self.expect_structure(opener, word)?;
                if word == Endwhile {
                    let start = self.block.start_label()?;
                    self.goto(start)?;
                }
                self.link_block(word)?;
                let end = self.block.end(self.program.position())?;
                self.program
                    .listing_mut()
                    .comment(&format!("{} {}", word, end));
                self.structures.pop()?;
                if word == Endchoose {
                    self.switch_ends.pop()?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn expect_structure(&self, opener: Word, word: Word) -> Result<()> {
        match self.structures.last() {
            Some(open) if *open == opener => Ok(()),
            Some(open) => Err(error!(BlockMismatch; "{} INSIDE {}", word, open)),
            None => Err(error!(BlockMismatch; "{} WITHOUT {}", word, opener)),
        }
    }

    fn link_block(&mut self, word: Word) -> Result<()> {
        let label = self.block.link(self.program.position())?;
        self.program
            .listing_mut()
            .comment(&format!("{} {}", word, label));
        Ok(())
    }

    fn command(&mut self, word: Word, line: &mut Line) -> Result<()> {
        use Word::*;
        match word {
            Word::Block => Err(error!(BlockBreak; "{}", self.block.info())),
            End => {
                self.program.write_code(Opcode::End);
                expect_end(line)
            }
            Var => self.var(line),
            If => {
                self.condition(line, word)?;
                self.if_depth += 1;
                self.switch_in_if.push(0);
                Ok(())
            }
            Elseif => self.condition(line, word),
            Else => expect_end(line),
            Endif => self.endif(),
            Declare => self.declare(line),
            Define => self.define(line),
            Defcmd => self.defcmd(line),
            Choose => self.choose(line),
            Case => self.case(line),
            Break => {
                if self.switch_depth == 1 {
                    self.in_case = false;
                }
                Ok(())
            }
            Default => {
                self.in_case = true;
                Ok(())
            }
            Endchoose => self.endchoose(),
            While => self.cmd_while(line),
            Endwhile => {
                self.while_label = self.while_stack.pop()?;
                Ok(())
            }
            Exitwhile => match self.while_label {
                Some(end) => self.goto(end),
                None => Err(error!(BlockMismatch; "EXITWHILE WITHOUT WHILE")),
            },
        }
    }

    fn condition(&mut self, line: &mut Line, word: Word) -> Result<()> {
        self.program.write_code(Opcode::Cmp);
        if !self.value(line)? {
            return Err(error!(SyntaxError; "MISSING CONDITION AFTER {}", word));
        }
        expect_end(line)?;
        let next = self.block.next_label()?;
        self.write_label(next)
    }

    fn endif(&mut self) -> Result<()> {
        if self.switch_in_if.len() > 1 {
            self.switch_in_if.pop();
        }
        self.if_depth = self.if_depth.saturating_sub(1);
        Ok(())
    }

    fn choose(&mut self, line: &mut Line) -> Result<()> {
        self.program.write_code(Opcode::Push);
        self.program.write_var(CASE)?;
        self.program.write_code(Opcode::Mov);
        self.program.write_var(CASE)?;
        if !self.value(line)? {
            return Err(error!(SyntaxError; "MISSING VALUE AFTER choose"));
        }
        expect_end(line)?;
        if !self.symbols.contains(CASE) {
            self.symbols.set(CASE, Symbol::Variable)?;
        }
        let end = self.block.end_label()?;
        self.switch_ends.push(end)?;
        self.structures.push(Word::Choose)?;
        if self.if_depth > 0 {
            let max = self.config.max_switch_in_if;
            if let Some(count) = self.switch_in_if.last_mut() {
                if *count >= max {
                    return Err(error!(TooManySwitches; "LIMIT IS {}", max));
                }
                *count += 1;
            }
        }
        self.switch_depth += 1;
        self.in_case = false;
        Ok(())
    }

    fn case(&mut self, line: &mut Line) -> Result<()> {
        self.program.write_code(Opcode::Case);
        if !self.value(line)? {
            return Err(error!(SyntaxError; "MISSING VALUE AFTER case"));
        }
        expect_end(line)?;
        let next = self.block.next_label()?;
        self.write_label(next)?;
        self.in_case = true;
        Ok(())
    }

    fn endchoose(&mut self) -> Result<()> {
        if self.switch_depth == 0 {
            return Err(error!(BlockMismatch; "ENDCHOOSE WITHOUT CHOOSE"));
        }
        self.switch_depth -= 1;
        if self.if_depth > 0 {
            if let Some(count) = self.switch_in_if.last_mut() {
                *count = count.saturating_sub(1);
            }
        }
        self.in_case = self.switch_depth > 0;
        self.program.write_code(Opcode::Pop);
        self.program.write_var(CASE)
    }

    fn cmd_while(&mut self, line: &mut Line) -> Result<()> {
        self.while_stack.push(self.while_label)?;
        self.program.write_code(Opcode::Cmp);
        if !self.value(line)? {
            return Err(error!(SyntaxError; "MISSING CONDITION AFTER while"));
        }
        expect_end(line)?;
        let end = self.block.end_label()?;
        self.while_label = Some(end);
        self.write_label(end)
    }

    fn var(&mut self, line: &mut Line) -> Result<()> {
        line.skip(" \t");
        let name = required(line.word("= \t"), "MISSING VARIABLE NAME")?;
        self.symbols.set(name, Symbol::Variable)?;
        self.program
            .listing_mut()
            .comment(&format!("var {}", name));
        self.assign(line, name)
    }

    fn define(&mut self, line: &mut Line) -> Result<()> {
        line.skip(" \t");
        let name = required(line.word(" \t"), "MISSING CONSTANT NAME")?;
        line.skip(" \t");
        let constant = if line.rest().starts_with('"') {
            let at = line.offset();
            match line.delimited('"') {
                Some(text) => Constant::Text(text.to_string()),
                None => {
                    let end = line.base().len();
                    return Err(error!(SyntaxError, ..&(at..end); "UNTERMINATED STRING"));
                }
            }
        } else {
            self.constant_value(line)?
        };
        expect_end(line)?;
        self.program
            .listing_mut()
            .comment(&format!("define {} {}", name, constant));
        self.symbols.set(name, Symbol::Constant(constant))
    }

    /// A number, or a constant optionally followed by `++` or `--`.
    /// The constant itself is incremented; its previous value is returned.
    fn constant_value(&mut self, line: &mut Line) -> Result<Constant> {
        line.skip(" \t");
        let word = required(line.word(" \t+-"), "MISSING NUMBER OR CONSTANT")?;
        if is_number(word) {
            return Ok(Constant::Number(parse_number(word)?));
        }
        let constant = match self.symbols.get(word) {
            Some(Symbol::Constant(constant)) => constant.clone(),
            Some(_) => return Err(error!(SyntaxError; "[{}] IS NOT A CONSTANT", word)),
            None => return Err(error!(UndefinedSymbol; "[{}] IS NOT DEFINED", word)),
        };
        if let Some(op) = line.operator("+-") {
            let step = match op {
                "++" => 1,
                "--" => -1,
                _ => return Err(error!(SyntaxError; "[{}] CAN NOT FOLLOW A CONSTANT", op)),
            };
            let n = match constant {
                Constant::Number(n) => n,
                Constant::Text(_) => {
                    return Err(error!(TypeMismatch; "[{}] IS NOT NUMERIC", word))
                }
            };
            if let Some(Symbol::Constant(stored)) = self.symbols.get_mut(word) {
                *stored = Constant::Number(n.wrapping_add(step));
            }
        }
        Ok(constant)
    }

    fn declare(&mut self, line: &mut Line) -> Result<()> {
        line.skip(" \t");
        let name = required(line.word(" \t"), "MISSING FUNCTION NAME")?;
        line.skip(" \t");
        let shape = required(line.word(" \t"), "MISSING PARAMETER SHAPE")?;
        let params: Rc<[Param]> = Param::shape(shape)?.into();
        let code = match self.constant_value(line)? {
            Constant::Number(n) => match u16::try_from(n) {
                Ok(code) => code,
                Err(_) => return Err(error!(SyntaxError; "FUNCTION CODE {} OUT OF RANGE", n)),
            },
            Constant::Text(_) => {
                return Err(error!(SyntaxError; "FUNCTION CODE MUST BE A NUMBER"))
            }
        };
        line.skip(" \t");
        if let Some(marker) = line.word(" \t") {
            if marker.eq_ignore_ascii_case("blockcheck") {
                self.block_check.insert(code);
            } else {
                return Err(error!(SyntaxError; "UNEXPECTED [{}]", marker));
            }
        }
        expect_end(line)?;
        self.program
            .listing_mut()
            .comment(&format!("declare {} {} {}", name, shape, code));
        self.symbols.set(name, Symbol::Function { code, params })
    }

    fn defcmd(&mut self, line: &mut Line) -> Result<()> {
        line.skip(" \t");
        let name = required(line.word(" \t"), "MISSING NAME")?;
        line.skip(" \t");
        let existing = required(line.word(" \t"), "MISSING SYMBOL TO COPY")?;
        expect_end(line)?;
        self.program
            .listing_mut()
            .comment(&format!("defcmd {} {}", name, existing));
        self.symbols.alias(name, existing)
    }
}

fn required<'a>(word: Option<&'a str>, message: &str) -> Result<&'a str> {
    match word {
        Some(word) if !word.is_empty() => Ok(word),
        _ => Err(error!(SyntaxError; "{}", message)),
    }
}
