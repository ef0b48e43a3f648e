use super::var::CASE;
use super::{Address, Cursor, Host, Kind, Opcode, Operation, Operator, Param, Stack, Tag, Val, Var};
use crate::error;
use crate::lang::{Error, ErrorCode};
use std::convert::TryFrom;
use std::rc::Rc;
use tracing::trace;

type Result<T> = std::result::Result<T, Error>;

/// Outcome of one `execute` batch.
#[derive(Debug)]
pub enum Event {
    Stopped,
    Running,
    Error(Error),
}

/// ## Virtual machine
///
/// Executes a linked instruction stream one instruction per step.
/// Natives are reached through the `Host` passed to every call.

pub struct Runtime {
    code: Cursor,
    scan: bool,
    goto_lock: bool,
    running: bool,
    interrupted: bool,
    stack: Stack<Val>,
    var: Var,
}

impl Default for Runtime {
    fn default() -> Self {
        Runtime {
            code: Cursor::default(),
            scan: false,
            goto_lock: false,
            running: false,
            interrupted: false,
            stack: Stack::new("STACK OVERFLOW", "POP WITHOUT PUSH"),
            var: Var::new(),
        }
    }
}

impl Runtime {
    pub fn new() -> Runtime {
        Runtime::default()
    }

    /// Prepares a run from `pos`. Variables and the stack start empty.
    /// With `goto_lock` set every jump falls through.
    pub fn start<T: Into<Rc<[u8]>>>(&mut self, code: T, pos: Address, goto_lock: bool) -> Result<()> {
        self.code = Cursor::new(code.into());
        self.code.seek(pos)?;
        self.var.clear();
        self.stack.clear();
        self.scan = false;
        self.goto_lock = goto_lock;
        self.running = true;
        self.interrupted = false;
        Ok(())
    }

    /// Walks from `pos` to the first `end`. Variables and the stack are
    /// left alone, jumps are not taken and calls go to `Host::check`.
    pub fn scan<T: Into<Rc<[u8]>>>(&mut self, code: T, pos: Address, host: &mut dyn Host) -> Result<()> {
        self.code = Cursor::new(code.into());
        self.code.seek(pos)?;
        self.scan = true;
        self.running = true;
        let result = self.run(host);
        self.scan = false;
        self.running = false;
        result
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn position(&self) -> Address {
        self.code.position()
    }

    /// The next `execute` stops with an `Interrupted` error.
    pub fn interrupt(&mut self) {
        self.interrupted = true;
    }

    pub fn var(&self) -> &Var {
        &self.var
    }

    pub fn var_mut(&mut self) -> &mut Var {
        &mut self.var
    }

    pub fn set_var(&mut self, name: &str, val: Val) -> Result<()> {
        self.var.store(&name.into(), val)
    }

    pub fn run(&mut self, host: &mut dyn Host) -> Result<()> {
        while self.step(host)? {}
        Ok(())
    }

    /// Runs at most `cycles` instructions.
    pub fn execute(&mut self, host: &mut dyn Host, cycles: usize) -> Event {
        if self.interrupted {
            self.interrupted = false;
            self.running = false;
            let error = error!(Interrupted).at_address(self.code.position());
            host.error(&error.to_string());
            return Event::Error(error);
        }
        for _ in 0..cycles {
            match self.step(host) {
                Ok(true) => {}
                Ok(false) => return Event::Stopped,
                Err(error) => return Event::Error(error),
            }
        }
        Event::Running
    }

    /// Executes one instruction. False once `end` is reached.
    pub fn step(&mut self, host: &mut dyn Host) -> Result<bool> {
        if !self.running {
            return Ok(false);
        }
        let at = self.code.position();
        match self.instruction(host) {
            Ok(more) => Ok(more),
            Err(error) => {
                self.running = false;
                let error = error.at_address(at);
                host.error(&error.to_string());
                Err(error)
            }
        }
    }

    fn instruction(&mut self, host: &mut dyn Host) -> Result<bool> {
        use Opcode::*;
        let opcode = self.code.read_code()?;
        match opcode {
            End => {
                self.running = false;
                return Ok(false);
            }
            Mov | Add | Sub | Mul | Div | Mod => {
                let name = self.code.read_var()?;
                let value = self.expression(host)?;
                if !self.scan {
                    let lhs = self.var.fetch(&name);
                    let value = match opcode {
                        Add => Operation::sum(lhs, value)?,
                        Sub => Operation::subtract(lhs, value)?,
                        Mul => Operation::multiply(lhs, value)?,
                        Div => Operation::divide(lhs, value)?,
                        Mod => Operation::modulo(lhs, value)?,
                        _ => value,
                    };
                    self.var.store(&name, value)?;
                }
            }
            Inc | Dec => {
                let name = self.code.read_var()?;
                if !self.scan {
                    let val = self.var.fetch(&name);
                    let val = if opcode == Inc {
                        Operation::increment(val)
                    } else {
                        Operation::decrement(val)
                    };
                    self.var.store(&name, val)?;
                }
            }
            Cmp => {
                let value = self.expression(host)?;
                let addr = self.code.read_num()?;
                if !value.is_truthy() {
                    self.jump(addr)?;
                }
            }
            Case => {
                let value = self.expression(host)?;
                let addr = self.code.read_num()?;
                if !self.scan && !Operation::matches(&value, &self.var.fetch(CASE))? {
                    self.jump(addr)?;
                }
            }
            Goto => {
                let addr = self.code.read_num()?;
                self.jump(addr)?;
            }
            Func => {
                self.call(host)?;
            }
            Push => {
                let name = self.code.read_var()?;
                if !self.scan {
                    self.stack.push(self.var.fetch(&name))?;
                }
            }
            Pop => {
                let name = self.code.read_var()?;
                if !self.scan {
                    let val = self.stack.pop()?;
                    self.var.store(&name, val)?;
                }
            }
        }
        Ok(true)
    }

    fn jump(&mut self, addr: i64) -> Result<()> {
        if self.scan || self.goto_lock {
            return Ok(());
        }
        let dest = match usize::try_from(addr) {
            Ok(dest) => dest,
            Err(_) => return Err(error!(AddressOutOfRange; "{}", addr)),
        };
        trace!(dest, "jump");
        self.code.seek(dest)
    }

    fn expression(&mut self, host: &mut dyn Host) -> Result<Val> {
        let mut operands: Vec<Val> = vec![];
        let mut operators: Vec<Operator> = vec![];
        loop {
            let at = self.code.position();
            let val = match self.code.tag()? {
                Tag::Str => Val::String(self.code.text()?),
                Tag::Num => Val::Integer(self.code.number()?),
                Tag::Var => {
                    let name = self.code.text()?;
                    self.var.fetch(&name)
                }
                Tag::Call => {
                    let opcode = self.code.read_code()?;
                    if opcode != Opcode::Func {
                        return Err(error!(UnexpectedTag; "CALL TO {}", opcode).at_address(at));
                    }
                    self.call(host)?
                }
                Tag::Code => {
                    return Err(error!(UnexpectedTag; "CODE IN EXPRESSION").at_address(at))
                }
            };
            operands.push(val);
            let at = self.code.position();
            match Operator::try_from(self.code.byte()?).map_err(|e| e.at_address(at))? {
                Operator::End => break,
                op => operators.push(op),
            }
        }
        if self.scan {
            return Ok(Val::default());
        }
        Operation::reduce(operands, operators)
    }

    fn call(&mut self, host: &mut dyn Host) -> Result<Val> {
        let code = self.code.word()?;
        let mut args: Vec<Val> = vec![];
        loop {
            let at = self.code.position();
            let byte = self.code.byte()?;
            if byte == b';' {
                break;
            }
            let param = Param::try_from(byte).map_err(|e| e.at_address(at))?;
            let value = self.expression(host)?;
            args.push(match param {
                Param::Str => value.coerce(Kind::String)?,
                Param::Num => value.coerce(Kind::Integer)?,
                Param::Float => value.coerce(Kind::Float)?,
                _ => value,
            });
        }
        trace!(code, args = args.len(), scan = self.scan, "call");
        let result = if self.scan {
            host.check(code, &args)
        } else {
            host.call(code, &args, &mut self.var)
        };
        result.map_err(|error| {
            if error.is(ErrorCode::FunctionFailed) {
                error
            } else {
                error!(FunctionFailed; "{}", error)
            }
        })
    }
}
