extern crate ansi_term;
extern crate ctrlc;
extern crate linefeed;
use crate::Command;
use aegis::error;
use aegis::lang::Error;
use aegis::mach::{disassemble, Compiler, Event, Host, Program, Runtime, Val, Var};
use ansi_term::Style;
use linefeed::{DefaultTerminal, Interface, ReadResult};
use rand::Rng;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

type Result<T> = std::result::Result<T, Error>;

const PRINT: u16 = 1;
const INPUT: u16 = 2;
const RANDOM: u16 = 3;
const NOW: u16 = 4;
const LEN: u16 = 5;

/// Natives of the console host, compiled ahead of every script.
const PRELUDE: &str = "\
declare print s 1
declare input ? 2
declare random nn 3
declare now . 4
declare len s 5
";

pub fn main(command: Command) {
    let interrupted = Arc::new(AtomicBool::new(false));
    let int_moved = interrupted.clone();
    ctrlc::set_handler(move || {
        int_moved.store(true, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl-C handler");
    if let Err(error) = dispatch(command, interrupted) {
        eprintln!("{}", Style::new().bold().paint(error.to_string()));
        std::process::exit(1);
    }
}

fn dispatch(command: Command, interrupted: Arc<AtomicBool>) -> Result<()> {
    match command {
        Command::Compile {
            scripts,
            output,
            listing,
            enums,
            defs,
        } => {
            let program = build(&scripts, &enums, &defs)?;
            let output = match output {
                Some(output) => output,
                None => scripts[0].with_extension("aeb"),
            };
            if let Some(path) = listing {
                write(&path, program.listing().to_string().as_bytes())?;
            }
            write(&output, program.code())?;
            info!(bytes = program.len(), output = %output.display(), "compiled");
            Ok(())
        }
        Command::Run {
            scripts,
            cycles,
            enums,
            defs,
        } => {
            let program = build(&scripts, &enums, &defs)?;
            let mut console = Console::new()?;
            let mut runtime = Runtime::new();
            runtime.start(program.into_code(), 0, false)?;
            loop {
                if interrupted.load(Ordering::SeqCst) {
                    runtime.interrupt();
                    interrupted.store(false, Ordering::SeqCst);
                };
                match runtime.execute(&mut console, cycles) {
                    Event::Stopped => return Ok(()),
                    Event::Running => {}
                    Event::Error(error) => return Err(error),
                }
            }
        }
        Command::Check {
            scripts,
            enums,
            defs,
        } => {
            let program = build(&scripts, &enums, &defs)?;
            let checksum = program.checksum();
            let len = program.len();
            let mut console = Console::new()?;
            Runtime::new().scan(program.into_code(), 0, &mut console)?;
            println!("{} bytes crc32 {:08x}", len, checksum);
            Ok(())
        }
        Command::Dis { binary } => {
            let code = match fs::read(&binary) {
                Ok(code) => code,
                Err(e) => return Err(error!(InternalError; "{}: {}", binary.display(), e)),
            };
            println!("{}", disassemble(&code)?);
            Ok(())
        }
    }
}

fn build(scripts: &[PathBuf], enums: &[PathBuf], defs: &[PathBuf]) -> Result<Program> {
    let mut compiler = Compiler::new();
    compiler.compile("prelude", PRELUDE)?;
    for path in enums {
        compiler.load_enum(&name(path), &read(path)?)?;
    }
    for path in defs {
        compiler.load_def(&name(path), &read(path)?)?;
    }
    for path in scripts {
        compiler.compile(&name(path), &read(path)?)?;
    }
    compiler.finish()
}

fn name(path: &Path) -> String {
    path.display().to_string()
}

fn read(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) => Err(error!(InternalError; "{}: {}", path.display(), e)),
    }
}

fn write(path: &Path, bytes: &[u8]) -> Result<()> {
    match fs::write(path, bytes) {
        Ok(()) => Ok(()),
        Err(e) => Err(error!(InternalError; "{}: {}", path.display(), e)),
    }
}

/// Host for scripts run from the terminal.
struct Console {
    interface: Interface<DefaultTerminal>,
}

impl Console {
    fn new() -> Result<Console> {
        match Interface::new("aegis") {
            Ok(interface) => Ok(Console { interface }),
            Err(e) => Err(error!(InternalError; "TERMINAL {}", e)),
        }
    }

    fn print(&self, s: &str) -> std::io::Result<()> {
        self.interface.write_fmt(format_args!("{}\n", s))
    }

    fn input(&self, prompt: &str) -> std::io::Result<Option<String>> {
        self.interface.set_prompt(prompt)?;
        match self.interface.read_line()? {
            ReadResult::Input(string) => {
                self.interface.add_history_unique(string.clone());
                Ok(Some(string))
            }
            ReadResult::Signal(_) | ReadResult::Eof => Ok(None),
        }
    }
}

impl Host for Console {
    fn call(&mut self, code: u16, args: &[Val], _var: &mut Var) -> Result<Val> {
        let arg = |n: usize| args.get(n).cloned().unwrap_or_default();
        match code {
            PRINT => {
                self.print(&arg(0).to_text())
                    .map_err(|e| error!(FunctionFailed; "PRINT {}", e))?;
                Ok(Val::default())
            }
            INPUT => {
                let prompt = match arg(0) {
                    Val::String(s) => s.to_string(),
                    _ => "? ".to_string(),
                };
                match self.input(&prompt) {
                    Ok(Some(line)) => Ok(Val::from(line)),
                    Ok(None) => Err(error!(Interrupted; "INPUT")),
                    Err(e) => Err(error!(FunctionFailed; "INPUT {}", e)),
                }
            }
            RANDOM => {
                let low = arg(0).to_integer()?;
                let high = arg(1).to_integer()?;
                if low >= high {
                    return Ok(Val::Integer(low));
                }
                Ok(Val::Integer(rand::thread_rng().gen_range(low..=high)))
            }
            NOW => Ok(Val::from(
                chrono::Local::now()
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string(),
            )),
            LEN => Ok(Val::Integer(arg(0).to_text().chars().count() as i64)),
            _ => Err(error!(FunctionFailed; "NO NATIVE FUNCTION {}", code)),
        }
    }

    fn check(&mut self, code: u16, _args: &[Val]) -> Result<Val> {
        match code {
            PRINT..=LEN => Ok(Val::default()),
            _ => Err(error!(FunctionFailed; "NO NATIVE FUNCTION {}", code)),
        }
    }

    fn error(&mut self, message: &str) {
        tracing::debug!(error = message, "runtime error");
    }
}
