//! # Aegis Script
//!
//! A small control language compiled to a compact bytecode and run on a
//! stack machine that calls back into its host for every native function.
//!
//! ```
//! use aegis::mach::{compile, Natives, Runtime, Val};
//!
//! let program = compile("demo", "var x = 2 + 3\nvar y\nif x == 5\n  y = 1\nendif").unwrap();
//! let mut runtime = Runtime::new();
//! runtime.start(program.into_code(), 0, false).unwrap();
//! runtime.run(&mut Natives::new()).unwrap();
//! assert_eq!(runtime.var().fetch("y"), Val::Integer(1));
//! ```
//!
//! Scripts are a sequence of lines. A line is a control word such as
//! `if`, `while` or `choose`, an assignment, or a call to a function
//! made known with `declare`. Parenthesized sub-expressions are lifted
//! into temporaries before a line is compiled.
//!
//! Install the command line tool with `cargo install aegis-script`, then
//! `aegis run hello.aeg`.

pub mod lang;
pub mod mach;
