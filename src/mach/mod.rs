/*!
# Rust Machine Module

This Rust module is the compiler back end and the virtual machine:
control block resolution, code generation into a compact instruction
stream, jump fixups and a stack machine that runs the result.

*/

pub type Address = usize;

mod block;
mod codegen;
mod compile;
mod cursor;
mod function;
mod link;
mod listing;
mod op;
mod opcode;
mod operation;
mod program;
mod runtime;
mod stack;
mod val;
mod var;

pub use block::{Block, BlockId, Label, Point, MAX_BLOCKS};
pub use compile::{compile, Compiler, Config};
pub use cursor::Cursor;
pub use function::{Host, Natives, Param};
pub use link::Link;
pub use listing::{disassemble, Listing};
pub use op::Operator;
pub use opcode::{Opcode, Tag};
pub use operation::Operation;
pub use program::Program;
pub use runtime::{Event, Runtime};
pub use stack::Stack;
pub use val::{Kind, Val};
pub use var::{Var, CASE, NULL};

#[cfg(test)]
mod tests;
