#![allow(dead_code)]
use aegis::lang::Error;
use aegis::mach::{Compiler, Natives, Program, Runtime, Val, Var};
use std::cell::RefCell;
use std::rc::Rc;

pub const PRELUDE: &str = "\
declare print s 1
declare sum nn 2
declare say ? 3
declare guard . 4 blockcheck
";

pub fn build(source: &str) -> Result<Program, Error> {
    let mut compiler = Compiler::new();
    compiler.compile("prelude", PRELUDE)?;
    compiler.compile("test", source)?;
    compiler.finish()
}

/// A host with the prelude natives. Printed text lands in `out`.
pub fn natives(out: &Rc<RefCell<Vec<String>>>) -> Natives {
    let mut natives = Natives::new();
    let print = out.clone();
    natives.insert(1, move |args, _| {
        print.borrow_mut().push(args[0].to_text().to_string());
        Ok(Val::default())
    });
    natives.insert(2, |args, _| {
        Ok(Val::Integer(args[0].to_integer()? + args[1].to_integer()?))
    });
    let say = out.clone();
    natives.insert(3, move |args, _| {
        let words: Vec<String> = args.iter().map(|a| a.to_text().to_string()).collect();
        say.borrow_mut().push(words.join(" "));
        Ok(Val::default())
    });
    natives.insert(4, |_, _| Ok(Val::Integer(1)));
    natives
}

pub fn exec(source: &str) -> Result<(Var, Vec<String>), Error> {
    let program = build(source)?;
    let out = Rc::new(RefCell::new(vec![]));
    let mut host = natives(&out);
    let mut runtime = Runtime::new();
    runtime.start(program.into_code(), 0, false)?;
    runtime.run(&mut host)?;
    let printed = out.borrow().clone();
    Ok((runtime.var().clone(), printed))
}

pub fn run(source: &str) -> Var {
    exec(source).unwrap().0
}

pub fn printed(source: &str) -> Vec<String> {
    exec(source).unwrap().1
}

pub fn fetch(source: &str, name: &str) -> Val {
    run(source).fetch(name)
}
