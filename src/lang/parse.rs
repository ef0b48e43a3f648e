use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// Flattens nested parenthesized calls into statements bound to temporaries.
///
/// Each `(` opens a temporary named `prefix0`, `prefix1`, ... and the
/// statements come out innermost first:
///
/// ```
/// let parts = aegis::lang::parse("x = len(name) + 1", "$").unwrap();
/// assert_eq!(parts, vec!["$0=name", "x = len $0 + 1"]);
/// ```
pub fn parse(line: &str, prefix: &str) -> Result<Vec<String>> {
    let mut statements = vec![];
    let mut saved: Vec<String> = vec![];
    let mut current = String::new();
    let mut quoted = false;
    let mut next_temp = 0;
    for (col, ch) in line.char_indices() {
        if quoted {
            quoted = ch != '"';
            current.push(ch);
            continue;
        }
        match ch {
            '"' => {
                quoted = true;
                current.push(ch);
            }
            '(' => {
                let temp = format!("{}{}", prefix, next_temp);
                next_temp += 1;
                current.push(' ');
                current.push_str(&temp);
                saved.push(std::mem::replace(&mut current, format!("{}=", temp)));
            }
            ')' => match saved.pop() {
                Some(outer) => statements.push(std::mem::replace(&mut current, outer)),
                None => return Err(error!(SyntaxError, ..&(col..col + 1); "UNBALANCED PARENTHESES")),
            },
            _ => current.push(ch),
        }
    }
    if !saved.is_empty() {
        return Err(error!(SyntaxError, ..&(line.len()..line.len()); "MISSING )"));
    }
    statements.push(current);
    Ok(statements)
}
