/// Splits script text into lines and blanks out comments.
///
/// `//` ends a line, `/* */` may span lines, and neither is recognized
/// inside a string literal. Line `n` of the result is line `n` of the
/// source so diagnostics keep their line numbers.
pub fn lex(source: &str) -> Vec<String> {
    let mut lines = vec![];
    let mut in_comment = false;
    for raw in split_lines(source) {
        let mut line = String::with_capacity(raw.len());
        let mut quoted = false;
        let mut chars = raw.chars().peekable();
        while let Some(ch) = chars.next() {
            if in_comment {
                if ch == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    in_comment = false;
                    line.push(' ');
                }
                line.push(' ');
                continue;
            }
            if quoted {
                quoted = ch != '"';
                line.push(ch);
                continue;
            }
            match ch {
                '"' => {
                    quoted = true;
                    line.push(ch);
                }
                '/' if chars.peek() == Some(&'/') => break,
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    in_comment = true;
                    line.push_str("  ");
                }
                _ => line.push(ch),
            }
        }
        line.truncate(line.trim_end().len());
        lines.push(line);
    }
    lines
}

fn split_lines(source: &str) -> Vec<&str> {
    let bytes = source.as_bytes();
    let mut lines = vec![];
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&source[start..i]);
                start = i + 1;
            }
            b'\r' => {
                lines.push(&source[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    if start < source.len() {
        lines.push(&source[start..]);
    }
    lines
}
