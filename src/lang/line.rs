/// ## Line scanner
///
/// A cursor over one line of source text. Every method consumes from the
/// front of the remaining text; the original line is never changed.

#[derive(Debug, Clone)]
pub struct Line<'a> {
    base: &'a str,
    rest: &'a str,
}

impl<'a> Line<'a> {
    pub fn new(base: &'a str) -> Line<'a> {
        Line { base, rest: base }
    }

    pub fn base(&self) -> &'a str {
        self.base
    }

    pub fn rest(&self) -> &'a str {
        self.rest
    }

    pub fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }

    /// Byte offset of the cursor within the original line.
    pub fn offset(&self) -> usize {
        self.base.len() - self.rest.len()
    }

    pub fn skip(&mut self, set: &str) {
        self.rest = self.rest.trim_start_matches(|c| set.contains(c));
    }

    /// Longest prefix free of `stop` characters. May be empty when the
    /// cursor sits on a stop character.
    pub fn word(&mut self, stop: &str) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        let end = self.rest.find(|c| stop.contains(c)).unwrap_or(self.rest.len());
        let (word, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(word)
    }

    pub fn delimited(&mut self, delimiter: char) -> Option<&'a str> {
        let inner = self.rest.strip_prefix(delimiter)?;
        let end = inner.find(delimiter)?;
        let text = &inner[..end];
        self.rest = &inner[end + delimiter.len_utf8()..];
        Some(text)
    }

    pub fn operator(&mut self, set: &str) -> Option<&'a str> {
        let end = self
            .rest
            .find(|c| !set.contains(c))
            .unwrap_or(self.rest.len());
        if end == 0 {
            return None;
        }
        let (op, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(op)
    }
}
