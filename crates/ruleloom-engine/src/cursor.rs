//! Transactional input cursor.
//!
//! The cursor holds the input, a read offset and a stack of group counters.
//! Each counter records how many bytes were consumed since its group opened,
//! including bytes consumed inside child groups that have since been closed.
//! Reverting a group rewinds the offset by exactly that amount, the same way
//! nested savepoints roll back a transaction.

#[derive(Debug, Clone)]
pub struct Cursor<'i> {
    input: &'i str,
    offset: usize,
    groups: Vec<usize>,
    /// Largest offset any match attempt reached.
    furthest: usize,
}

impl<'i> Cursor<'i> {
    pub fn new(input: &'i str) -> Self {
        Self {
            input,
            offset: 0,
            groups: Vec::new(),
            furthest: 0,
        }
    }

    /// Open a speculative scope.
    pub fn begin_group(&mut self) {
        self.groups.push(0);
    }

    /// Close the innermost scope, handing its count to the parent.
    pub fn end_group(&mut self) {
        let Some(count) = self.groups.pop() else {
            return;
        };
        if let Some(parent) = self.groups.last_mut() {
            *parent += count;
        }
    }

    /// Roll back everything consumed since the innermost scope opened.
    ///
    /// The scope stays open; the caller still calls [`Cursor::end_group`].
    pub fn revert(&mut self) {
        if let Some(count) = self.groups.last_mut() {
            self.offset -= *count;
            *count = 0;
        }
    }

    /// Consume `literal` if the remaining input starts with it.
    pub fn consume(&mut self, literal: &str) -> bool {
        let matched = self.unconsumed().starts_with(literal);
        self.settle(matched, literal.len())
    }

    /// Like [`Cursor::consume`], folding ASCII letters on both sides.
    pub fn consume_ignore_case(&mut self, literal: &str) -> bool {
        let matched = self
            .unconsumed()
            .get(..literal.len())
            .is_some_and(|window| window.eq_ignore_ascii_case(literal));
        self.settle(matched, literal.len())
    }

    /// Consume the next character if `accept` allows it.
    pub fn consume_char_if(&mut self, accept: impl FnOnce(char) -> bool) -> Option<char> {
        let next = self.unconsumed().chars().next().filter(|&c| accept(c));
        self.settle(next.is_some(), next.map_or(0, char::len_utf8));
        next
    }

    fn settle(&mut self, matched: bool, len: usize) -> bool {
        if !matched {
            self.furthest = self.furthest.max(self.offset);
            return false;
        }
        self.offset += len;
        if let Some(count) = self.groups.last_mut() {
            *count += len;
        }
        self.furthest = self.furthest.max(self.offset);
        true
    }

    pub fn input(&self) -> &'i str {
        self.input
    }

    pub fn consumed(&self) -> &'i str {
        &self.input[..self.offset]
    }

    pub fn unconsumed(&self) -> &'i str {
        &self.input[self.offset..]
    }

    pub fn is_at_end(&self) -> bool {
        self.offset == self.input.len()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of open groups.
    pub fn depth(&self) -> usize {
        self.groups.len()
    }

    /// Bytes consumed inside the innermost open group.
    pub fn group_consumed(&self) -> usize {
        self.groups.last().copied().unwrap_or(0)
    }

    pub fn furthest(&self) -> usize {
        self.furthest
    }
}
