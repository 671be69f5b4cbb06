//! The scanner: reads one operand and the marker that ends it.

use crate::types::{OperatorTable, Whitespace};

/// What stopped a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Marker {
    End,
    Open,
    Close,
    /// Index into the constant table.
    Constant(usize),
    /// Index into the binary table.
    Binary(usize),
}

#[derive(Debug)]
pub(crate) struct Read<'t> {
    /// Trimmed text between the last consumed token and the marker.
    pub operand: &'t str,
    /// Byte offset of `operand` in the source.
    pub operand_at: usize,
    pub marker: Marker,
    /// Byte offset of the marker in the source.
    pub at: usize,
    /// Where the next read starts.
    pub position: usize,
    /// Unary operators read ahead of the operand, outermost first.
    pub unary: Vec<usize>,
}

pub(crate) struct Reader<'c, C: ?Sized> {
    pub binary: &'c OperatorTable<C>,
    pub unary: &'c OperatorTable<C>,
    pub constants: &'c OperatorTable<C>,
    pub whitespace: Whitespace,
}

impl<C: ?Sized> Reader<'_, C> {
    /// Scans `text` from `position`.
    ///
    /// `after_bracket` is set when the previous read ended in a bracketed
    /// group or a constant: the only thing allowed next is a binary
    /// operator, which may then have an empty left side.
    pub fn read<'t>(&self, text: &'t str, position: usize, after_bracket: bool) -> Read<'t> {
        let rest = text.get(position..).unwrap_or_default();
        let mut start = position;
        let mut unary = Vec::new();

        for (offset, ch) in rest.char_indices() {
            let at = position + offset;
            let end = at + ch.len_utf8();
            let buffer = &text[start..end];
            let next = text[end..].chars().next();

            if !after_bracket {
                if let Some(index) = self.exact(self.constants, buffer, next) {
                    let token_at = start + leading_space(buffer);
                    return Read {
                        operand: "",
                        operand_at: token_at,
                        marker: Marker::Constant(index),
                        at: token_at,
                        position: end,
                        unary,
                    };
                }
                if let Some(index) = self.exact(self.unary, buffer, next) {
                    unary.push(index);
                    start = end;
                    continue;
                }
            }

            if ch == '(' || ch == ')' {
                let raw = &text[start..at];
                let operand = raw.trim();
                if !is_open_quote(operand) {
                    return Read {
                        operand,
                        operand_at: start + leading_space(raw),
                        marker: if ch == '(' { Marker::Open } else { Marker::Close },
                        at,
                        position: end,
                        unary,
                    };
                }
            }

            if let Some((index, token_at)) = self.binary_at(text, start, end, next, after_bracket) {
                let raw = &text[start..token_at];
                return Read {
                    operand: raw.trim(),
                    operand_at: start + leading_space(raw),
                    marker: Marker::Binary(index),
                    at: token_at,
                    position: end,
                    unary,
                };
            }
        }

        let raw = text.get(start..).unwrap_or_default();
        Read {
            operand: raw.trim(),
            operand_at: start + leading_space(raw),
            marker: Marker::End,
            at: text.len(),
            position: text.len(),
            unary,
        }
    }

    /// A constant or unary token matching the whole buffer.
    fn exact(&self, table: &OperatorTable<C>, buffer: &str, next: Option<char>) -> Option<usize> {
        let candidate = buffer.trim();
        if candidate.is_empty() {
            return None;
        }
        table.iter().position(|entry| {
            entry.op.token == candidate
                && (!self.whitespace.needs_boundary(entry.word)
                    || !next.is_some_and(|c| c.is_ascii_alphanumeric()))
        })
    }

    /// The first binary operator ending the buffer `text[start..end]`,
    /// with the offset its token starts at.
    fn binary_at(
        &self,
        text: &str,
        start: usize,
        end: usize,
        next: Option<char>,
        after_bracket: bool,
    ) -> Option<(usize, usize)> {
        let buffer = &text[start..end];
        self.binary.iter().enumerate().find_map(|(index, entry)| {
            let token = entry.op.token.as_str();
            if token.is_empty() || !buffer.ends_with(token) {
                return None;
            }
            let token_at = end - token.len();
            let left = &text[start..token_at];
            let trimmed = left.trim();
            if (trimmed.is_empty() && !after_bracket) || is_open_quote(trimmed) {
                return None;
            }
            // A longer operator is being read, or is about to be.
            if entry.suffixed_by.iter().any(|longer| buffer.ends_with(longer.as_str()))
                || entry.prefixed_by.iter().any(|longer| text[token_at..].starts_with(longer.as_str()))
            {
                return None;
            }
            if self.whitespace.needs_boundary(entry.word)
                && !(next.is_some_and(char::is_whitespace) && left.ends_with(char::is_whitespace))
            {
                return None;
            }
            Some((index, token_at))
        })
    }
}

/// Operand text starting with a quote that has not been closed yet.
pub(crate) fn is_open_quote(operand: &str) -> bool {
    match operand.chars().next() {
        Some(quote @ ('"' | '\'')) => operand.len() == 1 || !operand.ends_with(quote),
        _ => false,
    }
}

fn leading_space(raw: &str) -> usize {
    raw.len() - raw.trim_start().len()
}
