//! Structure-aware splitting of compound bodies.
//!
//! The body of an array or object is cut at commas that sit outside every
//! string literal and every nested `{...}` / `[...]` span. The same scan finds
//! the `:` separating a member's key from its value.

use std::str::CharIndices;

/// Yields the characters of `text` that sit at nesting depth zero and outside
/// string literals. Brackets and quotes themselves are never yielded.
struct TopLevel<'a> {
    chars: CharIndices<'a>,
    depth: isize,
    in_string: bool,
    escaped: bool,
}

impl<'a> TopLevel<'a> {
    fn new(text: &'a str) -> Self {
        TopLevel {
            chars: text.char_indices(),
            depth: 0,
            in_string: false,
            escaped: false,
        }
    }
}

impl Iterator for TopLevel<'_> {
    type Item = (usize, char);

    fn next(&mut self) -> Option<(usize, char)> {
        for (idx, ch) in self.chars.by_ref() {
            if self.in_string {
                if self.escaped {
                    self.escaped = false;
                } else if ch == '\\' {
                    self.escaped = true;
                } else if ch == '"' {
                    self.in_string = false;
                }
                continue;
            }

            match ch {
                '"' => self.in_string = true,
                '{' | '[' => self.depth += 1,
                '}' | ']' => self.depth -= 1,
                _ if self.depth == 0 => return Some((idx, ch)),
                _ => {}
            }
        }
        None
    }
}

/// Splits `span` at its top-level commas, trimming each fragment.
///
/// Fragments between two commas are kept even when empty so the caller can
/// reject them; the last fragment is dropped when it trims to nothing, which
/// covers both an empty span and a trailing comma.
pub(crate) fn split_top_level(span: &str) -> Vec<&str> {
    let mut fragments = Vec::new();
    let mut start = 0;

    for (idx, ch) in TopLevel::new(span) {
        if ch == ',' {
            fragments.push(span[start..idx].trim());
            start = idx + 1;
        }
    }

    let last = span[start..].trim();
    if !last.is_empty() {
        fragments.push(last);
    }
    fragments
}

/// Splits a member fragment at its first top-level `:` into trimmed
/// `(key, value)` text. Returns `None` when there is no such colon.
pub(crate) fn split_member(fragment: &str) -> Option<(&str, &str)> {
    TopLevel::new(fragment)
        .find(|&(_, ch)| ch == ':')
        .map(|(idx, _)| (fragment[..idx].trim(), fragment[idx + 1..].trim()))
}
