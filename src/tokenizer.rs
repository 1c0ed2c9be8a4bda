//! # Address tokenizer
//!
//! Splits a raw address string into tokens (words, numbers, punctuation),
//! preserving the byte offsets of each token in the original string. The
//! offsets let callers highlight or reslice components without ever losing
//! the source formatting.
//!
//! ## Splitting rules
//!
//! - Whitespace separates tokens and is never part of one.
//! - `,` `;` `(` `)` `#` `&` are always standalone tokens.
//! - The HTML entities `&amp;` and `&#38;` become a single `"&"` token whose
//!   offsets span the raw entity text.
//! - A `.` stays attached after a known abbreviation (`St.`, `N.`, `P.O.`)
//!   or between digits (`1.5`); otherwise it is its own token.
//! - `-` `/` `'` stay inside a token between alphanumerics (`I-95`, `1/2`,
//!   `O'Brien`); otherwise they split off.
//!
//! Tokenization is deterministic and pure: no I/O, no randomness, and an
//! empty or whitespace-only input yields an empty token sequence.

use serde::{Deserialize, Serialize};

/// A token extracted from the input address.
///
/// `start`/`end` are byte offsets into the original string. For every token
/// except the ampersand-entity case, `input[start..end] == text`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Token {
    /// The token text, e.g. "123", "Main", ",".
    pub text: String,
    /// Starting byte offset in the input (inclusive).
    pub start: usize,
    /// Ending byte offset in the input (exclusive).
    pub end: usize,
    /// Sequential index of this token (0, 1, 2...).
    pub index: usize,
}

/// Abbreviations whose trailing period is kept attached to the token.
/// Lowercase, dots removed. Covers dotted directionals, common dotted
/// street types, unit designators and USPS box phrasing.
const DOTTED_ABBREVIATIONS: &[&str] = &[
    "n", "s", "e", "w", "ne", "nw", "se", "sw",
    "st", "ave", "av", "blvd", "dr", "rd", "ln", "ct", "pl", "sq",
    "hwy", "pkwy", "ter", "cir", "mt", "ft",
    "apt", "ste", "rm", "fl", "no", "bldg",
    "p", "po", "rr", "hc", "jr", "sr",
];

/// Characters that always form their own token. `&` also always stands
/// alone but is handled separately for the entity forms.
const HARD_BREAKS: &[char] = &[',', ';', '(', ')', '#'];

/// Tokenize an address string.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut current_start = 0;
    let mut current_text = String::new();
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut i = 0;

    while i < chars.len() {
        let (byte_pos, ch) = chars[i];

        if ch == '&' {
            flush_token(&mut tokens, &mut current_text, current_start, byte_pos);
            // &amp; / &#38; collapse to a single ampersand token spanning the entity
            let entity_len = if text[byte_pos..].starts_with("&amp;") {
                5
            } else if text[byte_pos..].starts_with("&#38;") {
                5
            } else {
                1
            };
            push_token(&mut tokens, "&".to_string(), byte_pos, byte_pos + entity_len);
            i += skip_chars(&chars, i, entity_len);
            continue;
        }

        if ch.is_alphanumeric() {
            if current_text.is_empty() {
                current_start = byte_pos;
            }
            current_text.push(ch);
        } else if HARD_BREAKS.contains(&ch) {
            flush_token(&mut tokens, &mut current_text, current_start, byte_pos);
            push_token(&mut tokens, ch.to_string(), byte_pos, byte_pos + ch.len_utf8());
        } else if ch == '.' && !current_text.is_empty() {
            let clean: String = current_text
                .to_lowercase()
                .chars()
                .filter(|c| *c != '.')
                .collect();
            let is_abbrev = DOTTED_ABBREVIATIONS.contains(&clean.as_str());
            let current_is_num = current_text.chars().all(char::is_numeric);
            let next_is_num = chars
                .get(i + 1)
                .map(|(_, c)| c.is_numeric())
                .unwrap_or(false);

            if is_abbrev || (current_is_num && next_is_num) {
                current_text.push('.');
            } else {
                flush_token(&mut tokens, &mut current_text, current_start, byte_pos);
                push_token(&mut tokens, ".".to_string(), byte_pos, byte_pos + 1);
            }
        } else if matches!(ch, '-' | '/' | '\'' | '\u{2019}') {
            let next_is_alnum = chars
                .get(i + 1)
                .map(|(_, c)| c.is_alphanumeric())
                .unwrap_or(false);
            if !current_text.is_empty() && next_is_alnum {
                current_text.push(ch);
            } else {
                flush_token(&mut tokens, &mut current_text, current_start, byte_pos);
                push_token(&mut tokens, ch.to_string(), byte_pos, byte_pos + ch.len_utf8());
            }
        } else if ch.is_whitespace() {
            flush_token(&mut tokens, &mut current_text, current_start, byte_pos);
        } else {
            flush_token(&mut tokens, &mut current_text, current_start, byte_pos);
            push_token(&mut tokens, ch.to_string(), byte_pos, byte_pos + ch.len_utf8());
        }
        i += 1;
    }

    flush_token(&mut tokens, &mut current_text, current_start, text.len());

    for (i, token) in tokens.iter_mut().enumerate() {
        token.index = i;
    }
    tokens
}

/// How many entries of `chars` the next `byte_len` bytes cover, starting at `i`.
fn skip_chars(chars: &[(usize, char)], i: usize, byte_len: usize) -> usize {
    let start = chars[i].0;
    let mut n = 0;
    while i + n < chars.len() && chars[i + n].0 < start + byte_len {
        n += 1;
    }
    n
}

/// Close the accumulated token and append it (if non-empty).
fn flush_token(tokens: &mut Vec<Token>, text: &mut String, start: usize, end: usize) {
    if !text.is_empty() {
        tokens.push(Token {
            text: text.clone(),
            start,
            end,
            index: 0, // assigned at the end
        });
        text.clear();
    }
}

/// Append a punctuation token directly.
fn push_token(tokens: &mut Vec<Token>, text: String, start: usize, end: usize) {
    tokens.push(Token {
        text,
        start,
        end,
        index: 0,
    });
}
