use std::str::Chars;

use crate::error::UnquoteError;

/// Quoting style of a value, decided by its first character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum QuoteKind {
    /// `"..."`: backslash escapes, then expansion.
    Double,
    /// `'...'`: verbatim.
    Single,
    /// `` `...` ``: raw literal, backslashes kept, no expansion.
    Raw,
}

impl QuoteKind {
    fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'"' => Some(Self::Double),
            b'\'' => Some(Self::Single),
            b'`' => Some(Self::Raw),
            _ => None,
        }
    }

    fn byte(self) -> u8 {
        match self {
            Self::Double => b'"',
            Self::Single => b'\'',
            Self::Raw => b'`',
        }
    }

    /// Detect the quote span of a trimmed value.
    ///
    /// Returns the quote kind and the byte index of the closing quote, which
    /// is the last occurrence of the opening character not preceded by a
    /// backslash. Anything after the closing quote is not part of the span.
    /// `None` means the value is handled as unquoted, including values whose
    /// opening quote has no partner.
    pub(crate) fn detect(value: &str) -> Option<(Self, usize)> {
        let bytes = value.as_bytes();
        if bytes.len() < 2 {
            return None;
        }

        let kind = Self::from_byte(bytes[0])?;
        let quote = kind.byte();
        (1..bytes.len())
            .rev()
            .find(|&idx| bytes[idx] == quote && bytes[idx - 1] != b'\\')
            .map(|idx| (kind, idx))
    }
}

/// Unescape the contents of a double-quoted span (quotes excluded).
pub(crate) fn unquote_double(inner: &str) -> Result<String, UnquoteError> {
    if !inner.contains(['\\', '"']) {
        return Ok(inner.to_owned());
    }

    let mut out = Vec::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '"' => return Err(UnquoteError::UnescapedQuote('"')),
            '\\' => unescape_one(&mut chars, &mut out)?,
            _ => push_char(&mut out, ch),
        }
    }

    String::from_utf8(out).map_err(|_| UnquoteError::InvalidUtf8)
}

/// Unquote the contents of a backtick-quoted span (quotes excluded).
///
/// Raw literals have no escape sequences: backslashes are kept as written
/// and carriage returns are dropped. A backtick inside the span cannot be
/// represented and is rejected.
pub(crate) fn unquote_raw(inner: &str) -> Result<String, UnquoteError> {
    if inner.contains('`') {
        return Err(UnquoteError::UnescapedQuote('`'));
    }
    if !inner.contains('\r') {
        return Ok(inner.to_owned());
    }
    Ok(inner.chars().filter(|&ch| ch != '\r').collect())
}

fn unescape_one(chars: &mut Chars<'_>, out: &mut Vec<u8>) -> Result<(), UnquoteError> {
    let escape = chars.next().ok_or(UnquoteError::IncompleteEscape)?;
    match escape {
        'a' => out.push(0x07),
        'b' => out.push(0x08),
        'f' => out.push(0x0c),
        'n' => out.push(b'\n'),
        'r' => out.push(b'\r'),
        't' => out.push(b'\t'),
        'v' => out.push(0x0b),
        '\\' => out.push(b'\\'),
        '"' => out.push(b'"'),
        'x' => {
            let value = read_digits(chars, escape, 2, 16)?;
            out.push(value as u8);
        }
        'u' | 'U' => {
            let width = if escape == 'u' { 4 } else { 8 };
            let value = read_digits(chars, escape, width, 16)?;
            let ch = char::from_u32(value).ok_or(UnquoteError::InvalidCodePoint(value))?;
            push_char(out, ch);
        }
        '0'..='7' => {
            let rest = read_digits(chars, escape, 2, 8)?;
            let value = (escape as u32 - '0' as u32) << 6 | rest;
            if value > 0xff {
                return Err(UnquoteError::OctalOutOfRange(value));
            }
            out.push(value as u8);
        }
        other => return Err(UnquoteError::UnknownEscape(other)),
    }
    Ok(())
}

fn read_digits(
    chars: &mut Chars<'_>,
    escape: char,
    count: usize,
    radix: u32,
) -> Result<u32, UnquoteError> {
    let mut value = 0u32;
    for _ in 0..count {
        let digit = chars.next().ok_or(UnquoteError::IncompleteEscape)?;
        let parsed = digit
            .to_digit(radix)
            .ok_or(UnquoteError::InvalidDigit { escape, digit })?;
        value = value * radix + parsed;
    }
    Ok(value)
}

fn push_char(out: &mut Vec<u8>, ch: char) {
    let mut buf = [0u8; 4];
    out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
}
