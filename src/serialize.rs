use std::fmt::Write as _;
use std::io::Write;

use crate::error::Error;

/// Render variables as dotenv text, one `KEY="VALUE"` line per key, sorted
/// by key.
///
/// Values are escaped so that [`parse_str`](crate::parse_str) reads them
/// back unchanged, except for `$` references: the format has no escape for
/// `$`, so a value such as `$HOME` is expanded again when parsed.
pub fn to_string<I, K, V>(vars: I) -> Result<String, Error>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut entries: Vec<(K, V)> = vars.into_iter().collect();
    entries.sort_unstable_by(|a, b| a.0.as_ref().cmp(b.0.as_ref()));

    let mut out = String::new();
    for (key, value) in &entries {
        let key = key.as_ref();
        if !is_writable_key(key) {
            return Err(Error::InvalidKey(key.to_owned()));
        }
        out.push_str(key);
        out.push_str("=\"");
        escape_into(value.as_ref(), &mut out);
        out.push_str("\"\n");
    }
    Ok(out)
}

/// Write variables as dotenv text to `writer`. See [`to_string`].
pub fn write<W, I, K, V>(mut writer: W, vars: I) -> Result<(), Error>
where
    W: Write,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let text = to_string(vars)?;
    writer.write_all(text.as_bytes())?;
    writer.flush()?;
    Ok(())
}

fn is_writable_key(key: &str) -> bool {
    !key.is_empty()
        && key.trim() == key
        && !key.starts_with('#')
        && !key.starts_with("export ")
        && !key.contains(['=', '\n', '\r'])
}

fn escape_into(value: &str, out: &mut String) {
    let mut chars = value.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            // A backslash right before the closing quote would hide it from
            // quote detection.
            '\\' if chars.peek().is_none() => out.push_str("\\x5c"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if ch.is_control() => {
                let _ = write!(out, "\\u{:04x}", ch as u32);
            }
            ch => out.push(ch),
        }
    }
}
