use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use tracing::{debug, trace};

use crate::env::{ProcessEnv, VarSource};
use crate::error::Error;
use crate::expand::expand;
use crate::quote::{QuoteKind, unquote_double, unquote_raw};

/// Parsed variables, keyed by name.
pub type EnvMap = HashMap<String, String>;

/// Parse dotenv text from a reader, falling back to the process environment
/// for references that are not defined earlier in the input.
pub fn parse<R: Read>(reader: R) -> Result<EnvMap, Error> {
    parse_with(reader, &ProcessEnv)
}

/// Parse dotenv text from a reader, resolving outside references through `env`.
pub fn parse_with<R, E>(reader: R, env: &E) -> Result<EnvMap, Error>
where
    R: Read,
    E: VarSource + ?Sized,
{
    let mut result = EnvMap::new();

    for (idx, line) in BufReader::new(reader).lines().enumerate() {
        let line_num = idx as u32 + 1;
        let line = line?;
        let Some((key, value)) = parse_line(&line, line_num, &result, env)? else {
            continue;
        };
        result.insert(key.to_owned(), value);
    }

    debug!(entries = result.len(), "parsed dotenv input");
    Ok(result)
}

/// Parse dotenv text held in memory.
pub fn parse_str(input: &str) -> Result<EnvMap, Error> {
    parse(input.as_bytes())
}

/// Parse dotenv text held in memory, resolving outside references through `env`.
pub fn parse_str_with<E: VarSource + ?Sized>(input: &str, env: &E) -> Result<EnvMap, Error> {
    parse_with(input.as_bytes(), env)
}

/// Read and parse a dotenv file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<EnvMap, Error> {
    parse_file_with(path, &ProcessEnv)
}

/// Read and parse a dotenv file, resolving outside references through `env`.
pub fn parse_file_with<E: VarSource + ?Sized>(
    path: impl AsRef<Path>,
    env: &E,
) -> Result<EnvMap, Error> {
    let path = path.as_ref();
    let content = std::fs::read(path).map_err(|source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = content.len(), "read env file");
    parse_with(content.as_slice(), env)
}

/// Parse one line into a key and its final value.
///
/// `Ok(None)` means the line produces no entry: blank, comment, no `=`, or
/// an empty key.
fn parse_line<'a, E: VarSource + ?Sized>(
    line: &'a str,
    line_num: u32,
    result: &EnvMap,
    env: &E,
) -> Result<Option<(&'a str, String)>, Error> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let line = line.strip_prefix("export ").unwrap_or(line);
    let Some((key, value)) = line.split_once('=') else {
        trace!(line = line_num, "skipping line without assignment");
        return Ok(None);
    };

    let key = key.trim();
    if key.is_empty() {
        trace!(line = line_num, "skipping assignment with empty key");
        return Ok(None);
    }

    let value = parse_value(value.trim(), line_num, result, env)?;
    Ok(Some((key, value)))
}

fn parse_value<E: VarSource + ?Sized>(
    value: &str,
    line_num: u32,
    result: &EnvMap,
    env: &E,
) -> Result<String, Error> {
    let unquote_err = |source| Error::Unquote {
        line: line_num,
        source,
    };

    match QuoteKind::detect(value) {
        Some((QuoteKind::Double, end)) => {
            let unquoted = unquote_double(&value[1..end]).map_err(unquote_err)?;
            Ok(expand_value(&unquoted, result, env))
        }
        Some((QuoteKind::Raw, end)) => unquote_raw(&value[1..end]).map_err(unquote_err),
        Some((QuoteKind::Single, end)) => Ok(value[1..end].to_owned()),
        None => {
            let value = match value.split_once('#') {
                Some((head, _)) => head.trim(),
                None => value,
            };
            Ok(expand_value(value, result, env))
        }
    }
}

fn expand_value<E: VarSource + ?Sized>(value: &str, result: &EnvMap, env: &E) -> String {
    expand(value, |name| match result.get(name) {
        Some(value) => value.clone(),
        None => env.var(name).unwrap_or_default(),
    })
}
