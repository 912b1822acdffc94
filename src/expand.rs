/// Substitute `$NAME` and `${NAME}` references in `input`.
///
/// Follows shell parameter substitution in a single pass: the text returned
/// by `resolve` is copied as is and never scanned for further references.
///
/// - `$NAME` takes the longest run of ASCII letters, digits and `_`.
/// - `${NAME}` takes everything up to the next `}`.
/// - A shell special character (`*#$@!?-` or a digit) after `$`, or alone
///   inside braces, names a one-character variable.
/// - A `$` that starts no name (end of input, punctuation, space) is kept.
/// - `${}` and an unterminated `${` are consumed; the text after an
///   unterminated `${` is kept.
pub(crate) fn expand<F>(input: &str, mut resolve: F) -> String
where
    F: FnMut(&str) -> String,
{
    let bytes = input.as_bytes();
    if !bytes.contains(&b'$') {
        return input.to_owned();
    }

    let mut out = String::with_capacity(input.len());
    let mut cursor = 0usize;
    let mut idx = 0usize;

    while idx < bytes.len() {
        if bytes[idx] != b'$' || idx + 1 >= bytes.len() {
            idx += 1;
            continue;
        }

        out.push_str(&input[cursor..idx]);
        let (name, width) = parse_reference(&input[idx + 1..]);
        match name {
            Some(name) => out.push_str(&resolve(name)),
            // `${` or `${}`: the malformed token is dropped.
            None if width > 0 => {}
            None => out.push('$'),
        }

        idx += 1 + width;
        cursor = idx;
    }

    out.push_str(&input[cursor..]);
    out
}

/// Parse the reference that follows a `$`.
///
/// Returns the name, if any, and how many bytes after the `$` it consumed.
fn parse_reference(rest: &str) -> (Option<&str>, usize) {
    let bytes = rest.as_bytes();

    if bytes[0] == b'{' {
        if bytes.len() > 2 && is_special(bytes[1]) && bytes[2] == b'}' {
            return (Some(&rest[1..2]), 3);
        }
        return match bytes.iter().skip(1).position(|&byte| byte == b'}') {
            Some(0) => (None, 2),
            Some(len) => (Some(&rest[1..=len]), len + 2),
            None => (None, 1),
        };
    }

    if is_special(bytes[0]) {
        return (Some(&rest[..1]), 1);
    }

    let len = bytes
        .iter()
        .take_while(|&&byte| byte.is_ascii_alphanumeric() || byte == b'_')
        .count();
    if len == 0 {
        (None, 0)
    } else {
        (Some(&rest[..len]), len)
    }
}

fn is_special(byte: u8) -> bool {
    matches!(byte, b'*' | b'#' | b'$' | b'@' | b'!' | b'?' | b'-' | b'0'..=b'9')
}
