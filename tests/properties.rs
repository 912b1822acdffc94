//! Behavior of single lines across the quoting styles, plus the
//! serialize-then-parse round trip.

use std::collections::{BTreeMap, HashMap};

use envparse::{EmptyEnv, EnvMap, Error, UnquoteError, parse_str_with, to_string};
use proptest::prelude::*;
use rstest::rstest;

fn parse_one(input: &str, key: &str) -> String {
    let parsed = parse_str_with(input, &EmptyEnv).expect("parse should succeed");
    parsed
        .get(key)
        .unwrap_or_else(|| panic!("{key} missing from {parsed:?}"))
        .clone()
}

#[rstest]
#[case::plain("FOO=bar", "bar")]
#[case::padded("  FOO  =   bar baz   ", "bar baz")]
#[case::exported("export FOO=bar", "bar")]
#[case::inline_comment("FOO=bar #comment", "bar")]
#[case::hash_only("FOO=#", "")]
#[case::single_verbatim("FOO='$BAR \\t'", "$BAR \\t")]
#[case::raw_not_expanded("FOO=`$BAR`", "$BAR")]
#[case::raw_keeps_backslashes("FOO=`a\\tb`", "a\\tb")]
#[case::double_escapes("FOO=\"a\\tb\\u00e9\"", "a\tbé")]
#[case::unmatched_double("FOO=\"bar", "\"bar")]
#[case::unmatched_with_comment("FOO=\"bar # note", "\"bar")]
#[case::dollar_kept("FOO=price $ 5", "price $ 5")]
#[case::empty_braces_dropped("FOO=a${}b", "ab")]
#[case::unterminated_brace("FOO=a${BAR", "aBAR")]
fn parses_single_line(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(parse_one(input, "FOO"), expected);
}

#[rstest]
#[case::bare("BAR=baz\nFOO=$BAR/x", "baz/x")]
#[case::braced("BAR=baz\nFOO=${BAR}/x", "baz/x")]
#[case::double_quoted("BAR=baz\nFOO=\"${BAR}/x\"", "baz/x")]
#[case::chained("A=1\nBAR=$A$A\nFOO=${BAR}!", "11!")]
#[case::undefined("FOO=[$BAR]", "[]")]
#[case::forward_reference("FOO=[$BAR]\nBAR=later", "[]")]
fn expands_references(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(parse_one(input, "FOO"), expected);
}

#[rstest]
#[case::blank("\n   \n\t\n")]
#[case::comments("# FOO=bar\n   # BAR=baz\n")]
#[case::no_assignment("FOO\nexport BAR\n")]
#[case::empty_key("=value\n  = value\nexport =value\n")]
fn produces_no_entries(#[case] input: &str) {
    let parsed = parse_str_with(input, &EmptyEnv).expect("parse should succeed");
    assert!(parsed.is_empty(), "unexpected entries: {parsed:?}");
}

#[test]
fn environment_fallback_is_injected() {
    let env = HashMap::from([("BAR".to_string(), "from-env".to_string())]);
    let parsed = parse_str_with("FOO=\"$BAR\"\n", &env).expect("parse should succeed");
    assert_eq!(parsed["FOO"], "from-env");
}

#[rstest]
#[case::truncated_hex("OK=1\nFOO=\"bar\\x4\"", 2, UnquoteError::IncompleteEscape)]
#[case::unknown_escape("FOO=\"\\z\"", 1, UnquoteError::UnknownEscape('z'))]
#[case::stray_quote("FOO=\"a\" \"b\"", 1, UnquoteError::UnescapedQuote('"'))]
fn malformed_escapes_fail_with_line(
    #[case] input: &str,
    #[case] expected_line: u32,
    #[case] expected: UnquoteError,
) {
    match parse_str_with(input, &EmptyEnv) {
        Err(Error::Unquote { line, source }) => {
            assert_eq!(line, expected_line);
            assert_eq!(source, expected);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

fn key_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_.-]{0,15}"
}

fn value_strategy() -> impl Strategy<Value = String> {
    // Any text without `$`, which would be expanded again on reparse.
    prop::collection::vec(any::<char>().prop_filter("no dollar", |ch| *ch != '$'), 0..32)
        .prop_map(|chars| chars.into_iter().collect())
}

proptest! {
    #[test]
    fn serialized_maps_parse_back_unchanged(
        vars in prop::collection::btree_map(key_strategy(), value_strategy(), 0..12)
    ) {
        let text = to_string(&vars).expect("generated keys are writable");
        let parsed: EnvMap = parse_str_with(&text, &EmptyEnv).expect("serialized text parses");
        let parsed: BTreeMap<String, String> = parsed.into_iter().collect();
        prop_assert_eq!(parsed, vars);
    }
}
