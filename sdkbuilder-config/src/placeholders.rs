//! `${NAME}` substitution over string leaves.

use regex::{Captures, Regex};
use sdkbuilder_types::Environment;
use serde_json::Value;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{(.+?)\}").expect("valid regex"));

/// Replace every `${NAME}` in `input` with the value of `NAME` (trimmed), or
/// with the empty string when it is unset. Single pass; replacement text is
/// not re-scanned.
pub fn substitute(input: &str, env: &Environment) -> String {
    substitute_with(input, |name| env.get(name))
}

/// [`substitute`] against an arbitrary lookup, e.g. an environment that is
/// still being assembled.
pub fn substitute_with<'a, F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<&'a str>,
{
    PLACEHOLDER
        .replace_all(input, |caps: &Captures<'_>| {
            lookup(&caps[1]).unwrap_or_default().to_string()
        })
        .into_owned()
}

/// True when `input` still contains a `${...}` placeholder.
pub fn has_placeholder(input: &str) -> bool {
    PLACEHOLDER.is_match(input)
}

/// Substitute placeholders in every string leaf of `doc`. Object keys are
/// left untouched.
pub fn resolve_placeholders(doc: &mut Value, env: &Environment) {
    match doc {
        Value::String(s) => {
            if has_placeholder(s) {
                *s = substitute(s, env);
            }
        }
        Value::Array(items) => {
            for item in items {
                resolve_placeholders(item, env);
            }
        }
        Value::Object(map) => {
            for value in map.values_mut() {
                resolve_placeholders(value, env);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn env() -> Environment {
        Environment::from_pairs([("SDK_REPO", "/w/output/java"), ("TOKEN", "abc")])
    }

    #[test]
    fn substitutes_known_and_blanks_unknown() {
        assert_eq!(
            substitute("${SDK_REPO}/build and ${ MISSING }!", &env()),
            "/w/output/java/build and !"
        );
    }

    #[test]
    fn names_are_trimmed() {
        assert_eq!(substitute("${ TOKEN }", &env()), "abc");
    }

    #[test]
    fn does_not_rescan_replacement_text() {
        let env = Environment::from_pairs([("A", "${B}"), ("B", "x")]);
        assert_eq!(substitute("${A}", &env), "${B}");
    }

    #[test]
    fn lookup_closure_drives_substitution() {
        let lookup = |name: &str| (name.trim() == "LANG").then_some("java");
        assert_eq!(substitute_with("${LANG}-${OTHER}", lookup), "java-");
    }

    #[test]
    fn walks_nested_values_but_not_keys() {
        let mut doc = json!({
            "${TOKEN}": "${TOKEN}",
            "list": ["${SDK_REPO}", 1, true, null],
            "nested": {"deep": "pre-${TOKEN}-post"}
        });
        resolve_placeholders(&mut doc, &env());
        assert_eq!(
            doc,
            json!({
                "${TOKEN}": "abc",
                "list": ["/w/output/java", 1, true, null],
                "nested": {"deep": "pre-abc-post"}
            })
        );
    }
}
