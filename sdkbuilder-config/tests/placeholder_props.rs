use camino::Utf8PathBuf;
use proptest::prelude::*;
use sdkbuilder_config::ConfigResolver;
use sdkbuilder_config::placeholders::{has_placeholder, resolve_placeholders, substitute};
use sdkbuilder_types::Environment;
use serde_json::{Map, Value, json};

const NAMES: [&str; 4] = ["SDK_REPO", "TOKEN", "LANG", "BRANCH"];

#[derive(Debug, Clone)]
enum Piece {
    Text(String),
    Var(usize),
}

fn piece() -> impl Strategy<Value = Piece> {
    prop_oneof![
        "[a-zA-Z0-9 /._-]{0,8}".prop_map(Piece::Text),
        (0..NAMES.len()).prop_map(Piece::Var),
    ]
}

fn template() -> impl Strategy<Value = String> {
    prop::collection::vec(piece(), 0..6).prop_map(|pieces| {
        pieces
            .into_iter()
            .map(|p| match p {
                Piece::Text(t) => t,
                Piece::Var(i) => format!("${{{}}}", NAMES[i]),
            })
            .collect()
    })
}

/// Names visible to `envVars` templates: bootstrap variables, the declared
/// variables themselves and one that is never set.
const CONFIG_NAMES: [&str; 8] = [
    "COMMON_ROOT",
    "SDK_REPO",
    "SDK_TEMP",
    "V0",
    "V1",
    "V2",
    "V3",
    "UNSET",
];

fn config_template() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        "[a-zA-Z0-9 /._-]{0,6}".prop_map(Piece::Text),
        (0..CONFIG_NAMES.len()).prop_map(Piece::Var),
    ];
    prop::collection::vec(piece, 0..5).prop_map(|pieces| {
        pieces
            .into_iter()
            .map(|p| match p {
                Piece::Text(t) => t,
                Piece::Var(i) => format!("${{{}}}", CONFIG_NAMES[i]),
            })
            .collect()
    })
}

fn environment() -> impl Strategy<Value = Environment> {
    prop::collection::vec("[a-zA-Z0-9/._-]{1,10}", NAMES.len())
        .prop_map(|values| Environment::from_pairs(NAMES.iter().copied().zip(values)))
}

proptest! {
    #[test]
    fn substitution_is_idempotent(env in environment(), input in template()) {
        let once = substitute(&input, &env);
        let twice = substitute(&once, &env);
        prop_assert_eq!(&once, &twice);
        prop_assert!(!has_placeholder(&once));
    }

    #[test]
    fn document_resolution_is_idempotent(
        env in environment(),
        a in template(),
        b in template(),
        c in template(),
    ) {
        let mut doc: Value = json!({
            "settings": {"path": a, "nested": [b, 7, {"deep": c}]},
        });
        resolve_placeholders(&mut doc, &env);
        let snapshot = doc.clone();
        resolve_placeholders(&mut doc, &env);
        prop_assert_eq!(doc, snapshot);
    }

    #[test]
    fn env_var_templates_resolve_idempotently(
        values in prop::collection::vec(config_template(), 4),
        path in config_template(),
    ) {
        let env_vars: Map<String, Value> = values
            .into_iter()
            .enumerate()
            .map(|(i, v)| (format!("V{i}"), Value::String(v)))
            .collect();
        let primary = json!({
            "settings": {
                "sdkRepo": "https://github.com/org/sdk.git",
                "swagger": {"oldSwaggerPath": "old.json", "newSwaggerPath": format!("new{path}")},
                "swaggerCodegen": {"language": "java"}
            },
            "envVars": env_vars,
        });
        let resolver = ConfigResolver::new(Utf8PathBuf::from("/w"))
            .with_process_env(Environment::default());

        let first = resolver.resolve_documents(primary, json!({})).expect("first pass");
        let second = resolver
            .resolve_documents(first.document().clone(), json!({}))
            .expect("second pass");

        for (_, value) in first.env().iter() {
            prop_assert!(!has_placeholder(value));
        }
        prop_assert_eq!(first.document(), second.document());
        prop_assert_eq!(first.env(), second.env());
    }
}
