//! Immutable environment snapshot.
//!
//! The resolver builds one `Environment` at startup (process variables,
//! bootstrap paths, configuration-declared variables) and every later
//! component reads from it. Child processes receive it explicitly instead of
//! relying on the ambient process table.

use std::collections::{BTreeMap, BTreeSet};

/// Read-only map of environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    /// Snapshot of the current process environment. Non-UTF-8 entries are skipped.
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn builder() -> EnvironmentBuilder {
        EnvironmentBuilder::default()
    }

    /// Start a builder seeded with every variable of this snapshot.
    pub fn to_builder(&self) -> EnvironmentBuilder {
        EnvironmentBuilder {
            vars: self.vars.clone(),
            locked: BTreeSet::new(),
        }
    }

    /// Value of `name` (trimmed before lookup). Empty values count as unset.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name.trim())
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).unwrap_or(default)
    }

    /// True when the variable is set to `true` (any case).
    pub fn flag(&self, name: &str) -> bool {
        self.get(name)
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name.trim())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// Outcome of [`EnvironmentBuilder::set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    Set,
    /// The name belongs to a locked variable; the value was not applied.
    Locked,
}

/// Mutable staging area used while the environment is being assembled.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentBuilder {
    vars: BTreeMap<String, String>,
    locked: BTreeSet<String>,
}

impl EnvironmentBuilder {
    /// Set `name` unless it was locked.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> SetOutcome {
        let name = name.trim();
        if self.locked.contains(name) {
            return SetOutcome::Locked;
        }
        self.vars.insert(name.to_string(), value.into());
        SetOutcome::Set
    }

    /// Set `name` and refuse every later `set` for it.
    pub fn lock(&mut self, name: &str, value: impl Into<String>) {
        let name = name.trim();
        self.vars.insert(name.to_string(), value.into());
        self.locked.insert(name.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name.trim()).map(String::as_str)
    }

    pub fn build(self) -> Environment {
        Environment { vars: self.vars }
    }
}
