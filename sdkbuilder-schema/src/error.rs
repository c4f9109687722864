//! Error types for sdkbuilder-schema.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A `$ref` whose target identifier is not in the definition registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefResolutionFailure {
    /// Derived name of the definition the reference was found in.
    pub definition: String,
    /// The unresolved reference value.
    pub reference: String,
    /// JSON pointer to the `$ref` within that definition.
    pub path: String,
}

impl fmt::Display for RefResolutionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}{}", self.reference, self.definition, self.path)
    }
}

#[derive(Debug, Error)]
pub enum SchemaError {
    /// One or more references could not be rewritten. Every failure of the pass is listed.
    #[error("{} unresolved $ref(s): {}", .0.len(), join(.0))]
    RefResolution(Vec<RefResolutionFailure>),

    /// A topic schema has no string `id`, so no class name can be derived.
    #[error("notification schema for topic {topic} has no id")]
    MissingSchemaId {
        /// The topic whose schema is missing an id.
        topic: String,
    },

    /// The destination specification is not shaped like a schema document.
    #[error("invalid specification: {message}")]
    InvalidSpec {
        /// What was wrong with it.
        message: String,
    },
}

fn join(failures: &[RefResolutionFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ref_resolution_lists_every_failure() {
        let err = SchemaError::RefResolution(vec![
            RefResolutionFailure {
                definition: "ANotification".to_string(),
                reference: "urn:x:Missing".to_string(),
                path: "/properties/a/$ref".to_string(),
            },
            RefResolutionFailure {
                definition: "BNotification".to_string(),
                reference: "urn:x:Gone".to_string(),
                path: "/items/$ref".to_string(),
            },
        ]);
        let msg = err.to_string();
        assert!(msg.starts_with("2 unresolved $ref(s)"));
        assert!(msg.contains("urn:x:Missing at ANotification/properties/a/$ref"));
        assert!(msg.contains("urn:x:Gone"));
    }
}
