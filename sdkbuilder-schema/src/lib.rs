//! Notification schema normalization.
//!
//! Topic schemas identify their nested objects with URN-style `id`s and point
//! at each other with `$ref: <id>`. This crate extracts every identified
//! object into a registry, rewrites references to local
//! `#/definitions/<name>` pointers, and merges the result into a
//! specification's `definitions`.
//!
//! Naming: the root schema of a topic with id `urn:...:Foo` is
//! `FooNotification`; a nested object with id `urn:...:Bar` under it is
//! `FooNotificationBar`.

pub mod error;
pub mod normalizer;
pub mod registry;

pub use error::{RefResolutionFailure, SchemaError};
pub use normalizer::{
    MergeReport, NameCollision, NormalizedNotifications, SchemaGraphNormalizer,
    normalize_notifications,
};
pub use registry::{DefinitionEntry, DefinitionRegistry, derive_name, last_segment};
