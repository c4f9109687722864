//! Merging notification topic schemas into a specification's `definitions`.

use crate::error::SchemaError;
use crate::registry::{DefinitionRegistry, NOTIFICATION_SUFFIX, last_segment};
use indexmap::IndexMap;
use sdkbuilder_types::notification::{NotificationMapping, NotificationMappings, NotificationTopic};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, trace, warn};

/// Two or more identifiers that derived the same definition name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameCollision {
    pub name: String,
    /// In registration order; the last one is the definition that was kept.
    pub identifiers: Vec<String>,
}

/// What a merge did to the destination `definitions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    /// Every definition name written, in order.
    pub inserted: Vec<String>,
    /// Names that replaced a definition already present in the specification.
    pub replaced_existing: Vec<String>,
    pub collisions: Vec<NameCollision>,
}

/// Result of normalizing a batch of topics into a specification.
#[derive(Debug, Clone, Default)]
pub struct NormalizedNotifications {
    pub mappings: NotificationMappings,
    pub report: MergeReport,
    /// Topics skipped because they publish no schema.
    pub skipped_topics: Vec<String>,
}

/// Collects topic schemas, then rewrites their references and merges them.
#[derive(Debug, Default)]
pub struct SchemaGraphNormalizer {
    registry: DefinitionRegistry,
    mappings: Vec<NotificationMapping>,
    skipped: Vec<String>,
}

impl SchemaGraphNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &DefinitionRegistry {
        &self.registry
    }

    /// Register one topic. Returns the mapping it produced, or `None` when
    /// the topic has no schema.
    pub fn add_topic(
        &mut self,
        topic: &NotificationTopic,
    ) -> Result<Option<&NotificationMapping>, SchemaError> {
        let Some(schema) = &topic.schema else {
            warn!("Notification {} does not have a defined schema!", topic.id);
            self.skipped.push(topic.id.clone());
            return Ok(None);
        };
        let Some(schema_id) = schema.get("id").and_then(Value::as_str) else {
            return Err(SchemaError::MissingSchemaId {
                topic: topic.id.clone(),
            });
        };

        let class = format!("{}{NOTIFICATION_SUFFIX}", last_segment(schema_id));
        trace!("Notification mapping: {} ({})", topic.id, class);
        self.registry.extract_definitions(&class, schema);
        self.mappings.push(NotificationMapping {
            topic: topic.id.clone(),
            class,
        });
        Ok(self.mappings.last())
    }

    pub fn add_topics(&mut self, topics: &[NotificationTopic]) -> Result<(), SchemaError> {
        info!("Processing {} notification schemas...", topics.len());
        for topic in topics {
            self.add_topic(topic)?;
        }
        Ok(())
    }

    /// Fix every registered schema's references, then insert them into
    /// `spec.definitions` (created when absent). `spec` is left untouched
    /// when any reference fails to resolve.
    pub fn merge_into(mut self, spec: &mut Value) -> Result<NormalizedNotifications, SchemaError> {
        self.registry.fix_all_refs()?;

        let root = spec.as_object_mut().ok_or_else(|| SchemaError::InvalidSpec {
            message: "specification root is not an object".to_string(),
        })?;
        let definitions = root
            .entry("definitions")
            .or_insert_with(|| Value::Object(Map::new()));
        if definitions.is_null() {
            *definitions = Value::Object(Map::new());
        }
        let definitions = definitions
            .as_object_mut()
            .ok_or_else(|| SchemaError::InvalidSpec {
                message: "definitions is not an object".to_string(),
            })?;

        let mut report = MergeReport::default();
        let mut owners: IndexMap<String, Vec<String>> = IndexMap::new();
        for entry in self.registry.into_entries() {
            owners
                .entry(entry.derived_name.clone())
                .or_default()
                .push(entry.identifier);

            if definitions
                .insert(entry.derived_name.clone(), entry.schema)
                .is_some()
                && owners[&entry.derived_name].len() == 1
            {
                debug!(name = %entry.derived_name, "replacing existing definition");
                report.replaced_existing.push(entry.derived_name.clone());
            }
            report.inserted.push(entry.derived_name);
        }

        for (name, identifiers) in owners {
            if identifiers.len() > 1 {
                warn!(
                    name = %name,
                    identifiers = ?identifiers,
                    "definition name collision; keeping the last registered schema"
                );
                report.collisions.push(NameCollision { name, identifiers });
            }
        }

        Ok(NormalizedNotifications {
            mappings: NotificationMappings {
                notifications: self.mappings,
            },
            report,
            skipped_topics: self.skipped,
        })
    }
}

/// Register `topics` and merge their definitions into `spec`.
pub fn normalize_notifications(
    topics: &[NotificationTopic],
    spec: &mut Value,
) -> Result<NormalizedNotifications, SchemaError> {
    let mut normalizer = SchemaGraphNormalizer::new();
    normalizer.add_topics(topics)?;
    normalizer.merge_into(spec)
}
