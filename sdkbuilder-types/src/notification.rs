use serde::{Deserialize, Serialize};

/// A topic advertised by the notification catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationTopic {
    pub id: String,

    /// JSON schema of the topic payload; some topics publish none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<serde_json::Value>,
}

/// Maps a topic to the generated class that models its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMapping {
    pub topic: String,
    pub class: String,
}

/// Contents of `notificationMappings.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMappings {
    pub notifications: Vec<NotificationMapping>,
}
