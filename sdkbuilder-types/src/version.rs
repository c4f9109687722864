use serde::{Deserialize, Serialize};

/// SDK version as persisted in the version file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRecord {
    #[serde(default)]
    pub major: u64,

    #[serde(default)]
    pub minor: u64,

    #[serde(default)]
    pub point: u64,

    #[serde(default, deserialize_with = "crate::de::string_or_null")]
    pub prerelease: String,

    #[serde(default)]
    pub api_version: u64,

    /// Rendered form, refreshed whenever the record is incremented.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_full: Option<String>,
}

impl Default for VersionRecord {
    fn default() -> Self {
        Self {
            major: 0,
            minor: 0,
            point: 0,
            prerelease: "UNKNOWN".to_string(),
            api_version: 0,
            display_full: None,
        }
    }
}

/// Which component of the version to increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VersionBump {
    Point,
    Minor,
    Major,
}

impl VersionRecord {
    /// `major.minor.point` with a `-prerelease` suffix when one is set.
    pub fn render(&self) -> String {
        let base = format!("{}.{}.{}", self.major, self.minor, self.point);
        if self.prerelease.is_empty() {
            base
        } else {
            format!("{}-{}", base, self.prerelease)
        }
    }

    /// Increment one component, reset the lower ones and refresh `display_full`.
    pub fn bump(&mut self, bump: VersionBump) {
        match bump {
            VersionBump::Major => {
                self.major += 1;
                self.minor = 0;
                self.point = 0;
            }
            VersionBump::Minor => {
                self.minor += 1;
                self.point = 0;
            }
            VersionBump::Point => self.point += 1,
        }
        self.display_full = Some(self.render());
    }

    /// `display_full` if present, otherwise the rendered form.
    pub fn display(&self) -> String {
        self.display_full.clone().unwrap_or_else(|| self.render())
    }
}
