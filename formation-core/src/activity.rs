//! Recently changed records, as served by `GET /api/{entity}/recentActivities`.

use crate::enums::EntityKind;
use crate::identity::{EntityId, Timestamp};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

/// One recently changed record. Entity-specific fields stay untyped since
/// the feed only needs a handful of them for its label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub id: EntityId,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub updated_at: Timestamp,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// RFC 3339, or a local date-time without offset read as UTC.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Timestamp, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>()
        .map(|naive| naive.and_utc())
        .map_err(|e| de::Error::custom(format!("invalid timestamp {raw:?}: {e}")))
}

impl ActivityRecord {
    fn text(&self, name: &str) -> &str {
        self.fields
            .get(name)
            .and_then(|value| value.as_str())
            .unwrap_or("")
    }

    /// Feed sentence for this record.
    pub fn label(&self, kind: EntityKind) -> String {
        match kind {
            EntityKind::Users => format!("New User {} has been updated", self.text("login")),
            EntityKind::Participants => format!(
                "Participant {} {} has joined",
                self.text("firstName"),
                self.text("lastName")
            ),
            EntityKind::Trainers => format!(
                "Trainer {} {} has been assigned",
                self.text("firstName"),
                self.text("lastName")
            ),
            EntityKind::Trainings => {
                format!("Training {} has been updated", self.text("title"))
            }
        }
    }
}
