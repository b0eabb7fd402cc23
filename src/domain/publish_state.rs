use chrono::{DateTime, DurationRound, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A point in time that may never have happened.
///
/// `Unset` is its own state, not epoch zero: a document that was never
/// published must not sort as "published very long ago", or every fresh
/// install would report pending changes it does not have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stamp {
    #[default]
    Unset,
    At(DateTime<Utc>),
}

impl Stamp {
    /// Millisecond precision: stamps survive a serialize/deserialize
    /// round trip unchanged (the wire format and the admin's JS dates
    /// both stop at milliseconds).
    pub fn now() -> Self {
        let now = Utc::now();
        Stamp::At(
            now.duration_trunc(chrono::Duration::milliseconds(1))
                .unwrap_or(now),
        )
    }

    /// Interprets a Firestore-style `{seconds, nanoseconds}` pair.
    /// Out-of-range input yields `Unset` rather than an error.
    pub fn from_unix(seconds: i64, nanoseconds: u32) -> Self {
        match Utc.timestamp_opt(seconds, nanoseconds) {
            chrono::LocalResult::Single(at) => Stamp::At(at),
            _ => Stamp::Unset,
        }
    }

    /// Normalizes a raw wire value. The API emits timestamps either as an
    /// RFC 3339 string or as `{seconds, nanoseconds}`; anything else,
    /// including null, absent fields and malformed dates, is `Unset`.
    /// Never fails.
    pub fn from_wire(value: &Value) -> Self {
        match value {
            Value::String(raw) => raw
                .parse::<DateTime<Utc>>()
                .map(Stamp::At)
                .unwrap_or(Stamp::Unset),
            Value::Object(fields) => match fields.get("seconds").and_then(Value::as_i64) {
                Some(seconds) => {
                    let nanos = fields
                        .get("nanoseconds")
                        .and_then(Value::as_u64)
                        .unwrap_or(0);
                    Stamp::from_unix(seconds, nanos.min(u32::MAX as u64) as u32)
                }
                None => Stamp::Unset,
            },
            _ => Stamp::Unset,
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Stamp::At(_))
    }

    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Stamp::At(at) => Some(*at),
            Stamp::Unset => None,
        }
    }

    /// Strictly-after comparison. False whenever either side is `Unset`.
    pub fn is_after(&self, other: &Stamp) -> bool {
        match (self.instant(), other.instant()) {
            (Some(a), Some(b)) => a > b,
            _ => false,
        }
    }
}

impl Serialize for Stamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Stamp::At(at) => {
                serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Stamp::Unset => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Stamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Route through Value so that no input shape can fail the outer
        // document: a malformed stamp reads as Unset.
        let value = Value::deserialize(deserializer)?;
        Ok(Stamp::from_wire(&value))
    }
}

/// Whether the published snapshot is stale relative to the settings document
/// or any project document.
///
/// This is the single definition; the status endpoint and the publish
/// receipt both go through here.
pub fn needs_publish(settings_updated: Stamp, project_updated: Stamp, published: Stamp) -> bool {
    match published {
        Stamp::Unset => settings_updated.is_set() || project_updated.is_set(),
        Stamp::At(_) => {
            project_updated.is_after(&published) || settings_updated.is_after(&published)
        }
    }
}

/// Advisory publish state, as reported by `GET /settings/website/status`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishState {
    pub needs_publish: bool,
    pub updated_at: Stamp,
    pub project_updated_at: Stamp,
    pub published_at: Stamp,
}

pub fn evaluate(updated_at: Stamp, project_updated_at: Stamp, published_at: Stamp) -> PublishState {
    PublishState {
        needs_publish: needs_publish(updated_at, project_updated_at, published_at),
        updated_at,
        project_updated_at,
        published_at,
    }
}
