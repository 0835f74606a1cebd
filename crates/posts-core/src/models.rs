use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Column names of a [`FlatPost`], in table order.
pub const COLUMNS: [&str; 46] = [
    "urn",
    "url",
    "type",
    "text",
    "isActivity",
    "timeSincePosted",
    "shareUrn",
    "postedAtISO",
    "postedAtTimestamp",
    "numLikes",
    "numShares",
    "numComments",
    "canReact",
    "canPostComments",
    "canShare",
    "commentingDisabled",
    "rootShare",
    "authorName",
    "authorProfileId",
    "authorType",
    "authorHeadline",
    "authorProfileUrl",
    "authorProfilePicture",
    "authorUrn",
    "authorFollowersCount",
    "has_images",
    "has_video",
    "has_article",
    "has_document",
    "has_poll",
    "has_event",
    "is_reshare",
    "num_images",
    "num_comments_fetched",
    "num_reactions_fetched",
    "num_attributes",
    "activityDescription",
    "shareAudience",
    "allowedCommentersScope",
    "inputUrl",
    "author_firstName",
    "author_lastName",
    "author_fullName",
    "author_occupation",
    "author_id",
    "author_publicId",
];

// ── RawPost ───────────────────────────────────────────────────────────────────

/// One scraped post as found in a LinkedIn export.
///
/// Every field is optional. Scalar fields are read leniently: a value of the
/// wrong JSON type is treated as absent instead of rejecting the whole record.
/// Nested structures that only matter for their presence or length are kept as
/// raw [`Value`]s (`Value::Null` when absent).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPost {
    #[serde(default, deserialize_with = "lenient")]
    pub urn: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub post_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub is_activity: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub time_since_posted: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub share_urn: Option<String>,
    #[serde(rename = "postedAtISO", default, deserialize_with = "lenient")]
    pub posted_at_iso: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub posted_at_timestamp: Option<i64>,

    #[serde(default, deserialize_with = "lenient")]
    pub num_likes: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub num_shares: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub num_comments: Option<i64>,

    #[serde(default, deserialize_with = "lenient")]
    pub can_react: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub can_post_comments: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub can_share: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub commenting_disabled: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub root_share: Option<bool>,

    #[serde(default, deserialize_with = "lenient")]
    pub author_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub author_profile_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub author_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub author_headline: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub author_profile_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub author_profile_picture: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub author_urn: Option<String>,
    /// Usually a display string such as `"70,384"`.
    #[serde(default)]
    pub author_followers_count: Value,
    #[serde(default)]
    pub author: Value,

    #[serde(default)]
    pub images: Value,
    #[serde(default)]
    pub linkedin_video: Value,
    #[serde(default)]
    pub article: Value,
    #[serde(default)]
    pub document: Value,
    #[serde(default)]
    pub poll: Value,
    #[serde(default)]
    pub event: Value,
    #[serde(default)]
    pub reshared_post: Value,
    #[serde(default)]
    pub comments: Value,
    #[serde(default)]
    pub reactions: Value,
    #[serde(default)]
    pub attributes: Value,

    #[serde(default)]
    pub activity_description: Value,
    #[serde(default, deserialize_with = "lenient")]
    pub share_audience: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub allowed_commenters_scope: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub input_url: Option<String>,
}

impl RawPost {
    /// Read a post from an arbitrary JSON value.
    ///
    /// Anything that is not a JSON object yields the empty post.
    pub fn from_value(value: &Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }
        Self::deserialize(value).unwrap_or_default()
    }
}

/// Deserialize `T`, mapping a value of the wrong shape to `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

// ── AuthorInfo ────────────────────────────────────────────────────────────────

/// The six scalar fields projected out of a post's nested `author` object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorInfo {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// `"{first} {last}"` with surrounding whitespace trimmed.
    pub full_name: Option<String>,
    pub occupation: Option<String>,
    pub id: Option<String>,
    pub public_id: Option<String>,
}

// ── FlatPost ──────────────────────────────────────────────────────────────────

/// A single post projected into a fixed set of scalar columns.
///
/// Serializes with the column names in [`COLUMNS`], in the same order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatPost {
    pub urn: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub post_type: Option<String>,
    pub text: Option<String>,
    pub is_activity: Option<bool>,
    pub time_since_posted: Option<String>,
    pub share_urn: Option<String>,
    #[serde(rename = "postedAtISO")]
    pub posted_at_iso: Option<String>,
    pub posted_at_timestamp: Option<i64>,

    pub num_likes: i64,
    pub num_shares: i64,
    pub num_comments: i64,

    pub can_react: Option<bool>,
    pub can_post_comments: Option<bool>,
    pub can_share: Option<bool>,
    pub commenting_disabled: Option<bool>,
    pub root_share: Option<bool>,

    pub author_name: Option<String>,
    pub author_profile_id: Option<String>,
    pub author_type: Option<String>,
    pub author_headline: Option<String>,
    pub author_profile_url: Option<String>,
    pub author_profile_picture: Option<String>,
    pub author_urn: Option<String>,
    pub author_followers_count: Option<i64>,

    #[serde(rename = "has_images")]
    pub has_images: bool,
    #[serde(rename = "has_video")]
    pub has_video: bool,
    #[serde(rename = "has_article")]
    pub has_article: bool,
    #[serde(rename = "has_document")]
    pub has_document: bool,
    #[serde(rename = "has_poll")]
    pub has_poll: bool,
    #[serde(rename = "has_event")]
    pub has_event: bool,
    #[serde(rename = "is_reshare")]
    pub is_reshare: bool,

    #[serde(rename = "num_images")]
    pub num_images: usize,
    #[serde(rename = "num_comments_fetched")]
    pub num_comments_fetched: usize,
    #[serde(rename = "num_reactions_fetched")]
    pub num_reactions_fetched: usize,
    #[serde(rename = "num_attributes")]
    pub num_attributes: usize,

    pub activity_description: Option<Value>,
    pub share_audience: Option<String>,
    pub allowed_commenters_scope: Option<String>,
    pub input_url: Option<String>,

    #[serde(rename = "author_firstName")]
    pub author_first_name: Option<String>,
    #[serde(rename = "author_lastName")]
    pub author_last_name: Option<String>,
    #[serde(rename = "author_fullName")]
    pub author_full_name: Option<String>,
    #[serde(rename = "author_occupation")]
    pub author_occupation: Option<String>,
    #[serde(rename = "author_id")]
    pub author_id: Option<String>,
    #[serde(rename = "author_publicId")]
    pub author_public_id: Option<String>,
}

impl FlatPost {
    /// When the post was published.
    ///
    /// Prefers `postedAtISO` (RFC 3339) and falls back to `postedAtTimestamp`,
    /// which LinkedIn exports in epoch milliseconds.
    pub fn posted_at(&self) -> Option<DateTime<Utc>> {
        if let Some(iso) = self.posted_at_iso.as_deref() {
            if let Ok(dt) = DateTime::parse_from_rfc3339(iso) {
                return Some(dt.with_timezone(&Utc));
            }
        }
        self.posted_at_timestamp
            .and_then(DateTime::from_timestamp_millis)
    }

    /// The row as a JSON object keyed by column name, in column order.
    pub fn to_record(&self) -> serde_json::Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        }
    }
}

// ── JSON helpers ──────────────────────────────────────────────────────────────

/// Truthiness of a JSON value: `null`, `false`, `0`, `""`, `[]` and `{}` are
/// false, everything else is true.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Number of elements of a JSON array or keys of a JSON object; 0 otherwise.
pub fn collection_len(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        _ => 0,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
