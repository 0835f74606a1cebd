//! Projection of raw post records into flat table rows.
//!
//! Scraped exports are schema-inconsistent from one post to the next, so
//! every field is looked up with a default on absence. None of the functions
//! here can fail for any input shape.

use posts_core::models::{collection_len, is_truthy, AuthorInfo, FlatPost, RawPost};
use serde_json::Value;

// ── AuthorExtractor ───────────────────────────────────────────────────────────

/// Project a nested `author` object into [`AuthorInfo`].
///
/// Missing input, non-objects and empty objects give the all-`None` record.
/// `firstName` and `lastName` default to the empty string, and the full name
/// is their space-joined concatenation with outer whitespace trimmed.
pub fn extract_author(author: Option<&Value>) -> AuthorInfo {
    let Some(Value::Object(map)) = author else {
        return AuthorInfo::default();
    };
    if map.is_empty() {
        return AuthorInfo::default();
    }

    let first_name = name_part(map.get("firstName"));
    let last_name = name_part(map.get("lastName"));
    let full_name = format!("{} {}", first_name, last_name).trim().to_string();

    AuthorInfo {
        first_name: Some(first_name),
        last_name: Some(last_name),
        full_name: Some(full_name),
        occupation: text_field(map.get("occupation")),
        id: text_field(map.get("id")),
        public_id: text_field(map.get("publicId")),
    }
}

fn name_part(value: Option<&Value>) -> String {
    value
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

/// Strings pass through; numeric identifiers are rendered as text.
fn text_field(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ── FollowerCountParser ───────────────────────────────────────────────────────

/// Parse a follower count such as `"70,384"` into `70384`.
///
/// Returns `None` for absent or non-string input and for anything that is not
/// an integer once the `,` separators are removed.
pub fn parse_follower_count(value: Option<&Value>) -> Option<i64> {
    let text = value?.as_str()?;
    let cleaned = text.replace(',', "");
    cleaned.trim().parse().ok()
}

// ── RecordFlattener ───────────────────────────────────────────────────────────

/// Flatten one raw post record into a [`FlatPost`].
///
/// The like, share and comment counters are `0` when absent, explicitly
/// `null`, or of the wrong type; they are never left empty.
pub fn flatten_post(post: &Value) -> FlatPost {
    let raw = RawPost::from_value(post);
    let author = extract_author(Some(&raw.author));

    FlatPost {
        urn: raw.urn,
        url: raw.url,
        post_type: raw.post_type,
        text: raw.text,
        is_activity: raw.is_activity,
        time_since_posted: raw.time_since_posted,
        share_urn: raw.share_urn,
        posted_at_iso: raw.posted_at_iso,
        posted_at_timestamp: raw.posted_at_timestamp,

        num_likes: raw.num_likes.unwrap_or(0),
        num_shares: raw.num_shares.unwrap_or(0),
        num_comments: raw.num_comments.unwrap_or(0),

        can_react: raw.can_react,
        can_post_comments: raw.can_post_comments,
        can_share: raw.can_share,
        commenting_disabled: raw.commenting_disabled,
        root_share: raw.root_share,

        author_name: raw.author_name,
        author_profile_id: raw.author_profile_id,
        author_type: raw.author_type,
        author_headline: raw.author_headline,
        author_profile_url: raw.author_profile_url,
        author_profile_picture: raw.author_profile_picture,
        author_urn: raw.author_urn,
        author_followers_count: parse_follower_count(Some(&raw.author_followers_count)),

        has_images: is_truthy(&raw.images),
        has_video: is_truthy(&raw.linkedin_video),
        has_article: is_truthy(&raw.article),
        has_document: is_truthy(&raw.document),
        has_poll: is_truthy(&raw.poll),
        has_event: is_truthy(&raw.event),
        is_reshare: is_truthy(&raw.reshared_post),

        num_images: collection_len(&raw.images),
        num_comments_fetched: collection_len(&raw.comments),
        num_reactions_fetched: collection_len(&raw.reactions),
        num_attributes: collection_len(&raw.attributes),

        activity_description: match raw.activity_description {
            Value::Null => None,
            other => Some(other),
        },
        share_audience: raw.share_audience,
        allowed_commenters_scope: raw.allowed_commenters_scope,
        input_url: raw.input_url,

        author_first_name: author.first_name,
        author_last_name: author.last_name,
        author_full_name: author.full_name,
        author_occupation: author.occupation,
        author_id: author.id,
        author_public_id: author.public_id,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
