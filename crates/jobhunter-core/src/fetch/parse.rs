//! Parse a listings page body into raw job items.
//!
//! The upstream may omit any field or send it with the wrong JSON type. All of
//! that is absorbed here: every field of [`RawJob`] is optional and anything
//! that is not a string is treated as absent.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One upstream job item, as delivered. Field names follow the upstream API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawJob {
    #[serde(default, deserialize_with = "string_or_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub candidate_required_location: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub job_type: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub publication_date: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPage {
    #[serde(default, deserialize_with = "items_or_empty")]
    jobs: Vec<RawJob>,
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// A non-array `jobs` yields no items; a non-object item becomes an empty `RawJob`.
fn items_or_empty<'de, D>(deserializer: D) -> Result<Vec<RawJob>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .map(|item| match item {
            Value::Object(_) => serde_json::from_value(item).unwrap_or_default(),
            _ => RawJob::default(),
        })
        .collect())
}

/// Parse a page body. Fails only if the body is not JSON at all; a JSON value
/// without a usable `jobs` array is an empty page.
pub fn parse_page(body: &[u8]) -> Result<Vec<RawJob>, serde_json::Error> {
    let value: Value = serde_json::from_slice(body)?;
    if !value.is_object() {
        return Ok(Vec::new());
    }
    let page: RawPage = serde_json::from_value(value)?;
    Ok(page.jobs)
}
