//! Typed social handles, parsed once from the stored JSON column.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialHandle {
    pub platform: String,
    /// Display string as researched, e.g. `"1.2M"`.
    pub followers: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Followers {
    Text(String),
    Count(u64),
}

impl From<Followers> for String {
    fn from(value: Followers) -> Self {
        match value {
            Followers::Text(s) => s,
            Followers::Count(n) => n.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct RawHandle {
    platform: String,
    #[serde(default)]
    followers: Option<Followers>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawHandles {
    List(Vec<RawHandle>),
    Map(BTreeMap<String, Option<Followers>>),
}

/// Parse the stored `social_handles` value.
///
/// Accepts either a list of `{platform, followers}` objects or a
/// `{platform: followers}` map; followers may be a string or a number.
/// Entries with a blank platform are dropped.
///
/// # Errors
///
/// Returns [`serde_json::Error`] if the value matches neither shape.
pub fn parse_social_handles(raw: &serde_json::Value) -> Result<Vec<SocialHandle>, serde_json::Error> {
    if raw.is_null() {
        return Ok(Vec::new());
    }
    // Older rows stored the JSON document as a string inside the column.
    if let Some(text) = raw.as_str() {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let inner: serde_json::Value = serde_json::from_str(text)?;
        return parse_social_handles(&inner);
    }

    let handles = match RawHandles::deserialize(raw)? {
        RawHandles::List(list) => list
            .into_iter()
            .map(|h| SocialHandle {
                platform: h.platform.trim().to_string(),
                followers: h.followers.map(String::from).unwrap_or_default(),
            })
            .collect::<Vec<_>>(),
        RawHandles::Map(map) => map
            .into_iter()
            .map(|(platform, followers)| SocialHandle {
                platform: platform.trim().to_string(),
                followers: followers.map(String::from).unwrap_or_default(),
            })
            .collect(),
    };

    Ok(handles
        .into_iter()
        .filter(|h| !h.platform.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_list_shape() {
        let raw = json!([{"platform": "youtube", "followers": "1.2M"}]);
        let handles = parse_social_handles(&raw).unwrap();
        assert_eq!(
            handles,
            vec![SocialHandle {
                platform: "youtube".to_string(),
                followers: "1.2M".to_string()
            }]
        );
    }

    #[test]
    fn parses_map_shape_with_numeric_followers() {
        let raw = json!({"twitch": 5400, "tiktok": "800K"});
        let handles = parse_social_handles(&raw).unwrap();
        assert_eq!(handles.len(), 2);
        assert_eq!(handles[0].platform, "tiktok");
        assert_eq!(handles[1].followers, "5400");
    }

    #[test]
    fn parses_json_encoded_string() {
        let raw = json!("[{\"platform\":\"instagram\",\"followers\":\"3M\"}]");
        let handles = parse_social_handles(&raw).unwrap();
        assert_eq!(handles[0].platform, "instagram");
    }

    #[test]
    fn null_and_blank_are_empty() {
        assert!(parse_social_handles(&serde_json::Value::Null)
            .unwrap()
            .is_empty());
        assert!(parse_social_handles(&json!("")).unwrap().is_empty());
    }

    #[test]
    fn blank_platforms_are_dropped() {
        let raw = json!([{"platform": "  ", "followers": "1"}]);
        assert!(parse_social_handles(&raw).unwrap().is_empty());
    }

    #[test]
    fn unexpected_shape_is_an_error() {
        assert!(parse_social_handles(&json!(42)).is_err());
    }
}
