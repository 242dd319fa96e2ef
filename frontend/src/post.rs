use serde::{Deserialize, Deserializer, Serialize};

/// How a post's media is displayed. The backend stores this as a free-form
/// `file_type` string; anything that is not `video` is shown as an image.
#[derive(Hash, Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Image,
    Video,
}

impl From<String> for MediaKind {
    fn from(file_type: String) -> Self {
        if file_type.eq_ignore_ascii_case("video") {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    pub url: String,
    #[serde(default)]
    pub file_type: MediaKind,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub caption: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub created_at: String,
    /// Computed by the server for the current session.
    #[serde(default)]
    pub is_owner: bool,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
}

pub type Feed = Vec<Post>;

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_post_record() {
        let post: Post = serde_json::from_str(
            r#"{
                "id": "5b1c2a5e-0000-4000-8000-000000000001",
                "user_id": "9f0e0000-0000-4000-8000-000000000002",
                "caption": "sunset",
                "url": "https://cdn.example.com/a.jpg",
                "file_type": "image",
                "file_name": "a.jpg",
                "created_at": "2025-01-05T14:03:00.123456",
                "is_owner": true,
                "email": "a@b.com"
            }"#,
        )
        .unwrap();

        assert_eq!(post.id, "5b1c2a5e-0000-4000-8000-000000000001");
        assert_eq!(post.email.as_deref(), Some("a@b.com"));
        assert_eq!(post.file_type, MediaKind::Image);
        assert_eq!(post.file_name.as_deref(), Some("a.jpg"));
        assert!(post.is_owner);
    }

    #[test]
    fn optional_fields_default() {
        let post: Post = serde_json::from_str(
            r#"{"id": 42, "url": "/m.mp4", "file_type": "VIDEO", "caption": null}"#,
        )
        .unwrap();

        assert_eq!(post.id, "42");
        assert_eq!(post.email, None);
        assert_eq!(post.file_type, MediaKind::Video);
        assert_eq!(post.caption, "");
        assert!(!post.is_owner);
    }

    #[test]
    fn unknown_media_kind_is_image() {
        assert_eq!(MediaKind::from("gif".to_owned()), MediaKind::Image);
    }
}
