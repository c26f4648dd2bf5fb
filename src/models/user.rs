use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::de;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(
        default,
        alias = "_id",
        deserialize_with = "de::lenient_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, alias = "name", skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Best label for display: username, then email, then id.
    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .or(self.email.as_deref())
            .or(self.id.as_deref())
            .unwrap_or("?")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_display_name_fallbacks() {
        let user: User = serde_json::from_value(json!({"id": 3, "email": "a@b.c"})).unwrap();
        assert_eq!(user.display_name(), "a@b.c");
        let user: User = serde_json::from_value(json!({"name": "lina", "role": "admin"})).unwrap();
        assert_eq!(user.display_name(), "lina");
        assert_eq!(user.role.as_deref(), Some("admin"));
        assert_eq!(User::default().display_name(), "?");
    }
}
