use serde::{Deserialize, Serialize};

#[cfg(feature = "ts")]
use ts_rs::TS;

/// Profile of an account on the journal service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct User {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
}

impl User {
    /// Greeting shown once logged in
    pub fn greeting(&self) -> String {
        format!("Hello, {}!", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_accepts_mongo_style_id() {
        let json = r#"{"_id": "64f0c2", "name": "Ana", "email": "ana@example.com"}"#;
        let user: User = serde_json::from_str(json).expect("Failed to parse user JSON");
        assert_eq!(user.id, "64f0c2");
        assert_eq!(user.greeting(), "Hello, Ana!");
    }

    #[test]
    fn test_user_serializes_plain_id() {
        let user = User {
            id: "u1".to_string(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
        };
        let json = serde_json::to_string(&user).expect("Failed to serialize user");
        assert!(json.contains(r#""id":"u1""#));
        assert!(!json.contains("_id"));
    }
}
