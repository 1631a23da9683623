//! Persisted operator configuration.

use serde::{Deserialize, Serialize};

use clipwatch_models::{KeywordSet, StreamIdentity};

use crate::error::{CoreError, Result};

/// Default capture source shown in the UI.
pub const DEFAULT_SOURCE_NAME: &str = "Window Capture";

/// Keywords used until the operator configures their own.
pub const DEFAULT_KEYWORDS: &str = "mine, code, lock, ssd";

/// Default time a notification popup stays visible, in seconds.
pub const DEFAULT_NOTIFICATION_DURATION: i64 = 5;

/// Stream usernames as stored on disk: a single name or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Usernames {
    One(String),
    Many(Vec<String>),
}

impl Default for Usernames {
    fn default() -> Self {
        Usernames::One(String::new())
    }
}

impl Usernames {
    /// Normalized, non-empty identities in stored order, without duplicates.
    pub fn identities(&self) -> Vec<StreamIdentity> {
        let raw: Vec<&str> = match self {
            Usernames::One(name) => name.split(',').collect(),
            Usernames::Many(names) => names.iter().map(String::as_str).collect(),
        };

        let mut identities: Vec<StreamIdentity> = Vec::with_capacity(raw.len());
        for identity in raw.into_iter().map(StreamIdentity::new) {
            if !identity.is_empty() && !identities.contains(&identity) {
                identities.push(identity);
            }
        }
        identities
    }
}

impl From<Vec<String>> for Usernames {
    fn from(names: Vec<String>) -> Self {
        Usernames::Many(names)
    }
}

impl From<&str> for Usernames {
    fn from(name: &str) -> Self {
        Usernames::One(name.to_string())
    }
}

/// Operator configuration, stored as JSON.
///
/// Keys missing from the file take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub username: Usernames,
    pub obs_password: String,
    pub source_name: String,
    /// Comma-separated keyword text as the operator typed it.
    pub keywords: String,
    pub notifications_enabled: bool,
    /// Seconds a notification stays on screen.
    pub notification_duration: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            username: Usernames::default(),
            obs_password: String::new(),
            source_name: DEFAULT_SOURCE_NAME.to_string(),
            keywords: DEFAULT_KEYWORDS.to_string(),
            notifications_enabled: true,
            notification_duration: DEFAULT_NOTIFICATION_DURATION,
        }
    }
}

impl Settings {
    pub fn with_usernames(mut self, usernames: impl Into<Usernames>) -> Self {
        self.username = usernames.into();
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.obs_password = password.into();
        self
    }

    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = keywords.into();
        self
    }

    pub fn with_notifications(mut self, enabled: bool, duration_secs: i64) -> Self {
        self.notifications_enabled = enabled;
        self.notification_duration = duration_secs;
        self
    }

    /// Configured stream identities.
    pub fn identities(&self) -> Vec<StreamIdentity> {
        self.username.identities()
    }

    /// Parsed keyword set.
    pub fn keyword_set(&self) -> KeywordSet {
        KeywordSet::parse(&self.keywords)
    }

    /// Keywords to monitor with. An empty set cannot start a session.
    pub fn monitor_keywords(&self) -> Result<KeywordSet> {
        let keywords = self.keyword_set();
        if keywords.is_empty() {
            return Err(CoreError::EmptyKeywords);
        }
        Ok(keywords)
    }

    /// Checks that every configured stream can be monitored.
    pub fn validate(&self) -> Result<()> {
        if self.identities().is_empty() {
            return Err(CoreError::MissingIdentity);
        }
        self.monitor_keywords()?;
        if self.notification_duration < 0 {
            return Err(CoreError::InvalidNotificationDuration(
                self.notification_duration,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_missing_keys() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.source_name, "Window Capture");
        assert_eq!(settings.keywords, "mine, code, lock, ssd");
        assert!(settings.notifications_enabled);
        assert_eq!(settings.notification_duration, 5);
    }

    #[test]
    fn test_username_as_string() {
        let settings: Settings =
            serde_json::from_str(r#"{"username": "@alice", "keywords": "lock"}"#).unwrap();
        assert_eq!(settings.identities(), vec![StreamIdentity::new("alice")]);
    }

    #[test]
    fn test_username_as_list() {
        let settings: Settings =
            serde_json::from_str(r#"{"username": ["alice", " bob ", "", "alice"]}"#).unwrap();
        assert_eq!(
            settings.identities(),
            vec![StreamIdentity::new("alice"), StreamIdentity::new("bob")]
        );
    }

    #[test]
    fn test_username_string_with_commas() {
        let usernames = Usernames::from("alice, @bob");
        assert_eq!(
            usernames.identities(),
            vec![StreamIdentity::new("alice"), StreamIdentity::new("bob")]
        );
    }

    #[test]
    fn test_round_trip_keeps_keys() {
        let settings = Settings::default()
            .with_usernames(vec!["alice".to_string()])
            .with_password("secret");
        let json = serde_json::to_value(&settings).unwrap();

        for key in [
            "username",
            "obs_password",
            "source_name",
            "keywords",
            "notifications_enabled",
            "notification_duration",
        ] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(json["username"], serde_json::json!(["alice"]));
    }

    #[test]
    fn test_validate() {
        let base = Settings::default().with_usernames("alice");
        assert!(base.validate().is_ok());

        assert_eq!(
            Settings::default().validate(),
            Err(CoreError::MissingIdentity)
        );
        assert_eq!(
            base.clone().with_keywords(" , ").validate(),
            Err(CoreError::EmptyKeywords)
        );
        assert_eq!(
            base.with_notifications(true, -1).validate(),
            Err(CoreError::InvalidNotificationDuration(-1))
        );
    }

    #[test]
    fn test_monitor_keywords() {
        let keywords = Settings::default().with_keywords("Lock, ssd").monitor_keywords().unwrap();
        assert_eq!(keywords.len(), 2);

        assert_eq!(
            Settings::default().with_keywords(" , ").monitor_keywords(),
            Err(CoreError::EmptyKeywords)
        );
    }
}
