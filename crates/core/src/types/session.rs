//! Session and theme types.
//!
//! Both are owned by the application shell and handed to components as
//! context; nothing here is global.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use super::id::UserId;

/// The signed-in user.
///
/// Populated by the auth subsystem; the dashboard only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(rename = "_id")]
    pub user_id: UserId,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

impl Session {
    /// Create a session with only an identity and admin flag.
    #[must_use]
    pub fn new(user_id: impl Into<UserId>, is_admin: bool) -> Self {
        Self {
            user_id: user_id.into(),
            is_admin,
            username: String::new(),
            email: String::new(),
            profile_picture: None,
        }
    }

    /// Whether the user may manage posts.
    #[must_use]
    pub const fn can_manage_posts(&self) -> bool {
        self.is_admin
    }
}

/// Error returned when a theme name is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown theme: {0} (expected 'light' or 'dark')")]
pub struct ThemeParseError(String);

/// Colour scheme of the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The other theme.
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Name used in markup (`class="light"` / `class="dark"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ThemeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ThemeParseError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_toggle_flips() {
        assert_eq!(Theme::Light.toggle(), Theme::Dark);
        assert_eq!(Theme::Dark.toggle(), Theme::Light);
        assert_eq!(Theme::default(), Theme::Light);
    }

    #[test]
    fn test_theme_from_str() {
        assert_eq!("Dark".parse::<Theme>(), Ok(Theme::Dark));
        assert_eq!(" light ".parse::<Theme>(), Ok(Theme::Light));
        assert!("sepia".parse::<Theme>().is_err());
    }

    #[test]
    fn test_session_deserializes_user_document() {
        let json = r#"{
            "_id": "u1",
            "username": "ada",
            "email": "ada@example.com",
            "profilePicture": "https://img.example/ada.png",
            "isAdmin": true
        }"#;
        let session: Session = serde_json::from_str(json).expect("deserialize");
        assert_eq!(session.user_id.as_str(), "u1");
        assert!(session.can_manage_posts());
        assert_eq!(session.profile_picture.as_deref(), Some("https://img.example/ada.png"));
    }

    #[test]
    fn test_session_defaults_to_non_admin() {
        let session: Session = serde_json::from_str(r#"{"_id": "u2"}"#).expect("deserialize");
        assert!(!session.is_admin);
        assert!(session.username.is_empty());
    }
}
