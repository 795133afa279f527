//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::token_issuer::TokenPair;
use crate::domain::entity::{
    channel::ChannelProfile,
    user::User,
    video::{OwnerSnapshot, WatchHistoryItem},
};

// ============================================================================
// User
// ============================================================================

/// User as returned to clients. Never carries password or refresh token.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar: String,
    pub cover_image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.user_id.to_string(),
            username: user.user_name.as_str().to_string(),
            email: user.email.as_str().to_string(),
            full_name: user.full_name.as_str().to_string(),
            avatar: user.avatar_url.clone(),
            cover_image: user.cover_image_url.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// ============================================================================
// Login / Tokens
// ============================================================================

/// Login request, by email or username
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
}

/// Refresh request body, used when the cookie is absent
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokensResponse {
    pub access_token: String,
    pub refresh_token: String,
}

impl From<TokenPair> for TokensResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }
    }
}

// ============================================================================
// Account Updates
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub old_password: String,
    #[serde(default)]
    pub new_password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
}

/// Empty `{}` payload
#[derive(Debug, Clone, Default, Serialize)]
pub struct EmptyResponse {}

// ============================================================================
// Channel / History
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelProfileResponse {
    pub full_name: String,
    pub username: String,
    pub subscriber_count: i64,
    pub subscribed_to_count: i64,
    pub is_subscribed: bool,
    pub avatar: String,
    pub cover_image: String,
    pub email: String,
}

impl From<ChannelProfile> for ChannelProfileResponse {
    fn from(profile: ChannelProfile) -> Self {
        Self {
            full_name: profile.full_name,
            username: profile.user_name,
            subscriber_count: profile.subscriber_count,
            subscribed_to_count: profile.subscribed_to_count,
            is_subscribed: profile.is_subscribed,
            avatar: profile.avatar_url,
            cover_image: profile.cover_image_url,
            email: profile.email,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerResponse {
    pub full_name: String,
    pub username: String,
    pub avatar: String,
}

impl From<OwnerSnapshot> for OwnerResponse {
    fn from(owner: OwnerSnapshot) -> Self {
        Self {
            full_name: owner.full_name,
            username: owner.user_name,
            avatar: owner.avatar_url,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchHistoryEntry {
    pub id: String,
    pub video_file: String,
    pub thumbnail: String,
    pub title: String,
    pub description: String,
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
    /// Omitted when the owner no longer exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<OwnerResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<WatchHistoryItem> for WatchHistoryEntry {
    fn from(item: WatchHistoryItem) -> Self {
        let video = item.video;
        Self {
            id: video.video_id.to_string(),
            video_file: video.video_file,
            thumbnail: video.thumbnail,
            title: video.title,
            description: video.description,
            duration: video.duration,
            views: video.views,
            is_published: video.is_published,
            owner: item.owner.map(OwnerResponse::from),
            created_at: video.created_at,
            updated_at: video.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{Email, FullName, UserName};

    #[test]
    fn test_user_response_has_no_secrets() {
        let user = User::new(
            UserName::new("alice").unwrap(),
            Email::new("alice@example.com").unwrap(),
            FullName::new("Alice").unwrap(),
            "http://media.test/a.png".to_string(),
            None,
        );

        let json = serde_json::to_value(UserResponse::from(&user)).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(json["username"], "alice");
        assert_eq!(json["fullName"], "Alice");
        assert_eq!(json["coverImage"], "");
        assert!(!object.keys().any(|k| k.to_lowercase().contains("password")));
        assert!(!object.keys().any(|k| k.to_lowercase().contains("refresh")));
    }

    #[test]
    fn test_login_request_accepts_either_identifier() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"username":"alice","password":"pw"}"#).unwrap();
        assert_eq!(req.username.as_deref(), Some("alice"));
        assert!(req.email.is_none());

        let req: LoginRequest = serde_json::from_str(r#"{"email":"a@b.co"}"#).unwrap();
        assert_eq!(req.password, "");
    }

    #[test]
    fn test_empty_response_is_object() {
        assert_eq!(serde_json::to_string(&EmptyResponse::default()).unwrap(), "{}");
    }
}
