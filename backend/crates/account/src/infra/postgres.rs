//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::{UserId, VideoId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{credentials::Credentials, user::User, video::Video};
use crate::domain::repository::{
    CredentialRepository, SubscriptionRepository, UserRepository, VideoRepository,
};
use crate::domain::value_object::{Email, FullName, UserName, UserPassword};
use crate::error::{AccountError, AccountResult};

/// PostgreSQL unique_violation
const UNIQUE_VIOLATION: &str = "23505";

const USER_COLUMNS: &str = r#"
    user_id,
    username,
    email,
    full_name,
    avatar_url,
    cover_image_url,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed account repository
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Single-column write so concurrent profile edits are not overwritten
    async fn set_image_url(
        &self,
        user_id: &UserId,
        column: &'static str,
        url: &str,
    ) -> AccountResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET {column} = $2, updated_at = now() WHERE user_id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(user_id.as_uuid())
        .bind(url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION))
}

fn uuids<T>(ids: &[kernel::id::Id<T>]) -> Vec<Uuid> {
    ids.iter().map(|id| *id.as_uuid()).collect()
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAccountRepository {
    async fn create(&self, user: &User, credentials: &Credentials) -> AccountResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                username,
                email,
                full_name,
                avatar_url,
                cover_image_url,
                password_hash,
                refresh_token_hash,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.user_name.as_str())
        .bind(user.email.as_str())
        .bind(user.full_name.as_str())
        .bind(&user.avatar_url)
        .bind(&user.cover_image_url)
        .bind(credentials.password_hash.as_phc_string())
        .bind(credentials.refresh_token_hash.as_deref())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AccountError::UserExists
            } else {
                AccountError::Database(e)
            }
        })?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AccountResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn find_by_ids(&self, user_ids: &[UserId]) -> AccountResult<Vec<User>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = ANY($1)"
        ))
        .bind(uuids(user_ids))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(UserRow::into_user).collect())
    }

    async fn find_by_user_name(&self, user_name: &UserName) -> AccountResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(user_name.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn find_by_email_or_user_name(
        &self,
        email: Option<&Email>,
        user_name: Option<&UserName>,
    ) -> AccountResult<Option<User>> {
        // NULL parameters never match
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1 OR username = $2 LIMIT 1"
        ))
        .bind(email.map(Email::as_str))
        .bind(user_name.map(UserName::as_str))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn exists_by_email_or_user_name(
        &self,
        email: &Email,
        user_name: &UserName,
    ) -> AccountResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 OR username = $2)",
        )
        .bind(email.as_str())
        .bind(user_name.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn update_details(
        &self,
        user_id: &UserId,
        full_name: &FullName,
        email: &Email,
    ) -> AccountResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users SET
                full_name = $2,
                email = $3,
                updated_at = now()
            WHERE user_id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id.as_uuid())
        .bind(full_name.as_str())
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AccountError::EmailTaken
            } else {
                AccountError::Database(e)
            }
        })?;

        Ok(row.map(UserRow::into_user))
    }

    async fn set_avatar_url(&self, user_id: &UserId, url: &str) -> AccountResult<Option<User>> {
        self.set_image_url(user_id, "avatar_url", url).await
    }

    async fn set_cover_image_url(
        &self,
        user_id: &UserId,
        url: &str,
    ) -> AccountResult<Option<User>> {
        self.set_image_url(user_id, "cover_image_url", url).await
    }

    async fn watch_history(&self, user_id: &UserId) -> AccountResult<Vec<VideoId>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT video_id FROM watch_history WHERE user_id = $1 ORDER BY position",
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().map(VideoId::from_uuid).collect())
    }
}

// ============================================================================
// Credential Repository Implementation
// ============================================================================

impl CredentialRepository for PgAccountRepository {
    async fn find_credentials(&self, user_id: &UserId) -> AccountResult<Option<Credentials>> {
        let row = sqlx::query_as::<_, CredentialsRow>(
            r#"
            SELECT
                user_id,
                password_hash,
                refresh_token_hash
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(CredentialsRow::into_credentials).transpose()
    }

    async fn update_password(
        &self,
        user_id: &UserId,
        password_hash: &UserPassword,
    ) -> AccountResult<()> {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = now() WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .bind(password_hash.as_phc_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn set_refresh_token(
        &self,
        user_id: &UserId,
        token_hash: Option<&str>,
    ) -> AccountResult<()> {
        sqlx::query("UPDATE users SET refresh_token_hash = $2 WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .bind(token_hash)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn rotate_refresh_token(
        &self,
        user_id: &UserId,
        expected_hash: &str,
        new_hash: &str,
    ) -> AccountResult<bool> {
        let rows = sqlx::query(
            r#"
            UPDATE users SET refresh_token_hash = $3
            WHERE user_id = $1 AND refresh_token_hash = $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(expected_hash)
        .bind(new_hash)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows == 1)
    }
}

// ============================================================================
// Subscription Repository Implementation
// ============================================================================

impl SubscriptionRepository for PgAccountRepository {
    async fn count_subscribers(&self, channel_id: &UserId) -> AccountResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM subscriptions WHERE channel_id = $1",
        )
        .bind(channel_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn count_subscribed_to(&self, subscriber_id: &UserId) -> AccountResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM subscriptions WHERE subscriber_id = $1",
        )
        .bind(subscriber_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn is_subscribed(
        &self,
        subscriber_id: &UserId,
        channel_id: &UserId,
    ) -> AccountResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM subscriptions
                WHERE subscriber_id = $1 AND channel_id = $2
            )
            "#,
        )
        .bind(subscriber_id.as_uuid())
        .bind(channel_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}

// ============================================================================
// Video Repository Implementation
// ============================================================================

impl VideoRepository for PgAccountRepository {
    async fn find_videos(&self, video_ids: &[VideoId]) -> AccountResult<Vec<Video>> {
        if video_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, VideoRow>(
            r#"
            SELECT
                video_id,
                owner_id,
                video_file,
                thumbnail,
                title,
                description,
                duration,
                views,
                is_published,
                created_at,
                updated_at
            FROM videos
            WHERE video_id = ANY($1)
            "#,
        )
        .bind(uuids(video_ids))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(VideoRow::into_video).collect())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    username: String,
    email: String,
    full_name: String,
    avatar_url: String,
    cover_image_url: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            user_id: UserId::from_uuid(self.user_id),
            user_name: UserName::from_db(self.username),
            email: Email::from_db(self.email),
            full_name: FullName::from_db(self.full_name),
            avatar_url: self.avatar_url,
            cover_image_url: self.cover_image_url,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CredentialsRow {
    user_id: Uuid,
    password_hash: String,
    refresh_token_hash: Option<String>,
}

impl CredentialsRow {
    fn into_credentials(self) -> AccountResult<Credentials> {
        Ok(Credentials {
            user_id: UserId::from_uuid(self.user_id),
            password_hash: UserPassword::from_phc_string(self.password_hash)?,
            refresh_token_hash: self.refresh_token_hash,
        })
    }
}

#[derive(sqlx::FromRow)]
struct VideoRow {
    video_id: Uuid,
    owner_id: Uuid,
    video_file: String,
    thumbnail: String,
    title: String,
    description: String,
    duration: f64,
    views: i64,
    is_published: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl VideoRow {
    fn into_video(self) -> Video {
        Video {
            video_id: VideoId::from_uuid(self.video_id),
            owner_id: UserId::from_uuid(self.owner_id),
            video_file: self.video_file,
            thumbnail: self.thumbnail,
            title: self.title,
            description: self.description,
            duration: self.duration,
            views: self.views,
            is_published: self.is_published,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
