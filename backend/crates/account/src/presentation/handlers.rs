//! HTTP Handlers

use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{FromRequest, Multipart, Path, State};
use axum::http::{HeaderMap, Uri, header};
use axum::response::{AppendHeaders, IntoResponse, Response};
use axum::Extension;
use kernel::error::app_error::AppError;
use kernel::response::ApiResponse;
use platform::cookie::{delete_cookie_header, extract_cookie, set_cookie_header};
use platform::media::MediaUploader;
use std::sync::Arc;

use crate::application::config::AccountConfig;
use crate::application::{
    ChangePasswordInput, ChangePasswordUseCase, ChannelProfileUseCase, LoginInput, LoginUseCase,
    LogoutUseCase, MediaSlot, RegisterInput, RegisterUseCase, TokenIssuer, TokenPair,
    UpdateMediaUseCase, UpdateProfileInput, UpdateProfileUseCase, WatchHistoryUseCase,
};
use crate::domain::repository::AccountRepository;
use crate::error::{AccountError, AccountResult};
use crate::presentation::dto::{
    ChangePasswordRequest, ChannelProfileResponse, EmptyResponse, LoginRequest, LoginResponse,
    RefreshTokenRequest, TokensResponse, UpdateAccountRequest, UserResponse, WatchHistoryEntry,
};
use crate::presentation::middleware::{CurrentUser, Viewer};
use crate::presentation::multipart::{AccountMultipart, UploadForm};

/// Shared state for account handlers
pub struct AccountAppState<R, M>
where
    R: AccountRepository,
    M: MediaUploader + Sync + 'static,
{
    pub repo: Arc<R>,
    pub uploader: Arc<M>,
    pub config: Arc<AccountConfig>,
}

impl<R, M> Clone for AccountAppState<R, M>
where
    R: AccountRepository,
    M: MediaUploader + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            uploader: self.uploader.clone(),
            config: self.config.clone(),
        }
    }
}

/// JSON body whose rejections render as the error envelope
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AccountError))]
pub struct AccountJson<T>(pub T);

// ============================================================================
// Register / Login
// ============================================================================

/// POST /register
pub async fn register<R, M>(
    State(state): State<AccountAppState<R, M>>,
    AccountMultipart(mut multipart): AccountMultipart,
) -> AccountResult<ApiResponse<UserResponse>>
where
    R: AccountRepository,
    M: MediaUploader + Sync + 'static,
{
    let mut form = UploadForm::read(
        &mut multipart,
        &state.config.upload_temp_dir,
        &["avatar", "coverImage"],
    )
    .await?;

    let input = RegisterInput {
        avatar: form.take_file("avatar")?,
        cover_image: form.take_file("coverImage")?,
        full_name: form.text("fullName"),
        email: form.text("email"),
        user_name: form.text("username"),
        password: form.text("password"),
    };

    let use_case = RegisterUseCase::new(
        state.repo.clone(),
        state.uploader.clone(),
        state.config.clone(),
    );
    let user = use_case.execute(input).await?;

    Ok(ApiResponse::created(
        UserResponse::from(&user),
        "User registered Successfully",
    ))
}

/// POST /login
pub async fn login<R, M>(
    State(state): State<AccountAppState<R, M>>,
    AccountJson(req): AccountJson<LoginRequest>,
) -> AccountResult<Response>
where
    R: AccountRepository,
    M: MediaUploader + Sync + 'static,
{
    let use_case = LoginUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(LoginInput {
            email: req.email,
            user_name: req.username,
            password: req.password,
        })
        .await?;

    let cookies = token_cookies(&state.config, &output.tokens);
    let body = ApiResponse::ok(
        LoginResponse {
            user: UserResponse::from(&output.user),
            access_token: output.tokens.access_token,
            refresh_token: output.tokens.refresh_token,
        },
        "User logged In Successfully",
    );

    Ok((cookies, body).into_response())
}

// ============================================================================
// Tokens
// ============================================================================

/// POST /logout
pub async fn logout<R, M>(
    State(state): State<AccountAppState<R, M>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> AccountResult<Response>
where
    R: AccountRepository,
    M: MediaUploader + Sync + 'static,
{
    LogoutUseCase::new(state.repo.clone())
        .execute(&user.user_id)
        .await?;

    let cookies = AppendHeaders([
        (
            header::SET_COOKIE,
            delete_cookie_header(&state.config.access_cookie()),
        ),
        (
            header::SET_COOKIE,
            delete_cookie_header(&state.config.refresh_cookie()),
        ),
    ]);

    Ok((cookies, ApiResponse::ok(EmptyResponse::default(), "User logged Out")).into_response())
}

/// POST /refresh-token
///
/// Token from the refresh cookie, else from a JSON body `{ "refreshToken": ... }`.
pub async fn refresh_token<R, M>(
    State(state): State<AccountAppState<R, M>>,
    headers: HeaderMap,
    body: Bytes,
) -> AccountResult<Response>
where
    R: AccountRepository,
    M: MediaUploader + Sync + 'static,
{
    let incoming = extract_cookie(&headers, &state.config.refresh_cookie_name).or_else(|| {
        if body.is_empty() {
            return None;
        }
        serde_json::from_slice::<RefreshTokenRequest>(&body)
            .ok()
            .and_then(|req| req.refresh_token)
    });

    let issuer = TokenIssuer::new(state.repo.clone(), state.repo.clone(), state.config.clone());
    let tokens = issuer.refresh(incoming.as_deref()).await?;

    let cookies = token_cookies(&state.config, &tokens);
    let body = ApiResponse::ok(TokensResponse::from(tokens), "Access token refreshed");

    Ok((cookies, body).into_response())
}

// ============================================================================
// Current User
// ============================================================================

/// POST /change-password
pub async fn change_password<R, M>(
    State(state): State<AccountAppState<R, M>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    AccountJson(req): AccountJson<ChangePasswordRequest>,
) -> AccountResult<ApiResponse<EmptyResponse>>
where
    R: AccountRepository,
    M: MediaUploader + Sync + 'static,
{
    let use_case = ChangePasswordUseCase::new(state.repo.clone(), state.config.clone());
    use_case
        .execute(
            &user.user_id,
            ChangePasswordInput {
                old_password: req.old_password,
                new_password: req.new_password,
            },
        )
        .await?;

    Ok(ApiResponse::ok(
        EmptyResponse::default(),
        "Password changed successfully",
    ))
}

/// GET /current-user
pub async fn current_user(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResponse<UserResponse> {
    ApiResponse::ok(UserResponse::from(&user), "User fetched successfully")
}

/// PATCH /update-account
pub async fn update_account<R, M>(
    State(state): State<AccountAppState<R, M>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    AccountJson(req): AccountJson<UpdateAccountRequest>,
) -> AccountResult<ApiResponse<UserResponse>>
where
    R: AccountRepository,
    M: MediaUploader + Sync + 'static,
{
    let use_case = UpdateProfileUseCase::new(state.repo.clone());
    let user = use_case
        .execute(
            &user.user_id,
            UpdateProfileInput {
                full_name: req.full_name,
                email: req.email,
            },
        )
        .await?;

    Ok(ApiResponse::ok(
        UserResponse::from(&user),
        "Account details updated successfully",
    ))
}

/// PATCH /update-avatar
pub async fn update_avatar<R, M>(
    state: State<AccountAppState<R, M>>,
    current: Extension<CurrentUser>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AccountResult<ApiResponse<UserResponse>>
where
    R: AccountRepository,
    M: MediaUploader + Sync + 'static,
{
    let user = update_media(state, current, multipart, MediaSlot::Avatar).await?;
    Ok(ApiResponse::ok(
        UserResponse::from(&user),
        "Avatar image updated successfully",
    ))
}

/// PATCH /update-cover
pub async fn update_cover_image<R, M>(
    state: State<AccountAppState<R, M>>,
    current: Extension<CurrentUser>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AccountResult<ApiResponse<UserResponse>>
where
    R: AccountRepository,
    M: MediaUploader + Sync + 'static,
{
    let user = update_media(state, current, multipart, MediaSlot::CoverImage).await?;
    Ok(ApiResponse::ok(
        UserResponse::from(&user),
        "Cover image updated successfully",
    ))
}

async fn update_media<R, M>(
    State(state): State<AccountAppState<R, M>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    multipart: Result<Multipart, MultipartRejection>,
    slot: MediaSlot,
) -> AccountResult<crate::domain::entity::user::User>
where
    R: AccountRepository,
    M: MediaUploader + Sync + 'static,
{
    let field = slot.field_name();

    // No form body at all is the same as a form without the file
    let file = match multipart {
        Ok(mut multipart) => {
            let mut form =
                UploadForm::read(&mut multipart, &state.config.upload_temp_dir, &[field]).await?;
            form.take_file(field)?
        }
        Err(rejection) => {
            tracing::debug!(reason = %rejection.body_text(), "Media update without multipart body");
            None
        }
    };

    let use_case = UpdateMediaUseCase::new(state.repo.clone(), state.uploader.clone());
    use_case.execute(&user.user_id, slot, file).await
}

// ============================================================================
// Channel / History
// ============================================================================

/// GET /c/{username}
pub async fn channel_profile<R, M>(
    State(state): State<AccountAppState<R, M>>,
    Extension(viewer): Extension<Viewer>,
    Path(user_name): Path<String>,
) -> AccountResult<ApiResponse<ChannelProfileResponse>>
where
    R: AccountRepository,
    M: MediaUploader + Sync + 'static,
{
    let use_case = ChannelProfileUseCase::new(state.repo.clone(), state.repo.clone());
    let profile = use_case
        .execute(&user_name, viewer.user_id.as_ref())
        .await?;

    Ok(ApiResponse::ok(
        ChannelProfileResponse::from(profile),
        "User channel fetched successfully",
    ))
}

/// GET /history
pub async fn watch_history<R, M>(
    State(state): State<AccountAppState<R, M>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> AccountResult<ApiResponse<Vec<WatchHistoryEntry>>>
where
    R: AccountRepository,
    M: MediaUploader + Sync + 'static,
{
    let use_case = WatchHistoryUseCase::new(state.repo.clone(), state.repo.clone());
    let items = use_case.execute(&user.user_id).await?;

    Ok(ApiResponse::ok(
        items.into_iter().map(WatchHistoryEntry::from).collect(),
        "Watch history fetched successfully",
    ))
}

// ============================================================================
// Fallback
// ============================================================================

/// Unknown route
pub async fn not_found(uri: Uri) -> AppError {
    AppError::not_found(format!("Route {} not found", uri.path()))
}

// ============================================================================
// Helper Functions
// ============================================================================

fn token_cookies(
    config: &AccountConfig,
    tokens: &TokenPair,
) -> AppendHeaders<[(header::HeaderName, header::HeaderValue); 2]> {
    AppendHeaders([
        (
            header::SET_COOKIE,
            set_cookie_header(&config.access_cookie(), &tokens.access_token),
        ),
        (
            header::SET_COOKIE,
            set_cookie_header(&config.refresh_cookie(), &tokens.refresh_token),
        ),
    ])
}
