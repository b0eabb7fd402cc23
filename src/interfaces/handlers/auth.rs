use actix_web::{get, post, web, HttpResponse, Responder};
use uuid::Uuid;

use crate::entities::token::RefreshTokenRequest;
use crate::entities::user::{LoginUser, NewUser, PublicUser};
use crate::errors::AuthError;
use crate::repositories::user::UserRepository;
use crate::use_cases::extractors::AdminClaims;
use crate::AppState;

#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    user: web::Json<NewUser>
) -> impl Responder {
    match state.auth_handler.register(user.into_inner()).await {
        Ok(response) => HttpResponse::Created().json(response),
        Err(e) => e.to_http_response(),
    }
}

#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    user: web::Json<LoginUser>
) -> Result<impl Responder, AuthError> {
    let auth_response = state.auth_handler.login(user.into_inner()).await?;
    Ok(HttpResponse::Ok().json(auth_response))
}

#[post("/refresh-token")]
pub async fn refresh_token(
    state: web::Data<AppState>,
    request: web::Json<RefreshTokenRequest>,
) -> Result<impl Responder, AuthError> {
    let auth_response = state
        .auth_handler
        .refresh_token(&request.refresh_token)
        .await?;
    Ok(HttpResponse::Ok().json(auth_response))
}

/// Identity echo for the signed-in admin.
#[get("/me")]
pub async fn me(
    admin: AdminClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AuthError> {
    let user_id = Uuid::parse_str(&admin.0.sub).map_err(|_| AuthError::InvalidUserId)?;

    let user = state
        .auth_handler
        .user_repo
        .get_user_by_id(&user_id)
        .await
        .map_err(|_| AuthError::AuthenticationFailed)?
        .ok_or(AuthError::AuthenticationFailed)?;

    Ok(HttpResponse::Ok().json(PublicUser::from(user)))
}
