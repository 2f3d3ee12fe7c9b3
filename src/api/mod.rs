//! API handlers for Maktabty REST endpoints

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod books;
pub mod health;
pub mod openapi;

use std::convert::Infallible;

use axum::{
    async_trait,
    body::Body,
    extract::{FromRequestParts, Request},
    http::{
        header::{ACCEPT_LANGUAGE, AUTHORIZATION, CONTENT_LANGUAGE, CONTENT_LENGTH, CONTENT_TYPE},
        request::Parts,
        HeaderValue,
    },
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    RequestPartsExt, Router,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::ToSchema;

use crate::{
    error::{AppError, ErrorKind, ErrorResponse},
    i18n::Lang,
    models::user::{Identity, UserClaims},
    AppState,
};

/// Extractor for authenticated user from a bearer token with an open session
pub struct AuthenticatedUser(pub UserClaims);

impl AuthenticatedUser {
    pub fn identity(&self) -> Identity {
        self.0.identity()
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::Unauthenticated("Missing or invalid authorization header".to_string()))?;

        let claims = state.services.users.resolve_token(bearer.token()).await?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Caller who may be anonymous. Only a missing `Authorization` header yields
/// `None`; a bad token or a storage failure is still an error.
pub struct MaybeAuthenticatedUser(pub Option<AuthenticatedUser>);

impl MaybeAuthenticatedUser {
    pub fn identity(&self) -> Option<Identity> {
        self.0.as_ref().map(AuthenticatedUser::identity)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeAuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key(AUTHORIZATION) {
            return Ok(MaybeAuthenticatedUser(None));
        }

        let user = AuthenticatedUser::from_request_parts(parts, state).await?;
        Ok(MaybeAuthenticatedUser(Some(user)))
    }
}

/// Request language: `?lang=` first, then `Accept-Language`, else English
#[async_trait]
impl<S> FromRequestParts<S> for Lang
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let from_query = parts.uri.query().and_then(|query| {
            query
                .split('&')
                .find_map(|pair| pair.strip_prefix("lang="))
                .map(Lang::from_tag)
        });

        if let Some(lang) = from_query {
            return Ok(lang);
        }

        Ok(parts
            .headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .map(Lang::from_accept_language)
            .unwrap_or_default())
    }
}

/// Plain message response
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Re-render error bodies in the request language
pub async fn localize_errors(lang: Lang, request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    if lang == Lang::En {
        return response;
    }

    let kind = response.extensions().get::<ErrorKind>().copied();
    let body = response.extensions().get::<ErrorResponse>().cloned();
    let (Some(kind), Some(body)) = (kind, body) else {
        return response;
    };

    let localized = ErrorResponse::new(kind, &body.detail, lang);
    let Ok(bytes) = serde_json::to_vec(&localized) else {
        return response;
    };

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(CONTENT_LENGTH);
    parts
        .headers
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    parts
        .headers
        .insert(CONTENT_LANGUAGE, HeaderValue::from_static(lang.as_str()));
    Response::from_parts(parts, Body::from(bytes))
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        // Catalog
        .route("/books", get(books::list_books))
        .route("/books/:id", get(books::get_book))
        .route("/books/:id/reserve", post(books::reserve_book))
        .route("/recommendations", get(books::recommendations))
        // Reservation ledger
        .route("/bookings", get(bookings::list_my_bookings))
        .route("/bookings/:id/return", post(bookings::return_booking))
        // Admin
        .route("/admin/books", get(admin::list_books).post(admin::create_book))
        .route("/admin/books/:id/copies", post(admin::add_copies))
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(middleware::from_fn(localize_errors))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
