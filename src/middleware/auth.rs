use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

/// Claims issued by the identity subsystem. Tokens are consumed here, never
/// minted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub admin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email_verified: bool,
    pub admin: bool,
}

/// The requesting user, if any. Public routes carry this in request
/// extensions; an invalid or expired token degrades to anonymous.
#[derive(Debug, Clone, Default)]
pub struct Identity(pub Option<AuthUser>);

fn decode_bearer(req: &Request) -> Option<AuthUser> {
    let auth_header = req.headers().get(axum::http::header::AUTHORIZATION)?;
    let auth_str = auth_header.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?;

    let config = crate::config::get_config();
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .ok()?;

    let id = Uuid::parse_str(&data.claims.sub).ok()?;
    Some(AuthUser {
        id,
        email_verified: data.claims.email_verified,
        admin: data.claims.admin,
    })
}

pub async fn attach_identity(mut req: Request, next: Next) -> Response {
    let identity = Identity(decode_bearer(&req));
    req.extensions_mut().insert(identity);
    next.run(req).await
}

pub async fn require_admin(mut req: Request, next: Next) -> Response {
    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"unauthorized","message":"missing authorization header"})),
        )
            .into_response();
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"unauthorized","message":"malformed authorization header"})),
        )
            .into_response();
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"unauthorized","message":"unsupported authorization scheme"})),
        )
            .into_response();
    };

    let config = crate::config::get_config();
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    match decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    ) {
        Ok(data) => {
            if !data.claims.admin {
                return (
                    StatusCode::FORBIDDEN,
                    Json(json!({"error":"forbidden","message":"admin privileges required"})),
                )
                    .into_response();
            }
            let Ok(id) = Uuid::parse_str(&data.claims.sub) else {
                return (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"error":"unauthorized","message":"invalid subject claim"})),
                )
                    .into_response();
            };
            let user = AuthUser {
                id,
                email_verified: data.claims.email_verified,
                admin: true,
            };
            req.extensions_mut().insert(Identity(Some(user.clone())));
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(_) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"unauthorized","message":"invalid token"})),
        )
            .into_response(),
    }
}
