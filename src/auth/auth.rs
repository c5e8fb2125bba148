use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use futures::future::{Ready, ready};

use crate::{error::ApiError, models::Claims};

/// Identity of the admin behind a verified bearer token.
///
/// Populated by `auth_middleware`; extracting it on a route without the
/// middleware yields `Unauthorized`.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub admin_id: u64,
    pub email: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        AuthUser {
            admin_id: claims.id,
            email: claims.email,
        }
    }
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthUser>()
                .cloned()
                .ok_or(ApiError::Unauthorized),
        )
    }
}
