use actix_web::{
    Error, HttpResponse, ResponseError,
    body::{BoxBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    http::{
        Method, StatusCode,
        header::{
            ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
            ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, HeaderMap, HeaderValue,
        },
    },
    middleware::Next,
    web::Data,
};
use futures::future::LocalBoxFuture;

use crate::{config::Config, error::ApiError};

/// CORS headers advertised by one endpoint shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorsPolicy {
    pub methods: &'static str,
    pub headers: &'static str,
    pub credentials: bool,
}

impl CorsPolicy {
    pub const COLLECTION: CorsPolicy = CorsPolicy {
        methods: "GET, POST, OPTIONS",
        headers: "Content-Type, Authorization",
        credentials: false,
    };

    pub const ITEM: CorsPolicy = CorsPolicy {
        methods: "GET, PUT, DELETE, OPTIONS",
        headers: "Content-Type, Authorization",
        credentials: false,
    };

    pub const REPORT: CorsPolicy = CorsPolicy {
        methods: "POST, OPTIONS",
        headers: "Content-Type, Authorization",
        credentials: false,
    };

    pub const LOGIN: CorsPolicy = CorsPolicy {
        methods: "POST, OPTIONS",
        headers: "Content-Type",
        credentials: true,
    };

    fn decorate(&self, headers: &mut HeaderMap, origin: &str) {
        if let Ok(origin) = HeaderValue::from_str(origin) {
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        }
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(self.methods),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(self.headers),
        );
        if self.credentials {
            headers.insert(
                ACCESS_CONTROL_ALLOW_CREDENTIALS,
                HeaderValue::from_static("true"),
            );
        }
    }
}

/// Answers preflight requests directly and stamps CORS headers on every
/// other response, including auth and rate-limit rejections from inner
/// middleware. Rate-limit rejections are rendered as the JSON error body.
pub async fn cors_middleware<B>(
    policy: CorsPolicy,
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<BoxBody>, Error>
where
    B: MessageBody + 'static,
{
    let origin = req
        .app_data::<Data<Config>>()
        .map(|c| c.frontend_url.clone())
        .unwrap_or_else(|| "*".to_string());

    if req.method() == Method::OPTIONS {
        let mut resp = HttpResponse::Ok().finish();
        policy.decorate(resp.headers_mut(), &origin);
        return Ok(req.into_response(resp));
    }

    let http_req = req.request().clone();
    let mut resp = match next.call(req).await {
        Ok(resp) if resp.status() == StatusCode::TOO_MANY_REQUESTS => {
            resp.into_response(ApiError::TooManyRequests.error_response())
        }
        Ok(resp) => resp.map_into_boxed_body(),
        // Inner middleware may reject with an error instead of a response;
        // render it here so it still leaves with CORS headers.
        Err(err) => {
            let status = err.as_response_error().status_code();
            let rendered = if status == StatusCode::TOO_MANY_REQUESTS {
                ApiError::TooManyRequests.error_response()
            } else {
                err.error_response()
            };
            ServiceResponse::new(http_req, rendered)
        }
    };

    policy.decorate(resp.headers_mut(), &origin);
    Ok(resp)
}

/// Binds a policy so the middleware can be handed to `from_fn`.
pub fn layer<B>(
    policy: CorsPolicy,
) -> impl Fn(ServiceRequest, Next<B>) -> LocalBoxFuture<'static, Result<ServiceResponse<BoxBody>, Error>>
+ Clone
+ 'static
where
    B: MessageBody + 'static,
{
    move |req, next| Box::pin(cors_middleware(policy, req, next))
}
