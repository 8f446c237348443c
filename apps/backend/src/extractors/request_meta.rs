use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::error::AppError;
use crate::services::outbox::EventContext;
use crate::web::client_ip::client_ip;

/// Who called what, as recorded in the event log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMeta {
    pub method: String,
    pub path: String,
    pub ip_address: String,
}

impl RequestMeta {
    /// Outbox context for a write answered with `status`.
    pub fn event_context(&self, status: StatusCode) -> EventContext {
        EventContext::new(&self.method, &self.path)
            .with_ip(&self.ip_address)
            .with_status(status.as_u16())
    }
}

impl FromRequest for RequestMeta {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(RequestMeta {
            method: req.method().to_string(),
            path: req.path().to_string(),
            ip_address: client_ip(req),
        }))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;

    #[actix_web::test]
    async fn captures_method_path_and_forwarded_ip() {
        let (req, mut payload) = TestRequest::put()
            .uri("/countries/3?x=1")
            .insert_header(("X-Forwarded-For", "198.51.100.4, 10.0.0.2"))
            .to_http_parts();

        let meta = RequestMeta::from_request(&req, &mut payload).await.unwrap();
        assert_eq!(
            meta,
            RequestMeta {
                method: "PUT".to_string(),
                path: "/countries/3".to_string(),
                ip_address: "198.51.100.4".to_string(),
            }
        );
    }

    #[test]
    fn event_context_carries_request_facts() {
        let meta = RequestMeta {
            method: "POST".to_string(),
            path: "/cities/".to_string(),
            ip_address: "203.0.113.7".to_string(),
        };
        let ctx = meta.event_context(StatusCode::CREATED);
        assert_eq!(ctx.method, "POST");
        assert_eq!(ctx.path, "/cities/");
        assert_eq!(ctx.ip_address.as_deref(), Some("203.0.113.7"));
        assert_eq!(ctx.status_code, Some(201));
        assert_eq!(ctx.body, None);
    }
}
