use std::future::{Ready, ready};

use actix_web::{Error, FromRequest, HttpRequest, dev::Payload, http::header, web};

use crate::jwt::JwtService;
use crate::types::Identity;

/// The verified caller of a request, if any.
///
/// Resolving never fails: a missing or invalid token yields `Caller(None)` and the
/// handler decides how to answer. The [`JwtService`] must be registered as app data.
#[derive(Debug, Clone)]
pub struct Caller(pub Option<Identity>);

impl Caller {
    /// Returns the identity, if the request carried a valid token.
    pub fn identity(&self) -> Option<&Identity> {
        self.0.as_ref()
    }
}

impl FromRequest for Caller {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let Some(jwt_service) = req.app_data::<web::Data<JwtService>>() else {
            log::error!("JwtService is not registered as app data");
            return ready(Err(actix_web::error::ErrorInternalServerError(
                "Authentication is not configured",
            )));
        };

        let authorization = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        ready(Ok(Caller(jwt_service.verify_user(authorization))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_caller_resolves_identity_from_header() {
        let jwt = JwtService::new("secret");
        let identity = Identity::new("u1", Role::Escort);
        let token = jwt
            .issue_token(&identity, chrono::Duration::minutes(5))
            .unwrap();

        let req = TestRequest::default()
            .app_data(web::Data::new(jwt))
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_http_request();

        let caller = Caller::extract(&req).await.unwrap();
        assert_eq!(caller.identity(), Some(&identity));
    }

    #[actix_web::test]
    async fn test_caller_without_token_is_anonymous() {
        let req = TestRequest::default()
            .app_data(web::Data::new(JwtService::new("secret")))
            .to_http_request();

        let caller = Caller::extract(&req).await.unwrap();
        assert!(caller.identity().is_none());
    }

    #[actix_web::test]
    async fn test_caller_requires_registered_verifier() {
        let req = TestRequest::default().to_http_request();
        assert!(Caller::extract(&req).await.is_err());
    }
}
