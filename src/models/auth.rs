//! Session extraction for [`AuthenticatedUser`].

pub use crate::domain::auth::AuthenticatedUser;

#[cfg(feature = "server")]
mod extract {
    use std::future::Future;
    use std::pin::Pin;

    use actix_identity::Identity;
    use actix_web::dev::Payload;
    use actix_web::error::ErrorUnauthorized;
    use actix_web::{FromRequest, HttpRequest};

    use super::AuthenticatedUser;

    /// The identity cookie stores the JSON-serialized claims issued by the
    /// external auth service at login. Expired or malformed sessions are
    /// rejected, which also clears `Option<AuthenticatedUser>` extractors
    /// down to `None`.
    impl FromRequest for AuthenticatedUser {
        type Error = actix_web::Error;
        type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

        fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
            let identity = Identity::from_request(req, payload);
            Box::pin(async move {
                let identity = identity.await?;
                let claims = identity
                    .id()
                    .map_err(|_| ErrorUnauthorized("no session identity"))?;
                let user: AuthenticatedUser = serde_json::from_str(&claims)
                    .map_err(|_| ErrorUnauthorized("malformed session identity"))?;
                if user.exp != 0 && user.exp < chrono::Utc::now().timestamp() {
                    return Err(ErrorUnauthorized("session expired"));
                }
                Ok(user)
            })
        }
    }
}
