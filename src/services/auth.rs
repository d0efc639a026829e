use crate::access::domain::{ApiError, Body, Method};
use crate::access::logic::ApiClient;
use crate::config::endpoints::SIGN_IN;
use crate::models::domain::{AuthResponse, LoginRequest};


/// Intercambia email y contraseña por un token y la identidad mínima del usuario.
pub async fn sign_in(api: &ApiClient, credentials: &LoginRequest) -> Result<AuthResponse, ApiError> {
    api.fetch(SIGN_IN, Method::Post, Some(Body::json(credentials)?), None).await
}
