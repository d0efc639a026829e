//! Cliente genérico de la API REST.
//!
//! [`ApiClient::request`] es el único punto de salida hacia el backend. Construye la
//! URL absoluta, adjunta la credencial, serializa el cuerpo según su variante y
//! normaliza la respuesta en un resultado tipado o un [`ApiError`].


use std::sync::Arc;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};
use crate::config::api::{FALLBACK_ERROR_MESSAGE, JSON_CONTENT_TYPE};
use super::domain::{ApiError, Body, HttpRequest, HttpResponse, Method, Payload, Transport};


#[derive(Deserialize)]
struct ErrorPayload {
    message: Option<String>,
}


#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Emite una petición y decodifica la respuesta como `T`.
    ///
    /// # Comportamiento
    /// * `credential` presente: se agrega `Authorization: Bearer <credential>`.
    /// * `Body::Json`: se serializa con `Content-Type: application/json`.
    /// * `Body::Multipart`: se delega al transporte sin `Content-Type` explícito.
    /// * Respuesta 2xx con cuerpo: `Ok(Some(T))`. Sin cuerpo: `Ok(None)`.
    /// * Respuesta no 2xx: [`ApiError::RequestFailed`] con el campo `message` del
    ///   cuerpo de error, o un mensaje genérico si no se puede leer.
    pub async fn request<T: DeserializeOwned>(&self,
                                              endpoint: &str,
                                              method: Method,
                                              body: Option<Body>,
                                              credential: Option<&str>) -> Result<Option<T>, ApiError> {

        let response = self.round_trip(endpoint, method, body, credential).await?;

        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        serde_json::from_slice(&response.body)
            .map(Some)
            .map_err(|e| ApiError::UnexpectedPayload(e.to_string()))
    }

    /// Igual que [`ApiClient::request`], pero exige que la respuesta tenga cuerpo.
    pub async fn fetch<T: DeserializeOwned>(&self,
                                            endpoint: &str,
                                            method: Method,
                                            body: Option<Body>,
                                            credential: Option<&str>) -> Result<T, ApiError> {
        self.request(endpoint, method, body, credential)
            .await?
            .ok_or(ApiError::EmptyResponse)
    }

    /// Igual que [`ApiClient::request`], descartando el cuerpo de la respuesta.
    pub async fn send(&self,
                      endpoint: &str,
                      method: Method,
                      body: Option<Body>,
                      credential: Option<&str>) -> Result<(), ApiError> {
        self.round_trip(endpoint, method, body, credential)
            .await
            .map(|_| ())
    }

    /// Ejecuta la petición y traduce los estados no 2xx en [`ApiError::RequestFailed`].
    /// El cuerpo de una respuesta exitosa se devuelve sin interpretar.
    async fn round_trip(&self,
                        endpoint: &str,
                        method: Method,
                        body: Option<Body>,
                        credential: Option<&str>) -> Result<HttpResponse, ApiError> {

        let request = self.build_request(endpoint, method, body, credential)?;

        debug!(method = method.as_str(),
               url = %request.url,
               authenticated = credential.is_some(),
               "Debug: enviando petición");

        let response = self.transport.execute(request).await.inspect_err(|e| {
            warn!(method = method.as_str(), endpoint, "Warn: petición fallida: {e}");
        })?;

        if !response.is_success() {
            let error = error_from_response(&response);
            warn!(method = method.as_str(), endpoint, status = response.status, "Warn: {error}");
            return Err(error);
        }

        Ok(response)
    }

    fn build_request(&self,
                     endpoint: &str,
                     method: Method,
                     body: Option<Body>,
                     credential: Option<&str>) -> Result<HttpRequest, ApiError> {

        let mut headers = Vec::new();

        if let Some(token) = credential {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }

        let payload = match body {
            None => Payload::Empty,
            Some(Body::Json(value)) => {
                headers.push(("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string()));
                let bytes = serde_json::to_vec(&value)
                    .map_err(|e| ApiError::InvalidBody(e.to_string()))?;
                Payload::Json(bytes)
            }
            Some(Body::Multipart(parts)) => Payload::Multipart(parts),
        };

        Ok(HttpRequest {
            method,
            url: format!("{}{}", self.base_url, endpoint),
            headers,
            payload,
        })
    }
}


/// Convierte una respuesta de error en [`ApiError::RequestFailed`].
fn error_from_response(response: &HttpResponse) -> ApiError {
    let message = serde_json::from_slice::<ErrorPayload>(&response.body)
        .ok()
        .and_then(|payload| payload.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string());

    ApiError::RequestFailed {
        status: Some(response.status),
        message,
    }
}
