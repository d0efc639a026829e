//! Tipos de la Capa de Acceso HTTP.
//!
//! Define el contrato uniforme entre el cliente ([`super::logic::ApiClient`]) y el
//! transporte de red: verbos, cuerpos de petición (JSON o multipart), la petición y
//! respuesta ya normalizadas, y la taxonomía de errores que ve todo consumidor.


use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;


/// Verbos HTTP soportados por el backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}


/// Cuerpo de una petición.
///
/// La serialización se decide por la variante, nunca inspeccionando el contenido:
/// * `Json`: se envía serializado con `Content-Type: application/json`.
/// * `Multipart`: se envía como formulario; el transporte fija el `boundary`.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(Value),
    Multipart(Vec<FormPart>),
}

impl Body {
    /// Construye un cuerpo JSON a partir de cualquier tipo serializable.
    pub fn json<T: Serialize + ?Sized>(payload: &T) -> Result<Self, ApiError> {
        serde_json::to_value(payload)
            .map(Body::Json)
            .map_err(|e| ApiError::InvalidBody(e.to_string()))
    }
}


/// Parte individual de un formulario multipart.
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    /// Datos estructurados, enviados como texto JSON con su propio content-type.
    Json { name: String, value: Value },
    Text { name: String, value: String },
    File {
        name: String,
        file_name: String,
        mime: String,
        bytes: Vec<u8>,
    },
}


/// Cuerpo ya preparado para el transporte.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Empty,
    Json(Vec<u8>),
    Multipart(Vec<FormPart>),
}


/// Petición completamente resuelta: URL absoluta, cabeceras y cuerpo.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub payload: Payload,
}

impl HttpRequest {
    /// Devuelve el valor de una cabecera (comparación sin distinguir mayúsculas).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}


/// Respuesta cruda del transporte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}


/// Errores de la Capa de Acceso.
///
/// Toda operación expuesta por el núcleo resuelve con datos tipados o falla con uno
/// de estos errores, siempre con un mensaje legible.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// El viaje de ida y vuelta no se completó o el backend respondió con un estado
    /// de error. `status` es `None` cuando la petición nunca obtuvo respuesta.
    #[error("{message}")]
    RequestFailed { status: Option<u16>, message: String },

    #[error("respuesta inesperada del servidor: {0}")]
    UnexpectedPayload(String),

    #[error("cuerpo de petición inválido: {0}")]
    InvalidBody(String),

    #[error("el servidor no devolvió contenido")]
    EmptyResponse,
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RequestFailed { status, .. } => *status,
            _ => None,
        }
    }
}


/// Abstracción del transporte de red.
///
/// Ejecuta exactamente un viaje de ida y vuelta; no reintenta ni cachea.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}
