//! Transporte HTTP de producción sobre `reqwest`.
//!
//! Los cuerpos multipart se arman aquí para que `reqwest` fije el `boundary`.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::debug;
use crate::config::api::JSON_CONTENT_TYPE;
use super::domain::{ApiError, FormPart, HttpRequest, HttpResponse, Method, Payload, Transport};


/// Transporte de producción basado en `reqwest`.
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match request.payload {
            Payload::Empty => builder,
            Payload::Json(bytes) => builder.body(bytes),
            Payload::Multipart(parts) => builder.multipart(build_form(parts)?),
        };

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport_error)?;

        debug!(status, bytes = body.len(), "Debug: respuesta recibida");

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}


fn build_form(parts: Vec<FormPart>) -> Result<Form, ApiError> {
    let mut form = Form::new();

    for part in parts {
        form = match part {
            FormPart::Json { name, value } => {
                let text = serde_json::to_string(&value)
                    .map_err(|e| ApiError::InvalidBody(e.to_string()))?;
                let part = Part::text(text)
                    .mime_str(JSON_CONTENT_TYPE)
                    .map_err(|e| ApiError::InvalidBody(e.to_string()))?;
                form.part(name, part)
            }
            FormPart::Text { name, value } => form.text(name, value),
            FormPart::File { name, file_name, mime, bytes } => {
                let part = Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str(&mime)
                    .map_err(|e| ApiError::InvalidBody(e.to_string()))?;
                form.part(name, part)
            }
        };
    }

    Ok(form)
}


fn transport_error(error: reqwest::Error) -> ApiError {
    ApiError::RequestFailed {
        status: error.status().map(|s| s.as_u16()),
        message: error.to_string(),
    }
}
