//! Módulos de servicio: una función tipada por operación del backend.
//!
//! Cada función fija ruta, verbo y tipos sobre [`ApiClient`](crate::access::logic::ApiClient).
//! Ninguna captura, recupera ni reintenta errores: fallan exactamente cuando falla
//! la Capa de Acceso.

pub mod activities;
pub mod applications;
pub mod auth;
pub mod offers;
pub mod profiles;
pub mod scholarships;
pub mod universities;
pub mod users;


use serde::Serialize;
use crate::access::domain::{ApiError, Body, FormPart};
use crate::config::api::{MULTIPART_DATA_PART, MULTIPART_IMAGE_PART};
use crate::models::domain::ImageUpload;


/// Cuerpo multipart con una parte JSON `data` y, opcionalmente, una parte `image`.
pub(crate) fn data_with_image<T: Serialize>(data: &T, image: Option<ImageUpload>) -> Result<Body, ApiError> {
    let value = serde_json::to_value(data)
        .map_err(|e| ApiError::InvalidBody(e.to_string()))?;

    let mut parts = vec![FormPart::Json {
        name: MULTIPART_DATA_PART.to_string(),
        value,
    }];

    if let Some(image) = image {
        parts.push(FormPart::File {
            name: MULTIPART_IMAGE_PART.to_string(),
            file_name: image.file_name,
            mime: image.mime,
            bytes: image.bytes,
        });
    }

    Ok(Body::Multipart(parts))
}
