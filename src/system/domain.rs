//! Módulo de configuración central y gestión del entorno de ejecución.
//!
//! Este módulo actúa como la fuente única de verdad para la configuración del cliente.
//! Se encarga de leer las variables de entorno, establecer valores por defecto seguros
//! y proveer lo necesario para iniciar los subsistemas (Acceso HTTP, Sesión, Logging).
//!
//! # Funcionalidades Principales
//! * **Carga de Configuración:** Lee de `.env` en desarrollo y variables de sistema en producción.
//! * **Observabilidad:** Configura `tracing_subscriber` para logs estructurados o legibles.
//!


use std::env;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use crate::config::api::DEFAULT_BASE_URL;
use crate::config::storage::DEFAULT_STORE_PATH;


/// Representa la configuración global del cliente y el estado del entorno.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct System {
    /// URL base del backend REST (ej. `https://api.example.com`), sin `/` final.
    /// Por defecto: `http://localhost:8080`.
    pub api_base_url: String,

    /// Archivo donde se persisten el token y la identidad de la sesión.
    /// Por defecto: `.session.json`.
    pub session_store_path: String,

    /// Entorno de ejecución actual (`development`, `staging`, `production`).
    /// Afecta el formato de logs y la carga de archivos `.env`.
    pub environment: String,

    /// Nivel de detalle de los logs (ej. `info`, `debug`, `warn`).
    /// Se autoconfigura según el `environment` si no se especifica.
    pub rust_log: String,
}


/// Errores de configuración detectados al construir [`System`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("API_BASE_URL debe comenzar con http:// o https:// (recibido: {0})")]
    InvalidBaseUrl(String),
}


impl System {

    /// Carga la configuración desde las variables de entorno.
    ///
    /// # Comportamiento
    /// * Si `ENVIRONMENT` es "development" (o no existe), intenta cargar un archivo `.env`.
    /// * Establece valores por defecto para todas las variables.
    ///
    /// # Errores
    /// * [`ConfigError::InvalidBaseUrl`] si `API_BASE_URL` no es una URL http(s).
    pub fn new() -> Result<Self, ConfigError> {

        info!("Info: creando objeto system");

        let environment = env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "development".into());

        if environment == "development" {
            dotenv::dotenv().ok();
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construye la configuración a partir de una función de búsqueda arbitraria.
    ///
    /// `new` la usa con el entorno del proceso; los tests con un mapa en memoria.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .unwrap_or_else(|| "development".to_string());

        let raw_url = lookup("API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        if !(raw_url.starts_with("http://") || raw_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(raw_url));
        }

        Ok(System {
            api_base_url: raw_url.trim_end_matches('/').to_string(),

            session_store_path: lookup("SESSION_STORE_PATH")
                .unwrap_or_else(|| DEFAULT_STORE_PATH.to_string()),

            rust_log: lookup("RUST_LOG")
                .unwrap_or_else(|| {
                    match environment.as_str() {
                        "development" => "debug".to_string(),
                        "staging" => "info".to_string(),
                        _ => "warn".to_string(),
                    }
                }),

            environment,
        })
    }
}


/// Inicializa el sistema de trazabilidad y logs (Tracing).
///
/// Configura el formato de salida basándose en el entorno:
/// * **Production**: Salida JSON (para logs estructurados en la nube).
/// * **Development/Otros**: Salida "Pretty" (colores y formato legible).
///
/// Si ya existe un subscriber global (por ejemplo, instalado por la aplicación
/// anfitriona), no hace nada.
pub fn init_tracing(system: &System) {

    let filter = EnvFilter::try_new(&system.rust_log)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = fmt().with_env_filter(filter).with_target(false);

    let result = if system.environment == "production" {
        builder.json().try_init()
    } else {
        builder.pretty().try_init()
    };

    if result.is_err() {
        info!("Info: tracing ya estaba inicializado");
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let system = System::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(system.api_base_url, "http://localhost:8080");
        assert_eq!(system.session_store_path, ".session.json");
        assert_eq!(system.environment, "development");
        assert_eq!(system.rust_log, "debug");
    }

    #[test]
    fn log_level_follows_environment() {
        let staging = System::from_lookup(lookup_from(&[("ENVIRONMENT", "staging")])).unwrap();
        assert_eq!(staging.rust_log, "info");

        let prod = System::from_lookup(lookup_from(&[("ENVIRONMENT", "production")])).unwrap();
        assert_eq!(prod.rust_log, "warn");

        let explicit = System::from_lookup(lookup_from(&[
            ("ENVIRONMENT", "production"),
            ("RUST_LOG", "trace"),
        ]))
        .unwrap();
        assert_eq!(explicit.rust_log, "trace");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let system = System::from_lookup(lookup_from(&[
            ("API_BASE_URL", "https://api.example.com/v1/"),
        ]))
        .unwrap();
        assert_eq!(system.api_base_url, "https://api.example.com/v1");
    }

    #[test]
    fn rejects_non_http_base_url() {
        let err = System::from_lookup(lookup_from(&[("API_BASE_URL", "localhost:8080")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidBaseUrl("localhost:8080".to_string()));
    }
}
