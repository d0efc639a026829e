//! Núcleo cliente de la red de empleabilidad.
//!
//! * [`access`]: Capa de Acceso HTTP, la única salida hacia el backend REST.
//! * [`services`]: funciones tipadas por recurso (usuarios, universidades, actividades,
//!   ofertas, becas, candidaturas, perfiles, autenticación).
//! * [`session`]: store de sesión restaurado desde y reflejado en almacenamiento durable.
//! * [`context`]: cableado de todo lo anterior a partir de la configuración de [`system`].

pub mod access;
pub mod config;
pub mod context;
pub mod models;
pub mod services;
pub mod session;
pub mod storage;
pub mod system;

pub use access::domain::{ApiError, Body, FormPart, Method};
pub use access::logic::ApiClient;
pub use context::domain::AppContext;
pub use session::domain::{Identity, Session, SessionError, SessionProvider};
pub use session::logic::SessionStore;
pub use system::domain::{init_tracing, System};
