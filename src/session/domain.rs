//! Dominio de Sesión.
//!
//! Una sesión es `Anonymous` o `Authenticated { credential, identity }`. El tipo hace
//! imposible representar en memoria un token sin identidad o viceversa.


use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;
use crate::access::domain::ApiError;
use crate::models::domain::{AuthResponse, LoginRequest, Role};
use crate::storage::domain::StorageError;


/// Registro mínimo del usuario conectado, tal como se persiste: `{id, email, role}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

impl Identity {
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }
}

impl From<&AuthResponse> for Identity {
    fn from(response: &AuthResponse) -> Self {
        Self {
            id: response.id,
            email: response.email.clone(),
            role: response.role,
        }
    }
}


#[derive(Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated {
        credential: String,
        identity: Identity,
    },
}

impl Session {
    pub fn credential(&self) -> Option<&str> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated { credential, .. } => Some(credential),
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated { identity, .. } => Some(identity),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Session::Anonymous => f.write_str("Anonymous"),
            Session::Authenticated { identity, .. } => f
                .debug_struct("Authenticated")
                .field("credential", &"***")
                .field("identity", identity)
                .finish(),
        }
    }
}


/// Resultado interno de leer la sesión persistida.
#[derive(Debug, PartialEq)]
pub(crate) enum RestoreOutcome {
    /// No había nada guardado.
    Empty,
    Restored(Session),
    /// Entradas inconsistentes o ilegibles; deben borrarse.
    Corrupted(String),
}


#[derive(Debug, Error)]
pub enum SessionError {
    /// El backend rechazó el inicio de sesión; el mensaje es el del backend.
    #[error(transparent)]
    AuthenticationFailed(ApiError),

    #[error("no se pudo guardar la sesión: {0}")]
    Storage(#[from] StorageError),

    #[error("no hay una sesión activa")]
    NotAuthenticated,

    #[error("el rol {0} no tiene acceso a esta acción")]
    Forbidden(Role),
}


/// Interfaz que consumen las páginas: lectura del estado y sus dos mutadores.
///
/// [`super::logic::SessionStore`] es la implementación real; los tests pueden
/// sustituirla por un fake en memoria.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    fn snapshot(&self) -> Session;

    fn subscribe(&self) -> watch::Receiver<Session>;

    async fn login(&self, credentials: &LoginRequest) -> Result<Identity, SessionError>;

    fn logout(&self);

    fn credential(&self) -> Option<String> {
        self.snapshot().credential().map(str::to_string)
    }

    fn identity(&self) -> Option<Identity> {
        self.snapshot().identity().cloned()
    }

    fn is_authenticated(&self) -> bool {
        self.snapshot().is_authenticated()
    }
}
