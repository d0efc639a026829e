//! Definición del Contexto de Aplicación (Shared State).
//!
//! El `AppContext` actúa como un contenedor de "Inyección de Dependencias" manual,
//! agrupando los recursos que comparten todas las pantallas: configuración, cliente
//! de la API y store de sesión (ya restaurado).


use std::sync::Arc;
use tracing::info;
use crate::access::domain::Transport;
use crate::access::logic::ApiClient;
use crate::access::transport::ReqwestTransport;
use crate::session::logic::SessionStore;
use crate::storage::domain::DurableStorage;
use crate::storage::logic::FileStorage;
use crate::system::domain::System;


#[derive(Clone, Debug)]
pub struct AppContext {
    pub system: Arc<System>,
    pub api: ApiClient,
    pub session: Arc<SessionStore>,
}


impl AppContext {
    /// Contexto de producción: transporte `reqwest` y sesión persistida en
    /// `system.session_store_path`.
    pub fn new(system: System) -> Self {
        let transport = Arc::new(ReqwestTransport::default());
        let storage = Arc::new(FileStorage::new(&system.session_store_path));
        Self::with_parts(system, transport, storage)
    }

    /// Contexto con transporte y almacenamiento inyectados.
    pub fn with_parts(system: System,
                      transport: Arc<dyn Transport>,
                      storage: Arc<dyn DurableStorage>) -> Self {

        let api = ApiClient::new(&system.api_base_url, transport);
        let session = Arc::new(SessionStore::new(api.clone(), storage));

        info!(base_url = %system.api_base_url,
              authenticated = session.is_authenticated(),
              "Info: contexto de aplicación creado");

        Self {
            system: Arc::new(system),
            api,
            session,
        }
    }
}
