//! Store de Sesión: autoridad única sobre "quién está conectado".
//!
//! # Ciclo de vida
//! 1. `SessionStore::new` arranca en `Anonymous` y restaura de forma síncrona desde el
//!    almacenamiento durable, antes de que nadie pueda leer el estado.
//! 2. `login` autentica contra `/auth/signin`, persiste token e identidad en un solo
//!    lote y recién entonces publica el nuevo estado.
//! 3. `logout` borra memoria y almacenamiento; nunca falla.
//!
//! El estado vive en un canal `watch`: los consumidores leen una instantánea o se
//! suscriben a los cambios. Ningún lock se mantiene a través de un `.await`.


use std::sync::Arc;
use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{error, info, instrument, warn};
use crate::access::logic::ApiClient;
use crate::config::storage::{TOKEN_KEY, USER_KEY};
use crate::models::domain::{LoginRequest, Role};
use crate::services::auth::sign_in;
use crate::storage::domain::{DurableStorage, StorageError};
use super::domain::{Identity, RestoreOutcome, Session, SessionError, SessionProvider};


pub struct SessionStore {
    api: ApiClient,
    storage: Arc<dyn DurableStorage>,
    state: watch::Sender<Session>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("api", &self.api)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Crea el store y restaura la sesión persistida, si existe.
    pub fn new(api: ApiClient, storage: Arc<dyn DurableStorage>) -> Self {
        let (state, _) = watch::channel(Session::Anonymous);
        let store = Self { api, storage, state };
        store.restore();
        store
    }

    /// Vuelve a leer el almacenamiento durable y reemplaza el estado en memoria.
    ///
    /// Un registro persistido inválido no produce error: se borran ambas entradas y
    /// la sesión queda `Anonymous`.
    pub fn restore(&self) -> Session {
        let session = match self.read_persisted() {
            RestoreOutcome::Empty => Session::Anonymous,
            RestoreOutcome::Restored(session) => {
                if let Some(identity) = session.identity() {
                    info!(user_id = identity.id, role = %identity.role, "Info: sesión restaurada");
                }
                session
            }
            RestoreOutcome::Corrupted(reason) => {
                warn!("Warn: sesión persistida corrupta, se descarta: {reason}");
                self.erase_persisted();
                Session::Anonymous
            }
        };

        self.state.send_replace(session.clone());
        session
    }

    fn read_persisted(&self) -> RestoreOutcome {
        let token = match self.storage.get_item(TOKEN_KEY) {
            Ok(token) => token,
            Err(e) => return RestoreOutcome::Corrupted(e.to_string()),
        };
        let user = match self.storage.get_item(USER_KEY) {
            Ok(user) => user,
            Err(e) => return RestoreOutcome::Corrupted(e.to_string()),
        };

        match (token, user) {
            (None, None) => RestoreOutcome::Empty,
            (Some(_), None) => RestoreOutcome::Corrupted("token sin identidad".to_string()),
            (None, Some(_)) => RestoreOutcome::Corrupted("identidad sin token".to_string()),
            (Some(credential), Some(_)) if credential.trim().is_empty() => {
                RestoreOutcome::Corrupted("token vacío".to_string())
            }
            (Some(credential), Some(user)) => match serde_json::from_str::<Identity>(&user) {
                Ok(identity) => RestoreOutcome::Restored(Session::Authenticated { credential, identity }),
                Err(e) => RestoreOutcome::Corrupted(format!("identidad ilegible: {e}")),
            },
        }
    }

    fn erase_persisted(&self) {
        if let Err(e) = self.storage.remove_items(&[TOKEN_KEY, USER_KEY]) {
            warn!("Warn: no se pudo borrar la sesión persistida: {e}");
        }
    }

    /// Vuelve a alinear el almacenamiento con la sesión en memoria tras una escritura
    /// fallida. Si la sesión anterior no puede reescribirse, ambos lados quedan en
    /// `Anonymous`.
    fn rollback_persisted(&self) {
        let previous = self.snapshot();

        let rewritten = match &previous {
            Session::Anonymous => false,
            Session::Authenticated { credential, identity } => serde_json::to_string(identity)
                .map_err(StorageError::from)
                .and_then(|user| {
                    self.storage.set_items(&[(TOKEN_KEY, credential.as_str()), (USER_KEY, user.as_str())])
                })
                .inspect_err(|e| warn!("Warn: no se pudo reescribir la sesión anterior: {e}"))
                .is_ok(),
        };

        if !rewritten {
            self.erase_persisted();
            if previous.is_authenticated() {
                self.state.send_replace(Session::Anonymous);
                warn!("Warn: sesión anterior descartada por fallo de almacenamiento");
            }
        }
    }

    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    pub fn credential(&self) -> Option<String> {
        self.state.borrow().credential().map(str::to_string)
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state.borrow().identity().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Inicia sesión con email y contraseña.
    ///
    /// # Errores
    /// * [`SessionError::AuthenticationFailed`] con el error del backend sin modificar.
    /// * [`SessionError::Storage`] si no se pudo persistir. Se conserva la sesión
    ///   anterior en memoria y en almacenamiento; si tampoco puede reescribirse, ambos
    ///   quedan en `Anonymous`.
    #[instrument(name = "session_login", skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &LoginRequest) -> Result<Identity, SessionError> {

        let response = sign_in(&self.api, credentials).await.map_err(|e| {
            warn!("Warn: inicio de sesión rechazado: {e}");
            SessionError::AuthenticationFailed(e)
        })?;

        let identity = Identity::from(&response);
        let user_json = serde_json::to_string(&identity)
            .map_err(|e| SessionError::Storage(e.into()))?;

        if let Err(e) = self.storage.set_items(&[(TOKEN_KEY, response.token.as_str()), (USER_KEY, user_json.as_str())]) {
            error!("Error: no se pudo persistir la sesión: {e}");
            self.rollback_persisted();
            return Err(e.into());
        }

        self.state.send_replace(Session::Authenticated {
            credential: response.token,
            identity: identity.clone(),
        });

        info!(user_id = identity.id, role = %identity.role, "Info: sesión iniciada");
        Ok(identity)
    }

    /// Cierra la sesión. Borra memoria y almacenamiento aunque ya estuvieran vacíos.
    pub fn logout(&self) {
        self.erase_persisted();
        self.state.send_replace(Session::Anonymous);
        info!("Info: sesión cerrada");
    }
}

#[async_trait]
impl SessionProvider for SessionStore {
    fn snapshot(&self) -> Session {
        SessionStore::snapshot(self)
    }

    fn subscribe(&self) -> watch::Receiver<Session> {
        SessionStore::subscribe(self)
    }

    async fn login(&self, credentials: &LoginRequest) -> Result<Identity, SessionError> {
        SessionStore::login(self, credentials).await
    }

    fn logout(&self) {
        SessionStore::logout(self)
    }
}


/// Devuelve el token de la sesión si la identidad tiene alguno de los roles dados.
///
/// Es la comprobación que hacen las pantallas de administración antes de llamar a
/// un servicio protegido.
pub fn authorize(session: &dyn SessionProvider, allowed: &[Role]) -> Result<String, SessionError> {
    match session.snapshot() {
        Session::Anonymous => Err(SessionError::NotAuthenticated),
        Session::Authenticated { credential, identity } => {
            if identity.has_any_role(allowed) {
                Ok(credential)
            } else {
                Err(SessionError::Forbidden(identity.role))
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::testing::FakeTransport;
    use crate::access::domain::{ApiError, HttpRequest, HttpResponse, Transport};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;
    use crate::storage::logic::MemoryStorage;
    use serde_json::{json, Value};

    fn api(transport: &Arc<FakeTransport>) -> ApiClient {
        ApiClient::new("http://backend.test", transport.clone())
    }

    fn guest_response(transport: &FakeTransport) {
        transport.respond_json(200, json!({
            "token": "abc123", "id": 7, "email": "guest@example.com", "role": "ETUDIANT"
        }));
    }

    fn guest_identity() -> Identity {
        Identity { id: 7, email: "guest@example.com".into(), role: Role::Etudiant }
    }

    #[tokio::test]
    async fn login_authenticates_and_persists() {
        let transport = FakeTransport::new();
        guest_response(&transport);
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(api(&transport), storage.clone());
        assert!(!store.is_authenticated());

        let identity = store.login(&LoginRequest::new("guest@example.com", "x")).await.unwrap();

        assert_eq!(identity, guest_identity());
        assert!(store.is_authenticated());
        assert_eq!(store.credential().as_deref(), Some("abc123"));
        assert_eq!(storage.get_item(TOKEN_KEY).unwrap().as_deref(), Some("abc123"));
        let user: Value = serde_json::from_str(&storage.get_item(USER_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(user, json!({"id": 7, "email": "guest@example.com", "role": "ETUDIANT"}));
    }

    #[tokio::test]
    async fn logout_clears_memory_and_storage() {
        let transport = FakeTransport::new();
        guest_response(&transport);
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(api(&transport), storage.clone());
        store.login(&LoginRequest::new("guest@example.com", "x")).await.unwrap();

        store.logout();

        assert_eq!(store.snapshot(), Session::Anonymous);
        assert!(store.credential().is_none());
        assert!(store.identity().is_none());
        assert!(storage.is_empty());

        // Idempotente.
        store.logout();
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn failed_login_keeps_anonymous_and_returns_backend_message() {
        let transport = FakeTransport::new();
        transport.respond_json(401, json!({"message": "Mot de passe incorrect"}));
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(api(&transport), storage.clone());

        let err = store.login(&LoginRequest::new("guest@example.com", "bad")).await.unwrap_err();

        assert!(matches!(err, SessionError::AuthenticationFailed(_)));
        assert_eq!(err.to_string(), "Mot de passe incorrect");
        assert!(!store.is_authenticated());
        assert!(storage.is_empty());
    }

    #[test]
    fn restart_restores_persisted_session() {
        let transport = FakeTransport::new();
        let storage = Arc::new(MemoryStorage::with_entries(&[
            (TOKEN_KEY, "abc123"),
            (USER_KEY, r#"{"id":7,"email":"guest@example.com","role":"ETUDIANT"}"#),
        ]));

        let store = SessionStore::new(api(&transport), storage);

        assert!(store.is_authenticated());
        assert_eq!(store.credential().as_deref(), Some("abc123"));
        assert_eq!(store.identity(), Some(guest_identity()));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn login_then_restart_round_trips() {
        let transport = FakeTransport::new();
        guest_response(&transport);
        let storage = Arc::new(MemoryStorage::new());
        let first = SessionStore::new(api(&transport), storage.clone());
        first.login(&LoginRequest::new("guest@example.com", "x")).await.unwrap();

        let second = SessionStore::new(api(&transport), storage);

        assert_eq!(second.snapshot(), first.snapshot());
    }

    #[test]
    fn corrupted_identity_resets_to_anonymous() {
        let transport = FakeTransport::new();
        let storage = Arc::new(MemoryStorage::with_entries(&[
            (TOKEN_KEY, "abc123"),
            (USER_KEY, "{not-json"),
        ]));

        let store = SessionStore::new(api(&transport), storage.clone());

        assert_eq!(store.snapshot(), Session::Anonymous);
        assert!(storage.is_empty());
    }

    #[test]
    fn half_persisted_session_is_discarded() {
        let transport = FakeTransport::new();

        let only_token = Arc::new(MemoryStorage::with_entries(&[(TOKEN_KEY, "abc123")]));
        let store = SessionStore::new(api(&transport), only_token.clone());
        assert!(!store.is_authenticated());
        assert!(only_token.is_empty());

        let wrong_shape = Arc::new(MemoryStorage::with_entries(&[
            (TOKEN_KEY, "abc123"),
            (USER_KEY, r#"{"id":"seven","email":"guest@example.com"}"#),
        ]));
        let store = SessionStore::new(api(&transport), wrong_shape.clone());
        assert!(!store.is_authenticated());
        assert!(wrong_shape.is_empty());
    }

    /// Almacenamiento en memoria cuyas próximas `n` escrituras fallan.
    struct FlakyStorage {
        inner: MemoryStorage,
        failures: AtomicUsize,
    }

    impl FlakyStorage {
        fn new(inner: MemoryStorage) -> Self {
            Self { inner, failures: AtomicUsize::new(0) }
        }

        fn fail_next_writes(&self, n: usize) {
            self.failures.store(n, Ordering::SeqCst);
        }
    }

    impl DurableStorage for FlakyStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            let pending = self.failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if pending {
                return Err(StorageError::Io(std::io::Error::other("disco lleno")));
            }
            self.inner.set_item(key, value)
        }

        fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove_item(key)
        }
    }

    fn seeded_student() -> MemoryStorage {
        MemoryStorage::with_entries(&[
            (TOKEN_KEY, "abc123"),
            (USER_KEY, r#"{"id":7,"email":"guest@example.com","role":"ETUDIANT"}"#),
        ])
    }

    fn admin_response(transport: &FakeTransport) {
        transport.respond_json(200, json!({
            "token": "new456", "id": 1, "email": "admin@example.com", "role": "ADMIN"
        }));
    }

    #[tokio::test]
    async fn storage_failure_leaves_state_untouched() {
        let transport = FakeTransport::new();
        guest_response(&transport);
        let storage = Arc::new(FlakyStorage::new(MemoryStorage::new()));
        storage.fail_next_writes(usize::MAX);
        let store = SessionStore::new(api(&transport), storage.clone());

        let err = store.login(&LoginRequest::new("guest@example.com", "x")).await.unwrap_err();

        assert!(matches!(err, SessionError::Storage(_)));
        assert_eq!(store.snapshot(), Session::Anonymous);
        assert!(storage.inner.is_empty());
    }

    #[tokio::test]
    async fn failed_relogin_write_keeps_previous_session_persisted() {
        let transport = FakeTransport::new();
        admin_response(&transport);
        let storage = Arc::new(FlakyStorage::new(seeded_student()));
        let store = SessionStore::new(api(&transport), storage.clone());
        assert_eq!(store.credential().as_deref(), Some("abc123"));

        storage.fail_next_writes(1);
        let err = store.login(&LoginRequest::new("admin@example.com", "x")).await.unwrap_err();

        assert!(matches!(err, SessionError::Storage(_)));
        assert_eq!(store.credential().as_deref(), Some("abc123"));
        assert_eq!(storage.get_item(TOKEN_KEY).unwrap().as_deref(), Some("abc123"));

        let restarted = SessionStore::new(api(&transport), storage);
        assert_eq!(restarted.snapshot(), store.snapshot());
    }

    #[tokio::test]
    async fn unrecoverable_relogin_write_logs_out_on_both_sides() {
        let transport = FakeTransport::new();
        admin_response(&transport);
        let storage = Arc::new(FlakyStorage::new(seeded_student()));
        let store = SessionStore::new(api(&transport), storage.clone());

        storage.fail_next_writes(usize::MAX);
        store.login(&LoginRequest::new("admin@example.com", "x")).await.unwrap_err();

        assert_eq!(store.snapshot(), Session::Anonymous);
        assert!(storage.inner.is_empty());
    }

    /// Transporte que se detiene hasta que el test lo libera.
    struct GatedTransport {
        entered: Notify,
        release: Notify,
        inner: Arc<FakeTransport>,
    }

    #[async_trait]
    impl Transport for GatedTransport {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.entered.notify_one();
            self.release.notified().await;
            self.inner.execute(request).await
        }
    }

    #[tokio::test]
    async fn readers_see_previous_state_while_login_is_pending() {
        let fake = FakeTransport::new();
        admin_response(&fake);
        let gated = Arc::new(GatedTransport { entered: Notify::new(), release: Notify::new(), inner: fake });
        let storage = Arc::new(seeded_student());
        let store = Arc::new(SessionStore::new(
            ApiClient::new("http://backend.test", gated.clone()),
            storage.clone(),
        ));

        let pending = tokio::spawn({
            let store = store.clone();
            async move { store.login(&LoginRequest::new("admin@example.com", "x")).await }
        });

        gated.entered.notified().await;
        assert_eq!(store.credential().as_deref(), Some("abc123"));
        assert_eq!(store.identity(), Some(guest_identity()));
        assert_eq!(storage.get_item(TOKEN_KEY).unwrap().as_deref(), Some("abc123"));

        gated.release.notify_one();
        let identity = pending.await.unwrap().unwrap();

        assert_eq!(identity.role, Role::Admin);
        assert_eq!(store.credential().as_deref(), Some("new456"));
    }

    #[tokio::test]
    async fn subscribers_observe_transitions() {
        let transport = FakeTransport::new();
        guest_response(&transport);
        let store = SessionStore::new(api(&transport), Arc::new(MemoryStorage::new()));
        let mut rx = store.subscribe();

        store.login(&LoginRequest::new("guest@example.com", "x")).await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_authenticated());

        store.logout();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), Session::Anonymous);
    }

    #[test]
    fn authorize_checks_session_and_role() {
        let transport = FakeTransport::new();
        let anonymous = SessionStore::new(api(&transport), Arc::new(MemoryStorage::new()));
        assert!(matches!(authorize(&anonymous, &[Role::Admin]), Err(SessionError::NotAuthenticated)));

        let student = SessionStore::new(api(&transport), Arc::new(MemoryStorage::with_entries(&[
            (TOKEN_KEY, "abc123"),
            (USER_KEY, r#"{"id":7,"email":"guest@example.com","role":"ETUDIANT"}"#),
        ])));
        assert!(matches!(
            authorize(&student, &[Role::Admin]),
            Err(SessionError::Forbidden(Role::Etudiant))
        ));
        assert_eq!(authorize(&student, &[Role::Etudiant, Role::Admin]).unwrap(), "abc123");
    }
}
