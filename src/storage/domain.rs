//! Almacenamiento durable clave/valor del lado cliente.
//!
//! Equivalente al `localStorage` de un navegador: sobrevive a reinicios del proceso,
//! no tiene transacciones y la última escritura gana. La sesión guarda aquí el token
//! y la identidad serializada.


use thiserror::Error;


#[derive(Debug, Error)]
pub enum StorageError {
    #[error("error de E/S en el almacenamiento: {0}")]
    Io(#[from] std::io::Error),

    #[error("contenido del almacenamiento corrupto: {0}")]
    Corrupted(String),

    #[error("no se pudo serializar el almacenamiento: {0}")]
    Serialize(#[from] serde_json::Error),
}


/// Operaciones síncronas sobre el almacenamiento durable.
///
/// Son síncronas para que la restauración de la sesión ocurra antes de que cualquier
/// consumidor obtenga el store.
pub trait DurableStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// Escribe varias entradas. Las implementaciones que puedan hacerlo en una sola
    /// escritura física deben sobrescribir este método.
    fn set_items(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        for (key, value) in entries {
            self.set_item(key, value)?;
        }
        Ok(())
    }

    /// Elimina varias entradas; las ausentes se ignoran.
    fn remove_items(&self, keys: &[&str]) -> Result<(), StorageError> {
        for key in keys {
            self.remove_item(key)?;
        }
        Ok(())
    }
}
