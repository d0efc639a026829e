//! Modelos de datos intercambiados con el backend.
//!
//! El núcleo no valida ni transforma estos registros: se reciben y se devuelven tal
//! cual. Cada registro conserva los campos que no conoce en `extra`, de modo que
//! volver a serializarlo produce los mismos campos que envió el backend.
//!
//! Todos los campos viajan en camelCase. Algunos contratos antiguos usaban
//! snake_case (`type_activite`, `date_debut`...); esas formas se aceptan como alias
//! al deserializar y nunca se emiten.


use std::fmt;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};


/// Tipo de cuenta. Determina qué páginas y acciones están permitidas.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Miembro de la red (estudiante o egresado).
    Etudiant,
    /// Representante de una universidad asociada.
    Universite,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Etudiant => "ETUDIANT",
            Role::Universite => "UNIVERSITE",
            Role::Admin => "ADMIN",
        };
        f.write_str(name)
    }
}


/// Credenciales de inicio de sesión.
#[derive(Clone, Serialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}


/// Respuesta de `/auth/signin`.
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct AuthResponse {
    pub token: String,
    pub id: i64,
    pub email: String,
    pub role: Role,
}

impl fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthResponse")
            .field("token", &"***")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish()
    }
}


#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prenom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Solo se envía al crear o cambiar la contraseña; el backend nunca la devuelve.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}


/// Universidad asociada.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct University {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub nom: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pays: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ville: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_web: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}


/// Actividad publicada (evento, taller, formación...).
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub titre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(alias = "type_activite", skip_serializing_if = "Option::is_none")]
    pub type_activite: Option<String>,
    #[serde(alias = "date_debut", skip_serializing_if = "Option::is_none")]
    pub date_debut: Option<String>,
    #[serde(alias = "date_fin", skip_serializing_if = "Option::is_none")]
    pub date_fin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lieu: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}


/// Oferta de empleo.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobOffer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub titre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entreprise: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub localisation: Option<String>,
    #[serde(alias = "type_contrat", skip_serializing_if = "Option::is_none")]
    pub type_contrat: Option<String>,
    #[serde(alias = "date_publication", skip_serializing_if = "Option::is_none")]
    pub date_publication: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}


/// Beca.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Scholarship {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub titre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub montant: Option<f64>,
    #[serde(alias = "date_limite", skip_serializing_if = "Option::is_none")]
    pub date_limite: Option<String>,
    #[serde(alias = "universite_id", skip_serializing_if = "Option::is_none")]
    pub universite_id: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}


/// Candidatura de un miembro a una beca u oferta.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(alias = "user_id", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(alias = "bourse_id", skip_serializing_if = "Option::is_none")]
    pub bourse_id: Option<i64>,
    #[serde(alias = "offre_id", skip_serializing_if = "Option::is_none")]
    pub offre_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statut: Option<String>,
    #[serde(alias = "date_candidature", skip_serializing_if = "Option::is_none")]
    pub date_candidature: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}


/// Resultado de un test de orientación asociado a un perfil.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}


/// Recurso (documento, enlace) adjunto a un perfil.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub titre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}


/// Perfil público de un miembro.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(alias = "user_id", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, alias = "test_results", skip_serializing_if = "Vec::is_empty")]
    pub test_results: Vec<TestResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<Resource>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}


/// Imagen adjunta a una creación o actualización multipart.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}
