pub mod api {
    pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
    pub const FALLBACK_ERROR_MESSAGE: &str = "Une erreur est survenue";
    pub const JSON_CONTENT_TYPE: &str = "application/json";
    pub const MULTIPART_DATA_PART: &str = "data";
    pub const MULTIPART_IMAGE_PART: &str = "image";
}

pub mod storage {
    pub const TOKEN_KEY: &str = "token";
    pub const USER_KEY: &str = "user";
    pub const DEFAULT_STORE_PATH: &str = ".session.json";
}

pub mod endpoints {
    pub const SIGN_IN: &str = "/auth/signin";
    pub const USERS: &str = "/users";
    pub const UNIVERSITIES: &str = "/universites";
    pub const ACTIVITIES: &str = "/activities";
    pub const SCHOLARSHIPS: &str = "/bourses";
    pub const APPLICATIONS: &str = "/candidatures";
    pub const JOB_OFFERS: &str = "/offres-emploi";
    pub const PROFILES: &str = "/profils";
}
