use crate::access::domain::{ApiError, Body, Method};
use crate::access::logic::ApiClient;
use crate::config::endpoints::PROFILES;
use crate::models::domain::Profile;


pub async fn get_profile(api: &ApiClient, id: i64, token: &str) -> Result<Profile, ApiError> {
    api.fetch(&format!("{PROFILES}/{id}"), Method::Get, None, Some(token)).await
}

pub async fn update_profile(api: &ApiClient, id: i64, profile: &Profile, token: &str) -> Result<Profile, ApiError> {
    api.fetch(&format!("{PROFILES}/{id}"), Method::Put, Some(Body::json(profile)?), Some(token)).await
}
