use crate::access::domain::{ApiError, Body, Method};
use crate::access::logic::ApiClient;
use crate::config::endpoints::SCHOLARSHIPS;
use crate::models::domain::Scholarship;


pub async fn get_scholarships(api: &ApiClient, token: Option<&str>) -> Result<Vec<Scholarship>, ApiError> {
    api.fetch(SCHOLARSHIPS, Method::Get, None, token).await
}

pub async fn get_scholarship(api: &ApiClient, id: i64, token: Option<&str>) -> Result<Scholarship, ApiError> {
    api.fetch(&format!("{SCHOLARSHIPS}/{id}"), Method::Get, None, token).await
}

pub async fn create_scholarship(api: &ApiClient, scholarship: &Scholarship, token: &str) -> Result<Scholarship, ApiError> {
    api.fetch(SCHOLARSHIPS, Method::Post, Some(Body::json(scholarship)?), Some(token)).await
}

pub async fn update_scholarship(api: &ApiClient,
                                id: i64,
                                scholarship: &Scholarship,
                                token: &str) -> Result<Scholarship, ApiError> {
    api.fetch(&format!("{SCHOLARSHIPS}/{id}"), Method::Put, Some(Body::json(scholarship)?), Some(token)).await
}

pub async fn delete_scholarship(api: &ApiClient, id: i64, token: &str) -> Result<(), ApiError> {
    api.send(&format!("{SCHOLARSHIPS}/{id}"), Method::Delete, None, Some(token)).await
}
