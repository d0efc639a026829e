use crate::access::domain::{ApiError, Body, Method};
use crate::access::logic::ApiClient;
use crate::config::endpoints::USERS;
use crate::models::domain::User;


pub async fn get_users(api: &ApiClient, token: &str) -> Result<Vec<User>, ApiError> {
    api.fetch(USERS, Method::Get, None, Some(token)).await
}

pub async fn get_user(api: &ApiClient, id: i64, token: &str) -> Result<User, ApiError> {
    api.fetch(&format!("{USERS}/{id}"), Method::Get, None, Some(token)).await
}

pub async fn create_user(api: &ApiClient, user: &User, token: &str) -> Result<User, ApiError> {
    api.fetch(USERS, Method::Post, Some(Body::json(user)?), Some(token)).await
}

pub async fn update_user(api: &ApiClient, id: i64, user: &User, token: &str) -> Result<User, ApiError> {
    api.fetch(&format!("{USERS}/{id}"), Method::Put, Some(Body::json(user)?), Some(token)).await
}

pub async fn delete_user(api: &ApiClient, id: i64, token: &str) -> Result<(), ApiError> {
    api.send(&format!("{USERS}/{id}"), Method::Delete, None, Some(token)).await
}
