use crate::access::domain::{ApiError, Body, Method};
use crate::access::logic::ApiClient;
use crate::config::endpoints::APPLICATIONS;
use crate::models::domain::Application;


pub async fn get_applications(api: &ApiClient, token: &str) -> Result<Vec<Application>, ApiError> {
    api.fetch(APPLICATIONS, Method::Get, None, Some(token)).await
}

pub async fn get_application(api: &ApiClient, id: i64, token: &str) -> Result<Application, ApiError> {
    api.fetch(&format!("{APPLICATIONS}/{id}"), Method::Get, None, Some(token)).await
}

pub async fn create_application(api: &ApiClient, application: &Application, token: &str) -> Result<Application, ApiError> {
    api.fetch(APPLICATIONS, Method::Post, Some(Body::json(application)?), Some(token)).await
}

pub async fn update_application(api: &ApiClient,
                                id: i64,
                                application: &Application,
                                token: &str) -> Result<Application, ApiError> {
    api.fetch(&format!("{APPLICATIONS}/{id}"), Method::Put, Some(Body::json(application)?), Some(token)).await
}

pub async fn delete_application(api: &ApiClient, id: i64, token: &str) -> Result<(), ApiError> {
    api.send(&format!("{APPLICATIONS}/{id}"), Method::Delete, None, Some(token)).await
}
