use crate::access::domain::{ApiError, Method};
use crate::access::logic::ApiClient;
use crate::config::endpoints::ACTIVITIES;
use crate::models::domain::{Activity, ImageUpload};
use super::data_with_image;


pub async fn get_activities(api: &ApiClient, token: Option<&str>) -> Result<Vec<Activity>, ApiError> {
    api.fetch(ACTIVITIES, Method::Get, None, token).await
}

pub async fn get_activity(api: &ApiClient, id: i64, token: Option<&str>) -> Result<Activity, ApiError> {
    api.fetch(&format!("{ACTIVITIES}/{id}"), Method::Get, None, token).await
}

pub async fn create_activity(api: &ApiClient,
                             activity: &Activity,
                             image: Option<ImageUpload>,
                             token: &str) -> Result<Activity, ApiError> {
    let body = data_with_image(activity, image)?;
    api.fetch(ACTIVITIES, Method::Post, Some(body), Some(token)).await
}

pub async fn update_activity(api: &ApiClient,
                             id: i64,
                             activity: &Activity,
                             image: Option<ImageUpload>,
                             token: &str) -> Result<Activity, ApiError> {
    let body = data_with_image(activity, image)?;
    api.fetch(&format!("{ACTIVITIES}/{id}"), Method::Put, Some(body), Some(token)).await
}

pub async fn delete_activity(api: &ApiClient, id: i64, token: &str) -> Result<(), ApiError> {
    api.send(&format!("{ACTIVITIES}/{id}"), Method::Delete, None, Some(token)).await
}
