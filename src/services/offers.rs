use crate::access::domain::{ApiError, Method};
use crate::access::logic::ApiClient;
use crate::config::endpoints::JOB_OFFERS;
use crate::models::domain::{ImageUpload, JobOffer};
use super::data_with_image;


pub async fn get_offers(api: &ApiClient, token: Option<&str>) -> Result<Vec<JobOffer>, ApiError> {
    api.fetch(JOB_OFFERS, Method::Get, None, token).await
}

pub async fn get_offer(api: &ApiClient, id: i64, token: Option<&str>) -> Result<JobOffer, ApiError> {
    api.fetch(&format!("{JOB_OFFERS}/{id}"), Method::Get, None, token).await
}

pub async fn create_offer(api: &ApiClient,
                          offer: &JobOffer,
                          image: Option<ImageUpload>,
                          token: &str) -> Result<JobOffer, ApiError> {
    let body = data_with_image(offer, image)?;
    api.fetch(JOB_OFFERS, Method::Post, Some(body), Some(token)).await
}

pub async fn update_offer(api: &ApiClient,
                          id: i64,
                          offer: &JobOffer,
                          image: Option<ImageUpload>,
                          token: &str) -> Result<JobOffer, ApiError> {
    let body = data_with_image(offer, image)?;
    api.fetch(&format!("{JOB_OFFERS}/{id}"), Method::Put, Some(body), Some(token)).await
}

pub async fn delete_offer(api: &ApiClient, id: i64, token: &str) -> Result<(), ApiError> {
    api.send(&format!("{JOB_OFFERS}/{id}"), Method::Delete, None, Some(token)).await
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::testing::FakeTransport;
    use serde_json::json;

    #[tokio::test]
    async fn listing_accepts_legacy_field_names() {
        let transport = FakeTransport::new();
        transport.respond_json(200, json!([
            {"id": 1, "titre": "Dev Rust", "type_contrat": "CDI"},
            {"id": 2, "titre": "Data analyst", "typeContrat": "Stage"}
        ]));
        let api = ApiClient::new("http://backend.test", transport.clone());

        let offers = get_offers(&api, None).await.unwrap();

        assert_eq!(offers[0].type_contrat.as_deref(), Some("CDI"));
        assert_eq!(offers[1].type_contrat.as_deref(), Some("Stage"));
        assert_eq!(transport.last_request().url, "http://backend.test/offres-emploi");
    }

    #[tokio::test]
    async fn update_targets_single_resource() {
        let transport = FakeTransport::new();
        transport.respond_json(200, json!({"id": 2, "titre": "Data analyst junior"}));
        let api = ApiClient::new("http://backend.test", transport.clone());

        let changes = JobOffer { titre: "Data analyst junior".into(), ..Default::default() };
        let updated = update_offer(&api, 2, &changes, None, "tok").await.unwrap();

        assert_eq!(updated.titre, "Data analyst junior");
        let sent = transport.last_request();
        assert_eq!(sent.method, Method::Put);
        assert_eq!(sent.url, "http://backend.test/offres-emploi/2");
    }
}
