use crate::access::domain::{ApiError, Method};
use crate::access::logic::ApiClient;
use crate::config::endpoints::UNIVERSITIES;
use crate::models::domain::{ImageUpload, University};
use super::data_with_image;


/// Lista pública de universidades asociadas.
pub async fn get_universities(api: &ApiClient, token: Option<&str>) -> Result<Vec<University>, ApiError> {
    api.fetch(UNIVERSITIES, Method::Get, None, token).await
}

pub async fn get_university(api: &ApiClient, id: i64, token: Option<&str>) -> Result<University, ApiError> {
    api.fetch(&format!("{UNIVERSITIES}/{id}"), Method::Get, None, token).await
}

/// Alta multipart: parte `data` con el registro y parte `image` opcional.
pub async fn create_university(api: &ApiClient,
                               university: &University,
                               image: Option<ImageUpload>,
                               token: &str) -> Result<University, ApiError> {
    let body = data_with_image(university, image)?;
    api.fetch(UNIVERSITIES, Method::Post, Some(body), Some(token)).await
}

pub async fn update_university(api: &ApiClient,
                               id: i64,
                               university: &University,
                               image: Option<ImageUpload>,
                               token: &str) -> Result<University, ApiError> {
    let body = data_with_image(university, image)?;
    api.fetch(&format!("{UNIVERSITIES}/{id}"), Method::Put, Some(body), Some(token)).await
}

pub async fn delete_university(api: &ApiClient, id: i64, token: &str) -> Result<(), ApiError> {
    api.send(&format!("{UNIVERSITIES}/{id}"), Method::Delete, None, Some(token)).await
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::domain::{FormPart, Payload};
    use crate::access::testing::FakeTransport;
    use serde_json::json;

    #[tokio::test]
    async fn public_listing_needs_no_credential() {
        let transport = FakeTransport::new();
        transport.respond_json(200, json!([{"id": 1, "nom": "UM5", "pays": "Maroc"}]));
        let api = ApiClient::new("http://backend.test", transport.clone());

        let list = get_universities(&api, None).await.unwrap();

        assert_eq!(list[0].pays.as_deref(), Some("Maroc"));
        assert!(transport.last_request().header("Authorization").is_none());
    }

    #[tokio::test]
    async fn create_sends_data_and_image_parts() {
        let transport = FakeTransport::new();
        transport.respond_json(201, json!({"id": 5, "nom": "UIR", "image": "uir.png"}));
        let api = ApiClient::new("http://backend.test", transport.clone());

        let image = ImageUpload {
            file_name: "uir.png".into(),
            mime: "image/png".into(),
            bytes: vec![0x89, 0x50, 0x4e, 0x47],
        };
        let draft = University { nom: "UIR".into(), ..Default::default() };
        let created = create_university(&api, &draft, Some(image), "tok").await.unwrap();
        assert_eq!(created.id, Some(5));

        let sent = transport.last_request();
        assert_eq!(sent.url, "http://backend.test/universites");
        assert!(sent.header("Content-Type").is_none());
        let Payload::Multipart(parts) = sent.payload else { panic!("se esperaba multipart") };
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], FormPart::Json { name: "data".into(), value: json!({"nom": "UIR"}) });
        assert!(matches!(&parts[1], FormPart::File { name, file_name, .. } if name == "image" && file_name == "uir.png"));
    }

    #[tokio::test]
    async fn update_without_image_sends_only_data() {
        let transport = FakeTransport::new();
        transport.respond_json(200, json!({"id": 5, "nom": "UIR Rabat"}));
        let api = ApiClient::new("http://backend.test", transport.clone());

        let changes = University { nom: "UIR Rabat".into(), ..Default::default() };
        update_university(&api, 5, &changes, None, "tok").await.unwrap();

        let sent = transport.last_request();
        assert_eq!(sent.method, Method::Put);
        assert_eq!(sent.url, "http://backend.test/universites/5");
        let Payload::Multipart(parts) = sent.payload else { panic!("se esperaba multipart") };
        assert_eq!(parts.len(), 1);
    }
}
