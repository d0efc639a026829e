//! Transporte falso para tests: registra cada petición y responde desde una cola.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use serde_json::Value;
use super::domain::{ApiError, HttpRequest, HttpResponse, Transport};


#[derive(Default)]
pub struct FakeTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, ApiError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond_json(&self, status: u16, body: Value) {
        let body = serde_json::to_vec(&body).unwrap();
        self.respond_raw(status, body);
    }

    pub fn respond_raw(&self, status: u16, body: Vec<u8>) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse { status, body }));
    }

    pub fn fail(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(ApiError::RequestFailed { status: None, message: message.to_string() }));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no se envió ninguna petición")
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("FakeTransport sin respuestas programadas")
    }
}
