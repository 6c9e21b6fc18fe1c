use crate::api::client::StatsGateway;
use crate::api::endpoints::Query;
use crate::error::AppError;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory gateway keyed by `path?query`. Unknown requests answer 503.
#[derive(Default)]
pub struct FakeGateway {
    responses: HashMap<String, Value>,
    calls: Mutex<Vec<String>>,
}

pub fn request_key(path: &str, query: &Query) -> String {
    let query = query
        .pairs()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query)
    }
}

impl FakeGateway {
    pub fn new() -> Self {
        FakeGateway::default()
    }

    pub fn respond(mut self, key: &str, body: Value) -> Self {
        self.responses.insert(key.to_string(), body);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        let mut calls = self.calls.lock().unwrap().clone();
        calls.sort();
        calls
    }
}

impl StatsGateway for FakeGateway {
    fn get(&self, path: &str, query: &Query) -> Result<Value, AppError> {
        let key = request_key(path, query);
        self.calls.lock().unwrap().push(key.clone());
        self.responses
            .get(&key)
            .cloned()
            .ok_or(AppError::HttpStatus { code: 503 })
    }
}
