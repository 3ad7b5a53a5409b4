//! In-memory transport for tests: canned responses in FIFO order, every
//! request recorded. Routed responses answer a fixed url every time and take
//! precedence over the FIFO.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use serde_json::Value;

use super::{HttpResponse, Transport, TransportError};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub body: Option<Value>,
}

#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<HttpResponse, String>>>,
    routes: HashMap<String, HttpResponse>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, status: u16, body: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    pub fn route(mut self, url: &str, status: u16, body: &str) -> Self {
        self.routes.insert(url.to_string(), HttpResponse::new(status, body));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.replies.lock().unwrap().push_back(Err(message.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next(
        &self,
        method: &'static str,
        url: &str,
        body: Option<&Value>,
    ) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            url: url.to_string(),
            body: body.cloned(),
        });
        if let Some(resp) = self.routes.get(url) {
            return Ok(resp.clone());
        }
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(resp)) => Ok(resp),
            Some(Err(message)) => Err(TransportError {
                method,
                url: url.to_string(),
                message,
            }),
            None => Err(TransportError {
                method,
                url: url.to_string(),
                message: "no scripted reply left".to_string(),
            }),
        }
    }
}

impl Transport for ScriptedTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        self.next("GET", url, None)
    }

    fn post_json(&self, url: &str, body: &Value) -> Result<HttpResponse, TransportError> {
        self.next("POST", url, Some(body))
    }

    fn patch_json(&self, url: &str, body: &Value) -> Result<HttpResponse, TransportError> {
        self.next("PATCH", url, Some(body))
    }
}
