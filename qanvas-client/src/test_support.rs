//! Test doubles for the transport seam

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::Result;
use crate::transport::{ServiceRequest, ServiceResponse, Transport};

/// In-memory transport answering from a script
///
/// Records every request. Once the script runs dry the `repeat` response is
/// served; without one an unexpected call panics the test.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    script: Mutex<VecDeque<Result<ServiceResponse>>>,
    repeat: Option<ServiceResponse>,
    requests: Mutex<Vec<ServiceRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(self, response: ServiceResponse) -> Self {
        self.script.lock().unwrap().push_back(Ok(response));
        self
    }

    pub(crate) fn fail(self, err: crate::ClientError) -> Self {
        self.script.lock().unwrap().push_back(Err(err));
        self
    }

    pub(crate) fn repeat(mut self, response: ServiceResponse) -> Self {
        self.repeat = Some(response);
        self
    }

    pub(crate) fn requests(&self) -> Vec<ServiceRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: ServiceRequest) -> Result<ServiceResponse> {
        let url = request.url.clone();
        self.requests.lock().unwrap().push(request);

        if let Some(next) = self.script.lock().unwrap().pop_front() {
            return next;
        }

        match &self.repeat {
            Some(response) => Ok(response.clone()),
            None => panic!("unexpected request to {}", url),
        }
    }
}
