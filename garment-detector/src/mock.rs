use crate::traits::InferenceClient;
use crate::types::{DetectorError, InferenceRequest, Result, TaskKind};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// In-process inference client answering from a fixed script.
///
/// Used by the tests and by the `--offline` mode of the binary. Tasks without
/// a scripted answer fail as malformed; tasks marked as failing time out.
pub struct ScriptedInferenceClient {
    name: String,
    responses: HashMap<TaskKind, String>,
    // remaining forced failures per task
    failures: Mutex<HashMap<TaskKind, u32>>,
    fail_everything: bool,
    response_delay_ms: u64,
    calls: Mutex<Vec<TaskKind>>,
}

impl ScriptedInferenceClient {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            responses: HashMap::new(),
            failures: Mutex::new(HashMap::new()),
            fail_everything: false,
            response_delay_ms: 0,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A red t-shirt, answered consistently by every task.
    pub fn sample() -> Self {
        Self::new("sample")
            .with_response(TaskKind::Combined, "color: red, category: t-shirt")
            .with_response(TaskKind::Caption, "a red cotton t-shirt lying on a white bed")
            .with_response(TaskKind::GarmentType, "t-shirt")
            .with_response(TaskKind::ColorQuery, "red")
            .with_response(TaskKind::ColorFromCaption, "red")
            .with_response(TaskKind::AlternateColorQuery, "red")
            .with_response(TaskKind::DominantColor, "red")
    }

    pub fn with_response(mut self, task: TaskKind, text: impl Into<String>) -> Self {
        self.responses.insert(task, text.into());
        self
    }

    /// Every call for `task` times out.
    pub fn failing(self, task: TaskKind) -> Self {
        self.failing_times(task, u32::MAX)
    }

    /// The first `times` calls for `task` time out, later ones are answered.
    pub fn failing_times(self, task: TaskKind, times: u32) -> Self {
        if let Ok(mut failures) = self.failures.lock() {
            failures.insert(task, times);
        }
        self
    }

    /// Simulates a total outage.
    pub fn failing_everything(mut self) -> Self {
        self.fail_everything = true;
        self
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.response_delay_ms = delay_ms;
        self
    }

    /// Tasks invoked so far, in call order.
    pub fn calls(&self) -> Vec<TaskKind> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn call_count(&self, task: TaskKind) -> usize {
        self.calls().into_iter().filter(|called| *called == task).count()
    }

    fn take_failure(&self, task: TaskKind) -> bool {
        if self.fail_everything {
            return true;
        }
        let Ok(mut failures) = self.failures.lock() else {
            return false;
        };
        match failures.get_mut(&task) {
            Some(remaining) if *remaining > 0 => {
                if *remaining != u32::MAX {
                    *remaining -= 1;
                }
                true
            }
            _ => false,
        }
    }

    async fn simulate_processing(&self) {
        if self.response_delay_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.response_delay_ms)).await;
        }
    }
}

#[async_trait]
impl InferenceClient for ScriptedInferenceClient {
    fn client_name(&self) -> String {
        format!("Scripted inference ({})", self.name)
    }

    async fn invoke(&self, request: &InferenceRequest) -> Result<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request.task);
        }
        self.simulate_processing().await;

        if self.take_failure(request.task) {
            debug!("Scripted failure for {} task", request.task);
            return Err(DetectorError::Timeout { seconds: 0 });
        }

        self.responses
            .get(&request.task)
            .cloned()
            .ok_or_else(|| DetectorError::MalformedResponse(format!("no scripted answer for {} task", request.task)))
    }
}
