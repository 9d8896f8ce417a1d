use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use patient_sim::{Directive, GeneratorError, ResponseGenerator};

enum DefaultBehavior {
    Reply(String),
    Fail,
}

/// Scripted stand-in for the external generator. Queued replies are consumed
/// in order; once exhausted, the default behavior applies. Every directive it
/// receives is recorded for inspection.
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, GeneratorError>>>,
    default: DefaultBehavior,
    delay: Option<Duration>,
    seen: Mutex<Vec<Directive>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            default: DefaultBehavior::Reply("*pauses* Okay.".to_string()),
            delay: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// A generator whose every call fails at the transport level.
    pub fn failing() -> Self {
        Self {
            default: DefaultBehavior::Fail,
            ..Self::new()
        }
    }

    pub fn with_reply(self, text: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(text.to_string()));
        self
    }

    pub fn with_failure(self) -> Self {
        self.replies.lock().unwrap().push_back(Err(scripted_error()));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn last_directive(&self) -> Option<Directive> {
        self.seen.lock().unwrap().last().cloned()
    }
}

fn scripted_error() -> GeneratorError {
    GeneratorError::Api {
        status: 503,
        message: "scripted failure".to_string(),
    }
}

#[async_trait]
impl ResponseGenerator for ScriptedGenerator {
    async fn generate(&self, directive: &Directive) -> Result<String, GeneratorError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.seen.lock().unwrap().push(directive.clone());

        let scripted = self.replies.lock().unwrap().pop_front();
        match scripted {
            Some(result) => result,
            None => match &self.default {
                DefaultBehavior::Reply(text) => Ok(text.clone()),
                DefaultBehavior::Fail => Err(scripted_error()),
            },
        }
    }
}

// A blanket `impl ResponseGenerator for Arc<T>` lives in the library crate, so
// `Arc<ScriptedGenerator>` is already a generator and tests can keep a handle
// for assertions after handing a clone to a session.
