//! Interaction controller: question input → webhook → normalized answer →
//! rendered view and history.
//!
//! States are `Idle → Submitting → Idle`; the submission outcome says whether
//! the round ended answered or failed. `submit` takes `&mut self` and flips
//! to `Submitting` before its first await, so a second submission cannot
//! start while one is in flight.

use crate::config::Config;
use crate::glossary;
use crate::history::{Exchange, HistoryStore};
use crate::messages::{normalize, AskPayload};
use crate::transport::{Body, HttpTransport};
use crate::view::{http_error_message, AnswerView, View, NETWORK_ERROR_MESSAGE};

/// A question must be longer than this (trimmed, in characters) to be sent.
pub const MIN_QUESTION_CHARS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Submitting,
}

/// Why a submission failed. Both kinds are recoverable by resubmitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// Webhook answered with a non-2xx status.
    Http(u16),
    /// Connection failure or timeout.
    Network,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Submission was not allowed (question too short or already submitting).
    Rejected,
    Answered(Exchange),
    Failed(Failure),
}

pub struct Controller<'a> {
    config: &'a Config,
    transport: HttpTransport,
    history: HistoryStore,
    question: String,
    active_category: Option<String>,
    state: ControllerState,
    view: View,
}

impl<'a> Controller<'a> {
    pub fn new(config: &'a Config, transport: HttpTransport, history: HistoryStore) -> Self {
        Self {
            config,
            transport,
            history,
            question: String::new(),
            active_category: config.categories.default_key().map(str::to_string),
            state: ControllerState::Idle,
            view: View::Empty,
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn set_question(&mut self, text: &str) {
        self.question = text.to_string();
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn active_category(&self) -> Option<&str> {
        self.active_category.as_deref()
    }

    /// Make `key` the active category. Keys outside the configured set are ignored.
    pub fn select_category(&mut self, key: &str) -> bool {
        if !self.config.categories.contains(key) {
            return false;
        }
        self.active_category = Some(key.to_string());
        true
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.state == ControllerState::Idle
            && self.question.trim().chars().count() > MIN_QUESTION_CHARS
    }

    /// Load a starter prompt: its question and category, and an empty answer slot.
    pub fn apply_example(&mut self, index: usize) -> bool {
        let Some(example) = self.config.examples.get(index) else {
            return false;
        };
        if let Some(key) = example.category.as_deref() {
            self.select_category(key);
        }
        self.question = example.question.clone();
        self.view = View::Empty;
        true
    }

    /// Reset the question and the answer slot. History is untouched.
    pub fn clear(&mut self) {
        self.question.clear();
        self.view = View::Empty;
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Show a stored exchange again without contacting the webhook.
    pub fn reopen(&mut self, timestamp: i64) -> bool {
        let Some(exchange) = self.history.find_by_timestamp(timestamp) else {
            return false;
        };
        if let Some(key) = exchange.category.clone() {
            self.active_category = Some(key);
        }
        self.question = exchange.question.clone();
        self.view = View::Answer(AnswerView::new(
            &exchange.answer,
            &exchange.sources,
            self.config.trust_remote_html,
        ));
        true
    }

    /// Send the current question and render the result.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if !self.can_submit() {
            return SubmitOutcome::Rejected;
        }
        self.state = ControllerState::Submitting;
        self.view = View::Loading;

        let question = self.question.trim().to_string();
        let result = {
            let hints = glossary::detect_hits(&self.config.glossary, &question);
            let payload = AskPayload::new(&question, self.active_category.as_deref(), hints);
            self.transport
                .send(&self.config.webhook_url, &payload, self.config.request_timeout())
                .await
        };

        let outcome = match result {
            Ok(reply) if reply.is_ok() => SubmitOutcome::Answered(self.answered(question, reply.body)),
            Ok(reply) => {
                tracing::warn!(status = reply.status, "webhook returned an error status");
                self.view = View::Error(http_error_message(reply.status));
                SubmitOutcome::Failed(Failure::Http(reply.status))
            }
            Err(e) => {
                tracing::warn!(error = %e, "webhook request failed");
                self.view = View::Error(NETWORK_ERROR_MESSAGE.to_string());
                SubmitOutcome::Failed(Failure::Network)
            }
        };
        self.state = ControllerState::Idle;
        outcome
    }

    fn answered(&mut self, question: String, body: Body) -> Exchange {
        let answer = normalize(body.into_raw(), &self.config.categories);
        if let Some(key) = answer.category {
            self.active_category = Some(key);
        }
        let exchange = Exchange {
            question,
            answer: answer.text,
            sources: answer.sources,
            category: self.active_category.clone(),
            timestamp: self.next_timestamp(),
        };
        self.view = View::Answer(AnswerView::new(
            &exchange.answer,
            &exchange.sources,
            self.config.trust_remote_html,
        ));
        tracing::info!(timestamp = exchange.timestamp, category = ?exchange.category, "question answered");
        self.history.append(exchange.clone());
        exchange
    }

    /// Current time in ms, bumped past the newest entry so timestamps stay unique.
    fn next_timestamp(&self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        match self.history.entries().first() {
            Some(newest) if newest.timestamp >= now => newest.timestamp + 1,
            _ => now,
        }
    }
}
