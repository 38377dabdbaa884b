//! Coaching Zone client library: webhook transport, answer normalization,
//! markdown/HTML rendering and the local question history.
//! Used by the `coaching-zone` binary.

pub mod category;
pub mod config;
pub mod controller;
pub mod error;
pub mod format;
pub mod glossary;
pub mod history;
pub mod messages;
pub mod storage;
pub mod transport;
pub mod view;

pub use category::{Categories, Category};
pub use config::{default_config_path, Config, Example};
pub use controller::{Controller, ControllerState, Failure, SubmitOutcome};
pub use error::{ConfigError, NetworkError, StorageError};
pub use glossary::Glossary;
pub use history::{Exchange, HistoryStore, Source, MAX_HISTORY};
pub use messages::{normalize, AskPayload, NormalizedAnswer, RawResponse};
pub use transport::{Body, HttpReply, HttpTransport};
pub use view::{AnswerView, SourceLink, View};
