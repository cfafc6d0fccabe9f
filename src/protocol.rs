//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{ChallengeMode, QuizMode, Scope};
use crate::sequencer::{Quiz, QuizPayload};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    GenerateQuiz {
        mode: String,
        scope_type: String,
        scope_id: i64,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Quiz { quiz: QuizOut },
    Error { message: String },
}

/// Generated quiz as delivered to the frontend. The payload lands under
/// `questions` (word mode) or `options` (verse mode).
#[derive(Debug, Serialize)]
pub struct QuizOut {
    pub text: String,
    pub mode: QuizMode,
    pub title: String,
    pub number: u16,
    #[serde(flatten)]
    pub payload: QuizPayload,
}

pub fn to_out(q: &Quiz) -> QuizOut {
    QuizOut {
        text: q.verse.text.clone(),
        mode: q.mode,
        title: q.title.clone(),
        number: q.verse.number,
        payload: q.payload.clone(),
    }
}

//
// HTTP request/response DTOs
//

/// Raw generation parameters. Kept as strings so that every malformed value
/// is reported with our own message.
#[derive(Debug, Default, Deserialize)]
pub struct QuizQuery {
    pub mode: Option<String>,
    #[serde(rename = "type", alias = "scope_type")]
    pub scope_type: Option<String>,
    #[serde(rename = "number", alias = "scope_id")]
    pub scope_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChallengeIn {
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    pub mode: ChallengeMode,
    /// `scope_type` + `scope_id`, checked while deserializing.
    #[serde(flatten)]
    pub scope: Scope,
}

#[derive(Debug, Deserialize)]
pub struct QuestionIn {
    pub ayah: u32,
    pub options: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct OptionsIn {
    pub options: serde_json::Value,
}

#[derive(Serialize)]
pub struct DeletedOut {
    pub deleted: bool,
    pub questions: usize,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
