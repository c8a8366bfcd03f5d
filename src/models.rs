use serde::{Deserialize, Serialize};

// Grok chat-completion models
#[derive(Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: content.to_string(),
        }
    }

    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

#[derive(Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

// Twitter models
#[derive(Deserialize)]
pub struct BearerTokenResponse {
    pub access_token: String,
}

#[derive(Deserialize)]
pub struct PlaceTrends {
    pub trends: Vec<Trend>,
}

#[derive(Deserialize)]
pub struct Trend {
    pub name: String,
}

// API models
#[derive(Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Serialize, Deserialize)]
pub struct AskResponse {
    pub message: String,
    pub status: String,
}

#[derive(Serialize, Deserialize)]
pub struct TrendsResponse {
    pub trends: Vec<String>,
}
