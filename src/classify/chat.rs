use serde::{Deserialize, Serialize};

use super::SYSTEM_PROMPT;
use crate::error::{Error, Result};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// POST `{base_url}/chat/completions` and return the first choice's text.
pub(super) fn complete(
    http: &reqwest::blocking::Client,
    provider: &str,
    base_url: &str,
    bearer: Option<&str>,
    model: &str,
    body: &str,
) -> Result<String> {
    let fail = |reason: String| Error::Classification {
        provider: provider.to_string(),
        reason,
    };

    let url = format!("{}/chat/completions", base_url.trim_end_matches('/'));
    let request = ChatRequest {
        model,
        messages: [
            ChatMessage {
                role: "system",
                content: SYSTEM_PROMPT,
            },
            ChatMessage {
                role: "user",
                content: body,
            },
        ],
    };

    let mut req = http.post(&url).json(&request);
    if let Some(key) = bearer {
        req = req.bearer_auth(key);
    }

    let resp = req
        .send()
        .map_err(|e| fail(format!("request to {url}: {e}")))?
        .error_for_status()
        .map_err(|e| fail(e.to_string()))?;

    let parsed: ChatResponse = resp
        .json()
        .map_err(|e| fail(format!("unexpected response shape: {e}")))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|s| s.trim().to_string())
        .ok_or_else(|| fail("response has no choices[0].message.content".into()))
}
