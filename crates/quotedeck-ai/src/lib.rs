//! # Quotedeck AI
//!
//! Chat-completion analysis client for the dashboard's commentary panel.
//!
//! The client builds a natural-language prompt from the most recent closes,
//! POSTs one chat-completion request with a bearer token, and expects the
//! completion text to itself be a JSON object with four named sections
//! which are displayed verbatim. Any failure along the way degrades to the
//! "Analysis temporarily unavailable" report; the dashboard never breaks
//! because commentary did.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use quotedeck_core::format::currency;
use quotedeck_core::{HistoricalSeries, HttpAuth, HttpClient, HttpRequest, Symbol};

pub const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const TEMPERATURE: f64 = 0.7;

/// How many recent closes feed the prompt.
const RECENT_CLOSES: usize = 5;

/// Presentation text for every section when analysis cannot be produced.
pub const ANALYSIS_UNAVAILABLE: &str = "Analysis temporarily unavailable";

/// Analysis failures. Internal to the client; callers of
/// [`AnalysisClient::analyze`] only ever see the degraded report.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("completion endpoint returned status {0}")]
    Status(u16),
    #[error("completion response carried no choices")]
    EmptyChoices,
    #[error("completion text was not the expected JSON shape: {0}")]
    MalformedCompletion(String),
    #[error("no bars available to describe")]
    EmptySeries,
}

/// Four-section commentary displayed verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub technical: String,
    pub sentiment: String,
    pub signals: String,
    pub risk: String,
}

impl AnalysisReport {
    /// The degraded report painted when any part of the exchange fails.
    pub fn unavailable() -> Self {
        Self {
            technical: String::from(ANALYSIS_UNAVAILABLE),
            sentiment: String::from(ANALYSIS_UNAVAILABLE),
            signals: String::from(ANALYSIS_UNAVAILABLE),
            risk: String::from(ANALYSIS_UNAVAILABLE),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Client for the chat-completion commentary exchange.
#[derive(Clone)]
pub struct AnalysisClient {
    http_client: Arc<dyn HttpClient>,
    api_key: String,
    model: String,
    endpoint: String,
}

impl AnalysisClient {
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            model: String::from(DEFAULT_MODEL),
            endpoint: String::from(CHAT_COMPLETIONS_URL),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Produce commentary for the series, or the degraded report.
    pub async fn analyze(&self, symbol: &Symbol, series: &HistoricalSeries) -> AnalysisReport {
        match self.request_analysis(symbol, series).await {
            Ok(report) => report,
            Err(error) => {
                warn!(%symbol, %error, "analysis exchange failed; painting degraded report");
                AnalysisReport::unavailable()
            }
        }
    }

    async fn request_analysis(
        &self,
        symbol: &Symbol,
        series: &HistoricalSeries,
    ) -> Result<AnalysisReport, AnalysisError> {
        let prompt = build_prompt(symbol, series)?;
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            temperature: TEMPERATURE,
        };
        let body = serde_json::to_string(&body)
            .map_err(|error| AnalysisError::MalformedCompletion(error.to_string()))?;

        let request = HttpRequest::post(&self.endpoint)
            .with_header("content-type", "application/json")
            .with_auth(&HttpAuth::BearerToken(self.api_key.clone()))
            .with_body(body);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|error| AnalysisError::Transport(error.message().to_owned()))?;

        if !response.is_success() {
            return Err(AnalysisError::Status(response.status));
        }

        let completion: ChatResponse = serde_json::from_str(&response.body)
            .map_err(|error| AnalysisError::MalformedCompletion(error.to_string()))?;
        let content = completion
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .ok_or(AnalysisError::EmptyChoices)?;

        serde_json::from_str(content)
            .map_err(|error| AnalysisError::MalformedCompletion(error.to_string()))
    }
}

/// Prompt over the last five closes: current price, 5-day change percent,
/// and the recent price list.
fn build_prompt(symbol: &Symbol, series: &HistoricalSeries) -> Result<String, AnalysisError> {
    let closes = series.closes();
    if closes.is_empty() {
        return Err(AnalysisError::EmptySeries);
    }

    let recent = &closes[closes.len().saturating_sub(RECENT_CLOSES)..];
    let current = recent[recent.len() - 1];
    let first = recent[0];
    let change_percent = if first > 0.0 {
        (current - first) / first * 100.0
    } else {
        0.0
    };

    let recent_text = recent
        .iter()
        .map(|close| currency(*close))
        .collect::<Vec<_>>()
        .join(", ");

    Ok(format!(
        "Analyze this {symbol} stock data:\n\
         Current Price: {}\n\
         5-day Price Change: {change_percent:.2}%\n\
         Recent Prices: {recent_text}\n\
         \n\
         Provide a concise analysis in JSON format with these keys:\n\
         - technical: Technical analysis of price movements\n\
         - sentiment: Market sentiment analysis\n\
         - signals: Trading signals with reasoning\n\
         - risk: Key risk factors\n\
         \n\
         Keep each section under 50 words.",
        currency(current),
    ))
}
