//! HTTP client for the Spice AI chat backend.
//!
//! The backend authenticates through a server-side session cookie, so the
//! client keeps a cookie store and every method reuses the same jar. Each
//! method maps one endpoint; status handling mirrors what each endpoint
//! actually returns (auth endpoints answer JSON on non-2xx statuses,
//! `/get_conversations` uses 401 as a distinct outcome).

use crate::api::payloads::{
    AuthResponse, ChatReply, ChatRequest, Conversation, LoginRequest, SessionStatus,
    SignupRequest, WireMessage,
};
use crate::utils::url::construct_api_url;

pub mod payloads;

type ApiError = Box<dyn std::error::Error + Send + Sync>;

/// Outcome of `/get_conversations`: a 401 is not a failure but the signal to
/// show the "please log in" placeholder.
#[derive(Debug, Clone)]
pub enum ConversationsOutcome {
    Unauthorized,
    Listing(Vec<Conversation>),
}

#[derive(Clone)]
pub struct ChatServerClient {
    http: reqwest::Client,
    base_url: String,
}

impl ChatServerClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            base_url: base_url.to_string(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        construct_api_url(&self.base_url, endpoint)
    }

    pub async fn check_session(&self) -> Result<SessionStatus, ApiError> {
        let response = self.http.get(self.url("check_session")).send().await?;
        if !response.status().is_success() {
            return Err(format!("session check failed with status {}", response.status()).into());
        }
        Ok(response.json::<SessionStatus>().await?)
    }

    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ApiError> {
        let response = self
            .http
            .post(self.url("signup"))
            .json(&SignupRequest {
                username,
                email,
                password,
            })
            .send()
            .await?;
        Self::parse_auth_response(response).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let response = self
            .http
            .post(self.url("login"))
            .json(&LoginRequest { email, password })
            .send()
            .await?;
        Self::parse_auth_response(response).await
    }

    /// Auth endpoints carry their outcome in the body even on 4xx statuses;
    /// only a body that fails to parse is a real error.
    async fn parse_auth_response(response: reqwest::Response) -> Result<AuthResponse, ApiError> {
        let status = response.status();
        match response.json::<AuthResponse>().await {
            Ok(body) => Ok(body),
            Err(_) if !status.is_success() => {
                Err(format!("auth request failed with status {status}").into())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.http.post(self.url("logout")).send().await?;
        Ok(())
    }

    pub async fn conversations(&self) -> Result<ConversationsOutcome, ApiError> {
        let response = self.http.get(self.url("get_conversations")).send().await?;
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Ok(ConversationsOutcome::Unauthorized);
        }
        if !response.status().is_success() {
            return Err(format!(
                "failed to load conversations, status {}",
                response.status()
            )
            .into());
        }
        let listing = response.json::<Vec<Conversation>>().await?;
        Ok(ConversationsOutcome::Listing(listing))
    }

    pub async fn messages(&self, conversation_id: i64) -> Result<Vec<WireMessage>, ApiError> {
        let endpoint = format!("get_messages/{conversation_id}");
        let response = self.http.get(self.url(&endpoint)).send().await?;
        if !response.status().is_success() {
            return Err(format!("failed to load messages, status {}", response.status()).into());
        }
        Ok(response.json::<Vec<WireMessage>>().await?)
    }

    pub async fn send_chat(
        &self,
        message: &str,
        conversation_id: Option<i64>,
    ) -> Result<ChatReply, ApiError> {
        let response = self
            .http
            .post(self.url("chat"))
            .json(&ChatRequest {
                message,
                conversation_id,
            })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(format!("chat request failed with status {}", response.status()).into());
        }
        Ok(response.json::<ChatReply>().await?)
    }
}
