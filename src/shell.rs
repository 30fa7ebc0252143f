// Screen logic. Each operation takes the already collected form values,
// performs at most one backend call and returns a `Notice` describing what
// to show. Nothing here touches the terminal.

use crate::api::{ApiClient, ApiResponse, LoginResponse, PredictionRequest, RegisterRequest};
use crate::chat::{ChatClient, ChatMessage};
use crate::error::Error;
use crate::session::{Credentials, Session};
use crate::table::{display_value, LogTable};
use serde_json::Value;
use tracing::{info, warn};

pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful";

pub const MSG_MUST_FILL: &str = "Username and password must be filled in";
pub const MSG_LOGIN_FIRST: &str = "Please log in first.";
pub const MSG_REGISTERED: &str = "User registered successfully";
pub const MSG_LOGGED_IN: &str = "Login successful!";
pub const MSG_LOGIN_REJECTED: &str = "Login failed. Check your username and password.";
pub const MSG_PREDICT_FAILED: &str = "An error occurred while making the prediction";
pub const MSG_LOGS_FAILED: &str = "An error occurred while fetching the logs";
pub const MSG_CHAT_UNAVAILABLE: &str = "Chat is unavailable: no OpenAI API key is configured";
pub const MSG_EMPTY_MESSAGE: &str = "Message must not be empty";

/// What a screen wants displayed after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
    Warning(String),
    Info(String),
    Table(LogTable),
}

fn transport_error(err: Error) -> Notice {
    warn!(error = %err, "backend request failed");
    Notice::Error(format!("Error contacting the backend: {}", err))
}

/// `detail` from a JSON object body, else the fallback text.
fn detail_or(body: &Value, fallback: &str) -> String {
    body.get("detail")
        .map(display_value)
        .unwrap_or_else(|| fallback.to_string())
}

fn body_json(res: &ApiResponse) -> Value {
    res.json::<Value>().unwrap_or(Value::Null)
}

pub struct Shell {
    api: ApiClient,
    session: Session,
    chat: Option<ChatClient>,
    chat_history: Vec<ChatMessage>,
}

impl Shell {
    pub fn new(api: ApiClient) -> Self {
        Shell {
            api,
            session: Session::new(),
            chat: None,
            chat_history: Vec::new(),
        }
    }

    pub fn with_chat(mut self, chat: Option<ChatClient>) -> Self {
        self.chat = chat;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn chat_history(&self) -> &[ChatMessage] {
        &self.chat_history
    }

    pub fn register(&self, username: &str, password: &str) -> Notice {
        if username.is_empty() || password.is_empty() {
            return Notice::Error(MSG_MUST_FILL.into());
        }
        let req = RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        match self.api.register(&req) {
            Err(e) => transport_error(e),
            Ok(res) if res.is_ok() => {
                info!(username, "user registered");
                Notice::Success(MSG_REGISTERED.into())
            }
            Ok(res) => Notice::Error(format!(
                "An error occurred while registering the user: {}",
                res.body
            )),
        }
    }

    /// Session state changes only when the backend answers 200 with the
    /// exact success message.
    pub fn login(&mut self, username: &str, password: &str) -> Notice {
        if username.is_empty() || password.is_empty() {
            return Notice::Error(MSG_MUST_FILL.into());
        }
        let creds = Credentials::new(username, password);
        let res = match self.api.login(&creds) {
            Ok(res) => res,
            Err(e) => return transport_error(e),
        };
        if !res.is_ok() {
            return Notice::Error(format!("Login failed: {}", res.body));
        }

        let body: LoginResponse = res.json().unwrap_or_default();
        if body.message.as_deref() == Some(LOGIN_SUCCESS_MESSAGE) {
            info!(username, "logged in");
            self.session.sign_in(creds, body.user_id);
            Notice::Success(MSG_LOGGED_IN.into())
        } else {
            warn!(username, "login answered 200 without success message");
            Notice::Error(MSG_LOGIN_REJECTED.into())
        }
    }

    pub fn predict(&self, req: &PredictionRequest) -> Notice {
        let Some(creds) = self.session.credentials() else {
            return Notice::Warning(MSG_LOGIN_FIRST.into());
        };
        let res = match self.api.predict(creds, req) {
            Ok(res) => res,
            Err(e) => return transport_error(e),
        };
        if !res.is_ok() {
            return Notice::Error(format!("{}: {}", MSG_PREDICT_FAILED, res.body));
        }

        let body = body_json(&res);
        match body.get("Risk_Flag") {
            Some(flag) => Notice::Success(format!("Predicted Risk Flag: {}", display_value(flag))),
            None => Notice::Error(detail_or(&body, MSG_PREDICT_FAILED)),
        }
    }

    pub fn logs(&self) -> Notice {
        let Some(creds) = self.session.credentials() else {
            return Notice::Warning(MSG_LOGIN_FIRST.into());
        };
        let res = match self.api.logs(creds) {
            Ok(res) => res,
            Err(e) => return transport_error(e),
        };
        if !res.is_ok() {
            return Notice::Error(format!("{}: {}", MSG_LOGS_FAILED, res.body));
        }

        match body_json(&res) {
            Value::Array(records) => Notice::Table(LogTable::from_records(&records)),
            other => Notice::Error(detail_or(&other, MSG_LOGS_FAILED)),
        }
    }

    /// Send one message to the assistant. The exchange is appended to the
    /// history only when a reply arrives.
    pub fn chat(&mut self, message: &str) -> Notice {
        let Some(client) = &self.chat else {
            return Notice::Warning(MSG_CHAT_UNAVAILABLE.into());
        };
        let message = message.trim();
        if message.is_empty() {
            return Notice::Error(MSG_EMPTY_MESSAGE.into());
        }

        let mut history = self.chat_history.clone();
        history.push(ChatMessage::user(message));
        match client.complete(&history) {
            Ok(reply) => {
                history.push(ChatMessage::assistant(reply.clone()));
                self.chat_history = history;
                Notice::Info(reply)
            }
            Err(e) => {
                warn!(error = %e, "chat completion failed");
                Notice::Error(e.to_string())
            }
        }
    }
}
