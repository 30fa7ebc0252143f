// API client module: a small blocking HTTP client for the prediction
// backend. Authenticated calls take the caller's `Credentials` and send
// them as basic auth; the client itself holds no user state.

use crate::error::Result;
use crate::session::Credentials;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Blocking client bound to one backend base URL for the process lifetime.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

/// Registration payload.
#[derive(Serialize, Deserialize, Debug)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// Body of a 200 login response. Both fields are optional so that a
/// response missing `message` is reported as a failed login rather than a
/// parse error.
#[derive(Deserialize, Debug, Default)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user_id: Option<serde_json::Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    Married,
    Single,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HouseOwnership {
    Rented,
    NorentNoown,
    Owned,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CarOwnership {
    No,
    Yes,
}

impl MaritalStatus {
    pub const ALL: [MaritalStatus; 2] = [MaritalStatus::Married, MaritalStatus::Single];

    pub fn as_str(self) -> &'static str {
        match self {
            MaritalStatus::Married => "married",
            MaritalStatus::Single => "single",
        }
    }
}

impl HouseOwnership {
    pub const ALL: [HouseOwnership; 3] = [
        HouseOwnership::Rented,
        HouseOwnership::NorentNoown,
        HouseOwnership::Owned,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HouseOwnership::Rented => "rented",
            HouseOwnership::NorentNoown => "norent_noown",
            HouseOwnership::Owned => "owned",
        }
    }
}

impl CarOwnership {
    pub const ALL: [CarOwnership; 2] = [CarOwnership::No, CarOwnership::Yes];

    pub fn as_str(self) -> &'static str {
        match self {
            CarOwnership::No => "no",
            CarOwnership::Yes => "yes",
        }
    }
}

/// The eleven applicant fields posted to `/predict`. Field names on the
/// wire follow the backend's training data columns.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PredictionRequest {
    #[serde(rename = "Income")]
    pub income: u64,
    #[serde(rename = "Age")]
    pub age: u32,
    #[serde(rename = "Experience")]
    pub experience: u32,
    #[serde(rename = "Married_Single")]
    pub married_single: MaritalStatus,
    #[serde(rename = "House_Ownership")]
    pub house_ownership: HouseOwnership,
    #[serde(rename = "Car_Ownership")]
    pub car_ownership: CarOwnership,
    #[serde(rename = "Profession")]
    pub profession: String,
    #[serde(rename = "CITY")]
    pub city: String,
    #[serde(rename = "STATE")]
    pub state: String,
    #[serde(rename = "CURRENT_JOB_YRS")]
    pub current_job_yrs: u32,
    #[serde(rename = "CURRENT_HOUSE_YRS")]
    pub current_house_yrs: u32,
}

/// Status and raw body of a backend response. The shell decides what a
/// given status/body combination means.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    /// The backend signals success with exactly 200.
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

impl ApiClient {
    /// Create a client for the given backend base URL. No request timeout
    /// is set beyond the HTTP client's default.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Reuse an existing HTTP client, e.g. the one used for discovery.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        ApiClient { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn send(&self, req: RequestBuilder, endpoint: &str) -> Result<ApiResponse> {
        let res = req.send()?;
        let status = res.status();
        let body = res.text()?;
        debug!(endpoint, %status, "backend responded");
        Ok(ApiResponse { status, body })
    }

    /// POST /register with a JSON body.
    pub fn register(&self, req: &RegisterRequest) -> Result<ApiResponse> {
        let builder = self.client.post(self.url("register")).json(req);
        self.send(builder, "register")
    }

    /// POST /login with basic auth and no body.
    pub fn login(&self, creds: &Credentials) -> Result<ApiResponse> {
        let builder = self
            .client
            .post(self.url("login"))
            .basic_auth(&creds.username, Some(&creds.password));
        self.send(builder, "login")
    }

    /// POST /predict with basic auth and the applicant fields as JSON.
    pub fn predict(&self, creds: &Credentials, req: &PredictionRequest) -> Result<ApiResponse> {
        let builder = self
            .client
            .post(self.url("predict"))
            .basic_auth(&creds.username, Some(&creds.password))
            .json(req);
        self.send(builder, "predict")
    }

    /// GET /log with basic auth.
    pub fn logs(&self, creds: &Credentials) -> Result<ApiResponse> {
        let builder = self
            .client
            .get(self.url("log"))
            .basic_auth(&creds.username, Some(&creds.password));
        self.send(builder, "log")
    }
}
