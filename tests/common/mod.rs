#![allow(dead_code)]

use credit_risk_cli::api::{CarOwnership, HouseOwnership, MaritalStatus, PredictionRequest};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// The blocking HTTP client must not run on the async test runtime's
/// worker threads, so every shell interaction goes through this.
pub async fn blocking<T, F>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .expect("blocking task panicked")
}

/// Basic auth header value for alice:secret.
pub const ALICE_AUTH: &str = "Basic YWxpY2U6c2VjcmV0";

pub fn sample_request() -> PredictionRequest {
    PredictionRequest {
        income: 1_303_834,
        age: 23,
        experience: 3,
        married_single: MaritalStatus::Single,
        house_ownership: HouseOwnership::Rented,
        car_ownership: CarOwnership::No,
        profession: "Mechanical_engineer".into(),
        city: "Rewa".into(),
        state: "Madhya_Pradesh".into(),
        current_job_yrs: 3,
        current_house_yrs: 13,
    }
}

/// Mount a /login mock that accepts alice:secret.
pub async fn mount_successful_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(header("authorization", ALICE_AUTH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "Login successful", "user_id": 7})),
        )
        .mount(server)
        .await;
}

/// Mount a catch-all that fails the test if any request is made.
pub async fn expect_no_requests(server: &MockServer) {
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

/// A port with nothing listening on it.
pub fn refused_uri() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    format!("http://{}", listener.local_addr().unwrap())
}

/// Serve a single successful login, then stop listening. Later requests
/// to the returned URI are refused.
pub fn single_login_backend() -> (String, std::thread::JoinHandle<()>) {
    use std::io::{Read, Write};

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    let handle = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let body = r#"{"message":"Login successful","user_id":7}"#;
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).unwrap();
    });
    (uri, handle)
}
