//! End-to-end tests against a local mock of the captcha service.
//!
//! Starts an axum server on a random port that speaks the `in.php` /
//! `res.php` text protocol and drives the real reqwest transport through it.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use api2captcha::{
    ApiError, CaptchaClient, CaptchaError, ImageCaptcha, Proxy, ProxyType, ReCaptcha, Request,
};
use axum::{
    Router,
    extract::{FromRequest, Multipart, Query, State},
    extract::{Form, Request as AxumRequest},
    http::{StatusCode, header::CONTENT_TYPE},
    routing::{get, post},
};
use tokio::net::TcpListener;
use url::Url;

const API_KEY: &str = "secret";

#[derive(Debug, Clone)]
struct Upload {
    file_name: Option<String>,
    contents: Vec<u8>,
}

#[derive(Debug, Default)]
struct Recorded {
    submissions: Vec<HashMap<String, String>>,
    uploads: Vec<HashMap<String, Upload>>,
    polls: Vec<HashMap<String, String>>,
    /// Answers handed out to successive `action=get` polls; the last repeats.
    answers: Vec<(u16, &'static str)>,
}

type Shared = Arc<Mutex<Recorded>>;

fn app(state: Shared) -> Router {
    Router::new()
        .route("/in.php", post(submit))
        .route("/res.php", get(result))
        .with_state(state)
}

async fn submit(State(state): State<Shared>, request: AxumRequest) -> (StatusCode, String) {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"));

    let mut params = HashMap::new();
    let mut uploads = HashMap::new();

    if is_multipart {
        let mut multipart = Multipart::from_request(request, &()).await.unwrap();
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);
            let contents = field.bytes().await.unwrap().to_vec();
            if file_name.is_some() {
                uploads.insert(name, Upload { file_name, contents });
            } else {
                params.insert(name, String::from_utf8(contents).unwrap());
            }
        }
    } else {
        let Form(form) = Form::<HashMap<String, String>>::from_request(request, &())
            .await
            .unwrap();
        params = form;
    }

    let authorized = params.get("key").map(String::as_str) == Some(API_KEY);
    let mut recorded = state.lock().unwrap();
    recorded.submissions.push(params);
    recorded.uploads.push(uploads);

    if authorized {
        (StatusCode::OK, "OK|55667".to_string())
    } else {
        (StatusCode::OK, "ERROR_WRONG_USER_KEY".to_string())
    }
}

async fn result(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    if params.get("key").map(String::as_str) != Some(API_KEY) {
        return (StatusCode::OK, "ERROR_KEY_DOES_NOT_EXIST".to_string());
    }

    let action = params.get("action").cloned().unwrap_or_default();
    match action.as_str() {
        "getbalance" => (StatusCode::OK, "12.34567".to_string()),
        "get" => {
            let mut recorded = state.lock().unwrap();
            let index = recorded.polls.len();
            recorded.polls.push(params);
            let (status, body) = recorded
                .answers
                .get(index)
                .or(recorded.answers.last())
                .copied()
                .unwrap_or((200, "CAPCHA_NOT_READY"));
            (StatusCode::from_u16(status).unwrap(), body.to_string())
        }
        _ => (StatusCode::OK, "ERROR_WRONG_ACTION".to_string()),
    }
}

async fn start_server(answers: Vec<(u16, &'static str)>) -> (String, Shared) {
    let state: Shared = Arc::new(Mutex::new(Recorded {
        answers,
        ..Recorded::default()
    }));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = app(state.clone());
    tokio::spawn(async move { axum::serve(listener, router).await });

    (format!("http://{addr}"), state)
}

fn client(base_url: &str, key: &str) -> CaptchaClient {
    CaptchaClient::builder(key)
        .with_base_url(base_url)
        .with_timeout(Duration::from_secs(5))
        .with_recaptcha_timeout(Duration::from_secs(5))
        .with_polling_interval(Duration::from_millis(20))
        .build()
        .unwrap()
}

fn temp_image(name: &str, contents: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!("{}-{name}", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[tokio::test]
async fn recaptcha_is_solved_after_pending_polls() {
    let (base_url, state) = start_server(vec![
        (200, "CAPCHA_NOT_READY"),
        (200, "CAPCHA_NOT_READY"),
        (200, "OK|abcdef"),
    ])
    .await;

    let request = ReCaptcha::new("site-key", Url::parse("https://example.com/form").unwrap())
        .invisible()
        .to_request()
        .unwrap()
        .with_proxy(&Proxy::new(ProxyType::Http, "user:pass@127.0.0.1:3128"));

    let token = client(&base_url, API_KEY).solve(request).await.unwrap();

    assert_eq!(token, "abcdef");
    let recorded = state.lock().unwrap();
    let submission = &recorded.submissions[0];
    assert_eq!(submission["method"], "userrecaptcha");
    assert_eq!(submission["googlekey"], "site-key");
    assert_eq!(submission["pageurl"], "https://example.com/form");
    assert_eq!(submission["invisible"], "1");
    assert_eq!(submission["proxytype"], "HTTP");
    assert_eq!(submission["key"], API_KEY);
    assert_eq!(recorded.polls.len(), 3);
    assert!(recorded.polls.iter().all(|poll| poll["id"] == "55667"));
}

#[tokio::test]
async fn image_is_uploaded_as_multipart() {
    let (base_url, state) = start_server(vec![(200, "OK|W9H5K")]).await;
    let path = temp_image("captcha.png", b"\x89PNG fake image");

    let token = client(&base_url, API_KEY)
        .solve(ImageCaptcha::new(&path).case_sensitive().to_request())
        .await
        .unwrap();

    assert_eq!(token, "W9H5K");
    let recorded = state.lock().unwrap();
    assert_eq!(recorded.submissions[0]["method"], "post");
    assert_eq!(recorded.submissions[0]["regsense"], "1");
    assert_eq!(recorded.submissions[0]["key"], API_KEY);
    let upload = &recorded.uploads[0]["file"];
    assert_eq!(
        upload.file_name.as_deref(),
        path.file_name().and_then(|name| name.to_str())
    );
    assert_eq!(upload.contents, b"\x89PNG fake image");
    drop(recorded);

    std::fs::remove_file(path).unwrap();
}

#[tokio::test]
async fn every_attachment_gets_its_own_part() {
    let (base_url, state) = start_server(vec![(200, "OK|grid")]).await;
    let image = temp_image("grid.jpg", b"grid image bytes");
    let instructions = temp_image("hint.png", b"hint image bytes");

    let request = Request::with_method("post")
        .file("file", &image)
        .file("imginstructions", &instructions);
    let token = client(&base_url, API_KEY).solve(request).await.unwrap();

    assert_eq!(token, "grid");
    let recorded = state.lock().unwrap();
    let uploads = &recorded.uploads[0];
    assert_eq!(uploads.len(), 2);

    let file = &uploads["file"];
    assert_eq!(file.file_name.as_deref(), image.file_name().and_then(|name| name.to_str()));
    assert_eq!(file.contents, b"grid image bytes");

    let hint = &uploads["imginstructions"];
    assert_eq!(
        hint.file_name.as_deref(),
        instructions.file_name().and_then(|name| name.to_str())
    );
    assert_eq!(hint.contents, b"hint image bytes");
    assert_eq!(recorded.submissions[0]["method"], "post");
    drop(recorded);

    std::fs::remove_file(image).unwrap();
    std::fs::remove_file(instructions).unwrap();
}

#[tokio::test]
async fn wrong_key_fails_before_polling() {
    let (base_url, state) = start_server(vec![(200, "OK|never")]).await;

    let err = client(&base_url, "wrong")
        .solve(Request::with_method("post").param("body", "aGVsbG8="))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CaptchaError::Api(ApiError::Service(ref code)) if code == "ERROR_WRONG_USER_KEY"
    ));
    assert!(state.lock().unwrap().polls.is_empty());
}

#[tokio::test]
async fn missing_attachment_is_never_sent() {
    let (base_url, state) = start_server(vec![]).await;

    let err = client(&base_url, API_KEY)
        .solve(ImageCaptcha::new("/no/such/dir/captcha.png").to_request())
        .await
        .unwrap_err();

    assert!(matches!(err, CaptchaError::Attachment { .. }));
    assert!(state.lock().unwrap().submissions.is_empty());
}

#[tokio::test]
async fn server_error_status_aborts_polling() {
    let (base_url, state) = start_server(vec![
        (200, "CAPCHA_NOT_READY"),
        (503, "OK|ignored"),
    ])
    .await;

    let err = client(&base_url, API_KEY)
        .solve(Request::with_method("post"))
        .await
        .unwrap_err();

    assert!(matches!(err, CaptchaError::Api(ApiError::Status(503))));
    assert_eq!(state.lock().unwrap().polls.len(), 2);
}

#[tokio::test]
async fn balance_is_parsed() {
    let (base_url, _state) = start_server(vec![]).await;

    let balance = client(&base_url, API_KEY).get_balance().await.unwrap();

    assert_eq!(balance, 12.34567);
}

#[tokio::test]
async fn unreachable_service_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{addr}"), API_KEY)
        .solve(Request::with_method("post"))
        .await
        .unwrap_err();

    assert!(err.is_network());
}
