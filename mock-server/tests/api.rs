use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Echo};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

// --- ok ---

#[tokio::test]
async fn ok_returns_empty_json_object() {
    let resp = app().oneshot(get("/ok")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[http::header::CONTENT_TYPE], "application/json");
    assert_eq!(&body_bytes(resp).await[..], b"{}");
}

// --- cookies ---

#[tokio::test]
async fn cookies_sends_two_set_cookie_headers() {
    let resp = app().oneshot(get("/cookies")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let cookies: Vec<&str> = resp
        .headers()
        .get_all(http::header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap())
        .collect();
    assert_eq!(cookies, ["a=1", "b=2"]);
}

// --- redirects ---

#[tokio::test]
async fn redirect_points_to_ok() {
    let resp = app().oneshot(get("/redirect")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers()[http::header::LOCATION], "/ok");
}

#[tokio::test]
async fn redirect_accepts_any_method() {
    let request = Request::builder()
        .method(http::Method::POST)
        .uri("/redirect")
        .body("x".to_string())
        .unwrap();
    let resp = app().oneshot(request).await.unwrap();

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers()[http::header::LOCATION], "/ok");
}

#[tokio::test]
async fn redirect_loop_points_to_itself() {
    let resp = app().oneshot(get("/redirect-loop")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers()[http::header::LOCATION], "/redirect-loop");
}

// --- status ---

#[tokio::test]
async fn status_echoes_requested_code() {
    for code in [201u16, 404, 500, 599] {
        let resp = app()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/status/{code}"))
                    .body(String::new())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), code);
    }
}

#[tokio::test]
async fn status_rejects_non_numeric_code() {
    let resp = app().oneshot(get("/status/abc")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- echo ---

#[tokio::test]
async fn echo_reflects_method_headers_and_body() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/echo")
                .header("x-tag", "a")
                .header("x-tag", "b")
                .body(r#"{"k":1}"#.to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "PATCH");
    assert_eq!(echo.body, r#"{"k":1}"#);
    let tags: Vec<&str> = echo
        .headers
        .iter()
        .filter(|(name, _)| name == "x-tag")
        .map(|(_, value)| value.as_str())
        .collect();
    assert_eq!(tags, ["a", "b"]);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let resp = app().oneshot(get("/nope")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
