//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the default
//! ureq-backed client over real HTTP: plain responses, repeated headers,
//! followed redirects, error statuses, request echo, and the failure paths
//! (redirect loop, refused connection).

use std::net::SocketAddr;

use httpc_core::{Client, ClientConfig, Error, Method, Request, RequestOptions};
use mock_server::Echo;

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn client() -> Client {
    Client::with_config(&ClientConfig::default().with_timeout(std::time::Duration::from_secs(10)))
}

#[test]
fn get_ok_returns_json_response() {
    let addr = start_server();
    let mut client = client();

    let response = client
        .get(&format!("http://{addr}/ok"), RequestOptions::new())
        .unwrap();

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.reason_phrase(), "OK");
    assert_eq!(response.headers().first("Content-Type"), Some("application/json"));
    assert_eq!(response.body(), b"{}");
}

#[test]
fn repeated_headers_keep_every_value() {
    let addr = start_server();
    let mut client = client();

    let response = client
        .get(&format!("http://{addr}/cookies"), RequestOptions::new())
        .unwrap();

    assert_eq!(response.headers().get("Set-Cookie").unwrap(), ["a=1", "b=2"]);
    assert_eq!(response.text(), "cookies set");
}

#[test]
fn redirects_are_followed() {
    let addr = start_server();
    let mut client = client();

    let response = client
        .get(&format!("http://{addr}/redirect"), RequestOptions::new())
        .unwrap();

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.body(), b"{}");
}

#[test]
fn redirect_hops_keep_their_headers() {
    let addr = start_server();
    let mut client = client();

    let response = client
        .get(&format!("http://{addr}/redirect"), RequestOptions::new())
        .unwrap();

    assert_eq!(response.headers().first("Location"), Some("/ok"));
    assert_eq!(response.headers().first("Content-Type"), Some("application/json"));
    assert!(response.headers().anonymous().is_empty());
}

#[test]
fn post_redirect_continues_as_get() {
    let addr = start_server();
    let mut client = client();

    let response = client
        .post(&format!("http://{addr}/redirect"), RequestOptions::new().body("x"))
        .unwrap();

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.body(), b"{}");
}

#[test]
fn redirect_loop_is_a_client_error() {
    let addr = start_server();
    let mut client = client();

    let err = client
        .get(&format!("http://{addr}/redirect-loop"), RequestOptions::new())
        .unwrap_err();

    assert!(matches!(err, Error::Client { .. }), "got {err:?}");
    assert_eq!(err.to_string(), "An error occurred while processing the request.");
}

#[test]
fn error_statuses_are_returned_as_responses() {
    let addr = start_server();
    let mut client = client();

    let not_found = client
        .delete(&format!("http://{addr}/status/404"), RequestOptions::new())
        .unwrap();
    assert_eq!(not_found.status_code(), 404);
    assert_eq!(not_found.reason_phrase(), "Not Found");

    let unknown = client
        .get(&format!("http://{addr}/status/599"), RequestOptions::new())
        .unwrap();
    assert_eq!(unknown.status_code(), 599);
    assert_eq!(unknown.reason_phrase(), "");
    assert!(unknown.headers().anonymous().is_empty());
}

#[test]
fn echo_sees_method_headers_and_body() {
    let addr = start_server();
    let mut client = client();

    let options = RequestOptions::new()
        .header("Content-Type", "application/json")
        .header("X-Tag", "a")
        .header("X-Tag", "b")
        .body(r#"{"k":1}"#);
    let response = client
        .post(&format!("http://{addr}/echo"), options)
        .unwrap();
    let echo: Echo = response.json().unwrap();

    assert_eq!(echo.method, "POST");
    assert_eq!(echo.body, r#"{"k":1}"#);
    let tags: Vec<&str> = echo
        .headers
        .iter()
        .filter(|(name, _)| name == "x-tag")
        .map(|(_, value)| value.as_str())
        .collect();
    assert_eq!(tags, ["a", "b"]);
}

#[test]
fn one_client_serves_sequential_requests() {
    let addr = start_server();
    let mut client = client();

    for method in ["POST", "PUT", "PATCH"] {
        let request = Request::new(method, format!("http://{addr}/echo")).with_body("x");
        let echo: Echo = client.send_request(request).unwrap().json().unwrap();
        assert_eq!(echo.method, method);
    }

    let head = client
        .head(&format!("http://{addr}/ok"), RequestOptions::new())
        .unwrap();
    assert_eq!(head.status_code(), 200);
    assert!(head.body().is_empty());

    let request = Request::new(Method::Get, format!("http://{addr}/ok"));
    assert_eq!(client.send_request(request).unwrap().status_code(), 200);
}

#[test]
fn refused_connection_is_a_network_error() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let mut client = client();

    let err = client
        .get(&format!("http://{addr}/ok"), RequestOptions::new())
        .unwrap_err();

    assert!(matches!(err, Error::Network { .. }), "got {err:?}");
    assert_eq!(err.request().unwrap().method, Method::Get);
}
