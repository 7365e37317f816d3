//! 46elks client against a wiremock server: paths, basic auth, and form fields.

use reqwest::{StatusCode, Url};
use ringback::config::Settings;
use ringback::outreach::{self, MessageKind};
use ringback::provider::{ElksClient, ProviderError, Telephony};
use std::collections::HashMap;
use std::path::PathBuf;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// base64("u123:secret")
const BASIC_AUTH: &str = "Basic dTEyMzpzZWNyZXQ=";

fn settings(server: &MockServer) -> Settings {
    Settings {
        username: "u123".to_string(),
        password: "secret".to_string(),
        number: "+46700000000".to_string(),
        public_url: Url::parse("https://relay.example.com/").unwrap(),
        api_base: Url::parse(&format!("{}/a1/", server.uri())).unwrap(),
        static_dir: PathBuf::from("static"),
    }
}

async fn form_of_single_request(server: &MockServer) -> HashMap<String, String> {
    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1, "expected exactly one provider request");
    serde_urlencoded::from_bytes(&requests[0].body).expect("form body")
}

#[tokio::test]
async fn send_sms_posts_form_with_basic_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/a1/sms"))
        .and(header("authorization", BASIC_AUTH))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status":"created"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let client = ElksClient::new(&settings(&server));
    let res = outreach::send_permission_request(&client, "+46711111111")
        .await
        .expect("sms accepted");
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, r#"{"status":"created"}"#);

    let form = form_of_single_request(&server).await;
    assert_eq!(form["from"], "+46700000000");
    assert_eq!(form["to"], "+46711111111");
    assert_eq!(form["message"], outreach::PERMISSION_REQUEST_TEXT);
}

#[tokio::test]
async fn place_call_sends_voice_start_and_hangup_callback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/a1/calls"))
        .and(header("authorization", BASIC_AUTH))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let settings = settings(&server);
    let client = ElksClient::new(&settings);
    outreach::send_call(&client, &settings.public_url, "+46711111111", MessageKind::Someone1)
        .await
        .expect("call accepted");

    let form = form_of_single_request(&server).await;
    assert_eq!(form["from"], "+46700000000");
    assert_eq!(form["to"], "+46711111111");
    let voice_start: serde_json::Value =
        serde_json::from_str(&form["voice_start"]).expect("voice_start is JSON");
    assert_eq!(
        voice_start["play"],
        "https://relay.example.com/static/audio/someone1.mp3"
    );
    assert_eq!(
        form["whenhangup"],
        "https://relay.example.com/sms/final?to=%2B46711111111"
    );
}

#[tokio::test]
async fn non_success_status_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/a1/sms"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let client = ElksClient::new(&settings(&server));
    let err = client
        .send_sms("+46711111111", "hej")
        .await
        .expect_err("401 must fail");
    match err {
        ProviderError::Api { status, body } => {
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body, "Unauthorized");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn unreachable_provider_is_request_error() {
    let server = MockServer::start().await;
    let mut settings = settings(&server);
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind free port");
        listener.local_addr().expect("local_addr").port()
    };
    settings.api_base = Url::parse(&format!("http://127.0.0.1:{}/a1/", port)).unwrap();

    let client = ElksClient::new(&settings);
    let err = client
        .send_sms("+46711111111", "hej")
        .await
        .expect_err("connection must fail");
    assert!(matches!(err, ProviderError::Request(_)), "got {:?}", err);
}
