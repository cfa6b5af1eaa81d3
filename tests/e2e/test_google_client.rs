use pretty_assertions::assert_eq;
use serde_json::json;
use speech_gateway::domain::recognition::Recognition;
use speech_gateway::infrastructure::repositories::{
    GoogleSpeechRepository, ServiceAccountKey, SpeechRepository,
};
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PRIVATE_KEY: &str = include_str!("fixtures/service_account_key.pem");
const RECOGNIZE_PATH: &str = "/v1/speech:recognize";

fn credentials(server: &MockServer) -> ServiceAccountKey {
    ServiceAccountKey {
        client_email: "speech@gateway-test.iam.gserviceaccount.com".to_string(),
        private_key: PRIVATE_KEY.to_string(),
        token_uri: format!("{}/token", server.uri()),
    }
}

async fn mount_token(server: &MockServer, calls: u64) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer"))
        .and(body_string_contains("assertion="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ya29.test-token",
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .expect(calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn it_should_recognize_with_service_account_token() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    Mock::given(method("POST"))
        .and(path(RECOGNIZE_PATH))
        .and(header("authorization", "Bearer ya29.test-token"))
        .and(body_partial_json(json!({
            "config": {"languageCode": "es-CO"},
            "audio": {"content": "UklGRg=="}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"alternatives": [{"transcript": "sí soy yo", "confidence": 0.93}]}
            ]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let repo = GoogleSpeechRepository::with_base_url(server.uri(), credentials(&server)).unwrap();

    for _ in 0..2 {
        let result = repo.recognize(b"RIFF".to_vec(), "audio/wav", "es-CO").await.unwrap();
        assert_eq!(result, Recognition::Recognized("sí soy yo".to_string()));
    }
}

#[tokio::test]
async fn it_should_report_empty_results_as_no_match() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    Mock::given(method("POST"))
        .and(path(RECOGNIZE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let repo = GoogleSpeechRepository::with_base_url(server.uri(), credentials(&server)).unwrap();
    let result = repo.recognize(b"RIFF".to_vec(), "audio/wav", "es-CO").await.unwrap();

    assert!(matches!(result, Recognition::NoMatch(_)));
}

#[tokio::test]
async fn it_should_fail_when_token_exchange_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_grant"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(RECOGNIZE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let repo = GoogleSpeechRepository::with_base_url(server.uri(), credentials(&server)).unwrap();
    let error = repo
        .recognize(b"RIFF".to_vec(), "audio/wav", "es-CO")
        .await
        .unwrap_err();

    assert!(error.contains("invalid_grant"), "unexpected error: {}", error);
}
