use crate::e2e::helpers;

use helpers::TestContext;
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use speech_gateway::domain::recognition::Recognition;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_recognize_audio_file(ctx: &TestContext) {
    ctx.put_sound("calls/42/answer.wav", b"RIFF").await.unwrap();

    let response = ctx
        .client
        .post("/recognize", &json!({"file_path": "calls/42/answer.wav"}))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.field("text"), Some("Sí, soy yo"));
    assert_eq!(ctx.speech.languages(), vec!["es-MX".to_string()]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_accept_language_in_query_string(ctx: &TestContext) {
    ctx.put_sound("answer.wav", b"RIFF").await.unwrap();

    let response = ctx
        .client
        .post_query("/recognize?file_path=answer.wav&language=en-US")
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(ctx.speech.languages(), vec!["en-US".to_string()]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_null_when_nothing_was_heard(ctx: &TestContext) {
    ctx.put_sound("silence.wav", b"RIFF").await.unwrap();
    ctx.speech.respond_with(Recognition::NoMatch("InitialSilenceTimeout".to_string()));

    let response = ctx
        .client
        .post("/recognize", &json!({"file_path": "silence.wav"}))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body, Some(serde_json::Value::Null));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_not_found_for_missing_audio(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/recognize", &json!({"file_path": "nope.wav"}))
        .await
        .unwrap();

    response.assert_status(StatusCode::NOT_FOUND);
    assert!(ctx.speech.languages().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_paths_outside_sounds_dir(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/recognize", &json!({"file_path": "../../etc/passwd"}))
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_transcribe_and_correct_with_whisper(ctx: &TestContext) {
    ctx.put_sound("calls/42/date.wav", b"RIFF").await.unwrap();

    let response = ctx
        .client
        .post(
            "/recognize/whisper",
            &json!({"file_path": "calls/42/date", "model": "date-parser"}),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.field("text"), Some("2026/10/31"));
    assert_eq!(ctx.whisper.calls(), vec!["transcribe".to_string()]);

    let completions = ctx.whisper.completions();
    assert_eq!(completions.len(), 1);
    assert_eq!(completions[0].model, "ft:date-parser");
    assert!(completions[0].content.ends_with(", in two weeks"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_translate_non_english_audio(ctx: &TestContext) {
    ctx.put_sound("calls/42/who.ogg", b"OggS").await.unwrap();

    let response = ctx
        .client
        .post(
            "/recognize/whisper",
            &json!({
                "file_path": "calls/42/who",
                "file_format": "ogg",
                "model": "user-correspond",
                "language": "Spanish"
            }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.field("text"), Some("True"));
    assert_eq!(
        ctx.whisper.calls(),
        vec!["translate: The input audio is in Spanish. Translate into english".to_string()]
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_raw_transcript_for_unknown_profile(ctx: &TestContext) {
    ctx.put_sound("note.wav", b"RIFF").await.unwrap();

    let response = ctx
        .client
        .post("/recognize/whisper", &json!({"file_path": "note", "model": "free-form"}))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.field("text"), Some("in two weeks"));
    assert!(ctx.whisper.completions().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_not_found_for_missing_whisper_audio(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/recognize/whisper", &json!({"file_path": "missing", "model": "date-parser"}))
        .await
        .unwrap();

    response.assert_status(StatusCode::NOT_FOUND);
    assert!(ctx.whisper.calls().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_recognize_with_google_in_colombian_spanish(ctx: &TestContext) {
    ctx.put_sound("calls/7/answer.wav", b"RIFF").await.unwrap();

    let response = ctx
        .client
        .post_query("/recognize/google?file_path=calls/7/answer.wav")
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.field("text"), Some("Sí, soy yo"));
    assert_eq!(ctx.google.languages(), vec!["es-CO".to_string()]);
    assert!(ctx.speech.languages().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_missing_file_path(ctx: &TestContext) {
    let response = ctx.client.post_query("/recognize?language=es-MX").await.unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("file_path");
}
