use lab_generator::{
    GeminiClient, GeminiError, GeneratorConfig, LabError, LabGenerator, RetryPolicy, SamplingConfig, Technology,
    TextModel,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-api-key-123";

fn client_for(server: &MockServer) -> GeminiClient {
    let config = GeneratorConfig::new(API_KEY)
        .with_base_url(server.uri())
        .with_model("gemini-test");
    GeminiClient::new(&config).expect("client")
}

fn text_response(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{
            "content": {"parts": [{"text": text}], "role": "model"},
            "finishReason": "STOP"
        }]
    }))
}

const LAB_JSON: &str = r##"{"title":"Helm hooks in practice","slug":"helm-hooks-in-practice","technology":"helm","difficulty":"medium","description":"Use pre-install hooks.","objectives":["Write a hook"],"steps":[{"title":"Scaffold","content":"helm create demo"}],"files":{"README.md":"# Helm hooks","Chart.yaml":"apiVersion: v2"},"hints":["Check hook weights"],"solution_notes":"Annotate the job."}"##;

#[tokio::test]
async fn sends_prompt_and_sampling_to_model_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-test:generateContent"))
        .and(query_param("key", API_KEY))
        .and(body_partial_json(json!({
            "contents": [{"parts": [{"text": "classify me"}]}],
            "generationConfig": {"maxOutputTokens": 10}
        })))
        .respond_with(text_response("medium"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let text = client.generate("classify me", &SamplingConfig::DIFFICULTY).await.unwrap();
    assert_eq!(text, "medium");
}

#[tokio::test]
async fn non_success_status_is_an_http_error_without_the_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string(format!("quota exceeded for key {API_KEY}")))
        .mount(&server)
        .await;

    let err = client_for(&server).generate("hi", &SamplingConfig::LAB).await.unwrap_err();
    match err {
        GeminiError::Http { status, body } => {
            assert_eq!(status, 429);
            assert!(body.contains("quota exceeded"));
            assert!(!body.contains(API_KEY));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn garbage_envelope_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).generate("hi", &SamplingConfig::LAB).await.unwrap_err();
    assert!(matches!(err, GeminiError::Envelope(_)));
}

#[tokio::test]
async fn generator_produces_lab_through_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-test:generateContent"))
        .and(body_partial_json(json!({"generationConfig": {"maxOutputTokens": 8192}})))
        .respond_with(text_response(&format!("```json\n{LAB_JSON}\n```")))
        .expect(1)
        .mount(&server)
        .await;

    let generator = LabGenerator::new(client_for(&server));
    let lab = generator
        .generate("Helm hooks", "Run jobs around releases", Some(Technology::Helm), &[])
        .await
        .unwrap();

    assert_eq!(lab.slug, "helm-hooks-in-practice");
    assert_eq!(lab.file_names(), vec!["Chart.yaml", "README.md"]);
    assert_eq!(lab.hints, vec!["Check hook weights".to_string()]);
}

#[tokio::test]
async fn generator_surfaces_last_http_error_after_retries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .expect(2)
        .mount(&server)
        .await;

    let policy = RetryPolicy {
        max_attempts: 2,
        min_wait: std::time::Duration::from_millis(1),
        multiplier: std::time::Duration::from_millis(1),
        max_wait: std::time::Duration::from_millis(5),
    };
    let generator = LabGenerator::new(client_for(&server)).with_retry_policy(policy);

    let err = generator
        .generate("T", "S", Some(Technology::Docker), &[])
        .await
        .unwrap_err();
    assert!(matches!(err, LabError::Invocation(GeminiError::Http { status: 500, .. })));
}

#[test]
fn missing_credential_fails_before_any_request() {
    let err = LabGenerator::from_config(&GeneratorConfig::new("")).err().unwrap();
    assert!(matches!(err, LabError::MissingCredential));
}
