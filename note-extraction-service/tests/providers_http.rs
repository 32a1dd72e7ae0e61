use note_extraction_service::providers::azure::AzureOpenAiProvider;
use note_extraction_service::providers::groq::GroqProvider;
use note_extraction_service::{
    build_prompt, CompletionProvider, NoteError, ProviderConfig, EXTRACTION_INSTRUCTIONS,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [ { "message": { "role": "assistant", "content": content } } ]
    })
}

fn groq_config(api_url: String) -> ProviderConfig {
    ProviderConfig::Groq {
        api_key: "test-key".to_string(),
        model: "llama-3.3-70b-versatile".to_string(),
        api_url,
    }
}

fn azure_config(endpoint: String) -> ProviderConfig {
    ProviderConfig::AzureOpenAi {
        api_key: "azure-key".to_string(),
        endpoint,
        deployment: "note-gpt4".to_string(),
        api_version: "2024-02-15-preview".to_string(),
    }
}

#[tokio::test]
async fn groq_sends_bearer_auth_and_one_user_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("the record")))
        .expect(1)
        .mount(&server)
        .await;

    let provider =
        GroqProvider::new(&groq_config(format!("{}/chat/completions", server.uri()))).unwrap();
    let completion = provider
        .complete(&build_prompt("Patient reports headache"))
        .await
        .unwrap();
    assert_eq!(completion, "the record");

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();

    assert_eq!(body["model"], "llama-3.3-70b-versatile");
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1, "groq variant sends a single message");
    assert_eq!(messages[0]["role"], "user");
    let content = messages[0]["content"].as_str().unwrap();
    assert!(content.starts_with("You are a clinical note formatter."));
    assert!(content.ends_with("Here is the doctor note:\nPatient reports headache"));
}

#[tokio::test]
async fn azure_sends_api_key_header_and_system_plus_user_messages() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/openai/deployments/note-gpt4/chat/completions"))
        .and(query_param("api-version", "2024-02-15-preview"))
        .and(header("api-key", "azure-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("the record")))
        .expect(1)
        .mount(&server)
        .await;

    let provider = AzureOpenAiProvider::new(&azure_config(server.uri())).unwrap();
    let completion = provider
        .complete(&build_prompt("Patient reports headache"))
        .await
        .unwrap();
    assert_eq!(completion, "the record");

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();

    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[0]["content"], EXTRACTION_INSTRUCTIONS);
    assert_eq!(messages[1]["role"], "user");
    // The note goes out untouched by the extraction template.
    assert_eq!(messages[1]["content"], "Patient reports headache");
}

#[tokio::test]
async fn non_success_status_surfaces_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model overloaded"))
        .mount(&server)
        .await;

    let provider = GroqProvider::new(&groq_config(format!("{}/v1", server.uri()))).unwrap();
    let err = provider.complete(&build_prompt("note")).await.unwrap_err();

    match err {
        NoteError::Provider { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "model overloaded");
        }
        other => panic!("expected Provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn transport_failure_is_a_network_error() {
    let provider =
        GroqProvider::new(&groq_config("http://127.0.0.1:9/chat".to_string())).unwrap();
    let err = provider.complete(&build_prompt("note")).await.unwrap_err();
    assert!(matches!(err, NoteError::Network(_)));
}

#[tokio::test]
async fn missing_credentials_fail_at_request_time() {
    let provider = GroqProvider::new(&ProviderConfig::Groq {
        api_key: String::new(),
        model: "m".to_string(),
        api_url: "http://127.0.0.1:9/chat".to_string(),
    })
    .unwrap();
    let err = provider.complete(&build_prompt("note")).await.unwrap_err();
    assert!(matches!(err, NoteError::Config(_)));

    let provider = AzureOpenAiProvider::new(&ProviderConfig::AzureOpenAi {
        api_key: String::new(),
        endpoint: String::new(),
        deployment: String::new(),
        api_version: "2024-02-15-preview".to_string(),
    })
    .unwrap();
    let err = provider.complete(&build_prompt("note")).await.unwrap_err();
    assert!(matches!(err, NoteError::Config(_)));
}

#[tokio::test]
async fn empty_choices_is_a_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
        .mount(&server)
        .await;

    let provider = GroqProvider::new(&groq_config(format!("{}/v1", server.uri()))).unwrap();
    let err = provider.complete(&build_prompt("note")).await.unwrap_err();

    match err {
        NoteError::Provider { body, .. } => assert!(body.contains("no choices")),
        other => panic!("expected Provider error, got {other:?}"),
    }
}
