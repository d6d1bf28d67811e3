/*!
 * Tests for the batch translation client
 */

use std::sync::Arc;

use polyko::app_config::TranslationConfig;
use polyko::errors::ProviderError;
use polyko::translation::TranslationClient;
use polyko::translation::prompts::PromptLibrary;

use crate::common::mock_providers::MockChatProvider;

fn client_over(provider: Arc<MockChatProvider>) -> TranslationClient {
    let config = TranslationConfig::default();
    TranslationClient::new(provider, &config, PromptLibrary::empty().system_prompt())
}

fn titles(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[tokio::test]
async fn test_translateBatch_withCompleteResponse_shouldMapEveryTitle() {
    let provider = Arc::new(MockChatProvider::new());
    provider.push_response("1. 비트코인이 오를까?\n2. 금리가 내릴까?");
    let client = client_over(provider.clone());

    let result = client
        .translate_batch(&titles(&["Will Bitcoin rise?", "Will rates fall?"]))
        .await
        .unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result["Will Bitcoin rise?"], "비트코인이 오를까?");
    assert_eq!(result["Will rates fall?"], "금리가 내릴까?");
    assert_eq!(provider.tracker().lock().unwrap().call_count, 1);
}

#[tokio::test]
async fn test_translateBatch_withMissingLine_shouldFallBackToSourceTitle() {
    let provider = Arc::new(MockChatProvider::new());
    provider.push_response("1. 하나뿐인 번역");
    let client = client_over(provider);

    let result = client
        .translate_batch(&titles(&["First title?", "Second title?"]))
        .await
        .unwrap();

    assert_eq!(result["First title?"], "하나뿐인 번역");
    // Silent degradation: the missing line keeps the source text
    assert_eq!(result["Second title?"], "Second title?");
}

#[tokio::test]
async fn test_translateBatch_shouldRunCorrectionPipelineOnEachResult() {
    let provider = Arc::new(MockChatProvider::new());
    provider.push_response("1. 엘론 머스크가 오전 4시에 이길까?");
    let client = client_over(provider);

    let result = client
        .translate_batch(&titles(&["Will Elon Musk win at 4AM ET?"]))
        .await
        .unwrap();

    // Glossary fix plus timezone injection
    assert_eq!(
        result["Will Elon Musk win at 4AM ET?"],
        "일론 머스크가 오전 4시 ET에 이길까?"
    );
}

#[tokio::test]
async fn test_translateBatch_withProviderError_shouldPropagateFailure() {
    let provider = Arc::new(MockChatProvider::new());
    provider.push_failure(ProviderError::RequestFailed("connection reset".into()));
    let client = client_over(provider);

    let result = client.translate_batch(&titles(&["Some title?"])).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_translateBatch_withEmptyInput_shouldNotCallProvider() {
    let provider = Arc::new(MockChatProvider::new());
    let client = client_over(provider.clone());

    let result = client.translate_batch(&[]).await.unwrap();

    assert!(result.is_empty());
    assert_eq!(provider.tracker().lock().unwrap().call_count, 0);
}

#[tokio::test]
async fn test_translateBatch_withChatterAroundLines_shouldStillParse() {
    let provider = Arc::new(MockChatProvider::new());
    provider.push_response("번역 결과:\n\n1. 첫 번째 번역\n\n이상입니다.");
    let client = client_over(provider);

    let result = client.translate_batch(&titles(&["First?"])).await.unwrap();
    assert_eq!(result["First?"], "첫 번째 번역");
}

#[tokio::test]
async fn test_translateBatch_withEchoProvider_shouldEnumerateAllTitles() {
    let provider = Arc::new(MockChatProvider::new());
    let client = client_over(provider);

    let input = titles(&["Alpha?", "Beta?", "Gamma?"]);
    let result = client.translate_batch(&input).await.unwrap();

    assert_eq!(result.len(), 3);
    for title in &input {
        assert_eq!(result[title], format!("{} [ko]", title));
    }
}
