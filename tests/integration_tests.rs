use std::io::Write;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use quotament::clipboard::{Clipboard, MemoryClipboard};
use quotament::generator::QuoteSource;
use quotament::screen::{QuoteScreen, TOAST_COPIED, TOAST_COPY_FAILED};
use quotament::{
  Credential, EndpointVariant, Error, QuotamentConfig, QuoteBackend
};

const TEST_KEY: &str = "test-key";

struct BrokenClipboard;

impl Clipboard for BrokenClipboard
{   fn write_text(&self, _text: &str) -> Result<(), Error>
    {   Err(Error::Clipboard("denied".to_string()))
    }
}

async fn mock_gemini(server: &MockServer, key: &str, quote: &str)
{   Mock::given(method("GET"))
      .and(path("/v1/models"))
      .and(query_param("key", key))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "models": [{ "name": "models/gemini-2.5-flash" }]
      })))
      .mount(server)
      .await;

    Mock::given(method("POST"))
      .and(path("/v1/models/gemini-2.5-flash:generateContent"))
      .and(query_param("key", key))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{ "content": { "parts": [{ "text": quote }] } }]
      })))
      .mount(server)
      .await;
}

fn config_for(server: &MockServer) -> QuotamentConfig
{   QuotamentConfig::default().with_provider_host(server.uri())
}

#[tokio::test]
async fn test_backend_initialization()
{   let server = MockServer::start().await;
    let backend = assert_ok!(QuoteBackend::new(config_for(&server)));
    println!("Backend created successfully");

    assert_ok!(backend.shutdown().await);
}

#[tokio::test]
async fn test_backend_discovers_then_generates()
{   let server = MockServer::start().await;
    mock_gemini(&server, TEST_KEY, "small steps build lasting change.").await;

    let backend = assert_ok!(QuoteBackend::new(
      config_for(&server).with_credential(TEST_KEY)
    ));

    let found = assert_ok!(backend.discovery().await);
    assert_eq!(found.variant, EndpointVariant::Stable);
    assert_eq!(found.model, "gemini-2.5-flash");

    let outcome = assert_ok!(backend.generate().await);
    assert_eq!(outcome.text, "Small steps build lasting change");
    assert_eq!(outcome.source, QuoteSource::Generated { attempt: 0 });

    assert_ok!(backend.shutdown().await);
}

#[tokio::test]
async fn test_generate_queued_before_discovery_waits_for_it()
{   let server = MockServer::start().await;
    mock_gemini(&server, TEST_KEY, "small steps build lasting change.").await;

    let backend = assert_ok!(QuoteBackend::new(
      config_for(&server).with_credential(TEST_KEY)
    ));

    // no explicit discovery() call first
    let outcome = assert_ok!(backend.generate().await);
    assert!(!outcome.is_fallback());

    assert_ok!(backend.shutdown().await);
}

#[tokio::test]
async fn test_missing_credential_blocks_generate()
{   let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(200))
      .expect(0)
      .mount(&server)
      .await;

    let backend = assert_ok!(QuoteBackend::new(config_for(&server)));

    let err = assert_err!(backend.discovery().await);
    assert_eq!(err, Error::MissingCredential);
    assert!(err.is_terminal());

    let err = assert_err!(backend.generate().await);
    assert_eq!(err, Error::NotReady);

    assert_ok!(backend.shutdown().await);
}

#[tokio::test]
async fn test_no_compatible_model_keeps_generate_disabled()
{   let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "models": [{ "name": "models/gemini-pro" }]
      })))
      .expect(2)
      .mount(&server)
      .await;
    Mock::given(method("POST"))
      .respond_with(ResponseTemplate::new(200))
      .expect(0)
      .mount(&server)
      .await;

    let backend = assert_ok!(QuoteBackend::new(
      config_for(&server).with_credential(TEST_KEY)
    ));

    assert_eq!(backend.discovery().await, Err(Error::NoCompatibleModel));
    assert_eq!(backend.generate().await, Err(Error::NotReady));
    assert_eq!(backend.generate().await, Err(Error::NotReady));

    assert_ok!(backend.shutdown().await);
}

#[tokio::test]
async fn test_set_credential_rediscovers()
{   let server = MockServer::start().await;
    mock_gemini(&server, "second-key", "quiet minds build loud futures").await;

    let backend = assert_ok!(QuoteBackend::new(config_for(&server)));
    assert_err!(backend.discovery().await);

    let found = assert_ok!(
      backend.set_credential(Credential::new("second-key")).await
    );
    assert_eq!(found.model, "gemini-2.5-flash");
    assert_eq!(backend.discovery().await, Ok(found));

    let outcome = assert_ok!(backend.generate().await);
    assert_eq!(outcome.text, "Quiet minds build loud futures");

    assert_ok!(backend.shutdown().await);
}

#[tokio::test]
async fn test_invalid_configuration_rejected()
{   let mut config = QuotamentConfig::default();
    config.generation.temperatures = vec![0.7, 3.5];
    assert!(matches!(
      QuoteBackend::new(config),
      Err(Error::InvalidConfiguration(_))
    ));

    let mut config = QuotamentConfig::default();
    config.provider.variants.clear();
    assert!(config.validate().is_err());
}

#[test]
fn test_more_than_one_retry_rejected()
{   let mut config = QuotamentConfig::default();
    config.generation.temperatures = vec![0.7, 0.5, 0.3, 0.1];
    assert!(matches!(
      config.validate(),
      Err(Error::InvalidConfiguration(_))
    ));

    config.generation.temperatures = vec![0.9];
    assert_ok!(config.validate());
}

#[tokio::test]
async fn test_blank_credential_in_config_is_missing()
{   let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(200))
      .expect(0)
      .mount(&server)
      .await;

    for blank in ["", "   "]
    {   let config: QuotamentConfig = assert_ok!(serde_json::from_value(
          json!({
            "credential": blank,
            "provider": { "host": server.uri() }
          })
        ));
        assert!(config.credential.is_none());

        let backend = assert_ok!(QuoteBackend::new(config));
        assert_eq!(
          backend.discovery().await,
          Err(Error::MissingCredential)
        );
        assert_eq!(backend.generate().await, Err(Error::NotReady));
        assert_ok!(backend.shutdown().await);
    }
}

#[test]
fn test_blank_credential_never_deserializes()
{   assert_err!(serde_json::from_str::<Credential>(r#""""#));
    assert_err!(serde_json::from_str::<Credential>(r#"" \t ""#));

    let credential: Credential
      = assert_ok!(serde_json::from_str(r#""abc""#));
    assert_eq!(credential.as_str(), "abc");
    assert_eq!(
      assert_ok!(serde_json::to_string(&credential)),
      r#""abc""#
    );
}

#[tokio::test]
async fn test_screen_flow()
{   let server = MockServer::start().await;
    mock_gemini(&server, TEST_KEY, "grow slowly, but grow anyway.").await;

    let backend = assert_ok!(QuoteBackend::new(
      config_for(&server).with_credential(TEST_KEY)
    ));
    let mut screen = QuoteScreen::new();
    assert_eq!(screen.subtitle(), "Discovering models…");
    assert_eq!(screen.generate_label(), "Waiting…");
    assert!(!screen.generate_enabled());

    screen.on_discovery(&backend.discovery().await);
    assert_eq!(screen.subtitle(), "powered by: gemini-2.5-flash");
    assert_eq!(screen.generate_label(), "Generate");
    assert_eq!(screen.display_quote(), "Press Generate");
    assert!(!screen.copy_enabled());

    screen.generate(&backend).await;
    assert_eq!(screen.display_quote(), "Grow slowly but grow anyway");
    assert!(screen.error.is_none());
    assert!(screen.copy_enabled());

    let clipboard = MemoryClipboard::new();
    screen.copy(&clipboard);
    assert_eq!(
      clipboard.contents().as_deref(),
      Some("Grow slowly but grow anyway")
    );
    assert_eq!(screen.visible_toast(), Some(TOAST_COPIED));

    screen.copy(&BrokenClipboard);
    assert_eq!(screen.visible_toast(), Some(TOAST_COPY_FAILED));
    assert_eq!(screen.display_quote(), "Grow slowly but grow anyway");

    assert_ok!(backend.shutdown().await);
}

#[tokio::test]
async fn test_screen_shows_fallback_with_error()
{   let server = MockServer::start().await;
    mock_gemini(&server, TEST_KEY, "hi").await;

    let backend = assert_ok!(QuoteBackend::new(
      config_for(&server).with_credential(TEST_KEY)
    ));
    let mut screen = QuoteScreen::new();
    screen.on_discovery(&backend.discovery().await);

    screen.generate(&backend).await;
    assert_eq!(screen.display_quote(), "Create boldly iterate daily");
    assert_eq!(
      screen.error.as_deref(),
      Some("Model returned incomplete/invalid line twice")
    );
    assert!(!screen.loading);

    assert_ok!(backend.shutdown().await);
}

#[tokio::test]
async fn test_screen_not_ready()
{   let mut screen = QuoteScreen::new();
    screen.on_discovery(&Err(Error::MissingCredential));

    assert_eq!(screen.subtitle(), "Model not ready");
    assert_eq!(screen.generate_label(), "Waiting…");
    assert!(!screen.begin_generate());
    assert_eq!(
      screen.error,
      Some(Error::NotReady.to_string())
    );

    let clipboard = MemoryClipboard::new();
    screen.copy(&clipboard);
    assert_eq!(clipboard.contents(), None);
    assert_eq!(screen.visible_toast(), None);
}

#[test]
fn test_config_from_json_file()
{   let mut path = std::env::temp_dir();
    path.push(format!("quotament-config-{}.json", std::process::id()));
    let mut file = std::fs::File::create(&path).expect("temp file");
    write!(file, "{}", json!({
      "credential": "file-key",
      "provider": { "variants": ["/v1beta"] },
      "generation": { "temperatures": [0.9] }
    })).expect("write");

    let config = QuotamentConfig::from_json_file(&path).expect("config");
    let _ = std::fs::remove_file(&path);

    assert_eq!(
      config.credential.as_ref().map(|c| c.as_str()),
      Some("file-key")
    );
    assert_eq!(config.provider.variants, vec![EndpointVariant::Beta]);
    assert_eq!(config.generation.temperatures, vec![0.9]);
    assert_eq!(config.generation.max_output_tokens, 24);
    assert_eq!(config.widget.copied_reset_ms, 1200);
}

#[test]
fn test_config_missing_file_is_configuration_error()
{   let result = QuotamentConfig::from_json_file(
      "/nonexistent/quotament.json"
    );
    assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
}

#[test]
fn test_credential_debug_redacted()
{   let credential = Credential::new("super-secret").expect("credential");
    assert_eq!(format!("{:?}", credential), "Credential(***)");
    assert!(Credential::new("   ").is_none());
}

#[tokio::test]
#[ignore]
async fn test_live_generate()
{   let config = QuotamentConfig::from_env();
    if config.credential.is_none()
    {   println!("Skipping: GEMINI_API_KEY not set");
        return;
    }

    let backend = assert_ok!(QuoteBackend::new(config));
    match backend.discovery().await
    {   Ok(found) => {
          println!("Discovered {} on {}", found.model, found.variant);
        }
      , Err(e) => {
          println!("Discovery failed: {}", e);
          let _ = backend.shutdown().await;
          return;
        }
    }

    match tokio::time::timeout(
      std::time::Duration::from_secs(30),
      backend.generate()
    ).await
    {   Ok(Ok(outcome)) => {
          println!("Quote: {} ({:?})", outcome.text, outcome.source);
          assert!(!outcome.text.is_empty());
        }
      , Ok(Err(e)) => {
          println!("Generate error: {}", e);
        }
      , Err(_) => {
          println!("Timeout waiting for quote");
        }
    }

    let _ = backend.shutdown().await;
}
