/*!
 * Tests for application configuration functionality
 */

use docpair::app_config::{Config, LogLevel, ProviderConfig, TranslationProvider};

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.translation.provider, TranslationProvider::OpenAI);
    assert_eq!(config.translation.get_model(), "gpt-4-1106-preview");
    assert_eq!(config.translation.get_endpoint(), "https://api.openai.com/v1");
    assert_eq!(config.translation.common.concurrent_requests, 1);
    assert_eq!(config.translation.common.temperature, None);
    assert_eq!(config.translation.get_timeout_secs(), 120);
    assert_eq!(config.log_level, LogLevel::Info);

    for provider in [TranslationProvider::OpenAI, TranslationProvider::Anthropic, TranslationProvider::Ollama] {
        assert!(config.translation.get_provider_config(&provider).is_some());
    }
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    config.translation.active_provider_config_mut().api_key = "sk-test".to_string();
    assert!(config.validate().is_ok());

    config.translation.common.concurrent_requests = 0;
    assert!(config.validate().is_err());
    config.translation.common.concurrent_requests = 4;
    assert!(config.validate().is_ok());

    // Ollama needs no key
    config.translation.provider = TranslationProvider::Ollama;
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_validation_withoutApiKey_shouldFailForHostedProvider() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Anthropic;
    config.translation.active_provider_config_mut().api_key.clear();

    // Only meaningful when the environment does not provide a key
    if std::env::var("ANTHROPIC_API_KEY").is_err() {
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
    }
}

#[test]
fn test_providerConfig_withMissingFields_shouldUseDefaults() {
    let json = r#"{
        "translation": {
            "provider": "ollama",
            "available_providers": [ { "type": "ollama", "endpoint": "http://gpu-box:11434" } ],
            "common": { "concurrent_requests": 3, "temperature": 0.2 }
        },
        "log_level": "debug"
    }"#;
    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.translation.provider, TranslationProvider::Ollama);
    assert_eq!(config.translation.get_model(), "llama3.1");
    assert_eq!(config.translation.get_endpoint(), "http://gpu-box:11434");
    assert_eq!(config.translation.get_timeout_secs(), 120);
    assert_eq!(config.translation.common.concurrent_requests, 3);
    assert_eq!(config.translation.common.temperature, Some(0.2));
    assert_eq!(config.log_level, LogLevel::Debug);
}

#[test]
fn test_activeProviderConfigMut_withMissingEntry_shouldCreateIt() {
    let mut config = Config::default();
    config.translation.available_providers.clear();
    config.translation.provider = TranslationProvider::Anthropic;

    config.translation.active_provider_config_mut().model = "claude-custom".to_string();

    assert_eq!(config.translation.available_providers.len(), 1);
    assert_eq!(config.translation.get_model(), "claude-custom");
    assert_eq!(config.translation.get_endpoint(), ProviderConfig::new(TranslationProvider::Anthropic).endpoint);
}

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaultConfig() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("conf.json");

    let created = Config::load_or_create(&path).unwrap();
    assert!(path.exists());

    let loaded = Config::load_or_create(&path).unwrap();
    assert_eq!(loaded.translation.provider, created.translation.provider);
    assert_eq!(loaded.translation.available_providers.len(), 3);
}

#[test]
fn test_loadOrCreate_withInvalidJson_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("conf.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(Config::load_or_create(&path).is_err());
}

#[test]
fn test_translationProvider_parsing_shouldBeCaseInsensitive() {
    assert_eq!("OpenAI".parse::<TranslationProvider>().unwrap(), TranslationProvider::OpenAI);
    assert_eq!("ollama".parse::<TranslationProvider>().unwrap(), TranslationProvider::Ollama);
    assert!("lmstudio".parse::<TranslationProvider>().is_err());
    assert_eq!(TranslationProvider::Anthropic.to_string(), "anthropic");
}
