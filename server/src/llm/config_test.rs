use super::*;
use crate::state::test_helpers::env_lock;

/// # Safety
/// Callers must hold [`env_lock`].
unsafe fn clear_llm_env() {
    unsafe {
        std::env::remove_var("LLM_MODEL");
        std::env::remove_var("LLM_API_KEY_ENV");
        std::env::remove_var("LLM_BASE_URL");
        std::env::remove_var("LLM_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("LLM_CONNECT_TIMEOUT_SECS");
        std::env::remove_var("GROQ_API_KEY");
        std::env::remove_var("TEST_LLM_KEY");
    }
}

#[test]
fn from_env_defaults_to_groq() {
    let _guard = env_lock();
    unsafe {
        clear_llm_env();
        std::env::set_var("GROQ_API_KEY", "gsk-test");
    }

    let cfg = LlmConfig::from_env().unwrap();
    assert_eq!(cfg.api_key, "gsk-test");
    assert_eq!(cfg.model, DEFAULT_LLM_MODEL);
    assert_eq!(cfg.base_url, DEFAULT_LLM_BASE_URL);
    assert_eq!(
        cfg.timeouts,
        LlmTimeouts { request_secs: DEFAULT_LLM_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_LLM_CONNECT_TIMEOUT_SECS }
    );

    unsafe { clear_llm_env() };
}

#[test]
fn from_env_parses_overrides() {
    let _guard = env_lock();
    unsafe {
        clear_llm_env();
        std::env::set_var("LLM_API_KEY_ENV", "TEST_LLM_KEY");
        std::env::set_var("TEST_LLM_KEY", "sk-test");
        std::env::set_var("LLM_MODEL", "gpt-4o-mini");
        std::env::set_var("LLM_BASE_URL", "https://example.test/v1/");
        std::env::set_var("LLM_REQUEST_TIMEOUT_SECS", "42");
        std::env::set_var("LLM_CONNECT_TIMEOUT_SECS", "7");
    }

    let cfg = LlmConfig::from_env().unwrap();
    assert_eq!(cfg.api_key, "sk-test");
    assert_eq!(cfg.model, "gpt-4o-mini");
    assert_eq!(cfg.base_url, "https://example.test/v1");
    assert_eq!(cfg.timeouts, LlmTimeouts { request_secs: 42, connect_secs: 7 });

    unsafe { clear_llm_env() };
}

#[test]
fn from_env_missing_key_errors() {
    let _guard = env_lock();
    unsafe { clear_llm_env() };

    let err = LlmConfig::from_env().unwrap_err();
    assert!(matches!(err, LlmError::MissingApiKey { ref var } if var == "GROQ_API_KEY"));
}

#[test]
fn from_env_bad_timeout_falls_back_to_default() {
    let _guard = env_lock();
    unsafe {
        clear_llm_env();
        std::env::set_var("GROQ_API_KEY", "gsk-test");
        std::env::set_var("LLM_REQUEST_TIMEOUT_SECS", "soon");
    }

    let cfg = LlmConfig::from_env().unwrap();
    assert_eq!(cfg.timeouts.request_secs, DEFAULT_LLM_REQUEST_TIMEOUT_SECS);

    unsafe { clear_llm_env() };
}
