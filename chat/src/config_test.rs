use super::*;

/// # Safety
/// Tests must run with `--test-threads=1` to avoid env races.
unsafe fn clear_chat_env() {
    unsafe {
        std::env::remove_var("CHAT_SERVER_ADDRESS");
        std::env::remove_var("CHAT_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("CHAT_CONNECT_TIMEOUT_SECS");
        std::env::remove_var("CHAT_LINE_FRAMING");
    }
}

// Env-driven cases share one test so they cannot race each other.
#[test]
fn from_env_cases() {
    unsafe { clear_chat_env() };
    let cfg = ChatConfig::from_env().unwrap();
    assert_eq!(cfg.endpoint, None);
    assert_eq!(cfg.timeouts, ChatTimeouts::default());
    assert_eq!(cfg.framing, LineFraming::PerChunk);

    unsafe {
        std::env::set_var("CHAT_SERVER_ADDRESS", " https://chat.example.test/ask ");
        std::env::set_var("CHAT_REQUEST_TIMEOUT_SECS", "42");
        std::env::set_var("CHAT_CONNECT_TIMEOUT_SECS", "7");
        std::env::set_var("CHAT_LINE_FRAMING", "buffered");
    }
    let cfg = ChatConfig::from_env().unwrap();
    assert_eq!(cfg.endpoint.as_deref(), Some("https://chat.example.test/ask"));
    assert_eq!(cfg.timeouts, ChatTimeouts { request_secs: 42, connect_secs: 7 });
    assert_eq!(cfg.framing, LineFraming::Buffered);

    unsafe {
        clear_chat_env();
        std::env::set_var("CHAT_SERVER_ADDRESS", "   ");
        std::env::set_var("CHAT_REQUEST_TIMEOUT_SECS", "soon");
    }
    let cfg = ChatConfig::from_env().unwrap();
    assert_eq!(cfg.endpoint, None);
    assert_eq!(cfg.timeouts.request_secs, DEFAULT_CHAT_REQUEST_TIMEOUT_SECS);

    unsafe { std::env::set_var("CHAT_LINE_FRAMING", "lines") };
    let err = ChatConfig::from_env().unwrap_err().to_string();
    assert!(err.contains("CHAT_LINE_FRAMING"));

    unsafe { clear_chat_env() };
}

#[test]
fn timeouts_convert_to_durations() {
    let t = ChatTimeouts { request_secs: 3, connect_secs: 1 };
    assert_eq!(t.request(), Duration::from_secs(3));
    assert_eq!(t.connect(), Duration::from_secs(1));
}

#[test]
fn builders_override_fields() {
    let cfg = ChatConfig::default().with_endpoint("http://localhost:8000/chat").with_framing(LineFraming::Buffered);
    assert_eq!(cfg.endpoint.as_deref(), Some("http://localhost:8000/chat"));
    assert_eq!(cfg.framing, LineFraming::Buffered);
}
