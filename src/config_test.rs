use super::*;

/// # Safety
/// Tests must run with `--test-threads=1` to avoid env races.
unsafe fn clear_server_env() {
    unsafe {
        std::env::remove_var("PORT");
        std::env::remove_var("SITE_DIR");
        std::env::remove_var("CHAT_UPSTREAM_URL");
        std::env::remove_var("CHAT_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("CHAT_CONNECT_TIMEOUT_SECS");
    }
}

// Env-driven cases share one test so they cannot race each other.
#[test]
fn from_env_cases() {
    unsafe { clear_server_env() };
    assert_eq!(ServerConfig::from_env().unwrap(), ServerConfig::default());

    unsafe {
        std::env::set_var("PORT", "8080");
        std::env::set_var("SITE_DIR", "/srv/site");
        std::env::set_var("CHAT_UPSTREAM_URL", "https://chat.example.test/ask");
        std::env::set_var("CHAT_REQUEST_TIMEOUT_SECS", "30");
        std::env::set_var("CHAT_CONNECT_TIMEOUT_SECS", "3");
    }
    let cfg = ServerConfig::from_env().unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.site_dir, Some(PathBuf::from("/srv/site")));
    assert_eq!(cfg.chat_upstream.as_deref(), Some("https://chat.example.test/ask"));
    assert_eq!(cfg.upstream_request_secs, 30);
    assert_eq!(cfg.upstream_connect_secs, 3);

    unsafe {
        clear_server_env();
        std::env::set_var("SITE_DIR", "  ");
        std::env::set_var("CHAT_UPSTREAM_URL", "");
    }
    let cfg = ServerConfig::from_env().unwrap();
    assert!(cfg.site_dir.is_none());
    assert!(cfg.chat_upstream.is_none());

    unsafe { std::env::set_var("PORT", "eighty") };
    let err = ServerConfig::from_env().unwrap_err().to_string();
    assert!(err.contains("invalid PORT"));

    unsafe { clear_server_env() };
}
