// Shared primitives for one-time server bootstrapping across integration tests.
#![allow(dead_code)]

use std::{
    path::PathBuf,
    // `Arc` shares data between threads; `OnceLock` writes a value only once.
    sync::{Arc, OnceLock},
    // Sleep durations are used in readiness polling loops.
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use audioflow_server::Settings;
use audioflow_server::domain::init_data::InitData;
use audioflow_server::use_cases::MalformedRangePolicy;

pub const BOT_TOKEN: &str = "123456:INTEGRATION-TOKEN";
pub const AUDIO_FILE: &str = "chapter-01.mp3";
pub const AUDIO_LEN: usize = 20_000;
const TEST_USER_JSON: &str = concat!(
    r#"{"id":279058397,"first_name":"Vladislav","#,
    r#""username":"vdkfrost","language_code":"ru"}"#,
);

// Global base URL used by all tests after the server publishes its bound address.
static SERVER_URL: OnceLock<String> = OnceLock::new();
// One-time guard that ensures the server bootstrap path runs only once.
static SERVER_READY: OnceLock<()> = OnceLock::new();

// Deterministic bytes written to the audio fixture.
pub fn audio_fixture() -> Vec<u8> {
    (0..AUDIO_LEN).map(|i| (i % 251) as u8).collect()
}

// Init data for a fixed test user, signed with the server's bot token.
pub fn signed_init_data(bot_token: &str) -> String {
    let auth_date = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock after epoch")
        .as_secs()
        .to_string();
    InitData::from_fields([
        ("auth_date", auth_date.as_str()),
        ("query_id", "AAHdF6IQAAAAAN0XohDhrOrc"),
        ("user", TEST_USER_JSON),
    ])
    .signed(bot_token)
    .to_query_string()
}

// Ensure the test server is running and return the shared base URL.
pub fn ensure_server() -> &'static str {
    // Run initialization exactly once even if multiple tests call this function.
    SERVER_READY.get_or_init(|| {
        let settings = test_settings();
        // Local one-time slot where the server thread publishes its selected URL.
        let published_url = Arc::new(OnceLock::<String>::new());
        let published_url_thread = Arc::clone(&published_url);
        // Spawn an OS thread so the server outlives individual `#[tokio::test]` runtimes.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            runtime.block_on(async move {
                // Bind to an ephemeral port to avoid collisions with local services.
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                let addr = listener.local_addr().expect("get local addr");
                let _ = published_url_thread.set(format!("http://{}", addr));
                // Start serving requests until the test process exits.
                audioflow_server::run(listener, settings)
                    .await
                    .expect("server failed");
            });
        });
        // Block until URL is published and the bound port starts accepting connections.
        wait_for_server_url_and_readiness(published_url);
    });

    SERVER_URL
        .get()
        .expect("server url should be initialized")
        .as_str()
}

// Settings pointing at a fresh audio directory with one fixture file.
fn test_settings() -> Settings {
    let audio_dir: PathBuf =
        std::env::temp_dir().join(format!("audioflow-it-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&audio_dir).expect("create audio dir");
    std::fs::write(audio_dir.join(AUDIO_FILE), audio_fixture()).expect("write audio fixture");

    Settings {
        host: "127.0.0.1".parse().expect("valid host"),
        port: 0,
        bot_token: BOT_TOKEN.to_string(),
        init_data_max_age_seconds: 86_400,
        session_ttl_seconds: 3600,
        audio_dir,
        malformed_range: MalformedRangePolicy::Reject,
        database_url: None,
    }
}

// Wait for URL publication and then wait for the server socket to accept TCP connections.
fn wait_for_server_url_and_readiness(published_url: Arc<OnceLock<String>>) {
    let base_url = loop {
        if let Some(url) = published_url.get() {
            break url.clone();
        }
        std::thread::sleep(Duration::from_millis(10));
    };

    let _ = SERVER_URL.set(base_url.clone());

    let addr = base_url
        .strip_prefix("http://")
        .expect("base url should use http://");

    // Retry for a short period to avoid racing server bind/accept.
    for _ in 0..100 {
        if std::net::TcpStream::connect(addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    panic!("server did not become ready in time");
}
