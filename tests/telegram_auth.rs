mod support;

use serde_json::{Value, json};

#[tokio::test]
async fn test_telegram_login_issues_token_that_verifies() {
    let base_url = support::ensure_server();
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{base_url}/api/auth/telegram"))
        .json(&json!({ "initData": support::signed_init_data(support::BOT_TOKEN) }))
        .send()
        .await
        .expect("request should succeed");
    assert_eq!(res.status(), reqwest::StatusCode::OK);

    let login: Value = res.json().await.expect("login body");
    assert_eq!(login["token_type"], "bearer");
    assert_eq!(login["user"]["telegram_id"], 279058397);
    assert_eq!(login["user"]["username"], "vdkfrost");
    assert_eq!(login["user"]["language_code"], "ru");
    let token = login["access_token"].as_str().expect("access token");

    let res = client
        .post(format!("{base_url}/api/auth/verify-token"))
        .json(&json!({ "token": token }))
        .send()
        .await
        .expect("request should succeed");
    assert_eq!(res.status(), reqwest::StatusCode::OK);

    let verified: Value = res.json().await.expect("verify body");
    assert_eq!(verified["telegram_id"], 279058397);
    assert_eq!(verified["expires_at"], login["expires_at"]);
}

#[tokio::test]
async fn test_telegram_login_rejects_foreign_signature() {
    let base_url = support::ensure_server();
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{base_url}/api/auth/telegram"))
        .json(&json!({ "initData": support::signed_init_data("654321:OTHER-BOT") }))
        .send()
        .await
        .expect("request should succeed");

    assert_eq!(res.status(), reqwest::StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.expect("error body");
    assert_eq!(body["message"], "invalid authentication data");
}

#[tokio::test]
async fn test_logout_revokes_session() {
    let base_url = support::ensure_server();
    let client = reqwest::Client::new();

    let login: Value = client
        .post(format!("{base_url}/api/auth/telegram"))
        .json(&json!({ "initData": support::signed_init_data(support::BOT_TOKEN) }))
        .send()
        .await
        .expect("request should succeed")
        .json()
        .await
        .expect("login body");
    let token = login["access_token"].as_str().expect("access token");

    let logout: Value = client
        .post(format!("{base_url}/api/auth/logout"))
        .json(&json!({ "token": token }))
        .send()
        .await
        .expect("request should succeed")
        .json()
        .await
        .expect("logout body");
    assert_eq!(logout["revoked"], true);

    let res = client
        .post(format!("{base_url}/api/auth/verify-token"))
        .json(&json!({ "token": token }))
        .send()
        .await
        .expect("request should succeed");
    assert_eq!(res.status(), reqwest::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_reports_service() {
    let base_url = support::ensure_server();

    let body: Value = reqwest::get(format!("{base_url}/health"))
        .await
        .expect("request should succeed")
        .json()
        .await
        .expect("health body");

    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "AudioFlow API");
}
