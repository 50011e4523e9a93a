//! End-to-end session flow over a real listener, driven by a cookie-aware client.

use anyhow::{anyhow, Context, Result};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use sessiongate::{
    api::{
        app,
        handlers::auth::{hash_password, AuthConfig, AuthState, TokenSigner},
    },
    store::MemoryStore,
    users::{MemoryUserStore, User},
};
use std::sync::Arc;
use tokio::{net::TcpListener, task::JoinHandle};
use uuid::Uuid;

struct Server {
    base_url: String,
    handle: JoinHandle<()>,
}

impl Drop for Server {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn spawn_server() -> Result<Server> {
    let users = Arc::new(MemoryUserStore::new());
    users
        .insert(User {
            id: Uuid::new_v4(),
            email: "user@example.com".to_string(),
            password_hash: hash_password("secret1").map_err(|err| anyhow!("{err}"))?,
            name: "Test User".to_string(),
        })
        .await;

    let state = Arc::new(AuthState::new(
        AuthConfig::new().with_session_ttl_seconds(300),
        TokenSigner::new(b"integration-secret"),
        Arc::new(MemoryStore::new()),
        users,
    ));

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let router = app(state);
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, router.into_make_service()).await;
    });

    Ok(Server {
        base_url: format!("http://{addr}"),
        handle,
    })
}

fn client() -> Result<Client> {
    Client::builder()
        .cookie_store(true)
        .build()
        .context("failed to build client")
}

#[tokio::test]
async fn browser_style_session_lifecycle() -> Result<()> {
    let server = spawn_server().await?;
    let client = client()?;
    let url = |path: &str| format!("{}{path}", server.base_url);

    let response = client.get(url("/health-check")).send().await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = client
        .post(url("/sign-in"))
        .json(&json!({ "email": "user@example.com", "password": "secret1" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body["message"], "Login successful");

    let response = client.get(url("/health-check")).send().await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = client.get(url("/me")).send().await?;
    assert_eq!(response.status(), StatusCode::OK);
    let me: Value = response.json().await?;
    assert_eq!(me["email"], "user@example.com");
    assert_eq!(me["userId"], body["userId"]);

    let response = client.get(url("/fetch-online-users")).send().await?;
    let online: Value = response.json().await?;
    assert_eq!(online["onlineUsers"].as_array().map(Vec::len), Some(1));

    let response = client.post(url("/logout")).send().await?;
    assert_eq!(response.status(), StatusCode::OK);

    // The clearing cookie removed the session from the client jar.
    let response = client.get(url("/health-check")).send().await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "Unauthorized - no session");
    Ok(())
}

#[tokio::test]
async fn separate_clients_hold_separate_sessions() -> Result<()> {
    let server = spawn_server().await?;
    let url = |path: &str| format!("{}{path}", server.base_url);
    let first = client()?;
    let second = client()?;

    for client in [&first, &second] {
        let response = client
            .post(url("/sign-in"))
            .json(&json!({ "email": "user@example.com", "password": "secret1" }))
            .send()
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = first.post(url("/logout")).send().await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = second.get(url("/health-check")).send().await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = second.get(url("/fetch-online-users")).send().await?;
    let online: Value = response.json().await?;
    assert_eq!(online["onlineUsers"].as_array().map(Vec::len), Some(1));
    Ok(())
}
