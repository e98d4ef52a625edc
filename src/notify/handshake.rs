use std::time::Duration;

use super::doubled;

/// Delay before the first registration retry.
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Ceiling on the registration retry delay.
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Register `callback_url` with the game server, retrying until it sticks.
///
/// The leaderboard hears about nothing until this succeeds, so there is no
/// give-up path; whoever spawned the task decides when to abort it.
pub async fn register_with_game_server(
    client: reqwest::Client,
    register_url: String,
    callback_url: String,
) {
    let mut delay = INITIAL_BACKOFF;
    let mut attempt: u32 = 1;
    loop {
        match try_register(&client, &register_url, &callback_url).await {
            Ok(()) => {
                tracing::info!("Registered callback url {} with the game server", callback_url);
                return;
            }
            Err(e) => {
                tracing::warn!(
                    "Callback registration attempt {} failed, retrying in {:?}: {}",
                    attempt,
                    delay,
                    e
                );
                tokio::time::sleep(delay).await;
                delay = doubled(delay, MAX_BACKOFF);
                attempt = attempt.saturating_add(1);
            }
        }
    }
}

async fn try_register(
    client: &reqwest::Client,
    register_url: &str,
    callback_url: &str,
) -> anyhow::Result<()> {
    let response = client
        .post(register_url)
        .form(&[("url", callback_url)])
        .send()
        .await?;
    if !response.status().is_success() {
        anyhow::bail!("game server returned {}", response.status());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Form, Router};
    use serde::Deserialize;
    use tokio::sync::Mutex;

    #[derive(Deserialize)]
    struct RegisterForm {
        url: String,
    }

    #[tokio::test]
    async fn registration_retries_until_the_game_server_accepts() {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen_url = Arc::new(Mutex::new(None::<String>));

        let app = Router::new().route(
            "/client_register",
            post({
                let hits = hits.clone();
                let seen_url = seen_url.clone();
                move |Form(form): Form<RegisterForm>| {
                    let hits = hits.clone();
                    let seen_url = seen_url.clone();
                    async move {
                        // Refuse the first attempt, accept the second.
                        if hits.fetch_add(1, Ordering::SeqCst) == 0 {
                            StatusCode::INTERNAL_SERVER_ERROR
                        } else {
                            *seen_url.lock().await = Some(form.url);
                            StatusCode::OK
                        }
                    }
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        register_with_game_server(
            reqwest::Client::new(),
            format!("http://{}/client_register", addr),
            "http://127.0.0.1:5400/results".to_string(),
        )
        .await;

        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(
            seen_url.lock().await.as_deref(),
            Some("http://127.0.0.1:5400/results")
        );
    }
}
