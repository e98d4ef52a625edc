use sqlx::{PgPool, Result};
use uuid::Uuid;

use crate::models::{Game, GameStatus, Guess};
use crate::MAX_GUESSES;

// Game queries

pub async fn create_game(
    pool: &PgPool,
    game_id: Uuid,
    username: &str,
    secret_word: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO games (game_id, username, secret_word, guesses_remaining, state)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(game_id)
    .bind(username)
    .bind(secret_word)
    .bind(MAX_GUESSES)
    .bind(GameStatus::InProgress)
    .execute(pool)
    .await?;

    Ok(())
}

/// Fetch a game, scoped to its owner. Returns None when the id exists but
/// belongs to someone else.
pub async fn get_game(pool: &PgPool, game_id: Uuid, username: &str) -> Result<Option<Game>> {
    sqlx::query_as::<_, Game>(
        r#"
        SELECT * FROM games
        WHERE game_id = $1 AND username = $2
        "#,
    )
    .bind(game_id)
    .bind(username)
    .fetch_optional(pool)
    .await
}

pub async fn list_guesses(pool: &PgPool, game_id: Uuid) -> Result<Vec<Guess>> {
    sqlx::query_as::<_, Guess>(
        r#"
        SELECT * FROM guesses
        WHERE game_id = $1
        ORDER BY guess_number
        "#,
    )
    .bind(game_id)
    .fetch_all(pool)
    .await
}

/// Persist one accepted turn: the updated game row and the guess that caused
/// it land together or not at all.
pub async fn persist_turn(
    pool: &PgPool,
    game_id: Uuid,
    guesses_remaining: i16,
    state: GameStatus,
    guess_number: i16,
    word: &str,
) -> Result<()> {
    let mut tx = pool.begin().await?;

    if state.is_terminal() {
        sqlx::query(
            r#"
            UPDATE games
            SET guesses_remaining = $1,
                state = $2,
                finished_at = NOW()
            WHERE game_id = $3
            "#,
        )
        .bind(guesses_remaining)
        .bind(state)
        .bind(game_id)
        .execute(&mut *tx)
        .await?;
    } else {
        sqlx::query(
            r#"
            UPDATE games
            SET guesses_remaining = $1
            WHERE game_id = $2
            "#,
        )
        .bind(guesses_remaining)
        .bind(game_id)
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query(
        r#"
        INSERT INTO guesses (game_id, guess_number, word)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(game_id)
    .bind(guess_number)
    .bind(word)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

pub async fn in_progress_games(pool: &PgPool, username: &str) -> Result<Vec<(Uuid, i16)>> {
    sqlx::query_as::<_, (Uuid, i16)>(
        r#"
        SELECT game_id, guesses_remaining FROM games
        WHERE username = $1 AND state = $2
        ORDER BY created_at
        "#,
    )
    .bind(username)
    .bind(GameStatus::InProgress)
    .fetch_all(pool)
    .await
}

pub async fn state_counts(pool: &PgPool, username: &str) -> Result<Vec<(GameStatus, i64)>> {
    sqlx::query_as::<_, (GameStatus, i64)>(
        r#"
        SELECT state, COUNT(*) FROM games
        WHERE username = $1
        GROUP BY state
        "#,
    )
    .bind(username)
    .fetch_all(pool)
    .await
}

// Callback registry queries

/// Remember a callback URL for completion events. Returns false when the URL
/// was already registered.
pub async fn register_callback(pool: &PgPool, url: &str) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO callback_urls (url)
        VALUES ($1)
        ON CONFLICT (url) DO NOTHING
        "#,
    )
    .bind(url)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

pub async fn callback_urls(pool: &PgPool) -> Result<Vec<String>> {
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT url FROM callback_urls
        ORDER BY registered_at
        "#,
    )
    .fetch_all(pool)
    .await
}
