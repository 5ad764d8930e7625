//! Integration tests for the user and session repositories.

use chrono::{Duration, Utc};
use plexus_db::models::session::CreateSession;
use plexus_db::models::user::CreateUser;
use plexus_db::repositories::{SessionRepo, UserRepo};
use sqlx::PgPool;

fn new_user(email: &str) -> CreateUser {
    CreateUser {
        name: "Test User".to_string(),
        email: email.to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
    }
}

fn new_session(user_id: i64, hash: &str, expires_in: Duration) -> CreateSession {
    CreateSession {
        user_id,
        session_token_hash: hash.to_string(),
        expires_at: Utc::now() + expires_in,
        user_agent: Some("tests".to_string()),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_by_email_is_case_insensitive(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("Ada@Example.com")).await.unwrap();

    let found = UserRepo::find_by_email(&pool, "ada@EXAMPLE.com")
        .await
        .unwrap()
        .expect("user should be found");
    assert_eq!(found.id, user.id);
    assert_eq!(found.email, "Ada@Example.com", "stored casing is preserved");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_violates_unique_index(pool: PgPool) {
    UserRepo::create(&pool, &new_user("dup@example.com")).await.unwrap();

    let err = UserRepo::create(&pool, &new_user("DUP@example.com"))
        .await
        .expect_err("second signup must fail");

    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
            assert_eq!(db_err.constraint(), Some("uq_users_email_lower"));
        }
        other => panic!("expected a database error, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_session_lifecycle(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("s@example.com")).await.unwrap();
    SessionRepo::create(&pool, &new_session(user.id, "hash-1", Duration::hours(24)))
        .await
        .unwrap();

    let active = SessionRepo::find_active_by_token_hash(&pool, "hash-1")
        .await
        .unwrap()
        .expect("session should be active");
    assert_eq!(active.user_id, user.id);

    assert!(SessionRepo::revoke_by_token_hash(&pool, "hash-1").await.unwrap());
    assert!(!SessionRepo::revoke_by_token_hash(&pool, "hash-1").await.unwrap());
    assert!(SessionRepo::find_active_by_token_hash(&pool, "hash-1")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_expired_session_is_not_active_and_gets_cleaned_up(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("old@example.com")).await.unwrap();
    SessionRepo::create(&pool, &new_session(user.id, "stale", Duration::hours(-1)))
        .await
        .unwrap();
    SessionRepo::create(&pool, &new_session(user.id, "fresh", Duration::hours(1)))
        .await
        .unwrap();

    assert!(SessionRepo::find_active_by_token_hash(&pool, "stale")
        .await
        .unwrap()
        .is_none());

    let removed = SessionRepo::cleanup_expired(&pool).await.unwrap();
    assert_eq!(removed, 1);
    assert!(SessionRepo::find_active_by_token_hash(&pool, "fresh")
        .await
        .unwrap()
        .is_some());
}
