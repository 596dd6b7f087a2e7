//! Tests for cook session stepping and the session store

use super::*;
use crate::cook::DEFAULT_PERSONALITY;
use crate::error::Error;
use std::sync::Arc;
use std::time::Duration;

fn step(n: usize) -> TimelineStep {
    let start = (n * 60) as f64;
    TimelineStep::new(start, start + 60.0, format!("step {n}"))
}

fn request() -> CookRequest {
    CookRequest::new("risotto", "10001", DEFAULT_PERSONALITY)
}

#[tokio::test]
async fn test_create_starts_at_first_step() {
    let store = InMemoryCookSessionStore::new();
    let id = store.create(vec![step(0), step(1)], request()).await;

    let session = store.get(&id).await.unwrap();
    assert_eq!(session.cursor, 0);
    assert_eq!(session.prompt, "risotto");
    assert_eq!(session.location_key, "10001");
    assert_eq!(session.personality, DEFAULT_PERSONALITY);
    assert_eq!(session.first_step(), Some(&step(0)));
    assert!(id.as_str().starts_with("cook-"));
}

#[tokio::test]
async fn test_peek_first_does_not_move_cursor() {
    let store = InMemoryCookSessionStore::new();
    let id = store.create(vec![step(0), step(1), step(2)], request()).await;

    assert_eq!(store.peek_first(&id).await, Some(step(0)));
    assert_eq!(store.peek_first(&id).await, Some(step(0)));
    assert_eq!(store.get(&id).await.unwrap().cursor, 0);

    // The first advance moves past the step that was already shown
    assert_eq!(store.advance(&id).await.unwrap(), Advance::Step(step(1)));
}

#[tokio::test]
async fn test_advance_two_steps_then_end() {
    let store = InMemoryCookSessionStore::new();
    let id = store.create(vec![step(0), step(1)], request()).await;

    assert_eq!(store.advance(&id).await.unwrap(), Advance::Step(step(1)));
    assert_eq!(store.get(&id).await.unwrap().cursor, 1);

    assert_eq!(store.advance(&id).await.unwrap(), Advance::NoMoreSteps);
    assert_eq!(store.get(&id).await.unwrap().cursor, 1);
}

#[tokio::test]
async fn test_end_of_timeline_is_idempotent() {
    let store = InMemoryCookSessionStore::new();
    let id = store.create(vec![step(0), step(1), step(2)], request()).await;

    store.advance(&id).await.unwrap();
    store.advance(&id).await.unwrap();
    for _ in 0..5 {
        assert_eq!(store.advance(&id).await.unwrap(), Advance::NoMoreSteps);
        assert_eq!(store.get(&id).await.unwrap().cursor, 2);
    }
}

#[tokio::test]
async fn test_empty_timeline_never_fails() {
    let store = InMemoryCookSessionStore::new();
    let id = store.create(Vec::new(), request()).await;

    assert_eq!(store.peek_first(&id).await, None);
    for _ in 0..10 {
        assert_eq!(store.advance(&id).await.unwrap(), Advance::NoMoreSteps);
    }
    assert_eq!(store.get(&id).await.unwrap().cursor, 0);
}

#[tokio::test]
async fn test_single_step_timeline() {
    let store = InMemoryCookSessionStore::new();
    let id = store.create(vec![step(0)], request()).await;

    assert_eq!(store.peek_first(&id).await, Some(step(0)));
    assert_eq!(store.advance(&id).await.unwrap(), Advance::NoMoreSteps);
}

#[tokio::test]
async fn test_unknown_session() {
    let store = InMemoryCookSessionStore::new();
    let id = SessionId::from_string("cook-missing".to_string());

    let err = store.advance(&id).await.unwrap_err();
    assert!(matches!(err, Error::SessionNotFound(ref s) if s == "cook-missing"));
    assert!(store.get(&id).await.is_none());
    assert!(store.peek_first(&id).await.is_none());
}

#[tokio::test]
async fn test_session_ids_are_unique() {
    let store = InMemoryCookSessionStore::new();
    let a = store.create(vec![step(0)], request()).await;
    let b = store.create(vec![step(0)], request()).await;
    assert_ne!(a, b);
    assert_eq!(store.session_count().await, 2);
}

#[tokio::test]
async fn test_purge_expired() {
    let store = InMemoryCookSessionStore::new();
    store.create(vec![step(0)], request()).await;
    store.create(Vec::new(), request()).await;

    assert_eq!(store.purge_expired(Duration::from_secs(3600)).await, 0);
    assert_eq!(store.session_count().await, 2);

    assert_eq!(store.purge_expired(Duration::ZERO).await, 2);
    assert_eq!(store.session_count().await, 0);
}

#[tokio::test]
async fn test_concurrent_advances_are_serialised() {
    let store = Arc::new(InMemoryCookSessionStore::new());
    let timeline: Vec<TimelineStep> = (0..20).map(step).collect();
    let id = store.create(timeline, request()).await;

    let mut handles = Vec::new();
    for _ in 0..19 {
        let store = store.clone();
        let id = id.clone();
        handles.push(tokio::spawn(async move { store.advance(&id).await.unwrap() }));
    }

    let mut seen = Vec::new();
    for handle in handles {
        if let Advance::Step(step) = handle.await.unwrap() {
            seen.push(step.instruction);
        }
    }
    seen.sort();
    seen.dedup();

    // Every advance landed on a distinct step
    assert_eq!(seen.len(), 19);
    assert_eq!(store.get(&id).await.unwrap().cursor, 19);
}

#[tokio::test]
async fn test_sweeper_stops_on_cancel() {
    let store: Arc<dyn CookSessionStore> = Arc::new(InMemoryCookSessionStore::new());
    let config = crate::config::SessionConfig {
        idle_ttl_secs: 0,
        sweep_interval_secs: 1,
    };
    let shutdown = tokio_util::sync::CancellationToken::new();

    store.create(vec![step(0)], request()).await;
    let handle = spawn_sweeper(store.clone(), config, shutdown.clone());

    // The first tick fires immediately
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(store.session_count().await, 0);

    shutdown.cancel();
    handle.await.unwrap();
}

#[test]
fn test_session_id_serializes_as_string() {
    let id = SessionId::from_string("cook-abc".to_string());
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"cook-abc\"");
    assert_eq!(id.to_string(), "cook-abc");
}
