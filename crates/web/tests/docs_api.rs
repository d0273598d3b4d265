//! The query API against a populated in-memory store.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;
use tsvwatch_core::{Document, Field, Record};
use tsvwatch_store::InMemoryDocumentStore;
use tsvwatch_web::{AppState, ServerConfig, create_router, run_server};

type BoxError = Box<dyn std::error::Error + Send + Sync>;
type TestResult = Result<(), BoxError>;

fn stored(count: usize) -> InMemoryDocumentStore {
    let documents = (1..=count)
        .map(|i| {
            let mut record = Record::default();
            record.set(Field::N, i.to_string());
            record.set(Field::UnitGuid, format!("guid-{i}"));
            let mut document = Document::new(format!("file-{i:02}.tsv"));
            document.records.push(record);
            document
        })
        .collect();
    InMemoryDocumentStore::with_documents(documents)
}

async fn list(store: &InMemoryDocumentStore, uri: &str) -> Result<Vec<Document>, BoxError> {
    let state = AppState::new(Arc::new(store.clone()), Duration::from_secs(1));
    let request = Request::builder().uri(uri).body(Body::empty())?;
    let response = create_router(state).oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await?.to_bytes();
    Ok(serde_json::from_slice(&body)?)
}

fn ids(documents: &[Document]) -> Vec<&str> {
    documents.iter().map(|d| d.id.as_str()).collect()
}

#[tokio::test]
async fn test_pages_walk_the_store_in_order() -> TestResult {
    let store = stored(25);

    let first = list(&store, "/docs?page=1&limit=10").await?;
    let third = list(&store, "/docs?page=3&limit=10").await?;
    let past_end = list(&store, "/docs?page=9&limit=10").await?;

    assert_eq!(first.len(), 10);
    assert_eq!(first.first().map(|d| d.id.as_str()), Some("file-01.tsv"));
    assert_eq!(
        ids(&third),
        vec!["file-21.tsv", "file-22.tsv", "file-23.tsv", "file-24.tsv", "file-25.tsv"]
    );
    assert!(past_end.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_documents_serialize_with_id_records_and_errors() -> TestResult {
    let store = stored(1);
    let state = AppState::new(Arc::new(store), Duration::from_secs(1));
    let request = Request::builder().uri("/docs").body(Body::empty())?;

    let response = create_router(state).oneshot(request).await?;
    let body = response.into_body().collect().await?.to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body)?;

    let document = json.get(0).ok_or("missing document")?;
    assert_eq!(document.get("id"), Some(&serde_json::json!("file-01.tsv")));
    assert_eq!(document.get("errors"), Some(&serde_json::json!([])));
    let record = document
        .get("records")
        .and_then(|r| r.get(0))
        .ok_or("missing record")?;
    assert_eq!(record.get("unit_guid"), Some(&serde_json::json!("guid-1")));
    assert_eq!(record.get("type"), Some(&serde_json::json!("")));
    Ok(())
}

#[tokio::test]
async fn test_server_stops_on_shutdown_signal() -> TestResult {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
    };
    let state = AppState::new(Arc::new(InMemoryDocumentStore::new()), Duration::from_secs(1));
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(async move {
        run_server(&config, state, async {
            let _ = stop_rx.await;
        })
        .await
    });
    let _ = stop_tx.send(());

    let result = tokio::time::timeout(Duration::from_secs(5), server).await??;
    assert!(result.is_ok());
    Ok(())
}
