mod common;

use common::TestApp;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinSet;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_joins_respect_capacity() {
    let app = Arc::new(TestApp::new().await);
    let id = app.create_event("Limited", 3).await;

    let mut set = JoinSet::new();
    for i in 0..12 {
        let app = app.clone();
        set.spawn(async move {
            app.join(id, &format!("Racer {}", i), &format!("+1555100{:04}", i)).await.status()
        });
    }

    let mut admitted = 0;
    while let Some(status) = set.join_next().await {
        let status = status.unwrap();
        assert!(status == 200 || status == 400, "unexpected status {}", status);
        if status == 200 {
            admitted += 1;
        }
    }
    assert_eq!(admitted, 3);

    let orders: Vec<i32> = sqlx::query_scalar("SELECT join_order FROM attendees WHERE event_id = ? ORDER BY join_order")
        .bind(id)
        .fetch_all(&app.pool)
        .await
        .unwrap();
    assert_eq!(orders, vec![1, 2, 3]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_duplicate_joins_admit_once() {
    let app = Arc::new(TestApp::new().await);
    let id = app.create_event("Open mic", 20).await;

    let mut set = JoinSet::new();
    for i in 0..8 {
        let app = app.clone();
        set.spawn(async move {
            app.join(id, &format!("Twin {}", i), "+15552223333").await.status()
        });
    }

    let mut statuses = Vec::new();
    while let Some(status) = set.join_next().await {
        statuses.push(status.unwrap().as_u16());
    }
    assert_eq!(statuses.iter().filter(|s| **s == 200).count(), 1);

    let phones: HashSet<String> = sqlx::query_scalar("SELECT phone FROM attendees WHERE event_id = ?")
        .bind(id)
        .fetch_all(&app.pool)
        .await
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(phones.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_edits_of_different_fields_both_land() {
    let app = Arc::new(TestApp::new().await);
    let id = app.create_event("Original", 10).await;

    let mut set = JoinSet::new();
    for i in 0..10 {
        let app = app.clone();
        set.spawn(async move {
            let body = if i % 2 == 0 {
                serde_json::json!({ "title": format!("Title {}", i) })
            } else {
                serde_json::json!({ "location": format!("Room {}", i) })
            };
            app.request("PUT", &format!("/api/events/{}", id), Some(body)).await.status()
        });
    }
    while let Some(status) = set.join_next().await {
        assert_eq!(status.unwrap(), 200);
    }

    let event = common::parse_body(app.request("GET", &format!("/api/events/{}", id), None).await).await;
    assert!(event["title"].as_str().unwrap().starts_with("Title "));
    assert!(event["location"].as_str().unwrap().starts_with("Room "));
}
