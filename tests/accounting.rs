mod common;

use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;

use shortlink::application::services::accountant::bucket_start;
use shortlink::application::services::AccountantService;
use shortlink::domain::visit_event::VisitEvent;

use common::{InMemoryStore, InMemoryVisitRepository};

fn make_accountant(store: &Arc<InMemoryStore>) -> AccountantService {
    AccountantService::new(Arc::new(InMemoryVisitRepository::new(store.clone())))
}

fn event(link_id: i64, ip: &str, at: chrono::DateTime<Utc>) -> VisitEvent {
    VisitEvent::new(link_id, ip.to_string(), Some("test"), None, at)
}

#[tokio::test]
async fn test_concurrent_visits_lose_no_increments() {
    let store = InMemoryStore::new();
    store.insert_link(common::test_link(1, 1, "hot", "https://example.com"));

    let accountant = Arc::new(make_accountant(&store));
    let now = Utc::now();

    let mut handles = Vec::new();
    for i in 0..32 {
        let accountant = accountant.clone();
        handles.push(tokio::spawn(async move {
            let ev = event(1, &format!("203.0.113.{i}"), now);
            accountant.register_visit(&ev).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let link = store.link(1).unwrap();
    assert_eq!(link.visit_count, 32);
    assert_eq!(link.last_visited_at, Some(now));
    assert_eq!(store.visits_for(1).len(), 32);

    // Bucket totals reconcile with the counter.
    let bucket_sum: i64 = store.buckets_for(1).iter().map(|b| b.visits).sum();
    assert_eq!(bucket_sum, link.visit_count);
}

#[tokio::test]
async fn test_same_ip_within_window_not_unique() {
    let store = InMemoryStore::new();
    store.insert_link(common::test_link(1, 1, "promo", "https://example.com"));
    let accountant = make_accountant(&store);

    let t0 = Utc.with_ymd_and_hms(2026, 3, 14, 10, 0, 0).unwrap();

    accountant.register_visit(&event(1, "203.0.113.9", t0)).await.unwrap();
    accountant
        .register_visit(&event(1, "203.0.113.9", t0 + Duration::minutes(30)))
        .await
        .unwrap();

    let visits = store.visits_for(1);
    assert!(visits[0].is_unique);
    assert!(!visits[1].is_unique);

    let buckets = store.buckets_for(1);
    assert_eq!(buckets.iter().map(|b| b.unique_ips).sum::<i64>(), 1);
}

#[tokio::test]
async fn test_same_ip_after_window_unique_again() {
    let store = InMemoryStore::new();
    store.insert_link(common::test_link(1, 1, "promo", "https://example.com"));
    let accountant = make_accountant(&store);

    let t0 = Utc.with_ymd_and_hms(2026, 3, 14, 10, 0, 0).unwrap();

    accountant.register_visit(&event(1, "203.0.113.9", t0)).await.unwrap();
    // A hair past the rolling window.
    accountant
        .register_visit(&event(1, "203.0.113.9", t0 + Duration::minutes(61)))
        .await
        .unwrap();

    let visits = store.visits_for(1);
    assert!(visits[0].is_unique);
    assert!(visits[1].is_unique);
}

#[tokio::test]
async fn test_empty_ip_never_unique() {
    let store = InMemoryStore::new();
    store.insert_link(common::test_link(1, 1, "promo", "https://example.com"));
    let accountant = make_accountant(&store);

    accountant.register_visit(&event(1, "", Utc::now())).await.unwrap();

    let visits = store.visits_for(1);
    assert_eq!(visits.len(), 1);
    assert!(!visits[0].is_unique);

    let buckets = store.buckets_for(1);
    assert_eq!(buckets[0].visits, 1);
    assert_eq!(buckets[0].unique_ips, 0);
}

#[tokio::test]
async fn test_visits_land_in_truncated_hour_bucket() {
    let store = InMemoryStore::new();
    store.insert_link(common::test_link(1, 1, "promo", "https://example.com"));
    let accountant = make_accountant(&store);

    let t = Utc.with_ymd_and_hms(2026, 3, 14, 10, 47, 33).unwrap();
    accountant.register_visit(&event(1, "203.0.113.1", t)).await.unwrap();
    accountant
        .register_visit(&event(1, "203.0.113.2", t + Duration::minutes(5)))
        .await
        .unwrap();
    // Next hour gets its own bucket.
    accountant
        .register_visit(&event(1, "203.0.113.3", t + Duration::minutes(20)))
        .await
        .unwrap();

    let buckets = store.buckets_for(1);
    assert_eq!(buckets.len(), 2);
    assert_eq!(
        buckets[0].bucket_start,
        Utc.with_ymd_and_hms(2026, 3, 14, 10, 0, 0).unwrap()
    );
    assert_eq!(buckets[0].visits, 2);
    assert_eq!(
        buckets[1].bucket_start,
        Utc.with_ymd_and_hms(2026, 3, 14, 11, 0, 0).unwrap()
    );
    assert_eq!(buckets[1].visits, 1);
}

#[test]
fn test_bucket_start_truncation() {
    let t = Utc.with_ymd_and_hms(2026, 3, 14, 10, 47, 33).unwrap();
    assert_eq!(
        bucket_start(t),
        Utc.with_ymd_and_hms(2026, 3, 14, 10, 0, 0).unwrap()
    );

    let on_the_hour = Utc.with_ymd_and_hms(2026, 3, 14, 10, 0, 0).unwrap();
    assert_eq!(bucket_start(on_the_hour), on_the_hour);
}

#[tokio::test]
async fn test_missing_link_is_reported() {
    let store = InMemoryStore::new();
    let accountant = make_accountant(&store);

    let err = accountant
        .register_visit(&event(999, "203.0.113.1", Utc::now()))
        .await
        .unwrap_err();

    assert!(matches!(err, shortlink::error::AppError::NotFound { .. }));
}
