#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

use shortlink::application::services::auth::hash_session_token;
use shortlink::application::services::{AuthService, ResolverService, StatsService};
use shortlink::domain::entities::{Link, SessionRecord, Visit, VisitBucket, STATUS_ENABLED};
use shortlink::domain::repositories::{LinkRepository, SessionRepository, VisitRepository};
use shortlink::domain::visit_event::VisitEvent;
use shortlink::error::AppError;
use shortlink::state::AppState;

pub const TEST_SIGNING_SECRET: &str = "test-signing-secret";

/// In-memory stand-in for the database.
///
/// One mutex guards all tables, so `register_visit` is atomic the same way
/// the transactional implementation is: concurrent registrations serialize
/// and no increment is lost.
pub struct InMemoryStore {
    inner: Mutex<StoreInner>,
}

struct StoreInner {
    links: HashMap<i64, Link>,
    visits: Vec<Visit>,
    buckets: HashMap<(i64, DateTime<Utc>), VisitBucket>,
    sessions: HashMap<String, SessionRecord>,
    next_visit_id: i64,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(StoreInner {
                links: HashMap::new(),
                visits: Vec::new(),
                buckets: HashMap::new(),
                sessions: HashMap::new(),
                next_visit_id: 1,
            }),
        })
    }

    pub fn insert_link(&self, link: Link) {
        let mut inner = self.inner.lock().unwrap();
        inner.links.insert(link.id, link);
    }

    pub fn link(&self, id: i64) -> Option<Link> {
        self.inner.lock().unwrap().links.get(&id).cloned()
    }

    pub fn visits_for(&self, link_id: i64) -> Vec<Visit> {
        self.inner
            .lock()
            .unwrap()
            .visits
            .iter()
            .filter(|v| v.link_id == link_id)
            .cloned()
            .collect()
    }

    pub fn buckets_for(&self, link_id: i64) -> Vec<VisitBucket> {
        let mut buckets: Vec<_> = self
            .inner
            .lock()
            .unwrap()
            .buckets
            .values()
            .filter(|b| b.link_id == link_id)
            .cloned()
            .collect();
        buckets.sort_by_key(|b| b.bucket_start);
        buckets
    }

    pub fn seed_visit(&self, visit: Visit) {
        let mut inner = self.inner.lock().unwrap();
        inner.next_visit_id = inner.next_visit_id.max(visit.id + 1);
        inner.visits.push(visit);
    }

    pub fn seed_bucket(&self, bucket: VisitBucket) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .buckets
            .insert((bucket.link_id, bucket.bucket_start), bucket);
    }

    /// Issues a session for a user and returns the raw token to send back
    /// as the session cookie.
    pub fn issue_session(&self, user_id: i64, user_name: &str, ttl: Duration) -> String {
        let token = format!("test-token-{user_id}-{user_name}");
        let hash = hash_session_token(TEST_SIGNING_SECRET, &token);

        let mut inner = self.inner.lock().unwrap();
        let session_id = inner.sessions.len() as i64 + 1;
        inner.sessions.insert(
            hash,
            SessionRecord {
                session_id,
                user_id,
                user_name: user_name.to_string(),
                expires_at: Utc::now() + ttl,
            },
        );

        token
    }
}

pub struct InMemoryLinkRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryLinkRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn find_by_alias(&self, alias: &str) -> Result<Option<Link>, AppError> {
        let inner = self.store.inner.lock().unwrap();
        Ok(inner.links.values().find(|l| l.alias == alias).cloned())
    }

    async fn find_by_alias_and_owner(
        &self,
        alias: &str,
        user_id: i64,
    ) -> Result<Option<Link>, AppError> {
        let inner = self.store.inner.lock().unwrap();
        Ok(inner
            .links
            .values()
            .find(|l| l.alias == alias && l.user_id == user_id)
            .cloned())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

pub struct InMemoryVisitRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryVisitRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl VisitRepository for InMemoryVisitRepository {
    async fn register_visit(
        &self,
        event: &VisitEvent,
        bucket_start: DateTime<Utc>,
        window_start: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let mut inner = self.store.inner.lock().unwrap();

        let link = inner.links.get_mut(&event.link_id).ok_or_else(|| {
            AppError::not_found(
                "Link vanished during accounting",
                serde_json::json!({ "link_id": event.link_id }),
            )
        })?;
        link.visit_count += 1;
        link.last_visited_at = Some(event.occurred_at);

        let is_unique = !event.ip.is_empty()
            && !inner.visits.iter().any(|v| {
                v.link_id == event.link_id && v.ip == event.ip && v.created >= window_start
            });

        let id = inner.next_visit_id;
        inner.next_visit_id += 1;
        inner.visits.push(Visit {
            id,
            link_id: event.link_id,
            ip: event.ip.clone(),
            user_agent: event.user_agent.clone(),
            referer: event.referer.clone(),
            is_unique,
            created: event.occurred_at,
        });

        let bucket = inner
            .buckets
            .entry((event.link_id, bucket_start))
            .or_insert(VisitBucket {
                link_id: event.link_id,
                bucket_start,
                visits: 0,
                unique_ips: 0,
            });
        bucket.visits += 1;
        if is_unique {
            bucket.unique_ips += 1;
        }

        Ok(())
    }

    async fn list_buckets_since(
        &self,
        link_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Vec<VisitBucket>, AppError> {
        let inner = self.store.inner.lock().unwrap();
        let mut buckets: Vec<_> = inner
            .buckets
            .values()
            .filter(|b| b.link_id == link_id && b.bucket_start >= since)
            .cloned()
            .collect();
        buckets.sort_by_key(|b| b.bucket_start);
        Ok(buckets)
    }

    async fn list_recent(&self, link_id: i64, limit: i64) -> Result<Vec<Visit>, AppError> {
        let inner = self.store.inner.lock().unwrap();
        let mut visits: Vec<_> = inner
            .visits
            .iter()
            .filter(|v| v.link_id == link_id)
            .cloned()
            .collect();
        visits.sort_by(|a, b| b.created.cmp(&a.created));
        visits.truncate(limit as usize);
        Ok(visits)
    }

    async fn count_distinct_ips(&self, link_id: i64) -> Result<i64, AppError> {
        let inner = self.store.inner.lock().unwrap();
        let ips: std::collections::HashSet<_> = inner
            .visits
            .iter()
            .filter(|v| v.link_id == link_id)
            .map(|v| v.ip.as_str())
            .collect();
        Ok(ips.len() as i64)
    }
}

pub struct InMemorySessionRepository {
    store: Arc<InMemoryStore>,
}

impl InMemorySessionRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<SessionRecord>, AppError> {
        let inner = self.store.inner.lock().unwrap();
        Ok(inner.sessions.get(token_hash).cloned())
    }

    async fn delete(&self, session_id: i64) -> Result<(), AppError> {
        let mut inner = self.store.inner.lock().unwrap();
        inner.sessions.retain(|_, s| s.session_id != session_id);
        Ok(())
    }
}

/// Builds a link with sensible defaults for tests.
pub fn test_link(id: i64, user_id: i64, alias: &str, destination_url: &str) -> Link {
    Link {
        id,
        user_id,
        alias: alias.to_string(),
        destination_url: destination_url.to_string(),
        description: None,
        status: STATUS_ENABLED,
        forward_params: false,
        expires_at: None,
        max_visits: 0,
        visit_count: 0,
        last_visited_at: None,
        created: Utc::now(),
    }
}

pub fn create_test_state(store: Arc<InMemoryStore>) -> (AppState, mpsc::Receiver<VisitEvent>) {
    let (tx, rx) = mpsc::channel(100);

    let link_repo: Arc<dyn LinkRepository> = Arc::new(InMemoryLinkRepository::new(store.clone()));
    let visit_repo: Arc<dyn VisitRepository> =
        Arc::new(InMemoryVisitRepository::new(store.clone()));
    let session_repo: Arc<dyn SessionRepository> =
        Arc::new(InMemorySessionRepository::new(store));

    let resolver = Arc::new(ResolverService::new(link_repo.clone(), tx.clone()));
    let stats = Arc::new(StatsService::new(link_repo.clone(), visit_repo));
    let auth = Arc::new(AuthService::new(
        session_repo,
        TEST_SIGNING_SECRET.to_string(),
    ));

    let state = AppState {
        resolver,
        stats,
        auth,
        links: link_repo,
        visit_tx: tx,
        behind_proxy: false,
    };

    (state, rx)
}

/// Layer that injects a fixed peer address, standing in for
/// `into_make_service_with_connect_info` which only runs on a real listener.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> tower::Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: std::net::SocketAddr = "203.0.113.7:12345".parse().unwrap();
        req.extensions_mut().insert(axum::extract::ConnectInfo(addr));
        self.inner.call(req)
    }
}
