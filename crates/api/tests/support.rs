//! Shared context for integration tests over mock ports

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use calpilot_app::AppContext;
use calpilot_core::events::ports::EventRepository;
use calpilot_core::parsing::ports::EventParser;
use calpilot_core::quota::ports::{TokenLedgerRepository, UploadQuotaRepository};
use calpilot_core::user::ports::{ProfileRepository, SubscriptionRepository};
use calpilot_domain::{
    CalPilotError, CandidateEvent, Config, DateRange, ParsedBatch, PersistedEvent, Profile,
    ProfileUpdate, Result as DomainResult, Session, Subscription, SubscriptionTier,
    ThemePreference, TokenUsageLedger, UploadQuota,
};
use chrono::{NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

pub fn date(s: &str) -> NaiveDate {
    s.parse().expect("valid date")
}

pub fn time(s: &str) -> NaiveTime {
    s.parse().expect("valid time")
}

/// The parsed batch for "I have a meeting on October 3rd at 8:30 am".
pub fn meeting_batch() -> ParsedBatch {
    ParsedBatch {
        events: vec![CandidateEvent::new(
            "meeting",
            date("2025-10-03"),
            Some(time("08:30:00")),
            "",
        )],
        tokens_used: 120,
    }
}

/// Scripted parser handing out pre-seeded batches in order.
#[derive(Default)]
pub struct StubParser {
    batches: Mutex<VecDeque<DomainResult<ParsedBatch>>>,
}

impl StubParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_batch(self, batch: ParsedBatch) -> Self {
        self.batches.lock().expect("parser mutex").push_back(Ok(batch));
        self
    }

    pub fn with_failure(self, error: CalPilotError) -> Self {
        self.batches.lock().expect("parser mutex").push_back(Err(error));
        self
    }

    fn next(&self) -> DomainResult<ParsedBatch> {
        self.batches
            .lock()
            .expect("parser mutex")
            .pop_front()
            .unwrap_or_else(|| Err(CalPilotError::Internal("no scripted parse response".into())))
    }
}

#[async_trait]
impl EventParser for StubParser {
    async fn parse_text(&self, _text: &str) -> DomainResult<ParsedBatch> {
        self.next()
    }

    async fn parse_image(&self, _image: &[u8]) -> DomainResult<ParsedBatch> {
        self.next()
    }
}

/// In-memory event store.
#[derive(Default)]
pub struct MockEventRepository {
    events: Mutex<Vec<PersistedEvent>>,
}

impl MockEventRepository {
    pub fn stored(&self) -> Vec<PersistedEvent> {
        self.events.lock().expect("events mutex").clone()
    }
}

#[async_trait]
impl EventRepository for MockEventRepository {
    async fn create_events(
        &self,
        owner_id: &str,
        events: &[CandidateEvent],
    ) -> DomainResult<Vec<PersistedEvent>> {
        let now = Utc::now();
        let persisted: Vec<PersistedEvent> = events
            .iter()
            .map(|event| PersistedEvent {
                id: Uuid::new_v4(),
                owner_id: owner_id.to_string(),
                event: event.clone(),
                created_at: now,
                updated_at: now,
            })
            .collect();

        self.events.lock().expect("events mutex").extend(persisted.clone());
        Ok(persisted)
    }

    async fn list_events(
        &self,
        owner_id: &str,
        range: DateRange,
    ) -> DomainResult<Vec<PersistedEvent>> {
        let mut matching: Vec<PersistedEvent> = self
            .events
            .lock()
            .expect("events mutex")
            .iter()
            .filter(|event| event.owner_id == owner_id && range.contains(event.event.date()))
            .cloned()
            .collect();
        matching.sort_by_key(|event| event.event.date());
        Ok(matching)
    }

    async fn update_event(&self, event: &PersistedEvent) -> DomainResult<PersistedEvent> {
        let mut events = self.events.lock().expect("events mutex");
        let stored = events
            .iter_mut()
            .find(|candidate| candidate.id == event.id)
            .ok_or_else(|| CalPilotError::NotFound(format!("event {}", event.id)))?;
        *stored = event.clone();
        Ok(stored.clone())
    }

    async fn delete_event(&self, id: Uuid) -> DomainResult<()> {
        let mut events = self.events.lock().expect("events mutex");
        let before = events.len();
        events.retain(|event| event.id != id);
        if events.len() == before {
            return Err(CalPilotError::NotFound(format!("event {id}")));
        }
        Ok(())
    }
}

/// In-memory token ledger with read-then-increment update semantics.
#[derive(Default)]
pub struct MockTokenLedger {
    ledgers: Mutex<HashMap<String, TokenUsageLedger>>,
}

impl MockTokenLedger {
    pub fn with_usage(self, owner_id: &str, tokens_used: i64, tokens_limit: i64) -> Self {
        self.ledgers.lock().expect("ledger mutex").insert(
            owner_id.to_string(),
            TokenUsageLedger {
                owner_id: owner_id.to_string(),
                tokens_used,
                tokens_limit,
                reset_at: None,
            },
        );
        self
    }

    pub fn usage(&self, owner_id: &str) -> Option<i64> {
        self.ledgers
            .lock()
            .expect("ledger mutex")
            .get(owner_id)
            .map(|ledger| ledger.tokens_used)
    }
}

#[async_trait]
impl TokenLedgerRepository for MockTokenLedger {
    async fn get_token_usage(&self, owner_id: &str) -> DomainResult<Option<TokenUsageLedger>> {
        Ok(self.ledgers.lock().expect("ledger mutex").get(owner_id).cloned())
    }

    async fn update_token_usage(
        &self,
        owner_id: &str,
        delta: i64,
    ) -> DomainResult<TokenUsageLedger> {
        let mut ledgers = self.ledgers.lock().expect("ledger mutex");
        let ledger = ledgers
            .entry(owner_id.to_string())
            .or_insert_with(|| TokenUsageLedger::absent(owner_id));
        ledger.tokens_used += delta;
        Ok(ledger.clone())
    }
}

/// In-memory upload quota.
#[derive(Default)]
pub struct MockUploadQuota {
    quotas: Mutex<HashMap<String, UploadQuota>>,
}

#[async_trait]
impl UploadQuotaRepository for MockUploadQuota {
    async fn get_upload_quota(&self, owner_id: &str) -> DomainResult<Option<UploadQuota>> {
        Ok(self.quotas.lock().expect("quota mutex").get(owner_id).cloned())
    }

    async fn increment_upload_usage(&self, owner_id: &str) -> DomainResult<UploadQuota> {
        let mut quotas = self.quotas.lock().expect("quota mutex");
        let quota = quotas
            .entry(owner_id.to_string())
            .or_insert_with(|| UploadQuota::absent(owner_id));
        quota.uploads_used += 1;
        Ok(quota.clone())
    }
}

/// In-memory profile store with one seeded profile per known user.
#[derive(Default)]
pub struct MockProfileRepository {
    profiles: Mutex<HashMap<String, Profile>>,
}

impl MockProfileRepository {
    pub fn with_profile(self, owner_id: &str, display_name: &str) -> Self {
        let now = Utc::now();
        self.profiles.lock().expect("profile mutex").insert(
            owner_id.to_string(),
            Profile {
                id: owner_id.to_string(),
                display_name: display_name.to_string(),
                theme_preference: ThemePreference::Dark,
                subscription_tier: SubscriptionTier::Free,
                created_at: now,
                updated_at: now,
            },
        );
        self
    }
}

#[async_trait]
impl ProfileRepository for MockProfileRepository {
    async fn get_profile(&self, owner_id: &str) -> DomainResult<Option<Profile>> {
        Ok(self.profiles.lock().expect("profile mutex").get(owner_id).cloned())
    }

    async fn update_profile(
        &self,
        owner_id: &str,
        update: &ProfileUpdate,
    ) -> DomainResult<Profile> {
        let mut profiles = self.profiles.lock().expect("profile mutex");
        let profile = profiles
            .get_mut(owner_id)
            .ok_or_else(|| CalPilotError::NotFound(format!("profile {owner_id}")))?;
        if let Some(display_name) = &update.display_name {
            profile.display_name = display_name.clone();
        }
        if let Some(theme) = update.theme_preference {
            profile.theme_preference = theme;
        }
        profile.updated_at = Utc::now();
        Ok(profile.clone())
    }
}

/// Subscription store with no records by default.
#[derive(Default)]
pub struct MockSubscriptionRepository;

#[async_trait]
impl SubscriptionRepository for MockSubscriptionRepository {
    async fn get_subscription(&self, _owner_id: &str) -> DomainResult<Option<Subscription>> {
        Ok(None)
    }
}

/// Shared harness for command tests.
pub struct TestContext {
    pub ctx: Arc<AppContext>,
    pub events: Arc<MockEventRepository>,
    pub ledger: Arc<MockTokenLedger>,
}

/// Build an application context over mocks, signed in as `user-1`.
pub fn signed_in_context(parser: StubParser, ledger: MockTokenLedger) -> TestContext {
    let events = Arc::new(MockEventRepository::default());
    let ledger = Arc::new(ledger);

    let ctx = AppContext::builder(Config::default())
        .parser(Arc::new(parser))
        .events(Arc::clone(&events) as Arc<dyn EventRepository + Send + Sync>)
        .ledger(Arc::clone(&ledger) as Arc<dyn TokenLedgerRepository + Send + Sync>)
        .uploads(Arc::new(MockUploadQuota::default()))
        .profiles(Arc::new(MockProfileRepository::default().with_profile("user-1", "Ada")))
        .subscriptions(Arc::new(MockSubscriptionRepository))
        .build()
        .expect("context builds");

    ctx.set_session(Some(Session::new("user-1")));

    TestContext { ctx, events, ledger }
}
