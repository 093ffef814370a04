//! Mock port implementations for testing
//!
//! In-memory stand-ins for the parser and the remote store, enabling
//! deterministic pipeline tests without network or database dependencies.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use calpilot_domain::{
    CalPilotError, CandidateEvent, DateRange, ParsedBatch, PersistedEvent, Result as DomainResult,
    TokenUsageLedger, UploadQuota,
};
use calpilot_core::events::ports::EventRepository;
use calpilot_core::parsing::ports::EventParser;
use calpilot_core::quota::ports::{TokenLedgerRepository, UploadQuotaRepository};
use chrono::Utc;
use uuid::Uuid;

/// Scripted parser: hands out pre-seeded batches in order and counts calls.
#[derive(Default)]
pub struct StubParser {
    batches: Mutex<VecDeque<DomainResult<ParsedBatch>>>,
    calls: AtomicUsize,
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

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next(&self) -> DomainResult<ParsedBatch> {
        self.calls.fetch_add(1, Ordering::SeqCst);
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

/// In-memory mock for `EventRepository`.
#[derive(Default)]
pub struct MockEventRepository {
    events: Mutex<Vec<PersistedEvent>>,
    fail_creates: AtomicBool,
}

impl MockEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next (and every following) create call fail like the store.
    pub fn fail_creates(&self) {
        self.fail_creates.store(true, Ordering::SeqCst);
    }

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
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(CalPilotError::Database("insert rejected by store".into()));
        }

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
        stored.updated_at = Utc::now();
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

/// In-memory mock for `TokenLedgerRepository` with the store's
/// read-then-increment update semantics.
#[derive(Default)]
pub struct MockTokenLedger {
    ledgers: Mutex<HashMap<String, TokenUsageLedger>>,
}

impl MockTokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

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

/// In-memory mock for `UploadQuotaRepository`.
#[derive(Default)]
pub struct MockUploadQuota {
    quotas: Mutex<HashMap<String, UploadQuota>>,
}

impl MockUploadQuota {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_usage(self, owner_id: &str, uploads_used: i64, uploads_limit: i64) -> Self {
        self.quotas.lock().expect("quota mutex").insert(
            owner_id.to_string(),
            UploadQuota {
                owner_id: owner_id.to_string(),
                uploads_used,
                uploads_limit,
                reset_at: None,
            },
        );
        self
    }

    pub fn uploads_used(&self, owner_id: &str) -> Option<i64> {
        self.quotas
            .lock()
            .expect("quota mutex")
            .get(owner_id)
            .map(|quota| quota.uploads_used)
    }
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
