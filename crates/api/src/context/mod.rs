//! Application context - dependency injection container

use std::sync::Arc;
use std::time::Duration;

use calpilot_core::events::ports::EventRepository as EventRepositoryPort;
use calpilot_core::parsing::ports::EventParser as EventParserPort;
use calpilot_core::quota::ports::{
    TokenLedgerRepository as TokenLedgerRepositoryPort,
    UploadQuotaRepository as UploadQuotaRepositoryPort,
};
use calpilot_core::user::ports::{
    ProfileRepository as ProfileRepositoryPort,
    SubscriptionRepository as SubscriptionRepositoryPort,
};
use calpilot_core::{ConfirmationBuffer, EventService, ParsePipeline};
use calpilot_domain::{CalPilotError, Config, Result, Session};
use calpilot_infra::{
    HttpClient, OpenAiParser, PgEventRepository, PgProfileRepository, PgStore,
    PgSubscriptionRepository, PgTokenLedgerRepository, PgUploadQuotaRepository,
};
use tokio::sync::{watch, Mutex};
use tracing::info;

/// Type alias for event parser port trait object
type DynEventParserPort = dyn EventParserPort + 'static;

/// Type alias for event repository port trait object
type DynEventRepositoryPort = dyn EventRepositoryPort + 'static;

/// Type alias for token ledger port trait object
type DynTokenLedgerPort = dyn TokenLedgerRepositoryPort + 'static;

/// Type alias for upload quota port trait object
type DynUploadQuotaPort = dyn UploadQuotaRepositoryPort + 'static;

/// Type alias for profile repository port trait object
type DynProfileRepositoryPort = dyn ProfileRepositoryPort + 'static;

/// Type alias for subscription repository port trait object
type DynSubscriptionRepositoryPort = dyn SubscriptionRepositoryPort + 'static;

/// Application context - holds all services and dependencies
///
/// The current session lives in a single-producer `watch` channel: the shell
/// sets it when the identity service reports a sign-in or sign-out, and any
/// interested screen can subscribe to changes instead of polling ambient
/// global state.
pub struct AppContext {
    pub config: Config,
    pub pipeline: Arc<ParsePipeline>,
    pub events: Arc<EventService>,
    /// The active parsing session's confirmation buffer.
    pub buffer: Mutex<ConfirmationBuffer>,
    pub ledger: Arc<DynTokenLedgerPort>,
    pub uploads: Arc<DynUploadQuotaPort>,
    pub profiles: Arc<DynProfileRepositoryPort>,
    pub subscriptions: Arc<DynSubscriptionRepositoryPort>,
    session_tx: watch::Sender<Option<Session>>,
}

impl AppContext {
    /// Start building a context with explicit port implementations.
    pub fn builder(config: Config) -> AppContextBuilder {
        AppContextBuilder {
            config,
            parser: None,
            events: None,
            ledger: None,
            uploads: None,
            profiles: None,
            subscriptions: None,
        }
    }

    /// Wire the production adapters: the remote store and the OpenAI parser.
    pub async fn init(config: Config) -> Result<Arc<Self>> {
        let store = Arc::new(PgStore::connect(&config.database).await?);

        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.parser.timeout_seconds))
            .build()?;
        let parser = Arc::new(OpenAiParser::from_config(&config.parser, http_client));

        let context = Self::builder(config)
            .parser(parser)
            .events(Arc::new(PgEventRepository::new(Arc::clone(&store))))
            .ledger(Arc::new(PgTokenLedgerRepository::new(Arc::clone(&store))))
            .uploads(Arc::new(PgUploadQuotaRepository::new(Arc::clone(&store))))
            .profiles(Arc::new(PgProfileRepository::new(Arc::clone(&store))))
            .subscriptions(Arc::new(PgSubscriptionRepository::new(Arc::clone(&store))))
            .build()?;

        info!("application context initialised");
        Ok(context)
    }

    /// Record a session change from the identity service.
    pub fn set_session(&self, session: Option<Session>) {
        match &session {
            Some(session) => info!(owner_id = %session.owner_id, "session started"),
            None => info!("session ended"),
        }
        // Receivers may come and go; sending into an empty channel is fine.
        let _ = self.session_tx.send(session);
    }

    /// The session for the current call, or an auth error when signed out.
    pub fn current_session(&self) -> Result<Session> {
        self.session_tx
            .borrow()
            .clone()
            .ok_or_else(|| CalPilotError::Auth("no active session".into()))
    }

    /// Subscribe to session-change notifications.
    pub fn watch_session(&self) -> watch::Receiver<Option<Session>> {
        self.session_tx.subscribe()
    }
}

/// Builder for [`AppContext`], used directly by tests and by `init`.
pub struct AppContextBuilder {
    config: Config,
    parser: Option<Arc<DynEventParserPort>>,
    events: Option<Arc<DynEventRepositoryPort>>,
    ledger: Option<Arc<DynTokenLedgerPort>>,
    uploads: Option<Arc<DynUploadQuotaPort>>,
    profiles: Option<Arc<DynProfileRepositoryPort>>,
    subscriptions: Option<Arc<DynSubscriptionRepositoryPort>>,
}

impl AppContextBuilder {
    pub fn parser(mut self, parser: Arc<DynEventParserPort>) -> Self {
        self.parser = Some(parser);
        self
    }

    pub fn events(mut self, events: Arc<DynEventRepositoryPort>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn ledger(mut self, ledger: Arc<DynTokenLedgerPort>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    pub fn uploads(mut self, uploads: Arc<DynUploadQuotaPort>) -> Self {
        self.uploads = Some(uploads);
        self
    }

    pub fn profiles(mut self, profiles: Arc<DynProfileRepositoryPort>) -> Self {
        self.profiles = Some(profiles);
        self
    }

    pub fn subscriptions(mut self, subscriptions: Arc<DynSubscriptionRepositoryPort>) -> Self {
        self.subscriptions = Some(subscriptions);
        self
    }

    pub fn build(self) -> Result<Arc<AppContext>> {
        let parser = self.parser.ok_or_else(|| missing("parser"))?;
        let events = self.events.ok_or_else(|| missing("event repository"))?;
        let ledger = self.ledger.ok_or_else(|| missing("token ledger"))?;
        let uploads = self.uploads.ok_or_else(|| missing("upload quota"))?;
        let profiles = self.profiles.ok_or_else(|| missing("profile repository"))?;
        let subscriptions = self.subscriptions.ok_or_else(|| missing("subscription repository"))?;

        let pipeline = Arc::new(
            ParsePipeline::new(
                parser,
                Arc::clone(&events),
                Arc::clone(&ledger),
                Arc::clone(&uploads),
            )
            .with_quota(self.config.quota.clone()),
        );
        let events_service = Arc::new(EventService::new(events));

        let (session_tx, _session_rx) = watch::channel(None);

        Ok(Arc::new(AppContext {
            config: self.config,
            pipeline,
            events: events_service,
            buffer: Mutex::new(ConfirmationBuffer::new()),
            ledger,
            uploads,
            profiles,
            subscriptions,
            session_tx,
        }))
    }
}

fn missing(what: &str) -> CalPilotError {
    CalPilotError::Config(format!("application context is missing a {what}"))
}
