//! Centralized application services.
//!
//! `AppServices` owns what every page shares: the tokio runtime, the
//! shutdown signal, the family data client and the holiday calendar. The
//! client is built from configuration on first use and can be replaced or
//! cleared at runtime through the `RwLock`.

use std::future::Future;
use std::sync::{Arc, OnceLock};

use anyhow::Context;
use famhub_calendar::HolidaySet;
use famhub_core::Config;
use famhub_services::FamilyClient;
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::models::ViewScope;

pub struct AppServices {
    /// Tokio runtime for async operations
    runtime: tokio::runtime::Runtime,

    /// Shutdown signal broadcaster
    shutdown_tx: broadcast::Sender<()>,

    /// Parent of every page scope; cancelled on shutdown
    root_token: CancellationToken,

    config: Config,

    /// Family data client (SQLite or hosted backend)
    client: RwLock<Option<FamilyClient>>,

    holidays: Arc<HolidaySet>,
}

/// Global singleton for application services
static SERVICES: OnceLock<Arc<AppServices>> = OnceLock::new();

impl AppServices {
    /// Build a standalone container. Most callers want [`AppServices::init`].
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("famhub-tokio")
            .build()
            .context("Failed to create tokio runtime")?;

        let (shutdown_tx, _) = broadcast::channel(16);

        let holidays = HolidaySet::korea()
            .with_extra(config.calendar.extra_holidays.iter().map(String::as_str));
        tracing::debug!("Holiday calendar has {} dates", holidays.len());

        Ok(Self {
            runtime,
            shutdown_tx,
            root_token: CancellationToken::new(),
            config,
            client: RwLock::new(None),
            holidays: Arc::new(holidays),
        })
    }

    /// Initialize the global services. Later calls return the existing
    /// instance and ignore `config`.
    pub fn init(config: Config) -> anyhow::Result<Arc<Self>> {
        if let Some(existing) = SERVICES.get() {
            return Ok(existing.clone());
        }
        let services = Arc::new(Self::new(config)?);
        Ok(SERVICES.get_or_init(|| services).clone())
    }

    /// The global services, if initialized.
    pub fn get() -> Option<Arc<Self>> {
        SERVICES.get().cloned()
    }

    /// Get the tokio runtime handle.
    pub fn runtime(&self) -> tokio::runtime::Handle {
        self.runtime.handle().clone()
    }

    /// Run a future to completion on the services runtime.
    pub fn block_on<F: Future>(&self, fut: F) -> F::Output {
        self.runtime.block_on(fut)
    }

    /// Subscribe to shutdown notifications.
    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn holidays(&self) -> Arc<HolidaySet> {
        self.holidays.clone()
    }

    /// A fresh scope for a page that is being opened.
    pub fn scope(&self) -> ViewScope {
        ViewScope::child_of(&self.root_token)
    }

    // =========== Family Client ===========

    /// Get the family client if initialized.
    pub fn client(&self) -> Option<FamilyClient> {
        self.client.read().clone()
    }

    /// Set or clear the family client.
    pub fn set_client(&self, client: Option<FamilyClient>) {
        *self.client.write() = client;
    }

    /// Return the family client, building it from configuration on first use.
    pub fn init_client(&self) -> anyhow::Result<FamilyClient> {
        if let Some(client) = self.client() {
            return Ok(client);
        }
        let mut slot = self.client.write();
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }
        let client = FamilyClient::from_config(&self.config)
            .context("Failed to initialize family data client")?;
        tracing::info!("Family client initialized ({:?} backend)", self.config.backend.kind);
        *slot = Some(client.clone());
        Ok(client)
    }

    /// Signal application shutdown.
    ///
    /// Broadcasts to subscribers, cancels every open page scope and drops
    /// the client.
    pub fn shutdown(&self) {
        tracing::info!("AppServices shutdown initiated");
        let _ = self.shutdown_tx.send(());
        self.root_token.cancel();
        *self.client.write() = None;
        tracing::info!("AppServices shutdown complete");
    }
}
