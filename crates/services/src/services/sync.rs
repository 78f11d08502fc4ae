//! Collection sync: keep a local copy of one table fresh via subscribe/refetch.
//!
//! The contract is deliberately coarse: any change notification for the table
//! invalidates the whole local list and triggers a full fetch-and-replace.
//! There is no incremental patching, no retry policy and no error state; a
//! failed fetch is logged and the previous snapshot stays visible until the
//! next notification or a manual [`CollectionSync::refetch`].

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use db::models::{
    client_logo::ClientLogo, project::Project, software_logo::SoftwareLogo,
    testimonial::Testimonial,
};
use sqlx::SqlitePool;
use tokio::sync::{RwLock, broadcast};
use tracing::{error, warn};

use super::events::{EventBus, Table};

/// An entity collection that can be kept in sync. `fetch_all` must return rows
/// in the entity's canonical order.
#[async_trait]
pub trait Collection: Clone + Send + Sync + 'static {
    const TABLE: Table;

    async fn fetch_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error>;
}

#[async_trait]
impl Collection for Project {
    const TABLE: Table = Table::Projects;

    async fn fetch_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        Project::find_all(pool).await
    }
}

#[async_trait]
impl Collection for Testimonial {
    const TABLE: Table = Table::Testimonials;

    async fn fetch_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        Testimonial::find_all(pool).await
    }
}

#[async_trait]
impl Collection for ClientLogo {
    const TABLE: Table = Table::ClientLogos;

    async fn fetch_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        ClientLogo::find_all(pool).await
    }
}

#[async_trait]
impl Collection for SoftwareLogo {
    const TABLE: Table = Table::SoftwareLogos;

    async fn fetch_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        SoftwareLogo::find_all(pool).await
    }
}

struct SyncState<C> {
    pool: SqlitePool,
    items: RwLock<Vec<C>>,
    loading: AtomicBool,
}

impl<C: Collection> SyncState<C> {
    /// Full fetch-and-replace. Read failures degrade to the last snapshot;
    /// `loading` clears either way.
    async fn refetch(&self) {
        match C::fetch_all(&self.pool).await {
            Ok(rows) => *self.items.write().await = rows,
            Err(err) => {
                error!(table = %C::TABLE, error = %err, "failed to fetch collection");
            }
        }
        self.loading.store(false, Ordering::Release);
    }
}

/// Live handle over one table. Dropping it closes the subscription.
pub struct CollectionSync<C: Collection> {
    state: Arc<SyncState<C>>,
    listener: tokio::task::JoinHandle<()>,
}

pub type ProjectsSync = CollectionSync<Project>;
pub type TestimonialsSync = CollectionSync<Testimonial>;
pub type ClientLogosSync = CollectionSync<ClientLogo>;
pub type SoftwareLogosSync = CollectionSync<SoftwareLogo>;

impl<C: Collection> CollectionSync<C> {
    /// Fetch the collection once, then follow change notifications. Multiple
    /// handles on the same table are tolerated: each fetch is an idempotent
    /// replacement of its own snapshot.
    pub async fn start(pool: SqlitePool, bus: &EventBus) -> Self {
        let state = Arc::new(SyncState {
            pool,
            items: RwLock::new(Vec::new()),
            loading: AtomicBool::new(true),
        });
        state.refetch().await;

        let mut rx = bus.subscribe();
        let listener_state = Arc::clone(&state);
        let listener = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) if event.table == C::TABLE => listener_state.refetch().await,
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // Missed events all collapse into the same refetch.
                        warn!(table = %C::TABLE, skipped, "event stream lagged; refetching");
                        listener_state.refetch().await;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        Self { state, listener }
    }

    /// Current snapshot in the entity's canonical order.
    pub async fn items(&self) -> Vec<C> {
        self.state.items.read().await.clone()
    }

    /// True until the initial fetch has settled (success or failure).
    pub fn loading(&self) -> bool {
        self.state.loading.load(Ordering::Acquire)
    }

    /// Force an immediate fetch, for callers that just wrote and do not want
    /// to wait for the notification round-trip.
    pub async fn refetch(&self) {
        self.state.refetch().await;
    }
}

impl<C: Collection> Drop for CollectionSync<C> {
    fn drop(&mut self) {
        self.listener.abort();
    }
}
