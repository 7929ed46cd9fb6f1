//! Dashboard page: derived statistics over live data

use crate::client::{ApiClient, ClientError};
use crate::model::InventoryItem;

use super::task::ViewTask;
use super::toast::ToastBus;

/// Aggregates recomputed from the fetched lists on every visit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardStats {
    pub total_items: usize,
    pub low_stock_items: Vec<InventoryItem>,
    pub total_suppliers: usize,
}

impl DashboardStats {
    /// Derive stats from freshly fetched data; nothing here is cached or
    /// stored server-side
    pub fn derive(items: &[InventoryItem], supplier_count: usize) -> Self {
        let low_stock_items = items
            .iter()
            .filter(|item| item.is_low_stock())
            .cloned()
            .collect();

        Self {
            total_items: items.len(),
            low_stock_items,
            total_suppliers: supplier_count,
        }
    }
}

type LoadResult = Result<(Vec<InventoryItem>, usize), ClientError>;

/// Dashboard page state
#[derive(Default)]
pub struct DashboardPage {
    pub stats: DashboardStats,
    pub loading: bool,
    epoch: u64,
    pending: Option<ViewTask<LoadResult>>,
}

impl DashboardPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kick off the parallel item + supplier fetch for this visit.
    /// Replacing a still-running load aborts it.
    pub fn start_load(&mut self, client: &ApiClient) {
        self.epoch += 1;
        self.loading = true;

        let client = client.clone();
        self.pending = Some(ViewTask::spawn(self.epoch, async move {
            let (items, suppliers) = tokio::join!(client.list_items(), client.list_suppliers());
            Ok((items?, suppliers?.len()))
        }));
    }

    /// Await the pending fetch and fold it into page state. Results from a
    /// load that is no longer current are dropped on the floor.
    pub async fn finish_load(&mut self, toasts: &ToastBus) {
        let Some(task) = self.pending.take() else {
            return;
        };
        let task_epoch = task.epoch();
        let Some(result) = task.join().await else {
            return;
        };
        if task_epoch != self.epoch {
            return;
        }

        match result {
            Ok((items, supplier_count)) => {
                self.stats = DashboardStats::derive(&items, supplier_count);
                self.loading = false;
            }
            Err(e) => {
                self.loading = false;
                toasts.error(e.user_message("Error loading dashboard data"));
            }
        }
    }

    /// Start and await a load in one step
    pub async fn load(&mut self, client: &ApiClient, toasts: &ToastBus) {
        self.start_load(client);
        self.finish_load(toasts).await;
    }

    /// Mark any in-flight load stale without starting a new one
    pub fn invalidate(&mut self) {
        self.epoch += 1;
        self.pending = None;
    }
}
