//! Store-restock queue service
//!
//! Sold-out products detected during sales ingestion wait here until
//! someone physically restocks the shelf and marks the item done.

use chrono::Utc;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::services::store::{RepositionItem, SharedStore};

/// Restock queue service
#[derive(Clone)]
pub struct RepositionService {
    store: SharedStore,
}

/// Queue snapshot with the pending counter the dashboard badge shows
#[derive(Debug, Clone, Serialize)]
pub struct RepositionQueue {
    pub pending: usize,
    pub items: Vec<RepositionItem>,
}

impl RepositionService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// List queue items, optionally hiding the already-restocked ones;
    /// pending items come first, newest queued first within each half
    pub async fn list(&self, pending_only: bool) -> RepositionQueue {
        let store = self.store.read().await;
        let mut items: Vec<RepositionItem> = store
            .reposition
            .iter()
            .filter(|item| !pending_only || !item.restocked)
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            a.restocked
                .cmp(&b.restocked)
                .then_with(|| b.queued_at.cmp(&a.queued_at))
        });
        let pending = items.iter().filter(|i| !i.restocked).count();
        RepositionQueue { pending, items }
    }

    /// Mark a queue item as restocked
    pub async fn mark_restocked(&self, id: u64) -> AppResult<RepositionItem> {
        let mut store = self.store.write().await;
        let item = store
            .reposition
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| AppError::NotFound(format!("restock item {}", id)))?;
        item.restocked = true;
        item.restocked_at = Some(Utc::now());
        Ok(item.clone())
    }

    pub async fn pending_count(&self) -> usize {
        let store = self.store.read().await;
        store.reposition.iter().filter(|i| !i.restocked).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> RepositionService {
        let store = SharedStore::default();
        {
            let mut guard = store.write().await;
            for (code, product) in [("1", "Enxada"), ("2", "Balde 10L")] {
                let id = guard.next_reposition_id();
                guard.reposition.push(RepositionItem {
                    id,
                    code: code.to_string(),
                    product: product.to_string(),
                    group: "FERRAMENTAS".to_string(),
                    qty_sold: 3,
                    queued_at: Utc::now(),
                    restocked: false,
                    restocked_at: None,
                });
            }
        }
        RepositionService::new(store)
    }

    #[tokio::test]
    async fn test_mark_restocked_moves_item_out_of_pending() {
        let service = seeded().await;
        assert_eq!(service.pending_count().await, 2);

        let item = service.mark_restocked(1).await.unwrap();
        assert!(item.restocked);
        assert!(item.restocked_at.is_some());
        assert_eq!(service.pending_count().await, 1);

        let queue = service.list(true).await;
        assert_eq!(queue.items.len(), 1);
        assert_eq!(queue.items[0].id, 2);
    }

    #[tokio::test]
    async fn test_full_list_orders_pending_first() {
        let service = seeded().await;
        service.mark_restocked(1).await.unwrap();
        let queue = service.list(false).await;
        assert_eq!(queue.pending, 1);
        assert_eq!(queue.items.len(), 2);
        assert!(!queue.items[0].restocked);
        assert!(queue.items[1].restocked);
    }

    #[tokio::test]
    async fn test_mark_unknown_id_is_not_found() {
        let service = seeded().await;
        assert!(matches!(
            service.mark_restocked(99).await,
            Err(AppError::NotFound(_))
        ));
    }
}
