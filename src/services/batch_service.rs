// src/services/batch_service.rs

use std::sync::Arc;

use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::{
    common::error::AppError,
    db::BatchStore,
    models::batch::Batch,
};

/// Ciclo de vida dos lotes: criação do ativo, finalização e exclusão.
#[derive(Clone)]
pub struct BatchService {
    store: Arc<dyn BatchStore>,
}

fn required_field_error(field: &'static str, message: &'static str) -> AppError {
    let mut err = ValidationError::new("required");
    err.message = Some(message.into());
    let mut errors = ValidationErrors::new();
    errors.add(field, err);
    AppError::ValidationError(errors)
}

impl BatchService {
    pub fn new(store: Arc<dyn BatchStore>) -> Self {
        Self { store }
    }

    pub async fn create_active_batch(&self, name: &str) -> Result<Batch, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(required_field_error("name", "O nome do lote é obrigatório."));
        }

        let batch = self.store.insert_active(name).await?;
        tracing::info!(batch_id = %batch.id, name = %batch.name, "lote ativo criado");
        Ok(batch)
    }

    pub async fn finalize_active_batch(&self) -> Result<Batch, AppError> {
        let batch = self
            .store
            .finalize_active()
            .await?
            .ok_or(AppError::NoActiveBatch)?;
        tracing::info!(batch_id = %batch.id, "lote finalizado");
        Ok(batch)
    }

    pub async fn get_active_batch(&self) -> Result<Batch, AppError> {
        self.store.find_active().await?.ok_or(AppError::NoActiveBatch)
    }

    pub async fn get_batch(&self, id: Uuid) -> Result<Batch, AppError> {
        self.store.find_by_id(id).await?.ok_or(AppError::BatchNotFound)
    }

    pub async fn list_batches(&self) -> Result<Vec<Batch>, AppError> {
        self.store.list_all().await
    }

    pub async fn list_finalized(&self) -> Result<Vec<Batch>, AppError> {
        self.store.list_finalized().await
    }

    pub async fn delete_batch(&self, id: Uuid) -> Result<(), AppError> {
        let batch = self.get_batch(id).await?;
        if batch.active {
            return Err(AppError::ActiveBatchNotDeletable);
        }

        // O lote pode ter sido reativado/excluído entre a leitura e o DELETE
        if !self.store.delete_inactive(id).await? {
            return Err(AppError::BatchNotFound);
        }
        tracing::info!(batch_id = %id, "lote excluído");
        Ok(())
    }

    /// Exclui em massa os lotes finalizados; ids ativos ou inexistentes são ignorados.
    pub async fn delete_finalized(&self, ids: &[Uuid]) -> Result<u64, AppError> {
        if ids.is_empty() {
            return Err(AppError::InvalidInput("ids".into()));
        }
        let deleted = self.store.delete_finalized(ids).await?;
        tracing::info!(requested = ids.len(), deleted, "lotes finalizados excluídos");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{memory::MemoryStore, EventStore};
    use crate::models::events::NewObservation;

    fn service() -> (BatchService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (BatchService::new(store.clone()), store)
    }

    #[tokio::test]
    async fn only_one_active_batch_at_a_time() {
        let (service, _) = service();

        let a = service.create_active_batch("A").await.unwrap();
        assert!(a.active);
        assert!(a.finalized_at.is_none());

        assert!(matches!(
            service.create_active_batch("B").await,
            Err(AppError::ActiveBatchExists)
        ));

        let finalized = service.finalize_active_batch().await.unwrap();
        assert_eq!(finalized.id, a.id);
        assert!(!finalized.active);
        assert!(finalized.finalized_at.is_some());

        let b = service.create_active_batch("B").await.unwrap();
        assert_eq!(service.get_active_batch().await.unwrap().id, b.id);
    }

    #[tokio::test]
    async fn name_is_required_and_trimmed() {
        let (service, _) = service();

        assert!(matches!(
            service.create_active_batch("   ").await,
            Err(AppError::ValidationError(_))
        ));
        let batch = service.create_active_batch("  Lote Março ").await.unwrap();
        assert_eq!(batch.name, "Lote Março");
    }

    #[tokio::test]
    async fn finalize_without_active_batch_fails() {
        let (service, _) = service();
        assert!(matches!(
            service.finalize_active_batch().await,
            Err(AppError::NoActiveBatch)
        ));
        assert!(matches!(
            service.get_active_batch().await,
            Err(AppError::NoActiveBatch)
        ));
    }

    #[tokio::test]
    async fn active_batch_cannot_be_deleted() {
        let (service, _) = service();
        let batch = service.create_active_batch("A").await.unwrap();

        assert!(matches!(
            service.delete_batch(batch.id).await,
            Err(AppError::ActiveBatchNotDeletable)
        ));
        assert!(matches!(
            service.delete_batch(Uuid::new_v4()).await,
            Err(AppError::BatchNotFound)
        ));
    }

    #[tokio::test]
    async fn deleting_a_batch_cascades_to_its_events() {
        let (service, store) = service();
        let batch = service.create_active_batch("A").await.unwrap();
        store
            .insert_observation(NewObservation { batch_id: batch.id, text: "Água ok".into() })
            .await
            .unwrap();
        service.finalize_active_batch().await.unwrap();

        service.delete_batch(batch.id).await.unwrap();
        assert!(store.list_observations(batch.id).await.unwrap().is_empty());
        assert!(matches!(
            service.get_batch(batch.id).await,
            Err(AppError::BatchNotFound)
        ));
    }

    #[tokio::test]
    async fn bulk_delete_skips_active_batches() {
        let (service, _) = service();
        let first = service.create_active_batch("A").await.unwrap();
        service.finalize_active_batch().await.unwrap();
        let second = service.create_active_batch("B").await.unwrap();

        assert!(matches!(
            service.delete_finalized(&[]).await,
            Err(AppError::InvalidInput(_))
        ));

        let deleted = service
            .delete_finalized(&[first.id, second.id, Uuid::new_v4()])
            .await
            .unwrap();
        assert_eq!(deleted, 1);
        assert!(service.list_finalized().await.unwrap().is_empty());
        assert_eq!(service.list_batches().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn listings_are_newest_first() {
        let (service, _) = service();
        let a = service.create_active_batch("A").await.unwrap();
        service.finalize_active_batch().await.unwrap();
        let b = service.create_active_batch("B").await.unwrap();
        service.finalize_active_batch().await.unwrap();
        let c = service.create_active_batch("C").await.unwrap();

        let all: Vec<Uuid> = service.list_batches().await.unwrap().iter().map(|b| b.id).collect();
        assert_eq!(all, vec![c.id, b.id, a.id]);

        let finalized: Vec<Uuid> =
            service.list_finalized().await.unwrap().iter().map(|b| b.id).collect();
        assert_eq!(finalized, vec![b.id, a.id]);
    }
}
