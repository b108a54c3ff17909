use async_trait::async_trait;
use sea_orm::{
    AccessMode, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IsolationLevel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    entity,
    error::UserResult,
    models::{NewUser, UpdateUser, User},
    repository::UserRepository,
};

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn save(&self, user: NewUser) -> UserResult<User> {
        let model = entity::ActiveModel::for_insert(user).insert(&self.db).await?;

        tracing::info!(user_id = %model.id, "Created user");
        Ok(model.into())
    }

    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn find_page(&self, offset: u64, limit: u64) -> UserResult<(Vec<User>, u64)> {
        // Count and slice see the same snapshot
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::RepeatableRead),
                Some(AccessMode::ReadOnly),
            )
            .await?;

        let total = entity::Entity::find().count(&txn).await?;
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::Created)
            .order_by_asc(entity::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&txn)
            .await?;

        txn.commit().await?;

        Ok((models.into_iter().map(Into::into).collect(), total))
    }

    async fn update(&self, id: Uuid, patch: &UpdateUser) -> UserResult<()> {
        if patch.is_empty() {
            return Ok(());
        }

        entity::Entity::update_many()
            .set(entity::ActiveModel::for_patch(patch))
            .filter(entity::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        tracing::info!(user_id = %id, "Updated user");
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> UserResult<()> {
        entity::Entity::delete_by_id(id).exec(&self.db).await?;

        tracing::info!(user_id = %id, "Deleted user");
        Ok(())
    }

    async fn exists(&self, id: Uuid) -> UserResult<bool> {
        let count = entity::Entity::find()
            .filter(entity::Column::Id.eq(id))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }
}
