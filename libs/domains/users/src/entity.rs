use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

use crate::models::{NewUser, UpdateUser, User};

/// Sea-ORM Entity for the users table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub email: String,
    #[sea_orm(column_type = "Text")]
    pub given_name: String,
    #[sea_orm(column_type = "Text")]
    pub family_name: String,
    /// Milliseconds since the Unix epoch
    pub created: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            given_name: model.given_name,
            family_name: model.family_name,
            created: model.created,
        }
    }
}

impl ActiveModel {
    /// Insert model with a fresh UUIDv7
    pub fn for_insert(user: NewUser) -> Self {
        Self {
            id: Set(Uuid::now_v7()),
            email: Set(user.email),
            given_name: Set(user.given_name),
            family_name: Set(user.family_name),
            created: Set(user.created),
        }
    }

    /// Only the patched columns are set
    pub fn for_patch(patch: &UpdateUser) -> Self {
        Self {
            id: NotSet,
            email: patch.email.clone().map_or(NotSet, Set),
            given_name: patch.given_name.clone().map_or(NotSet, Set),
            family_name: patch.family_name.clone().map_or(NotSet, Set),
            created: NotSet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_leaves_unset_columns_alone() {
        let patch = UpdateUser {
            family_name: Some("X".to_string()),
            ..Default::default()
        };

        let active = ActiveModel::for_patch(&patch);
        assert_eq!(active.family_name, Set("X".to_string()));
        assert_eq!(active.email, NotSet);
        assert_eq!(active.id, NotSet);
        assert_eq!(active.created, NotSet);
    }
}
