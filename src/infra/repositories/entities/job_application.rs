//! Job application database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{ApplicationStatus, JobApplication};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "job_applications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub company: String,
    pub title: String,
    pub status: String,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub applied_date: DateTimeUtc,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for JobApplication {
    fn from(model: Model) -> Self {
        JobApplication {
            id: model.id,
            user_id: model.user_id,
            company: model.company,
            title: model.title,
            status: ApplicationStatus::from(model.status.as_str()),
            location: model.location,
            notes: model.notes,
            applied_date: model.applied_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
