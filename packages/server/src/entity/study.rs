use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "study")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    pub leader_id: i32,
    /// Name of the repository every member commits solutions to.
    pub repository_name: String,
    pub repository_url: String,

    #[sea_orm(has_many)]
    pub problems: HasMany<super::problem::Entity>,

    #[sea_orm(has_many, via = "study_member")]
    pub members: HasMany<super::user::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
