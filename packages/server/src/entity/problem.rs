use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "problem")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub study_id: i32,
    #[sea_orm(belongs_to, from = "study_id", to = "id")]
    pub study: HasOne<super::study::Entity>,

    /// Problem number on the judge platform (e.g. 1000 on BOJ).
    pub number: i32,
    pub title: String,
    pub platform: String,

    #[sea_orm(has_many)]
    pub submissions: HasMany<super::submission::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
