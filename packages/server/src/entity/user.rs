use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A study member as known to the identity provider.
///
/// `display_name` doubles as the owner of the member's copy of every study
/// repository, so it is unique.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub display_name: String,
    /// Remote repository access token. Never serialized.
    #[serde(skip_serializing)]
    pub access_token: String,

    #[sea_orm(has_many)]
    pub submissions: HasMany<super::submission::Entity>,

    #[sea_orm(has_many, via = "study_member")]
    pub studies: HasMany<super::study::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
