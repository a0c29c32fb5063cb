//! `SeaORM` Entity for resources table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::ResourceType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "resources")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub unit: Option<String>,
    pub resource_type: ResourceType,
    pub threshold: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::activity_resources::Entity")]
    ActivityResources,
}

impl Related<super::activity_resources::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActivityResources.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
