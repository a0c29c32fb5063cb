//! `SeaORM` Entity for activities table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::ActivityType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "activities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub description: String,
    pub activity_type: ActivityType,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub amount: Decimal,
    pub activity_date: Date,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::activity_resources::Entity")]
    ActivityResources,
    #[sea_orm(has_many = "super::schedules::Entity")]
    Schedules,
    #[sea_orm(has_many = "super::performance::Entity")]
    Performance,
    #[sea_orm(has_many = "super::activity_workers::Entity")]
    ActivityWorkers,
}

impl Related<super::activity_resources::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActivityResources.def()
    }
}

impl Related<super::schedules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Schedules.def()
    }
}

impl Related<super::performance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Performance.def()
    }
}

impl Related<super::activity_workers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActivityWorkers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
