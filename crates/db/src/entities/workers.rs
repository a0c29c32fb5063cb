//! `SeaORM` Entity for workers table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "workers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub hourly_rate: Decimal,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::activity_workers::Entity")]
    ActivityWorkers,
}

impl Related<super::activity_workers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActivityWorkers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
