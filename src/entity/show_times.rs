use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "show_times")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub date: Date,
    pub time_start: String,
    pub time_end: String,
    pub staff_id: Uuid,
    pub status: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
