//! Reservation entity
//!
//! Deliberately has no status column: the current status is projected
//! from `reservation_status_events`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Room in the inventory service's catalog
    pub room_id: Uuid,

    /// Identity-service account; NULL for guest bookings
    #[sea_orm(nullable)]
    pub account_id: Option<Uuid>,

    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: String,

    pub check_in: DateTimeUtc,
    pub check_out: DateTimeUtc,

    /// Total charge in the smallest currency unit (cents)
    pub total_price_minor: i64,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::reservation_status_event::Entity")]
    StatusEvents,
}

impl Related<super::reservation_status_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StatusEvents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
