//! Create reservation_status_events table
//!
//! Append-only status ledger; the latest row per reservation is its
//! current status.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_reservations::Reservations;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReservationStatusEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReservationStatusEvents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ReservationStatusEvents::ReservationId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReservationStatusEvents::Status)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReservationStatusEvents::Reason)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(ReservationStatusEvents::ChangedBy)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReservationStatusEvents::ChangedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_status_events_reservation")
                            .from(
                                ReservationStatusEvents::Table,
                                ReservationStatusEvents::ReservationId,
                            )
                            .to(Reservations::Table, Reservations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Latest event per reservation
        manager
            .create_index(
                Index::create()
                    .name("idx_status_events_latest")
                    .table(ReservationStatusEvents::Table)
                    .col(ReservationStatusEvents::ReservationId)
                    .col(ReservationStatusEvents::ChangedAt)
                    .col(ReservationStatusEvents::Id)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReservationStatusEvents::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ReservationStatusEvents {
    Table,
    Id,
    ReservationId,
    Status,
    Reason,
    ChangedBy,
    ChangedAt,
}
