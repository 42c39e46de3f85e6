//! Create reservations table
//!
//! One row per booked stay. Rows are written once and never updated.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reservations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reservations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reservations::RoomId).uuid().not_null())
                    .col(ColumnDef::new(Reservations::AccountId).uuid())
                    .col(ColumnDef::new(Reservations::GuestName).string().not_null())
                    .col(ColumnDef::new(Reservations::GuestEmail).string().not_null())
                    .col(
                        ColumnDef::new(Reservations::GuestPhone)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Reservations::CheckIn)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::CheckOut)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::TotalPriceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Serves the overlap predicate `room_id IN (..) AND check_in < ? AND check_out > ?`
        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_room_window")
                    .table(Reservations::Table)
                    .col(Reservations::RoomId)
                    .col(Reservations::CheckIn)
                    .col(Reservations::CheckOut)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_account")
                    .table(Reservations::Table)
                    .col(Reservations::AccountId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reservations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Reservations {
    Table,
    Id,
    RoomId,
    AccountId,
    GuestName,
    GuestEmail,
    GuestPhone,
    CheckIn,
    CheckOut,
    TotalPriceMinor,
    CreatedAt,
}
