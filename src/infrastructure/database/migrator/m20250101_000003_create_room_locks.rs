//! Create room_locks table
//!
//! Guard rows locked by bookings to serialise work on the same room.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RoomLocks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RoomLocks::RoomId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RoomLocks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RoomLocks::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum RoomLocks {
    Table,
    RoomId,
    CreatedAt,
}
