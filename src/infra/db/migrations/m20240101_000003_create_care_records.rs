//! Migration: per-user medications, reminders and donations.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_accounts::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Medications::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Medications::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Medications::UserId).uuid().not_null())
                    .col(ColumnDef::new(Medications::Name).string().not_null())
                    .col(ColumnDef::new(Medications::Description).text().null())
                    .col(ColumnDef::new(Medications::Dosage).string().not_null())
                    .col(ColumnDef::new(Medications::Frequency).string().not_null())
                    .col(ColumnDef::new(Medications::StartDate).date().not_null())
                    .col(ColumnDef::new(Medications::EndDate).date().null())
                    .col(ColumnDef::new(Medications::Notes).text().null())
                    .col(
                        ColumnDef::new(Medications::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Medications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Medications::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_medications_user")
                            .from(Medications::Table, Medications::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Reminders::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Reminders::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Reminders::UserId).uuid().not_null())
                    .col(ColumnDef::new(Reminders::MedicationId).uuid().not_null())
                    .col(ColumnDef::new(Reminders::ReminderTime).timestamp().not_null())
                    .col(ColumnDef::new(Reminders::Notes).text().null())
                    .col(
                        ColumnDef::new(Reminders::Completed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Reminders::CompletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Reminders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Reminders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reminders_user")
                            .from(Reminders::Table, Reminders::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reminders_medication")
                            .from(Reminders::Table, Reminders::MedicationId)
                            .to(Medications::Table, Medications::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reminders_user_time")
                    .table(Reminders::Table)
                    .col(Reminders::UserId)
                    .col(Reminders::ReminderTime)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Donations::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Donations::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Donations::UserId).uuid().not_null())
                    .col(ColumnDef::new(Donations::MedicineName).string().not_null())
                    .col(ColumnDef::new(Donations::Quantity).integer().not_null())
                    .col(ColumnDef::new(Donations::ExpiryDate).date().not_null())
                    .col(ColumnDef::new(Donations::Location).string().not_null())
                    .col(ColumnDef::new(Donations::Organization).string().null())
                    .col(ColumnDef::new(Donations::Notes).text().null())
                    .col(ColumnDef::new(Donations::Status).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Donations::DonationDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Donations::CompletedDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Donations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Donations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_donations_user")
                            .from(Donations::Table, Donations::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Donations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Reminders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Medications::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Medications {
    Table,
    Id,
    UserId,
    Name,
    Description,
    Dosage,
    Frequency,
    StartDate,
    EndDate,
    Notes,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Reminders {
    Table,
    Id,
    UserId,
    MedicationId,
    ReminderTime,
    Notes,
    Completed,
    CompletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Donations {
    Table,
    Id,
    UserId,
    MedicineName,
    Quantity,
    ExpiryDate,
    Location,
    Organization,
    Notes,
    Status,
    DonationDate,
    CompletedDate,
    CreatedAt,
    UpdatedAt,
}
