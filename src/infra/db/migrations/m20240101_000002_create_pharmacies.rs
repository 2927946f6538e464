//! Migration: pharmacies, their staff roster and sales.

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
                    .table(Pharmacies::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Pharmacies::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Pharmacies::Name).string().not_null())
                    .col(
                        ColumnDef::new(Pharmacies::RegistrationNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Pharmacies::Address).string().not_null())
                    .col(ColumnDef::new(Pharmacies::Phone).string().not_null())
                    .col(ColumnDef::new(Pharmacies::Email).string().not_null())
                    .col(ColumnDef::new(Pharmacies::Website).string().null())
                    .col(ColumnDef::new(Pharmacies::OwnerId).uuid().not_null())
                    .col(
                        ColumnDef::new(Pharmacies::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Pharmacies::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Pharmacies::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pharmacies_owner")
                            .from(Pharmacies::Table, Pharmacies::OwnerId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PharmacyStaff::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PharmacyStaff::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(PharmacyStaff::PharmacyId).uuid().not_null())
                    .col(ColumnDef::new(PharmacyStaff::UserId).uuid().not_null())
                    .col(ColumnDef::new(PharmacyStaff::Role).string_len(16).not_null())
                    .col(
                        ColumnDef::new(PharmacyStaff::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(PharmacyStaff::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PharmacyStaff::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pharmacy_staff_pharmacy")
                            .from(PharmacyStaff::Table, PharmacyStaff::PharmacyId)
                            .to(Pharmacies::Table, Pharmacies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pharmacy_staff_user")
                            .from(PharmacyStaff::Table, PharmacyStaff::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One row per (pharmacy, user); role and active are updated in place
        manager
            .create_index(
                Index::create()
                    .name("idx_pharmacy_staff_pharmacy_user")
                    .table(PharmacyStaff::Table)
                    .col(PharmacyStaff::PharmacyId)
                    .col(PharmacyStaff::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Bills::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Bills::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Bills::PharmacyId).uuid().not_null())
                    .col(ColumnDef::new(Bills::BillNumber).string().not_null())
                    .col(ColumnDef::new(Bills::CustomerName).string().not_null())
                    .col(ColumnDef::new(Bills::TotalAmount).double().not_null())
                    .col(ColumnDef::new(Bills::CreatedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(Bills::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bills_pharmacy")
                            .from(Bills::Table, Bills::PharmacyId)
                            .to(Pharmacies::Table, Pharmacies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bills_created_by")
                            .from(Bills::Table, Bills::CreatedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bills_pharmacy_created_at")
                    .table(Bills::Table)
                    .col(Bills::PharmacyId)
                    .col(Bills::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bills::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PharmacyStaff::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Pharmacies::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Pharmacies {
    Table,
    Id,
    Name,
    RegistrationNumber,
    Address,
    Phone,
    Email,
    Website,
    OwnerId,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum PharmacyStaff {
    Table,
    Id,
    PharmacyId,
    UserId,
    Role,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Bills {
    Table,
    Id,
    PharmacyId,
    BillNumber,
    CustomerName,
    TotalAmount,
    CreatedBy,
    CreatedAt,
}
