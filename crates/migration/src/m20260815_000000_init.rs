//! Initial schema migration - creates all tables from scratch.
//!
//! Complete schema for Farebox:
//!
//! - `customers`: registered riders, root of the owning aggregate
//! - `cards`: stored-value cards, the unit of balance mutation
//! - `trips`: settled journeys billed against a card
//! - `cases`: customer-service cases
//! - `tap_history`: append-only log of card presentations
//! - `fare_disputes`: mischarge claims against trips

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Customers {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Notifications,
    JoinDate,
}

#[derive(Iden)]
enum Cards {
    Table,
    Id,
    CardType,
    Status,
    BalanceMinor,
    Product,
    IssueDate,
    CustomerId,
}

#[derive(Iden)]
enum Trips {
    Table,
    Id,
    StartTime,
    EndTime,
    EntryLocation,
    ExitLocation,
    FareMinor,
    Route,
    Operator,
    TransitMode,
    Adjustable,
    CardId,
}

#[derive(Iden)]
enum Cases {
    Table,
    Id,
    CreatedDate,
    LastUpdated,
    CustomerId,
    CardId,
    CaseStatus,
    Priority,
    Category,
    AssignedAgent,
    Notes,
}

#[derive(Iden)]
enum TapHistory {
    Table,
    Id,
    TapTime,
    Location,
    DeviceId,
    TransitMode,
    Direction,
    CustomerId,
    Outcome,
}

#[derive(Iden)]
enum FareDisputes {
    Table,
    Id,
    DisputeDate,
    CardId,
    TripId,
    AmountMinor,
    Description,
    DisputeType,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Customers
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Customers::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Customers::Name).string().not_null())
                    .col(ColumnDef::new(Customers::Email).string().not_null())
                    .col(ColumnDef::new(Customers::Phone).string().not_null())
                    .col(ColumnDef::new(Customers::Notifications).string().not_null())
                    .col(
                        ColumnDef::new(Customers::JoinDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-customers-name-unique")
                    .table(Customers::Table)
                    .col(Customers::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-customers-email-unique")
                    .table(Customers::Table)
                    .col(Customers::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Cards
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Cards::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cards::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Cards::CardType).string().not_null())
                    .col(ColumnDef::new(Cards::Status).string().not_null())
                    .col(
                        ColumnDef::new(Cards::BalanceMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Cards::Product).string())
                    .col(
                        ColumnDef::new(Cards::IssueDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Cards::CustomerId).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-cards-customer_id")
                            .from(Cards::Table, Cards::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-cards-customer_id")
                    .table(Cards::Table)
                    .col(Cards::CustomerId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Trips
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Trips::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Trips::Id).string().not_null().primary_key())
                    .col(
                        ColumnDef::new(Trips::StartTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Trips::EndTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Trips::EntryLocation).string().not_null())
                    .col(ColumnDef::new(Trips::ExitLocation).string().not_null())
                    .col(ColumnDef::new(Trips::FareMinor).big_integer().not_null())
                    .col(ColumnDef::new(Trips::Route).string().not_null())
                    .col(ColumnDef::new(Trips::Operator).string().not_null())
                    .col(ColumnDef::new(Trips::TransitMode).string().not_null())
                    .col(ColumnDef::new(Trips::Adjustable).boolean().not_null())
                    .col(ColumnDef::new(Trips::CardId).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-trips-card_id")
                            .from(Trips::Table, Trips::CardId)
                            .to(Cards::Table, Cards::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-trips-card_id")
                    .table(Trips::Table)
                    .col(Trips::CardId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Cases
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Cases::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cases::Id).string().not_null().primary_key())
                    .col(
                        ColumnDef::new(Cases::CreatedDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Cases::LastUpdated)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Cases::CustomerId).string().not_null())
                    .col(ColumnDef::new(Cases::CardId).string())
                    .col(ColumnDef::new(Cases::CaseStatus).string().not_null())
                    .col(ColumnDef::new(Cases::Priority).string().not_null())
                    .col(ColumnDef::new(Cases::Category).string().not_null())
                    .col(ColumnDef::new(Cases::AssignedAgent).string().not_null())
                    .col(ColumnDef::new(Cases::Notes).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-cases-customer_id")
                            .from(Cases::Table, Cases::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-cases-card_id")
                            .from(Cases::Table, Cases::CardId)
                            .to(Cards::Table, Cards::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Tap history
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(TapHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TapHistory::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TapHistory::TapTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TapHistory::Location).string().not_null())
                    .col(ColumnDef::new(TapHistory::DeviceId).string().not_null())
                    .col(ColumnDef::new(TapHistory::TransitMode).string().not_null())
                    .col(ColumnDef::new(TapHistory::Direction).string().not_null())
                    .col(ColumnDef::new(TapHistory::CustomerId).string().not_null())
                    .col(ColumnDef::new(TapHistory::Outcome).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-tap_history-customer_id")
                            .from(TapHistory::Table, TapHistory::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-tap_history-customer_id")
                    .table(TapHistory::Table)
                    .col(TapHistory::CustomerId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Fare disputes
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(FareDisputes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FareDisputes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FareDisputes::DisputeDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FareDisputes::CardId).string().not_null())
                    .col(
                        ColumnDef::new(FareDisputes::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FareDisputes::Description).text())
                    .col(ColumnDef::new(FareDisputes::TripId).string().not_null())
                    .col(ColumnDef::new(FareDisputes::DisputeType).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-fare_disputes-card_id")
                            .from(FareDisputes::Table, FareDisputes::CardId)
                            .to(Cards::Table, Cards::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-fare_disputes-trip_id")
                            .from(FareDisputes::Table, FareDisputes::TripId)
                            .to(Trips::Table, Trips::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FareDisputes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TapHistory::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cases::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Trips::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cards::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await?;
        Ok(())
    }
}
