use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Vendors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Vendors::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Vendors::CompanyName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Vendors::ContactName).string_len(255).null())
                    .col(
                        ColumnDef::new(Vendors::Email)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Vendors::Phone).string_len(32).null())
                    .col(
                        ColumnDef::new(Vendors::ReferralCode)
                            .string_len(16)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Vendors::Status)
                            .string_len(16)
                            .not_null()
                            .default("ACTIVE"),
                    )
                    .col(
                        ColumnDef::new(Vendors::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .col(
                        ColumnDef::new(Vendors::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .to_owned(),
            )
            .await?;

        // Referral codes are looked up on every link attempt
        manager
            .create_index(
                Index::create()
                    .name("idx_vendors_referral_code")
                    .table(Vendors::Table)
                    .col(Vendors::ReferralCode)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Vendors::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Vendors {
    Table,
    Id,
    CompanyName,
    ContactName,
    Email,
    Phone,
    ReferralCode,
    Status,
    CreatedAt,
    UpdatedAt,
}
