use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VendorPreferences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VendorPreferences::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(VendorPreferences::VendorId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(VendorPreferences::Categories)
                            .json_binary()
                            .null(),
                    )
                    .col(ColumnDef::new(VendorPreferences::States).json_binary().null())
                    .col(ColumnDef::new(VendorPreferences::Cities).json_binary().null())
                    .col(
                        ColumnDef::new(VendorPreferences::BudgetMin)
                            .decimal_len(12, 2)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(VendorPreferences::BudgetMax)
                            .decimal_len(12, 2)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(VendorPreferences::AutoLeadFilter)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(VendorPreferences::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .col(
                        ColumnDef::new(VendorPreferences::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VendorPreferences::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum VendorPreferences {
    Table,
    Id,
    VendorId,
    Categories,
    States,
    Cities,
    BudgetMin,
    BudgetMax,
    AutoLeadFilter,
    CreatedAt,
    UpdatedAt,
}
