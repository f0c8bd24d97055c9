use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Price of a single BUY_EXTRA top-up beyond the plan quota
        manager
            .alter_table(
                Table::alter()
                    .table(Plans::Table)
                    .add_column(
                        ColumnDef::new(Plans::ExtraLeadPrice)
                            .decimal_len(12, 2)
                            .not_null()
                            .default("0"),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Plans::Table)
                    .drop_column(Plans::ExtraLeadPrice)
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum Plans {
    Table,
    ExtraLeadPrice,
}
