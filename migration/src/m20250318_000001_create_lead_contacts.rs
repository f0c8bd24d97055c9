use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LeadContacts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LeadContacts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LeadContacts::VendorId).uuid().not_null())
                    .col(ColumnDef::new(LeadContacts::LeadId).integer().not_null())
                    .col(
                        ColumnDef::new(LeadContacts::ContactType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LeadContacts::Status)
                            .string_len(16)
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(
                        ColumnDef::new(LeadContacts::ContactDate)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LeadContacts::Notes).text().null())
                    .col(
                        ColumnDef::new(LeadContacts::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_lead_contacts_vendor_lead")
                    .table(LeadContacts::Table)
                    .col(LeadContacts::VendorId)
                    .col(LeadContacts::LeadId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LeadContacts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum LeadContacts {
    Table,
    Id,
    VendorId,
    LeadId,
    ContactType,
    Status,
    ContactDate,
    Notes,
    CreatedAt,
}
