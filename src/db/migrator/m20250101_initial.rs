use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Prompts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Prompts::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Prompts::Title).text().not_null())
                    .col(ColumnDef::new(Prompts::PromptText).text().not_null())
                    .col(ColumnDef::new(Prompts::Description).text().not_null())
                    .col(ColumnDef::new(Prompts::Category).text().not_null())
                    .col(ColumnDef::new(Prompts::GeneratedImageUrl).text())
                    .col(
                        ColumnDef::new(Prompts::UsageCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Prompts::LikesCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Prompts::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GeneratedImages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GeneratedImages::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GeneratedImages::PromptId).string().not_null())
                    .col(ColumnDef::new(GeneratedImages::ImageUrl).text().not_null())
                    .col(
                        ColumnDef::new(GeneratedImages::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_generated_images_prompt")
                            .from(GeneratedImages::Table, GeneratedImages::PromptId)
                            .to(Prompts::Table, Prompts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PromptLikes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PromptLikes::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PromptLikes::PromptId).string().not_null())
                    .col(ColumnDef::new(PromptLikes::SessionId).text().not_null())
                    .col(
                        ColumnDef::new(PromptLikes::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_prompt_likes_prompt")
                            .from(PromptLikes::Table, PromptLikes::PromptId)
                            .to(Prompts::Table, Prompts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One like per (prompt, session) pair
        manager
            .create_index(
                Index::create()
                    .name("idx_prompt_likes_prompt_session")
                    .table(PromptLikes::Table)
                    .col(PromptLikes::PromptId)
                    .col(PromptLikes::SessionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_prompt_likes_session")
                    .table(PromptLikes::Table)
                    .col(PromptLikes::SessionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_generated_images_prompt")
                    .table(GeneratedImages::Table)
                    .col(GeneratedImages::PromptId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_prompts_category")
                    .table(Prompts::Table)
                    .col(Prompts::Category)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PromptLikes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GeneratedImages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Prompts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Prompts {
    Table,
    Id,
    Title,
    PromptText,
    Description,
    Category,
    GeneratedImageUrl,
    UsageCount,
    LikesCount,
    CreatedAt,
}

#[derive(DeriveIden)]
enum GeneratedImages {
    Table,
    Id,
    PromptId,
    ImageUrl,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PromptLikes {
    Table,
    Id,
    PromptId,
    SessionId,
    CreatedAt,
}
