use crate::entities::{generated_images, prelude::*, prompts};
use anyhow::Result;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

/// Repository for the per-prompt generated-image gallery.
pub struct ImageRepository {
    conn: DatabaseConnection,
}

impl ImageRepository {
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Gallery listing, newest first.
    pub async fn list_for_prompt(&self, prompt_id: &str) -> Result<Vec<generated_images::Model>> {
        let rows = GeneratedImages::find()
            .filter(generated_images::Column::PromptId.eq(prompt_id))
            .order_by_desc(generated_images::Column::CreatedAt)
            .order_by_desc(generated_images::Column::Id)
            .all(&self.conn)
            .await?;
        Ok(rows)
    }

    /// Persists a generation result and refreshes the prompt's cached
    /// last-generated-image reference, atomically.
    pub async fn save(&self, prompt_id: &str, image_url: &str) -> Result<generated_images::Model> {
        let id = uuid::Uuid::new_v4().to_string();
        let txn = self.conn.begin().await?;

        let active_model = generated_images::ActiveModel {
            id: Set(id.clone()),
            prompt_id: Set(prompt_id.to_string()),
            image_url: Set(image_url.to_string()),
            created_at: Set(crate::db::now_timestamp()),
            ..Default::default()
        };
        GeneratedImages::insert(active_model).exec(&txn).await?;

        Prompts::update_many()
            .col_expr(
                prompts::Column::GeneratedImageUrl,
                Expr::value(image_url),
            )
            .filter(prompts::Column::Id.eq(prompt_id))
            .exec(&txn)
            .await?;

        let model = GeneratedImages::find_by_id(&id)
            .one(&txn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve saved image"))?;

        txn.commit().await?;
        Ok(model)
    }
}
