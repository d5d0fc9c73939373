use crate::entities::{prelude::*, prompts};
use crate::models::prompt::{NewPrompt, SearchFilters, SortBy};
use anyhow::Result;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;

pub const MAX_PAGE_SIZE: u64 = 50;
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Repository for gallery prompt storage and filtered listings.
pub struct PromptRepository {
    conn: DatabaseConnection,
}

impl PromptRepository {
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Filtered, sorted, paginated listing. Returns the page of prompts plus
    /// the total match count before pagination.
    ///
    /// Invalid paging input is clamped, never rejected: page is floored at 1
    /// and the page size bounded to `[1, MAX_PAGE_SIZE]`. A page beyond the
    /// end yields an empty list with the correct total.
    pub async fn list(
        &self,
        filters: &SearchFilters,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<prompts::Model>, u64)> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);

        let mut condition = Condition::all();

        if let Some(q) = filters.query.as_deref().map(str::trim)
            && !q.is_empty()
        {
            condition = condition.add(
                Condition::any()
                    .add(prompts::Column::Title.contains(q))
                    .add(prompts::Column::PromptText.contains(q))
                    .add(prompts::Column::Description.contains(q)),
            );
        }

        if let Some(category) = filters.category {
            condition = condition.add(prompts::Column::Category.eq(category.as_str()));
        }

        if let Some(min_likes) = filters.min_likes
            && min_likes > 0
        {
            condition = condition.add(prompts::Column::LikesCount.gte(min_likes));
        }

        let query = Prompts::find().filter(condition);
        let query = match filters.sort_by {
            SortBy::Recent => query.order_by_desc(prompts::Column::CreatedAt),
            SortBy::MostLiked => query.order_by_desc(prompts::Column::LikesCount),
            SortBy::Popular => query.order_by_desc(prompts::Column::UsageCount),
        };
        // Stable tiebreak so pages never overlap
        let query = query.order_by_asc(prompts::Column::Id);

        let paginator = query.paginate(&self.conn, page_size);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page - 1).await?;

        Ok((items, total))
    }

    pub async fn get(&self, id: &str) -> Result<Option<prompts::Model>> {
        Ok(Prompts::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn create(&self, prompt: &NewPrompt) -> Result<prompts::Model> {
        let id = uuid::Uuid::new_v4().to_string();

        let active_model = prompts::ActiveModel {
            id: Set(id.clone()),
            title: Set(prompt.title.clone()),
            prompt_text: Set(prompt.prompt_text.clone()),
            description: Set(prompt.description.clone()),
            category: Set(prompt.category.as_str().to_string()),
            created_at: Set(crate::db::now_timestamp()),
            ..Default::default()
        };

        Prompts::insert(active_model).exec(&self.conn).await?;

        let model = Prompts::find_by_id(&id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created prompt"))?;

        info!("Created prompt {}: {}", model.id, model.title);
        Ok(model)
    }

    pub async fn remove(&self, id: &str) -> Result<bool> {
        let result = Prompts::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    /// Bumps the usage counter. Counted per generation request, not per
    /// successful generation.
    pub async fn increment_usage(&self, id: &str) -> Result<()> {
        Prompts::update_many()
            .col_expr(
                prompts::Column::UsageCount,
                Expr::col(prompts::Column::UsageCount).add(1),
            )
            .filter(prompts::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Prompts::find().count(&self.conn).await?)
    }
}
