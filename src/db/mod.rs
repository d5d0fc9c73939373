use crate::entities::{generated_images, prompts};
use crate::models::prompt::{NewPrompt, SearchFilters};
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;
pub mod seed;

pub use repositories::prompt::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// UTC timestamp with microsecond precision. `CURRENT_TIMESTAMP` only
/// resolves to seconds, too coarse to order rapid inserts.
pub(crate) fn now_timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn prompt_repo(&self) -> repositories::prompt::PromptRepository {
        repositories::prompt::PromptRepository::new(self.conn.clone())
    }

    fn like_repo(&self) -> repositories::like::LikeRepository {
        repositories::like::LikeRepository::new(self.conn.clone())
    }

    fn image_repo(&self) -> repositories::image::ImageRepository {
        repositories::image::ImageRepository::new(self.conn.clone())
    }

    pub async fn list_prompts(
        &self,
        filters: &SearchFilters,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<prompts::Model>, u64)> {
        self.prompt_repo().list(filters, page, page_size).await
    }

    pub async fn get_prompt(&self, id: &str) -> Result<Option<prompts::Model>> {
        self.prompt_repo().get(id).await
    }

    pub async fn create_prompt(&self, prompt: &NewPrompt) -> Result<prompts::Model> {
        self.prompt_repo().create(prompt).await
    }

    pub async fn remove_prompt(&self, id: &str) -> Result<bool> {
        self.prompt_repo().remove(id).await
    }

    pub async fn increment_prompt_usage(&self, id: &str) -> Result<()> {
        self.prompt_repo().increment_usage(id).await
    }

    pub async fn prompt_count(&self) -> Result<u64> {
        self.prompt_repo().count().await
    }

    pub async fn like_prompt(&self, prompt_id: &str, session_id: &str) -> Result<bool> {
        self.like_repo().like(prompt_id, session_id).await
    }

    pub async fn unlike_prompt(&self, prompt_id: &str, session_id: &str) -> Result<bool> {
        self.like_repo().unlike(prompt_id, session_id).await
    }

    pub async fn has_liked(&self, prompt_id: &str, session_id: &str) -> Result<bool> {
        self.like_repo().has_liked(prompt_id, session_id).await
    }

    pub async fn liked_prompt_ids(&self, session_id: &str) -> Result<Vec<String>> {
        self.like_repo().liked_prompt_ids(session_id).await
    }

    pub async fn images_for_prompt(&self, prompt_id: &str) -> Result<Vec<generated_images::Model>> {
        self.image_repo().list_for_prompt(prompt_id).await
    }

    pub async fn save_generated_image(
        &self,
        prompt_id: &str,
        image_url: &str,
    ) -> Result<generated_images::Model> {
        self.image_repo().save(prompt_id, image_url).await
    }
}
