use crate::entities::{prelude::*, prompt_likes, prompts};
use anyhow::Result;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect, Set, SqlErr,
    TransactionTrait,
};

/// Ledger of anonymous per-session likes.
///
/// Every like/unlike is applied together with the denormalized
/// `prompts.likes_count` adjustment inside one transaction, so the counter
/// always equals the number of ledger rows for that prompt.
pub struct LikeRepository {
    conn: DatabaseConnection,
}

impl LikeRepository {
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Records a like. Returns `false` without mutating anything when the
    /// (prompt, session) pair is already present.
    pub async fn like(&self, prompt_id: &str, session_id: &str) -> Result<bool> {
        let txn = self.conn.begin().await?;

        let existing = PromptLikes::find()
            .filter(prompt_likes::Column::PromptId.eq(prompt_id))
            .filter(prompt_likes::Column::SessionId.eq(session_id))
            .one(&txn)
            .await?;

        if existing.is_some() {
            return Ok(false);
        }

        let active_model = prompt_likes::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            prompt_id: Set(prompt_id.to_string()),
            session_id: Set(session_id.to_string()),
            ..Default::default()
        };
        // A concurrent like can slip past the existence check; the unique
        // (prompt, session) index then rejects the loser, which is the same
        // soft duplicate outcome.
        if let Err(err) = PromptLikes::insert(active_model).exec(&txn).await {
            if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                return Ok(false);
            }
            return Err(err.into());
        }

        Prompts::update_many()
            .col_expr(
                prompts::Column::LikesCount,
                Expr::col(prompts::Column::LikesCount).add(1),
            )
            .filter(prompts::Column::Id.eq(prompt_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(true)
    }

    /// Removes a like. Returns `false` when no such like exists. The counter
    /// decrement is floored at 0 so a double-unlike race can never drive it
    /// negative.
    pub async fn unlike(&self, prompt_id: &str, session_id: &str) -> Result<bool> {
        let txn = self.conn.begin().await?;

        let result = PromptLikes::delete_many()
            .filter(prompt_likes::Column::PromptId.eq(prompt_id))
            .filter(prompt_likes::Column::SessionId.eq(session_id))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            return Ok(false);
        }

        Prompts::update_many()
            .col_expr(
                prompts::Column::LikesCount,
                Expr::cust("MAX(likes_count - 1, 0)"),
            )
            .filter(prompts::Column::Id.eq(prompt_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(true)
    }

    pub async fn has_liked(&self, prompt_id: &str, session_id: &str) -> Result<bool> {
        let existing = PromptLikes::find()
            .filter(prompt_likes::Column::PromptId.eq(prompt_id))
            .filter(prompt_likes::Column::SessionId.eq(session_id))
            .one(&self.conn)
            .await?;
        Ok(existing.is_some())
    }

    pub async fn liked_prompt_ids(&self, session_id: &str) -> Result<Vec<String>> {
        let ids = PromptLikes::find()
            .select_only()
            .column(prompt_likes::Column::PromptId)
            .filter(prompt_likes::Column::SessionId.eq(session_id))
            .into_tuple::<String>()
            .all(&self.conn)
            .await?;
        Ok(ids)
    }
}
