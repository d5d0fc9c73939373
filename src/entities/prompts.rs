use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "prompts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub prompt_text: String,
    pub description: String,
    pub category: String,
    pub generated_image_url: Option<String>,
    pub usage_count: i32,
    pub likes_count: i32,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::generated_images::Entity")]
    GeneratedImages,
    #[sea_orm(has_many = "super::prompt_likes::Entity")]
    PromptLikes,
}

impl Related<super::generated_images::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GeneratedImages.def()
    }
}

impl Related<super::prompt_likes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PromptLikes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
