pub use super::generated_images::Entity as GeneratedImages;
pub use super::prompt_likes::Entity as PromptLikes;
pub use super::prompts::Entity as Prompts;
