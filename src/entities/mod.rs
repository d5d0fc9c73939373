pub mod prelude;

pub mod generated_images;
pub mod prompt_likes;
pub mod prompts;
