pub mod image;
pub mod like;
pub mod prompt;
