pub mod stage;
pub mod story_book;
