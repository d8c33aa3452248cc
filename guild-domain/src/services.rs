// Pure domain services: log parsers and the requirement evaluator

pub mod activity_parser;
pub mod challenge_parser;
pub mod item_extraction;
pub mod requirement;

pub use activity_parser::*;
pub use challenge_parser::*;
pub use item_extraction::*;
pub use requirement::*;
