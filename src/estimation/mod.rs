mod error;
#[cfg(test)]
pub mod fake;
mod gateway;
pub mod openai;
pub mod prompt;
pub mod schema;

pub use error::EstimationError;
pub use gateway::{EstimationGateway, MealImage};
pub use openai::OpenAiGateway;
pub use prompt::ProfileContext;
pub use schema::{DietRating, EstimationResult, FoodItem, Macros};
