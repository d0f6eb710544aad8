use async_trait::async_trait;
use bytes::Bytes;

use super::{EstimationError, EstimationResult, ProfileContext};

/// A photo as received from the chat bridge.
#[derive(Debug, Clone)]
pub struct MealImage {
    pub body: Bytes,
    pub content_type: String,
}

/// Turns a meal description into a schema-conforming [`EstimationResult`].
#[async_trait]
pub trait EstimationGateway: Send + Sync {
    async fn estimate_from_text(
        &self,
        text: &str,
        ctx: Option<&ProfileContext>,
    ) -> Result<EstimationResult, EstimationError>;

    async fn estimate_from_image(
        &self,
        image: &MealImage,
        caption: Option<&str>,
        ctx: Option<&ProfileContext>,
    ) -> Result<EstimationResult, EstimationError>;
}
