use std::sync::Mutex;

use async_trait::async_trait;

use super::{
    DietRating, EstimationError, EstimationGateway, EstimationResult, Macros, MealImage,
    ProfileContext,
};

/// What the fake saw on its last call.
#[derive(Debug, Clone, Default)]
pub struct SeenCall {
    pub text: Option<String>,
    pub caption: Option<String>,
    pub image_len: Option<usize>,
    pub context: Option<ProfileContext>,
}

/// Replays a fixed outcome for every call and records the inputs.
pub struct FakeGateway {
    outcome: Box<dyn Fn() -> Result<EstimationResult, EstimationError> + Send + Sync>,
    pub seen: Mutex<Vec<SeenCall>>,
}

impl FakeGateway {
    pub fn returning(result: EstimationResult) -> Self {
        Self {
            outcome: Box::new(move || Ok(result.clone())),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            outcome: Box::new(|| Err(EstimationError::EmptyResponse)),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn last_call(&self) -> Option<SeenCall> {
        self.seen.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl EstimationGateway for FakeGateway {
    async fn estimate_from_text(
        &self,
        text: &str,
        ctx: Option<&ProfileContext>,
    ) -> Result<EstimationResult, EstimationError> {
        self.seen.lock().unwrap().push(SeenCall {
            text: Some(text.to_string()),
            context: ctx.cloned(),
            ..Default::default()
        });
        (self.outcome)()
    }

    async fn estimate_from_image(
        &self,
        image: &MealImage,
        caption: Option<&str>,
        ctx: Option<&ProfileContext>,
    ) -> Result<EstimationResult, EstimationError> {
        self.seen.lock().unwrap().push(SeenCall {
            caption: caption.map(str::to_string),
            image_len: Some(image.body.len()),
            context: ctx.cloned(),
            ..Default::default()
        });
        (self.outcome)()
    }
}

pub fn result_with_total(calories: f64, protein_g: f64, carbs_g: f64, fat_g: f64) -> EstimationResult {
    EstimationResult {
        items: Vec::new(),
        total: Macros::new(calories, protein_g, carbs_g, fat_g),
        diet_rating: DietRating::Yellow,
        advice: Vec::new(),
        follow_up_questions: Vec::new(),
    }
}
