use std::fmt::Write;

use crate::profiles::{Goal, UserProfile};

/// What the model gets to know about the user. Everything is optional at
/// the call site: no profile means no context block at all.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileContext {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub goal: Goal,
    pub target_calories: f64,
    pub target_protein_g: f64,
}

impl From<&UserProfile> for ProfileContext {
    fn from(p: &UserProfile) -> Self {
        Self {
            weight_kg: p.weight_kg,
            height_cm: p.height_cm,
            goal: p.goal,
            target_calories: p.target_calories,
            target_protein_g: p.target_protein_g,
        }
    }
}

pub const SYSTEM_PROMPT: &str = "You are a nutrition estimation assistant. \
Estimate the calories and macronutrients (protein, carbohydrates, fat in grams) of the meal the user describes or shows. \
List every recognizable food item with an estimated portion, then give the total for the whole meal. \
Always return your best numeric guess, never leave a number out, even when the portion or composition is unclear. \
When something important is ambiguous, add at most 2 short follow-up questions; they are optional and never replace the estimate. \
Give at most 3 short, practical advice lines.";

const RATING_RULES: &str = "Rate the meal with diet_rating: \
GREEN when it fits the daily targets without excess, \
YELLOW when it is borderline or the input is too ambiguous to judge (this is the default), \
RED when it clearly works against the targets or goal.";

fn goal_guidance(goal: Goal) -> &'static str {
    match goal {
        Goal::Cut => {
            "The user is cutting: favour a caloric deficit and sufficient protein, \
and when the call is borderline choose the stricter rating."
        }
        Goal::Maintain => "The user is maintaining weight: favour balanced meals close to their targets.",
        Goal::Bulk => {
            "The user is bulking: a moderate caloric surplus with high protein is desirable."
        }
    }
}

fn context_block(ctx: Option<&ProfileContext>) -> String {
    let Some(ctx) = ctx else {
        return "No user profile is configured; rate against general healthy-eating guidance.".into();
    };
    let mut out = String::from("User profile:\n");
    let _ = writeln!(out, "- weight: {:.1} kg", ctx.weight_kg);
    let _ = writeln!(out, "- height: {:.1} cm", ctx.height_cm);
    let _ = writeln!(out, "- goal: {}", ctx.goal);
    let _ = writeln!(out, "- daily calorie target: {:.0} kcal", ctx.target_calories);
    let _ = writeln!(out, "- daily protein target: {:.0} g", ctx.target_protein_g);
    out.push_str(goal_guidance(ctx.goal));
    out
}

/// Prompt for a free-text meal description.
pub fn text_prompt(text: &str, ctx: Option<&ProfileContext>) -> String {
    format!(
        "{}\n\n{}\n\nMeal description:\n{}",
        context_block(ctx),
        RATING_RULES,
        text.trim()
    )
}

/// Instruction that accompanies a meal photo.
pub fn image_prompt(caption: Option<&str>, ctx: Option<&ProfileContext>) -> String {
    let caption = caption.map(str::trim).filter(|c| !c.is_empty());
    let note = match caption {
        Some(c) => format!("The user added this caption to the photo:\n{c}"),
        None => "The photo has no caption; judge portions from the image alone.".into(),
    };
    format!(
        "{}\n\n{}\n\nEstimate the meal in the attached photo.\n{}",
        context_block(ctx),
        RATING_RULES,
        note
    )
}
