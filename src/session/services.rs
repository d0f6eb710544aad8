//! Binds one inbound chat message to the core: load profile context, estimate,
//! log, reply. The profile is read before the inference call and the log is
//! written after it; no lock is held while the call is in flight.

use std::future::Future;

use tracing::{instrument, warn};

use super::commands::{self, Command};
use super::dto::{Reply, ReplyKind};
use super::format::{
    format_estimate, format_profile, format_progress, format_reset, format_targets, format_today,
    help_text, RETRY_NOTICE,
};
use crate::error::AppError;
use crate::estimation::{EstimationError, EstimationResult, MealImage, ProfileContext};
use crate::ledger::{services as ledger, Source};
use crate::profiles::services::{get_profile, upsert_profile};
use crate::state::AppState;

const SUPPORTED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];

/// Normalizes an upload's content type, or `None` if the model cannot read it.
pub fn image_mime(content_type: &str) -> Option<&'static str> {
    let ct = content_type.trim().to_ascii_lowercase();
    let ct = if ct == "image/jpg" { "image/jpeg".to_string() } else { ct };
    SUPPORTED_IMAGE_TYPES.iter().copied().find(|t| *t == ct)
}

/// Turns per-message failures into replies. Only storage failures escape.
fn respond(outcome: Result<Reply, AppError>) -> Result<Reply, AppError> {
    match outcome {
        Ok(reply) => Ok(reply),
        Err(AppError::Validation(msg)) => Ok(Reply::new(ReplyKind::Usage, msg)),
        Err(AppError::Estimation(e)) => {
            warn!(error = %e, "estimation failed, nothing logged");
            Ok(Reply::new(ReplyKind::Retry, RETRY_NOTICE))
        }
        Err(e @ AppError::Storage(_)) => Err(e),
    }
}

#[instrument(skip(st, text))]
pub async fn handle_text(st: &AppState, user_id: i64, text: &str) -> Result<Reply, AppError> {
    respond(dispatch_text(st, user_id, text).await)
}

#[instrument(skip(st, image, caption), fields(bytes = image.body.len()))]
pub async fn handle_photo(
    st: &AppState,
    user_id: i64,
    image: MealImage,
    caption: Option<String>,
) -> Result<Reply, AppError> {
    respond(log_photo(st, user_id, image, caption).await)
}

async fn dispatch_text(st: &AppState, user_id: i64, text: &str) -> Result<Reply, AppError> {
    let reply = match commands::parse(text)? {
        Command::Help => Reply::new(ReplyKind::Help, help_text()),
        Command::Setup {
            weight_kg,
            height_cm,
            goal,
        } => {
            let targets = upsert_profile(st, user_id, weight_kg, height_cm, &goal).await?;
            Reply::new(ReplyKind::ProfileSaved, format_targets(&targets))
        }
        Command::Profile => {
            let profile = get_profile(st, user_id).await?;
            Reply::new(ReplyKind::Profile, format_profile(profile.as_ref()))
        }
        Command::Today => {
            let profile = get_profile(st, user_id).await?;
            let totals = ledger::sum_today(st, user_id).await?;
            let entries = ledger::list_today(st, user_id).await?;
            Reply::new(
                ReplyKind::Today,
                format_today(&totals, entries.len(), profile.as_ref()),
            )
        }
        Command::ResetDay => {
            let deleted = ledger::reset_today(st, user_id).await?;
            Reply::new(ReplyKind::Reset, format_reset(deleted))
        }
        Command::Unknown(name) => Reply::new(
            ReplyKind::Usage,
            format!("Unknown command /{name}.\n\n{}", help_text()),
        ),
        Command::Meal(text) => log_text(st, user_id, &text).await?,
    };
    Ok(reply)
}

async fn log_text(st: &AppState, user_id: i64, text: &str) -> Result<Reply, AppError> {
    let profile = get_profile(st, user_id).await?;
    let ctx = profile.as_ref().map(ProfileContext::from);
    let result = with_deadline(st, st.gateway.estimate_from_text(text, ctx.as_ref())).await?;
    finish_meal(st, user_id, Source::Text, text, &result, profile.as_ref()).await
}

async fn log_photo(
    st: &AppState,
    user_id: i64,
    mut image: MealImage,
    caption: Option<String>,
) -> Result<Reply, AppError> {
    if image.body.is_empty() {
        return Err(AppError::validation("The photo is empty."));
    }
    let mime = image_mime(&image.content_type).ok_or_else(|| {
        AppError::validation(format!(
            "Unsupported image type {}. Send a JPEG, PNG, WebP or GIF.",
            image.content_type
        ))
    })?;
    image.content_type = mime.to_string();
    let caption = caption.map(|c| c.trim().to_string()).filter(|c| !c.is_empty());

    let profile = get_profile(st, user_id).await?;
    let ctx = profile.as_ref().map(ProfileContext::from);
    let result = with_deadline(
        st,
        st.gateway
            .estimate_from_image(&image, caption.as_deref(), ctx.as_ref()),
    )
    .await?;
    let raw_input = caption.unwrap_or_default();
    finish_meal(st, user_id, Source::Photo, &raw_input, &result, profile.as_ref()).await
}

async fn with_deadline<F>(st: &AppState, fut: F) -> Result<EstimationResult, EstimationError>
where
    F: Future<Output = Result<EstimationResult, EstimationError>>,
{
    let deadline = st.config.estimation_deadline;
    tokio::time::timeout(deadline, fut)
        .await
        .map_err(|_| EstimationError::Timeout(deadline))?
}

async fn finish_meal(
    st: &AppState,
    user_id: i64,
    source: Source,
    raw_input: &str,
    result: &EstimationResult,
    profile: Option<&crate::profiles::UserProfile>,
) -> Result<Reply, AppError> {
    ledger::log_entry(st, user_id, source, raw_input, result).await?;
    let totals = ledger::sum_today(st, user_id).await?;
    let text = format!(
        "{}\n\n{}",
        format_estimate(result),
        format_progress(&totals, profile)
    );
    Ok(Reply::new(ReplyKind::Logged, text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimation::fake::{result_with_total, FakeGateway};
    use crate::estimation::{EstimationGateway, Macros, ProfileContext};
    use crate::profiles::Goal;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::Arc;
    use std::time::Duration;

    async fn state_with(fake: Arc<FakeGateway>) -> AppState {
        AppState::fake_with(fake).await
    }

    fn jpeg() -> MealImage {
        MealImage {
            body: Bytes::from_static(&[0xff, 0xd8, 0xff, 0xe0]),
            content_type: "image/jpg".into(),
        }
    }

    #[tokio::test]
    async fn meal_text_is_estimated_and_logged() {
        let fake = Arc::new(FakeGateway::returning(result_with_total(500.0, 30.0, 50.0, 20.0)));
        let st = state_with(fake.clone()).await;

        let reply = handle_text(&st, 1, "chicken with rice").await.unwrap();
        assert_eq!(reply.kind, ReplyKind::Logged);
        assert!(reply.text.contains("Total: 500 kcal"));
        assert!(reply.text.contains("Today: 500 kcal"));

        let call = fake.last_call().unwrap();
        assert_eq!(call.text.as_deref(), Some("chicken with rice"));
        assert!(call.context.is_none());
        assert_eq!(
            ledger::sum_today(&st, 1).await.unwrap(),
            Macros::new(500.0, 30.0, 50.0, 20.0)
        );
    }

    #[tokio::test]
    async fn profile_context_reaches_gateway() {
        let fake = Arc::new(FakeGateway::returning(result_with_total(400.0, 20.0, 30.0, 10.0)));
        let st = state_with(fake.clone()).await;

        let saved = handle_text(&st, 3, "/setup 80 170 cut").await.unwrap();
        assert_eq!(saved.kind, ReplyKind::ProfileSaved);
        assert!(saved.text.contains("2000 kcal"));
        assert!(saved.text.contains("protein 128 g"));

        let reply = handle_text(&st, 3, "salad").await.unwrap();
        assert!(reply.text.contains("400 / 2000 kcal (1600 kcal left)"));
        assert_eq!(
            fake.last_call().unwrap().context,
            Some(ProfileContext {
                weight_kg: 80.0,
                height_cm: 170.0,
                goal: Goal::Cut,
                target_calories: 2000.0,
                target_protein_g: 128.0,
            })
        );
    }

    #[tokio::test]
    async fn estimation_failure_logs_nothing() {
        let st = state_with(Arc::new(FakeGateway::failing())).await;
        let reply = handle_text(&st, 1, "mystery stew").await.unwrap();
        assert_eq!(reply.kind, ReplyKind::Retry);
        assert!(ledger::list_today(&st, 1).await.unwrap().is_empty());
    }

    struct SlowGateway;

    #[async_trait]
    impl EstimationGateway for SlowGateway {
        async fn estimate_from_text(
            &self,
            _text: &str,
            _ctx: Option<&ProfileContext>,
        ) -> Result<EstimationResult, EstimationError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(result_with_total(1.0, 1.0, 1.0, 1.0))
        }

        async fn estimate_from_image(
            &self,
            _image: &MealImage,
            _caption: Option<&str>,
            _ctx: Option<&ProfileContext>,
        ) -> Result<EstimationResult, EstimationError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(result_with_total(1.0, 1.0, 1.0, 1.0))
        }
    }

    #[tokio::test]
    async fn deadline_surfaces_as_retry_without_logging() {
        let st = AppState::fake_with_config(Arc::new(SlowGateway), |c| {
            c.estimation_deadline = Duration::from_millis(20);
        })
        .await;
        let reply = handle_text(&st, 1, "soup").await.unwrap();
        assert_eq!(reply.kind, ReplyKind::Retry);
        assert!(ledger::list_today(&st, 1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn bad_setup_replies_with_usage_and_keeps_profile() {
        let st = AppState::fake().await;
        handle_text(&st, 2, "/setup 80 170 cut").await.unwrap();

        let reply = handle_text(&st, 2, "/setup 80 170 shred").await.unwrap();
        assert_eq!(reply.kind, ReplyKind::Usage);
        assert!(reply.text.contains("shred"));

        let reply = handle_text(&st, 2, "/setup heavy 170 cut").await.unwrap();
        assert_eq!(reply.kind, ReplyKind::Usage);

        let p = get_profile(&st, 2).await.unwrap().unwrap();
        assert_eq!(p.goal, Goal::Cut);
        assert_eq!(p.target_calories, 2000.0);
    }

    #[tokio::test]
    async fn today_and_reset_commands() {
        let fake = Arc::new(FakeGateway::returning(result_with_total(100.0, 10.0, 10.0, 5.0)));
        let st = state_with(fake).await;

        let empty = handle_text(&st, 4, "/today").await.unwrap();
        assert_eq!(empty.kind, ReplyKind::Today);
        assert!(empty.text.contains("Nothing logged"));

        handle_text(&st, 4, "apple").await.unwrap();
        handle_text(&st, 4, "banana").await.unwrap();
        let today = handle_text(&st, 4, "/today").await.unwrap();
        assert!(today.text.contains("2 entries"));
        assert!(today.text.contains("Today: 200 kcal"));

        let reset = handle_text(&st, 4, "/resetday").await.unwrap();
        assert_eq!(reset.kind, ReplyKind::Reset);
        assert!(reset.text.contains("2 entries removed"));
        assert_eq!(ledger::sum_today(&st, 4).await.unwrap(), Macros::default());
    }

    #[tokio::test]
    async fn profile_command_reports_absence() {
        let st = AppState::fake().await;
        let reply = handle_text(&st, 9, "/profile").await.unwrap();
        assert_eq!(reply.kind, ReplyKind::Profile);
        assert!(reply.text.contains("not configured"));
    }

    #[tokio::test]
    async fn unknown_command_is_not_estimated() {
        let fake = Arc::new(FakeGateway::returning(result_with_total(1.0, 1.0, 1.0, 1.0)));
        let st = state_with(fake.clone()).await;
        let reply = handle_text(&st, 1, "/weekly").await.unwrap();
        assert_eq!(reply.kind, ReplyKind::Usage);
        assert!(fake.last_call().is_none());
    }

    #[tokio::test]
    async fn photo_is_logged_with_caption_as_raw_input() {
        let fake = Arc::new(FakeGateway::returning(result_with_total(650.0, 25.0, 80.0, 22.0)));
        let st = state_with(fake.clone()).await;

        let reply = handle_photo(&st, 6, jpeg(), Some("  burger, no fries ".into())).await.unwrap();
        assert_eq!(reply.kind, ReplyKind::Logged);

        let call = fake.last_call().unwrap();
        assert_eq!(call.caption.as_deref(), Some("burger, no fries"));
        assert_eq!(call.image_len, Some(4));

        let entries = ledger::list_today(&st, 6).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].source, Source::Photo);
        assert_eq!(entries[0].raw_input, "burger, no fries");
    }

    #[tokio::test]
    async fn unsupported_photo_type_is_rejected_before_estimation() {
        let fake = Arc::new(FakeGateway::returning(result_with_total(1.0, 1.0, 1.0, 1.0)));
        let st = state_with(fake.clone()).await;
        let image = MealImage {
            body: Bytes::from_static(b"...."),
            content_type: "image/heic".into(),
        };
        let reply = handle_photo(&st, 6, image, None).await.unwrap();
        assert_eq!(reply.kind, ReplyKind::Usage);
        assert!(fake.last_call().is_none());
    }

    #[test]
    fn image_mime_normalizes() {
        assert_eq!(image_mime("image/JPG"), Some("image/jpeg"));
        assert_eq!(image_mime("image/png"), Some("image/png"));
        assert_eq!(image_mime("application/octet-stream"), None);
    }
}
