use std::fmt::Write;

use super::commands::SETUP_USAGE;
use crate::estimation::{EstimationResult, Macros};
use crate::profiles::{Targets, UserProfile};

/// Advice lines shown per meal; storage keeps all of them.
pub const MAX_ADVICE: usize = 3;
pub const MAX_FOLLOW_UPS: usize = 2;

pub const RETRY_NOTICE: &str = "Sorry, I couldn't estimate that meal right now. Nothing was logged, please try again.";

pub fn help_text() -> String {
    format!(
        "Send me what you ate, as text or a photo, and I'll estimate calories and macros.\n\n\
Commands:\n\
/setup <weight_kg> <height_cm> <cut|maintain|bulk> - set your daily targets\n\
/profile - show your profile\n\
/today - today's totals\n\
/resetday - delete today's entries\n\n{SETUP_USAGE}"
    )
}

fn macros_line(m: &Macros) -> String {
    format!(
        "{:.0} kcal | P {:.0} g | C {:.0} g | F {:.0} g",
        m.calories, m.protein_g, m.carbs_g, m.fat_g
    )
}

/// Reply for a freshly logged meal. Advice and follow-up questions are
/// silently capped at [`MAX_ADVICE`] and [`MAX_FOLLOW_UPS`].
pub fn format_estimate(result: &EstimationResult) -> String {
    let mut out = String::from("Logged.\n");
    for item in &result.items {
        let _ = writeln!(
            out,
            "• {} ({}): {:.0} kcal",
            item.name, item.estimated_portion, item.macros.calories
        );
    }
    let _ = writeln!(out, "Total: {}", macros_line(&result.total));
    let _ = write!(
        out,
        "Rating: {} {}",
        result.diet_rating.emoji(),
        result.diet_rating.as_str()
    );

    if !result.advice.is_empty() {
        out.push_str("\n\nAdvice:");
        for line in result.advice.iter().take(MAX_ADVICE) {
            let _ = write!(out, "\n💡 {line}");
        }
    }
    if !result.follow_up_questions.is_empty() {
        out.push_str("\n\nTo be more precise:");
        for q in result.follow_up_questions.iter().take(MAX_FOLLOW_UPS) {
            let _ = write!(out, "\n❓ {q}");
        }
    }
    out
}

/// Day totals, against targets when the user has a profile.
pub fn format_progress(totals: &Macros, profile: Option<&UserProfile>) -> String {
    let Some(p) = profile else {
        return format!("Today: {}\nNo targets yet, use /setup to get some.", macros_line(totals));
    };
    let left = p.target_calories - totals.calories;
    let budget = if left >= 0.0 {
        format!("{left:.0} kcal left")
    } else {
        format!("{:.0} kcal over", -left)
    };
    format!(
        "Today: {:.0} / {:.0} kcal ({budget})\nProtein: {:.0} / {:.0} g | C {:.0} g | F {:.0} g",
        totals.calories,
        p.target_calories,
        totals.protein_g,
        p.target_protein_g,
        totals.carbs_g,
        totals.fat_g
    )
}

pub fn format_today(totals: &Macros, entries: usize, profile: Option<&UserProfile>) -> String {
    if entries == 0 {
        let mut out = String::from("Nothing logged today yet.");
        if let Some(p) = profile {
            let _ = write!(
                out,
                "\nTargets: {:.0} kcal | P {:.0} g",
                p.target_calories, p.target_protein_g
            );
        }
        return out;
    }
    format!("{entries} entries logged.\n{}", format_progress(totals, profile))
}

pub fn format_targets(t: &Targets) -> String {
    format!(
        "Profile saved.\nDaily targets: {:.0} kcal | protein {:.0} g",
        t.calories, t.protein_g
    )
}

pub fn format_profile(profile: Option<&UserProfile>) -> String {
    match profile {
        Some(p) => format!(
            "Weight: {:.1} kg\nHeight: {:.1} cm\nGoal: {}\nDaily targets: {:.0} kcal | protein {:.0} g",
            p.weight_kg, p.height_cm, p.goal, p.target_calories, p.target_protein_g
        ),
        None => format!("Profile not configured.\n{SETUP_USAGE}"),
    }
}

pub fn format_reset(deleted: u64) -> String {
    format!("Today's log cleared ({deleted} entries removed).")
}
