use lazy_static::lazy_static;
use regex::Regex;

use crate::error::AppError;

pub const SETUP_USAGE: &str = "Usage: /setup <weight_kg> <height_cm> <cut|maintain|bulk>\nExample: /setup 80 175 cut";

/// An inbound chat text, classified.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Setup {
        weight_kg: f64,
        height_cm: f64,
        goal: String,
    },
    Profile,
    Today,
    ResetDay,
    Unknown(String),
    /// Anything that is not a command is a meal description.
    Meal(String),
}

fn parse_number(name: &str, raw: &str) -> Result<f64, AppError> {
    raw.replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::validation(format!("{name} must be a number, got {raw:?}\n{SETUP_USAGE}")))
}

fn parse_setup(args: &str) -> Result<Command, AppError> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    let [weight, height, goal] = parts.as_slice() else {
        return Err(AppError::validation(SETUP_USAGE));
    };
    Ok(Command::Setup {
        weight_kg: parse_number("weight", weight)?,
        height_cm: parse_number("height", height)?,
        goal: (*goal).to_string(),
    })
}

/// Commands are case-insensitive and may carry a `@botname` suffix.
pub fn parse(text: &str) -> Result<Command, AppError> {
    lazy_static! {
        static ref COMMAND_RE: Regex =
            Regex::new(r"^/([A-Za-z_]+)(?:@\w+)?(?:\s+([\s\S]*))?$").expect("valid command regex");
    }

    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::validation("Send a description of what you ate."));
    }
    let Some(caps) = COMMAND_RE.captures(text) else {
        return Ok(Command::Meal(text.to_string()));
    };

    let name = caps[1].to_ascii_lowercase();
    let args = caps.get(2).map_or("", |m| m.as_str()).trim();
    let cmd = match name.as_str() {
        "start" | "help" => Command::Help,
        "setup" => parse_setup(args)?,
        "profile" => Command::Profile,
        "today" => Command::Today,
        "resetday" => Command::ResetDay,
        _ => Command::Unknown(name),
    };
    Ok(cmd)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_meal() {
        assert_eq!(
            parse("  2 eggs and a toast ").unwrap(),
            Command::Meal("2 eggs and a toast".into())
        );
    }

    #[test]
    fn recognizes_commands_with_bot_suffix_and_case() {
        assert_eq!(parse("/today").unwrap(), Command::Today);
        assert_eq!(parse("/Today@FoodLogBot").unwrap(), Command::Today);
        assert_eq!(parse("/RESETDAY").unwrap(), Command::ResetDay);
        assert_eq!(parse("/start").unwrap(), Command::Help);
        assert_eq!(parse("/profile").unwrap(), Command::Profile);
        assert_eq!(parse("/stats").unwrap(), Command::Unknown("stats".into()));
    }

    #[test]
    fn setup_parses_metrics_and_keeps_goal_raw() {
        assert_eq!(
            parse("/setup 80 170 CUT").unwrap(),
            Command::Setup {
                weight_kg: 80.0,
                height_cm: 170.0,
                goal: "CUT".into()
            }
        );
        assert_eq!(
            parse("/setup@bot 72,5 181 bulk").unwrap(),
            Command::Setup {
                weight_kg: 72.5,
                height_cm: 181.0,
                goal: "bulk".into()
            }
        );
    }

    #[test]
    fn setup_rejects_bad_arguments() {
        for input in ["/setup", "/setup 80 170", "/setup eighty 170 cut", "/setup 80 tall cut", "/setup 80 170 cut extra"] {
            assert!(matches!(parse(input), Err(AppError::Validation(_))), "{input}");
        }
    }

    #[test]
    fn empty_text_is_rejected() {
        assert!(matches!(parse("   "), Err(AppError::Validation(_))));
    }
}
