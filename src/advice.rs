//! Weekly goal advice: prompt template and the static fallback table.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Whether the user completed last week's goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GoalStatus {
    Yes,
    Partially,
    No,
    Other(String),
}

impl GoalStatus {
    pub fn label(&self) -> &str {
        match self {
            GoalStatus::Yes => "Yes",
            GoalStatus::Partially => "Partially",
            GoalStatus::No => "No",
            GoalStatus::Other(s) => s,
        }
    }
}

impl FromStr for GoalStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "Yes" => GoalStatus::Yes,
            "Partially" => GoalStatus::Partially,
            "No" => GoalStatus::No,
            other => GoalStatus::Other(other.to_string()),
        })
    }
}

impl From<String> for GoalStatus {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(status) => status,
            Err(never) => match never {},
        }
    }
}

impl From<GoalStatus> for String {
    fn from(status: GoalStatus) -> Self {
        status.label().to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdviceRequest {
    /// Current footprint in kg CO2e per month.
    pub footprint: f64,
    #[serde(default)]
    pub previous_goal: String,
    pub goal_status: GoalStatus,
}

pub fn compose_advice_prompt(footprint: f64, previous_goal: &str, goal_status: &GoalStatus) -> String {
    format!(
        "The user has a carbon footprint of {footprint} kg CO\u{2082}/month.\n\
         Last week's goal was: '{previous_goal}', and the user {status} achieved it.\n\
         Based on this, suggest a new, realistic weekly climate goal and one motivational message.\n\
         \n\
         Format:\n\
         Goal: ...\n\
         Advice: ...",
        status = goal_status.label().to_lowercase(),
    )
}

/// Goal for the footprint band the user falls in.
pub fn goal_for_footprint(footprint: f64) -> &'static str {
    if footprint > 1000.0 {
        "Reduce electricity usage by 10% and car travel by 20% this week."
    } else if footprint > 700.0 {
        "Try switching 3 meat meals to vegetarian and take public transport twice."
    } else if footprint > 500.0 {
        "Walk or cycle 3 days this week instead of driving."
    } else {
        "You're doing great! Maintain your current habits and plant a tree \u{1F331}"
    }
}

pub fn message_for_status(status: &GoalStatus) -> &'static str {
    match status {
        GoalStatus::Yes => "Awesome job! You're on your way to becoming a climate hero! \u{1F30D}",
        GoalStatus::Partially => "Nice effort! Let's go full-on next week \u{2014} you've got this!",
        GoalStatus::No => "That's okay. Small steps matter. Let's restart stronger \u{1F4AA}",
        GoalStatus::Other(_) => "Keep up the climate action!",
    }
}

/// Advice built only from the static tables, used when the generator is unavailable.
pub fn fallback_advice(footprint: f64, goal_status: &GoalStatus) -> String {
    format!(
        "Goal: {}\nAdvice: {}",
        goal_for_footprint(footprint),
        message_for_status(goal_status)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_progress_message_keeps_its_wording() {
        assert_eq!(
            message_for_status(&GoalStatus::Partially),
            "Nice effort! Let's go full-on next week \u{2014} you've got this!"
        );
        assert!(
            fallback_advice(600.0, &GoalStatus::Partially)
                .ends_with("Advice: Nice effort! Let's go full-on next week \u{2014} you've got this!")
        );
    }

    #[test]
    fn test_footprint_bands() {
        assert!(goal_for_footprint(1000.5).starts_with("Reduce electricity"));
        assert!(goal_for_footprint(1000.0).starts_with("Try switching"));
        assert!(goal_for_footprint(700.0).starts_with("Walk or cycle"));
        assert!(goal_for_footprint(500.0).starts_with("You're doing great"));
        assert!(goal_for_footprint(0.0).starts_with("You're doing great"));
    }

    #[test]
    fn test_status_lookup_has_catch_all() {
        assert!(message_for_status(&GoalStatus::Yes).starts_with("Awesome"));
        assert!(message_for_status(&GoalStatus::Partially).starts_with("Nice effort"));
        assert!(message_for_status(&GoalStatus::No).starts_with("That's okay"));
        assert_eq!(
            message_for_status(&"Maybe".parse().unwrap()),
            "Keep up the climate action!"
        );
    }

    #[test]
    fn test_fallback_shape() {
        let text = fallback_advice(800.0, &GoalStatus::No);
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("Goal: Try switching"));
        assert!(lines.next().unwrap().starts_with("Advice: That's okay"));
    }

    #[test]
    fn test_prompt_mentions_inputs() {
        let prompt = compose_advice_prompt(420.5, "Bike to work", &GoalStatus::Partially);
        assert!(prompt.contains("420.5 kg"));
        assert!(prompt.contains("'Bike to work'"));
        assert!(prompt.contains("the user partially achieved it"));
        assert!(prompt.ends_with("Advice: ..."));
    }

    #[test]
    fn test_goal_status_serde_round_trip_keeps_unknown_labels() {
        let req: AdviceRequest =
            serde_json::from_str(r#"{"footprint": 10.0, "goal_status": "Skipped"}"#).unwrap();
        assert_eq!(req.goal_status, GoalStatus::Other("Skipped".into()));
        assert_eq!(req.previous_goal, "");
    }
}
