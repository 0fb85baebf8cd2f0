use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::render::Color;

pub const LIVE_STATES: [&str; 3] = ["in", "inprogress", "live"];

const GENERIC_LIVE_LABEL: &str = "Live";

/// One game from the scores feed, seen from `team_abbr`'s side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GameSummary {
    /// Feed status such as `in`, `pre` or `post`.
    pub state: String,
    pub team_abbr: String,
    pub team_score: u32,
    pub opp_abbr: String,
    pub opp_score: u32,
    #[serde(default)]
    pub period_detail: Option<String>,
}

impl GameSummary {
    pub fn is_live(&self) -> bool {
        let state = self.state.trim().to_ascii_lowercase();
        LIVE_STATES.contains(&state.as_str())
    }

    /// Live and the tracked team is tied or ahead.
    pub fn is_eligible(&self) -> bool {
        self.is_live() && self.team_score >= self.opp_score
    }

    /// Reorients the game so `team_*` refers to `team`, or `None` if `team`
    /// does not play in it.
    pub fn oriented_for(&self, team: &str) -> Option<GameSummary> {
        if self.team_abbr.eq_ignore_ascii_case(team) {
            Some(self.clone())
        } else if self.opp_abbr.eq_ignore_ascii_case(team) {
            Some(GameSummary {
                state: self.state.clone(),
                team_abbr: self.opp_abbr.clone(),
                team_score: self.opp_score,
                opp_abbr: self.team_abbr.clone(),
                opp_score: self.team_score,
                period_detail: self.period_detail.clone(),
            })
        } else {
            None
        }
    }

    pub fn color_rule(&self) -> ColorRule {
        if self.team_score > self.opp_score {
            ColorRule::Winning
        } else {
            ColorRule::Tied
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ColorRule {
    Winning,
    Tied,
}

impl ColorRule {
    pub fn color(&self) -> Color {
        match self {
            ColorRule::Winning => Color::GREEN,
            ColorRule::Tied => Color::YELLOW,
        }
    }
}

/// Compact period label from free text: "Top 7th" becomes `T7`,
/// "Bottom 9th" becomes `B9`, "3rd Quarter" becomes `3`.
pub fn period_label(detail: Option<&str>) -> String {
    let Some(detail) = detail.map(str::trim).filter(|d| !d.is_empty()) else {
        return GENERIC_LIVE_LABEL.to_string();
    };

    let lower = detail.to_ascii_lowercase();
    let half = if lower.contains("top") {
        "T"
    } else if lower.contains("bot") {
        "B"
    } else {
        ""
    };
    let number: String = detail.chars().filter(|c| c.is_ascii_digit()).collect();

    let label = format!("{}{}", half, number);
    if label.is_empty() {
        GENERIC_LIVE_LABEL.to_string()
    } else {
        label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(state: &str, ours: u32, theirs: u32) -> GameSummary {
        GameSummary {
            state: state.to_string(),
            team_abbr: "SD".into(),
            team_score: ours,
            opp_abbr: "LAD".into(),
            opp_score: theirs,
            period_detail: Some("Top 7th".into()),
        }
    }

    #[test]
    fn losing_live_game_is_excluded() {
        assert!(!game("in", 3, 4).is_eligible());
    }

    #[test]
    fn winning_live_game_is_included() {
        assert!(game("in", 4, 3).is_eligible());
    }

    #[test]
    fn tied_live_game_is_included() {
        assert!(game("in", 3, 3).is_eligible());
    }

    #[test]
    fn live_states_match_case_insensitively() {
        for state in ["in", "IN", "InProgress", "live", " Live "] {
            assert!(game(state, 1, 0).is_live(), "{state}");
        }
        for state in ["pre", "post", "final", ""] {
            assert!(!game(state, 1, 0).is_live(), "{state}");
        }
    }

    #[test]
    fn orientation_flips_home_and_away() {
        let g = GameSummary {
            team_abbr: "LAD".into(),
            team_score: 2,
            opp_abbr: "SD".into(),
            opp_score: 5,
            ..game("in", 0, 0)
        };
        let ours = g.oriented_for("sd").expect("team plays");
        assert_eq!(ours.team_abbr, "SD");
        assert_eq!(ours.team_score, 5);
        assert_eq!(ours.opp_abbr, "LAD");
        assert_eq!(ours.opp_score, 2);
        assert!(g.oriented_for("NYY").is_none());
    }

    #[test]
    fn color_rule_distinguishes_lead_from_tie() {
        assert_eq!(game("in", 4, 3).color_rule(), ColorRule::Winning);
        assert_eq!(game("in", 3, 3).color_rule(), ColorRule::Tied);
    }

    #[test]
    fn period_label_parses_half_and_inning() {
        assert_eq!(period_label(Some("Top 7th")), "T7");
        assert_eq!(period_label(Some("BOTTOM 11th")), "B11");
        assert_eq!(period_label(Some("Mid 5th")), "5");
        assert_eq!(period_label(Some("Delayed")), "Live");
        assert_eq!(period_label(Some("   ")), "Live");
        assert_eq!(period_label(None), "Live");
    }
}
