use serde::{Deserialize, Serialize};

/// A single checklist entry as presented to the host: position, label
/// and current completion flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub index: usize,
    pub label: String,
    pub done: bool,
}

/// The ordered trading procedure plus the rule headings rotated for
/// display. Labels are fixed at construction; only the done flags in
/// [`ChecklistState`](super::ChecklistState) change at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingPlan {
    pub tasks: Vec<String>,
    #[serde(default)]
    pub rules: Vec<String>,
}

impl Default for TradingPlan {
    fn default() -> Self {
        Self {
            tasks: vec![
                "Open the chart and switch to the 4H timeframe".into(),
                "Find the most recent swing high and swing low".into(),
                "Draw Fib levels between 61.80% and 78.60% on that swing".into(),
                "Mark key zones: FVG, Support & Resistance, and Trendlines".into(),
                "Switch to the 15M timeframe".into(),
                "Wait for price to reach the marked Fibonacci zone".into(),
                "When price taps the zone, look for a bullish/bearish confirmation candle".into(),
                "Set stop loss at 1% risk or less".into(),
                "Set take profit at a minimum of 1:3 risk-to-reward ratio (or higher)".into(),
            ],
            rules: vec![
                "FIRST RULE: FOLLOW THE RULES".into(),
                "SECOND RULE: FOLLOW THE FIRST RULE".into(),
            ],
        }
    }
}

impl TradingPlan {
    /// Number of tasks in the procedure.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Rule heading for a given rotation step. The host decides the
    /// rotation cadence; headings cycle modularly.
    pub fn rule_heading(&self, rotation: usize) -> Option<&str> {
        if self.rules.is_empty() {
            return None;
        }
        Some(self.rules[rotation % self.rules.len()].as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_plan_has_nine_tasks() {
        let plan = TradingPlan::default();
        assert_eq!(plan.len(), 9);
        assert!(!plan.is_empty());
    }

    #[test]
    fn rule_headings_rotate_modularly() {
        let plan = TradingPlan::default();
        assert_eq!(plan.rule_heading(0), Some("FIRST RULE: FOLLOW THE RULES"));
        assert_eq!(
            plan.rule_heading(1),
            Some("SECOND RULE: FOLLOW THE FIRST RULE")
        );
        assert_eq!(plan.rule_heading(2), plan.rule_heading(0));
        assert_eq!(plan.rule_heading(7), plan.rule_heading(1));
    }

    #[test]
    fn no_heading_without_rules() {
        let plan = TradingPlan {
            tasks: vec!["only".into()],
            rules: vec![],
        };
        assert_eq!(plan.rule_heading(0), None);
    }
}
