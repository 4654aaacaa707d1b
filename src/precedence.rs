//! Mutual-exclusion rules between optional chart features.
//!
//! Conflicts are never errors. Each rule names a winner and the features it
//! suppresses; rules apply in table order and a rule only fires while its
//! winner is still active.

use crate::capability::Capabilities;
use crate::parser::ast::{ChartSpec, ChartType};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    ErrorBar,
    Facet,
    DualAxis,
    ColorGroup,
    Horizontal,
}

impl Feature {
    pub const ALL: [Feature; 5] = [
        Feature::ErrorBar,
        Feature::Facet,
        Feature::DualAxis,
        Feature::ColorGroup,
        Feature::Horizontal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Feature::ErrorBar => "errorBar",
            Feature::Facet => "facet",
            Feature::DualAxis => "y2",
            Feature::ColorGroup => "color",
            Feature::Horizontal => "horizontal",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub winner: Feature,
    pub suppresses: &'static [Feature],
}

pub const RULES: &[Rule] = &[
    Rule {
        winner: Feature::ErrorBar,
        suppresses: &[Feature::Facet, Feature::DualAxis, Feature::ColorGroup, Feature::Horizontal],
    },
    Rule {
        winner: Feature::Facet,
        suppresses: &[Feature::DualAxis, Feature::ColorGroup],
    },
    // Horizontal bars with a secondary axis would need a third axis swap
    Rule {
        winner: Feature::Horizontal,
        suppresses: &[Feature::DualAxis],
    },
    // Both compete for the second series colour slot
    Rule {
        winner: Feature::DualAxis,
        suppresses: &[Feature::ColorGroup],
    },
];

/// Features a spec asks for that its chart type can actually do.
/// Requests the chart type cannot honour are dropped here, before any rule.
pub fn requested_features(spec: &ChartSpec, caps: &Capabilities) -> Vec<Feature> {
    let mut out = Vec::new();

    let wants_error_bar = spec.error_bar.is_some() || spec.chart_type == ChartType::ErrorBar;
    if wants_error_bar && caps.supports_error_bar {
        out.push(Feature::ErrorBar);
    }
    let wants_facet = spec
        .facet
        .as_ref()
        .is_some_and(|f| !f.field.trim().is_empty());
    if wants_facet && caps.supports_facet {
        out.push(Feature::Facet);
    }
    if spec.encoding.y2.is_some() && caps.supports_y2 {
        out.push(Feature::DualAxis);
    }
    if spec.encoding.color.is_some() && caps.supports_color {
        out.push(Feature::ColorGroup);
    }
    if spec.is_horizontal() && caps.supports_horizontal {
        out.push(Feature::Horizontal);
    }

    debug!(chart_type = spec.chart_type.as_str(), features = ?out, "requested features");
    out
}

/// Outcome of applying [`RULES`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Resolution {
    pub active: Vec<Feature>,
    /// `(winner, loser)` for every suppression that happened
    pub suppressed: Vec<(Feature, Feature)>,
}

impl Resolution {
    pub fn is_active(&self, feature: Feature) -> bool {
        self.active.contains(&feature)
    }
}

pub fn resolve(requested: &[Feature]) -> Resolution {
    resolve_with(RULES, requested)
}

pub fn resolve_with(rules: &[Rule], requested: &[Feature]) -> Resolution {
    let mut active: Vec<Feature> = Vec::with_capacity(requested.len());
    for f in requested {
        if !active.contains(f) {
            active.push(*f);
        }
    }
    let mut suppressed = Vec::new();

    for rule in rules {
        if !active.contains(&rule.winner) {
            continue;
        }
        for loser in rule.suppresses {
            if let Some(pos) = active.iter().position(|f| f == loser) {
                active.remove(pos);
                debug!(winner = %rule.winner, loser = %loser, "feature suppressed");
                suppressed.push((rule.winner, *loser));
            }
        }
    }

    Resolution { active, suppressed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Feature::*;

    #[test]
    fn test_no_conflict_keeps_everything() {
        let r = resolve(&[ColorGroup, Horizontal]);
        assert_eq!(r.active, vec![ColorGroup, Horizontal]);
        assert!(r.suppressed.is_empty());
    }

    #[test]
    fn test_facet_beats_y2() {
        let r = resolve(&[Facet, DualAxis]);
        assert!(r.is_active(Facet));
        assert!(!r.is_active(DualAxis));
        assert_eq!(r.suppressed, vec![(Facet, DualAxis)]);
    }

    #[test]
    fn test_y2_beats_color() {
        let r = resolve(&[DualAxis, ColorGroup]);
        assert_eq!(r.active, vec![DualAxis]);
    }

    #[test]
    fn test_horizontal_drops_y2_then_color_survives() {
        // y2 is gone before its own rule runs, so it cannot suppress colour
        let r = resolve(&[DualAxis, ColorGroup, Horizontal]);
        assert_eq!(r.active, vec![ColorGroup, Horizontal]);
        assert_eq!(r.suppressed, vec![(Horizontal, DualAxis)]);
    }

    #[test]
    fn test_error_bar_wins_everything() {
        let r = resolve(&Feature::ALL);
        assert_eq!(r.active, vec![ErrorBar]);
        assert_eq!(r.suppressed.len(), 4);
    }

    #[test]
    fn test_rules_never_suppress_their_own_winner() {
        for rule in RULES {
            assert!(!rule.suppresses.contains(&rule.winner));
        }
    }

    #[test]
    fn test_duplicates_collapse() {
        let r = resolve(&[Facet, Facet]);
        assert_eq!(r.active, vec![Facet]);
    }

    #[test]
    fn test_custom_rule_table() {
        let flipped = [Rule { winner: DualAxis, suppresses: &[Horizontal] }];
        let r = resolve_with(&flipped, &[DualAxis, Horizontal]);
        assert_eq!(r.active, vec![DualAxis]);
    }
}
