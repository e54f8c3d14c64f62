//! Score tiers and the fixed feedback texts attached to them.
//!
//! The four tiers and their lower bounds are part of the scoring contract:
//! a score exactly on a boundary belongs to the higher tier.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lower bound of the excellent tier.
pub const EXCELLENT_THRESHOLD: f64 = 85.0;
/// Lower bound of the good tier.
pub const GOOD_THRESHOLD: f64 = 70.0;
/// Lower bound of the fair tier.
pub const FAIR_THRESHOLD: f64 = 50.0;

/// Qualitative band a score falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

impl Tier {
    /// Map a 0-100 score to its tier.
    pub fn from_score(score: f64) -> Self {
        if score >= EXCELLENT_THRESHOLD {
            Tier::Excellent
        } else if score >= GOOD_THRESHOLD {
            Tier::Good
        } else if score >= FAIR_THRESHOLD {
            Tier::Fair
        } else {
            Tier::NeedsImprovement
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Excellent => "Excellent",
            Tier::Good => "Good",
            Tier::Fair => "Fair",
            Tier::NeedsImprovement => "Needs improvement",
        }
    }

    /// Evaluation text for a single answer.
    pub fn evaluation(&self) -> &'static str {
        match self {
            Tier::Excellent => {
                "Excellent answer! You demonstrated strong knowledge with specific details."
            }
            Tier::Good => "Good answer. You covered the main points but could add more depth.",
            Tier::Fair => {
                "Fair answer. You touched on basic concepts but missed important details."
            }
            Tier::NeedsImprovement => {
                "Your answer needs significant improvement. You missed several key concepts."
            }
        }
    }

    /// Suggestion text for a single answer.
    pub fn suggestions(&self) -> &'static str {
        match self {
            Tier::Excellent => {
                "Consider providing real-world examples to make your answers more impactful."
            }
            Tier::Good => {
                "Try to include more technical details and examples from your experience."
            }
            Tier::Fair => {
                "Study this topic more thoroughly and practice explaining it with examples."
            }
            Tier::NeedsImprovement => {
                "Review the fundamentals of this topic before moving on to advanced material."
            }
        }
    }

    /// Overall-assessment paragraph for a whole session.
    pub fn assessment(&self) -> &'static str {
        match self {
            Tier::Excellent => {
                "Excellent skills! You demonstrate advanced knowledge suitable for senior roles."
            }
            Tier::Good => {
                "Strong proficiency. You have a solid understanding of most of the concepts covered."
            }
            Tier::Fair => {
                "Moderate skills. You understand the basic concepts but need practice with advanced topics."
            }
            Tier::NeedsImprovement => {
                "Basic understanding. You need to strengthen your foundational knowledge."
            }
        }
    }

    /// Closing recommendation for a whole session.
    pub fn recommendation(&self) -> &'static str {
        match self {
            Tier::Excellent => "You are well prepared for positions requiring advanced expertise.",
            Tier::Good => "With some refinement, you could excel in roles requiring this expertise.",
            Tier::Fair => "Focus on practicing the advanced topics where your answers lost points.",
            Tier::NeedsImprovement => {
                "Consider structured training on the fundamentals before attempting advanced roles."
            }
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
