use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Feedback band selected from a 0–100 score.
pub enum Feedback {
    /// Score ≥ 90.
    Excellent,
    /// Score ≥ 80.
    Good,
    /// Score ≥ 70.
    Decent,
    /// Anything lower.
    NeedsImprovement,
}

impl Feedback {
    pub const EXCELLENT_MIN: f64 = 90.0;
    pub const GOOD_MIN: f64 = 80.0;
    pub const DECENT_MIN: f64 = 70.0;

    /// Picks the band for `score`. NaN falls into [`Feedback::NeedsImprovement`].
    pub fn from_score(score: f64) -> Self {
        if score >= Self::EXCELLENT_MIN {
            Feedback::Excellent
        } else if score >= Self::GOOD_MIN {
            Feedback::Good
        } else if score >= Self::DECENT_MIN {
            Feedback::Decent
        } else {
            Feedback::NeedsImprovement
        }
    }

    /// The message returned to the student.
    pub fn message(&self) -> &'static str {
        match self {
            Feedback::Excellent => "Excellent answer! Very well done.",
            Feedback::Good => "Good answer! Consider adding more details.",
            Feedback::Decent => "Decent answer. Try to be more specific.",
            Feedback::NeedsImprovement => {
                "Needs improvement. Please review the question and try again."
            }
        }
    }

    /// Short machine-friendly label.
    pub fn label(&self) -> &'static str {
        match self {
            Feedback::Excellent => "excellent",
            Feedback::Good => "good",
            Feedback::Decent => "decent",
            Feedback::NeedsImprovement => "needs_improvement",
        }
    }
}

impl std::fmt::Display for Feedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl Serialize for Feedback {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
/// A score together with its feedback band.
pub struct Grade {
    /// Similarity on the 0–100 scale, rounded to two decimals.
    pub score: f64,
    pub feedback: Feedback,
}

impl Grade {
    pub fn new(score: f64) -> Self {
        Self {
            score,
            feedback: Feedback::from_score(score),
        }
    }
}
