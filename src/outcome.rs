//! Diagnosis outcome.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::disease::DiseaseId;

/// Returns true if the guess names the concealed disease.
///
/// Unknown identifiers simply compare false.
#[must_use]
pub fn diagnose(guess: &str, truth: &DiseaseId) -> bool {
    guess == truth.as_str()
}

/// Result of a finished case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Whether the guess was right.
    pub correct: bool,
    /// The player's guess.
    pub guess: String,
    /// The disease the patient actually had.
    pub truth: DiseaseId,
    /// Questions asked before the diagnosis.
    pub questions: usize,
}

impl Outcome {
    /// Builds an outcome by comparing `guess` with `truth`.
    #[must_use]
    pub fn new(guess: impl Into<String>, truth: DiseaseId, questions: usize) -> Self {
        let guess = guess.into();
        Self {
            correct: diagnose(&guess, &truth),
            guess,
            truth,
            questions,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.correct {
            write!(f, "correct diagnosis after {} questions", self.questions)
        } else {
            write!(f, "incorrect: the patient had {}", self.truth)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnose_is_equality() {
        let truth = DiseaseId::from("FLU");
        assert!(diagnose("FLU", &truth));
        assert!(!diagnose("flu", &truth));
        assert!(!diagnose("", &truth));
        assert!(!diagnose("NOPE", &truth));
    }

    #[test]
    fn test_outcome_display() {
        let ok = Outcome::new("FLU", DiseaseId::from("FLU"), 4);
        assert!(ok.correct);
        assert_eq!(format!("{ok}"), "correct diagnosis after 4 questions");

        let miss = Outcome::new("CC", DiseaseId::from("FLU"), 2);
        assert!(!miss.correct);
        assert!(format!("{miss}").contains("FLU"));
    }
}
