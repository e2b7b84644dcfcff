//! Quiz questions
//!
//! A death pauses play until a question is answered. Questions are keyed by
//! school year (1-12) and drawn from the player's year and its neighbours.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// School years covered by the bank
pub const MIN_YEAR: u8 = 1;
pub const MAX_YEAR: u8 = 12;

/// Bundled question bank
const BUILTIN_JSON: &str = include_str!("../assets/questions.json");

/// A multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// School year the question targets
    pub year: u8,
    pub question: String,
    pub options: Vec<String>,
    pub answer_index: usize,
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Question {
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.answer_index
    }

    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.answer_index).map(String::as_str)
    }

    /// Has at least two options and a valid answer
    fn is_well_formed(&self) -> bool {
        self.options.len() >= 2 && self.answer_index < self.options.len()
    }
}

/// Clamp a year into the supported range
pub fn clamp_year(year: u8) -> u8 {
    year.clamp(MIN_YEAR, MAX_YEAR)
}

/// Inclusive year band questions are drawn from
pub fn year_band(year: u8) -> (u8, u8) {
    let year = clamp_year(year);
    (year.saturating_sub(1).max(MIN_YEAR), (year + 1).min(MAX_YEAR))
}

/// All available questions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Questions shipped with the game
    pub fn builtin() -> Self {
        match Self::from_json(BUILTIN_JSON) {
            Ok(bank) => bank,
            Err(e) => {
                log::warn!("Failed to parse built-in question bank: {:?}", e);
                Self::default()
            }
        }
    }

    /// Load a bank from a JSON array of questions
    ///
    /// Malformed entries (bad answer index, fewer than two options) are dropped
    /// with a warning instead of failing the whole bank.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let questions: Vec<Question> = serde_json::from_str(json)?;
        Ok(Self::from_questions(questions))
    }

    pub fn from_questions(questions: Vec<Question>) -> Self {
        let total = questions.len();
        let questions: Vec<Question> = questions.into_iter().filter(Question::is_well_formed).collect();
        if questions.len() < total {
            log::warn!("Dropped {} malformed questions", total - questions.len());
        }
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Questions for the band around `year`, in bank order
    pub fn for_year(&self, year: u8) -> Vec<&Question> {
        let (lo, hi) = year_band(year);
        self.questions
            .iter()
            .filter(|q| (lo..=hi).contains(&q.year))
            .collect()
    }

    /// A uniformly random question from the band around `year`
    ///
    /// Falls back to the whole bank when the band is empty; `None` only for an
    /// empty bank.
    pub fn random<R: Rng + ?Sized>(&self, year: u8, rng: &mut R) -> Option<&Question> {
        let band = self.for_year(year);
        if band.is_empty() {
            if self.questions.is_empty() {
                return None;
            }
            let idx = rng.random_range(0..self.questions.len());
            return self.questions.get(idx);
        }
        let idx = rng.random_range(0..band.len());
        band.get(idx).copied()
    }
}
