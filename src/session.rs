use rand::{seq::SliceRandom, Rng};
use uuid::Uuid;

use crate::catalog::{all_amino_acids, filter_by_category, AminoAcid, Category};

/// Filters by `category` when given, then shuffles.
pub fn start_session<'a>(
    acids: impl IntoIterator<Item = &'a AminoAcid>,
    category: Option<Category>,
) -> Vec<&'a AminoAcid> {
    start_session_with(acids, category, &mut rand::thread_rng())
}

pub fn start_session_with<'a, R: Rng + ?Sized>(
    acids: impl IntoIterator<Item = &'a AminoAcid>,
    category: Option<Category>,
    rng: &mut R,
) -> Vec<&'a AminoAcid> {
    let mut questions = match category {
        Some(category) => filter_by_category(acids, category),
        None => acids.into_iter().collect(),
    };
    questions.shuffle(rng);
    questions
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionConfig {
    pub is_full_quiz: bool,
    pub category: Option<Category>,
}

impl SessionConfig {
    /// A single amino acid picked by the learner.
    pub fn practice() -> Self {
        Self::default()
    }

    pub fn full_quiz() -> Self {
        Self {
            is_full_quiz: true,
            category: None,
        }
    }

    pub fn category_quiz(category: Category) -> Self {
        Self {
            is_full_quiz: true,
            category: Some(category),
        }
    }

    pub fn title(&self) -> String {
        match (self.is_full_quiz, self.category) {
            (false, _) => "Practice".to_owned(),
            (true, Some(category)) => format!("{} quiz", category),
            (true, None) => "Full quiz".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    InProgress { index: usize, score: u32 },
    Completed { score: u32 },
}

/// A run through several amino acids. Only a correct answer moves it forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: Uuid,
    config: SessionConfig,
    questions: Vec<&'static AminoAcid>,
    status: SessionStatus,
    mistakes: u32,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_questions(config, start_session(all_amino_acids(), config.category))
    }

    pub fn with_questions(config: SessionConfig, questions: Vec<&'static AminoAcid>) -> Self {
        let status = if questions.is_empty() {
            SessionStatus::Completed { score: 0 }
        } else {
            SessionStatus::InProgress { index: 0, score: 0 }
        };
        Self {
            id: Uuid::new_v4(),
            config,
            questions,
            status,
            mistakes: 0,
        }
    }

    pub fn id(&self) -> &Uuid {
        &self.id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        match self.status {
            SessionStatus::InProgress { index, .. } => index,
            SessionStatus::Completed { .. } => self.questions.len(),
        }
    }

    pub fn current(&self) -> Option<&'static AminoAcid> {
        match self.status {
            SessionStatus::InProgress { index, .. } => self.questions.get(index).copied(),
            SessionStatus::Completed { .. } => None,
        }
    }

    pub fn score(&self) -> u32 {
        match self.status {
            SessionStatus::InProgress { score, .. } | SessionStatus::Completed { score } => score,
        }
    }

    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.status, SessionStatus::Completed { .. })
    }

    /// Feeds one evaluation result into the state machine.
    pub fn record(&mut self, correct: bool) -> SessionStatus {
        match self.status {
            SessionStatus::InProgress { index, score } if correct => {
                let score = score + 1;
                self.status = if index + 1 >= self.questions.len() {
                    SessionStatus::Completed { score }
                } else {
                    SessionStatus::InProgress {
                        index: index + 1,
                        score,
                    }
                };
            }
            SessionStatus::InProgress { .. } => self.mistakes += 1,
            SessionStatus::Completed { .. } => {}
        }
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::find_by_name;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashSet;

    fn questions(names: &[&str]) -> Vec<&'static AminoAcid> {
        names.iter().map(|name| find_by_name(name).unwrap()).collect()
    }

    #[test]
    fn start_session_without_filter_is_a_permutation_of_the_catalog() {
        let mut rng = StdRng::seed_from_u64(42);
        let session = start_session_with(all_amino_acids(), None, &mut rng);
        assert_eq!(session.len(), 18);
        let names: HashSet<_> = session.iter().map(|acid| acid.name()).collect();
        assert_eq!(names.len(), 18);
    }

    #[test]
    fn start_session_applies_the_category_filter() {
        let session = start_session(all_amino_acids(), Some(Category::Aromatic));
        let mut names: Vec<_> = session.iter().map(|acid| acid.name()).collect();
        names.sort();
        assert_eq!(names, ["Phenylalanine", "Tryptophan", "Tyrosine"]);
    }

    #[test]
    fn correct_answers_advance_until_completed() {
        let mut session = Session::with_questions(
            SessionConfig::full_quiz(),
            questions(&["Glycine", "Valine", "Serine"]),
        );
        assert_eq!(session.status(), SessionStatus::InProgress { index: 0, score: 0 });
        assert_eq!(session.current().map(|a| a.name()), Some("Glycine"));

        assert_eq!(
            session.record(true),
            SessionStatus::InProgress { index: 1, score: 1 }
        );
        assert_eq!(session.current().map(|a| a.name()), Some("Valine"));
        assert_eq!(
            session.record(true),
            SessionStatus::InProgress { index: 2, score: 2 }
        );
        assert_eq!(session.record(true), SessionStatus::Completed { score: 3 });
        assert!(session.is_completed());
        assert!(session.current().is_none());
        assert_eq!(session.current_index(), 3);
    }

    #[test]
    fn wrong_answers_keep_the_same_question_and_count_mistakes() {
        let mut session = Session::with_questions(
            SessionConfig::category_quiz(Category::Acidic),
            questions(&["Aspartate", "Glutamate"]),
        );
        assert_eq!(
            session.record(false),
            SessionStatus::InProgress { index: 0, score: 0 }
        );
        assert_eq!(
            session.record(false),
            SessionStatus::InProgress { index: 0, score: 0 }
        );
        assert_eq!(session.mistakes(), 2);
        assert_eq!(session.current().map(|a| a.name()), Some("Aspartate"));

        session.record(true);
        session.record(false);
        assert_eq!(session.record(true), SessionStatus::Completed { score: 2 });
        assert_eq!(session.mistakes(), 3);
    }

    #[test]
    fn completed_sessions_ignore_further_results() {
        let mut session =
            Session::with_questions(SessionConfig::full_quiz(), questions(&["Alanine"]));
        session.record(true);
        assert_eq!(session.record(true), SessionStatus::Completed { score: 1 });
        assert_eq!(session.record(false), SessionStatus::Completed { score: 1 });
        assert_eq!(session.mistakes(), 0);
    }

    #[test]
    fn empty_question_list_starts_completed() {
        let session = Session::with_questions(SessionConfig::full_quiz(), Vec::new());
        assert_eq!(session.status(), SessionStatus::Completed { score: 0 });
        assert_eq!(session.total_questions(), 0);
        assert!(session.current().is_none());
    }

    #[test]
    fn new_session_covers_the_configured_category() {
        let session = Session::new(SessionConfig::category_quiz(Category::Basic));
        assert_eq!(session.total_questions(), 3);
        assert_eq!(session.current_index(), 0);
        assert!(session.config().is_full_quiz);

        let other = Session::new(SessionConfig::full_quiz());
        assert_eq!(other.total_questions(), 18);
        assert_ne!(session.id(), other.id());
    }

    #[test]
    fn practice_is_a_one_question_session() {
        let serine = questions(&["Serine"]);
        let mut session = Session::with_questions(SessionConfig::practice(), serine);
        assert!(!session.config().is_full_quiz);
        assert_eq!(session.total_questions(), 1);
        assert_eq!(session.record(true), SessionStatus::Completed { score: 1 });
    }

    #[test]
    fn config_titles_name_the_category() {
        assert_eq!(SessionConfig::practice().title(), "Practice");
        assert_eq!(SessionConfig::full_quiz().title(), "Full quiz");
        assert_eq!(
            SessionConfig::category_quiz(Category::Aromatic).title(),
            "Aromatic quiz"
        );
    }
}
