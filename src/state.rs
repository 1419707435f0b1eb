use teloxide::types::MessageId;

use crate::catalog::AminoAcid;
use crate::progress::CompletionTracker;
use crate::quiz::{QuizState, SlotId};
use crate::session::{Session, SessionConfig};

#[derive(Debug, Clone, Default)]
pub enum BotState {
    #[default]
    Start,
    ChooseAminoAcid,
    ChooseCategory,
    Solving {
        attempt: Attempt,
    },
}

/// One question on screen: the quiz logic plus what the learner is holding.
#[derive(Debug, Clone)]
pub struct Attempt {
    pub quiz: QuizState,
    pub session: Session,
    /// Index into the label pool of the label picked up and not yet placed.
    pub picked: Option<usize>,
    /// Set after a wrong check so each slot shows whether it was right.
    /// Cleared as soon as the placements change again.
    pub checked: bool,
    /// Practice only; full quizzes do not record completions.
    pub tracker: Option<CompletionTracker>,
    /// The message carrying this question's buttons, once sent.
    pub message_id: Option<MessageId>,
}

impl Attempt {
    pub fn practice(amino_acid: &'static AminoAcid, tracker: CompletionTracker) -> Self {
        let session = Session::with_questions(SessionConfig::practice(), vec![amino_acid]);
        Self {
            quiz: QuizState::reset(amino_acid),
            session,
            picked: None,
            checked: false,
            tracker: Some(tracker),
            message_id: None,
        }
    }

    /// `None` once the session has nothing left to ask.
    pub fn from_session(session: Session) -> Option<Self> {
        let amino_acid = session.current()?;
        Some(Self {
            quiz: QuizState::reset(amino_acid),
            session,
            picked: None,
            checked: false,
            tracker: None,
            message_id: None,
        })
    }

    /// Whether a button pressed on `message` belongs to this question.
    pub fn is_shown_in(&self, message: Option<MessageId>) -> bool {
        self.message_id.is_some() && self.message_id == message
    }

    pub fn amino_acid(&self) -> &'static AminoAcid {
        self.quiz.amino_acid()
    }

    pub fn picked_label(&self) -> Option<&str> {
        self.picked
            .and_then(|index| self.quiz.available_labels().get(index))
            .map(String::as_str)
    }

    pub fn pick(&mut self, index: usize) -> Option<&str> {
        if index >= self.quiz.available_labels().len() {
            return None;
        }
        self.picked = Some(index);
        self.picked_label()
    }

    /// Puts the picked label into `slot`. Returns `false` when nothing is picked.
    pub fn drop_into(&mut self, slot: SlotId) -> bool {
        let Some(label) = self.picked_label().map(str::to_owned) else {
            return false;
        };
        self.quiz.assign(slot, label);
        self.picked = None;
        self.checked = false;
        true
    }

    pub fn reset(&mut self) {
        self.quiz = QuizState::reset(self.amino_acid());
        self.picked = None;
        self.checked = false;
    }
}
