use std::{fmt, str::FromStr};

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup};

use crate::catalog::{AminoAcid, Category};
use crate::progress::CompletionTracker;
use crate::quiz::SlotId;
use crate::render::slot_numbers;
use crate::state::Attempt;

pub(crate) const PRACTICE: &str = "Practice an amino acid🧪";
pub(crate) const FULL_QUIZ: &str = "Full quiz📝";
pub(crate) const CATEGORY_QUIZ: &str = "Category quiz🗂️";
pub(crate) const PROGRESS: &str = "My progress✅";

const COMPLETED_MARK: &str = " ✅";

/// Payload of an inline button on a question message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Pick(usize),
    Drop(SlotId),
    Check,
    Reset,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Pick(index) => write!(f, "pick:{}", index),
            Action::Drop(slot) => write!(f, "drop:{}", slot),
            Action::Check => f.write_str("check"),
            Action::Reset => f.write_str("reset"),
        }
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("invalid callback data '{}'", s);
        match s.split_once(':') {
            Some(("pick", index)) => index.parse().map(Action::Pick).map_err(|_| invalid()),
            Some(("drop", slot)) => slot.parse().map(Action::Drop).map_err(|_| invalid()),
            None if s == "check" => Ok(Action::Check),
            None if s == "reset" => Ok(Action::Reset),
            _ => Err(invalid()),
        }
    }
}

pub(crate) fn action_keyboard() -> KeyboardMarkup {
    let keyboard = vec![
        vec![KeyboardButton::new(PRACTICE)],
        vec![
            KeyboardButton::new(FULL_QUIZ),
            KeyboardButton::new(CATEGORY_QUIZ),
        ],
        vec![KeyboardButton::new(PROGRESS)],
    ];

    KeyboardMarkup::new(keyboard)
}

/// Three names per row, completed ones marked.
pub(crate) fn amino_acids_keyboard(
    acids: &[&AminoAcid],
    tracker: &CompletionTracker,
) -> KeyboardMarkup {
    let keyboard = acids.chunks(3).map(|row| {
        row.iter()
            .map(|acid| {
                if tracker.contains(acid.name()) {
                    KeyboardButton::new(format!("{}{}", acid.name(), COMPLETED_MARK))
                } else {
                    KeyboardButton::new(acid.name())
                }
            })
            .collect::<Vec<_>>()
    });

    KeyboardMarkup::new(keyboard)
}

/// Undoes the completion mark added by [`amino_acids_keyboard`].
pub(crate) fn strip_completed_mark(text: &str) -> &str {
    text.trim().trim_end_matches(COMPLETED_MARK.trim()).trim_end()
}

pub(crate) fn categories_keyboard() -> KeyboardMarkup {
    let keyboard = Category::all()
        .iter()
        .map(|category| vec![KeyboardButton::new(category.name())]);

    KeyboardMarkup::new(keyboard)
}

pub(crate) fn attempt_keyboard(attempt: &Attempt) -> InlineKeyboardMarkup {
    let quiz = &attempt.quiz;

    let labels: Vec<InlineKeyboardButton> = quiz
        .available_labels()
        .iter()
        .enumerate()
        .map(|(index, label)| {
            let text = if attempt.picked == Some(index) {
                format!("👉 {}", label)
            } else {
                label.clone()
            };
            InlineKeyboardButton::callback(text, Action::Pick(index).to_string())
        })
        .collect();

    let slots: Vec<InlineKeyboardButton> = slot_numbers(quiz)
        .into_iter()
        .map(|(slot, number)| {
            let text = match quiz.placement(slot) {
                Some(placement) => format!("[{}] {}", number, placement.label()),
                None => format!("[{}] _", number),
            };
            InlineKeyboardButton::callback(text, Action::Drop(slot).to_string())
        })
        .collect();

    let mut keyboard: Vec<Vec<InlineKeyboardButton>> = labels
        .chunks(3)
        .map(<[InlineKeyboardButton]>::to_vec)
        .collect();
    keyboard.extend(slots.chunks(3).map(<[InlineKeyboardButton]>::to_vec));
    keyboard.push(vec![
        InlineKeyboardButton::callback("✔️ Check Answer", Action::Check.to_string()),
        InlineKeyboardButton::callback("🔄 Reset", Action::Reset.to_string()),
    ]);

    InlineKeyboardMarkup::new(keyboard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{all_amino_acids, find_by_name};
    use crate::database::memory::MemoryStore;

    #[test]
    fn actions_parse_back_from_callback_data() {
        for action in [Action::Pick(0), Action::Pick(4), Action::Drop(32), Action::Check, Action::Reset] {
            assert_eq!(action.to_string().parse::<Action>(), Ok(action));
        }
        assert_eq!("drop:31".parse::<Action>(), Ok(Action::Drop(31)));
    }

    #[test]
    fn malformed_callback_data_is_rejected() {
        assert!("pick:".parse::<Action>().is_err());
        assert!("drop:-1".parse::<Action>().is_err());
        assert!("checkmate".parse::<Action>().is_err());
        assert!("swap:1".parse::<Action>().is_err());
    }

    #[test]
    fn completion_mark_round_trips_through_button_text() {
        assert_eq!(strip_completed_mark("Glycine ✅"), "Glycine");
        assert_eq!(strip_completed_mark("  Glycine "), "Glycine");
    }

    #[test]
    fn amino_acid_keyboard_lays_out_rows_of_three() {
        let acids: Vec<&AminoAcid> = all_amino_acids().iter().collect();
        let markup = amino_acids_keyboard(&acids, &CompletionTracker::default());
        assert_eq!(markup.keyboard.len(), 6);
        assert!(markup.keyboard.iter().all(|row| row.len() == 3));
        assert_eq!(markup.keyboard[0][0].text, "Glycine");
    }

    #[tokio::test]
    async fn amino_acid_keyboard_marks_completed_names() {
        let store = MemoryStore::default();
        let mut tracker = CompletionTracker::load(&store, 1).await;
        tracker.mark_completed(&store, "Glycine").await.unwrap();

        let acids: Vec<&AminoAcid> = all_amino_acids().iter().collect();
        let markup = amino_acids_keyboard(&acids, &tracker);
        assert_eq!(markup.keyboard[0][0].text, "Glycine ✅");
        assert_eq!(markup.keyboard[0][1].text, "Alanine");
        assert_eq!(strip_completed_mark(&markup.keyboard[0][0].text), "Glycine");
    }

    #[test]
    fn attempt_keyboard_has_labels_slots_and_controls() {
        let attempt = Attempt::practice(
            find_by_name("Arginine").unwrap(),
            CompletionTracker::default(),
        );
        let markup = attempt_keyboard(&attempt);
        let rows = &markup.inline_keyboard;
        // 5 labels -> 2 rows, 5 slots -> 2 rows, 1 control row
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[2][0].text, "[1] _");
        assert_eq!(rows[4].len(), 2);
    }
}
