use std::collections::BTreeMap;

use teloxide::utils::html;

use crate::catalog::{all_amino_acids, group_by_category};
use crate::progress::CompletionTracker;
use crate::quiz::{segment_of, slot_id, QuizState, SlotId, SlotRole};
use crate::session::Session;
use crate::state::Attempt;

/// The part every amino acid shares; R is the side chain being built.
pub const BACKBONE: &str = "\
H       H       O
|       |       ||
N   -   C   -   C
|       |       |
H       R       OH";

const BAR_WIDTH: usize = 10;

/// Slot numbers as shown to the learner, counted from 1 in slot order.
pub fn slot_numbers(quiz: &QuizState) -> BTreeMap<SlotId, usize> {
    quiz.expected_slots()
        .into_keys()
        .enumerate()
        .map(|(position, slot)| (slot, position + 1))
        .collect()
}

fn slot_cell(quiz: &QuizState, numbers: &BTreeMap<SlotId, usize>, slot: SlotId) -> String {
    match quiz.placement(slot) {
        Some(placement) => placement.label().to_owned(),
        None => format!("[{}]", numbers.get(&slot).copied().unwrap_or_default()),
    }
}

fn centered(cell: &str, width: usize) -> String {
    format!("{:^width$}", cell, width = width)
}

/// Monospace drawing of the side chain: one column per segment with the
/// first branch above, the main group in the middle and the last branch below.
pub fn side_chain_diagram(quiz: &QuizState) -> String {
    let numbers = slot_numbers(quiz);
    let mut rows: [Vec<String>; 5] = Default::default();

    for (index, segment) in quiz.amino_acid().chain().iter().enumerate() {
        let branches = segment.branches().len();
        let slot = |role| slot_id(index, role);

        let column = [
            if branches >= 1 {
                slot_cell(quiz, &numbers, slot(SlotRole::FirstBranch))
            } else {
                String::new()
            },
            if branches >= 1 { "|".to_owned() } else { String::new() },
            slot_cell(quiz, &numbers, slot(SlotRole::Main)),
            if branches >= 2 { "|".to_owned() } else { String::new() },
            if branches >= 2 {
                slot_cell(quiz, &numbers, slot(SlotRole::LastBranch))
            } else {
                String::new()
            },
        ];

        let width = column.iter().map(|cell| cell.chars().count()).max().unwrap_or(1);
        for (row, cell) in rows.iter_mut().zip(column) {
            row.push(centered(&cell, width));
        }
    }

    rows.iter()
        .enumerate()
        .map(|(line, cells)| {
            let (prefix, joiner) = if line == 2 { ("R = ", " - ") } else { ("    ", "   ") };
            format!("{}{}", prefix, cells.join(joiner)).trim_end().to_owned()
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn progress_bar(done: usize, total: usize) -> String {
    if total == 0 {
        return "░".repeat(BAR_WIDTH);
    }
    let filled = (done.min(total) * BAR_WIDTH) / total;
    format!("{}{}", "▓".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn slot_feedback(quiz: &QuizState) -> String {
    slot_numbers(quiz)
        .into_iter()
        .map(|(slot, number)| match quiz.placement(slot) {
            Some(placement) if placement.is_correct() => {
                format!("[{}] {} ✅", number, html::escape(placement.label()))
            }
            Some(placement) => format!("[{}] {} ❌", number, html::escape(placement.label())),
            None => format!("[{}] empty", number),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn segment_count_hint(quiz: &QuizState) -> String {
    let segments = quiz
        .expected_slots()
        .keys()
        .map(|slot| segment_of(*slot))
        .max()
        .map_or(0, |last| last + 1);
    format!(
        "{} segment(s), {} blank(s)",
        segments,
        quiz.expected_slots().len()
    )
}

/// HTML body of the question message.
pub fn question_text(attempt: &Attempt, note: Option<&str>) -> String {
    let quiz = &attempt.quiz;
    let mut text = String::new();

    let session = &attempt.session;
    if session.config().is_full_quiz {
        text.push_str(&format!(
            "<b>{}</b> · Question {}/{}\n{}\n\n",
            html::escape(&session.config().title()),
            session.current_index() + 1,
            session.total_questions(),
            progress_bar(session.current_index(), session.total_questions()),
        ));
    }

    text.push_str(&format!(
        "Amino Acid: <b>{}</b> <i>({})</i>\n",
        html::escape(attempt.amino_acid().name()),
        html::escape(attempt.amino_acid().category().name()),
    ));
    text.push_str(&format!("<pre>{}</pre>\n", html::escape(BACKBONE)));
    text.push_str(&format!(
        "<pre>{}</pre>\n",
        html::escape(&side_chain_diagram(quiz))
    ));
    text.push_str(&format!("{}\n\n", segment_count_hint(quiz)));

    if attempt.checked {
        text.push_str(&slot_feedback(quiz));
        text.push_str("\n\n");
    }

    match attempt.picked_label() {
        Some(label) => text.push_str(&format!(
            "Holding <b>{}</b>: tap the blank it belongs in.",
            html::escape(label)
        )),
        None => text.push_str("Pick an atom, then tap the blank it belongs in."),
    }

    if let Some(note) = note {
        text.push_str(&format!("\n\n{}", note));
    }

    text
}

pub fn session_summary(session: &Session) -> String {
    format!(
        "Quiz Completed!\n{}: {}/{} side chains built, {} wrong attempt(s).\nYou should try another to challenge yourself!",
        session.config().title(),
        session.score(),
        session.total_questions(),
        session.mistakes(),
    )
}

pub fn progress_summary(tracker: &CompletionTracker) -> String {
    let total = all_amino_acids().len();
    let done = all_amino_acids()
        .iter()
        .filter(|acid| tracker.contains(acid.name()))
        .count();

    let mut text = format!("Completed {}/{}\n{}\n", done, total, progress_bar(done, total));
    for (category, acids) in group_by_category(all_amino_acids()) {
        text.push_str(&format!("\n{}\n", category));
        for acid in acids {
            let mark = if tracker.contains(acid.name()) { "✅" } else { "▫️" };
            text.push_str(&format!("{} {}\n", mark, acid.name()));
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::find_by_name;
    use crate::session::{SessionConfig, SessionStatus};

    fn quiz(name: &str) -> QuizState {
        QuizState::reset(find_by_name(name).unwrap())
    }

    #[test]
    fn glycine_is_a_single_blank() {
        assert_eq!(side_chain_diagram(&quiz("Glycine")), "R = [1]");
    }

    #[test]
    fn valine_draws_branches_above_and_below() {
        let diagram = side_chain_diagram(&quiz("Valine"));
        assert_eq!(diagram, "    [1]\n     |\nR = [2]\n     |\n    [3]");
    }

    #[test]
    fn placed_labels_replace_their_blanks() {
        let mut state = quiz("Isoleucine");
        state.assign(2, "CH");
        state.assign(12, "CH2");
        let diagram = side_chain_diagram(&state);
        let lines: Vec<_> = diagram.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].trim(), "[1]");
        assert_eq!(lines[2], "R = CH  - CH2 - [4]");
    }

    #[test]
    fn slot_numbers_follow_slot_order() {
        let numbers = slot_numbers(&quiz("Arginine"));
        assert_eq!(
            numbers.into_iter().collect::<Vec<_>>(),
            [(2, 1), (12, 2), (22, 3), (31, 4), (32, 5)]
        );
    }

    #[test]
    fn progress_bar_scales_to_width() {
        assert_eq!(progress_bar(0, 4), "░░░░░░░░░░");
        assert_eq!(progress_bar(2, 4), "▓▓▓▓▓░░░░░");
        assert_eq!(progress_bar(4, 4), "▓▓▓▓▓▓▓▓▓▓");
        assert_eq!(progress_bar(9, 4), "▓▓▓▓▓▓▓▓▓▓");
        assert_eq!(progress_bar(0, 0), "░░░░░░░░░░");
    }

    #[test]
    fn question_text_shows_progress_only_in_full_quizzes() {
        let practice = Attempt::practice(find_by_name("Serine").unwrap(), CompletionTracker::default());
        let text = question_text(&practice, None);
        assert!(text.contains("Amino Acid: <b>Serine</b>"));
        assert!(!text.contains("Question 1/"));

        let session = Session::new(SessionConfig::full_quiz());
        let attempt = Attempt::from_session(session).unwrap();
        let text = question_text(&attempt, Some("Wrong! Try again!"));
        assert!(text.contains("Question 1/18"));
        assert!(text.ends_with("Wrong! Try again!"));
    }

    #[test]
    fn checked_attempts_list_every_slot() {
        let mut attempt =
            Attempt::practice(find_by_name("Aspartate").unwrap(), CompletionTracker::default());
        attempt.quiz.assign(2, "CH2");
        attempt.quiz.assign(12, "CH2");
        attempt.checked = true;
        let text = question_text(&attempt, None);
        assert!(text.contains("[1] CH2 ✅"));
        assert!(text.contains("[2] CH2 ❌"));
    }

    #[test]
    fn new_placements_after_a_wrong_check_show_no_verdict() {
        let mut attempt =
            Attempt::practice(find_by_name("Serine").unwrap(), CompletionTracker::default());
        attempt.checked = true;

        let oh = attempt
            .quiz
            .available_labels()
            .iter()
            .position(|label| label == "OH")
            .unwrap();
        attempt.pick(oh);
        attempt.drop_into(12);

        let text = question_text(&attempt, None);
        assert!(!text.contains("[2] OH ✅"));
        assert!(!text.contains("✅"));
        assert!(!text.contains("❌"));
    }

    #[test]
    fn held_labels_are_announced() {
        let mut attempt =
            Attempt::practice(find_by_name("Alanine").unwrap(), CompletionTracker::default());
        attempt.pick(0);
        assert!(question_text(&attempt, None).contains("Holding <b>CH3</b>"));
    }

    #[test]
    fn summaries_report_score_and_mistakes() {
        let mut session = Session::new(SessionConfig::category_quiz(crate::catalog::Category::Acidic));
        session.record(false);
        session.record(true);
        assert_eq!(session.record(true), SessionStatus::Completed { score: 2 });
        let summary = session_summary(&session);
        assert!(summary.contains("Acidic (Negative) quiz: 2/2"));
        assert!(summary.contains("1 wrong attempt(s)"));
    }

    #[test]
    fn progress_summary_marks_completed_names() {
        let summary = progress_summary(&CompletionTracker::default());
        assert!(summary.starts_with("Completed 0/18"));
        assert!(summary.contains("▫️ Glycine"));
    }
}
