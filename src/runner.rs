use std::sync::Arc;

use teloxide::{
    payloads::{AnswerCallbackQuerySetters, EditMessageTextSetters, SendMessageSetters},
    prelude::Requester,
    types::{CallbackQuery, ChatId, MessageId, ParseMode, ReplyMarkup},
    ApiError, Bot, RequestError,
};
use tracing::instrument;

use crate::{
    database::Storage,
    keyboard::{action_keyboard, attempt_keyboard, Action},
    render::{question_text, session_summary},
    session::Session,
    state::{Attempt, BotState},
    HandlerResult, UserDialogue,
};

const CORRECT: &str = "Correct! You completed the side chain correctly!";
const WRONG: &str = "Wrong! Try again!";

/// Sends a fresh question message and parks the dialogue on it.
pub(crate) async fn ask(bot: &Bot, dialogue: &UserDialogue, mut attempt: Attempt) -> HandlerResult {
    tracing::info!(
        chat = dialogue.chat_id().0,
        session = %attempt.session.id(),
        amino_acid = attempt.amino_acid().name(),
        "Asking question #{}",
        attempt.session.current_index() + 1
    );
    let message = bot
        .send_message(dialogue.chat_id(), question_text(&attempt, None))
        .parse_mode(ParseMode::Html)
        .reply_markup(attempt_keyboard(&attempt))
        .await?;
    attempt.message_id = Some(message.id);
    dialogue.update(BotState::Solving { attempt }).await?;
    Ok(())
}

/// Opens a session with the reply keyboard removed, or reports that it is empty.
pub(crate) async fn begin_session(
    bot: &Bot,
    dialogue: &UserDialogue,
    session: Session,
) -> HandlerResult {
    let title = session.config().title();
    match Attempt::from_session(session) {
        Some(attempt) => {
            bot.send_message(
                dialogue.chat_id(),
                format!(
                    "{}: {} side chains. Let's begin!",
                    title,
                    attempt.session.total_questions()
                ),
            )
            .reply_markup(ReplyMarkup::kb_remove())
            .await?;
            ask(bot, dialogue, attempt).await
        }
        None => {
            bot.send_message(dialogue.chat_id(), "Sorry, no amino acids available for that quiz.")
                .reply_markup(action_keyboard())
                .await?;
            dialogue.update(BotState::Start).await?;
            Ok(())
        }
    }
}

async fn redraw(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    attempt: &Attempt,
    note: Option<&str>,
    with_keyboard: bool,
) -> HandlerResult {
    let request = bot
        .edit_message_text(chat_id, message_id, question_text(attempt, note))
        .parse_mode(ParseMode::Html);
    let result = if with_keyboard {
        request.reply_markup(attempt_keyboard(attempt)).await.map(drop)
    } else {
        request.await.map(drop)
    };

    match result {
        // tapping the label that is already held re-renders the same message
        Err(RequestError::Api(ApiError::MessageNotModified)) => Ok(()),
        other => Ok(other?),
    }
}

#[instrument(level = "info", skip(bot, dialogue, storage))]
pub(crate) async fn take_action(
    bot: Bot,
    dialogue: UserDialogue,
    q: CallbackQuery,
    mut attempt: Attempt,
    storage: Arc<Storage>,
) -> HandlerResult {
    let chat_id = dialogue.chat_id();
    let message_id = match q.message.as_ref().map(|message| message.id()) {
        Some(message_id) if attempt.is_shown_in(Some(message_id)) => message_id,
        other => {
            tracing::debug!(chat = chat_id.0, message_id = ?other, "Button pressed on an older message");
            return stale_action(bot, q).await;
        }
    };

    let action = match q.data.as_deref().map(str::parse::<Action>) {
        Some(Ok(action)) => action,
        other => {
            tracing::warn!(chat = chat_id.0, "Unexpected callback data: {:?}", other);
            bot.answer_callback_query(&q.id).await?;
            return Ok(());
        }
    };

    match action {
        Action::Pick(index) => {
            match attempt.pick(index) {
                Some(label) => {
                    tracing::debug!(chat = chat_id.0, label, "Picked label");
                    bot.answer_callback_query(&q.id).await?;
                }
                None => {
                    bot.answer_callback_query(&q.id)
                        .text("That atom is no longer available.")
                        .await?;
                }
            }
            redraw(&bot, chat_id, message_id, &attempt, None, true).await?;
            dialogue.update(BotState::Solving { attempt }).await?;
        }
        Action::Drop(slot) => {
            if attempt.drop_into(slot) {
                bot.answer_callback_query(&q.id).await?;
                redraw(&bot, chat_id, message_id, &attempt, None, true).await?;
                dialogue.update(BotState::Solving { attempt }).await?;
            } else {
                bot.answer_callback_query(&q.id)
                    .text("Pick an atom first, then tap a blank.")
                    .await?;
            }
        }
        Action::Reset => {
            attempt.reset();
            bot.answer_callback_query(&q.id).text("Shuffled again.").await?;
            redraw(&bot, chat_id, message_id, &attempt, None, true).await?;
            dialogue.update(BotState::Solving { attempt }).await?;
        }
        Action::Check => check(bot, dialogue, q, attempt, storage, message_id).await?,
    }

    Ok(())
}

async fn check(
    bot: Bot,
    dialogue: UserDialogue,
    q: CallbackQuery,
    mut attempt: Attempt,
    storage: Arc<Storage>,
    message_id: MessageId,
) -> HandlerResult {
    let chat_id = dialogue.chat_id();
    let correct = attempt.quiz.evaluate();
    let status = attempt.session.record(correct);
    tracing::info!(
        chat = chat_id.0,
        session = %attempt.session.id(),
        amino_acid = attempt.amino_acid().name(),
        correct,
        complete = attempt.quiz.is_complete(),
        ?status,
        "Checked answer"
    );

    if !correct {
        attempt.checked = true;
        bot.answer_callback_query(&q.id).text(WRONG).await?;
        redraw(&bot, chat_id, message_id, &attempt, Some(WRONG), true).await?;
        dialogue.update(BotState::Solving { attempt }).await?;
        return Ok(());
    }

    attempt.picked = None;
    attempt.checked = false;

    if !attempt.session.config().is_full_quiz {
        let saved = match attempt.tracker.take() {
            Some(mut tracker) => {
                match tracker.mark_completed(storage.as_ref(), attempt.amino_acid().name()).await {
                    Ok(_) => true,
                    Err(e) => {
                        tracing::error!(
                            scope = tracker.scope(),
                            amino_acid = attempt.amino_acid().name(),
                            error = %e,
                            "Failed to save completion"
                        );
                        false
                    }
                }
            }
            None => true,
        };
        dialogue.update(BotState::Start).await?;

        bot.answer_callback_query(&q.id).text("Correct!").await?;
        redraw(&bot, chat_id, message_id, &attempt, Some(CORRECT), false).await?;
        if !saved {
            bot.send_message(chat_id, "Your progress could not be saved this time.")
                .await?;
        }
        bot.send_message(chat_id, "What do you want to do now?")
            .reply_markup(action_keyboard())
            .await?;
        return Ok(());
    }

    bot.answer_callback_query(&q.id).text("Correct!").await?;
    redraw(&bot, chat_id, message_id, &attempt, Some(CORRECT), false).await?;

    if attempt.session.is_completed() {
        tracing::info!(
            chat = chat_id.0,
            session = %attempt.session.id(),
            score = attempt.session.score(),
            mistakes = attempt.session.mistakes(),
            "Completed a quiz"
        );
        bot.send_message(chat_id, session_summary(&attempt.session))
            .reply_markup(action_keyboard())
            .await?;
        dialogue.update(BotState::Start).await?;
        return Ok(());
    }

    match Attempt::from_session(attempt.session) {
        Some(next) => ask(&bot, &dialogue, next).await?,
        None => dialogue.update(BotState::Start).await?,
    }

    Ok(())
}

/// Buttons of a question that is no longer on screen.
#[instrument(level = "info", skip(bot))]
pub(crate) async fn stale_action(bot: Bot, q: CallbackQuery) -> HandlerResult {
    bot.answer_callback_query(&q.id)
        .text("This question is over. Send /start to play again.")
        .await?;
    Ok(())
}
