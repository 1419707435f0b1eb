use std::sync::Arc;

use teloxide::{
    payloads::SendMessageSetters,
    prelude::Requester,
    types::{Message, ReplyMarkup},
    Bot,
};
use tracing::instrument;

use crate::{
    catalog::{all_amino_acids, filter_by_name, find_by_name, group_by_category, AminoAcid, Category},
    database::Storage,
    keyboard::{
        action_keyboard, amino_acids_keyboard, categories_keyboard, strip_completed_mark,
        CATEGORY_QUIZ, FULL_QUIZ, PRACTICE, PROGRESS,
    },
    progress::CompletionTracker,
    render::progress_summary,
    runner::{ask, begin_session},
    session::{Session, SessionConfig},
    state::{Attempt, BotState},
    HandlerResult, UserDialogue,
};

fn username(msg: &Message) -> &str {
    msg.chat.username().unwrap_or("anonymous")
}

#[instrument(level = "info", skip(bot, dialogue, storage))]
pub(crate) async fn choose_what_to_do(
    bot: Bot,
    msg: Message,
    dialogue: UserDialogue,
    storage: Arc<Storage>,
) -> HandlerResult {
    match msg.text() {
        Some(PRACTICE) => {
            tracing::info!("{} chooses to practice one amino acid.", username(&msg));
            let tracker = CompletionTracker::load(storage.as_ref(), msg.chat.id.0).await;
            let acids: Vec<&AminoAcid> = all_amino_acids().iter().collect();

            let mut listing = String::from("Choose an amino acid, or type part of its name.\n");
            for (category, members) in group_by_category(acids.iter().copied()) {
                let names: Vec<_> = members.iter().map(|acid| acid.name()).collect();
                listing.push_str(&format!("\n{}: {}", category, names.join(", ")));
            }

            bot.send_message(msg.chat.id, listing)
                .reply_markup(amino_acids_keyboard(&acids, &tracker))
                .await?;
            dialogue.update(BotState::ChooseAminoAcid).await?;
        }
        Some(FULL_QUIZ) => {
            tracing::info!("{} starts a full quiz.", username(&msg));
            begin_session(&bot, &dialogue, Session::new(SessionConfig::full_quiz())).await?;
        }
        Some(CATEGORY_QUIZ) => {
            bot.send_message(msg.chat.id, "Select a Category")
                .reply_markup(categories_keyboard())
                .await?;
            dialogue.update(BotState::ChooseCategory).await?;
        }
        Some(PROGRESS) => {
            let tracker = CompletionTracker::load(storage.as_ref(), msg.chat.id.0).await;
            bot.send_message(msg.chat.id, progress_summary(&tracker))
                .reply_markup(action_keyboard())
                .await?;
        }
        other => {
            tracing::info!("Invalid message {:?} from {}", other, username(&msg));
            bot.send_message(msg.chat.id, "Invalid input. Please try again.")
                .reply_markup(action_keyboard())
                .await?;
        }
    }

    Ok(())
}

#[instrument(level = "info", skip(bot, dialogue, storage))]
pub(crate) async fn receive_amino_acid(
    bot: Bot,
    msg: Message,
    dialogue: UserDialogue,
    storage: Arc<Storage>,
) -> HandlerResult {
    let Some(text) = msg.text() else {
        bot.send_message(msg.chat.id, "Please, send the name of an amino acid.")
            .await?;
        return Ok(());
    };
    let query = strip_completed_mark(text);

    let chosen = match find_by_name(query) {
        Some(acid) => Some(acid),
        None => {
            let matches = filter_by_name(all_amino_acids(), query);
            match matches.as_slice() {
                [only] => Some(*only),
                [] => {
                    bot.send_message(
                        msg.chat.id,
                        format!("No amino acid matches '{}'. Try again.", query),
                    )
                    .await?;
                    None
                }
                several => {
                    let tracker = CompletionTracker::load(storage.as_ref(), msg.chat.id.0).await;
                    bot.send_message(
                        msg.chat.id,
                        format!("{} amino acids match '{}':", several.len(), query),
                    )
                    .reply_markup(amino_acids_keyboard(several, &tracker))
                    .await?;
                    None
                }
            }
        }
    };

    if let Some(acid) = chosen {
        tracing::info!("{} practices {}", username(&msg), acid.name());
        let tracker = CompletionTracker::load(storage.as_ref(), msg.chat.id.0).await;
        bot.send_message(
            msg.chat.id,
            "Drag the correct atoms into the blanks: pick an atom below, then tap its blank.",
        )
        .reply_markup(ReplyMarkup::kb_remove())
        .await?;
        ask(&bot, &dialogue, Attempt::practice(acid, tracker)).await?;
    }

    Ok(())
}

#[instrument(level = "info", skip(bot, dialogue))]
pub(crate) async fn receive_category(bot: Bot, msg: Message, dialogue: UserDialogue) -> HandlerResult {
    match msg.text().map(str::parse::<Category>) {
        Some(Ok(category)) => {
            tracing::info!("{} starts a {} quiz.", username(&msg), category);
            begin_session(
                &bot,
                &dialogue,
                Session::new(SessionConfig::category_quiz(category)),
            )
            .await?;
        }
        _ => {
            bot.send_message(msg.chat.id, "Please, choose one of the categories.")
                .reply_markup(categories_keyboard())
                .await?;
        }
    }

    Ok(())
}
