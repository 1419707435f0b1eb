use std::sync::Arc;

use teloxide::{
    payloads::SendMessageSetters, prelude::Requester, types::Message, utils::command::BotCommands,
    Bot,
};

use crate::{
    database::Storage, keyboard::action_keyboard, progress::CompletionTracker,
    render::progress_summary, state::BotState, HandlerResult, UserDialogue,
};

#[derive(Debug, Clone, BotCommands)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "display help.")]
    Help,
    #[command(description = "start the bot.")]
    Start,
    #[command(description = "abandon the current question.")]
    Cancel,
    #[command(description = "show which side chains you have completed.")]
    Progress,
}

pub(crate) async fn help(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, Command::descriptions().to_string())
        .await?;
    Ok(())
}

pub(crate) async fn cancel(bot: Bot, dialogue: UserDialogue, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, "Cancelling. What do you want to do now?")
        .reply_markup(action_keyboard())
        .await?;
    dialogue.update(BotState::Start).await?;
    Ok(())
}

pub(crate) async fn start(bot: Bot, msg: Message, dialogue: UserDialogue) -> HandlerResult {
    bot.send_message(
        msg.chat.id,
        "Side Chain Memorization Quest\n\nBuild amino acid side chains atom by atom. Please choose what to do:",
    )
    .reply_markup(action_keyboard())
    .await?;
    dialogue.update(BotState::Start).await?;
    Ok(())
}

pub(crate) async fn progress(bot: Bot, msg: Message, storage: Arc<Storage>) -> HandlerResult {
    let tracker = CompletionTracker::load(storage.as_ref(), msg.chat.id.0).await;
    bot.send_message(msg.chat.id, progress_summary(&tracker))
        .await?;
    Ok(())
}
