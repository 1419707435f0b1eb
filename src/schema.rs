use std::error::Error;

use teloxide::{
    dispatching::{
        dialogue::{self, InMemStorage},
        DpHandlerDescription, UpdateFilterExt, UpdateHandler,
    },
    dptree::{self, Handler},
    prelude::{DependencyMap, Requester},
    types::{Message, Update},
    Bot,
};
use tracing::instrument;

use crate::{
    commands::{cancel, help, progress, start, Command},
    runner, selection,
    state::BotState,
    HandlerResult,
};

type SchemeHandler =
    Handler<'static, DependencyMap, Result<(), Box<dyn Error + Send + Sync + 'static>>, DpHandlerDescription>;

pub fn schema() -> UpdateHandler<Box<dyn Error + Send + Sync + 'static>> {
    use dptree::case;

    let command_handler = teloxide::filter_command::<Command, _>()
        .branch(case![Command::Help].endpoint(help))
        .branch(case![Command::Start].endpoint(start))
        .branch(case![Command::Cancel].endpoint(cancel))
        .branch(case![Command::Progress].endpoint(progress));

    let handler = Update::filter_message()
        .branch(command_handler)
        .branch(selection_scheme())
        .endpoint(invalid_state);

    dialogue::enter::<Update, InMemStorage<BotState>, BotState, _>()
        .branch(handler)
        .branch(callback_query_scheme())
}

#[instrument(level = "debug")]
fn selection_scheme() -> SchemeHandler {
    use dptree::case;
    tracing::debug!("Building a dispatching tree for menus");
    Update::filter_message()
        .branch(case![BotState::Start].endpoint(selection::choose_what_to_do))
        .branch(case![BotState::ChooseAminoAcid].endpoint(selection::receive_amino_acid))
        .branch(case![BotState::ChooseCategory].endpoint(selection::receive_category))
}

#[instrument(level = "debug")]
fn callback_query_scheme() -> SchemeHandler {
    use dptree::case;
    tracing::debug!("Building a dispatching tree for callback queries");
    Update::filter_callback_query()
        .branch(case![BotState::Solving { attempt }].endpoint(runner::take_action))
        .endpoint(runner::stale_action)
}

#[instrument(level = "info", skip(bot))]
async fn invalid_state(bot: Bot, msg: Message) -> HandlerResult {
    tracing::info!(
        "{}: invalid input '{:?}'",
        msg.chat.username().unwrap_or("anonymous"),
        msg.text()
    );
    bot.send_message(
        msg.chat.id,
        "Unable to handle the message. Enter /help to see usages.",
    )
    .await?;
    Ok(())
}
