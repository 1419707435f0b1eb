use std::error::Error;

use state::BotState;
use teloxide::{dispatching::dialogue::InMemStorage, prelude::Dialogue};

pub mod catalog;
pub mod commands;
pub mod config;
pub mod database;
pub mod keyboard;
pub mod logging;
pub mod progress;
pub mod quiz;
pub mod render;
pub mod runner;
pub mod schema;
pub mod selection;
pub mod session;
pub mod state;

pub type UserDialogue = Dialogue<BotState, InMemStorage<BotState>>;
pub type HandlerResult = Result<(), Box<dyn Error + Send + Sync + 'static>>;
