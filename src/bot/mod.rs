//! Bot handlers: message routing, callback routing, lead capture, catalog
//! browsing and keyboard construction.

pub mod callback_handler;
pub mod catalog;
pub mod lead_flow;
pub mod message_handler;
pub mod ui_builder;

use teloxide::dispatching::{dialogue::InMemStorage, UpdateHandler};
use teloxide::prelude::*;

use crate::dialogue::LeadState;

pub use callback_handler::callback_handler;
pub use message_handler::message_handler;

/// The full update-handler tree wired into the dispatcher.
pub fn handler_tree() -> UpdateHandler<anyhow::Error> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .enter_dialogue::<Message, InMemStorage<LeadState>, LeadState>()
                .endpoint(message_handler),
        )
        .branch(
            Update::filter_callback_query()
                .enter_dialogue::<CallbackQuery, InMemStorage<LeadState>, LeadState>()
                .endpoint(callback_handler),
        )
}
