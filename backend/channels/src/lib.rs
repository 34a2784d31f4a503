//! Chat transports for the Cyborg router.

pub mod console;
pub mod discord;

pub use console::{format_reply, ConsoleTransport, CONSOLE_CHANNEL};
pub use discord::{build_embed, parse_channel_id, DiscordTransport};
