//! Report publishers for the condor analysis.
//!
//! - [`DiscordWebhook`] posts an embed to a channel webhook
//! - [`ConsolePublisher`] prints the same summary as text

pub mod console;
pub mod discord;
pub mod embed;
pub mod error;

pub use console::{render_text, ConsolePublisher};
pub use discord::DiscordWebhook;
pub use embed::{build_embed, Embed, EmbedField, EmbedFooter, EmbedStyle, WebhookPayload};
pub use error::{NotifyError, Result};
