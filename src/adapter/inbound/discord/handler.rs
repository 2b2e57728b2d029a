//! Gateway event handler for the tag bot.
//!
//! Registers `/tag` when the bot becomes ready and serves interactions:
//! authorization first, then an ephemeral deferred reply that is edited once
//! provisioning or teardown finishes.

use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::{
    Command, CommandInteraction, Context, CreateAllowedMentions, CreateInteractionResponse,
    CreateInteractionResponseMessage, CreateMessage, EditInteractionResponse, EventHandler,
    GuildId, Interaction, Ready, UserId,
};
use tracing::{error, info, warn};

use crate::domain::PlayerSlot;
use crate::error::Result;
use crate::port::inbound::game::TagGameControl;

use super::auth::{is_authorized, PERMISSION_DENIED};
use super::command::{command_input, parse_command, tag_command, TagCommand, COMMAND_NAME};
use super::format::{command_failed, game_created, game_ended, player_message_for};

/// Discord event handler driving a [`TagGameControl`].
pub struct TagBot {
    game: Arc<dyn TagGameControl>,
    admin_role: u64,
    guild: Option<GuildId>,
}

impl TagBot {
    /// Create a handler. With `guild_id` set, commands are registered on that
    /// guild only instead of globally.
    #[must_use]
    pub fn new(game: Arc<dyn TagGameControl>, admin_role: u64, guild_id: Option<u64>) -> Self {
        Self {
            game,
            admin_role,
            guild: guild_id.map(GuildId::new),
        }
    }

    async fn register_commands(&self, ctx: &Context) -> Result<()> {
        let commands = vec![tag_command(self.game.images())];
        match self.guild {
            Some(guild) => {
                guild.set_commands(&ctx.http, commands).await?;
                info!(guild = guild.get(), "Registered guild commands");
            }
            None => {
                Command::set_global_commands(&ctx.http, commands).await?;
                info!("Registered global commands");
            }
        }
        Ok(())
    }

    async fn reply_ephemeral(
        &self,
        ctx: &Context,
        command: &CommandInteraction,
        content: &str,
    ) -> Result<()> {
        let message = CreateInteractionResponseMessage::new()
            .content(content)
            .ephemeral(true);
        command
            .create_response(&ctx.http, CreateInteractionResponse::Message(message))
            .await?;
        Ok(())
    }

    async fn handle_command(&self, ctx: &Context, command: &CommandInteraction) -> Result<()> {
        let roles: Option<Vec<u64>> = command
            .member
            .as_ref()
            .map(|member| member.roles.iter().map(|role| role.get()).collect());
        if !is_authorized(roles.as_deref(), self.admin_role, command.user.id.get()) {
            return self.reply_ephemeral(ctx, command, PERMISSION_DENIED).await;
        }

        let parsed = match parse_command(&command_input(command)) {
            Ok(parsed) => parsed,
            Err(err) => {
                return self
                    .reply_ephemeral(ctx, command, &format!("Invalid command: {err}"))
                    .await;
            }
        };

        command.defer_ephemeral(&ctx.http).await?;

        let content = match parsed {
            TagCommand::End => match self.game.end().await {
                Ok(report) => game_ended(&report),
                Err(err) => {
                    error!(error = %err, "Failed to end tag game");
                    command_failed("end", &err)
                }
            },
            TagCommand::Start {
                player1,
                player2,
                image,
            } => match self.game.start(&image).await {
                Ok(started) => {
                    for (slot, player) in [(PlayerSlot::One, player1), (PlayerSlot::Two, player2)] {
                        let Some(text) = player_message_for(&started, slot) else {
                            continue;
                        };
                        if let Err(err) = UserId::new(player)
                            .direct_message(&ctx.http, CreateMessage::new().content(text))
                            .await
                        {
                            warn!(user_id = player, error = %err, "Failed to DM player");
                        }
                    }
                    game_created(&started, player1, player2)
                }
                Err(err) => {
                    error!(error = %err, image = %image, "Failed to start tag game");
                    command_failed("start", &err)
                }
            },
        };

        command
            .edit_response(
                &ctx.http,
                EditInteractionResponse::new()
                    .content(content)
                    .allowed_mentions(CreateAllowedMentions::new()),
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl EventHandler for TagBot {
    async fn ready(&self, ctx: Context, ready: Ready) {
        if let Err(err) = self.register_commands(&ctx).await {
            error!(error = %err, "Failed to register commands");
        }
        info!(user = %ready.user.name, "Bot is ready");
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };
        if command.data.name != COMMAND_NAME {
            return;
        }

        info!(
            user_id = command.user.id.get(),
            command = %command.data.name,
            "Handling command"
        );
        if let Err(err) = self.handle_command(&ctx, &command).await {
            error!(error = %err, "Failed to handle command");
        }
    }
}
