//! `/tag` slash command definition and parsing.
//!
//! Interactions are first flattened into a [`CommandInput`] so parsing does
//! not depend on gateway types and can be tested directly.

use serenity::all::{
    CommandDataOptionValue, CommandInteraction, CommandOptionType, CreateCommand,
    CreateCommandOption,
};

use crate::domain::ImageChoice;

/// Name of the registered slash command.
pub const COMMAND_NAME: &str = "tag";

/// Parsed `/tag` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagCommand {
    /// `/tag start player1 player2 image`
    Start {
        player1: u64,
        player2: u64,
        image: String,
    },
    /// `/tag end`
    End,
}

/// Option value carried by an interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    User(u64),
    String(String),
    Other,
}

/// Gateway-independent view of a slash command invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandInput {
    pub name: String,
    pub subcommand: Option<String>,
    pub options: Vec<(String, OptionValue)>,
}

impl CommandInput {
    fn option(&self, name: &str) -> Option<&OptionValue> {
        self.options
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

/// Parse error for `/tag` interactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandParseError {
    UnknownCommand(String),
    MissingSubcommand,
    UnknownSubcommand(String),
    MissingArgument(&'static str),
    InvalidArgument(&'static str),
}

impl std::fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCommand(cmd) => write!(f, "unknown command `{cmd}`"),
            Self::MissingSubcommand => write!(f, "missing subcommand (use: start, end)"),
            Self::UnknownSubcommand(sub) => {
                write!(f, "unknown subcommand `{sub}` (use: start, end)")
            }
            Self::MissingArgument(name) => write!(f, "missing argument `{name}`"),
            Self::InvalidArgument(name) => write!(f, "invalid value for `{name}`"),
        }
    }
}

impl std::error::Error for CommandParseError {}

fn user_option(input: &CommandInput, name: &'static str) -> Result<u64, CommandParseError> {
    match input.option(name) {
        Some(OptionValue::User(id)) => Ok(*id),
        Some(_) => Err(CommandParseError::InvalidArgument(name)),
        None => Err(CommandParseError::MissingArgument(name)),
    }
}

fn string_option(input: &CommandInput, name: &'static str) -> Result<String, CommandParseError> {
    match input.option(name) {
        Some(OptionValue::String(value)) => Ok(value.clone()),
        Some(_) => Err(CommandParseError::InvalidArgument(name)),
        None => Err(CommandParseError::MissingArgument(name)),
    }
}

/// Parse a flattened interaction into a [`TagCommand`].
pub fn parse_command(input: &CommandInput) -> Result<TagCommand, CommandParseError> {
    if input.name != COMMAND_NAME {
        return Err(CommandParseError::UnknownCommand(input.name.clone()));
    }

    match input.subcommand.as_deref() {
        Some("start") => Ok(TagCommand::Start {
            player1: user_option(input, "player1")?,
            player2: user_option(input, "player2")?,
            image: string_option(input, "image")?,
        }),
        Some("end") => Ok(TagCommand::End),
        Some(other) => Err(CommandParseError::UnknownSubcommand(other.to_string())),
        None => Err(CommandParseError::MissingSubcommand),
    }
}

/// Flatten a gateway interaction into a [`CommandInput`].
#[must_use]
pub fn command_input(interaction: &CommandInteraction) -> CommandInput {
    let mut input = CommandInput {
        name: interaction.data.name.clone(),
        ..CommandInput::default()
    };

    for option in &interaction.data.options {
        match &option.value {
            CommandDataOptionValue::SubCommand(nested) => {
                input.subcommand = Some(option.name.clone());
                input.options.extend(nested.iter().map(|nested| {
                    let value = match &nested.value {
                        CommandDataOptionValue::User(id) => OptionValue::User(id.get()),
                        CommandDataOptionValue::String(s) => OptionValue::String(s.clone()),
                        _ => OptionValue::Other,
                    };
                    (nested.name.clone(), value)
                }));
            }
            CommandDataOptionValue::User(id) => input
                .options
                .push((option.name.clone(), OptionValue::User(id.get()))),
            CommandDataOptionValue::String(s) => input
                .options
                .push((option.name.clone(), OptionValue::String(s.clone()))),
            _ => input.options.push((option.name.clone(), OptionValue::Other)),
        }
    }

    input
}

/// Slash command registered with Discord.
#[must_use]
pub fn tag_command(images: &[ImageChoice]) -> CreateCommand {
    let image = images.iter().fold(
        CreateCommandOption::new(CommandOptionType::String, "image", "The image to use")
            .required(true),
        |option, choice| option.add_string_choice(&choice.name, choice.image.as_str()),
    );

    let start = CreateCommandOption::new(
        CommandOptionType::SubCommand,
        "start",
        "Start a game of tag",
    )
    .add_sub_option(
        CreateCommandOption::new(CommandOptionType::User, "player1", "The first player")
            .required(true),
    )
    .add_sub_option(
        CreateCommandOption::new(CommandOptionType::User, "player2", "The second player")
            .required(true),
    )
    .add_sub_option(image);

    let end = CreateCommandOption::new(CommandOptionType::SubCommand, "end", "End a game of tag");

    CreateCommand::new(COMMAND_NAME)
        .description("Tag subcommands")
        .dm_permission(false)
        .add_option(start)
        .add_option(end)
}
