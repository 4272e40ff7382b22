use std::env;

use clap::error::ErrorKind;

use crate::api::{ArgSpec, Handler};
use crate::parser::base::extract;
use crate::parser::interface::UserInterface;

/// The configured command line parser.
/// Built via [`FunctionParser::build`](crate::FunctionParser::build) or
/// [`MultiFunctionParser::build`](crate::MultiFunctionParser::build).
pub struct GeneralParser<'f> {
    command: clap::Command,
    mode: ParseMode<'f>,
    user_interface: Box<dyn UserInterface>,
}

pub(crate) struct BindUnit<'f> {
    specs: Vec<ArgSpec>,
    handler: Option<Handler<'f>>,
}

impl<'f> BindUnit<'f> {
    pub(crate) fn new(specs: Vec<ArgSpec>, handler: Option<Handler<'f>>) -> Self {
        Self { specs, handler }
    }
}

pub(crate) enum ParseMode<'f> {
    Single(BindUnit<'f>),
    Multi(Vec<(String, BindUnit<'f>)>),
}

impl std::fmt::Debug for GeneralParser<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneralParser")
            .field("command", &self.command)
            .finish_non_exhaustive()
    }
}

impl<'f> GeneralParser<'f> {
    pub(crate) fn new(
        command: clap::Command,
        mode: ParseMode<'f>,
        user_interface: Box<dyn UserInterface>,
    ) -> Self {
        Self {
            command,
            mode,
            user_interface,
        }
    }

    #[cfg(test)]
    pub(crate) fn details(&self) -> (String, Option<String>) {
        (
            self.command.get_name().to_string(),
            self.command.get_about().map(|about| about.to_string()),
        )
    }

    /// Run the command line parser against the input tokens.
    ///
    /// The engine matches the tokens to the registered flags and coerces their values; the
    /// parsed values are then handed to the signature's handler.
    ///
    /// On a parse failure (un-matched flag, un-coercible token, missing required flag), the
    /// error is rendered through the engine's own channel and the result is `Err` with the
    /// engine's nonzero exit code.
    /// A help request (`-h`/`--help`) renders the help message and returns `Err(0)`.
    ///
    /// In multi-command mode, a missing or unrecognized command prints the usage without error.
    pub fn parse_tokens(self, tokens: &[&str]) -> Result<(), i32> {
        let GeneralParser {
            mut command,
            mode,
            user_interface,
        } = self;

        let argv: Vec<String> = std::iter::once(command.get_name().to_string())
            .chain(tokens.iter().map(|token| token.to_string()))
            .collect();

        let matches = match command.clone().try_get_matches_from(argv) {
            Ok(matches) => matches,
            Err(error) => {
                return match error.kind() {
                    ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                        user_interface.print(render(&error));
                        Err(0)
                    }
                    ErrorKind::InvalidSubcommand => {
                        user_interface.print(usage(&mut command));
                        Err(0)
                    }
                    _ => {
                        let exit_code = error.exit_code();
                        user_interface.print_error(render(&error));
                        Err(exit_code)
                    }
                };
            }
        };

        match mode {
            ParseMode::Single(unit) => finish(&mut command, unit, &matches, &*user_interface),
            ParseMode::Multi(table) => match matches.subcommand() {
                None => {
                    user_interface.print(usage(&mut command));
                    Ok(())
                }
                Some((chosen, sub_matches)) => {
                    let unit = table
                        .into_iter()
                        .find(|(name, _)| name == chosen)
                        .map(|(_, unit)| unit);

                    match (unit, command.find_subcommand_mut(chosen)) {
                        (Some(unit), Some(sub_command)) => {
                            finish(sub_command, unit, sub_matches, &*user_interface)
                        }
                        _ => unreachable!("internal error - sub-command must be registered"),
                    }
                }
            },
        }
    }

    /// Run the command line parser against the Cli [`env::args`].
    ///
    /// Identical to [`GeneralParser::parse_tokens`], except that any `Err` outcome exits the
    /// process with its code (via [`std::process::exit`]).
    pub fn parse(self) {
        let command_input: Vec<String> = env::args().skip(1).collect();
        match self.parse_tokens(
            command_input
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .as_slice(),
        ) {
            Ok(()) => {}
            Err(exit_code) => {
                std::process::exit(exit_code);
            }
        };
    }
}

fn finish(
    command: &mut clap::Command,
    unit: BindUnit<'_>,
    matches: &clap::ArgMatches,
    user_interface: &dyn UserInterface,
) -> Result<(), i32> {
    match extract(&unit.specs, matches) {
        Ok(values) => {
            if let Some(handler) = unit.handler {
                handler(values);
            }
            Ok(())
        }
        Err(message) => {
            let error = command.error(ErrorKind::MissingRequiredArgument, message);
            let exit_code = error.exit_code();
            user_interface.print_error(render(&error));
            Err(exit_code)
        }
    }
}

fn render(error: &clap::Error) -> String {
    error.render().to_string().trim_end().to_string()
}

fn usage(command: &mut clap::Command) -> String {
    command.render_usage().to_string().trim_end().to_string()
}
