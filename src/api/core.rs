use crate::api::signature::{Handler, Signature};
use crate::api::spec::{derive_specs, ArgOverride, ArgSpec};
use crate::parser::{
    spec_coercion, BindUnit, ConfigError, ConsoleInterface, GeneralParser, ParseMode,
    UserInterface,
};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// The single-command parser builder: one [`Signature`], one parser.
///
/// Derives one argument specification per parameter in declaration order, then lowers the
/// specifications onto the parsing engine at build time.
///
/// ### Example
/// ```
/// use funcli::{FunctionParser, Param, Signature, Ty, Value};
///
/// let mut copies: Option<Value> = None;
/// let parser = FunctionParser::new(
///     Signature::new("replicate")
///         .doc("Replicate a dataset.\n\n    copies: how many copies to keep")
///         .param(Param::new("copies", Ty::Int).default(Value::Int(2)))
///         .handler(|args| copies = args.get("copies").cloned()),
/// )
/// .build_parser()
/// .unwrap();
///
/// parser.parse_tokens(&["--copies", "5"]).unwrap();
/// assert_eq!(copies, Some(Value::Int(5)));
/// ```
pub struct FunctionParser<'f> {
    program: String,
    about: Option<String>,
    specs: Vec<ArgSpec>,
    handler: Option<Handler<'f>>,
    deferred_error: Option<ConfigError>,
}

impl<'f> FunctionParser<'f> {
    /// Derive a parser builder from the given signature.
    ///
    /// The signature's name becomes the program name, its description the about message, and
    /// each parameter one flag.
    /// Derivation errors (ex: a duplicated parameter name) are deferred until
    /// [`FunctionParser::build_parser`].
    pub fn new(signature: Signature<'f>) -> Self {
        let about = signature.description();
        let (specs, deferred_error) = match derive_specs(&signature) {
            Ok(specs) => (specs, None),
            Err(error) => (Vec::default(), Some(error)),
        };
        let (program, handler) = signature.consume();

        Self {
            program,
            about,
            specs,
            handler,
            deferred_error,
        }
    }

    /// Refine one derived argument specification.
    /// See [`ArgOverride`].
    pub fn override_arg(mut self, argument: ArgOverride) -> Self {
        if self.deferred_error.is_none() {
            if let Err(error) = argument.apply(&mut self.specs) {
                self.deferred_error.replace(error);
            }
        }
        self
    }

    /// The derived argument specifications, in parameter declaration order.
    pub fn args(&self) -> &[ArgSpec] {
        &self.specs
    }

    pub(crate) fn build_with_interface(
        self,
        user_interface: Box<dyn UserInterface>,
    ) -> Result<GeneralParser<'f>, ConfigError> {
        if let Some(error) = self.deferred_error {
            return Err(error);
        }

        #[cfg(feature = "tracing_debug")]
        {
            debug!(
                "Binding {count} argument specifications onto '{program}'.",
                count = self.specs.len(),
                program = self.program
            );
        }

        let command = lower(&self.program, self.about.as_deref(), &self.specs);
        Ok(GeneralParser::new(
            command,
            ParseMode::Single(BindUnit::new(self.specs, self.handler)),
            user_interface,
        ))
    }

    /// Build the command line parser as a Result.
    /// This finalizes the configuration and checks for errors (ex: a duplicated parameter name).
    pub fn build_parser(self) -> Result<GeneralParser<'f>, ConfigError> {
        self.build_with_interface(Box::new(ConsoleInterface::default()))
    }

    /// Build the command line parser.
    /// If a configuration error is encountered, exits with error code `1` (via
    /// [`std::process::exit`]).
    pub fn build(self) -> GeneralParser<'f> {
        match self.build_parser() {
            Ok(parser) => parser,
            Err(error) => {
                eprintln!("{error}");
                std::process::exit(1);
            }
        }
    }
}

struct CommandEntry<'f> {
    name: String,
    about: Option<String>,
    specs: Vec<ArgSpec>,
    handler: Option<Handler<'f>>,
}

/// The multi-command parser builder: one sub-command per [`Signature`].
///
/// Each added signature becomes a sub-command named after it, populated exactly as in
/// [`FunctionParser`], with the one-line description as its listing help.
/// Insertion order defines the sub-command listing order.
///
/// ### Example
/// ```
/// use funcli::{MultiFunctionParser, Param, Signature, Ty, Value};
///
/// let parser = MultiFunctionParser::new("tool")
///     .description("My program that does awesome stuff.")
///     .add(
///         Signature::new("pack")
///             .doc("Pack the archive.")
///             .param(Param::new("level", Ty::Int).default(Value::Int(6)))
///             .handler(|args| println!("level={:?}", args.get("level"))),
///     )
///     .build_parser()
///     .unwrap();
///
/// // No command prints the usage and returns without error.
/// parser.parse_tokens(&[]).unwrap();
/// ```
pub struct MultiFunctionParser<'f> {
    program: String,
    description: Option<String>,
    commands: Vec<CommandEntry<'f>>,
    deferred_error: Option<ConfigError>,
}

impl<'f> MultiFunctionParser<'f> {
    /// Create a multi-command parser builder for `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            description: None,
            commands: Vec::default(),
            deferred_error: None,
        }
    }

    /// Document the about message for the root parser.
    /// If repeated, only the final message will apply.
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description.replace(text.into());
        self
    }

    /// Add one sub-command derived from `signature`.
    /// The signature's name must be unique amongst the added commands.
    pub fn add(mut self, signature: Signature<'f>) -> Self {
        if self.deferred_error.is_some() {
            return self;
        }

        if self
            .commands
            .iter()
            .any(|command| command.name == signature.name())
        {
            self.deferred_error.replace(ConfigError(format!(
                "Cannot duplicate the command '{}'.",
                signature.name()
            )));
            return self;
        }

        let about = signature.description();
        match derive_specs(&signature) {
            Ok(specs) => {
                let (name, handler) = signature.consume();
                self.commands.push(CommandEntry {
                    name,
                    about,
                    specs,
                    handler,
                });
            }
            Err(error) => {
                self.deferred_error.replace(error);
            }
        }
        self
    }

    /// Refine one derived argument specification within the named command.
    /// See [`ArgOverride`].
    pub fn override_arg(mut self, command: &str, argument: ArgOverride) -> Self {
        if self.deferred_error.is_none() {
            match self.commands.iter_mut().find(|entry| entry.name == command) {
                Some(entry) => {
                    if let Err(error) = argument.apply(&mut entry.specs) {
                        self.deferred_error.replace(error);
                    }
                }
                None => {
                    self.deferred_error.replace(ConfigError(format!(
                        "Cannot override within the unknown command '{command}'."
                    )));
                }
            }
        }
        self
    }

    pub(crate) fn build_with_interface(
        self,
        user_interface: Box<dyn UserInterface>,
    ) -> Result<GeneralParser<'f>, ConfigError> {
        if let Some(error) = self.deferred_error {
            return Err(error);
        }

        #[cfg(feature = "tracing_debug")]
        {
            debug!(
                "Binding {count} sub-commands onto '{program}'.",
                count = self.commands.len(),
                program = self.program
            );
        }

        let mut root = clap::Command::new(self.program).disable_help_subcommand(true);
        if let Some(description) = self.description {
            root = root.about(description);
        }

        let mut table = Vec::default();
        for entry in self.commands {
            root = root.subcommand(lower(&entry.name, entry.about.as_deref(), &entry.specs));
            table.push((entry.name, BindUnit::new(entry.specs, entry.handler)));
        }

        Ok(GeneralParser::new(
            root,
            ParseMode::Multi(table),
            user_interface,
        ))
    }

    /// Build the multi-command parser as a Result.
    /// This finalizes the configuration and checks for errors (ex: a duplicated command name).
    pub fn build_parser(self) -> Result<GeneralParser<'f>, ConfigError> {
        self.build_with_interface(Box::new(ConsoleInterface::default()))
    }

    /// Build the multi-command parser.
    /// If a configuration error is encountered, exits with error code `1` (via
    /// [`std::process::exit`]).
    pub fn build(self) -> GeneralParser<'f> {
        match self.build_parser() {
            Ok(parser) => parser,
            Err(error) => {
                eprintln!("{error}");
                std::process::exit(1);
            }
        }
    }
}

/// Register the specifications with the engine; the final step after derivation and overrides.
fn lower(program: &str, about: Option<&str>, specs: &[ArgSpec]) -> clap::Command {
    let mut command = clap::Command::new(program.to_string());
    if let Some(about) = about {
        command = command.about(about.to_string());
    }

    for spec in specs {
        if spec.negatable() {
            // Two mutually overriding switches writing the same destination; the disabling
            // switch is hidden from help.
            let no_long = format!("no-{}", spec.long());
            let mut enable = clap::Arg::new(spec.long().to_string())
                .long(spec.long().to_string())
                .action(clap::ArgAction::SetTrue)
                .overrides_with(no_long.clone());
            if let Some(short) = spec.short() {
                enable = enable.short(short);
            }
            if let Some(help) = spec.help() {
                enable = enable.help(help.to_string());
            }
            let disable = clap::Arg::new(no_long.clone())
                .long(no_long)
                .action(clap::ArgAction::SetTrue)
                .hide(true)
                .overrides_with(spec.long().to_string());
            command = command.arg(enable).arg(disable);
        } else {
            let action = if spec.repeated() {
                clap::ArgAction::Append
            } else {
                clap::ArgAction::Set
            };
            let mut argument = clap::Arg::new(spec.long().to_string())
                .long(spec.long().to_string())
                .value_name(spec.long().to_uppercase())
                .action(action)
                .allow_negative_numbers(true)
                .value_parser(clap::builder::ValueParser::new(spec_coercion(spec)));
            if let Some(short) = spec.short() {
                argument = argument.short(short);
            }
            if let Some(help) = spec.help() {
                argument = argument.help(help.to_string());
            }
            command = command.arg(argument);
        }
    }

    command
}
