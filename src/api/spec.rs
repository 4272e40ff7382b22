use std::collections::HashSet;
use std::sync::Arc;

use crate::api::signature::{Param, Signature};
use crate::model::{Ty, Value};
use crate::parser::ConfigError;

/// A coercion function: converts a raw command line token into a typed value, or fails with a
/// message the parsing engine reports against the offending flag.
pub type CoerceFn = Arc<dyn Fn(&str) -> Result<Value, String> + Send + Sync>;

// The short flag claimed by the engine's help switch.
const HELP_SHORT: char = 'h';

/// The fully resolved configuration for one command line flag, derived from a [`Param`] and
/// registered with the parsing engine as the final build step.
///
/// Specifications are inspectable between derivation and build, and may be refined via
/// [`ArgOverride`].
pub struct ArgSpec {
    long: String,
    short: Option<char>,
    ty: Ty,
    coerce: Option<CoerceFn>,
    default: Option<Value>,
    required: bool,
    help: Option<String>,
    repeated: bool,
    negatable: bool,
    choices: Option<Vec<String>>,
}

impl ArgSpec {
    /// The long flag name (without the `--` prefix).
    pub fn long(&self) -> &str {
        &self.long
    }

    /// The short flag character, when one was assigned.
    pub fn short(&self) -> Option<char> {
        self.short
    }

    /// The declared type.
    pub fn ty(&self) -> &Ty {
        &self.ty
    }

    /// The default value substituted when the flag is absent.
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Whether the flag must appear.
    pub fn required(&self) -> bool {
        self.required
    }

    /// The derived help text.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Whether each flag occurrence appends one element.
    pub fn repeated(&self) -> bool {
        self.repeated
    }

    /// Whether the flag is a boolean switch with a hidden `--no-` counterpart.
    pub fn negatable(&self) -> bool {
        self.negatable
    }

    /// The allowed-choices restriction, when one was set via [`ArgOverride::choices`].
    pub fn choices(&self) -> Option<&[String]> {
        self.choices.as_deref()
    }

    /// Both flag forms, rendered the way the engine identifies the argument (ex: `-x/--xx`).
    pub fn flag_label(&self) -> String {
        match self.short {
            Some(short) => format!("-{short}/--{long}", long = self.long),
            None => format!("--{long}", long = self.long),
        }
    }

    pub(crate) fn coercion(&self) -> Option<CoerceFn> {
        self.coerce.clone()
    }
}

impl std::fmt::Debug for ArgSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArgSpec")
            .field("long", &self.long)
            .field("short", &self.short)
            .field("ty", &self.ty)
            .field("coerce", &self.coerce.is_some())
            .field("default", &self.default)
            .field("required", &self.required)
            .field("help", &self.help)
            .field("repeated", &self.repeated)
            .field("negatable", &self.negatable)
            .field("choices", &self.choices)
            .finish()
    }
}

/// Derive one specification per parameter, in declaration order.
pub(crate) fn derive_specs(signature: &Signature) -> Result<Vec<ArgSpec>, ConfigError> {
    let shorts = assign_short_flags(signature.params());
    let mut names: HashSet<String> = HashSet::default();
    let mut specs = Vec::default();

    for (param, short) in signature.params().iter().zip(shorts) {
        if !names.insert(param.name().to_string()) {
            return Err(ConfigError(format!(
                "Cannot duplicate the parameter '{}'.",
                param.name()
            )));
        }

        let declared = param.default_value().cloned();
        let (default, required, repeated, negatable) = match param.ty() {
            Ty::Bool => (declared.or(Some(Value::Bool(false))), false, false, true),
            Ty::Optional(_) => (declared.or(Some(Value::None)), false, false, false),
            Ty::List(_) => {
                let required = declared.is_none();
                (declared, required, true, false)
            }
            _ => {
                let required = declared.is_none();
                (declared, required, false, false)
            }
        };

        specs.push(ArgSpec {
            long: param.name().to_string(),
            short,
            ty: param.ty().clone(),
            coerce: None,
            default,
            required,
            help: signature.param_help(param),
            repeated,
            negatable,
            choices: None,
        });
    }

    Ok(specs)
}

/// Assign short flags in declaration order.
///
/// A parameter claims `-<first char>` only while that character is unclaimed; single-character
/// names pre-claim their own character, and the help switch's character is never granted.
fn assign_short_flags(params: &[Param]) -> Vec<Option<char>> {
    let mut claimed: HashSet<char> = params
        .iter()
        .filter(|param| param.name().chars().count() == 1)
        .filter_map(|param| param.name().chars().next())
        .collect();
    claimed.insert(HELP_SHORT);

    params
        .iter()
        .map(|param| {
            let first = param.name().chars().next()?;
            if first == HELP_SHORT {
                None
            } else if param.name().chars().count() == 1 {
                Some(first)
            } else if claimed.insert(first) {
                Some(first)
            } else {
                None
            }
        })
        .collect()
}

/// A post-hoc refinement of an already-derived [`ArgSpec`], identified by its long flag name.
///
/// The escape hatch for what signature derivation cannot express (ex: restricting a free-form
/// string to a fixed choice set).
/// Applied before the engine registration, which happens lazily at build time.
///
/// ### Example
/// ```
/// use funcli::{ArgOverride, FunctionParser, Param, Signature, Ty, Value};
///
/// let parser = FunctionParser::new(
///     Signature::new("greet").param(Param::new("name", Ty::Str)),
/// )
/// .override_arg(ArgOverride::new("name").choices(["alice", "bob"]))
/// .build_parser()
/// .unwrap();
/// parser.parse_tokens(&["--name", "alice"]).unwrap();
/// ```
pub struct ArgOverride {
    long: String,
    short: Option<char>,
    default: Option<Value>,
    coerce: Option<CoerceFn>,
    choices: Option<Vec<String>>,
    required: Option<bool>,
    help: Option<String>,
}

impl ArgOverride {
    /// Target the specification whose long flag is `--<long>`.
    pub fn new(long: impl Into<String>) -> Self {
        Self {
            long: long.into(),
            short: None,
            default: None,
            coerce: None,
            choices: None,
            required: None,
            help: None,
        }
    }

    /// Change the short flag.
    pub fn short(mut self, short: char) -> Self {
        self.short.replace(short);
        self
    }

    /// Change the default value; this also makes the argument non-required.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default.replace(value.into());
        self
    }

    /// Replace the derived coercion with a custom function.
    pub fn coerce(
        mut self,
        coerce: impl Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        self.coerce.replace(Arc::new(coerce));
        self
    }

    /// Restrict the accepted tokens to a fixed choice set.
    pub fn choices(mut self, choices: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.choices
            .replace(choices.into_iter().map(Into::into).collect());
        self
    }

    /// Change the required-ness.
    ///
    /// Making an argument required clears its stored default; making it optional needs a usable
    /// default to fall back on (either pre-existing or set by this override).
    pub fn required(mut self, required: bool) -> Self {
        self.required.replace(required);
        self
    }

    /// Change the help text.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help.replace(help.into());
        self
    }

    pub(crate) fn apply(self, specs: &mut [ArgSpec]) -> Result<(), ConfigError> {
        let mut matched: Vec<&mut ArgSpec> = specs
            .iter_mut()
            .filter(|spec| spec.long == self.long)
            .collect();

        let spec = match matched.len() {
            0 => {
                return Err(ConfigError(format!(
                    "Cannot override the unknown argument '--{}'.",
                    self.long
                )))
            }
            1 => matched.remove(0),
            _ => {
                return Err(ConfigError(format!(
                    "Cannot override the ambiguous argument '--{}'.",
                    self.long
                )))
            }
        };

        if let Some(short) = self.short {
            spec.short.replace(short);
        }

        if let Some(default) = self.default {
            spec.default.replace(default);
            spec.required = false;
        }

        if let Some(coerce) = self.coerce {
            spec.coerce.replace(coerce);
        }

        if let Some(choices) = self.choices {
            spec.choices.replace(choices);
        }

        match self.required {
            Some(true) => {
                spec.required = true;
                spec.default.take();
            }
            Some(false) => {
                if spec.default.is_none() {
                    return Err(ConfigError(format!(
                        "Cannot make the argument '--{}' optional without a default value.",
                        self.long
                    )));
                }
                spec.required = false;
            }
            None => {}
        }

        if let Some(help) = self.help {
            spec.help.replace(help);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn derive(signature: &Signature) -> Vec<ArgSpec> {
        derive_specs(signature).unwrap()
    }

    #[rstest]
    #[case(vec!["xx", "yy"], vec![Some('x'), Some('y')])]
    #[case(vec!["xx", "xxx"], vec![Some('x'), None])]
    #[case(vec!["xx", "x"], vec![None, Some('x')])]
    #[case(vec!["x", "xx"], vec![Some('x'), None])]
    #[case(vec!["host", "port"], vec![None, Some('p')])]
    #[case(vec!["h"], vec![None])]
    fn short_flag_assignment(#[case] names: Vec<&str>, #[case] expected: Vec<Option<char>>) {
        // Setup
        let mut signature = Signature::new("f");
        for name in names {
            signature = signature.param(Param::new(name, Ty::Int));
        }

        // Execute
        let specs = derive(&signature);

        // Verify
        let shorts: Vec<Option<char>> = specs.iter().map(ArgSpec::short).collect();
        assert_eq!(shorts, expected);
    }

    #[test]
    fn derive_plain_required() {
        // Setup
        let signature = Signature::new("f")
            .param(Param::new("xx", Ty::Int))
            .param(Param::new("yy", Ty::Int).default(Value::Int(1)));

        // Execute
        let specs = derive(&signature);

        // Verify
        assert!(specs[0].required());
        assert_eq!(specs[0].default_value(), None);
        assert_eq!(specs[0].flag_label(), "-x/--xx");
        assert!(!specs[1].required());
        assert_eq!(specs[1].default_value(), Some(&Value::Int(1)));
    }

    #[test]
    fn derive_bool() {
        // Setup
        let signature = Signature::new("f")
            .param(Param::new("xx", Ty::Bool))
            .param(Param::new("yy", Ty::Bool).default(Value::Bool(true)));

        // Execute
        let specs = derive(&signature);

        // Verify
        assert!(specs[0].negatable());
        assert!(!specs[0].required());
        assert_eq!(specs[0].default_value(), Some(&Value::Bool(false)));
        assert_eq!(specs[1].default_value(), Some(&Value::Bool(true)));
    }

    #[test]
    fn derive_optional() {
        // Setup
        let signature = Signature::new("f").param(Param::new("xx", Ty::optional(Ty::Str)));

        // Execute
        let specs = derive(&signature);

        // Verify
        assert!(!specs[0].required());
        assert_eq!(specs[0].default_value(), Some(&Value::None));
    }

    #[test]
    fn derive_list() {
        // Setup
        let signature = Signature::new("f")
            .param(Param::new("xx", Ty::list(Ty::Int)))
            .param(Param::new("yy", Ty::list(Ty::Int)).default(Value::List(Vec::default())));

        // Execute
        let specs = derive(&signature);

        // Verify
        assert!(specs[0].repeated());
        assert!(specs[0].required());
        assert!(!specs[1].required());
        assert_eq!(specs[1].default_value(), Some(&Value::List(Vec::default())));
    }

    #[test]
    fn derive_duplicate_parameter() {
        // Setup
        let signature = Signature::new("f")
            .param(Param::new("xx", Ty::Int))
            .param(Param::new("xx", Ty::Str));

        // Execute
        let error = derive_specs(&signature).unwrap_err();

        // Verify
        assert_matches!(error, ConfigError(message) => {
            assert_eq!(message, "Cannot duplicate the parameter 'xx'.".to_string());
        });
    }

    #[test]
    fn override_unknown() {
        // Setup
        let signature = Signature::new("f").param(Param::new("xx", Ty::Int));
        let mut specs = derive(&signature);

        // Execute
        let error = ArgOverride::new("yy").apply(&mut specs).unwrap_err();

        // Verify
        assert_matches!(error, ConfigError(message) => {
            assert_eq!(message, "Cannot override the unknown argument '--yy'.".to_string());
        });
    }

    #[test]
    fn override_default_clears_required() {
        // Setup
        let signature = Signature::new("f").param(Param::new("xx", Ty::Int));
        let mut specs = derive(&signature);
        assert!(specs[0].required());

        // Execute
        ArgOverride::new("xx")
            .default(Value::Int(2))
            .apply(&mut specs)
            .unwrap();

        // Verify
        assert!(!specs[0].required());
        assert_eq!(specs[0].default_value(), Some(&Value::Int(2)));
    }

    #[test]
    fn override_required_clears_default() {
        // Setup
        let signature =
            Signature::new("f").param(Param::new("yy", Ty::Int).default(Value::Int(1)));
        let mut specs = derive(&signature);

        // Execute
        ArgOverride::new("yy")
            .required(true)
            .apply(&mut specs)
            .unwrap();

        // Verify
        assert!(specs[0].required());
        assert_eq!(specs[0].default_value(), None);
    }

    #[test]
    fn override_optional_needs_default() {
        // Setup
        let signature = Signature::new("f").param(Param::new("xx", Ty::Int));
        let mut specs = derive(&signature);

        // Execute
        let error = ArgOverride::new("xx")
            .required(false)
            .apply(&mut specs)
            .unwrap_err();

        // Verify
        assert_matches!(error, ConfigError(message) => {
            assert_eq!(
                message,
                "Cannot make the argument '--xx' optional without a default value.".to_string()
            );
        });
    }

    #[test]
    fn override_optional_with_default() {
        // Setup
        let signature = Signature::new("f").param(Param::new("xx", Ty::Int));
        let mut specs = derive(&signature);

        // Execute
        ArgOverride::new("xx")
            .required(false)
            .default(Value::Int(0))
            .apply(&mut specs)
            .unwrap();

        // Verify
        assert!(!specs[0].required());
        assert_eq!(specs[0].default_value(), Some(&Value::Int(0)));
    }

    #[test]
    fn override_short_and_help() {
        // Setup
        let signature = Signature::new("f").param(Param::new("xx", Ty::Int));
        let mut specs = derive(&signature);

        // Execute
        ArgOverride::new("xx")
            .short('z')
            .help("custom help")
            .apply(&mut specs)
            .unwrap();

        // Verify
        assert_eq!(specs[0].short(), Some('z'));
        assert_eq!(specs[0].flag_label(), "-z/--xx");
        assert_eq!(specs[0].help(), Some("custom help"));
    }

    #[test]
    fn override_coerce_and_choices() {
        // Setup
        let signature = Signature::new("f").param(Param::new("xx", Ty::Str));
        let mut specs = derive(&signature);

        // Execute
        ArgOverride::new("xx")
            .coerce(|raw| Ok(Value::Str(raw.to_uppercase())))
            .choices(["foo", "bar"])
            .apply(&mut specs)
            .unwrap();

        // Verify
        assert_eq!(
            specs[0].choices(),
            Some(vec!["foo".to_string(), "bar".to_string()].as_slice())
        );
        let coerce = specs[0].coercion().unwrap();
        assert_eq!(coerce("foo"), Ok(Value::Str("FOO".to_string())));
    }
}
