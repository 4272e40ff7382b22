use thiserror::Error;

use crate::api::ArgSpec;
use crate::model::{ParsedArgs, Value};

/// An error in the parser configuration itself (ex: a duplicated parameter name, an override
/// against an unknown argument).
/// Signals a programming error in the declared signature, not a runtime condition.
#[derive(Debug, Error)]
#[error("Config error: {0}")]
pub struct ConfigError(pub(crate) String);

/// Collect the parsed values for the given specifications out of the engine's match set.
///
/// Defaults and required-ness are enforced here, after engine matching, so overrides can flip
/// them without re-registration.
/// `Err` carries the missing-required message to render through the engine's error channel.
pub(crate) fn extract(
    specs: &[ArgSpec],
    matches: &clap::ArgMatches,
) -> Result<ParsedArgs, String> {
    let mut values = ParsedArgs::default();
    let mut missing: Vec<String> = Vec::default();

    for spec in specs {
        if spec.negatable() {
            let disabled = matches.get_flag(&format!("no-{}", spec.long()));
            let enabled = matches.get_flag(spec.long());
            let value = if disabled {
                false
            } else if enabled {
                true
            } else {
                matches!(spec.default_value(), Some(Value::Bool(true)))
            };
            values.insert(spec.long(), Value::Bool(value));
        } else if spec.repeated() {
            match matches.get_many::<Value>(spec.long()) {
                Some(items) => values.insert(spec.long(), Value::List(items.cloned().collect())),
                None => match spec.default_value() {
                    Some(default) => values.insert(spec.long(), default.clone()),
                    None if spec.required() => missing.push(spec.flag_label()),
                    None => values.insert(spec.long(), Value::List(Vec::default())),
                },
            }
        } else {
            match matches.get_one::<Value>(spec.long()) {
                Some(value) => values.insert(spec.long(), value.clone()),
                None => match spec.default_value() {
                    Some(default) => values.insert(spec.long(), default.clone()),
                    None if spec.required() => missing.push(spec.flag_label()),
                    None => values.insert(spec.long(), Value::None),
                },
            }
        }
    }

    if missing.is_empty() {
        Ok(values)
    } else {
        Err(format!(
            "the following arguments are required: {}",
            missing.join(", ")
        ))
    }
}
