use crate::api::ArgSpec;
use crate::model::{Ty, Value};

/// Coerce a raw token by the declared type.
///
/// Failures are messages the engine reports against the offending flag; they never escape as
/// panics or caller-visible errors.
pub(crate) fn coerce(ty: &Ty, raw: &str) -> Result<Value, String> {
    match ty {
        Ty::Int => raw
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| invalid(ty, raw)),
        Ty::Float => raw
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| invalid(ty, raw)),
        Ty::Str => Ok(Value::Str(raw.to_string())),
        Ty::Bool => match raw.to_lowercase().as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(invalid(ty, raw)),
        },
        Ty::Enum { members, .. } => {
            // Members might be case sensitive; fall back to the upper-cased token.
            let upper = raw.to_uppercase();
            members
                .iter()
                .find(|member| *member == raw)
                .or_else(|| members.iter().find(|member| **member == upper))
                .map(|member| Value::Str(member.clone()))
                .ok_or_else(|| {
                    format!(
                        "invalid choice: '{raw}' (choose from {members})",
                        members = members.join(", ")
                    )
                })
        }
        Ty::List(inner) | Ty::Optional(inner) => coerce(inner, raw),
        Ty::Union(members) => members
            .iter()
            .find_map(|member| coerce(member, raw).ok())
            .ok_or_else(|| invalid(ty, raw)),
    }
}

fn invalid(ty: &Ty, raw: &str) -> String {
    format!("invalid {ty} value: '{raw}'")
}

/// The engine-facing coercion for one specification: the choices restriction first, then the
/// custom coercion when one was set, then the type's own resolver.
pub(crate) fn spec_coercion(
    spec: &ArgSpec,
) -> impl Fn(&str) -> Result<Value, String> + Clone + Send + Sync + 'static {
    let ty = spec.ty().clone();
    let custom = spec.coercion();
    let choices = spec.choices().map(<[String]>::to_vec);

    move |raw: &str| {
        if let Some(choices) = &choices {
            if !choices.iter().any(|choice| choice == raw) {
                let quoted: Vec<String> =
                    choices.iter().map(|choice| format!("'{choice}'")).collect();
                return Err(format!(
                    "invalid choice: '{raw}' (choose from {choices})",
                    choices = quoted.join(", ")
                ));
            }
        }

        match &custom {
            Some(coerce_fn) => coerce_fn(raw),
            None => coerce(&ty, raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", Value::Int(1))]
    #[case("-3", Value::Int(-3))]
    #[case("007", Value::Int(7))]
    fn coerce_int(#[case] raw: &str, #[case] expected: Value) {
        assert_eq!(coerce(&Ty::Int, raw), Ok(expected));
    }

    #[rstest]
    #[case(Ty::Int, "foo", "invalid int value: 'foo'")]
    #[case(Ty::Int, "3.1", "invalid int value: '3.1'")]
    #[case(Ty::Float, "foo", "invalid float value: 'foo'")]
    #[case(Ty::Bool, "yes", "invalid bool value: 'yes'")]
    fn coerce_invalid(#[case] ty: Ty, #[case] raw: &str, #[case] expected: &str) {
        assert_eq!(coerce(&ty, raw), Err(expected.to_string()));
    }

    #[rstest]
    #[case("3.1", Value::Float(3.1))]
    #[case("3", Value::Float(3.0))]
    fn coerce_float(#[case] raw: &str, #[case] expected: Value) {
        assert_eq!(coerce(&Ty::Float, raw), Ok(expected));
    }

    #[rstest]
    #[case("true", true)]
    #[case("True", true)]
    #[case("false", false)]
    fn coerce_bool(#[case] raw: &str, #[case] expected: bool) {
        assert_eq!(coerce(&Ty::Bool, raw), Ok(Value::Bool(expected)));
    }

    #[rstest]
    #[case("RED", "RED")]
    #[case("blue", "BLUE")]
    fn coerce_enum(#[case] raw: &str, #[case] expected: &str) {
        // Setup
        let color = Ty::enumeration("Color", ["RED", "GREEN", "BLUE"]);

        // Execute & verify
        assert_eq!(coerce(&color, raw), Ok(Value::Str(expected.to_string())));
    }

    #[test]
    fn coerce_enum_case_sensitive_first() {
        // Setup
        let casing = Ty::enumeration("Casing", ["red", "RED"]);

        // Execute & verify
        assert_eq!(coerce(&casing, "red"), Ok(Value::Str("red".to_string())));
        assert_eq!(coerce(&casing, "RED"), Ok(Value::Str("RED".to_string())));
    }

    #[test]
    fn coerce_enum_invalid_choice() {
        // Setup
        let color = Ty::enumeration("Color", ["RED", "GREEN", "BLUE"]);

        // Execute & verify
        assert_eq!(
            coerce(&color, "xx"),
            Err("invalid choice: 'xx' (choose from RED, GREEN, BLUE)".to_string())
        );
    }

    #[rstest]
    #[case("3", Value::Int(3))]
    #[case("3.1", Value::Float(3.1))]
    fn coerce_union_first_match_wins(#[case] raw: &str, #[case] expected: Value) {
        // Setup
        let union = Ty::union([Ty::Int, Ty::Float]);

        // Execute & verify
        assert_eq!(coerce(&union, raw), Ok(expected));
    }

    #[test]
    fn coerce_union_order_matters() {
        // str accepts anything, so earlier-listed str shadows int.
        let union = Ty::union([Ty::Str, Ty::Int]);
        assert_eq!(coerce(&union, "3"), Ok(Value::Str("3".to_string())));
    }

    #[test]
    fn coerce_union_enum_member() {
        // Setup
        let union = Ty::union([
            Ty::Int,
            Ty::enumeration("Color", ["RED", "GREEN", "BLUE"]),
            Ty::Str,
        ]);

        // Execute & verify
        assert_eq!(coerce(&union, "3"), Ok(Value::Int(3)));
        assert_eq!(coerce(&union, "red"), Ok(Value::Str("RED".to_string())));
        assert_eq!(coerce(&union, "foo"), Ok(Value::Str("foo".to_string())));
    }

    #[test]
    fn coerce_union_no_match() {
        // Setup
        let union = Ty::union([Ty::Int, Ty::Float]);

        // Execute & verify
        assert_eq!(
            coerce(&union, "foo"),
            Err("invalid int | float value: 'foo'".to_string())
        );
    }

    #[rstest]
    #[case(Ty::list(Ty::Int))]
    #[case(Ty::optional(Ty::Int))]
    fn coerce_through_element_type(#[case] ty: Ty) {
        assert_eq!(coerce(&ty, "1"), Ok(Value::Int(1)));
        assert_eq!(coerce(&ty, "foo"), Err("invalid int value: 'foo'".to_string()));
    }
}
