/// The closed set of types a signature parameter may declare.
///
/// Every `Ty` resolves to a coercion from a raw command line token into a [`Value`].
/// Composite tags (`List`, `Optional`, `Union`) resolve through their element types.
///
/// ### Example
/// ```
/// use funcli::Ty;
///
/// let ty = Ty::union([Ty::Int, Ty::Float]);
/// assert_eq!(ty.to_string(), "int | float");
/// ```
#[derive(Clone, PartialEq)]
pub enum Ty {
    /// A signed integer, parsed as `i64`.
    Int,
    /// A floating point number, parsed as `f64`.
    Float,
    /// A free-form string; accepts any token.
    Str,
    /// A boolean switch.
    /// Declared directly on a parameter, this produces an enabling `--name` flag and a hidden
    /// disabling `--no-name` flag (the later occurrence wins).
    Bool,
    /// An enumeration with a fixed member list.
    /// Tokens are matched against the member names, first case-sensitively and then upper-cased.
    Enum {
        /// The enumeration's readable name, used in help and error text.
        name: String,
        /// The member names, in declaration order.
        members: Vec<String>,
    },
    /// A repeatable parameter; each flag occurrence appends one element.
    List(Box<Ty>),
    /// A parameter which may be absent; defaults to [`Value::None`] when no default is declared.
    Optional(Box<Ty>),
    /// An ordered alternative; each member type is tried in declaration order and the first
    /// success wins.
    Union(Vec<Ty>),
}

impl Ty {
    /// Declare an enumeration type from its name and member names (in declaration order).
    ///
    /// ### Example
    /// ```
    /// use funcli::Ty;
    ///
    /// let color = Ty::enumeration("Color", ["RED", "GREEN", "BLUE"]);
    /// assert_eq!(color.to_string(), "Color");
    /// ```
    pub fn enumeration(
        name: impl Into<String>,
        members: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Ty::Enum {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    /// Declare a repeatable parameter of element type `ty`.
    pub fn list(ty: Ty) -> Self {
        Ty::List(Box::new(ty))
    }

    /// Declare a parameter which may be absent.
    pub fn optional(ty: Ty) -> Self {
        Ty::Optional(Box::new(ty))
    }

    /// Declare an ordered alternative over the given member types.
    pub fn union(members: impl IntoIterator<Item = Ty>) -> Self {
        Ty::Union(members.into_iter().collect())
    }
}

impl std::fmt::Display for Ty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ty::Int => write!(f, "int"),
            Ty::Float => write!(f, "float"),
            Ty::Str => write!(f, "str"),
            Ty::Bool => write!(f, "bool"),
            Ty::Enum { name, .. } => write!(f, "{name}"),
            Ty::List(inner) => write!(f, "list[{inner}]"),
            Ty::Optional(inner) => write!(f, "option[{inner}]"),
            Ty::Union(members) => {
                let pretty: Vec<String> = members.iter().map(|m| m.to_string()).collect();
                write!(f, "{}", pretty.join(" | "))
            }
        }
    }
}

impl std::fmt::Debug for Ty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

/// A parsed command line value.
///
/// Coercion of a token always lands in one of these variants; which variant depends on the
/// parameter's declared [`Ty`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string; also carries enumeration members (by their canonical name).
    Str(String),
    /// A boolean.
    Bool(bool),
    /// An ordered sequence of elements, one per flag occurrence.
    List(Vec<Value>),
    /// The absent value of an optional parameter.
    None,
}

impl Value {
    /// The integer payload, when this is a [`Value::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// The float payload, when this is a [`Value::Float`].
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// The string payload, when this is a [`Value::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// The boolean payload, when this is a [`Value::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// The element sequence, when this is a [`Value::List`].
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(values) => Some(values.as_slice()),
            _ => None,
        }
    }

    /// Whether this is the absent value.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{value}"),
            Value::Str(value) => write!(f, "{value}"),
            Value::Bool(value) => write!(f, "{value}"),
            Value::List(values) => {
                let pretty: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", pretty.join(", "))
            }
            Value::None => write!(f, "none"),
        }
    }
}

/// The values produced by a successful parse, keyed by parameter name.
///
/// Entries follow the parameter declaration order.
/// This is the keyword-argument payload handed to a signature's handler.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedArgs {
    values: Vec<(String, Value)>,
}

impl ParsedArgs {
    pub(crate) fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.values.push((name.into(), value));
    }

    /// The value parsed for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// The number of parsed values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no values were parsed.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate the values in parameter declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }
}

impl IntoIterator for ParsedArgs {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}
