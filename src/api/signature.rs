use crate::model::{ParsedArgs, Ty, Value};

pub(crate) type Handler<'f> = Box<dyn FnOnce(ParsedArgs) + 'f>;

/// One declared parameter of a [`Signature`]: a name, a type, and optionally a default.
///
/// ### Example
/// ```
/// use funcli::{Param, Ty, Value};
///
/// let param = Param::new("verbose", Ty::Bool).default(Value::Bool(true));
/// ```
pub struct Param {
    name: String,
    ty: Ty,
    default: Option<Value>,
}

impl Param {
    /// Declare a parameter `name` of type `ty`.
    /// Without a default, the parameter is required (booleans and optionals excepted).
    pub fn new(name: impl Into<String>, ty: Ty) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
        }
    }

    /// Declare the parameter's default value, making it non-required.
    /// If repeated, only the final default will apply.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default.replace(value.into());
        self
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn ty(&self) -> &Ty {
        &self.ty
    }

    pub(crate) fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// The declared shape of a target function: its name, documentation, ordered parameters, and
/// the handler to invoke with the parsed values.
///
/// This is the construction-time stand-in for signature reflection: the caller enumerates what
/// a dynamic language would introspect.
///
/// ### Example
/// ```
/// use funcli::{Param, Signature, Ty};
///
/// let signature = Signature::new("resize")
///     .doc("Resize an image.\n\n    width: target width in pixels")
///     .param(Param::new("width", Ty::Int))
///     .handler(|args| println!("width={:?}", args.get("width")));
/// assert_eq!(signature.description(), Some("Resize an image.".to_string()));
/// ```
pub struct Signature<'f> {
    name: String,
    doc: Option<String>,
    init_doc: Option<String>,
    params: Vec<Param>,
    handler: Option<Handler<'f>>,
}

impl<'f> Signature<'f> {
    /// Declare a signature for the function `name`.
    /// In multi-command mode, `name` becomes the sub-command name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            init_doc: None,
            params: Vec::default(),
            handler: None,
        }
    }

    /// Attach the function's documentation text (free-form, line oriented).
    ///
    /// The first non-blank line becomes the command description.
    /// A line beginning with a parameter name becomes that parameter's help text, with any
    /// leading `:`/`-`/`*`/whitespace stripped.
    pub fn doc(mut self, text: impl Into<String>) -> Self {
        self.doc.replace(text.into());
        self
    }

    /// Attach initializer documentation, for constructor-like targets.
    ///
    /// Initializer lines take precedence over [`Signature::doc`] lines for per-parameter help;
    /// the type documentation still supplies the description when the initializer has none.
    pub fn init_doc(mut self, text: impl Into<String>) -> Self {
        self.init_doc.replace(text.into());
        self
    }

    /// Append a parameter.
    /// Declaration order defines the flag listing order and short-flag precedence.
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Attach the handler invoked with the parsed values after a successful dispatch.
    pub fn handler(mut self, handler: impl FnOnce(ParsedArgs) + 'f) -> Self {
        self.handler.replace(Box::new(handler));
        self
    }

    /// The signature's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The one-line command description: the first non-blank documentation line.
    pub fn description(&self) -> Option<String> {
        self.doc_lines().into_iter().next()
    }

    pub(crate) fn params(&self) -> &[Param] {
        &self.params
    }

    pub(crate) fn consume(self) -> (String, Option<Handler<'f>>) {
        (self.name, self.handler)
    }

    // The non-blank documentation lines, initializer lines first.
    fn doc_lines(&self) -> Vec<String> {
        [self.init_doc.as_ref(), self.doc.as_ref()]
            .into_iter()
            .flatten()
            .flat_map(|text| text.lines())
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// The derived help text for one parameter.
    ///
    /// Best-effort text matching: the first documentation line beginning with the parameter
    /// name supplies the prose; a non-none default appends a `(default=..)` suffix.
    /// No matching line simply means no help text.
    pub(crate) fn param_help(&self, param: &Param) -> Option<String> {
        let prose = self
            .doc_lines()
            .iter()
            .map(|line| line.trim_matches(['-', '*', ' ']).to_string())
            .filter(|line| !line.is_empty())
            .find(|line| line.starts_with(param.name()))
            .map(|line| line[param.name().len()..].trim_matches([' ', ':']).to_string())
            .filter(|stripped| !stripped.is_empty());

        let default = match (param.ty(), param.default_value()) {
            (Ty::Bool, Some(Value::Bool(true))) => Some(format!(
                "(default=true, --no-{name} to disable)",
                name = param.name()
            )),
            (_, Some(Value::None)) | (_, None) => None,
            (_, Some(value)) => Some(format!("(default={value})")),
        };

        match (prose, default) {
            (Some(prose), Some(default)) => Some(format!("{prose} {default}")),
            (Some(prose), None) => Some(prose),
            (None, Some(default)) => Some(default),
            (None, None) => None,
        }
    }
}
