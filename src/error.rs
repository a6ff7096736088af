use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// A structural anomaly found while assembling the syntax tree.
///
/// None of these are fatal: the parser records the diagnostic, drops the
/// offending token, and keeps building a best-effort tree.
#[derive(Error, Debug, Diagnostic, Clone)]
#[error("Parse warning")]
pub enum ParseDiagnostic {
    #[error("Unexpected dashes inside an argument")]
    #[diagnostic(
        code(parser::unexpected_dashes),
        help("A new dash run started before the previous argument was finished; it was dropped.")
    )]
    UnexpectedDashes {
        #[source_code]
        src: NamedSource<String>,
        #[label("these dashes were dropped")]
        span: SourceSpan,
    },

    #[error("Unexpected whitespace or equals sign in argument")]
    #[diagnostic(
        code(parser::unexpected_separator),
        help("A separator is only meaningful after a long flag name.")
    )]
    UnexpectedSeparator {
        #[source_code]
        src: NamedSource<String>,
        #[label("this separator was dropped")]
        span: SourceSpan,
    },

    #[error("Unexpected text node between arguments")]
    #[diagnostic(
        code(parser::unexpected_text),
        help("Text outside of a dash-opened argument cannot be bound to anything.")
    )]
    UnexpectedText {
        #[source_code]
        src: NamedSource<String>,
        #[label("this text was dropped")]
        span: SourceSpan,
    },

    #[error("Text could not be bound to the current argument")]
    #[diagnostic(
        code(parser::unbindable_text),
        help("The current argument already has both a flag and a value.")
    )]
    UnbindableText {
        #[source_code]
        src: NamedSource<String>,
        #[label("this text was dropped")]
        span: SourceSpan,
    },

    #[error("Input ended in the middle of an argument")]
    #[diagnostic(
        code(parser::forced_closure),
        help("The argument was closed without a value; a dangling separator was dropped.")
    )]
    ForcedClosure {
        #[source_code]
        src: NamedSource<String>,
        #[label("argument was still open here")]
        span: SourceSpan,
    },
}

/// A semantic anomaly found while resolving arguments against the schema.
///
/// The offending argument is skipped; binding continues with the rest.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
#[error("Bind warning")]
pub enum BindDiagnostic {
    #[error("Unknown argument: {name}")]
    #[diagnostic(
        code(binder::unknown_argument),
        help("No schema entry matches this name with this dash arity.")
    )]
    UnknownArgument { name: String },

    #[error("Missing value for argument: {name}")]
    #[diagnostic(
        code(binder::missing_value),
        help("String and number options require an attached or following value.")
    )]
    MissingValue { name: String },

    #[error("Invalid value {value:?} for argument: {name}")]
    #[diagnostic(
        code(binder::invalid_value),
        help("The value failed to decode or did not pass the option's validator.")
    )]
    InvalidValue { name: String, value: String },
}

/// Either stream of warning, for callers that consume them uniformly.
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliDiagnostic {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseDiagnostic),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Bind(#[from] BindDiagnostic),
}

/// Failure of an option's decode function.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid boolean value: {raw}")]
    InvalidBoolean { raw: String },

    #[error("invalid number value: {raw}")]
    InvalidNumber { raw: String },
}
