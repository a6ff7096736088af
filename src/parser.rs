use crate::error::ParseDiagnostic;
use crate::lexer::{Lexer, Token};
use crate::tree::{DashDraft, NodeFlags, SeparatorDraft, SyntaxTree, TextDraft};
use miette::{NamedSource, SourceSpan};

/// The result of a parse: a best-effort syntax tree plus the warnings
/// recorded along the way. Parsing never fails.
#[derive(Debug)]
pub struct ParseOutcome {
    pub tree: SyntaxTree,
    pub diagnostics: Vec<ParseDiagnostic>,
}

/// A single-pass parser assembling argument nodes from the token stream.
///
/// The parser tracks one argument under assembly at a time: an opening dash
/// run starts it, a flag must follow, and a long flag may continue into a
/// separator and value. Lookahead is bounded to two tokens forward and one
/// back, used only to decide whether an unflagged text token is a flag name
/// or a value. Anomalies become diagnostics; the offending token is dropped
/// and assembly continues.
#[derive(Debug)]
pub struct Parser {
    source: NamedSource<String>,
    tokens: Vec<Token>,
    position: usize,

    // Dash arity of the argument under assembly.
    single_dash: bool,
    double_dash: bool,
    more_than_two_dashes: bool,

    // Children collected so far; ids are allocated only at closure.
    pending_dash: Option<DashDraft>,
    pending_flag: Option<TextDraft>,
    pending_separator: Option<SeparatorDraft>,
    pending_value: Option<TextDraft>,
}

impl Parser {
    pub fn new(input: &str) -> Self {
        Self {
            source: NamedSource::new("args", input.to_string()),
            tokens: Lexer::new(input).lex(),
            position: 0,
            single_dash: false,
            double_dash: false,
            more_than_two_dashes: false,
            pending_dash: None,
            pending_flag: None,
            pending_separator: None,
            pending_value: None,
        }
    }

    /// Consumes the parser and produces the syntax tree.
    pub fn parse(mut self) -> ParseOutcome {
        let mut tree = SyntaxTree::new();
        let mut diagnostics = Vec::new();

        while self.position < self.tokens.len() {
            let token = self.tokens[self.position].clone();

            if token.is_separator() {
                self.handle_separator(&token, &mut diagnostics);
            } else if token.is_dash_run() {
                self.handle_dashes(&token, &mut diagnostics);
            } else if self.single_dash {
                // Short flags bundle: every character of the text token closes
                // its own one-dash argument, so `-abc` reads as `-a -b -c`.
                if let Some(text) = token.text() {
                    for c in text.chars() {
                        tree.push_argument(
                            DashDraft {
                                single_dash: true,
                                double_dash: false,
                                flags: NodeFlags::NONE,
                            },
                            TextDraft {
                                text: c.to_string(),
                                flags: NodeFlags::NONE,
                            },
                            None,
                            None,
                            NodeFlags::NONE,
                        );
                    }
                }
                self.reset_argument();
                self.position += 1;
                continue;
            } else {
                self.handle_text(&token, &mut diagnostics);
            }

            let at_last_token = self.position + 1 >= self.tokens.len();

            if self.can_close_naturally(at_last_token) {
                self.close_argument(&mut tree, NodeFlags::NONE);
            } else if at_last_token && self.pending_dash.is_some() && self.pending_flag.is_some() {
                // The input ended mid-argument with enough bound for a forced
                // closure. A dangling separator cannot keep its value slot.
                self.report(
                    &mut diagnostics,
                    ParseDiagnostic::ForcedClosure {
                        src: self.source.clone(),
                        span: Self::span_of(&token),
                    },
                );
                self.pending_separator = None;
                self.pending_value = None;
                self.close_argument(&mut tree, NodeFlags::FORCE_CREATED);
            }

            self.position += 1;
        }

        ParseOutcome { tree, diagnostics }
    }

    /// Whitespace or an equals run: becomes a separator when a long flag is
    /// already bound, is dropped otherwise. Plain whitespace outside of any
    /// argument is ordinary spacing and stays silent.
    fn handle_separator(&mut self, token: &Token, diagnostics: &mut Vec<ParseDiagnostic>) {
        let assembling = self.pending_dash.is_some();

        if assembling && self.double_dash && self.pending_flag.is_some() {
            let mut flags = NodeFlags::NONE;
            if token.text().is_some_and(|t| t.len() > 1) {
                flags.insert(NodeFlags::MORE_THAN_ONE_EQUALS);
            }
            self.pending_separator = Some(SeparatorDraft { flags });
        } else if (assembling && self.pending_flag.is_none())
            || (!assembling && token.is_equals_run())
        {
            self.report(
                diagnostics,
                ParseDiagnostic::UnexpectedSeparator {
                    src: self.source.clone(),
                    span: Self::span_of(token),
                },
            );
        }
    }

    /// A dash run opens a new argument; inside one it is an anomaly.
    fn handle_dashes(&mut self, token: &Token, diagnostics: &mut Vec<ParseDiagnostic>) {
        if self.pending_dash.is_some() {
            self.report(
                diagnostics,
                ParseDiagnostic::UnexpectedDashes {
                    src: self.source.clone(),
                    span: Self::span_of(token),
                },
            );
            return;
        }

        let run_length = token.text().map_or(0, str::len);
        self.single_dash = run_length == 1;
        self.double_dash = run_length >= 2;
        self.more_than_two_dashes = run_length > 2;

        let mut flags = NodeFlags::NONE;
        if self.more_than_two_dashes {
            flags.insert(NodeFlags::MORE_THAN_TWO_DASHES);
        }
        self.pending_dash = Some(DashDraft {
            single_dash: self.single_dash,
            double_dash: self.double_dash,
            flags,
        });
    }

    /// An unflagged text token is narrowed to a flag name or a value from
    /// its surroundings, then bound into whichever slot needs it.
    fn handle_text(&mut self, token: &Token, diagnostics: &mut Vec<ParseDiagnostic>) {
        if self.pending_dash.is_none() {
            self.report(
                diagnostics,
                ParseDiagnostic::UnexpectedText {
                    src: self.source.clone(),
                    span: Self::span_of(token),
                },
            );
            return;
        }

        let draft = TextDraft {
            text: token.text().unwrap_or_default().to_string(),
            flags: NodeFlags::NARROWED_FROM_UNFLAGGED_TEXT,
        };

        // An equals sign right after the text marks it as a flag name.
        if self.peek(1).is_some_and(Token::is_equals_run) {
            self.pending_flag = Some(draft);
            return;
        }

        // A dash run two tokens ahead means this text is the value of the
        // current argument, unless the text itself directly follows the
        // opening dashes (then it must be the flag name). A separator right
        // behind also marks a value.
        let two_ahead_is_dashes = self.peek(2).is_some_and(Token::is_dash_run);
        let one_back_is_dashes = self.peek_back(1).is_some_and(Token::is_dash_run);
        let one_back_is_separator = self.peek_back(1).is_some_and(Token::is_separator);

        if (two_ahead_is_dashes && !one_back_is_dashes) || one_back_is_separator {
            self.pending_value = Some(draft);
            return;
        }

        if self.pending_flag.is_none() {
            self.pending_flag = Some(draft);
            return;
        }
        if self.pending_value.is_none() {
            self.pending_value = Some(draft);
            return;
        }

        self.report(
            diagnostics,
            ParseDiagnostic::UnbindableText {
                src: self.source.clone(),
                span: Self::span_of(token),
            },
        );
    }

    /// Natural closure rules:
    /// - a one-dash argument closes as soon as its flag is bound;
    /// - a two-dash argument closes without a value when the token two ahead
    ///   opens the next argument, or when the input ends with nothing but
    ///   dash and flag bound;
    /// - a full dash+flag+separator+value argument closes with its value.
    fn can_close_naturally(&self, at_last_token: bool) -> bool {
        if self.pending_dash.is_none() || self.pending_flag.is_none() {
            return false;
        }
        if self.single_dash {
            return true;
        }
        if self.double_dash {
            if self.pending_separator.is_some() && self.pending_value.is_some() {
                return true;
            }
            if self.peek(2).is_some_and(Token::is_dash_run) {
                return true;
            }
            if at_last_token && self.pending_separator.is_none() {
                return true;
            }
        }
        false
    }

    fn close_argument(&mut self, tree: &mut SyntaxTree, extra_flags: NodeFlags) {
        let (Some(dash), Some(flag)) = (self.pending_dash.take(), self.pending_flag.take())
        else {
            return;
        };
        tree.push_argument(
            dash,
            flag,
            self.pending_separator.take(),
            self.pending_value.take(),
            extra_flags,
        );
        self.reset_argument();
    }

    fn reset_argument(&mut self) {
        self.pending_dash = None;
        self.pending_flag = None;
        self.pending_separator = None;
        self.pending_value = None;
        self.single_dash = false;
        self.double_dash = false;
        self.more_than_two_dashes = false;
    }

    fn peek(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    fn peek_back(&self, n: usize) -> Option<&Token> {
        self.position.checked_sub(n).and_then(|i| self.tokens.get(i))
    }

    fn span_of(token: &Token) -> SourceSpan {
        (token.pos_start, token.pos_end - token.pos_start).into()
    }

    fn report(&self, diagnostics: &mut Vec<ParseDiagnostic>, diagnostic: ParseDiagnostic) {
        log::warn!("{diagnostic}");
        diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> ParseOutcome {
        Parser::new(input).parse()
    }

    #[test]
    fn test_whitespace_only_input_is_empty_and_silent() {
        for input in ["", "   ", "\t \n"] {
            let outcome = parse(input);
            assert_eq!(outcome.tree.argument_count(), 0, "input: {input:?}");
            assert!(outcome.diagnostics.is_empty(), "input: {input:?}");
        }
    }

    #[test]
    fn test_two_long_flags() {
        let outcome = parse("--help --version");
        let flags: Vec<&str> = outcome.tree.arguments().map(|a| a.flag_text()).collect();
        assert_eq!(flags, vec!["help", "version"]);
        assert!(outcome.tree.arguments().all(|a| a.is_double_dash()));
        assert!(outcome.tree.arguments().all(|a| a.value().is_none()));
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn test_short_flag_bundle_expands() {
        let outcome = parse("-abc");
        let flags: Vec<&str> = outcome.tree.arguments().map(|a| a.flag_text()).collect();
        assert_eq!(flags, vec!["a", "b", "c"]);
        for argument in outcome.tree.arguments() {
            assert!(argument.is_single_dash());
            assert!(argument.value().is_none());
        }
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn test_long_flag_with_equals_value() {
        let outcome = parse("--name=value");
        assert_eq!(outcome.tree.argument_count(), 1);
        let argument = outcome.tree.arguments().next().unwrap();
        assert!(argument.is_double_dash());
        assert_eq!(argument.flag_text(), "name");
        assert!(argument.separator().is_some());
        assert_eq!(argument.value_text(), Some("value"));
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn test_spaced_value_binds_when_next_argument_follows() {
        let outcome = parse("--name value --next");
        let arguments: Vec<_> = outcome.tree.arguments().collect();
        assert_eq!(arguments.len(), 2);
        assert_eq!(arguments[0].flag_text(), "name");
        assert_eq!(arguments[0].value_text(), Some("value"));
        assert_eq!(arguments[1].flag_text(), "next");
        assert_eq!(arguments[1].value_text(), None);
    }

    #[test]
    fn test_trailing_spaced_value_binds() {
        let outcome = parse("--name value");
        let argument = outcome.tree.arguments().next().unwrap();
        assert_eq!(argument.value_text(), Some("value"));
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn test_narrowed_nodes_are_flagged() {
        let outcome = parse("--name=value");
        let argument = outcome.tree.arguments().next().unwrap();
        assert!(argument
            .flag()
            .flags
            .contains(NodeFlags::NARROWED_FROM_UNFLAGGED_TEXT));
        assert!(argument
            .value()
            .unwrap()
            .flags
            .contains(NodeFlags::NARROWED_FROM_UNFLAGGED_TEXT));
    }

    #[test]
    fn test_more_than_two_dashes_is_flagged_long() {
        let outcome = parse("---verbose");
        let argument = outcome.tree.arguments().next().unwrap();
        assert!(argument.is_double_dash());
        assert!(argument
            .dash()
            .flags
            .contains(NodeFlags::MORE_THAN_TWO_DASHES));
    }

    #[test]
    fn test_double_equals_separator_is_flagged() {
        let outcome = parse("--name==value");
        let argument = outcome.tree.arguments().next().unwrap();
        assert_eq!(argument.value_text(), Some("value"));
        assert!(argument
            .separator()
            .unwrap()
            .flags
            .contains(NodeFlags::MORE_THAN_ONE_EQUALS));
    }

    #[test]
    fn test_dangling_separator_forces_closure() {
        let outcome = parse("--name=");
        assert_eq!(outcome.tree.argument_count(), 1);
        let argument = outcome.tree.arguments().next().unwrap();
        assert_eq!(argument.flag_text(), "name");
        assert!(argument.separator().is_none());
        assert!(argument.value().is_none());
        assert!(argument.flags().contains(NodeFlags::FORCE_CREATED));
        assert!(matches!(
            outcome.diagnostics.as_slice(),
            [ParseDiagnostic::ForcedClosure { .. }]
        ));
    }

    #[test]
    fn test_dashes_inside_argument_are_dropped() {
        let outcome = parse("-- --name");
        // The second dash run is dropped; "name" fills the first argument's
        // flag hole.
        assert_eq!(outcome.tree.argument_count(), 1);
        let argument = outcome.tree.arguments().next().unwrap();
        assert_eq!(argument.flag_text(), "name");
        assert!(outcome
            .diagnostics
            .iter()
            .any(|d| matches!(d, ParseDiagnostic::UnexpectedDashes { .. })));
        assert!(outcome
            .diagnostics
            .iter()
            .any(|d| matches!(d, ParseDiagnostic::UnexpectedSeparator { .. })));
    }

    #[test]
    fn test_text_outside_arguments_is_dropped() {
        let outcome = parse("stray words");
        assert_eq!(outcome.tree.argument_count(), 0);
        assert_eq!(outcome.diagnostics.len(), 2);
        assert!(outcome
            .diagnostics
            .iter()
            .all(|d| matches!(d, ParseDiagnostic::UnexpectedText { .. })));
    }

    #[test]
    fn test_single_dash_never_carries_value() {
        let outcome = parse("-a value");
        let arguments: Vec<_> = outcome.tree.arguments().collect();
        assert_eq!(arguments[0].flag_text(), "a");
        assert!(arguments[0].value().is_none());
    }

    #[test]
    fn test_parse_is_structurally_repeatable() {
        let render = |input: &str| {
            let outcome = parse(input);
            let mut shape = Vec::new();
            outcome.tree.for_each_node(|node| {
                shape.push((node.kind.clone(), node.flags));
            });
            shape
        };
        let input = "--some-val=value --name value -ab --bool";
        assert_eq!(render(input), render(input));
    }

    #[test]
    fn test_mixed_arguments_keep_input_order() {
        let outcome = parse("--some-val=value --name value --bool-name -b");
        let flags: Vec<&str> = outcome.tree.arguments().map(|a| a.flag_text()).collect();
        assert_eq!(flags, vec!["some-val", "name", "bool-name", "b"]);
    }
}
