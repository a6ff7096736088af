/// Represents the kinds of tokens the lexer can produce.
/// The lexer only distinguishes whitespace runs from text runs; the text
/// runs carry classification flags that the parser turns into structure.
#[derive(Debug, PartialEq, Clone)]
pub enum TokenKind {
    /// A run of one or more whitespace characters (spaces, tabs, newlines).
    Whitespace,
    /// A run of non-whitespace characters.
    /// `has_dash_prefix` is set for a pure run of `-` characters (the run
    /// length decides short-flag vs long-flag context later on).
    /// `has_equals_mark` is set for a pure run of `=` characters.
    Text {
        content: String,
        has_dash_prefix: bool,
        has_equals_mark: bool,
    },
}

/// A token with its kind and byte position in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos_start: usize,
    pub pos_end: usize,
}

impl Token {
    pub fn new(kind: TokenKind, pos_start: usize, pos_end: usize) -> Token {
        Token {
            kind,
            pos_start,
            pos_end,
        }
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace)
    }

    pub fn is_dash_run(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Text {
                has_dash_prefix: true,
                ..
            }
        )
    }

    pub fn is_equals_run(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Text {
                has_equals_mark: true,
                ..
            }
        )
    }

    /// True for a text token that is neither a dash run nor an equals run.
    pub fn is_plain_text(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Text {
                has_dash_prefix: false,
                has_equals_mark: false,
                ..
            }
        )
    }

    /// Whitespace and equals runs both separate a long flag from its value.
    pub fn is_separator(&self) -> bool {
        self.is_whitespace() || self.is_equals_run()
    }

    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Text { content, .. } => Some(content),
            TokenKind::Whitespace => None,
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// A lazy tokenizer over a raw argument string.
///
/// The lexer is a pure function of its input and cannot fail: every input,
/// however malformed, lexes into a finite sequence of non-empty tokens.
/// Maximal-munch rules, in priority order:
///
/// 1. a run of whitespace becomes one `Whitespace` token;
/// 2. a run of `-` becomes one dash-prefixed `Text` token;
/// 3. a run of `=` becomes one equals-marked `Text` token;
/// 4. anything else starts a plain `Text` token that extends while the next
///    character is `[A-Za-z0-9_-]`.
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    /// Collects the full token stream.
    pub fn lex(self) -> Vec<Token> {
        self.collect()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next();
        if let Some(c) = c {
            self.position += c.len_utf8();
        }
        c
    }

    fn peek(&mut self) -> Option<&char> {
        self.chars.peek()
    }

    fn read_run(&mut self, first: char, matches: fn(char) -> bool) -> String {
        let mut content = String::new();
        content.push(first);
        while let Some(&c) = self.peek() {
            if matches(c) {
                content.push(c);
                self.advance();
            } else {
                break;
            }
        }
        content
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let start_pos = self.position;
        let first = self.advance()?;

        let kind = if first.is_whitespace() {
            self.read_run(first, char::is_whitespace);
            TokenKind::Whitespace
        } else if first == '-' {
            TokenKind::Text {
                content: self.read_run(first, |c| c == '-'),
                has_dash_prefix: true,
                has_equals_mark: false,
            }
        } else if first == '=' {
            TokenKind::Text {
                content: self.read_run(first, |c| c == '='),
                has_dash_prefix: false,
                has_equals_mark: true,
            }
        } else {
            // A plain text run absorbs its leading character unconditionally
            // and then extends over word characters only, so a stray `!` ends
            // up inside the token rather than being dropped.
            TokenKind::Text {
                content: self.read_run(first, is_word_char),
                has_dash_prefix: false,
                has_equals_mark: false,
            }
        };

        Some(Token::new(kind, start_pos, self.position))
    }
}
