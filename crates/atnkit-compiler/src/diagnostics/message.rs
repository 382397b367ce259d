use rowan::TextRange;

/// Every situation the ATN passes report, grouped by the component that
/// raises it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Closure validation
    EpsilonClosure,
    EpsilonLrFollow,
    EofClosure,
    EpsilonOptional,
    ExpectedNonGreedyWildcardBlock,

    // Literals, ranges and sets
    InvalidLiteralInLexerSet,
    EmptyStringAndSetsNotAllowed,
    InvalidEscapeSequence,
    UnicodePropertyNotAllowedInRange,
    CharactersCollisionInSet,
    RangeProbablyContainsNotImpliedCharacter,
    UnsupportedReferenceInLexerSet,
    TokenRangeInParser,

    // Lexer commands
    IncompatibleCommands,
    DuplicatedCommand,
    ConstantValueIsNotARecognizedModeName,
    ConstantValueIsNotARecognizedTokenName,
    ConstantValueIsNotARecognizedChannelName,
    InvalidLexerCommand,
    MissingLexerCommandArgument,
    UnwantedLexerCommandArgument,

    // Reserved names
    ModeConflictsWithCommonConstants,
    TokenConflictsWithCommonConstants,
    ChannelConflictsWithCommonConstants,
}

impl DiagnosticKind {
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::EpsilonOptional
            | Self::ExpectedNonGreedyWildcardBlock
            | Self::CharactersCollisionInSet
            | Self::RangeProbablyContainsNotImpliedCharacter
            | Self::IncompatibleCommands
            | Self::DuplicatedCommand => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Message template. `{0}`, `{1}`, ... are replaced by the report's
    /// arguments in order.
    pub fn template(&self) -> &'static str {
        match self {
            Self::EpsilonClosure => {
                "rule {0} contains a closure with at least one alternative that can match an empty string"
            }
            Self::EpsilonLrFollow => {
                "rule {0} contains a closure with at least one alternative that can match an empty string, and is left recursive"
            }
            Self::EofClosure => {
                "rule {0} contains a closure with at least one alternative that can match EOF"
            }
            Self::EpsilonOptional => {
                "rule {0} contains an optional block with at least one alternative that can match an empty string"
            }
            Self::ExpectedNonGreedyWildcardBlock => {
                "greedy block {0} contains wildcard; the non-greedy syntax {0}? may be preferred"
            }
            Self::InvalidLiteralInLexerSet => {
                "multi-character literals are not allowed in lexer sets: {0}"
            }
            Self::EmptyStringAndSetsNotAllowed => "string literals and sets cannot be empty: {0}",
            Self::InvalidEscapeSequence => "invalid escape sequence {0}",
            Self::UnicodePropertyNotAllowedInRange => {
                "unicode property escapes not allowed in lexer charset range: {0}"
            }
            Self::CharactersCollisionInSet => "chars {0} used multiple times in set {1}",
            Self::RangeProbablyContainsNotImpliedCharacter => {
                "range {0}..{1} probably contains not implied characters {2}; both bounds should be defined in lower or UPPER case"
            }
            Self::UnsupportedReferenceInLexerSet => {
                "reference to {0} is not supported in lexer sets"
            }
            Self::TokenRangeInParser => "token ranges not allowed in parser: {0}..{1}",
            Self::IncompatibleCommands => "incompatible commands {0} and {1}",
            Self::DuplicatedCommand => "duplicated command {0}",
            Self::ConstantValueIsNotARecognizedModeName => {
                "{0} is not a recognized mode name"
            }
            Self::ConstantValueIsNotARecognizedTokenName => {
                "{0} is not a recognized token name"
            }
            Self::ConstantValueIsNotARecognizedChannelName => {
                "{0} is not a recognized channel name"
            }
            Self::InvalidLexerCommand => {
                "lexer command {0} does not exist or is not supported by the current target"
            }
            Self::MissingLexerCommandArgument => "missing argument for lexer command {0}",
            Self::UnwantedLexerCommandArgument => "lexer command {0} does not take any arguments",
            Self::ModeConflictsWithCommonConstants => {
                "cannot use or declare mode with reserved name {0}"
            }
            Self::TokenConflictsWithCommonConstants => {
                "cannot use or declare token with reserved name {0}"
            }
            Self::ChannelConflictsWithCommonConstants => {
                "cannot use or declare channel with reserved name {0}"
            }
        }
    }

    /// Render the template. Missing arguments render as empty strings.
    pub fn message(&self, args: &[String]) -> String {
        let template = self.template();
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let Some(close) = after.find('}') else {
                out.push_str(&rest[open..]);
                return out;
            };
            match after[..close].parse::<usize>() {
                Ok(index) => out.push_str(args.get(index).map_or("", String::as_str)),
                Err(_) => out.push_str(&rest[open..open + close + 2]),
            }
            rest = &after[close + 1..];
        }
        out.push_str(rest);
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    /// Grammar file the span points into, when known.
    pub(crate) file: Option<String>,
    pub(crate) range: TextRange,
    pub(crate) args: Vec<String>,
    pub(crate) message: String,
}

impl DiagnosticMessage {
    pub(crate) fn new(kind: DiagnosticKind, file: Option<String>, range: TextRange) -> Self {
        Self {
            kind,
            file,
            range,
            args: Vec::new(),
            message: kind.message(&[]),
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.kind.default_severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{file}: ")?;
        }
        write!(
            f,
            "{} at {}..{}: {}",
            self.severity(),
            u32::from(self.range.start()),
            u32::from(self.range.end()),
            self.message
        )
    }
}
