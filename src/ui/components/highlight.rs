//! Keyword-level syntax highlighting for fenced code blocks.
//!
//! A block is highlighted by its language hint when the hint names a known
//! language; otherwise the language is guessed by counting keyword hits.
//! Unknown code is shown plain.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use super::theme::current_theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Rust,
    Python,
    JavaScript,
    TypeScript,
    Go,
    Shell,
    Json,
    Toml,
    Yaml,
    Sql,
    C,
    Java,
}

/// Candidates for auto-detection, in tie-break order
const DETECTABLE: &[Language] = &[
    Language::Rust,
    Language::Python,
    Language::TypeScript,
    Language::JavaScript,
    Language::Go,
    Language::Java,
    Language::C,
    Language::Sql,
    Language::Shell,
];

/// Keyword hits needed before a guess is trusted
const MIN_DETECT_SCORE: usize = 2;

impl Language {
    /// Resolve a fence info string such as `rust`, `py` or `sh`.
    pub fn from_hint(hint: &str) -> Option<Self> {
        let hint = hint.trim().to_ascii_lowercase();
        let lang = match hint.as_str() {
            "rust" | "rs" => Language::Rust,
            "python" | "py" | "python3" => Language::Python,
            "javascript" | "js" | "jsx" | "mjs" | "node" => Language::JavaScript,
            "typescript" | "ts" | "tsx" => Language::TypeScript,
            "go" | "golang" => Language::Go,
            "sh" | "bash" | "shell" | "zsh" | "console" => Language::Shell,
            "json" | "jsonc" => Language::Json,
            "toml" => Language::Toml,
            "yaml" | "yml" => Language::Yaml,
            "sql" | "postgres" | "postgresql" | "mysql" | "sqlite" => Language::Sql,
            "c" | "h" | "cpp" | "c++" | "cc" | "hpp" => Language::C,
            "java" | "kotlin" | "kt" => Language::Java,
            _ => return None,
        };
        Some(lang)
    }

    pub fn name(self) -> &'static str {
        match self {
            Language::Rust => "rust",
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Go => "go",
            Language::Shell => "shell",
            Language::Json => "json",
            Language::Toml => "toml",
            Language::Yaml => "yaml",
            Language::Sql => "sql",
            Language::C => "c",
            Language::Java => "java",
        }
    }

    fn keywords(self) -> &'static [&'static str] {
        match self {
            Language::Rust => &[
                "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else",
                "enum", "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop",
                "match", "mod", "move", "mut", "pub", "ref", "return", "self", "Self",
                "static", "struct", "super", "trait", "true", "type", "unsafe", "use",
                "where", "while",
            ],
            Language::Python => &[
                "and", "as", "assert", "async", "await", "break", "class", "continue", "def",
                "del", "elif", "else", "except", "False", "finally", "for", "from", "global",
                "if", "import", "in", "is", "lambda", "None", "nonlocal", "not", "or", "pass",
                "raise", "return", "self", "True", "try", "while", "with", "yield",
            ],
            Language::JavaScript => &[
                "async", "await", "break", "case", "catch", "class", "const", "continue",
                "default", "delete", "do", "else", "export", "extends", "false", "finally",
                "for", "function", "if", "import", "in", "instanceof", "let", "new", "null",
                "return", "switch", "this", "throw", "true", "try", "typeof", "undefined",
                "var", "void", "while", "yield",
            ],
            Language::TypeScript => &[
                "any", "as", "async", "await", "boolean", "break", "case", "catch", "class",
                "const", "continue", "declare", "default", "else", "enum", "export",
                "extends", "false", "for", "function", "if", "implements", "import",
                "interface", "keyof", "let", "namespace", "new", "null", "number", "private",
                "public", "readonly", "return", "string", "this", "throw", "true", "try",
                "type", "undefined", "void", "while",
            ],
            Language::Go => &[
                "break", "case", "chan", "const", "continue", "default", "defer", "else",
                "fallthrough", "false", "for", "func", "go", "goto", "if", "import",
                "interface", "map", "nil", "package", "range", "return", "select", "struct",
                "switch", "true", "type", "var",
            ],
            Language::Shell => &[
                "case", "do", "done", "echo", "elif", "else", "esac", "exit", "export", "fi",
                "for", "function", "if", "in", "local", "read", "return", "set", "then",
                "until", "while",
            ],
            Language::Json => &["true", "false", "null"],
            Language::Toml => &["true", "false"],
            Language::Yaml => &["true", "false", "null", "yes", "no", "on", "off"],
            Language::Sql => &[
                "ALTER", "AND", "AS", "BY", "CREATE", "DELETE", "DISTINCT", "DROP", "FROM",
                "GROUP", "HAVING", "INDEX", "INNER", "INSERT", "INTO", "JOIN", "KEY", "LEFT",
                "LIMIT", "NOT", "NULL", "ON", "OR", "ORDER", "PRIMARY", "SELECT", "SET",
                "TABLE", "UPDATE", "VALUES", "WHERE",
            ],
            Language::C => &[
                "auto", "break", "case", "char", "const", "continue", "default", "do",
                "double", "else", "enum", "extern", "float", "for", "goto", "if", "include",
                "int", "long", "return", "short", "signed", "sizeof", "static", "struct",
                "switch", "typedef", "union", "unsigned", "void", "volatile", "while",
            ],
            Language::Java => &[
                "abstract", "boolean", "break", "case", "catch", "class", "extends", "final",
                "finally", "for", "if", "implements", "import", "instanceof", "int",
                "interface", "new", "null", "package", "private", "protected", "public",
                "return", "static", "super", "this", "throw", "throws", "try", "void",
                "while",
            ],
        }
    }

    fn is_keyword(self, word: &str) -> bool {
        match self {
            Language::Sql => self
                .keywords()
                .iter()
                .any(|kw| kw.eq_ignore_ascii_case(word)),
            _ => self.keywords().contains(&word),
        }
    }

    fn line_comment(self) -> Option<&'static str> {
        match self {
            Language::Python | Language::Shell | Language::Toml | Language::Yaml => Some("#"),
            Language::Sql => Some("--"),
            Language::Json => None,
            _ => Some("//"),
        }
    }
}

/// Guess the language of `code` from keyword frequency.
pub fn detect(code: &str) -> Option<Language> {
    let trimmed = code.trim_start();
    if (trimmed.starts_with('{') || trimmed.starts_with('['))
        && serde_json::from_str::<serde_json::Value>(code).is_ok()
    {
        return Some(Language::Json);
    }
    if trimmed.starts_with("#!") && trimmed.lines().next().is_some_and(|l| l.contains("sh")) {
        return Some(Language::Shell);
    }

    let words: Vec<&str> = code
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .collect();

    let mut best: Option<(Language, usize)> = None;
    for &lang in DETECTABLE {
        let score = words.iter().filter(|w| lang.is_keyword(w)).count();
        if score >= MIN_DETECT_SCORE && best.map_or(true, |(_, top)| score > top) {
            best = Some((lang, score));
        }
    }
    best.map(|(lang, _)| lang)
}

/// Language for a fenced block: the hint if known, else a guess.
pub fn resolve(code: &str, hint: Option<&str>) -> Option<Language> {
    hint.and_then(Language::from_hint).or_else(|| detect(code))
}

/// Highlight `code` line by line. `base` supplies the background.
pub fn highlight(code: &str, hint: Option<&str>, base: Style) -> Vec<Line<'static>> {
    let language = resolve(code, hint);
    code.lines()
        .map(|line| match language {
            Some(lang) => highlight_line(line, lang, base),
            None => Line::from(Span::styled(
                line.to_string(),
                base.fg(current_theme().syntax_plain),
            )),
        })
        .collect()
}

#[derive(Clone, Copy)]
enum TokenKind {
    Plain,
    Keyword,
    Str,
    Number,
    Comment,
}

fn token_color(kind: TokenKind) -> Color {
    let theme = current_theme();
    match kind {
        TokenKind::Plain => theme.syntax_plain,
        TokenKind::Keyword => theme.syntax_keyword,
        TokenKind::Str => theme.syntax_string,
        TokenKind::Number => theme.syntax_number,
        TokenKind::Comment => theme.syntax_comment,
    }
}

fn highlight_line(line: &str, lang: Language, base: Style) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut push = |text: &str, kind: TokenKind| {
        if text.is_empty() {
            return;
        }
        let mut style = base.fg(token_color(kind));
        if matches!(kind, TokenKind::Comment) {
            style = style.add_modifier(Modifier::ITALIC);
        }
        spans.push(Span::styled(text.to_string(), style));
    };

    let comment = lang.line_comment();
    let mut plain_start = 0;
    let mut i = 0;

    while i < line.len() {
        let rest = &line[i..];
        let Some(c) = rest.chars().next() else {
            break;
        };

        if comment.is_some_and(|marker| rest.starts_with(marker)) {
            push(&line[plain_start..i], TokenKind::Plain);
            push(rest, TokenKind::Comment);
            return Line::from(spans);
        }

        if c == '"' || c == '\'' || c == '`' {
            let end = string_end(rest, c);
            push(&line[plain_start..i], TokenKind::Plain);
            push(&rest[..end], TokenKind::Str);
            i += end;
            plain_start = i;
            continue;
        }

        if c.is_ascii_digit() {
            let end = rest
                .find(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '.' || ch == '_'))
                .unwrap_or(rest.len());
            push(&line[plain_start..i], TokenKind::Plain);
            push(&rest[..end], TokenKind::Number);
            i += end;
            plain_start = i;
            continue;
        }

        if c.is_alphabetic() || c == '_' {
            let end = rest
                .find(|ch: char| !(ch.is_alphanumeric() || ch == '_'))
                .unwrap_or(rest.len());
            let word = &rest[..end];
            if lang.is_keyword(word) {
                push(&line[plain_start..i], TokenKind::Plain);
                push(word, TokenKind::Keyword);
                plain_start = i + end;
            }
            i += end;
            continue;
        }

        i += c.len_utf8();
    }

    push(&line[plain_start..], TokenKind::Plain);
    Line::from(spans)
}

/// Byte length of the string literal at the start of `s`, quotes included.
/// An unterminated literal runs to the end of the line.
fn string_end(s: &str, quote: char) -> usize {
    let mut escaped = false;
    for (idx, ch) in s.char_indices().skip(1) {
        if escaped {
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == quote {
            return idx + ch.len_utf8();
        }
    }
    s.len()
}
