//! JavaScript minifier.
//!
//! Lexical only: every pass is a regex alternation that matches string and
//! template literals first and hands them back untouched, so removals never
//! reach inside a literal. Newlines are only dropped after the ASI pass has
//! terminated the statements they were ending.

use regex::{Captures, Regex};
use spa_core::CompressionLevel;
use std::sync::LazyLock;

use crate::literal_guard::{self, DOUBLE_QUOTED, SINGLE_QUOTED, TEMPLATE};

const NAMESPACE: &str = "JS";

const STATEMENT_KEYWORDS: &str = "const|let|var|function|class|async|import|export|return|throw|if|for|while|do|try|switch|case|default|break|continue|yield|new";

static RE_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("{DOUBLE_QUOTED}|{SINGLE_QUOTED}|{TEMPLATE}")).unwrap());

static RE_COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?P<lit>{DOUBLE_QUOTED}|{SINGLE_QUOTED}|{TEMPLATE})|//[^\n]*|/\*(?s:.*?)\*/"
    ))
    .unwrap()
});

static RE_BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?P<lit>{DOUBLE_QUOTED}|{SINGLE_QUOTED}|{TEMPLATE})|\n(?:[ \t\r]*\n)+")).unwrap()
});

static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?P<lit>{DOUBLE_QUOTED}|{SINGLE_QUOTED}|{TEMPLATE})|\s+")).unwrap()
});

static RE_OPERATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?P<lit>{DOUBLE_QUOTED}|{SINGLE_QUOTED}|{TEMPLATE})|(?P<pre>\s*)(?P<op>[-+*/%=<>!&|^~?:;,{{}}()\[\].])(?P<post>\s*)"
    ))
    .unwrap()
});

static RE_STATEMENT_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^(?:{STATEMENT_KEYWORDS})\b")).unwrap());

static RE_IIFE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(\s*(?:async\s+)?function\b|^\(\(").unwrap());

static RE_CONTINUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:else|catch|finally)\b").unwrap());

static RE_DO_WHILE_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^while\s*\(.*\)\s*;?\s*$").unwrap());

static RE_NEW_CALLEE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bnew\s+[A-Za-z_$][\w$.]*$").unwrap());

static RE_KEYWORD_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?P<prev>[)\]}}\w$])(?P<gap>[ \t]*\n(?:[ \t]*\n)*[ \t]*)(?P<kw>{STATEMENT_KEYWORDS})\b"
    ))
    .unwrap()
});

// Known false positives of the semicolon passes.
static RE_FIX_FOREACH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bforEach;").unwrap());
static RE_FIX_CHAINED_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r";(?P<gap>[ \t]*\n\s*)\.(?P<next>[A-Za-z_$])").unwrap());
static RE_FIX_NEW_ARGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<callee>\bnew\s+[A-Za-z_$][\w$.]*);(?P<gap>\s*)\(").unwrap());

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn char_before(text: &str, at: usize) -> Option<char> {
    text[..at].chars().next_back()
}

fn char_after(text: &str, at: usize) -> Option<char> {
    text[at..].chars().next()
}

/// Remove `//` and `/* */` comments, leaving literals alone.
pub fn strip_comments(js: &str) -> String {
    RE_COMMENT
        .replace_all(js, |caps: &Captures| match caps.name("lit") {
            Some(lit) => lit.as_str().to_string(),
            None => String::new(),
        })
        .into_owned()
}

/// Trim every line. Multi-line template literals are protected first.
pub fn trim_lines(js: &str) -> String {
    let (guarded, map) = literal_guard::protect(js, &RE_LITERAL, NAMESPACE);
    let trimmed = guarded.lines().map(str::trim).collect::<Vec<_>>().join("\n");
    literal_guard::restore(&trimmed, &map)
}

/// Collapse runs of blank lines into a single newline.
pub fn remove_blank_lines(js: &str) -> String {
    RE_BLANK_LINES
        .replace_all(js, |caps: &Captures| match caps.name("lit") {
            Some(lit) => lit.as_str().to_string(),
            None => "\n".to_string(),
        })
        .trim()
        .to_string()
}

/// A trimmed line that may legitimately be the last line of a statement.
fn could_end_statement(line: &str) -> bool {
    line.chars()
        .next_back()
        .is_some_and(|c| is_ident_char(c) || matches!(c, ')' | ']' | '}' | '`'))
}

/// A trimmed line that opens a new statement.
fn starts_new_statement(line: &str) -> bool {
    if RE_CONTINUATION.is_match(line) {
        return false;
    }
    RE_STATEMENT_KEYWORD.is_match(line)
        || RE_IIFE.is_match(line)
        || line.chars().next().is_some_and(is_ident_char)
}

fn needs_semicolon(current: &str, next: &str) -> bool {
    // `do { ... }` followed by its `while (...)` tail.
    if current.ends_with('}') && RE_DO_WHILE_TAIL.is_match(next) {
        return false;
    }
    // `new Foo` continued by `(args)` on the next line.
    if next.starts_with('(') && RE_NEW_CALLEE.is_match(current) {
        return false;
    }
    if current.ends_with(';') || current.ends_with('}') {
        return false;
    }
    could_end_statement(current) && starts_new_statement(next)
}

/// Terminate statements that currently rely on a newline.
///
/// Runs on line-structured input, before any newline is removed.
pub fn insert_semicolons(js: &str) -> String {
    let (guarded, map) = literal_guard::protect(js, &RE_LITERAL, NAMESPACE);
    let lines: Vec<&str> = guarded.split('\n').collect();

    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        let current = line.trim();
        if current.is_empty() {
            out.push(line.to_string());
            continue;
        }
        let next = lines[i + 1..].iter().map(|l| l.trim()).find(|l| !l.is_empty());
        match next {
            Some(next) if needs_semicolon(current, next) => out.push(format!("{};", line.trim_end())),
            _ => out.push(line.to_string()),
        }
    }

    let swept = sweep_keyword_boundaries(&out.join("\n"));
    let fixed = apply_fixups(&swept);
    literal_guard::restore(&fixed, &map)
}

/// Insert `;` between a token that can end a statement and a statement
/// keyword on a later line, across blank lines.
fn sweep_keyword_boundaries(js: &str) -> String {
    RE_KEYWORD_BOUNDARY
        .replace_all(js, |caps: &Captures| {
            let prev = &caps["prev"];
            let gap = &caps["gap"];
            let kw = &caps["kw"];
            let end = caps.get(0).map_or(js.len(), |m| m.end());
            let rest_of_line = js[end..].split('\n').next().unwrap_or("");
            let do_while_tail = prev == "}" && kw == "while" && RE_DO_WHILE_TAIL.is_match(&format!("{kw}{rest_of_line}"));
            if do_while_tail {
                format!("{prev}{gap}{kw}")
            } else {
                format!("{prev};{gap}{kw}")
            }
        })
        .into_owned()
}

fn apply_fixups(js: &str) -> String {
    let js = RE_FIX_FOREACH.replace_all(js, "forEach");
    let js = RE_FIX_CHAINED_CALL.replace_all(&js, "${gap}.${next}");
    RE_FIX_NEW_ARGS.replace_all(&js, "${callee}${gap}(").into_owned()
}

/// Two neighbouring characters that would fuse into a different token.
// A newline before a prefix `++`/`--` is not kept: `b\n++c` becomes `b++c`.
fn needs_separator(prev: Option<char>, next: Option<char>) -> bool {
    match (prev, next) {
        (Some(a), Some(b)) => {
            (is_ident_char(a) && is_ident_char(b)) || (a == '+' && b == '+') || (a == '-' && b == '-')
        }
        _ => false,
    }
}

/// Drop newlines and collapse whitespace outside literals.
pub fn collapse_whitespace(js: &str) -> String {
    RE_WHITESPACE
        .replace_all(js, |caps: &Captures| {
            if let Some(lit) = caps.name("lit") {
                return lit.as_str().to_string();
            }
            let Some(m) = caps.get(0) else {
                return String::new();
            };
            if m.as_str().contains('\n') {
                if needs_separator(char_before(js, m.start()), char_after(js, m.end())) {
                    " ".to_string()
                } else {
                    String::new()
                }
            } else {
                " ".to_string()
            }
        })
        .into_owned()
}

/// Remove spaces around operators and punctuation (extreme level).
///
/// A space after `;` followed by an identifier is kept as a single space.
pub fn tighten_operators(js: &str) -> String {
    RE_OPERATOR
        .replace_all(js, |caps: &Captures| {
            if let Some(lit) = caps.name("lit") {
                return lit.as_str().to_string();
            }
            let op = &caps["op"];
            let op_char = op.chars().next();
            let pre = caps.name("pre");
            let post = caps.name("post");

            let mut out = String::with_capacity(op.len() + 1);
            if let Some(pre) = pre.filter(|p| !p.as_str().is_empty()) {
                if needs_separator(char_before(js, pre.start()), op_char) {
                    out.push(' ');
                }
            }
            out.push_str(op);
            if let Some(post) = post.filter(|p| !p.as_str().is_empty()) {
                let next = char_after(js, post.end());
                if (op == ";" && next.is_some_and(is_ident_char)) || needs_separator(op_char, next) {
                    out.push(' ');
                }
            }
            out
        })
        .into_owned()
}

/// Minify a script body at the given level.
///
/// `Basic` keeps line structure (comments, indentation and blank lines go);
/// `Aggressive` joins statements onto one line; `Extreme` also strips
/// operator spacing.
pub fn minify(js: &str, level: CompressionLevel) -> String {
    if level.is_disabled() || js.trim().is_empty() {
        return js.to_string();
    }
    let stripped = strip_comments(js);
    let trimmed = trim_lines(&stripped);

    match level {
        CompressionLevel::Aggressive | CompressionLevel::Extreme => {
            let terminated = insert_semicolons(&trimmed);
            let mut out = collapse_whitespace(&terminated);
            if level == CompressionLevel::Extreme {
                out = tighten_operators(&out);
            }
            out.trim().to_string()
        }
        _ => remove_blank_lines(&trimmed),
    }
}
