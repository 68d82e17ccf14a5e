//! CSS minifier.

use regex::{Captures, Regex};
use spa_core::CompressionLevel;
use std::sync::LazyLock;

use crate::literal_guard::{self, DOUBLE_QUOTED, SINGLE_QUOTED};

const NAMESPACE: &str = "CSS";

/// Strings and `url(...)` are protected; comments are matched only so a quote
/// inside a comment cannot open a bogus string.
static RE_PROTECTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"/\*(?s:.*?)\*/|(?P<lit>(?i:url)\(\s*(?:{DOUBLE_QUOTED}|{SINGLE_QUOTED}|[^)"']*)\s*\)|{DOUBLE_QUOTED}|{SINGLE_QUOTED})"#
    ))
    .unwrap()
});

static RE_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/\*(?s:.*?)\*/").unwrap());
static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static RE_PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*([{};:,])\s*").unwrap());
static RE_IMPORTANT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\s*!\s*important").unwrap());
static RE_REPEATED_SEMICOLON: LazyLock<Regex> = LazyLock::new(|| Regex::new(r";{2,}").unwrap());
static RE_TRAILING_SEMICOLON: LazyLock<Regex> = LazyLock::new(|| Regex::new(r";+\}").unwrap());

// Lengths only: a bare 0 is not valid for times, angles, or keyframe percentages.
static RE_ZERO_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?P<pre>^|[\s:,(])-?(?:0+(?:\.0*)?|\.0+)(?:px|em|rem|ex|ch|vw|vh|vmin|vmax|cm|mm|in|pt|pc|q)\b").unwrap()
});
static RE_LEADING_ZERO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<pre>^|[\s:,(])(?P<sign>-?)0+\.(?P<digit>\d)").unwrap());
static RE_RGB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)rgb\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*\)").unwrap()
});

/// Strip `/* ... */` comments.
pub fn strip_comments(css: &str) -> String {
    RE_COMMENT.replace_all(css, "").into_owned()
}

/// Trim lines, drop empty ones, collapse remaining whitespace to one space.
pub fn collapse_whitespace(css: &str) -> String {
    let joined = css
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    RE_WHITESPACE.replace_all(&joined, " ").trim().to_string()
}

/// Remove spaces around `{ } ; : ,` and inside `! important`.
pub fn tighten_punctuation(css: &str) -> String {
    let css = RE_PUNCTUATION.replace_all(css, "$1");
    let css = RE_IMPORTANT.replace_all(&css, "!important");
    RE_REPEATED_SEMICOLON.replace_all(&css, ";").into_owned()
}

/// Remove spaces around the `> + ~` combinators and just inside parentheses.
///
/// Combinators inside parentheses are left alone so `calc(1px + 2px)` keeps
/// the spaces it needs.
pub fn tighten_combinators(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut depth = 0usize;
    let mut skip_spaces = false;

    for c in css.chars() {
        if skip_spaces && c == ' ' {
            continue;
        }
        skip_spaces = false;
        match c {
            '(' => {
                depth += 1;
                out.push(c);
                skip_spaces = true;
            }
            ')' => {
                depth = depth.saturating_sub(1);
                trim_trailing_spaces(&mut out);
                out.push(c);
            }
            '>' | '+' | '~' if depth == 0 => {
                trim_trailing_spaces(&mut out);
                out.push(c);
                skip_spaces = true;
            }
            _ => out.push(c),
        }
    }
    out
}

fn trim_trailing_spaces(out: &mut String) {
    let kept = out.trim_end_matches(' ').len();
    out.truncate(kept);
}

/// Drop the semicolon that closes the last declaration of a block.
pub fn remove_trailing_semicolons(css: &str) -> String {
    RE_TRAILING_SEMICOLON.replace_all(css, "}").into_owned()
}

/// `0px` → `0`, `0.5` → `.5`.
pub fn normalize_numbers(css: &str) -> String {
    let css = RE_ZERO_UNIT.replace_all(css, "${pre}0");
    RE_LEADING_ZERO.replace_all(&css, "${pre}${sign}.${digit}").into_owned()
}

/// `rgb(r,g,b)` → `#rrggbb`, or `#rgb` when every channel repeats its digit.
pub fn shorten_colors(css: &str) -> String {
    RE_RGB
        .replace_all(css, |caps: &Captures| {
            let channels: Vec<u8> = (1..=3).filter_map(|i| caps[i].parse::<u8>().ok()).collect();
            if channels.len() != 3 {
                return caps[0].to_string();
            }
            let hex = format!("{:02x}{:02x}{:02x}", channels[0], channels[1], channels[2]);
            format!("#{}", shorten_hex(&hex))
        })
        .into_owned()
}

fn shorten_hex(hex: &str) -> String {
    let b = hex.as_bytes();
    if b.len() == 6 && b[0] == b[1] && b[2] == b[3] && b[4] == b[5] {
        format!("{}{}{}", b[0] as char, b[2] as char, b[4] as char)
    } else {
        hex.to_string()
    }
}

/// Minify a stylesheet.
///
/// Every level strips comments and whitespace and rewrites punctuation,
/// numbers and colours; `Extreme` also tightens selector combinators and
/// parentheses.
pub fn minify(css: &str, level: CompressionLevel) -> String {
    if level.is_disabled() || css.trim().is_empty() {
        return css.to_string();
    }

    let (guarded, map) = literal_guard::protect(css, &RE_PROTECTED, NAMESPACE);
    let mut out = strip_comments(&guarded);
    out = collapse_whitespace(&out);

    out = tighten_punctuation(&out);
    if level == CompressionLevel::Extreme {
        out = tighten_combinators(&out);
    }
    out = remove_trailing_semicolons(&out);
    out = normalize_numbers(&out);
    out = shorten_colors(&out);

    literal_guard::restore(out.trim(), &map)
}
