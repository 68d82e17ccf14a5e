//! HTML minifier.
//!
//! Levels are additive: `Basic` handles comments and whitespace, `Aggressive`
//! adds block-tag and attribute rewriting plus minification of inline
//! `<script>`/`<style>` bodies, `Extreme` tightens the tags themselves.
//! `<pre>`, `<textarea>`, `<code>` and `<xmp>` elements are restored verbatim.

use regex::{Captures, Regex};
use spa_core::CompressionLevel;
use std::sync::LazyLock;

use crate::literal_guard::{self, PlaceholderMap};
use crate::{css, js};

pub const NAMESPACE: &str = "HTML";

const RAW_BLOCK: &str = r"<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>";
const PREFORMATTED_BLOCK: &str = r"<pre\b[^>]*>.*?</pre\s*>|<textarea\b[^>]*>.*?</textarea\s*>|<code\b[^>]*>.*?</code\s*>|<xmp\b[^>]*>.*?</xmp\s*>";

static RE_RAW_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(&format!("(?is){RAW_BLOCK}")).unwrap());

/// Preformatted elements, skipping over script/style blocks so a `<pre>`
/// inside a script string is not mistaken for markup.
static RE_PREFORMATTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("(?is){RAW_BLOCK}|(?P<lit>{PREFORMATTED_BLOCK})")).unwrap());

static RE_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--(.*?)-->").unwrap());
static RE_TAG_GAP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r">\s+<").unwrap());
static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static RE_BLOCK_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\s*(</?(?:div|p|h[1-6]|ul|ol|li|table|thead|tbody|tr|td|th|form|fieldset|nav|header|footer|section|article|aside|main)\b[^>]*>)\s*",
    )
    .unwrap()
});

/// An opening tag with its attributes; quoted values may contain `>`.
static RE_OPEN_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<[A-Za-z][^\s/>]*(?:"[^"]*"|'[^']*'|[^'">])*>"#).unwrap());

// Both match quoted values first so text inside another attribute's value
// is never rewritten.
static RE_EMPTY_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?P<q>"[^"]*"|'[^']*')|(?i:\s+(?:class|id|style)\s*=\s*(?:""|''))"#).unwrap()
});
static RE_QUOTED_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?P<name>\s[\w:.-]+)\s*=\s*(?:"(?P<dq>[A-Za-z0-9_-]+)"|'(?P<sq>[A-Za-z0-9_-]+)')|(?P<q>"[^"]*"|'[^']*')"#,
    )
    .unwrap()
});
static RE_ATTR_EQUALS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?P<q>"[^"]*"|'[^']*')|\s*=\s*"#).unwrap());

static RE_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^(?P<open><script\b(?P<attrs>[^>]*)>)(?P<body>.*?)(?P<close></script\s*>)$").unwrap()
});
static RE_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^(?P<open><style\b[^>]*>)(?P<body>.*?)(?P<close></style\s*>)$").unwrap()
});
static RE_SRC_ATTR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\ssrc\s*=").unwrap());
static RE_TYPE_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\stype\s*=\s*["']?([^"'\s>]*)"#).unwrap());

static RE_LINE_BREAKS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\r\n\t]+").unwrap());
static RE_SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").unwrap());
static RE_BARE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<\s*(?P<slash>/?)\s*(?P<name>[A-Za-z][\w:-]*)\s*>").unwrap());
static RE_DOCTYPE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<!doctype\s+html\s*>").unwrap());

/// Replace preformatted elements with markers.
pub fn protect_preformatted(html: &str) -> (String, PlaceholderMap) {
    literal_guard::protect(html, &RE_PREFORMATTED, NAMESPACE)
}

/// Apply `text` to markup outside `<script>`/`<style>` blocks and `raw` to the
/// blocks themselves. `text` is told whether a raw block sits directly before
/// and after its segment.
fn map_segments<T, R>(html: &str, mut text: T, mut raw: R) -> String
where
    T: FnMut(&str, bool, bool) -> String,
    R: FnMut(&str) -> String,
{
    let mut out = String::with_capacity(html.len());
    let mut last = 0;
    let mut after_raw = false;
    for m in RE_RAW_BLOCK.find_iter(html) {
        out.push_str(&text(&html[last..m.start()], after_raw, true));
        out.push_str(&raw(m.as_str()));
        last = m.end();
        after_raw = true;
    }
    out.push_str(&text(&html[last..], after_raw, false));
    out
}

/// Remove comments, keeping conditional comments and `<!--<!` / `<!-->` forms.
pub fn strip_comments(html: &str) -> String {
    RE_COMMENT
        .replace_all(html, |caps: &Captures| {
            let inner = &caps[1];
            if inner.starts_with("[if") || inner.starts_with("<!") || inner.starts_with('>') {
                caps[0].to_string()
            } else {
                String::new()
            }
        })
        .into_owned()
}

fn collapse_text(segment: &str, after_raw: bool, before_raw: bool) -> String {
    let stripped = strip_comments(segment);
    let gaps = RE_TAG_GAP.replace_all(&stripped, "><");
    let trimmed = gaps.lines().map(str::trim).collect::<Vec<_>>().join("\n");
    let mut out = RE_WHITESPACE.replace_all(&trimmed, " ").into_owned();

    // Whitespace between a tag and an adjacent script/style block.
    if before_raw && out.trim_end().ends_with('>') {
        out.truncate(out.trim_end().len());
    }
    if after_raw && out.trim_start().starts_with('<') {
        out = out.trim_start().to_string();
    }
    out
}

/// Script/style blocks at the basic level: lines trimmed, newlines kept.
/// Non-JavaScript script types are left as they are.
fn trim_embedded(block: &str) -> String {
    if let Some(caps) = RE_SCRIPT.captures(block) {
        if !is_javascript_type(&caps["attrs"]) {
            return block.to_string();
        }
        return js::trim_lines(block);
    }
    block.lines().map(str::trim).collect::<Vec<_>>().join("\n")
}

/// Basic level: comments and whitespace; script/style bodies only have their
/// lines trimmed.
pub fn basic(html: &str) -> String {
    map_segments(html, collapse_text, trim_embedded).trim().to_string()
}

fn rewrite_attributes(tag: &str) -> String {
    let without_empty = RE_EMPTY_ATTR.replace_all(tag, |caps: &Captures| match caps.name("q") {
        Some(q) => q.as_str().to_string(),
        None => String::new(),
    });
    RE_QUOTED_ATTR
        .replace_all(&without_empty, |caps: &Captures| {
            if caps.name("q").is_some() {
                return caps[0].to_string();
            }
            let end = caps.get(0).map_or(0, |m| m.end());
            // `a=b/>` would read the slash as part of the value.
            if without_empty[end..].trim_start().starts_with('/') {
                return caps[0].to_string();
            }
            let value = caps.name("dq").or_else(|| caps.name("sq")).map_or("", |m| m.as_str());
            format!("{}={}", &caps["name"], value)
        })
        .into_owned()
}

fn is_javascript_type(attrs: &str) -> bool {
    match RE_TYPE_ATTR.captures(attrs) {
        None => true,
        Some(caps) => matches!(
            caps[1].to_ascii_lowercase().as_str(),
            "" | "module" | "text/javascript" | "application/javascript" | "text/ecmascript" | "application/ecmascript"
        ),
    }
}

/// Minify the body of one `<script>` or `<style>` block.
pub fn minify_embedded(block: &str, level: CompressionLevel) -> String {
    if let Some(caps) = RE_SCRIPT.captures(block) {
        let body = &caps["body"];
        let attrs = &caps["attrs"];
        if body.trim().is_empty() || RE_SRC_ATTR.is_match(attrs) || !is_javascript_type(attrs) {
            return block.to_string();
        }
        return format!("{}{}{}", &caps["open"], js::minify(body, level), &caps["close"]);
    }
    if let Some(caps) = RE_STYLE.captures(block) {
        let body = &caps["body"];
        if body.trim().is_empty() {
            return block.to_string();
        }
        return format!("{}{}{}", &caps["open"], css::minify(body, level), &caps["close"]);
    }
    block.to_string()
}

/// Aggressive level on top of `basic` output.
pub fn aggressive(html: &str, level: CompressionLevel) -> String {
    map_segments(
        html,
        |segment, _, _| {
            let blocks = RE_BLOCK_TAG.replace_all(segment, "$1");
            RE_OPEN_TAG
                .replace_all(&blocks, |caps: &Captures| rewrite_attributes(&caps[0]))
                .into_owned()
        },
        |block| minify_embedded(block, level),
    )
}

fn tighten_tag(tag: &str) -> String {
    let equals = RE_ATTR_EQUALS.replace_all(tag, |caps: &Captures| match caps.name("q") {
        Some(q) => q.as_str().to_string(),
        None => "=".to_string(),
    });
    let body = equals.strip_suffix('>').unwrap_or(&*equals).trim_end();
    match body.strip_suffix('/') {
        Some(before_slash) => {
            let head = before_slash.trim_end();
            // Keep `a=b /` apart; only quoted values or bare names may touch the slash.
            let safe = head.ends_with('"') || head.ends_with('\'') || !head.contains('=');
            if safe {
                format!("{head}/>")
            } else {
                format!("{head} />")
            }
        }
        None => format!("{body}>"),
    }
}

/// Extreme level on top of `aggressive` output.
pub fn extreme(html: &str) -> String {
    map_segments(
        html,
        |segment, _, _| {
            let flat = RE_LINE_BREAKS.replace_all(segment, " ");
            let flat = RE_SPACES.replace_all(&flat, " ");
            let tags = RE_OPEN_TAG.replace_all(&flat, |caps: &Captures| tighten_tag(&caps[0]));
            let bare = RE_BARE_TAG.replace_all(&tags, "<${slash}${name}>");
            RE_DOCTYPE.replace_all(&bare, "<!DOCTYPE html>").into_owned()
        },
        str::to_string,
    )
}

/// Minify a document or fragment.
pub fn minify(html: &str, level: CompressionLevel) -> String {
    if level.is_disabled() || html.trim().is_empty() {
        return html.to_string();
    }

    let (guarded, map) = protect_preformatted(html);
    let mut out = basic(&guarded);
    if matches!(level, CompressionLevel::Aggressive | CompressionLevel::Extreme) {
        out = aggressive(&out, level);
    }
    if level == CompressionLevel::Extreme {
        out = extreme(&out);
    }
    literal_guard::restore(out.trim(), &map)
}
