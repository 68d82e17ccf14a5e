//! Literal guard: swap sensitive spans for unique markers before a destructive
//! pass, then put them back.
//!
//! Markers look like `___<NS>_PH_<n>___`. The namespace keeps nested passes
//! (HTML around CSS/JS) from restoring each other's markers, and it is salted
//! (`NS1`, `NS2`, ...) whenever the input already contains the plain prefix.

use regex::{Captures, Regex};

/// Double-quoted string, escape-aware, single line.
pub const DOUBLE_QUOTED: &str = r#""(?:[^"\\\n]|\\(?s:.))*""#;
/// Single-quoted string, escape-aware, single line.
pub const SINGLE_QUOTED: &str = r#"'(?:[^'\\\n]|\\(?s:.))*'"#;
/// Backtick template literal, may span lines.
pub const TEMPLATE: &str = r"`(?:[^`\\]|\\(?s:.))*`";

/// Ordered marker → original association list.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderMap {
    prefix: String,
    entries: Vec<(String, String)>,
}

impl PlaceholderMap {
    /// Create an empty map whose marker prefix does not occur in `content`.
    pub fn new(namespace: &str, content: &str) -> Self {
        Self {
            prefix: unique_prefix(namespace, content),
            entries: Vec::new(),
        }
    }

    /// Register `original` and return its marker.
    pub fn push(&mut self, original: &str) -> String {
        let marker = format!("{}{}___", self.prefix, self.entries.len());
        self.entries.push((marker.clone(), original.to_string()));
        marker
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (marker, original) pairs in encounter order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(m, o)| (m.as_str(), o.as_str()))
    }

    fn original(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|(_, o)| o.as_str())
    }
}

fn unique_prefix(namespace: &str, content: &str) -> String {
    let mut salt = 0usize;
    loop {
        let prefix = if salt == 0 {
            format!("___{namespace}_PH_")
        } else {
            format!("___{namespace}{salt}_PH_")
        };
        if !content.contains(&prefix) {
            return prefix;
        }
        salt += 1;
    }
}

/// Replace every match of `pattern` with a marker.
///
/// When `pattern` has a capture group named `lit`, only that group is
/// protected and matches without it pass through verbatim. This lets a
/// pattern skip over spans (comments, raw blocks) that must not be mistaken
/// for literals.
pub fn protect(content: &str, pattern: &Regex, namespace: &str) -> (String, PlaceholderMap) {
    let mut map = PlaceholderMap::new(namespace, content);
    let has_lit_group = pattern.capture_names().any(|name| name == Some("lit"));

    let guarded = pattern.replace_all(content, |caps: &Captures| {
        let whole = &caps[0];
        if !has_lit_group {
            return map.push(whole);
        }
        match (caps.name("lit"), caps.get(0)) {
            (Some(lit), Some(m)) => {
                let start = lit.start() - m.start();
                let end = lit.end() - m.start();
                format!("{}{}{}", &whole[..start], map.push(lit.as_str()), &whole[end..])
            }
            _ => whole.to_string(),
        }
    });

    (guarded.into_owned(), map)
}

/// Put protected spans back, in a single pass.
///
/// Restored text is never rescanned, so an original that happens to look like
/// a marker stays as it is. Unknown indices are left untouched.
pub fn restore(content: &str, map: &PlaceholderMap) -> String {
    if map.is_empty() {
        return content.to_string();
    }
    let pattern = format!(r"{}(\d+)___", regex::escape(map.prefix()));
    let Ok(re) = Regex::new(&pattern) else {
        return content.to_string();
    };
    re.replace_all(content, |caps: &Captures| {
        caps[1]
            .parse::<usize>()
            .ok()
            .and_then(|i| map.original(i))
            .unwrap_or(&caps[0])
            .to_string()
    })
    .into_owned()
}
