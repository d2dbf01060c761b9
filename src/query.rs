//! Query text parsing.
//!
//! A raw query is a single mutable string re-parsed on every change. It may
//! open with a scope directive (`in:Some/Folder keyword`) restricting the
//! search to a sub-tree; spaces inside the scope path are escaped with a
//! backslash, and [`escape`] produces exactly the form [`parse`] undoes.

/// Prefix that introduces a scope path in a raw query.
pub const SCOPE_DIRECTIVE: &str = "in:";

/// Split raw query text into a scope path and the remaining keyword.
///
/// Without the directive prefix the whole (trimmed) input is the keyword and
/// the scope is empty, meaning the index root. With the prefix, characters up
/// to the first unescaped space form the scope; a backslash escapes the
/// following character and is dropped from the output. A trailing lone
/// backslash is kept as a literal rather than treated as an error.
#[must_use]
pub fn parse(raw: &str) -> (String, String) {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return (String::new(), String::new());
    }

    let Some(rest) = trimmed.strip_prefix(SCOPE_DIRECTIVE) else {
        return (String::new(), trimmed.to_string());
    };
    let rest = rest.trim_start();

    let mut scope = String::new();
    let mut escaped = false;
    let mut keyword_start = None;
    for (index, ch) in rest.char_indices() {
        if escaped {
            scope.push(ch);
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == ' ' {
            keyword_start = Some(index + 1);
            break;
        } else {
            scope.push(ch);
        }
    }
    if escaped {
        scope.push('\\');
    }

    let keyword = keyword_start
        .map(|start| rest[start..].trim().to_string())
        .unwrap_or_default();
    (scope, keyword)
}

/// Escape a scope path for redisplay inside a query string.
///
/// Doubles literal backslashes and prefixes literal spaces with a backslash;
/// the exact inverse of [`parse`]'s unescaping.
#[must_use]
pub fn escape(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for ch in path.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            ' ' => out.push_str("\\ "),
            _ => out.push(ch),
        }
    }
    out
}

/// A parsed query with every derived field a session needs.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub raw: String,
    /// Scope path; empty means the index root.
    pub scope: String,
    /// Everything after scope removal and trimming.
    pub keyword: String,
    /// True iff neither scope nor keyword contains an uppercase letter.
    pub ignore_case: bool,
    /// Keyword tokens before the last one, matched against directory parts.
    pub directory_keywords: Vec<String>,
    /// The last keyword token, matched against entry names.
    pub file_keyword: String,
    /// `file_keyword` without its extension.
    pub keyword_stem: String,
    /// Extension of `file_keyword` including the dot, or empty.
    pub keyword_extension: String,
}

impl Query {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let (scope, keyword) = parse(raw);
        let ignore_case = !scope.chars().any(char::is_uppercase)
            && !keyword.chars().any(char::is_uppercase);

        let mut tokens: Vec<&str> = keyword.split_whitespace().collect();
        let file_keyword = tokens.pop().unwrap_or_default().to_string();
        let directory_keywords = tokens.into_iter().map(str::to_string).collect();
        let (keyword_stem, keyword_extension) = split_extension(&file_keyword);

        Self {
            raw: raw.to_string(),
            scope,
            keyword,
            ignore_case,
            directory_keywords,
            file_keyword,
            keyword_stem,
            keyword_extension,
        }
    }

    #[must_use]
    pub fn has_extension(&self) -> bool {
        !self.keyword_extension.is_empty()
    }

    #[must_use]
    pub fn keyword_len(&self) -> usize {
        self.keyword.chars().count()
    }
}

/// Split a keyword token at its last dot. A leading or trailing dot carries
/// no extension.
fn split_extension(token: &str) -> (String, String) {
    match token.rfind('.') {
        Some(index) if index > 0 && index + 1 < token.len() => {
            (token[..index].to_string(), token[index..].to_string())
        }
        Some(index) if index > 0 => (token[..index].to_string(), String::new()),
        _ => (token.to_string(), String::new()),
    }
}
