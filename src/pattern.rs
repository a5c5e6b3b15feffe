//! Pattern parsing and name substitution.
//!
//! Patterns are given either as a bare literal (`.scss`) or in delimited form
//! with trailing flags (`/(.+)\.scss$/i`). Parsing produces a [`PatternSpec`]
//! that knows nothing about the regex engine; [`Pattern`] compiles it.
//!
//! Replacement templates reference capture groups with `$1` … `$99`, the
//! whole match with `$&`, named groups with `$<name>`, and a literal dollar
//! with `$$`.

use crate::error::{Error, Result};
use regex::{Captures, Regex, RegexBuilder, Replacer};

/// Flags accepted after the closing delimiter of a `/pattern/flags` literal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    /// `g`: replace every match instead of the first one
    pub global: bool,
    /// `i`: case-insensitive matching
    pub case_insensitive: bool,
    /// `m`: `^` and `$` match at line boundaries
    pub multi_line: bool,
    /// `s`: `.` also matches newlines
    pub dot_all: bool,
    /// `u`: unicode mode (always on, accepted for compatibility)
    pub unicode: bool,
}

impl Flags {
    /// Parses a flag string such as `"gi"`.
    ///
    /// # Errors
    ///
    /// Returns the reason as a string if a flag is unknown or repeated.
    pub fn parse(flags: &str) -> std::result::Result<Self, String> {
        let mut parsed = Self::default();

        for flag in flags.chars() {
            let slot = match flag {
                'g' => &mut parsed.global,
                'i' => &mut parsed.case_insensitive,
                'm' => &mut parsed.multi_line,
                's' => &mut parsed.dot_all,
                'u' => &mut parsed.unicode,
                other => return Err(format!("unsupported flag '{other}'")),
            };

            if *slot {
                return Err(format!("flag '{flag}' given more than once"));
            }
            *slot = true;
        }

        Ok(parsed)
    }
}

/// A parsed but not yet compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSpec {
    /// Text matched verbatim.
    Literal(String),
    /// A regular expression body with its flags.
    Regex {
        /// Expression between the delimiters
        source: String,
        /// Trailing flags
        flags: Flags,
    },
}

impl PatternSpec {
    /// Parses user input into a pattern spec.
    ///
    /// Input is treated as delimited when it starts with `/` and contains a
    /// later `/` with a non-empty body in between; anything else is a literal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PatternSyntax`] for empty input or invalid flags.
    pub fn parse(input: &str) -> Result<Self> {
        if input.is_empty() {
            return Err(Error::pattern_syntax(input, "pattern is empty"));
        }

        if let Some(rest) = input.strip_prefix('/') {
            if let Some(end) = rest.rfind('/') {
                let (source, flags) = (&rest[..end], &rest[end + 1..]);
                if !source.is_empty() {
                    let flags =
                        Flags::parse(flags).map_err(|reason| Error::pattern_syntax(input, reason))?;
                    return Ok(Self::Regex {
                        source: source.to_string(),
                        flags,
                    });
                }
            }
        }

        Ok(Self::Literal(input.to_string()))
    }
}

/// A compiled find or ignore pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    raw: String,
    regex: Regex,
    global: bool,
}

impl Pattern {
    /// Parses and compiles a pattern from user input.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PatternSyntax`] naming the offending input if it
    /// cannot be parsed or the expression is rejected by the regex engine.
    pub fn new(input: &str) -> Result<Self> {
        let spec = PatternSpec::parse(input)?;
        Self::compile(input, &spec)
    }

    /// Compiles an already parsed spec. `raw` is kept for error reporting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PatternSyntax`] if the expression does not compile.
    pub fn compile(raw: &str, spec: &PatternSpec) -> Result<Self> {
        let (source, flags) = match spec {
            PatternSpec::Literal(text) => (regex::escape(text), Flags::default()),
            PatternSpec::Regex { source, flags } => (source.clone(), *flags),
        };

        let regex = RegexBuilder::new(&source)
            .case_insensitive(flags.case_insensitive)
            .multi_line(flags.multi_line)
            .dot_matches_new_line(flags.dot_all)
            .build()
            .map_err(|e| Error::pattern_syntax(raw, e.to_string()))?;

        Ok(Self {
            raw: raw.to_string(),
            regex,
            global: flags.global,
        })
    }

    /// Returns the pattern as the user wrote it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Tests the pattern against `text`.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Substitutes the first match (every match with `g`) using `template`.
    #[must_use]
    pub fn replace(&self, text: &str, template: &Template) -> String {
        if self.global {
            self.regex.replace_all(text, template).into_owned()
        } else {
            self.regex.replace(text, template).into_owned()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Literal(String),
    /// `$n` or `$nn`. The second digit binds only when that group exists.
    Group { first: usize, second: Option<usize> },
    Named(String),
    WholeMatch,
}

/// A parsed replacement template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    raw: String,
    parts: Vec<Part>,
}

impl Template {
    /// Parses a replacement template.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PatternSyntax`] for an unterminated `$<name>` reference.
    pub fn parse(template: &str) -> Result<Self> {
        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut rest = template;

        while let Some(pos) = rest.find('$') {
            literal.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];

            match after.chars().next() {
                Some('$') => {
                    literal.push('$');
                    rest = &after[1..];
                }
                Some('&') => {
                    flush(&mut literal, &mut parts);
                    parts.push(Part::WholeMatch);
                    rest = &after[1..];
                }
                Some(digit @ '0'..='9') => {
                    let first = digit_value(digit);
                    let second = after[1..]
                        .chars()
                        .next()
                        .filter(char::is_ascii_digit)
                        .map(digit_value);

                    flush(&mut literal, &mut parts);
                    parts.push(Part::Group { first, second });
                    rest = &after[1 + usize::from(second.is_some())..];
                }
                Some('<') => match after.find('>') {
                    Some(end) if end > 1 => {
                        flush(&mut literal, &mut parts);
                        parts.push(Part::Named(after[1..end].to_string()));
                        rest = &after[end + 1..];
                    }
                    _ => {
                        return Err(Error::pattern_syntax(
                            template,
                            "unterminated `$<name>` group reference",
                        ));
                    }
                },
                _ => {
                    literal.push('$');
                    rest = after;
                }
            }
        }

        literal.push_str(rest);
        flush(&mut literal, &mut parts);

        Ok(Self {
            raw: template.to_string(),
            parts,
        })
    }

    /// Returns the template as the user wrote it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Appends the expansion of this template for one match to `dst`.
    ///
    /// Groups that do not exist or did not participate expand to nothing.
    pub fn expand(&self, caps: &Captures<'_>, dst: &mut String) {
        let group = |index: usize| caps.get(index).map_or("", |m| m.as_str());

        for part in &self.parts {
            match part {
                Part::Literal(text) => dst.push_str(text),
                Part::WholeMatch => dst.push_str(group(0)),
                Part::Named(name) => dst.push_str(caps.name(name).map_or("", |m| m.as_str())),
                Part::Group { first, second } => match *second {
                    Some(second) if first * 10 + second < caps.len() => {
                        dst.push_str(group(first * 10 + second));
                    }
                    Some(second) => {
                        dst.push_str(group(*first));
                        dst.push_str(&second.to_string());
                    }
                    None => dst.push_str(group(*first)),
                },
            }
        }
    }
}

impl Replacer for &Template {
    fn replace_append(&mut self, caps: &Captures<'_>, dst: &mut String) {
        self.expand(caps, dst);
    }
}

fn flush(literal: &mut String, parts: &mut Vec<Part>) {
    if !literal.is_empty() {
        parts.push(Part::Literal(std::mem::take(literal)));
    }
}

fn digit_value(digit: char) -> usize {
    digit.to_digit(10).map_or(0, |d| d as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rename(find: &str, replace: &str, name: &str) -> String {
        let pattern = Pattern::new(find).unwrap();
        let template = Template::parse(replace).unwrap();
        pattern.replace(name, &template)
    }

    #[test]
    fn test_delimited_pattern_with_flags() {
        let spec = PatternSpec::parse("/foo.*/gi").unwrap();
        assert_eq!(
            spec,
            PatternSpec::Regex {
                source: "foo.*".to_string(),
                flags: Flags {
                    global: true,
                    case_insensitive: true,
                    ..Flags::default()
                },
            }
        );
    }

    #[test]
    fn test_last_slash_closes_the_body() {
        let spec = PatternSpec::parse(r"/a\/b/").unwrap();
        assert_eq!(
            spec,
            PatternSpec::Regex {
                source: r"a\/b".to_string(),
                flags: Flags::default(),
            }
        );
    }

    #[test]
    fn test_bare_literal() {
        assert_eq!(
            PatternSpec::parse("file.txt").unwrap(),
            PatternSpec::Literal("file.txt".to_string())
        );
        assert_eq!(
            PatternSpec::parse("/unclosed").unwrap(),
            PatternSpec::Literal("/unclosed".to_string())
        );
        assert_eq!(
            PatternSpec::parse("//").unwrap(),
            PatternSpec::Literal("//".to_string())
        );
    }

    #[test]
    fn test_literal_is_matched_verbatim() {
        let pattern = Pattern::new("a.b").unwrap();
        assert!(pattern.is_match("a.b"));
        assert!(!pattern.is_match("axb"));
    }

    #[test]
    fn test_invalid_flags() {
        let err = PatternSpec::parse("/foo/y").unwrap_err();
        assert!(err.is_pattern_syntax());
        assert!(err.to_string().contains("/foo/y"));

        assert!(PatternSpec::parse("/foo/gg").is_err());
        assert!(PatternSpec::parse("").is_err());
    }

    #[test]
    fn test_invalid_regex_reports_offending_literal() {
        let err = Pattern::new("/(unclosed/").unwrap_err();
        assert!(err.is_pattern_syntax());
        assert!(err.to_string().contains("/(unclosed/"));
    }

    #[test]
    fn test_case_insensitive_flag() {
        let pattern = Pattern::new("/readme/i").unwrap();
        assert!(pattern.is_match("README.md"));
        assert!(!Pattern::new("/readme/").unwrap().is_match("README.md"));
    }

    #[test]
    fn test_capture_group_substitution() {
        assert_eq!(rename(r"/(.+)\.scss$/", "$1.css", "style.scss"), "style.css");
    }

    #[test]
    fn test_first_match_only_without_global_flag() {
        assert_eq!(rename("/o/", "0", "foo"), "f0o");
        assert_eq!(rename("/o/g", "0", "foo"), "f00");
        assert_eq!(rename("o", "0", "foo"), "f0o");
    }

    #[test]
    fn test_special_references() {
        assert_eq!(rename("/b+/", "[$&]", "abbc"), "a[bb]c");
        assert_eq!(rename("/b/", "$$1", "abc"), "a$1c");
        assert_eq!(rename("/b/", "$x", "abc"), "a$xc");
        assert_eq!(rename("/(?P<stem>.+)-old/", "$<stem>-new", "photo-old"), "photo-new");
    }

    #[test]
    fn test_absent_groups_expand_to_nothing() {
        assert_eq!(rename("/(a)|(b)/", "[$1$2]", "b"), "[b]");
        assert_eq!(rename("/(a)/", "[$5]", "a"), "[]");
        assert_eq!(rename("/(a)/", "[$<missing>]", "a"), "[]");
    }

    #[test]
    fn test_two_digit_group_binds_only_when_it_exists() {
        assert_eq!(rename("/(a)/", "$10", "a"), "a0");

        let twelve = "/(a)(b)(c)(d)(e)(f)(g)(h)(i)(j)(k)(l)/";
        assert_eq!(rename(twelve, "$12", "abcdefghijkl"), "l");
    }

    #[test]
    fn test_unterminated_named_reference() {
        let err = Template::parse("$<name").unwrap_err();
        assert!(err.is_pattern_syntax());
    }

    #[test]
    fn test_raw_text_is_kept_for_logging() {
        assert_eq!(Pattern::new("/(.+)\\.scss$/gi").unwrap().as_str(), "/(.+)\\.scss$/gi");
        assert_eq!(Template::parse("$1.css").unwrap().as_str(), "$1.css");
    }
}
