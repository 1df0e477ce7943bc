use super::error::PatternError;
use super::MatchMode;
use crate::params::Params;

use std::fmt;
use std::sync::Arc;

use regex::{Regex, RegexBuilder};

const SLASH: char = '/';
const WILDCARD: &str = "*";

const DEFAULT_SEGMENT: &str = "[^/]+?";

// <prefix>:<name>(<custom>)?<modifier>?
const KEY_SEGMENT: &str = r"^(.*)?:(\w+)(?:\(((?:\\.|[^()])+)\))?([+*?])?$";
// <prefix>(<custom>)<modifier>?
const NON_KEY_SEGMENT: &str = r"^(.*)?\(((?:\\.|[^()])+)\)([+*?])?$";

const EXACT_END: &str = "/?$";
const PREFIX_END: &str = "(?:/.*)?$";

/// Translates route patterns into anchored regular expressions.
///
/// The two segment classifiers are built once here and borrowed by every
/// call to [`compile`](PatternCompiler::compile).
pub struct PatternCompiler {
    key: Regex,
    non_key: Regex,
    case_sensitive: bool,
}

/// The executable form of a route pattern.
///
/// `names[i]` is the parameter bound by capture group `i + 1`.
#[derive(Clone)]
pub struct CompiledPattern {
    regex: Regex,
    names: Box<[Arc<str>]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Modifier {
    One,
    Optional,
    OneOrMore,
    ZeroOrMore,
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Wildcard,
    Literal(&'a str),
    Capture {
        prefix: &'a str,
        name: Option<&'a str>,
        custom: Option<&'a str>,
        modifier: Modifier,
    },
}

impl Default for PatternCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PatternCompiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternCompiler")
            .field("case_sensitive", &self.case_sensitive)
            .finish()
    }
}

impl PatternCompiler {
    pub fn new() -> Self {
        Self {
            key: Regex::new(KEY_SEGMENT).expect("key segment classifier must compile"),
            non_key: Regex::new(NON_KEY_SEGMENT).expect("non-key segment classifier must compile"),
            case_sensitive: true,
        }
    }

    pub fn case_sensitive(mut self, yes: bool) -> Self {
        self.case_sensitive = yes;
        self
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn compile(&self, pattern: &str, mode: MatchMode) -> Result<CompiledPattern, PatternError> {
        let mut expr = String::with_capacity(pattern.len() * 2 + 16);
        let mut names: Vec<Arc<str>> = Vec::new();
        let mut unnamed: usize = 0;

        expr.push('^');

        let mut segments = pattern.split(SLASH).filter(|s| !s.is_empty()).peekable();

        if segments.peek().is_none() {
            expr.push_str(match mode {
                MatchMode::Exact => "/$",
                MatchMode::Prefix => "/.*$",
            });
        } else {
            for part in segments {
                match self.classify(part) {
                    Segment::Wildcard => expr.push_str("/.*"),
                    Segment::Literal(text) => {
                        expr.push(SLASH);
                        expr.push_str(&regex::escape(text));
                    }
                    Segment::Capture {
                        prefix,
                        name,
                        custom,
                        modifier,
                    } => {
                        let name: Arc<str> = match name {
                            Some(name) => name.into(),
                            None => {
                                let name = unnamed.to_string();
                                unnamed += 1;
                                name.into()
                            }
                        };
                        names.push(name);
                        push_capture(&mut expr, prefix, custom, modifier);
                    }
                }
            }
            expr.push_str(match mode {
                MatchMode::Exact => EXACT_END,
                MatchMode::Prefix => PREFIX_END,
            });
        }

        let regex = RegexBuilder::new(&expr)
            .case_insensitive(!self.case_sensitive)
            .build()
            .map_err(|source| PatternError::InvalidRegex {
                pattern: pattern.into(),
                source,
            })?;

        let found = regex.captures_len() - 1;
        if found != names.len() {
            return Err(PatternError::GroupCountMismatch {
                pattern: pattern.into(),
                expected: names.len(),
                found,
            });
        }

        Ok(CompiledPattern {
            regex,
            names: names.into_boxed_slice(),
        })
    }

    fn classify<'a>(&self, part: &'a str) -> Segment<'a> {
        if part == WILDCARD {
            return Segment::Wildcard;
        }

        if let Some(caps) = self.key.captures(part) {
            return Segment::Capture {
                prefix: caps.get(1).map_or("", |m| m.as_str()),
                name: caps.get(2).map(|m| m.as_str()),
                custom: caps.get(3).map(|m| m.as_str()),
                modifier: Modifier::from_match(caps.get(4).map(|m| m.as_str())),
            };
        }

        if let Some(caps) = self.non_key.captures(part) {
            return Segment::Capture {
                prefix: caps.get(1).map_or("", |m| m.as_str()),
                name: None,
                custom: caps.get(2).map(|m| m.as_str()),
                modifier: Modifier::from_match(caps.get(3).map(|m| m.as_str())),
            };
        }

        Segment::Literal(part)
    }
}

impl Modifier {
    fn from_match(s: Option<&str>) -> Self {
        match s {
            Some("?") => Self::Optional,
            Some("+") => Self::OneOrMore,
            Some("*") => Self::ZeroOrMore,
            _ => Self::One,
        }
    }
}

fn push_capture(expr: &mut String, prefix: &str, custom: Option<&str>, modifier: Modifier) {
    // a custom constraint may contain a top-level alternation
    let e: String = match custom {
        Some(custom) => format!("(?:{})", custom),
        None => DEFAULT_SEGMENT.to_owned(),
    };
    let p = regex::escape(prefix);

    let fragment = match modifier {
        Modifier::OneOrMore => format!("/{p}({e}(?:/{e})*)", p = p, e = e),
        Modifier::Optional if p.is_empty() => format!("(?:/({e}))?", e = e),
        Modifier::Optional => format!("/{p}(?:({e}))?", p = p, e = e),
        Modifier::ZeroOrMore if p.is_empty() => format!("(?:/({e}(?:/{e})*))?", e = e),
        Modifier::ZeroOrMore => format!("/{p}(?:({e}(?:/{e})*))?", p = p, e = e),
        Modifier::One => format!("/{p}(?:({e}))", p = p, e = e),
    };
    expr.push_str(&fragment);
}

impl CompiledPattern {
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn names(&self) -> &[Arc<str>] {
        &self.names
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Runs the pattern against `path`, binding only the groups that took
    /// part in the match.
    pub fn captures(&self, path: &str) -> Option<Params> {
        let caps = self.regex.captures(path)?;
        let mut params = Params::new();
        for (i, name) in self.names.iter().enumerate() {
            if let Some(m) = caps.get(i + 1) {
                params.push(Arc::clone(name), m.as_str());
            }
        }
        Some(params)
    }
}

impl fmt::Debug for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledPattern")
            .field("regex", &self.regex.as_str())
            .field("names", &self.names)
            .finish()
    }
}
