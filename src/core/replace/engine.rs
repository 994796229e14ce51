//! Match-replace engine with a per-occurrence accept/reject decision.

use regex::{Captures, Regex};
use serde::Serialize;

use super::context::MatchContext;
use crate::error::{Error, Result};

/// What to search for and what to put in its place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchSpec {
    pub pattern: String,
    /// Replacement template. Capture references (`$1`, `${name}`) are only
    /// expanded when `is_regex` is set; otherwise the text is inserted verbatim.
    pub replacement: String,
    pub is_regex: bool,
}

impl MatchSpec {
    pub fn literal(pattern: &str, replacement: &str) -> Self {
        MatchSpec {
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
            is_regex: false,
        }
    }

    pub fn regex(pattern: &str, replacement: &str) -> Self {
        MatchSpec {
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
            is_regex: true,
        }
    }
}

/// Per-occurrence decision strategy: `true` applies the replacement, `false`
/// leaves this occurrence as it is and scanning continues after it.
pub trait Decide {
    fn decide(&mut self, context: &MatchContext) -> bool;
}

impl<F> Decide for F
where
    F: FnMut(&MatchContext) -> bool,
{
    fn decide(&mut self, context: &MatchContext) -> bool {
        self(context)
    }
}

/// Non-interactive strategy: every occurrence is applied.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl Decide for AcceptAll {
    fn decide(&mut self, _context: &MatchContext) -> bool {
        true
    }
}

/// A compiled `MatchSpec`.
#[derive(Debug, Clone)]
pub struct Replacer {
    spec: MatchSpec,
    regex: Regex,
}

impl Replacer {
    /// Compile the spec. Literal patterns are escaped first so that regex
    /// metacharacters in them match themselves.
    pub fn new(spec: &MatchSpec) -> Result<Self> {
        if !spec.is_regex && spec.pattern.is_empty() {
            return Err(Error::validation_invalid_argument(
                "search",
                "Search term must not be empty",
                None,
            ));
        }

        let source = if spec.is_regex {
            spec.pattern.clone()
        } else {
            regex::escape(&spec.pattern)
        };

        let regex =
            Regex::new(&source).map_err(|e| Error::pattern_invalid(&spec.pattern, e.to_string()))?;

        Ok(Replacer {
            spec: spec.clone(),
            regex,
        })
    }

    pub fn spec(&self) -> &MatchSpec {
        &self.spec
    }

    /// Replace occurrences in `text`, asking `decide` about each one.
    ///
    /// Occurrences are visited left to right, without overlap, exactly once.
    /// The context handed to `decide` is taken from the text as rewritten so
    /// far followed by the untouched remainder, so the lines before a match
    /// already show any earlier replacement that was accepted in this pass.
    pub fn execute(&self, text: &str, decide: &mut dyn Decide) -> String {
        self.scan(text, Some(decide))
    }

    /// Replace every occurrence without building any context.
    pub fn replace_all(&self, text: &str) -> String {
        self.scan(text, None)
    }

    fn scan(&self, text: &str, mut decide: Option<&mut dyn Decide>) -> String {
        let mut result = String::with_capacity(text.len());
        let mut pos = 0;
        let mut last_end = None;

        // Matching runs on the whole input from `pos` so anchors and word
        // boundaries see the real neighbouring text.
        while let Some(caps) = self.regex.captures_at(text, pos) {
            let Some(found) = caps.get(0) else {
                break;
            };

            // An empty match where the previous match ended is not a new
            // occurrence. Step over one character and search again.
            if found.is_empty() && last_end == Some(found.start()) {
                match text[pos..].chars().next() {
                    Some(c) => {
                        result.push(c);
                        pos += c.len_utf8();
                        continue;
                    }
                    None => break,
                }
            }

            result.push_str(&text[pos..found.start()]);
            let replacement = self.expand(&caps);

            let accepted = match decide.as_mut() {
                Some(decide) => {
                    let context = MatchContext::around(
                        &result,
                        &text[found.start()..],
                        found.len(),
                        &replacement,
                    );
                    decide.decide(&context)
                }
                None => true,
            };

            if accepted {
                result.push_str(&replacement);
            } else {
                result.push_str(found.as_str());
            }
            pos = found.end();
            last_end = Some(pos);
        }

        result.push_str(&text[pos..]);
        result
    }

    fn expand(&self, caps: &Captures<'_>) -> String {
        if self.spec.is_regex {
            let mut replacement = String::new();
            caps.expand(&self.spec.replacement, &mut replacement);
            replacement
        } else {
            self.spec.replacement.clone()
        }
    }
}
