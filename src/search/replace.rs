use crate::domain::Note;
use crate::error::ScratchError;
use crate::search::matcher::MatchSet;
use regex::{NoExpand, Regex, RegexBuilder};

/// Escapes every pattern metacharacter in `text` so it matches only itself.
///
/// Covers at least `. * + ? ^ $ { } ( ) | [ ] \`; the output is always a
/// valid pattern for a literal match.
pub fn escape_literal(text: &str) -> String {
    regex::escape(text)
}

/// A compiled, case-insensitive pattern matching one literal string.
#[derive(Debug, Clone)]
pub struct LiteralPattern {
    literal: String,
    regex: Regex,
}

impl LiteralPattern {
    /// Compiles `literal` as a case-insensitive literal pattern.
    ///
    /// Returns [`ScratchError::PatternEscapeDefect`] if the engine rejects the
    /// escaped text, which only happens past its compiled-size limit.
    pub fn new(literal: &str) -> Result<Self, ScratchError> {
        let regex = RegexBuilder::new(&escape_literal(literal))
            .case_insensitive(true)
            .build()?;

        Ok(LiteralPattern {
            literal: literal.to_owned(),
            regex,
        })
    }

    pub fn literal(&self) -> &str {
        &self.literal
    }

    pub fn is_match(&self, text: &str) -> bool {
        !self.literal.is_empty() && self.regex.is_match(text)
    }

    /// Number of non-overlapping occurrences in `text`.
    pub fn count(&self, text: &str) -> usize {
        if self.literal.is_empty() {
            return 0;
        }
        self.regex.find_iter(text).count()
    }

    /// Replaces every occurrence with `replacement`, inserted verbatim.
    ///
    /// `$1`, `${name}` and `$$` in `replacement` are not expanded. An empty
    /// literal leaves `text` as is.
    pub fn replace_all(&self, text: &str, replacement: &str) -> String {
        if self.literal.is_empty() {
            return text.to_owned();
        }
        self.regex
            .replace_all(text, NoExpand(replacement))
            .into_owned()
    }
}

/// A search term paired with the text that should take its place.
#[derive(Debug, Clone)]
pub struct ReplaceSpec {
    pattern: LiteralPattern,
    replacement: String,
}

impl ReplaceSpec {
    pub fn new(query: &str, replacement: &str) -> Result<Self, ScratchError> {
        Ok(ReplaceSpec {
            pattern: LiteralPattern::new(query)?,
            replacement: replacement.to_owned(),
        })
    }

    /// Builds a spec replacing the term `matches` was searched with.
    pub fn for_matches(matches: &MatchSet, replacement: &str) -> Result<Self, ScratchError> {
        Self::new(matches.term(), replacement)
    }

    pub fn query(&self) -> &str {
        self.pattern.literal()
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn pattern(&self) -> &LiteralPattern {
        &self.pattern
    }
}

/// A proposed edit: a matched note and the note it would become.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    original: Note,
    mutated: Note,
}

impl Candidate {
    pub fn original(&self) -> &Note {
        &self.original
    }

    pub fn mutated(&self) -> &Note {
        &self.mutated
    }

    /// True when the replace produced identical content, e.g. when the
    /// replacement equals the query. Such candidates are still written.
    pub fn is_unchanged(&self) -> bool {
        self.original.content() == self.mutated.content()
    }

    pub fn into_parts(self) -> (Note, Note) {
        (self.original, self.mutated)
    }
}

/// Applies `spec` to every note of `matches`, one candidate per note, in order.
///
/// Every candidate keeps its note's id, creation time and attachment; only
/// the content is rewritten. Notes outside `matches` are unreachable from here.
pub fn apply(matches: &MatchSet, spec: &ReplaceSpec) -> Vec<Candidate> {
    matches
        .iter()
        .map(|note| {
            let content = spec.pattern.replace_all(note.content(), &spec.replacement);
            Candidate {
                original: note.clone(),
                mutated: note.with_content(content),
            }
        })
        .collect()
}
