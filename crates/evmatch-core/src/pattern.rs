//! Compiled naming patterns.
//!
//! A `Pattern` is compiled once from a template such as
//! `$prefix_$feature_$action` and then reused to decompose names into
//! `Components` (`parse`) and to compose names from them (`build`).

use std::fmt;

use evmatch_template::{Part, Tag, TemplateAst, parse_template};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::components::{Components, ParseMiss, ParseStrategy, ParsedName};
use crate::error::{BuildError, PatternError, PatternErrorKind};
use crate::keywords::ActionKeywords;
use crate::normalize::{
    COMMON_SEPARATORS, file_name_of, pascal_case, split_on, split_words, strip_audio_extension,
    strip_extension, trim_seps,
};

static DIGIT_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+$").expect("digit suffix regex is valid"));

static LETTER_AFTER_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{N}]([A-Z])$").expect("letter suffix regex is valid"));

static LETTER_AFTER_LOWER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{Ll}\p{N}]([A-Z])$").expect("camel letter regex is valid"));

/// How placeholder values are delimited in a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Separators {
    /// Values are delimited by any of these characters.
    Chars(Vec<char>),
    /// No delimiters; values are told apart by capitalization.
    CamelCase,
}

impl Separators {
    /// Parse the configuration form: `none`, `camel` or an empty string select
    /// CamelCase, anything else is the list of separator characters.
    pub fn from_setting(setting: &str) -> Self {
        let s = setting.trim();
        if s.is_empty()
            || s.eq_ignore_ascii_case("none")
            || s.eq_ignore_ascii_case("camel")
            || s.eq_ignore_ascii_case("camelcase")
        {
            return Separators::CamelCase;
        }
        let mut chars: Vec<char> = Vec::new();
        for c in s.chars() {
            if !chars.contains(&c) {
                chars.push(c);
            }
        }
        Separators::Chars(chars)
    }

    /// Separators implied by the literals between placeholders.
    fn infer(ast: &TemplateAst) -> Self {
        let mut chars: Vec<char> = Vec::new();
        for lit in inner_literals(ast) {
            for c in lit.chars().filter(|c| !c.is_alphanumeric()) {
                if !chars.contains(&c) {
                    chars.push(c);
                }
            }
        }

        if !chars.is_empty() {
            Separators::Chars(chars)
        } else if ast.tags().count() <= 1 {
            Separators::Chars(vec!['_'])
        } else {
            Separators::CamelCase
        }
    }

    pub fn is_camel_case(&self) -> bool {
        matches!(self, Separators::CamelCase)
    }
}

impl fmt::Display for Separators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Separators::Chars(chars) => write!(f, "{}", chars.iter().collect::<String>()),
            Separators::CamelCase => f.write_str("none"),
        }
    }
}

/// One element of a compiled template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(Tag),
}

/// A compiled naming template. Immutable; cheap to share across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    template: String,
    separators: Separators,
    segments: Vec<Segment>,
    /// Literal text before the first placeholder.
    lead: String,
    /// Literal text after the last placeholder.
    trail: String,
    /// Placeholders filled from tokens, in order. A trailing `$variation` is
    /// captured from the iterator suffix instead and is not a slot.
    slots: Vec<Tag>,
    trailing_variation: bool,
    required: Vec<Tag>,
}

type Strategy = fn(&Pattern, &Prepared<'_>) -> Option<Components>;

/// Parse strategies in order of decreasing strictness. The first one that
/// yields every required tag wins.
const STRATEGIES: [(ParseStrategy, Strategy); 3] = [
    (ParseStrategy::Strict, strict_split),
    (ParseStrategy::Flexible, flexible_split),
    (ParseStrategy::Fuzzy, fuzzy_action),
];

/// A name after extension, template-literal and iterator stripping.
struct Prepared<'a> {
    body: &'a str,
    tokens: Vec<(usize, usize)>,
    variation: Option<String>,
    iterator: Option<String>,
    boundary: Vec<char>,
    keywords: &'a ActionKeywords,
}

impl Pattern {
    /// Compile with separators inferred from the template.
    pub fn new(template: &str) -> Result<Self, PatternError> {
        let ast = parse_template(template).map_err(|e| PatternError::from_parse(template, e))?;
        let separators = Separators::infer(&ast);
        Self::from_ast(template, &ast, separators)
    }

    pub fn compile(template: &str, separators: Separators) -> Result<Self, PatternError> {
        let ast = parse_template(template).map_err(|e| PatternError::from_parse(template, e))?;
        Self::from_ast(template, &ast, separators)
    }

    fn from_ast(
        template: &str,
        ast: &TemplateAst,
        separators: Separators,
    ) -> Result<Self, PatternError> {
        if let Separators::Chars(chars) = &separators {
            if chars.is_empty() {
                return Err(PatternError::new(template, 0, PatternErrorKind::NoSeparators));
            }
            if let Some(&c) = chars.iter().find(|c| c.is_alphanumeric() || **c == '$') {
                return Err(PatternError::new(
                    template,
                    0,
                    PatternErrorKind::InvalidSeparator(c),
                ));
            }
            check_adjacency(template, ast, chars)?;
        }

        let segments: Vec<Segment> = ast
            .parts
            .iter()
            .map(|p| match p {
                Part::Literal(l) => Segment::Literal(l.value.clone()),
                Part::Placeholder(ph) => Segment::Placeholder(ph.tag),
            })
            .collect();

        let lead = match segments.first() {
            Some(Segment::Literal(s)) => s.clone(),
            _ => String::new(),
        };
        let trail = match segments.last() {
            Some(Segment::Literal(s)) if segments.len() > 1 => s.clone(),
            _ => String::new(),
        };

        let mut slots: Vec<Tag> = ast.tags().collect();
        let trailing_variation = slots.last() == Some(&Tag::Variation);
        if trailing_variation {
            slots.pop();
        }
        let required = ast.tags().filter(|t| *t != Tag::Variation).collect();

        tracing::debug!(template, separators = %separators, "compiled pattern");

        Ok(Self {
            template: template.to_string(),
            separators,
            segments,
            lead,
            trail,
            slots,
            trailing_variation,
            required,
        })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn separators(&self) -> &Separators {
        &self.separators
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_camel_case(&self) -> bool {
        self.separators.is_camel_case()
    }

    /// Placeholder tags in template order.
    pub fn placeholders(&self) -> impl Iterator<Item = Tag> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(t) => Some(*t),
            Segment::Literal(_) => None,
        })
    }

    pub fn has_tag(&self, tag: Tag) -> bool {
        self.placeholders().any(|t| t == tag)
    }

    /// Tags a parse must produce and a build must receive.
    pub fn required_tags(&self) -> &[Tag] {
        &self.required
    }

    /// The same template re-expressed with other separators. Literals between
    /// placeholders made only of separator characters become the first new
    /// separator, or disappear in CamelCase; all other literals are kept.
    pub fn with_separators(&self, separators: Separators) -> Result<Pattern, PatternError> {
        let joiner = match &separators {
            Separators::Chars(chars) => chars.first().map(char::to_string).unwrap_or_default(),
            Separators::CamelCase => String::new(),
        };
        let is_placeholder = |s: &Segment| matches!(s, Segment::Placeholder(_));
        let first = self.segments.iter().position(is_placeholder).unwrap_or(0);
        let last = self.segments.iter().rposition(is_placeholder).unwrap_or(0);
        let current = self.split_chars();

        let mut template = String::new();
        for (i, seg) in self.segments.iter().enumerate() {
            match seg {
                Segment::Placeholder(tag) => {
                    template.push('$');
                    template.push_str(tag.as_str());
                }
                Segment::Literal(s) => {
                    let inner = i > first && i < last;
                    if inner && s.chars().all(|c| current.contains(&c)) {
                        template.push_str(&joiner);
                    } else {
                        template.push_str(&s.replace('$', "$$"));
                    }
                }
            }
        }
        Pattern::compile(&template, separators)
    }

    /// Decompose `name` using the built-in action keywords for the fuzzy step.
    pub fn parse(&self, name: &str) -> Result<ParsedName, ParseMiss> {
        self.parse_with(name, ActionKeywords::builtin())
    }

    /// Decompose `name` (a bare name or a path; directory and extension are
    /// ignored).
    pub fn parse_with(
        &self,
        name: &str,
        keywords: &ActionKeywords,
    ) -> Result<ParsedName, ParseMiss> {
        let prepared = self.prepare(name, keywords);

        let found = STRATEGIES.iter().find_map(|(strategy, run)| {
            run(self, &prepared)
                .filter(|c| self.satisfies(c))
                .map(|c| (*strategy, c))
        });

        match found {
            Some((strategy, mut components)) => {
                if let Some(v) = &prepared.variation {
                    components.insert(Tag::Variation, v.clone());
                }
                tracing::trace!(name, ?strategy, "parsed name");
                Ok(ParsedName {
                    components,
                    iterator: prepared.iterator,
                    strategy,
                })
            }
            None => {
                tracing::debug!(name, tokens = prepared.tokens.len(), "no parse strategy matched");
                Err(ParseMiss {
                    name: name.to_string(),
                    tokens: prepared.tokens.len(),
                    slots: self.slots.len(),
                })
            }
        }
    }

    /// Compose a name from components using this pattern's literals and
    /// separator style.
    pub fn build(&self, components: &Components) -> Result<String, BuildError> {
        if let Some(&missing) = self.required.iter().find(|t| !components.has(**t)) {
            return Err(BuildError {
                template: self.template.clone(),
                missing,
            });
        }

        let skip = self.skipped_segments(components);
        let mut out = String::new();
        for (i, seg) in self.segments.iter().enumerate() {
            if skip.contains(&i) {
                continue;
            }
            match seg {
                Segment::Literal(s) => out.push_str(s),
                Segment::Placeholder(tag) => {
                    let value = components.get(*tag).unwrap_or_default();
                    if self.is_camel_case() {
                        out.push_str(&pascal_case(value));
                    } else {
                        out.push_str(value);
                    }
                }
            }
        }
        Ok(out)
    }

    /// An absent `$variation` disappears together with the literal right
    /// before it (or right after it when it opens the template).
    fn skipped_segments(&self, components: &Components) -> Vec<usize> {
        if components.has(Tag::Variation) {
            return Vec::new();
        }
        let Some(vi) = self
            .segments
            .iter()
            .position(|s| *s == Segment::Placeholder(Tag::Variation))
        else {
            return Vec::new();
        };

        let mut skip = vec![vi];
        if vi > 0 && matches!(self.segments[vi - 1], Segment::Literal(_)) {
            skip.push(vi - 1);
        } else if matches!(self.segments.get(vi + 1), Some(Segment::Literal(_))) {
            skip.push(vi + 1);
        }
        skip
    }

    fn satisfies(&self, components: &Components) -> bool {
        self.required.iter().all(|t| components.has(*t))
    }

    fn split_chars(&self) -> &[char] {
        match &self.separators {
            Separators::Chars(chars) => chars.as_slice(),
            Separators::CamelCase => &COMMON_SEPARATORS[..],
        }
    }

    /// Characters trimmed from the ends of a name and accepted before an
    /// iterator marker.
    fn boundary_chars(&self) -> Vec<char> {
        let mut chars = self.split_chars().to_vec();
        for c in COMMON_SEPARATORS {
            if !chars.contains(&c) {
                chars.push(c);
            }
        }
        chars
    }

    fn prepare<'a>(&self, name: &'a str, keywords: &'a ActionKeywords) -> Prepared<'a> {
        let boundary = self.boundary_chars();
        let file = file_name_of(name.trim());
        let mut body = if self.split_chars().contains(&'.') {
            strip_audio_extension(file)
        } else {
            strip_extension(file)
        };

        if let Some(rest) = strip_prefix_ci(body, &self.lead) {
            body = rest;
        }
        let (rest, iterator, variation) = self.strip_iterators(body, &boundary);
        body = rest;
        if let Some(rest) = strip_suffix_ci(body, &self.trail) {
            body = rest;
        }
        body = trim_seps(body, &boundary);

        let tokens = match &self.separators {
            Separators::Chars(chars) => split_on(body, chars),
            Separators::CamelCase => split_words(body),
        };

        Prepared {
            body,
            tokens,
            variation,
            iterator,
            boundary,
            keywords,
        }
    }

    /// Strip at most one trailing digit run and at most one trailing single
    /// capital letter, in either order. Outside CamelCase mode both must
    /// follow a separator. The letter becomes the variation when
    /// the template ends with `$variation`; everything else stripped is
    /// reported as the iterator.
    fn strip_iterators<'a>(
        &self,
        body: &'a str,
        boundary: &[char],
    ) -> (&'a str, Option<String>, Option<String>) {
        let mut rest = trim_seps(body, boundary);
        let mut stripped: Vec<String> = Vec::new();
        let mut variation = None;
        let mut took_digits = false;
        let mut took_letter = false;

        loop {
            rest = rest.trim_end_matches(|c| boundary.contains(&c));

            if !took_digits {
                // Delimited names need a separator before the digits, so
                // `R2` stays a word.
                let digits = DIGIT_SUFFIX.find(rest).filter(|m| {
                    m.start() > 0
                        && (self.is_camel_case()
                            || rest[..m.start()].ends_with(|c| boundary.contains(&c)))
                });
                if let Some(m) = digits {
                    stripped.push(m.as_str().to_string());
                    rest = &rest[..m.start()];
                    took_digits = true;
                    continue;
                }
            }

            if !took_letter {
                let caps = LETTER_AFTER_SEPARATOR.captures(rest).or_else(|| {
                    (self.trailing_variation && self.is_camel_case())
                        .then(|| LETTER_AFTER_LOWER.captures(rest))
                        .flatten()
                });
                if let Some(letter) = caps.and_then(|c| c.get(1)) {
                    if self.trailing_variation {
                        variation = Some(letter.as_str().to_string());
                    } else {
                        stripped.push(letter.as_str().to_string());
                    }
                    rest = &rest[..letter.start()];
                    took_letter = true;
                    continue;
                }
            }

            break;
        }

        stripped.reverse();
        let iterator = (!stripped.is_empty()).then(|| stripped.join("_"));
        (rest, iterator, variation)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

/// Tokens map one-to-one onto slots.
fn strict_split(p: &Pattern, prep: &Prepared<'_>) -> Option<Components> {
    (prep.tokens.len() == p.slots.len())
        .then(|| assign_positional(&p.slots, prep.body, &prep.tokens))
}

/// More tokens than slots: the elastic `$feature` absorbs the surplus.
fn flexible_split(p: &Pattern, prep: &Prepared<'_>) -> Option<Components> {
    if prep.tokens.len() <= p.slots.len() {
        return None;
    }
    distribute(&p.slots, prep.body, &prep.tokens)
}

/// Anchor on the best action keyword and distribute what precedes it.
fn fuzzy_action(p: &Pattern, prep: &Prepared<'_>) -> Option<Components> {
    let action_at = p.slots.iter().position(|t| *t == Tag::Action)?;
    if action_at + 1 != p.slots.len() {
        return None;
    }

    let found = prep.keywords.locate(prep.body)?;
    let before = trim_seps(&prep.body[..found.start], &prep.boundary);
    let leading = &p.slots[..action_at];

    let mut components = if leading.is_empty() {
        Components::new()
    } else {
        let tokens = split_words(before);
        if tokens.len() == leading.len() {
            assign_positional(leading, before, &tokens)
        } else {
            distribute(leading, before, &tokens)?
        }
    };
    components.insert(Tag::Action, found.keyword);
    Some(components)
}

fn assign_positional(slots: &[Tag], text: &str, tokens: &[(usize, usize)]) -> Components {
    slots
        .iter()
        .zip(tokens)
        .map(|(tag, &(a, b))| (*tag, &text[a..b]))
        .collect()
}

/// Slots before `$feature` take one token each from the front, slots after it
/// one each from the back, and `$feature` keeps the original text spanning
/// whatever is left. Needs at least as many tokens as slots.
fn distribute(slots: &[Tag], text: &str, tokens: &[(usize, usize)]) -> Option<Components> {
    let elastic = slots.iter().position(|t| *t == Tag::Feature)?;
    if tokens.len() < slots.len() {
        return None;
    }

    let after = slots.len() - elastic - 1;
    let tail = tokens.len() - after;
    let mut components = Components::new();

    for (tag, &(a, b)) in slots[..elastic].iter().zip(tokens) {
        components.insert(*tag, &text[a..b]);
    }
    let (mid_start, _) = tokens[elastic];
    let (_, mid_end) = tokens[tail - 1];
    components.insert(Tag::Feature, &text[mid_start..mid_end]);
    for (tag, &(a, b)) in slots[elastic + 1..].iter().zip(&tokens[tail..]) {
        components.insert(*tag, &text[a..b]);
    }
    Some(components)
}

/// Literal text strictly between the first and last placeholder.
fn inner_literals(ast: &TemplateAst) -> impl Iterator<Item = &str> {
    let first = ast
        .parts
        .iter()
        .position(|p| matches!(p, Part::Placeholder(_)))
        .unwrap_or(0);
    let last = ast
        .parts
        .iter()
        .rposition(|p| matches!(p, Part::Placeholder(_)))
        .unwrap_or(0);
    ast.parts[first..=last].iter().filter_map(|p| match p {
        Part::Literal(l) => Some(l.value.as_str()),
        Part::Placeholder(_) => None,
    })
}

/// With explicit separators, every pair of neighbouring placeholders must be
/// divided by a literal containing at least one separator character.
fn check_adjacency(template: &str, ast: &TemplateAst, seps: &[char]) -> Result<(), PatternError> {
    let mut prev: Option<Tag> = None;
    let mut divided = false;
    let mut gap: Option<usize> = None;

    for part in &ast.parts {
        match part {
            Part::Literal(l) => {
                divided |= l.value.chars().any(|c| seps.contains(&c));
                gap = Some(l.span.start);
            }
            Part::Placeholder(ph) => {
                if let Some(first) = prev {
                    if !divided {
                        let at = gap.unwrap_or(ph.span.start);
                        return Err(PatternError::new(
                            template,
                            at,
                            PatternErrorKind::AmbiguousAdjacency {
                                first,
                                second: ph.tag,
                            },
                        ));
                    }
                }
                prev = Some(ph.tag);
                divided = false;
                gap = None;
            }
        }
    }
    Ok(())
}

fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return None;
    }
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &s[prefix.len()..])
}

fn strip_suffix_ci<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    if suffix.is_empty() {
        return None;
    }
    let at = s.len().checked_sub(suffix.len())?;
    let tail = s.get(at..)?;
    tail.eq_ignore_ascii_case(suffix).then(|| &s[..at])
}
