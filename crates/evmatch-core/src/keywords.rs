//! Action keyword dictionary used for fuzzy action extraction.

use once_cell::sync::Lazy;

/// Built-in action vocabulary for game audio event names.
pub const DEFAULT_ACTION_KEYWORDS: &[&str] = &[
    "Activate",
    "Alert",
    "Ambient",
    "Attack",
    "Block",
    "Break",
    "Cast",
    "Charge",
    "Close",
    "Collect",
    "Deactivate",
    "Death",
    "Destroy",
    "Dodge",
    "Drop",
    "Emote",
    "Equip",
    "Explode",
    "Fall",
    "Fire",
    "Footstep",
    "Growl",
    "Heal",
    "Hit",
    "Hurt",
    "Idle",
    "Impact",
    "Jump",
    "Land",
    "Loop",
    "Move",
    "Open",
    "Pickup",
    "Reload",
    "Roar",
    "Run",
    "Scream",
    "Shoot",
    "Shout",
    "Spawn",
    "Start",
    "Stop",
    "Swing",
    "Taunt",
    "Throw",
    "Unequip",
    "Walk",
];

static BUILTIN: Lazy<ActionKeywords> =
    Lazy::new(|| ActionKeywords::new(DEFAULT_ACTION_KEYWORDS.iter().copied()));

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    canonical: String,
    folded: Vec<char>,
}

/// Immutable, ordered keyword table.
///
/// Lookups are case- and separator-insensitive: `"FOOT_STEP"` finds
/// `Footstep`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionKeywords {
    entries: Vec<Entry>,
}

/// Where a keyword was found inside a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordMatch<'k> {
    /// Dictionary spelling of the keyword.
    pub keyword: &'k str,
    /// Byte range in the searched text (separators inside the match included).
    pub start: usize,
    pub end: usize,
}

impl ActionKeywords {
    /// Build a table from caller-supplied keywords. Empty entries and entries
    /// that fold to an already-present keyword are skipped.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self {
            entries: Vec::new(),
        };
        table.push_all(keywords);
        table
    }

    /// The built-in table.
    pub fn builtin() -> &'static ActionKeywords {
        &BUILTIN
    }

    /// This table plus extra keywords appended after the existing ones.
    pub fn extended<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.push_all(extra);
        self
    }

    fn push_all<I, S>(&mut self, keywords: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for kw in keywords {
            let canonical = kw.as_ref().trim();
            let folded = fold(canonical);
            if folded.is_empty() || self.entries.iter().any(|e| e.folded == folded) {
                continue;
            }
            self.entries.push(Entry {
                canonical: canonical.to_string(),
                folded,
            });
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.canonical.as_str())
    }

    /// Locate the best keyword in `text`.
    ///
    /// The longest keyword wins. Between equally long keywords the right-most
    /// occurrence wins, since action usually trails the name; remaining ties
    /// go to the earlier table entry.
    pub fn locate(&self, text: &str) -> Option<KeywordMatch<'_>> {
        // Folded text with each folded char mapped back to its source byte range.
        let mut folded: Vec<char> = Vec::with_capacity(text.len());
        let mut origin: Vec<(usize, usize)> = Vec::with_capacity(text.len());
        for (i, c) in text.char_indices() {
            if !c.is_alphanumeric() {
                continue;
            }
            for lc in c.to_lowercase() {
                folded.push(lc);
                origin.push((i, i + c.len_utf8()));
            }
        }

        let mut best: Option<(usize, usize, &Entry)> = None; // (len, pos, entry)
        for entry in &self.entries {
            let n = entry.folded.len();
            if n > folded.len() {
                continue;
            }
            let Some(pos) = (0..=folded.len() - n)
                .rev()
                .find(|&p| folded[p..p + n] == entry.folded[..])
            else {
                continue;
            };
            let better = match best {
                None => true,
                Some((bl, bp, _)) => n > bl || (n == bl && pos > bp),
            };
            if better {
                best = Some((n, pos, entry));
            }
        }

        best.map(|(n, pos, entry)| KeywordMatch {
            keyword: entry.canonical.as_str(),
            start: origin[pos].0,
            end: origin[pos + n - 1].1,
        })
    }

    /// Dictionary spelling of the best keyword in `text`, if any.
    pub fn find_longest(&self, text: &str) -> Option<&str> {
        self.locate(text).map(|m| m.keyword)
    }
}

impl Default for ActionKeywords {
    fn default() -> Self {
        BUILTIN.clone()
    }
}

fn fold(s: &str) -> Vec<char> {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
