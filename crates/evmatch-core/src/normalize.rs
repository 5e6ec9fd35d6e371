//! String helpers shared by the pattern engine and the matcher.
//!
//! Token helpers return byte spans into the input rather than owned strings,
//! so callers can recover the original text (separators included) between
//! any two tokens.

/// Characters treated as word separators regardless of pattern settings.
pub const COMMON_SEPARATORS: [char; 3] = ['_', '-', ' '];

/// Case- and separator-insensitive form of a name.
///
/// `"Sfx_Dragon-Attack"`, `"sfx dragon attack"` and `"SfxDragonAttack"` all
/// normalize to `"sfxdragonattack"`.
pub fn normalize_name(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Final path component, accepting both `/` and `\` as directory separators.
pub fn file_name_of(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Drop a trailing `.ext` made of 1 to 5 ASCII alphanumerics.
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) if dot > 0 => {
            let ext = &name[dot + 1..];
            if (1..=5).contains(&ext.len()) && ext.bytes().all(|b| b.is_ascii_alphanumeric()) {
                &name[..dot]
            } else {
                name
            }
        }
        _ => name,
    }
}

/// Extensions recognised when `.` also separates words in a name.
pub const AUDIO_EXTENSIONS: [&str; 10] = [
    "wav", "ogg", "flac", "mp3", "aif", "aiff", "opus", "m4a", "wma", "wem",
];

/// Drop a trailing `.ext` only when it is a known audio extension
/// (lowercase, as written by tools).
pub fn strip_audio_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && AUDIO_EXTENSIONS.contains(&ext) => stem,
        _ => name,
    }
}

/// File name without directory or extension.
pub fn file_stem_of(path: &str) -> &str {
    strip_extension(file_name_of(path))
}

/// Trim any of `seps` from both ends.
pub fn trim_seps<'a>(s: &'a str, seps: &[char]) -> &'a str {
    s.trim_matches(|c| seps.contains(&c))
}

/// Split on any of `seps`, skipping empty tokens.
pub fn split_on(s: &str, seps: &[char]) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;

    for (i, c) in s.char_indices() {
        if seps.contains(&c) {
            if let Some(st) = start.take() {
                spans.push((st, i));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(st) = start {
        spans.push((st, s.len()));
    }
    spans
}

/// Split on capitalization boundaries and on any non-alphanumeric character.
///
/// - lower or digit followed by Upper starts a new word (`DragonAttack`)
/// - the last capital of an acronym run starts a new word when followed by
///   lowercase (`HTTPServer` -> `HTTP`, `Server`)
/// - digits stay attached to the preceding word (`Mk2Attack` -> `Mk2`, `Attack`)
pub fn split_words(s: &str) -> Vec<(usize, usize)> {
    let chars: Vec<(usize, char)> = s.char_indices().collect();
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;

    for (k, &(i, c)) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if let Some(st) = start.take() {
                spans.push((st, i));
            }
            continue;
        }

        let Some(st) = start else {
            start = Some(i);
            continue;
        };

        let prev = chars[k - 1].1;
        let boundary = if c.is_uppercase() {
            prev.is_lowercase() || prev.is_numeric()
        } else if c.is_lowercase() && prev.is_uppercase() && k >= 2 {
            let before = chars[k - 2];
            // Split between the acronym and the capitalized word after it.
            before.1.is_uppercase() && before.0 >= st
        } else {
            false
        };

        if boundary {
            if c.is_uppercase() {
                spans.push((st, i));
                start = Some(i);
            } else {
                let cap = chars[k - 1].0;
                spans.push((st, cap));
                start = Some(cap);
            }
        }
    }
    if let Some(st) = start {
        spans.push((st, s.len()));
    }
    spans
}

/// Rewrite a value as PascalCase words with no separators.
///
/// Each run of alphanumerics gets its first character uppercased; the rest is
/// left untouched, so `Strong_Repair` and `strong-Repair` both become
/// `StrongRepair`.
pub fn pascal_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for word in value
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let mut cs = word.chars();
        if let Some(first) = cs.next() {
            out.extend(first.to_uppercase());
            out.push_str(cs.as_str());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words<'a>(s: &'a str, spans: &[(usize, usize)]) -> Vec<&'a str> {
        spans.iter().map(|&(a, b)| &s[a..b]).collect()
    }

    #[test]
    fn normalize_ignores_case_and_separators() {
        assert_eq!(normalize_name("Sfx_Dragon-Attack"), "sfxdragonattack");
        assert_eq!(normalize_name(" Sfx Dragon Attack "), "sfxdragonattack");
        assert_eq!(normalize_name("SfxDragonAttack"), "sfxdragonattack");
    }

    #[test]
    fn stem_drops_directories_and_extension() {
        assert_eq!(file_stem_of("/audio/sfx/Sfx_Dragon_Attack.wav"), "Sfx_Dragon_Attack");
        assert_eq!(file_stem_of(r"C:\audio\Sfx_Dragon.flac"), "Sfx_Dragon");
        assert_eq!(file_stem_of("Sfx_Dragon_Attack"), "Sfx_Dragon_Attack");
    }

    #[test]
    fn audio_extension_only_drops_known_suffixes() {
        assert_eq!(strip_audio_extension("Sfx.Dragon.Roar.wav"), "Sfx.Dragon.Roar");
        assert_eq!(strip_audio_extension("Sfx.Dragon.Roar"), "Sfx.Dragon.Roar");
        assert_eq!(strip_audio_extension("Sfx.Dragon.Wav"), "Sfx.Dragon.Wav");
        assert_eq!(strip_audio_extension(".wav"), ".wav");
    }

    #[test]
    fn extension_must_look_like_one() {
        assert_eq!(strip_extension("Take.Two_Attack"), "Take.Two_Attack");
        assert_eq!(strip_extension(".hidden"), ".hidden");
        assert_eq!(strip_extension("clip.aiff"), "clip");
    }

    #[test]
    fn split_on_skips_empty_tokens() {
        let s = "_Sfx__Dragon_";
        assert_eq!(words(s, &split_on(s, &['_'])), vec!["Sfx", "Dragon"]);
    }

    #[test]
    fn split_on_multiple_separators() {
        let s = "Sfx-Dragon_Attack";
        assert_eq!(words(s, &split_on(s, &['_', '-'])), vec!["Sfx", "Dragon", "Attack"]);
    }

    #[test]
    fn split_words_on_case_boundaries() {
        let s = "MechafloraStrongRepairAlert";
        assert_eq!(
            words(s, &split_words(s)),
            vec!["Mechaflora", "Strong", "Repair", "Alert"]
        );
    }

    #[test]
    fn split_words_handles_acronyms_digits_and_separators() {
        let s = "HTTPServer_Mk2Attack";
        assert_eq!(words(s, &split_words(s)), vec!["HTTP", "Server", "Mk2", "Attack"]);
    }

    #[test]
    fn split_words_keeps_all_caps_word() {
        let s = "UI_OK";
        assert_eq!(words(s, &split_words(s)), vec!["UI", "OK"]);
    }

    #[test]
    fn pascal_case_joins_words() {
        assert_eq!(pascal_case("Strong_Repair"), "StrongRepair");
        assert_eq!(pascal_case("strong-repair"), "StrongRepair");
        assert_eq!(pascal_case("Mechaflora"), "Mechaflora");
        assert_eq!(pascal_case("StrongRepair"), "StrongRepair");
    }
}
