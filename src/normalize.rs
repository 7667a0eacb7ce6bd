//! Guess/title normalization.
//!
//! Distinct spellings of the same title must collapse to one key before
//! comparison or counting: diacritics stripped, case folded, `&` read as
//! "and", punctuation dropped, leading articles removed, Roman numerals
//! converted to Arabic. The whole pipeline is idempotent.
//!
//! Digits are never mapped ("se7en" stays "se7en"); only whole-word Roman
//! numerals convert, and a lone "i" is kept so partial queries like
//! "monsters i" still prefix-match "monsters inc".

/// Strip combining marks and fold precomposed Latin letters to their base
/// letter (the NFD-decomposable set; letters like `ø` or `œ` carry no
/// combining mark and are left for the punctuation pass to drop).
pub fn strip_diacritics(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            // Combining marks from already-decomposed input.
            '\u{0300}'..='\u{036f}' => {}
            'À'..='Å' | 'à'..='å' | 'Ā' | 'ā' | 'Ă' | 'ă' | 'Ą' | 'ą' => out.push(fold_case(c, 'a')),
            'Ç' | 'ç' | 'Ć' | 'ć' | 'Ĉ' | 'ĉ' | 'Ċ' | 'ċ' | 'Č' | 'č' => out.push(fold_case(c, 'c')),
            'È'..='Ë' | 'è'..='ë' | 'Ē' | 'ē' | 'Ĕ' | 'ĕ' | 'Ė' | 'ė' | 'Ę' | 'ę' | 'Ě' | 'ě' => {
                out.push(fold_case(c, 'e'))
            }
            'Ì'..='Ï' | 'ì'..='ï' | 'Ĩ' | 'ĩ' | 'Ī' | 'ī' | 'Ĭ' | 'ĭ' | 'Į' | 'į' | 'İ' => {
                out.push(fold_case(c, 'i'))
            }
            'Ĝ' | 'ĝ' | 'Ğ' | 'ğ' | 'Ġ' | 'ġ' | 'Ģ' | 'ģ' => out.push(fold_case(c, 'g')),
            'Ñ' | 'ñ' | 'Ń' | 'ń' | 'Ņ' | 'ņ' | 'Ň' | 'ň' => out.push(fold_case(c, 'n')),
            'Ò'..='Ö' | 'ò'..='ö' | 'Ō' | 'ō' | 'Ŏ' | 'ŏ' | 'Ő' | 'ő' => out.push(fold_case(c, 'o')),
            'Ŕ' | 'ŕ' | 'Ŗ' | 'ŗ' | 'Ř' | 'ř' => out.push(fold_case(c, 'r')),
            'Ś' | 'ś' | 'Ŝ' | 'ŝ' | 'Ş' | 'ş' | 'Š' | 'š' => out.push(fold_case(c, 's')),
            'Ţ' | 'ţ' | 'Ť' | 'ť' => out.push(fold_case(c, 't')),
            'Ù'..='Ü' | 'ù'..='ü' | 'Ũ' | 'ũ' | 'Ū' | 'ū' | 'Ŭ' | 'ŭ' | 'Ů' | 'ů' | 'Ű' | 'ű'
            | 'Ų' | 'ų' => out.push(fold_case(c, 'u')),
            'Ý' | 'ý' | 'ÿ' | 'Ŷ' | 'ŷ' | 'Ÿ' => out.push(fold_case(c, 'y')),
            'Ź' | 'ź' | 'Ż' | 'ż' | 'Ž' | 'ž' => out.push(fold_case(c, 'z')),
            _ => out.push(c),
        }
    }
    out
}

/// Preserve the case of the original letter when substituting its base.
fn fold_case(original: char, base: char) -> char {
    if original.is_uppercase() {
        base.to_ascii_uppercase()
    } else {
        base
    }
}

/// Parse a word consisting solely of Roman-numeral letters. Right-to-left
/// accumulation with subtraction, matching the usual IV/IX handling.
fn roman_to_int(word: &str) -> Option<u64> {
    let mut sum: i64 = 0;
    let mut prev: i64 = 0;
    for c in word.chars().rev() {
        let v = match c.to_ascii_uppercase() {
            'I' => 1,
            'V' => 5,
            'X' => 10,
            'L' => 50,
            'C' => 100,
            'D' => 500,
            'M' => 1000,
            _ => return None,
        };
        if v < prev {
            sum -= v;
        } else {
            sum += v;
        }
        prev = v;
    }
    u64::try_from(sum).ok()
}

fn is_roman_word(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| "ivxlcdm".contains(c))
}

/// Canonical comparison key for a movie title or player guess.
pub fn normalize_title(title: &str) -> String {
    let lowered = strip_diacritics(title).to_lowercase();

    // '&' reads as "and" in place ("at&t" -> "atandt"); every other
    // non-alphanumeric is a word separator.
    let mut cleaned = String::with_capacity(lowered.len());
    for c in lowered.chars() {
        match c {
            '&' => cleaned.push_str("and"),
            'a'..='z' | '0'..='9' => cleaned.push(c),
            _ => cleaned.push(' '),
        }
    }

    let mut words: Vec<String> = Vec::new();
    for word in cleaned.split_whitespace() {
        match word {
            "the" | "a" | "an" => continue,
            // Keep a lone "i" verbatim; convert every other Roman word.
            "i" => words.push(word.to_string()),
            w if is_roman_word(w) => match roman_to_int(w) {
                Some(n) if n > 0 => words.push(n.to_string()),
                _ => words.push(w.to_string()),
            },
            w => words.push(w.to_string()),
        }
    }
    words.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_articles_and_case() {
        assert_eq!(normalize_title("The Matrix"), "matrix");
        assert_eq!(normalize_title("matrix"), "matrix");
        assert_eq!(normalize_title("A Beautiful Mind"), "beautiful mind");
        assert_eq!(normalize_title("An American in Paris"), "american in paris");
    }

    #[test]
    fn test_digits_not_mapped() {
        assert_eq!(normalize_title("Se7en"), "se7en");
        assert_ne!(normalize_title("Se7en"), normalize_title("Seven"));
    }

    #[test]
    fn test_roman_numerals() {
        assert_eq!(normalize_title("Rocky III"), "rocky 3");
        assert_eq!(normalize_title("Rocky IV"), "rocky 4");
        assert_eq!(normalize_title("Star Wars: Episode VI"), "star wars episode 6");
        // Lone "i" survives so "monsters i" still matches "monsters inc"
        assert_eq!(normalize_title("I, Robot"), "i robot");
    }

    #[test]
    fn test_diacritics_and_punctuation() {
        assert_eq!(normalize_title("Amélie"), "amelie");
        assert_eq!(normalize_title("Léon: The Professional"), "leon professional");
        assert_eq!(normalize_title("Monsters, Inc."), "monsters inc");
        assert_eq!(normalize_title("Fast & Furious"), "fast and furious");
    }

    #[test]
    fn test_idempotent() {
        for t in ["The Godfather Part II", "Amélie", "Se7en", "Fast & Furious", "Rocky III"] {
            let once = normalize_title(t);
            assert_eq!(normalize_title(&once), once);
        }
    }

    #[test]
    fn test_whitespace_collapse() {
        assert_eq!(normalize_title("  The   Lion    King  "), "lion king");
    }
}
