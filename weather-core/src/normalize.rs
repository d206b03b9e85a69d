//! Text and number normalization shared by every provider.

/// Known short names, matched case-insensitively after trimming.
const CITY_ALIASES: &[(&str, &str)] = &[
    ("спб", "Санкт-Петербург"),
    ("spb", "Санкт-Петербург"),
    ("питер", "Санкт-Петербург"),
    ("ленинград", "Санкт-Петербург"),
    ("мск", "Москва"),
    ("msk", "Москва"),
];

/// Trim the name and expand a known alias.
///
/// Unknown names keep their original casing.
pub fn normalize_city(raw: &str) -> String {
    let trimmed = raw.trim();
    let key = trimmed.to_lowercase();

    CITY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Uppercase the first letter of every word and lowercase the rest.
///
/// Any non-alphabetic character starts a new word, so "partly-cloudy"
/// becomes "Partly-Cloudy".
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;

    for ch in text.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }

    out
}

/// Round half to even, the way the readings have always been rounded.
pub fn round_temperature(celsius: f64) -> i64 {
    celsius.round_ties_even() as i64
}
