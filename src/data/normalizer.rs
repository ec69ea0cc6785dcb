/// Canonical lookup key for an item name.
///
/// Trims, lower-cases, keeps only ASCII letters and digits, then drops one
/// trailing `s` so that "Chaos Orb" and "Chaos Orbs" meet on the same key.
/// Distinct names can collapse onto one key; callers treat an empty key as
/// unmatched.
pub fn normalize_name(name: &str) -> String {
    let mut key: String = name
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if key.ends_with('s') {
        key.pop();
    }
    key
}
