//! Name casing used for normalized keys and aliases.
//!
//! Words are split on `-`, `_` and whitespace, and before an uppercase
//! letter that follows a lowercase letter or digit. Runs of capitals stay in
//! one word, so `BACnetObjectType` splits as `BACnet`, `Object`, `Type`.

fn words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;
    for c in name.chars() {
        if c == '-' || c == '_' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev = None;
            continue;
        }
        if c.is_ascii_uppercase()
            && matches!(prev, Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit())
            && !current.is_empty()
        {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
        prev = Some(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// `BACnetObjectType` → `bacnet-object-type`, `analog-input` → `analog-input`.
pub fn kebab_case(name: &str) -> String {
    words(name)
        .iter()
        .map(|w| w.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// `analog-input` → `analogInput`, `BACnetObjectType` → `bacnetObjectType`.
pub fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, word) in words(name).iter().enumerate() {
        let lower = word.to_ascii_lowercase();
        if i == 0 {
            out.push_str(&lower);
        } else {
            let mut chars = lower.chars();
            if let Some(first) = chars.next() {
                out.push(first.to_ascii_uppercase());
                out.push_str(chars.as_str());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kebab_splits_camel_humps_and_keeps_acronyms() {
        assert_eq!(kebab_case("BACnetObjectType"), "bacnet-object-type");
        assert_eq!(kebab_case("Unsigned8"), "unsigned8");
        assert_eq!(kebab_case("IPv6Address"), "ipv6-address");
        assert_eq!(kebab_case("Foo-Bar"), "foo-bar");
        assert_eq!(kebab_case("analog-input"), "analog-input");
    }

    #[test]
    fn camel_joins_words() {
        assert_eq!(camel_case("analog-input"), "analogInput");
        assert_eq!(camel_case("a"), "a");
        assert_eq!(camel_case("BACnetObjectType"), "bacnetObjectType");
        assert_eq!(camel_case("out-of-service"), "outOfService");
    }
}
