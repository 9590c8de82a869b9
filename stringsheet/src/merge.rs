//! Reconciles locales read from a spreadsheet with locales read from disk.

use std::collections::HashMap;

use tracing::debug;

use crate::types::{Locale, StringItem};

/// Merges `incoming` (from the spreadsheet) into `existing` (from disk).
///
/// The output holds exactly the incoming locales, in incoming order:
/// - a locale with no existing counterpart is carried through unchanged;
/// - otherwise the existing items are kept in order, an incoming item with
///   a known name replaces that item's text in place, and an unknown name is
///   appended.
///
/// Locales that only exist on disk are not part of the output. Existing
/// locales are looked up by code, first match wins.
pub fn merge_locales(incoming: &[Locale], existing: &[Locale]) -> Vec<Locale> {
    let mut by_code: HashMap<&str, &Locale> = HashMap::with_capacity(existing.len());
    for locale in existing {
        by_code.entry(locale.code.as_str()).or_insert(locale);
    }

    incoming
        .iter()
        .map(|locale| match by_code.get(locale.code.as_str()) {
            Some(current) => merge_items(current, locale),
            None => {
                debug!(locale = %locale.code, "new locale, carried over as-is");
                locale.clone()
            }
        })
        .collect()
}

fn merge_items(current: &Locale, incoming: &Locale) -> Locale {
    let mut items: Vec<StringItem> = current.items.clone();
    let mut positions: HashMap<String, usize> = items
        .iter()
        .enumerate()
        .rev()
        .map(|(index, item)| (item.name.clone(), index))
        .collect();

    let mut replaced = 0usize;
    let mut appended = 0usize;
    for item in &incoming.items {
        match positions.get(&item.name) {
            Some(&index) => {
                items[index].text = item.text.clone();
                replaced += 1;
            }
            None => {
                positions.insert(item.name.clone(), items.len());
                items.push(item.clone());
                appended += 1;
            }
        }
    }
    debug!(locale = %current.code, replaced, appended, "merged locale");

    Locale::new(current.code.clone(), items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locale(code: &str, items: &[(&str, &str)]) -> Locale {
        Locale::new(
            code,
            items
                .iter()
                .map(|(name, text)| StringItem::new(*name, *text))
                .collect(),
        )
    }

    #[test]
    fn test_overwrite_in_place_and_append() {
        let existing = vec![locale("en", &[("k1", "a"), ("k2", "b")])];
        let incoming = vec![locale("en", &[("k1", "A"), ("k3", "C")])];
        let merged = merge_locales(&incoming, &existing);
        assert_eq!(
            merged,
            vec![locale("en", &[("k1", "A"), ("k2", "b"), ("k3", "C")])]
        );
    }

    #[test]
    fn test_new_locale_is_added_and_disk_only_locale_dropped() {
        let existing = vec![locale("en", &[("k1", "a")]), locale("de", &[("k1", "x")])];
        let incoming = vec![locale("fr", &[("k1", "un")]), locale("en", &[("k1", "one")])];
        let merged = merge_locales(&incoming, &existing);
        let codes: Vec<&str> = merged.iter().map(|l| l.code.as_str()).collect();
        assert_eq!(codes, vec!["fr", "en"]);
        assert_eq!(merged[0], incoming[0]);
        assert_eq!(merged[1].text_of("k1"), Some("one"));
    }

    #[test]
    fn test_merge_with_itself_is_identity() {
        let locales = vec![
            locale("default", &[("a", "A"), ("b", "B")]),
            locale("ja", &[("a", "エー")]),
        ];
        assert_eq!(merge_locales(&locales, &locales), locales);
    }

    #[test]
    fn test_empty_incoming_yields_empty_output() {
        let existing = vec![locale("en", &[("k1", "a")])];
        assert!(merge_locales(&[], &existing).is_empty());
    }

    #[test]
    fn test_incoming_duplicate_names_do_not_duplicate() {
        let existing = vec![locale("en", &[("k1", "a")])];
        let incoming = vec![locale("en", &[("k2", "first"), ("k2", "second")])];
        let merged = merge_locales(&incoming, &existing);
        assert_eq!(merged, vec![locale("en", &[("k1", "a"), ("k2", "second")])]);
    }

    #[test]
    fn test_duplicate_existing_codes_use_first() {
        let existing = vec![locale("en", &[("k1", "first")]), locale("en", &[("k9", "second")])];
        let incoming = vec![locale("en", &[("k2", "b")])];
        let merged = merge_locales(&incoming, &existing);
        assert_eq!(merged, vec![locale("en", &[("k1", "first"), ("k2", "b")])]);
    }
}
