//! Template rendering: single-pass `{{name}}` substitution.
//!
//! ## Why one pass and not a template engine?
//!
//! The note layout is fixed and the bindings are flat strings, so a full
//! template engine would be machinery without payoff. A single left-to-right
//! regex pass replaces every placeholder exactly once; replacement text is
//! never re-scanned, so a field value that happens to contain `{{…}}` is
//! emitted literally instead of triggering unbounded recursive substitution.
//!
//! Unbound and empty placeholders render as the empty string — a generated
//! note never contains a literal `{{token}}`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// The note layout.
///
/// YAML front-matter followed by the body sections. Placeholders are either
/// raw record fields (see [`crate::record::Record::bindings`]) or computed
/// bindings injected by the Note Writer (`people`, `locations`, `tags`,
/// `thumbnail`, `local_file`, `last_imported`) — computed bindings win when
/// names collide.
pub const NOTE_TEMPLATE: &str = "\
---
cssclass: collapse-properties
date: {{date}}
article: \"{{article}}\"
theme1: {{theme1}}
theme2: {{theme2}}
theme3: {{theme3}}
theme4: {{theme4}}
theme5: {{theme5}}
people:
  name1: {{name1}}
  name2: {{name2}}
places:
  place1: {{place1}}
  place2: {{place2}}
source: {{source}}
format: {{format}}
transcribed: {{transcribed}}
last_imported: {{last_imported}}
---

# Article
{{article}}

## People Involved
{{people}}

## Locations
{{locations}}

## Thumbnail
{{thumbnail}}

## Source Information
- Newspaper: {{newspaper}}
- Published: {{published}}
- [Online Source]({{web}})

## Links
{{local_file}}

## Tags
{{tags}}
";

static RE_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}").unwrap());

/// Substitute every `{{name}}` placeholder in `template` from `bindings`.
///
/// Placeholders may appear multiple times; every occurrence is substituted
/// identically. Keys absent from `bindings` substitute the empty string.
pub fn render(template: &str, bindings: &BTreeMap<String, String>) -> String {
    RE_PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures<'_>| {
            bindings.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bindings(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn substitutes_bound_placeholders() {
        let out = render("Hello {{name}}!", &bindings(&[("name", "Llanychan")]));
        assert_eq!(out, "Hello Llanychan!");
    }

    #[test]
    fn unbound_placeholders_become_empty() {
        let out = render("[{{missing}}]", &BTreeMap::new());
        assert_eq!(out, "[]");
    }

    #[test]
    fn repeated_placeholders_substitute_identically() {
        let out = render(
            "{{title}} — see {{title}}",
            &bindings(&[("title", "Fire at Mill")]),
        );
        assert_eq!(out, "Fire at Mill — see Fire at Mill");
    }

    #[test]
    fn replacement_values_are_not_rescanned() {
        let out = render(
            "{{a}} {{b}}",
            &bindings(&[("a", "{{b}}"), ("b", "value")]),
        );
        assert_eq!(out, "{{b}} value");
    }

    #[test]
    fn empty_bindings_leave_no_tokens_in_the_template() {
        let out = render(NOTE_TEMPLATE, &BTreeMap::new());
        assert!(!out.contains("{{"), "unresolved token in:\n{out}");
        assert!(!out.contains("}}"));
        // Section structure survives.
        assert!(out.contains("## People Involved"));
        assert!(out.contains("## Tags"));
    }

    #[test]
    fn template_placeholders_use_valid_names() {
        // Every token in the shipped template must match the placeholder
        // grammar, otherwise it would leak into generated notes.
        let rendered = render(NOTE_TEMPLATE, &BTreeMap::new());
        assert!(!rendered.contains('{') && !rendered.contains('}'));
    }
}
