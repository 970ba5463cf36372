//! Heuristic selector matching: for a candidate element, compute every
//! selector string that could plausibly address it or its descendants (the
//! "selector universe"), then test rules against that set by containment.
//!
//! This intentionally approximates CSS. There is no specificity, no cascade,
//! and no combinator adjacency validation; substring/suffix containment stands
//! in for real selector evaluation. It over-matches and under-matches in known
//! ways, and downstream output depends on that exact behavior. Do not tighten
//! it without revisiting the section-splitting results it feeds.

use crate::dom::{ElementNode, Node};
use crate::style::rules::CssRule;
use regex::Regex;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::LazyLock;

/// `body.home ` wrapper prefix seen in exported theme CSS; stripped before
/// matching so page-scoped rules still attach to their sections.
static BODY_HOME_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^body\.home\s+").expect("valid regex"));

/// Pseudo-class suffixes (`:hover`, `:nth-child`...); argument lists are left
/// behind, which is as far as the approximation goes.
static PSEUDO_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":[a-zA-Z-]+").expect("valid regex"));

/// `[attr=...]` groups, non-greedy so sibling groups stay separate.
static ATTRIBUTE_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*?\]").expect("valid regex"));

/// A run of non-`{`/`}`/`,` characters immediately before an opening brace:
/// the selector text of one rule inside a captured media block body.
static MEDIA_INNER_SELECTOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^{},]+)\{").expect("valid regex"));

/// Computes the selector universe of an element: every selector string that
/// could plausibly reference it or anything in its subtree.
///
/// Per node the own selectors are `#id`, `.class` per token, the combined
/// `.c1.c2...` form when several classes exist, and the lowercase tag name.
/// Ancestor-qualified variants join each accumulated ancestor string with the
/// node's own selectors concatenated, in both descendant (space) and child
/// (`>`) form. The accumulated list grows additively down the tree.
///
/// Non-element nodes yield an empty set.
pub fn extract_selectors(node: &Rc<RefCell<Node>>) -> HashSet<String> {
    let mut selectors = HashSet::new();
    if let Node::Element(elem) = &*node.borrow() {
        accumulate_selectors(elem, &[], &mut selectors);
    }
    selectors
}

fn accumulate_selectors(el: &ElementNode, ancestors: &[String], out: &mut HashSet<String>) {
    let mut own: Vec<String> = Vec::new();
    if let Some(id) = el.attr("id") {
        if !id.is_empty() {
            own.push(format!("#{}", id));
        }
    }
    let classes = el.class_names();
    for class in &classes {
        own.push(format!(".{}", class));
    }
    if classes.len() > 1 {
        own.push(format!(".{}", classes.join(".")));
    }
    own.push(el.tag.to_lowercase());

    // Ancestor variants use the whole own list concatenated, not each own
    // selector separately.
    let own_joined: String = own.concat();
    let mut full = own;
    for ancestor in ancestors {
        full.push(format!("{} {}", ancestor, own_joined));
        full.push(format!("{}>{}", ancestor, own_joined));
    }
    for sel in &full {
        out.insert(sel.clone());
    }

    let mut child_context = ancestors.to_vec();
    child_context.extend(full);
    for child in &el.children {
        if let Node::Element(child_elem) = &*child.borrow() {
            accumulate_selectors(child_elem, &child_context, out);
        }
    }
}

/// Fuzzy selector-vs-universe test.
///
/// The selector is split on whitespace after dropping a leading `body.home `
/// prefix; each part loses pseudo-class suffixes and attribute groups. The
/// last part must be a universe member exactly or a space-preceded suffix of
/// one; every earlier part only has to appear as a substring of some member.
pub fn selector_matches(selector: &str, universe: &HashSet<String>) -> bool {
    let clean = BODY_HOME_PREFIX.replace(selector, "");
    let parts: Vec<&str> = clean.split_whitespace().collect();
    if parts.is_empty() {
        return false;
    }
    let last = parts.len() - 1;
    parts.iter().enumerate().all(|(idx, part)| {
        let simple = simplify_part(part);
        if idx == last {
            let suffix = format!(" {}", simple);
            universe
                .iter()
                .any(|member| member == &simple || member.ends_with(&suffix))
        } else {
            universe.iter().any(|member| member.contains(&simple))
        }
    })
}

fn simplify_part(part: &str) -> String {
    let no_pseudo = PSEUDO_CLASS.replace_all(part, "");
    ATTRIBUTE_GROUP.replace_all(&no_pseudo, "").into_owned()
}

/// Pulls the inner rule selectors out of a captured `@media` block body.
/// Comma-separated lists only surface their final entry (the run before the
/// brace stops at the previous comma); kept as-is.
pub fn extract_media_query_selectors(block_body: &str) -> Vec<String> {
    let mut selectors = Vec::new();
    for caps in MEDIA_INNER_SELECTOR.captures_iter(block_body) {
        for sel in caps[1].split(',') {
            let clean = BODY_HOME_PREFIX.replace(sel.trim(), "");
            selectors.push(clean.into_owned());
        }
    }
    selectors
}

/// Decides whether a rule belongs to the section whose universe is given.
///
/// At-rules, `:root`, and anything containing `*` are considered global and
/// always kept. Media rules match if any extracted inner selector matches;
/// plain rules match on their selector directly.
pub fn rule_applies(rule: &CssRule, universe: &HashSet<String>) -> bool {
    if rule.selector.starts_with('@') || rule.selector == ":root" || rule.selector.contains('*') {
        return true;
    }
    if rule.media.is_some() {
        return extract_media_query_selectors(&rule.selector)
            .iter()
            .any(|sel| selector_matches(sel, universe));
    }
    selector_matches(&rule.selector, universe)
}

/// Renders one matched rule back to CSS text.
pub fn render_rule(rule: &CssRule) -> String {
    match &rule.media {
        Some(media) => format!("{} {{\n{}\n}}", media, rule.selector),
        None => format!("{} {{ {} }}", rule.selector, rule.style),
    }
}
