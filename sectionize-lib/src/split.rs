//! Top of the pipeline: parse the HTML, parse the CSS, and hand each section
//! candidate the subset of rules that belongs to it.

use crate::dom::{self, Node};
use crate::parser::html::parse_html;
use crate::style::matcher::{extract_selectors, render_rule, rule_applies};
use crate::style::rules::{parse_css, CssRule};
use rand::Rng;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// One reconstructed section: its markup, the CSS that was matched to it, and
/// a default type taken from the tag name. The surrounding application may
/// reassign `type` later; here it is only a default.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedSection {
    pub id: String,
    pub html: String,
    pub css: String,
    #[serde(rename = "type")]
    pub section_type: String,
}

/// Why a single candidate was dropped. The batch keeps going regardless.
#[derive(Debug, Error)]
pub enum SectionError {
    #[error("candidate node is not an element")]
    NotAnElement,
}

/// Per-candidate result. Skipping is an ordinary value, not an exception
/// path, so callers and tests can observe it directly.
#[derive(Debug)]
pub enum SectionOutcome {
    Emitted(ParsedSection),
    Skipped { index: usize, reason: SectionError },
}

/// Splits pasted HTML + CSS into per-section records.
///
/// Never fails: empty input yields an empty list, and a candidate that cannot
/// be processed is logged and dropped while the rest continue. Callers that
/// need to distinguish "no sections" from "all skipped" should use
/// [`split_sections`] and inspect the outcomes.
pub fn parse_css_and_match_sections(html: &str, css: &str) -> Vec<ParsedSection> {
    if html.trim().is_empty() || css.trim().is_empty() {
        log::debug!("empty html or css input, nothing to split");
        return Vec::new();
    }
    split_sections(html, css)
        .into_iter()
        .filter_map(|outcome| match outcome {
            SectionOutcome::Emitted(section) => Some(section),
            SectionOutcome::Skipped { index, reason } => {
                log::warn!("skipping section candidate {}: {}", index, reason);
                None
            }
        })
        .collect()
}

/// Like [`parse_css_and_match_sections`] but keeps skipped candidates visible.
pub fn split_sections(html: &str, css: &str) -> Vec<SectionOutcome> {
    let document = parse_html(html);
    let candidates = document.query_sections();
    log::debug!("found {} section candidates", candidates.len());

    let rules = parse_css(css);
    log::debug!("parsed {} css rules", rules.len());

    candidates
        .iter()
        .enumerate()
        .map(|(i, candidate)| process_candidate(i + 1, candidate, &rules))
        .collect()
}

fn process_candidate(
    index: usize,
    candidate: &Rc<RefCell<Node>>,
    rules: &[CssRule],
) -> SectionOutcome {
    let section_type = match &*candidate.borrow() {
        Node::Element(elem) => elem.tag.to_lowercase(),
        _ => {
            return SectionOutcome::Skipped {
                index,
                reason: SectionError::NotAnElement,
            }
        }
    };

    let universe = extract_selectors(candidate);
    let matched: Vec<&CssRule> = rules.iter().filter(|r| rule_applies(r, &universe)).collect();
    log::debug!("candidate {}: {} of {} rules matched", index, matched.len(), rules.len());

    let css_text = matched
        .into_iter()
        .map(render_rule)
        .collect::<Vec<_>>()
        .join("\n\n");

    SectionOutcome::Emitted(ParsedSection {
        id: generate_section_id(index),
        html: dom::outer_html(candidate),
        css: css_text,
        section_type,
    })
}

const ID_CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `section-{index}-{base36 millis}{5 random chars}`. Collisions are accepted
/// as negligible, not eliminated.
fn generate_section_id(index: usize) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let mut rng = rand::rng();
    let suffix: String = (0..5)
        .map(|_| ID_CHARSET[rng.random_range(0..ID_CHARSET.len())] as char)
        .collect();
    format!("section-{}-{}{}", index, base36(millis), suffix)
}

fn base36(mut value: u128) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(ID_CHARSET[(value % 36) as usize]);
        value /= 36;
    }
    digits.iter().rev().map(|&b| b as char).collect()
}
