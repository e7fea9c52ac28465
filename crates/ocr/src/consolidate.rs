use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::normalize::EngineResult;

#[derive(Debug, Error)]
pub enum ConsolidateError {
    #[error("All OCR engines failed to extract text")]
    AllEnginesFailed,
}

/// Known OCR confusions, rewritten verbatim after voting. Extend this
/// table as new garbled renderings show up in the field.
const CONFUSIONS: &[(&str, &str)] = &[
    ("l'lVOICE", "INVOICE"),
    ("lNVOlCE", "INVOICE"),
    ("lNVOICE", "INVOICE"),
    ("INV0ICE", "INVOICE"),
    ("GSTlN", "GSTIN"),
    ("GST|N", "GSTIN"),
    ("GST!N", "GSTIN"),
];

/// GSTIN-shaped substring, any case. GST identifiers are
/// case-sensitive downstream and OCR frequently emits mixed case.
fn re_gstin() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| {
        Regex::new(r"[0-9]{2}[A-Za-z]{5}[0-9]{4}[A-Za-z][1-9A-Za-z][Zz][0-9A-Za-z]")
            .expect("invalid regex")
    })
}

/// Merge per-engine line sequences into one best-effort text.
///
/// Alignment is positional: line i of each engine is assumed to
/// describe the same physical row. That holds for line-aligned
/// documents and degrades gracefully when it does not — the output
/// may be garbled but is never invented, since exactly one candidate
/// is chosen per position.
pub fn consolidate(results: &[EngineResult]) -> Result<String, ConsolidateError> {
    let texts: Vec<String> = results
        .iter()
        .filter(|r| !r.is_empty())
        .map(|r| r.text())
        .collect();

    tracing::info!(engines = results.len(), non_empty = texts.len(), "consolidating OCR results");

    match texts.len() {
        0 => Err(ConsolidateError::AllEnginesFailed),
        // A single voice needs no vote.
        1 => Ok(texts.into_iter().next().unwrap()),
        _ => Ok(merge_by_line(&texts)),
    }
}

fn merge_by_line(texts: &[String]) -> String {
    let sequences: Vec<Vec<&str>> = texts.iter().map(|t| t.lines().collect()).collect();
    let max_lines = sequences.iter().map(Vec::len).max().unwrap_or(0);

    let mut chosen: Vec<&str> = Vec::with_capacity(max_lines);
    for position in 0..max_lines {
        // Missing rows count as empty padding, not as candidates.
        let candidates: Vec<&str> = sequences
            .iter()
            .filter_map(|lines| lines.get(position).copied())
            .filter(|line| !line.trim().is_empty())
            .collect();
        if let Some(best) = vote(&candidates) {
            chosen.push(best);
        }
    }

    // Positional alignment produces runs of identical lines; collapse them.
    let mut deduped: Vec<&str> = Vec::with_capacity(chosen.len());
    for line in chosen {
        if deduped.last() != Some(&line) {
            deduped.push(line);
        }
    }

    let mut text = deduped.join("\n");
    for (garbled, canonical) in CONFUSIONS {
        text = text.replace(garbled, canonical);
    }
    re_gstin()
        .replace_all(&text, |caps: &regex::Captures| caps[0].to_uppercase())
        .into_owned()
}

/// Plurality wins; when every candidate is distinct the longest wins
/// (longer usually means less mis-detected collapse, not necessarily
/// correctness). The full ordering — count, then length, then
/// lexicographic — makes the choice independent of engine order.
fn vote<'a>(candidates: &[&'a str]) -> Option<&'a str> {
    let mut counted: Vec<(&str, usize)> = Vec::new();
    for &candidate in candidates {
        match counted.iter_mut().find(|(text, _)| *text == candidate) {
            Some((_, count)) => *count += 1,
            None => counted.push((candidate, 1)),
        }
    }
    counted
        .into_iter()
        .max_by(|(a, ca), (b, cb)| {
            ca.cmp(cb)
                .then(a.len().cmp(&b.len()))
                .then_with(|| b.cmp(a))
        })
        .map(|(text, _)| text)
}
