//! Best-effort parser for the four-section refiner layout.
//!
//! ```text
//! TECHNICAL PROMPT: <text>
//! TOPPINGS: - <item1> - <item2>
//! ALLERGIES: - <item1> - <item2>
//! PARAMETERS: <text>
//! ```
//!
//! Anything that does not fit the layout is dropped without error.

use serde::{Deserialize, Serialize};

/// Structured result of prompt refinement.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinedPrompt {
    /// Detailed prompt for the text-to-3D service.
    pub enhanced_prompt: String,
    /// Suggested toppings, first-seen order, no duplicates.
    pub toppings: Vec<String>,
    /// Common allergens, first-seen order, no duplicates.
    pub allergies: Vec<String>,
    /// Free-text printing parameters.
    pub technical_parameters: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
    TechnicalPrompt,
    Toppings,
    Allergies,
    Parameters,
}

const HEADERS: [(&str, Section); 4] = [
    ("TECHNICAL PROMPT:", Section::TechnicalPrompt),
    ("TOPPINGS:", Section::Toppings),
    ("ALLERGIES:", Section::Allergies),
    ("PARAMETERS:", Section::Parameters),
];

/// Marker that opens a list item.
const BULLET: char = '-';
/// Separator between several items written on one line.
const INLINE_SEPARATOR: &str = " - ";

/// Parse model output into a [`RefinedPrompt`].
#[must_use]
pub fn parse_refined(text: &str) -> RefinedPrompt {
    let mut out = RefinedPrompt::default();
    let mut current: Option<Section> = None;

    for raw in text.lines() {
        let mut line = raw.trim();

        if let Some((section, rest)) = split_header(line) {
            current = Some(section);
            line = rest.trim();
        }

        let Some(section) = current else {
            continue;
        };

        match section {
            Section::TechnicalPrompt => push_line(&mut out.enhanced_prompt, line),
            Section::Parameters => push_line(&mut out.technical_parameters, line),
            Section::Toppings => push_items(&mut out.toppings, line),
            Section::Allergies => push_items(&mut out.allergies, line),
        }
    }

    out.enhanced_prompt = out.enhanced_prompt.trim().to_string();
    out.technical_parameters = out.technical_parameters.trim().to_string();
    out
}

fn split_header(line: &str) -> Option<(Section, &str)> {
    HEADERS
        .iter()
        .find_map(|(header, section)| line.strip_prefix(header).map(|rest| (*section, rest)))
}

fn push_line(buf: &mut String, line: &str) {
    buf.push_str(line);
    buf.push('\n');
}

/// Append bullet items; lines without a leading marker are ignored.
fn push_items(list: &mut Vec<String>, line: &str) {
    let Some(items) = line.strip_prefix(BULLET) else {
        return;
    };

    for item in items.split(INLINE_SEPARATOR).map(str::trim) {
        if !item.is_empty() && !list.iter().any(|seen| seen == item) {
            list.push(item.to_string());
        }
    }
}
