//! Template-based rewording of a status summary for different audiences.

use serde::Serialize;
use strum_macros::{Display, EnumString};

pub const DEFAULT_SUMMARY: &str = "This week we made solid progress. Several features were completed and blockers were resolved. The team is on track for the upcoming milestone.";

const EXECUTIVE_SENTENCES: usize = 3;

const CLIENT_REPLACEMENTS: &[(&str, &str)] = &[
    ("IN_PROGRESS", "actively in development"),
    ("BLOCKED", "pending resolution"),
    ("DONE", "successfully completed"),
    ("PR", "pull request"),
    ("API", "integration layer"),
    ("backend", "server infrastructure"),
    ("frontend", "user interface"),
    ("bug", "issue"),
    ("error", "anomaly"),
    ("crash", "unexpected behaviour"),
    ("fix", "resolve"),
    ("Fix", "Resolve"),
];

const TECHNICAL_REPLACEMENTS: &[(&str, &str)] = &[
    ("issue", "bug"),
    ("resolve", "fix"),
    ("Resolve", "Fix"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Tone {
    Client,
    Technical,
    Executive,
}

impl Tone {
    pub const ALL: [Tone; 3] = [Tone::Client, Tone::Technical, Tone::Executive];

    /// Unknown names fall back to [`Tone::Client`].
    pub fn parse_or_client(name: &str) -> Self {
        name.trim().parse().unwrap_or(Tone::Client)
    }

    pub fn prefix(self) -> &'static str {
        match self {
            Tone::Client => "This week, your team delivered strong results.",
            Tone::Technical => "Sprint update: engineering metrics and progress follow.",
            Tone::Executive => "Project status: on-track. Key highlights below.",
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Tone::Client => "We remain committed to timely delivery and quality outcomes.",
            Tone::Technical => "Next sprint will focus on resolving blockers and technical debt.",
            Tone::Executive => "Investment is delivering expected ROI. No critical escalations.",
        }
    }

    /// Shown next to the rewritten text in the UI.
    pub fn style(self) -> &'static str {
        match self {
            Tone::Client => "professional and reassuring",
            Tone::Technical => "engineering-focused with metrics",
            Tone::Executive => "concise and outcome-focused",
        }
    }

    pub fn transform(self, text: &str) -> String {
        match self {
            Tone::Client => replace_all(text, CLIENT_REPLACEMENTS),
            Tone::Technical => replace_all(text, TECHNICAL_REPLACEMENTS),
            Tone::Executive => condense(text),
        }
    }
}

fn replace_all(text: &str, replacements: &[(&str, &str)]) -> String {
    replacements
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}

/// Collapses whitespace and keeps the first few `". "`-separated fragments.
fn condense(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut result = collapsed
        .split(". ")
        .take(EXECUTIVE_SENTENCES)
        .collect::<Vec<_>>()
        .join(". ")
        .trim()
        .to_string();
    if !result.ends_with('.') {
        result.push('.');
    }
    result
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rewrite {
    pub tone: Tone,
    pub style: String,
    pub rewritten_summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllTones {
    pub client: Rewrite,
    pub technical: Rewrite,
    pub executive: Rewrite,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RewriteResult {
    Single(Rewrite),
    All { all_tones: AllTones },
}

pub fn rewrite(tone: Tone, text: &str) -> Rewrite {
    Rewrite {
        tone,
        style: tone.style().to_string(),
        rewritten_summary: format!("{} {} {}", tone.prefix(), tone.transform(text), tone.suffix()),
    }
}

/// `tone` is a tone name or `"all"`; blank text uses [`DEFAULT_SUMMARY`].
pub fn rewrite_summary(tone: &str, text: Option<&str>) -> RewriteResult {
    let text = text
        .filter(|text| !text.trim().is_empty())
        .unwrap_or(DEFAULT_SUMMARY);

    if tone.trim().eq_ignore_ascii_case("all") {
        return RewriteResult::All {
            all_tones: AllTones {
                client: rewrite(Tone::Client, text),
                technical: rewrite(Tone::Technical, text),
                executive: rewrite(Tone::Executive, text),
            },
        };
    }
    RewriteResult::Single(rewrite(Tone::parse_or_client(tone), text))
}
