//! Resume scoring — pluggable, trait-based scorer over raw resume text.
//!
//! Default: `KeywordResumeScorer` (pure-Rust, fast, deterministic, fully
//! testable). `AppState` holds an `Arc<dyn ResumeScorer>` so a different
//! backend can be swapped in at startup without touching handlers.

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

// Component weights; must sum to 1.0.
const WEIGHT_SKILLS: f64 = 0.5;
const WEIGHT_IMPACT: f64 = 0.25;
const WEIGHT_SECTIONS: f64 = 0.15;
const WEIGHT_CONTACT: f64 = 0.1;

const EXPECTED_SECTIONS: &[&str] = &["education", "experience", "project", "skill"];

/// One required skill found in the resume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillMatch {
    pub skill: String,
    pub mentions: u32,
}

/// Full analysis returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeReport {
    pub overall_score: u32, // 0 – 100
    pub skill_score: f64,
    pub impact_score: f64,
    pub section_score: f64,
    pub contact_score: f64,
    pub matched_skills: Vec<SkillMatch>,
    pub missing_skills: Vec<String>,
    pub missing_sections: Vec<String>,
    pub suggestions: Vec<String>,
    pub scorer_backend: String,
}

/// The resume scorer trait. Implement this to swap backends without
/// touching the endpoint or handler code.
#[async_trait]
pub trait ResumeScorer: Send + Sync {
    async fn score(
        &self,
        resume_text: &str,
        required_skills: &[String],
    ) -> Result<ResumeReport, AppError>;
}

/// Pure-Rust keyword/regex scorer.
///
/// Components:
/// - skills: fraction of the drive's required skills mentioned (word-bounded,
///   case-insensitive); 1.0 when the drive lists none
/// - impact: fraction of content lines carrying a quantified outcome
/// - sections: presence of education/experience/project/skill headings
/// - contact: an email address and a phone number are detectable
pub struct KeywordResumeScorer;

#[async_trait]
impl ResumeScorer for KeywordResumeScorer {
    async fn score(
        &self,
        resume_text: &str,
        required_skills: &[String],
    ) -> Result<ResumeReport, AppError> {
        Ok(compute_keyword_report(resume_text, required_skills))
    }
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\s@]+@[^\s@]+\.[^\s@]+").expect("email regex"))
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\+?\d[\d\s\-]{8,}\d").expect("phone regex"))
}

fn compute_keyword_report(resume_text: &str, required_skills: &[String]) -> ResumeReport {
    let text_lower = resume_text.to_lowercase();

    let mut matched_skills = Vec::new();
    let mut missing_skills = Vec::new();
    for skill in required_skills {
        let mentions = count_mentions(resume_text, skill);
        if mentions > 0 {
            matched_skills.push(SkillMatch {
                skill: skill.clone(),
                mentions,
            });
        } else {
            missing_skills.push(skill.clone());
        }
    }
    let skill_score = if required_skills.is_empty() {
        1.0
    } else {
        matched_skills.len() as f64 / required_skills.len() as f64
    };

    let content_lines: Vec<&str> = resume_text
        .lines()
        .map(str::trim)
        .filter(|l| l.len() >= 20)
        .collect();
    let quantified = content_lines
        .iter()
        .filter(|l| line_is_quantified(l))
        .count();
    let impact_score = if content_lines.is_empty() {
        0.0
    } else {
        (quantified as f64 / content_lines.len() as f64).clamp(0.0, 1.0)
    };

    let missing_sections: Vec<String> = EXPECTED_SECTIONS
        .iter()
        .filter(|s| !text_lower.contains(*s))
        .map(|s| s.to_string())
        .collect();
    let section_score = (EXPECTED_SECTIONS.len() - missing_sections.len()) as f64
        / EXPECTED_SECTIONS.len() as f64;

    let has_email = email_regex().is_match(resume_text);
    let has_phone = phone_regex().is_match(resume_text);
    let contact_score = (has_email as u32 as f64 + has_phone as u32 as f64) / 2.0;

    let overall = WEIGHT_SKILLS * skill_score
        + WEIGHT_IMPACT * impact_score
        + WEIGHT_SECTIONS * section_score
        + WEIGHT_CONTACT * contact_score;
    let overall_score = (overall * 100.0).round().clamp(0.0, 100.0) as u32;

    let suggestions = build_suggestions(
        &missing_skills,
        impact_score,
        &missing_sections,
        has_email,
        has_phone,
    );

    ResumeReport {
        overall_score,
        skill_score,
        impact_score,
        section_score,
        contact_score,
        matched_skills,
        missing_skills,
        missing_sections,
        suggestions,
        scorer_backend: "keyword".to_string(),
    }
}

/// Word-bounded, case-insensitive mention count. A hand-rolled boundary is
/// used instead of `\b` so skills ending in symbols ("C++") still match.
fn count_mentions(text: &str, skill: &str) -> u32 {
    let pattern = format!(r"(?i)(^|[^\w]){}([^\w]|$)", regex::escape(skill.trim()));
    match Regex::new(&pattern) {
        Ok(re) => re.find_iter(text).count() as u32,
        Err(_) => 0,
    }
}

/// A line counts as quantified when it carries a number, percentage, or
/// currency amount.
fn line_is_quantified(line: &str) -> bool {
    let has_digit = line.chars().any(|c| c.is_ascii_digit());
    has_digit || line.contains('%') || line.contains('$') || line.contains('₹')
}

fn build_suggestions(
    missing_skills: &[String],
    impact_score: f64,
    missing_sections: &[String],
    has_email: bool,
    has_phone: bool,
) -> Vec<String> {
    let mut suggestions = Vec::new();

    if !missing_skills.is_empty() {
        let top: Vec<&str> = missing_skills.iter().take(3).map(String::as_str).collect();
        suggestions.push(format!(
            "Add evidence for the required skills not found: {}.",
            top.join(", ")
        ));
    }
    if impact_score < 0.3 {
        suggestions.push(
            "Quantify your achievements — add numbers, percentages, or time saved.".to_string(),
        );
    }
    for section in missing_sections {
        suggestions.push(format!("Add a {section} section."));
    }
    if !has_email || !has_phone {
        suggestions.push("Include an email address and a phone number.".to_string());
    }

    suggestions
}
