//! Pattern-based advisory risk classifier.
//!
//! Category weights follow the EU AI Act risk tiers (prohibited and
//! high-risk uses score highest). The classifier is advisory: it only
//! raises the confidence bar for the adaptive loop, and any implementation
//! of [`sg_core::traits::RiskClassifier`] can replace it.

use regex::Regex;
use sg_core::RiskAssessment;
use sg_core::traits::RiskClassifier;
use tracing::debug;

struct Category {
    name: &'static str,
    patterns: Vec<(Regex, f32)>,
}

pub struct PatternRiskClassifier {
    categories: Vec<Category>,
}

impl PatternRiskClassifier {
    pub fn new() -> Self {
        let compile = |pattern: &str| Regex::new(pattern).expect("hard-coded pattern compiles");

        let categories = vec![
            Category {
                name: "Biometric (Prohibited)",
                patterns: vec![
                    (
                        compile(r"\b(face scan|fingerprint|voice print|emotion detection)\b"),
                        1.0,
                    ),
                    (compile(r"\b(identify person|verify identity)\b"), 0.9),
                ],
            },
            Category {
                name: "Employment (High Risk)",
                patterns: vec![
                    (
                        compile(r"\b(resume screening|hire|fire|candidate ranking)\b"),
                        0.9,
                    ),
                    (
                        compile(r"\b(performance review|employee monitoring)\b"),
                        0.85,
                    ),
                ],
            },
            Category {
                name: "Financial (High Risk)",
                patterns: vec![
                    (
                        compile(r"\b(credit score|loan approval|insurance eligibility)\b"),
                        0.9,
                    ),
                    (compile(r"\b(invest|buy stock|crypto)\b"), 0.7),
                ],
            },
        ];

        Self { categories }
    }
}

impl Default for PatternRiskClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl RiskClassifier for PatternRiskClassifier {
    fn assess(&self, query: &str) -> RiskAssessment {
        let lowered = query.to_lowercase();
        let mut score = 0.0_f32;
        let mut triggers: Vec<&'static str> = Vec::new();

        for category in &self.categories {
            for (pattern, weight) in &category.patterns {
                if pattern.is_match(&lowered) {
                    score = score.max(*weight);
                    if !triggers.contains(&category.name) {
                        triggers.push(category.name);
                    }
                }
            }
        }

        debug!(score, ?triggers, "risk assessed");

        if score >= 0.9 {
            RiskAssessment {
                score,
                reason: format!("CRITICAL: {} (human review required)", triggers.join(", ")),
            }
        } else if score >= 0.7 {
            RiskAssessment {
                score,
                reason: format!("HIGH: {} (audit trail active)", triggers.join(", ")),
            }
        } else {
            RiskAssessment::low()
        }
    }
}
