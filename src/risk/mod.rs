// Risk tier classification — maps scan responses to presentation bundles.
//
// The scoring API returns a risk_level string and a 0-100 score. The level
// string is untrusted (the API is an external boundary), so classification
// is total: anything unrecognized resolves to the safe/default tier rather
// than crashing or rendering blank.
//
// Two independent pure functions live here and must not be conflated:
//   - tier classification (risk_level → narrative, steps, affordances)
//   - score banding (numeric score → visual severity band for badges)

use colored::{ColoredString, Colorize};

/// One of the four fixed risk categories assigned to a scan result.
///
/// Ordering is uniform across the app: safe < low < medium < high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskLevel {
    Safe,
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Safe,
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
    ];

    /// Parse an untrusted level string. Unknown values fall back to Safe so
    /// the result path never fails on a surprise from the server.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => RiskLevel::Low,
            "medium" => RiskLevel::Medium,
            "high" => RiskLevel::High,
            _ => RiskLevel::Safe,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "safe",
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    /// Colorize a tier name for table cells and badges.
    pub fn colorize(&self, text: &str) -> ColoredString {
        match self {
            RiskLevel::High => text.red().bold(),
            RiskLevel::Medium => text.bright_red(),
            RiskLevel::Low => text.yellow(),
            RiskLevel::Safe => text.green(),
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything the result screen needs to render one tier: label, glyphs,
/// one-line summary, the "why" narrative, verification steps, and which
/// action affordances apply.
///
/// Derived, never persisted — re-derivable identically from the same scan
/// result at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierPresentation {
    pub level: RiskLevel,
    pub label: &'static str,
    pub glyph: &'static str,
    pub traffic_light: &'static str,
    pub summary: &'static str,
    pub rationale: &'static str,
    pub verification_steps: &'static [&'static str],
    /// Advise deleting the message outright (high tier only).
    pub advise_delete: bool,
    /// Offer the report-to-IT affordance (medium and high tiers).
    pub offer_report: bool,
}

static SAFE: TierPresentation = TierPresentation {
    level: RiskLevel::Safe,
    label: "LOOKS SAFE",
    glyph: "✓",
    traffic_light: "🟢",
    summary: "This email passed our security checks and appears to be legitimate.",
    rationale: "This email has proper security configurations and doesn't show typical \
                scam patterns.",
    verification_steps: &[
        "Still verify any requests for passwords or sensitive information",
        "Check that links go to the expected website before clicking",
        "If something feels wrong, trust your instincts and verify through another channel",
    ],
    advise_delete: false,
    offer_report: false,
};

static LOW: TierPresentation = TierPresentation {
    level: RiskLevel::Low,
    label: "BE CAREFUL",
    glyph: "⚠",
    traffic_light: "🟡",
    summary: "This email has some suspicious signs. Double-check before clicking anything.",
    rationale: "The sender's domain doesn't have proper security measures in place, which \
                legitimate companies always have.",
    verification_steps: &[
        "Call the company using a phone number from their official website (not from this email)",
        "Check if the sender's email address exactly matches the company's real domain",
        "Look for spelling mistakes or unusual requests",
    ],
    advise_delete: false,
    offer_report: false,
};

static MEDIUM: TierPresentation = TierPresentation {
    level: RiskLevel::Medium,
    label: "DANGER",
    glyph: "⚠",
    traffic_light: "🟠",
    summary: "This email has multiple red flags. It's likely trying to trick you.",
    rationale: "Multiple security checks failed, and the email shows patterns commonly used \
                by scammers to impersonate legitimate companies.",
    verification_steps: &[
        "Do NOT click any links or download attachments",
        "Contact the company directly using their official phone number or website",
        "Ask your IT department or a tech-savvy colleague to check it",
    ],
    advise_delete: false,
    offer_report: true,
};

static HIGH: TierPresentation = TierPresentation {
    level: RiskLevel::High,
    label: "STOP! SCAM ALERT",
    glyph: "🚨",
    traffic_light: "🔴",
    summary: "This is almost certainly a scam. Someone is pretending to be someone else to \
              steal from you.",
    rationale: "This email failed all major security checks and shows clear signs of \
                impersonation. The sender is not who they claim to be.",
    verification_steps: &[
        "DELETE this email immediately",
        "Do NOT click anything or reply",
        "Report it to your IT security team",
        "If it claims to be from a company you use, call them directly using the number on \
         their official website",
    ],
    advise_delete: true,
    offer_report: true,
};

/// Classify an untrusted risk-level string into its presentation bundle.
///
/// Total mapping: unknown strings get the safe/default bundle so the user
/// never sees an alarming empty state for a level we don't recognize.
pub fn classify(risk_level: &str) -> &'static TierPresentation {
    match RiskLevel::parse(risk_level) {
        RiskLevel::Safe => &SAFE,
        RiskLevel::Low => &LOW,
        RiskLevel::Medium => &MEDIUM,
        RiskLevel::High => &HIGH,
    }
}

/// Visual severity band for a numeric 0-100 score.
///
/// Used for secondary badges (trending-domain averages, high-risk scores).
/// Deliberately independent of tier classification: risk_level drives the
/// primary narrative, the score drives gradient coloring of numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Minimal,
    Guarded,
    Elevated,
    Severe,
}

impl ScoreBand {
    /// Band thresholds: <15 minimal, <35 guarded, <60 elevated, ≥60 severe.
    pub fn from_score(score: f64) -> Self {
        if score >= 60.0 {
            ScoreBand::Severe
        } else if score >= 35.0 {
            ScoreBand::Elevated
        } else if score >= 15.0 {
            ScoreBand::Guarded
        } else {
            ScoreBand::Minimal
        }
    }

    pub fn colorize(&self, text: &str) -> ColoredString {
        match self {
            ScoreBand::Severe => text.red().bold(),
            ScoreBand::Elevated => text.bright_red(),
            ScoreBand::Guarded => text.yellow(),
            ScoreBand::Minimal => text.green(),
        }
    }
}

/// Clamp a raw score into the displayable 0-100 range.
/// The API promises 0-100 but the value is not enforced upstream.
pub fn clamp_score(score: i64) -> u8 {
    score.clamp(0, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_tiers() {
        for level in ["safe", "low", "medium", "high"] {
            let bundle = classify(level);
            assert!(!bundle.label.is_empty(), "{level} has empty label");
            assert!(
                !bundle.verification_steps.is_empty(),
                "{level} has no verification steps"
            );
            assert_eq!(bundle.level, RiskLevel::parse(level));
        }
    }

    #[test]
    fn test_unknown_level_falls_back_to_safe() {
        assert_eq!(classify("unknown"), classify("safe"));
        assert_eq!(classify(""), classify("safe"));
        assert_eq!(classify("CRITICAL!!"), classify("safe"));
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(RiskLevel::parse("HIGH"), RiskLevel::High);
        assert_eq!(RiskLevel::parse(" Medium "), RiskLevel::Medium);
    }

    #[test]
    fn test_tier_ordering() {
        assert!(RiskLevel::Safe < RiskLevel::Low);
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
    }

    #[test]
    fn test_report_affordances() {
        assert!(classify("high").offer_report);
        assert!(classify("medium").offer_report);
        assert!(!classify("low").offer_report);
        assert!(classify("high").advise_delete);
        assert!(!classify("medium").advise_delete);
    }

    #[test]
    fn test_score_bands() {
        assert_eq!(ScoreBand::from_score(0.0), ScoreBand::Minimal);
        assert_eq!(ScoreBand::from_score(14.9), ScoreBand::Minimal);
        assert_eq!(ScoreBand::from_score(15.0), ScoreBand::Guarded);
        assert_eq!(ScoreBand::from_score(35.0), ScoreBand::Elevated);
        assert_eq!(ScoreBand::from_score(60.0), ScoreBand::Severe);
        assert_eq!(ScoreBand::from_score(100.0), ScoreBand::Severe);
    }

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(-5), 0);
        assert_eq!(clamp_score(42), 42);
        assert_eq!(clamp_score(250), 100);
    }
}
