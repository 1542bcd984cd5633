use serde::{Deserialize, Serialize};

/// The fixed application-status workflow. Stored as its SCREAMING_SNAKE
/// string form; anything else is rejected at the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Applied,
    Shortlisted,
    TestCleared,
    InterviewCleared,
    Offer,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "APPLIED",
            ApplicationStatus::Shortlisted => "SHORTLISTED",
            ApplicationStatus::TestCleared => "TEST_CLEARED",
            ApplicationStatus::InterviewCleared => "INTERVIEW_CLEARED",
            ApplicationStatus::Offer => "OFFER",
            ApplicationStatus::Rejected => "REJECTED",
        }
    }

    /// Parses a caller-supplied status. Tolerates surrounding whitespace and
    /// lowercase input; unknown values return `None`.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_uppercase().as_str() {
            "APPLIED" => Some(ApplicationStatus::Applied),
            "SHORTLISTED" => Some(ApplicationStatus::Shortlisted),
            "TEST_CLEARED" => Some(ApplicationStatus::TestCleared),
            "INTERVIEW_CLEARED" => Some(ApplicationStatus::InterviewCleared),
            "OFFER" => Some(ApplicationStatus::Offer),
            "REJECTED" => Some(ApplicationStatus::Rejected),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_known_statuses() {
        for (input, expected) in [
            ("APPLIED", ApplicationStatus::Applied),
            ("SHORTLISTED", ApplicationStatus::Shortlisted),
            ("TEST_CLEARED", ApplicationStatus::TestCleared),
            ("INTERVIEW_CLEARED", ApplicationStatus::InterviewCleared),
            ("OFFER", ApplicationStatus::Offer),
            ("REJECTED", ApplicationStatus::Rejected),
        ] {
            assert_eq!(ApplicationStatus::parse(input), Some(expected));
        }
    }

    #[test]
    fn test_parse_tolerates_case_and_whitespace() {
        assert_eq!(
            ApplicationStatus::parse(" offer \n"),
            Some(ApplicationStatus::Offer)
        );
    }

    #[test]
    fn test_parse_rejects_unknown_status() {
        assert_eq!(ApplicationStatus::parse("HIRED"), None);
        assert_eq!(ApplicationStatus::parse(""), None);
    }

    #[test]
    fn test_as_str_round_trips() {
        let status = ApplicationStatus::TestCleared;
        assert_eq!(ApplicationStatus::parse(status.as_str()), Some(status));
    }

    #[test]
    fn test_serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&ApplicationStatus::InterviewCleared).unwrap();
        assert_eq!(json, "\"INTERVIEW_CLEARED\"");
    }
}
