//! Eligibility matching: the CGPA/backlog/branch predicate that gates
//! whether a student may apply to a drive.

use serde::Serialize;

use crate::models::drive::DriveRow;

/// A drive's gating thresholds. Unset thresholds never exclude anyone.
#[derive(Debug, Clone, Default)]
pub struct EligibilityCriteria {
    pub min_cgpa: Option<f64>,
    pub max_backlogs: Option<i32>,
    /// Empty means every branch is eligible.
    pub allowed_branches: Vec<String>,
}

impl EligibilityCriteria {
    pub fn from_drive(drive: &DriveRow) -> Self {
        Self {
            min_cgpa: drive.min_cgpa,
            max_backlogs: drive.max_backlogs,
            allowed_branches: drive.allowed_branches.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EligibilityDecision {
    pub eligible: bool,
    pub reasons: Vec<String>,
}

/// Checks one student against a drive's criteria. Threshold comparisons are
/// inclusive; branch matching ignores case.
pub fn check_eligibility(
    cgpa: f64,
    backlogs: i32,
    branch: &str,
    criteria: &EligibilityCriteria,
) -> EligibilityDecision {
    let mut reasons = Vec::new();

    if let Some(min_cgpa) = criteria.min_cgpa {
        if cgpa < min_cgpa {
            reasons.push(format!("CGPA {cgpa} is below the required {min_cgpa}"));
        }
    }

    if let Some(max_backlogs) = criteria.max_backlogs {
        if backlogs > max_backlogs {
            reasons.push(format!(
                "{backlogs} backlogs exceed the allowed {max_backlogs}"
            ));
        }
    }

    if !criteria.allowed_branches.is_empty()
        && !criteria
            .allowed_branches
            .iter()
            .any(|b| b.eq_ignore_ascii_case(branch))
    {
        reasons.push(format!("Branch {branch} is not eligible for this drive"));
    }

    EligibilityDecision {
        eligible: reasons.is_empty(),
        reasons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criteria(min_cgpa: Option<f64>, max_backlogs: Option<i32>, branches: &[&str]) -> EligibilityCriteria {
        EligibilityCriteria {
            min_cgpa,
            max_backlogs,
            allowed_branches: branches.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_no_criteria_accepts_everyone() {
        let decision = check_eligibility(4.0, 9, "CIVIL", &criteria(None, None, &[]));
        assert!(decision.eligible);
        assert!(decision.reasons.is_empty());
    }

    #[test]
    fn test_cgpa_at_minimum_passes() {
        assert!(check_eligibility(7.0, 0, "CSE", &criteria(Some(7.0), None, &[])).eligible);
    }

    #[test]
    fn test_cgpa_below_minimum_fails_with_reason() {
        let decision = check_eligibility(6.9, 0, "CSE", &criteria(Some(7.0), None, &[]));
        assert!(!decision.eligible);
        assert!(decision.reasons[0].contains("below the required 7"));
    }

    #[test]
    fn test_backlogs_at_maximum_pass() {
        assert!(check_eligibility(8.0, 2, "CSE", &criteria(None, Some(2), &[])).eligible);
    }

    #[test]
    fn test_backlogs_over_maximum_fail() {
        let decision = check_eligibility(8.0, 3, "CSE", &criteria(None, Some(2), &[]));
        assert!(!decision.eligible);
    }

    #[test]
    fn test_branch_match_ignores_case() {
        assert!(check_eligibility(8.0, 0, "cse", &criteria(None, None, &["CSE", "ECE"])).eligible);
    }

    #[test]
    fn test_branch_outside_allowed_set_fails() {
        let decision = check_eligibility(8.0, 0, "MECH", &criteria(None, None, &["CSE", "ECE"]));
        assert!(!decision.eligible);
        assert!(decision.reasons[0].contains("MECH"));
    }

    #[test]
    fn test_all_failures_are_reported_together() {
        let decision =
            check_eligibility(5.0, 4, "MECH", &criteria(Some(7.5), Some(1), &["CSE"]));
        assert!(!decision.eligible);
        assert_eq!(decision.reasons.len(), 3);
    }
}
