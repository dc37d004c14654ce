//! Rejection reason taxonomy
//!
//! Payers send free-form reason code strings. They are mapped into a closed
//! variant set at the boundary so category logic downstream (fraud engine,
//! reporting) stays exhaustive; anything unrecognised lands in
//! `Unclassified` rather than being matched ad hoc later.

use serde::{Deserialize, Serialize};
use std::fmt;

/// High-level denial category derived from the reason code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialCategory {
    Documentation,
    Coding,
    Eligibility,
    MedicalNecessity,
    Other,
}

/// Closed set of payer rejection reason codes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    /// Required supporting documents missing from the submission
    MissingDocumentation,
    /// Medical report incomplete or illegible
    IncompleteMedicalReport,
    /// Service code not recognised or retired
    InvalidServiceCode,
    /// Bundled components submitted as separate lines
    UnbundledService,
    /// Coded complexity unsupported by the encounter record
    UpcodedService,
    /// Member not eligible on the service date
    MemberNotEligible,
    /// Policy lapsed or terminated before the service date
    PolicyNotInForce,
    /// Service requires prior authorization that was not obtained
    PriorAuthorizationMissing,
    /// Payer judged the service not medically necessary
    NotMedicallyNecessary,
    /// Same service already adjudicated
    DuplicateSubmission,
    /// Anything the mapping does not recognise; raw code preserved
    Unclassified(String),
}

impl ReasonCode {
    /// Maps a payer-supplied code string into the closed set
    pub fn parse(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "DOC-01" | "MISSING_DOCS" => ReasonCode::MissingDocumentation,
            "DOC-02" | "INCOMPLETE_REPORT" => ReasonCode::IncompleteMedicalReport,
            "COD-01" | "INVALID_CODE" => ReasonCode::InvalidServiceCode,
            "COD-02" | "UNBUNDLED" => ReasonCode::UnbundledService,
            "COD-03" | "UPCODED" => ReasonCode::UpcodedService,
            "ELG-01" | "NOT_ELIGIBLE" => ReasonCode::MemberNotEligible,
            "ELG-02" | "POLICY_LAPSED" => ReasonCode::PolicyNotInForce,
            "ELG-03" | "NO_PRIOR_AUTH" => ReasonCode::PriorAuthorizationMissing,
            "MED-01" | "NOT_NECESSARY" => ReasonCode::NotMedicallyNecessary,
            "GEN-01" | "DUPLICATE" => ReasonCode::DuplicateSubmission,
            other => ReasonCode::Unclassified(other.to_string()),
        }
    }

    /// Returns the denial category for this reason
    pub fn category(&self) -> DenialCategory {
        match self {
            ReasonCode::MissingDocumentation | ReasonCode::IncompleteMedicalReport => {
                DenialCategory::Documentation
            }
            ReasonCode::InvalidServiceCode
            | ReasonCode::UnbundledService
            | ReasonCode::UpcodedService => DenialCategory::Coding,
            ReasonCode::MemberNotEligible
            | ReasonCode::PolicyNotInForce
            | ReasonCode::PriorAuthorizationMissing => DenialCategory::Eligibility,
            ReasonCode::NotMedicallyNecessary => DenialCategory::MedicalNecessity,
            ReasonCode::DuplicateSubmission | ReasonCode::Unclassified(_) => DenialCategory::Other,
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReasonCode::Unclassified(code) => write!(f, "unclassified({})", code),
            other => write!(f, "{:?}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_codes() {
        assert_eq!(ReasonCode::parse("DOC-01"), ReasonCode::MissingDocumentation);
        assert_eq!(ReasonCode::parse("unbundled"), ReasonCode::UnbundledService);
        assert_eq!(ReasonCode::parse(" ELG-02 "), ReasonCode::PolicyNotInForce);
    }

    #[test]
    fn test_parse_unknown_code_preserved() {
        let code = ReasonCode::parse("XYZ-99");
        assert_eq!(code, ReasonCode::Unclassified("XYZ-99".to_string()));
        assert_eq!(code.category(), DenialCategory::Other);
    }

    #[test]
    fn test_category_mapping() {
        assert_eq!(
            ReasonCode::IncompleteMedicalReport.category(),
            DenialCategory::Documentation
        );
        assert_eq!(ReasonCode::UpcodedService.category(), DenialCategory::Coding);
        assert_eq!(
            ReasonCode::MemberNotEligible.category(),
            DenialCategory::Eligibility
        );
        assert_eq!(
            ReasonCode::NotMedicallyNecessary.category(),
            DenialCategory::MedicalNecessity
        );
    }
}
