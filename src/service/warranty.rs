use crate::models::{WarrantyFlag, WorkType};

const REPLACEMENT_TOKENS: &[&str] = &["repl", "rpl", "r&r", "new"];
const REPLACEMENT_PREFIXES: &[&str] = &["replac"];
const REPAIR_TOKENS: &[&str] = &["rpr", "fix"];
const REPAIR_PREFIXES: &[&str] = &["repair", "straighten"];

/// Keyword classification of a supplement description. Replacement markers win
/// over repair markers; anything else is unflagged `Service` work.
pub fn classify(description: &str) -> WarrantyFlag {
    let lowered = description.to_lowercase();
    let tokens: Vec<&str> = lowered
        .split(|c: char| !(c.is_alphanumeric() || c == '&'))
        .filter(|t| !t.is_empty())
        .collect();

    let hit = |exact: &[&str], prefixes: &[&str]| {
        tokens
            .iter()
            .any(|t| exact.contains(t) || prefixes.iter().any(|p| t.starts_with(p)))
    };

    let work_type = if hit(REPLACEMENT_TOKENS, REPLACEMENT_PREFIXES) {
        WorkType::Replacement
    } else if hit(REPAIR_TOKENS, REPAIR_PREFIXES) {
        WorkType::Repair
    } else {
        WorkType::Service
    };

    WarrantyFlag {
        flagged: work_type != WorkType::Service,
        work_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replacement_abbreviation_is_flagged() {
        let flag = classify("Repl Rear Bumper Cover");
        assert!(flag.flagged);
        assert_eq!(flag.work_type, WorkType::Replacement);
    }

    #[test]
    fn diagnostics_are_not_flagged() {
        let flag = classify("Diagnostic Scan");
        assert!(!flag.flagged);
        assert_eq!(flag.work_type, WorkType::Service);
    }

    #[test]
    fn repair_markers() {
        assert_eq!(classify("Repair LT Fender").work_type, WorkType::Repair);
        assert_eq!(classify("RPR hood dent").work_type, WorkType::Repair);
        assert_eq!(classify("Straightening frame rail").work_type, WorkType::Repair);
    }

    #[test]
    fn replacement_beats_repair() {
        assert_eq!(classify("Repair or replace door skin").work_type, WorkType::Replacement);
        assert_eq!(classify("R&R headlamp").work_type, WorkType::Replacement);
    }

    #[test]
    fn markers_must_be_whole_tokens() {
        // "prepare" contains "rep" but is not a repair marker
        assert!(!classify("Prepare surface").flagged);
        assert!(!classify("Renewal fee").flagged);
    }
}
