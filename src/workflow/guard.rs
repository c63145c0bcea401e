/// Statuses this tool never mutates, compared case-insensitively.
const UNTOUCHABLE_STATUSES: &[&str] = &["done", "ready for merge", "won't do"];

pub fn is_untouchable(status_name: &str) -> bool {
    let lower = status_name.to_lowercase();
    UNTOUCHABLE_STATUSES.iter().any(|s| lower == *s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protected_statuses_match_any_case() {
        assert!(is_untouchable("Done"));
        assert!(is_untouchable("DONE"));
        assert!(is_untouchable("Ready For Merge"));
        assert!(is_untouchable("won't do"));
        assert!(is_untouchable("Won't Do"));
    }

    #[test]
    fn other_statuses_are_mutable() {
        assert!(!is_untouchable("In Progress"));
        assert!(!is_untouchable("Done-ish"));
        assert!(!is_untouchable(" done"));
        assert!(!is_untouchable(""));
    }
}
