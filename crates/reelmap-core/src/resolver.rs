//! Choosing the single country a movie is counted under.

use reelmap_models::ProductionCountry;

/// National cinemas the metadata source tends to file under a Western
/// co-producer. The first of these in a production list beats any earlier entry.
pub const PRIORITY_COUNTRIES: [&str; 9] = ["IR", "MA", "SU", "RU", "JP", "KR", "CN", "HK", "IN"];

/// Dissolved or superseded codes and their successor state
const HISTORICAL_COUNTRIES: [(&str, &str); 4] = [
    ("SU", "RU"), // Soviet Union
    ("CS", "CZ"), // Czechoslovakia
    ("YU", "RS"), // Yugoslavia
    ("DD", "DE"), // East Germany
];

/// Map a historical code to its modern successor. Modern codes pass through.
pub fn normalize_country_code(code: &str) -> String {
    let code = code.trim();
    HISTORICAL_COUNTRIES
        .iter()
        .find(|(old, _)| old.eq_ignore_ascii_case(code))
        .map(|(_, new)| new.to_string())
        .unwrap_or_else(|| code.to_uppercase())
}

pub fn normalize_country_list(countries: &[ProductionCountry]) -> Vec<String> {
    countries
        .iter()
        .map(|c| normalize_country_code(&c.iso_3166_1))
        .collect()
}

pub fn is_priority_country(code: &str) -> bool {
    PRIORITY_COUNTRIES.iter().any(|p| p.eq_ignore_ascii_case(code))
}

/// Pick the primary country, already normalized.
///
/// Origin country wins outright; otherwise the first priority-set production
/// country; otherwise the first production country. `None` when both lists are empty.
pub fn resolve_primary_country(origin: &[String], production: &[ProductionCountry]) -> Option<String> {
    if let Some(first_origin) = origin.iter().find(|c| !c.trim().is_empty()) {
        return Some(normalize_country_code(first_origin));
    }

    production
        .iter()
        .find(|c| is_priority_country(&c.iso_3166_1))
        .or_else(|| production.first())
        .map(|c| normalize_country_code(&c.iso_3166_1))
}

/// Order a normalized country list so the primary comes first, followed by
/// the remaining countries in their original order without repeating it.
pub fn order_with_primary(primary: Option<&str>, normalized: &[String]) -> Vec<String> {
    let Some(primary) = primary else {
        return normalized.to_vec();
    };

    let mut ordered = Vec::with_capacity(normalized.len() + 1);
    ordered.push(primary.to_string());
    ordered.extend(normalized.iter().filter(|c| c.as_str() != primary).cloned());
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn countries(codes: &[&str]) -> Vec<ProductionCountry> {
        codes.iter().map(|c| ProductionCountry::new(*c, "")).collect()
    }

    #[test]
    fn test_origin_country_wins_over_production() {
        let origin = vec!["FR".to_string(), "US".to_string()];
        assert_eq!(resolve_primary_country(&origin, &countries(&["JP", "US"])), Some("FR".to_string()));
    }

    #[test]
    fn test_origin_country_is_normalized() {
        let origin = vec!["SU".to_string()];
        assert_eq!(resolve_primary_country(&origin, &countries(&["FR"])), Some("RU".to_string()));
    }

    #[test]
    fn test_blank_origin_entries_are_skipped() {
        let origin = vec!["".to_string(), " ".to_string(), "IT".to_string()];
        assert_eq!(resolve_primary_country(&origin, &countries(&["JP"])), Some("IT".to_string()));

        let blank = vec!["".to_string()];
        assert_eq!(resolve_primary_country(&blank, &countries(&["GB", "JP"])), Some("JP".to_string()));
    }

    #[test]
    fn test_priority_country_beats_earlier_entry() {
        assert_eq!(resolve_primary_country(&[], &countries(&["FR", "DE", "IR", "JP"])), Some("IR".to_string()));
        assert_eq!(resolve_primary_country(&[], &countries(&["US", "HK"])), Some("HK".to_string()));
        assert_eq!(resolve_primary_country(&[], &countries(&["GB", "KR"])), Some("KR".to_string()));
    }

    #[test]
    fn test_first_production_country_without_priority_match() {
        assert_eq!(resolve_primary_country(&[], &countries(&["GB", "US"])), Some("GB".to_string()));
    }

    #[test]
    fn test_no_countries_at_all() {
        assert_eq!(resolve_primary_country(&[], &[]), None);
    }

    #[test]
    fn test_stalker_resolves_to_russia() {
        // Soviet production, no origin country
        let production = countries(&["SU"]);
        let primary = resolve_primary_country(&[], &production);
        assert_eq!(primary.as_deref(), Some("RU"));
        assert_eq!(order_with_primary(primary.as_deref(), &normalize_country_list(&production)), vec!["RU"]);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        for code in ["SU", "CS", "YU", "DD", "RU", "FR", "us"] {
            let once = normalize_country_code(code);
            assert_eq!(normalize_country_code(&once), once);
        }
        assert_eq!(normalize_country_code("CZ"), "CZ");
        assert_eq!(normalize_country_code("YU"), "RS");
        assert_eq!(normalize_country_code("DD"), "DE");
    }

    #[test]
    fn test_whole_list_is_normalized() {
        assert_eq!(normalize_country_list(&countries(&["DD", "CS", "FR"])), vec!["DE", "CZ", "FR"]);
    }

    #[test]
    fn test_order_with_primary() {
        let normalized = vec!["FR".to_string(), "IR".to_string(), "DE".to_string()];
        assert_eq!(order_with_primary(Some("IR"), &normalized), vec!["IR", "FR", "DE"]);
        // Origin country not among the production countries
        assert_eq!(order_with_primary(Some("US"), &normalized), vec!["US", "FR", "IR", "DE"]);
        assert_eq!(order_with_primary(None, &[]), Vec::<String>::new());
    }
}
