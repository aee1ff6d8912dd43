use super::types::{GradeDefinition, GradingTable};

/// Read-only lookup over the loaded grading systems.
///
/// Consumers pick a country, then optionally narrow to one grading mode.
/// Definitions from different modes are never mixed unless no mode is chosen.
#[derive(Debug, Clone)]
pub struct GradingRegistry {
    table: GradingTable,
}

impl GradingRegistry {
    pub fn new(table: GradingTable) -> Self {
        Self { table }
    }

    /// Build a registry from loaded definitions, substituting `fallback`
    /// when nothing was loaded.
    pub fn from_definitions(definitions: Vec<GradeDefinition>, fallback: GradingTable) -> Self {
        if definitions.is_empty() {
            Self::new(fallback)
        } else {
            Self::new(GradingTable::from_definitions(definitions))
        }
    }

    pub fn countries(&self) -> Vec<&str> {
        self.table.countries().collect()
    }

    pub fn has_country(&self, country: &str) -> bool {
        self.table.get(country).is_some()
    }

    /// All definitions for a country across every grading mode.
    pub fn definitions(&self, country: &str) -> &[GradeDefinition] {
        self.table.get(country).unwrap_or(&[])
    }

    /// Distinct grading modes for a country, in first-seen order.
    pub fn grading_modes(&self, country: &str) -> Vec<&str> {
        let mut modes: Vec<&str> = Vec::new();
        for definition in self.definitions(country) {
            if !modes.contains(&definition.grading_mode.as_str()) {
                modes.push(&definition.grading_mode);
            }
        }
        modes
    }

    /// The definition slice the resolver and validator work against.
    ///
    /// `None` or an empty mode selects the country's whole pool.
    pub fn select(&self, country: &str, mode: Option<&str>) -> Vec<GradeDefinition> {
        let definitions = self.definitions(country);
        match mode.filter(|m| !m.is_empty()) {
            Some(mode) => definitions
                .iter()
                .filter(|d| d.grading_mode == mode)
                .cloned()
                .collect(),
            None => definitions.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(country: &str, mode: &str, letter: &str, points: f64) -> GradeDefinition {
        GradeDefinition {
            country: country.to_string(),
            grading_mode: mode.to_string(),
            local_grade: Some(letter.to_string()),
            us_grade_letter: Some(letter.to_string()),
            range_min: 0.0,
            range_max: 0.0,
            grade_points: points,
            description: None,
            attention: None,
            additional_scale_info: None,
        }
    }

    fn uk_registry() -> GradingRegistry {
        GradingRegistry::from_definitions(
            vec![
                definition("United Kingdom", "GCSE", "A*", 4.0),
                definition("United Kingdom", "A-Level", "A*", 4.0),
                definition("United Kingdom", "GCSE", "B", 3.0),
                definition("United Kingdom", "A-Level", "E", 1.0),
            ],
            GradingTable::builtin(),
        )
    }

    #[test]
    fn test_empty_load_uses_fallback() {
        let registry = GradingRegistry::from_definitions(vec![], GradingTable::builtin());
        assert!(registry.has_country("United States"));
        assert_eq!(registry.definitions("United States").len(), 11);
    }

    #[test]
    fn test_fallback_is_only_the_injected_table() {
        let fallback = GradingTable::from_definitions(vec![definition("Chile", "Standard", "7", 4.0)]);
        let registry = GradingRegistry::from_definitions(vec![], fallback);
        assert_eq!(registry.countries(), vec!["Chile"]);
        assert!(!registry.has_country("United States"));
    }

    #[test]
    fn test_loaded_rows_replace_fallback() {
        let registry = uk_registry();
        assert_eq!(registry.countries(), vec!["United Kingdom"]);
        assert!(!registry.has_country("United States"));
    }

    #[test]
    fn test_grading_modes_first_seen_order() {
        let registry = uk_registry();
        assert_eq!(registry.grading_modes("United Kingdom"), vec!["GCSE", "A-Level"]);
        assert!(registry.grading_modes("France").is_empty());
    }

    #[test]
    fn test_select_filters_by_mode() {
        let registry = uk_registry();
        let gcse = registry.select("United Kingdom", Some("GCSE"));
        assert_eq!(gcse.len(), 2);
        assert!(gcse.iter().all(|d| d.grading_mode == "GCSE"));
        assert_eq!(gcse[1].local_grade.as_deref(), Some("B"));
    }

    #[test]
    fn test_select_without_mode_returns_whole_pool() {
        let registry = uk_registry();
        assert_eq!(registry.select("United Kingdom", None).len(), 4);
        assert_eq!(registry.select("United Kingdom", Some("")).len(), 4);
    }

    #[test]
    fn test_select_unknown_country_or_mode_is_empty() {
        let registry = uk_registry();
        assert!(registry.select("Peru", None).is_empty());
        assert!(registry.select("United Kingdom", Some("IB")).is_empty());
    }
}
