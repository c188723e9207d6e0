//! Workflow translation display formatting

use crate::services::TranslationResult;

/// Multi-line summary of translating a workflow from the master entity
pub fn format_translation_summary(
    master_entity: &str,
    target_entity: &str,
    results: &[TranslationResult],
) -> String {
    let mut lines = vec![
        format!("Workflow Translation: {} -> {}", master_entity, target_entity),
        "=".repeat(70),
        String::new(),
    ];

    for (i, result) in results.iter().enumerate() {
        let n = i + 1;
        if result.mapped {
            if target_entity == master_entity {
                lines.push(format!("{}. {}", n, result.master_service));
            } else {
                lines.push(format!(
                    "{}. {} -> {}",
                    n, result.master_service, result.entity_service
                ));
            }
            if let Some(data) = &result.service_data {
                lines.push(format!("   Service Group 1: {}", data.service_group_1));
                lines.push(format!("   Service Group 2: {}", data.service_group_2));
                lines.push(format!("   UofM: {}", data.default_unit_of_measure));
            }
        } else {
            lines.push(format!("{}. {} -> UNMAPPED", n, result.master_service));
            if let Some(warning) = &result.warning {
                lines.push(format!("   Warning: {}", warning));
            }
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

/// One line per result, for validation output
pub fn format_validation(target_entity: &str, unmapped: &[String]) -> String {
    if unmapped.is_empty() {
        return format!("All services can be translated to {}.\n", target_entity);
    }
    let mut output = format!(
        "{} service(s) have no mapping in {}:\n",
        unmapped.len(),
        target_entity
    );
    for name in unmapped {
        output.push_str(&format!("  - {}\n", name));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_output() {
        assert!(format_validation("TPTDE", &[]).starts_with("All services"));
        let text = format_validation("TPTDE", &["Review".to_string()]);
        assert!(text.contains("1 service(s)"));
        assert!(text.contains("  - Review"));
    }
}
