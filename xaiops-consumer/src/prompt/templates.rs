//! Text rendering for model input

/// One line of the anomalous-metrics section
#[derive(Debug, Clone, PartialEq)]
pub struct MetricLine {
    pub name: String,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    pub avg: Option<f64>,
    pub real_value: Option<f64>,
}

/// Render the numbered input block
pub fn render_input_data(time: &str, target: &str, inst_type: &str, metrics: &[MetricLine]) -> String {
    let mut out = format!(
        "1. Time of anomaly: {}\n2. Target Name: {}\n3. Instance type of anomaly: {}\n4. Anomalous metrics:",
        time, target, inst_type
    );

    for (idx, line) in metrics.iter().enumerate() {
        out.push_str(&format!(
            "\n 4.{}. {}: The predicted allowable range is {} to {}, the average value is {}, and the current actual value is {}.",
            idx + 1,
            line.name,
            render_value(line.lower),
            render_value(line.upper),
            render_value(line.avg),
            render_value(line.real_value),
        ));
    }

    out
}

/// Render `(name, definition)` pairs, one per line
pub fn render_metrics_definition(definitions: &[(String, String)]) -> String {
    definitions
        .iter()
        .map(|(name, definition)| format!("\t\t- {}: {}\n", name, definition))
        .collect()
}

/// Whole numbers keep one decimal place (`1.0`); absent values are `unknown`
pub fn render_value(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() && v.fract() == 0.0 => format!("{:.1}", v),
        Some(v) => v.to_string(),
        None => "unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_data_layout() {
        let text = render_input_data(
            "2024-12-17 00:00:00",
            "tp01",
            "tp",
            &[MetricLine {
                name: "cpu_usage".to_string(),
                lower: Some(0.0),
                upper: Some(42.5),
                avg: None,
                real_value: Some(97.25),
            }],
        );

        assert_eq!(
            text,
            "1. Time of anomaly: 2024-12-17 00:00:00\n\
             2. Target Name: tp01\n\
             3. Instance type of anomaly: tp\n\
             4. Anomalous metrics:\n \
             4.1. cpu_usage: The predicted allowable range is 0.0 to 42.5, the average value is unknown, and the current actual value is 97.25."
        );
    }

    #[test]
    fn test_empty_metrics_section() {
        let text = render_input_data("t", "card-issue", "service", &[]);
        assert!(text.ends_with("4. Anomalous metrics:"));
    }

    #[test]
    fn test_definitions_block() {
        let text = render_metrics_definition(&[
            ("cpu_usage".to_string(), "CPU in use.".to_string()),
            ("swap_used".to_string(), "Swap in use.".to_string()),
        ]);
        assert_eq!(text, "\t\t- cpu_usage: CPU in use.\n\t\t- swap_used: Swap in use.\n");
        assert_eq!(render_metrics_definition(&[]), "");
    }
}
