//! Prompt assembly
//!
//! `preamble + rules + input explanation + output format + data`. The output
//! format block depends on the model family: `qwen*` models follow a
//! field-by-field JSON schema well, others get a compact inline example.

use crate::prompt::ModelInput;

const PREAMBLE: &str = "You are an AI Assistant specializing in analyzing anomaly detection results for multivariate time series data.
The categories of information you are given are OS (Operating System), WAS (Web Application Server), and Service (A series of steps to process a user request).
For each category, you will be given an indicator and explanation of the anomaly detected.";

const RULES: &str = "

※ You must follow the rules below.
1. You must answer in Korean.
2. Provide clear, logical, and detailed analysis based on input data.
3. Analyze the cause of the anomaly detection and provide possible scenarios.
4. Provide technical and specific possible actions for each anomaly.
5. Maintain a consistent response format to improve readability.";

const INPUT_EXPLANATION: &str = "

※ Describe the input information:
1. Time of anomaly: Represents the time when the anomaly occurred. This is the timestamp detected by the system and is provided in the format YYYY-MM-DD HH:MM:SS.
2. Target Name: Refers to the ID of the target where the anomaly occurred. This serves as an identifier for the monitored service, server, or specific component.
3. Instance type of anomaly: Indicates the instance type of the affected target. It consists of WAS, OS.
4. Anomalous metrics: These are the key metrics that contributed to the anomaly detection. For each metric, the model's predicted value is compared to the actual observed value from the system. The difference between these values determines the severity of the anomaly.
    - For each anomalous metric, its definition is provided.
{metrics_definition}
";

const SCHEMA_INSTRUCTIONS: &str = r#"The output should be formatted as a JSON instance that conforms to the JSON schema below.

Here is the output schema:
```
{"properties": {"inst_type": {"description": "Type of instance", "type": "string"}, "target_id": {"description": "Target ID", "type": "string"}, "situation": {"description": "situation analysis", "type": "string"}, "issue": {"description": "Use a bulleted description with a generic event name to list the events that might be causing the anomaly and a detailed description.", "type": "string"}, "solution": {"description": "In the solution, use bullet points to list clear ways to resolve the anomaly.", "type": "string"}, "etc": {"description": "Other views of the current situation", "type": "string"}}, "required": ["inst_type", "target_id", "situation", "issue", "solution", "etc"]}
```"#;

const INLINE_FORMAT: &str = r#"※ Output Format
{"inst_type": "your answer", "target_id": "your answer", "situation": "your answer", "issues": "your answer", "solutions": "your answer"}"#;

/// Output-format variant chosen by model name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStyle {
    Schema,
    Inline,
}

impl PromptStyle {
    pub fn for_model(model_name: &str) -> Self {
        if model_name.to_ascii_lowercase().starts_with("qwen") {
            PromptStyle::Schema
        } else {
            PromptStyle::Inline
        }
    }
}

/// Assemble the full prompt text
pub fn render_prompt(style: PromptStyle, input: &ModelInput) -> String {
    let mut prompt = String::with_capacity(4096);
    prompt.push_str(PREAMBLE);
    prompt.push_str(RULES);
    prompt.push_str(&INPUT_EXPLANATION.replace("{metrics_definition}", &input.metrics_definition));
    prompt.push_str("\n\n");
    prompt.push_str(match style {
        PromptStyle::Schema => SCHEMA_INSTRUCTIONS,
        PromptStyle::Inline => INLINE_FORMAT,
    });
    prompt.push_str("\n\n※ Data delivered to you\n");
    prompt.push_str(&input.input_data);
    prompt
}
