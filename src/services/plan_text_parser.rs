//! Extraction of structured plans from free-form generative-model text.
//!
//! Model output is wrapped in prose, code fences and the odd trailing comma.
//! All of that cleanup lives here so the builder never sees raw text.

use std::sync::OnceLock;

use regex::Regex;

use crate::errors::ParseError;
use crate::models::tour_plan::TourPlan;
use crate::services::cost_aggregator::CostAggregator;

const CODE_FENCE: &str = r"```(?:json|JSON)?";

static FENCE: OnceLock<Regex> = OnceLock::new();

pub trait PlanTextParser: Send + Sync {
    fn parse(&self, raw_text: &str) -> Result<TourPlan, ParseError>;
}

fn code_fence() -> Result<&'static Regex, ParseError> {
    if let Some(fence) = FENCE.get() {
        return Ok(fence);
    }
    let fence = Regex::new(CODE_FENCE).map_err(|e| ParseError::Malformed(e.to_string()))?;
    Ok(FENCE.get_or_init(|| fence))
}

/// Drop commas that directly precede a closing bracket. Commas inside string
/// literals are left alone.
fn strip_trailing_commas(block: &str) -> String {
    let mut out = String::with_capacity(block.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in block.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
        } else if c == ',' {
            let next = block[i + 1..].trim_start().chars().next();
            if matches!(next, Some('}') | Some(']')) {
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// Cut the outermost `open`..`close` block out of `raw`, dropping code fences
/// and trailing commas before closing brackets.
pub fn extract_json_block(raw: &str, open: char, close: char) -> Result<String, ParseError> {
    let unfenced = code_fence()?.replace_all(raw, "");
    let start = unfenced.find(open).ok_or(ParseError::NoJson)?;
    let end = unfenced.rfind(close).ok_or(ParseError::NoJson)?;
    if end < start {
        return Err(ParseError::NoJson);
    }

    Ok(strip_trailing_commas(&unfenced[start..=end]))
}

/// Parses a `TourPlan` JSON object embedded in model text. The cost summary
/// is recomputed from the entries; whatever totals the model wrote are ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonBlockPlanParser;

impl PlanTextParser for JsonBlockPlanParser {
    fn parse(&self, raw_text: &str) -> Result<TourPlan, ParseError> {
        let json = extract_json_block(raw_text, '{', '}')?;
        let mut plan: TourPlan =
            serde_json::from_str(&json).map_err(|e| ParseError::Malformed(e.to_string()))?;
        plan.cost_summary = CostAggregator::aggregate(&plan.itinerary);
        Ok(plan)
    }
}
