//! Breakdown models shared by every engine.
//!
//! A [`Breakdown`] is the ordered, structured audit trail an engine emits next
//! to its final figures. It is a first-class output: callers render it for
//! review and persist it next to the result.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single step in a calculation breakdown.
///
/// # Example
///
/// ```
/// use payroll_engine::models::BreakdownStep;
/// use rust_decimal::Decimal;
///
/// let step = BreakdownStep {
///     step_number: 1,
///     rule_id: "base_wage".to_string(),
///     label: "Base wage".to_string(),
///     detail: "Basic 5000 + housing 2000".to_string(),
///     value: Decimal::new(700000, 2),
///     is_final: false,
/// };
/// assert_eq!(step.value.to_string(), "7000.00");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownStep {
    /// The sequential step number, starting at 1.
    pub step_number: u32,
    /// Stable machine identifier of the rule that produced this step.
    pub rule_id: String,
    /// Human-readable label.
    pub label: String,
    /// Explanation of how the value was derived.
    pub detail: String,
    /// The value produced by this step.
    pub value: Decimal,
    /// True when this step carries the canonical result.
    pub is_final: bool,
}

/// The ordered list of steps produced by one calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdown {
    /// Steps in the order they were computed.
    pub steps: Vec<BreakdownStep>,
}

impl Breakdown {
    /// Returns the canonical result step: the last step flagged `is_final`.
    pub fn final_step(&self) -> Option<&BreakdownStep> {
        self.steps.iter().rfind(|s| s.is_final)
    }

    /// Finds the first step produced by the given rule.
    pub fn step(&self, rule_id: &str) -> Option<&BreakdownStep> {
        self.steps.iter().find(|s| s.rule_id == rule_id)
    }

    /// Number of steps recorded.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if no steps were recorded.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Accumulates breakdown steps, numbering them as they are pushed.
#[derive(Debug, Default)]
pub struct BreakdownBuilder {
    steps: Vec<BreakdownStep>,
}

impl BreakdownBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an intermediate step.
    pub fn step(
        &mut self,
        rule_id: &str,
        label: &str,
        detail: impl Into<String>,
        value: Decimal,
    ) -> &mut Self {
        self.push(rule_id, label, detail.into(), value, false)
    }

    /// Records the step carrying the canonical result.
    pub fn final_step(
        &mut self,
        rule_id: &str,
        label: &str,
        detail: impl Into<String>,
        value: Decimal,
    ) -> &mut Self {
        self.push(rule_id, label, detail.into(), value, true)
    }

    fn push(
        &mut self,
        rule_id: &str,
        label: &str,
        detail: String,
        value: Decimal,
        is_final: bool,
    ) -> &mut Self {
        let step_number = self.steps.len() as u32 + 1;
        self.steps.push(BreakdownStep {
            step_number,
            rule_id: rule_id.to_string(),
            label: label.to_string(),
            detail,
            value,
            is_final,
        });
        self
    }

    /// Finishes the breakdown.
    pub fn build(self) -> Breakdown {
        Breakdown { steps: self.steps }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_builder_numbers_steps_in_order() {
        let mut builder = BreakdownBuilder::new();
        builder
            .step("first", "First", "one", dec("1"))
            .step("second", "Second", "two", dec("2"))
            .final_step("third", "Third", "three", dec("3"));
        let breakdown = builder.build();

        let numbers: Vec<u32> = breakdown.steps.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(breakdown.len(), 3);
    }

    #[test]
    fn test_final_step_is_last_flagged_step() {
        let mut builder = BreakdownBuilder::new();
        builder
            .final_step("provisional", "Provisional", "", dec("10"))
            .final_step("net", "Net", "", dec("20"))
            .step("note", "Note", "", dec("0"));
        let breakdown = builder.build();

        let last = breakdown.final_step().unwrap();
        assert_eq!(last.rule_id, "net");
        assert_eq!(last.value, dec("20"));
    }

    #[test]
    fn test_final_step_none_when_nothing_flagged() {
        let mut builder = BreakdownBuilder::new();
        builder.step("only", "Only", "", dec("1"));
        assert!(builder.build().final_step().is_none());
        assert!(Breakdown::default().is_empty());
    }

    #[test]
    fn test_step_lookup_by_rule_id() {
        let mut builder = BreakdownBuilder::new();
        builder.step("base_wage", "Base wage", "", dec("7000.00"));
        let breakdown = builder.build();

        assert_eq!(breakdown.step("base_wage").unwrap().value, dec("7000.00"));
        assert!(breakdown.step("missing").is_none());
    }

    #[test]
    fn test_breakdown_step_serialization() {
        let step = BreakdownStep {
            step_number: 1,
            rule_id: "net_payable".to_string(),
            label: "Net payable".to_string(),
            detail: "Gross minus deductions".to_string(),
            value: dec("1500.50"),
            is_final: true,
        };

        let json = serde_json::to_string(&step).unwrap();
        assert!(json.contains("\"step_number\":1"));
        assert!(json.contains("\"rule_id\":\"net_payable\""));
        assert!(json.contains("\"value\":\"1500.50\""));
        assert!(json.contains("\"is_final\":true"));
    }
}
