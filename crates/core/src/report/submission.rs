//! Checks a report must pass before it can be submitted.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::allocation::{AllocationCheck, AllocationValidator, ProjectAllocationDetails};
use crate::report::types::ReportTemplate;

/// Editable report content relevant to submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportContent {
    /// Progress narrative.
    pub progress_narrative: Option<String>,
    /// Variance narrative.
    pub variance_narrative: Option<String>,
    /// Funds spent so far in the period.
    pub current_funds_spent: Option<Decimal>,
}

/// Section of the report form an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionSection {
    /// Funds spent and financial figures.
    Financials,
    /// Project allocations and their details.
    Projects,
    /// Progress and variance narratives.
    Narratives,
    /// Allocation balance and caps.
    Allocations,
}

/// Submission errors grouped by form section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionErrors(BTreeMap<SubmissionSection, Vec<String>>);

impl SubmissionErrors {
    /// Records an error under a section.
    pub fn push(&mut self, section: SubmissionSection, message: impl Into<String>) {
        self.0.entry(section).or_default().push(message.into());
    }

    /// Records several errors under a section.
    pub fn extend<I>(&mut self, section: SubmissionSection, messages: I)
    where
        I: IntoIterator<Item = String>,
    {
        for message in messages {
            self.push(section, message);
        }
    }

    /// Returns true if no section has errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Errors recorded for a section.
    #[must_use]
    pub fn section(&self, section: SubmissionSection) -> &[String] {
        self.0.get(&section).map_or(&[], Vec::as_slice)
    }

    /// Sections that have errors, in form order.
    pub fn sections(&self) -> impl Iterator<Item = SubmissionSection> + '_ {
        self.0.keys().copied()
    }

    /// Total number of errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

/// Stateless submission checker.
pub struct SubmissionRules;

impl SubmissionRules {
    /// Checks report content against the rules of its template.
    ///
    /// `projects` and `allocations` are ignored for templates without allocations.
    ///
    /// # Errors
    /// Returns the grouped errors when any rule fails.
    pub fn check(
        template: ReportTemplate,
        content: &ReportContent,
        projects: &[ProjectAllocationDetails],
        allocations: &AllocationCheck,
    ) -> Result<(), SubmissionErrors> {
        let mut errors = SubmissionErrors::default();

        if content
            .current_funds_spent
            .is_none_or(|spent| spent <= Decimal::ZERO)
        {
            errors.push(SubmissionSection::Financials, "Current funds spent is required");
        }

        if template.requires_allocations() {
            if projects.is_empty() {
                errors.push(
                    SubmissionSection::Projects,
                    "At least one project allocation is required",
                );
            }
            errors.extend(
                SubmissionSection::Projects,
                AllocationValidator::validate_project_details(projects),
            );
            if !allocations.is_valid() {
                errors.extend(SubmissionSection::Allocations, allocations.errors.clone());
            }
        }

        let limit = template.narrative_limit();
        check_narrative(&mut errors, "Progress", content.progress_narrative.as_deref(), limit);
        check_narrative(&mut errors, "Variance", content.variance_narrative.as_deref(), limit);

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

fn check_narrative(errors: &mut SubmissionErrors, name: &str, text: Option<&str>, limit: usize) {
    let text = text.unwrap_or_default();
    if text.trim().is_empty() {
        errors.push(
            SubmissionSection::Narratives,
            format!("{name} narrative is required"),
        );
    } else if text.chars().count() > limit {
        errors.push(
            SubmissionSection::Narratives,
            format!("{name} narrative must be {limit} characters or less"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::{AllocationSet, NonProjectAllocationType};
    use rust_decimal_macros::dec;

    fn content() -> ReportContent {
        ReportContent {
            progress_narrative: Some("Drafting of Mark is complete.".into()),
            variance_narrative: Some("Travel costs were lower than planned.".into()),
            current_funds_spent: Some(dec!(4200)),
        }
    }

    fn project(amount: Decimal) -> ProjectAllocationDetails {
        ProjectAllocationDetails {
            language_name: "Tharu, Dangaura".into(),
            language_code: "thl".into(),
            country: "Nepal".into(),
            amount,
            partners: vec!["Nepal Bible Translators".into()],
        }
    }

    fn balanced_check() -> AllocationCheck {
        AllocationValidator::validate(
            &AllocationSet::new(dec!(1200))
                .with_project(dec!(1000))
                .with_non_project(NonProjectAllocationType::IndirectCosts, dec!(200)),
        )
    }

    #[test]
    fn test_complete_investment_report_passes() {
        let result = SubmissionRules::check(
            ReportTemplate::Investment,
            &content(),
            &[project(dec!(1000))],
            &balanced_check(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_investment_requires_projects() {
        let check = AllocationValidator::validate(&AllocationSet::default());
        let errors =
            SubmissionRules::check(ReportTemplate::Investment, &content(), &[], &check).unwrap_err();

        assert_eq!(
            errors.section(SubmissionSection::Projects),
            ["At least one project allocation is required"]
        );
        assert!(errors.section(SubmissionSection::Allocations).is_empty());
    }

    #[test]
    fn test_investment_reports_unbalanced_allocations() {
        let check = AllocationValidator::validate(
            &AllocationSet::new(dec!(5000)).with_project(dec!(1000)),
        );
        let errors = SubmissionRules::check(
            ReportTemplate::Investment,
            &content(),
            &[project(dec!(1000))],
            &check,
        )
        .unwrap_err();

        assert_eq!(errors.len(), 1);
        assert!(errors.section(SubmissionSection::Allocations)[0].contains("does not match"));
    }

    #[test]
    fn test_missing_project_details_are_grouped_under_projects() {
        let mut incomplete = project(dec!(1000));
        incomplete.partners.clear();
        let errors = SubmissionRules::check(
            ReportTemplate::Investment,
            &content(),
            &[incomplete],
            &AllocationValidator::validate(&AllocationSet::new(dec!(1000)).with_project(dec!(1000))),
        )
        .unwrap_err();

        assert_eq!(
            errors.section(SubmissionSection::Projects),
            ["Project allocation 1 is missing: partner organization"]
        );
    }

    #[test]
    fn test_zero_funds_spent_is_rejected() {
        let mut content = content();
        content.current_funds_spent = Some(Decimal::ZERO);
        let errors = SubmissionRules::check(
            ReportTemplate::ToolCapacity,
            &content,
            &[],
            &AllocationValidator::validate(&AllocationSet::default()),
        )
        .unwrap_err();

        assert_eq!(
            errors.section(SubmissionSection::Financials),
            ["Current funds spent is required"]
        );
    }

    #[test]
    fn test_tool_capacity_ignores_allocations() {
        let unbalanced = AllocationValidator::validate(&AllocationSet::new(dec!(9999)));
        let result =
            SubmissionRules::check(ReportTemplate::ToolCapacity, &content(), &[], &unbalanced);
        assert!(result.is_ok());
    }

    #[test]
    fn test_narrative_limits_depend_on_template() {
        let mut content = content();
        content.progress_narrative = Some("a".repeat(1501));
        content.variance_narrative = Some("   ".into());
        let check = balanced_check();
        let projects = [project(dec!(1000))];

        let errors = SubmissionRules::check(ReportTemplate::Investment, &content, &projects, &check)
            .unwrap_err();
        assert_eq!(
            errors.section(SubmissionSection::Narratives),
            [
                "Progress narrative must be 1500 characters or less",
                "Variance narrative is required",
            ]
        );

        let errors =
            SubmissionRules::check(ReportTemplate::ToolCapacity, &content, &projects, &check)
                .unwrap_err();
        assert_eq!(
            errors.section(SubmissionSection::Narratives),
            ["Variance narrative is required"]
        );
    }

    #[test]
    fn test_narrative_limit_counts_characters() {
        let mut content = content();
        content.progress_narrative = Some("é".repeat(1500));
        let result = SubmissionRules::check(
            ReportTemplate::Investment,
            &content,
            &[project(dec!(1000))],
            &balanced_check(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_errors_serialize_by_section() {
        let mut errors = SubmissionErrors::default();
        errors.push(SubmissionSection::Narratives, "Progress narrative is required");
        errors.push(SubmissionSection::Financials, "Current funds spent is required");

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "financials": ["Current funds spent is required"],
                "narratives": ["Progress narrative is required"],
            })
        );
        assert_eq!(
            errors.sections().collect::<Vec<_>>(),
            [SubmissionSection::Financials, SubmissionSection::Narratives]
        );
    }
}
