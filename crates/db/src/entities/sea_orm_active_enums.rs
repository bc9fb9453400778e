//! `SeaORM` active enums mirroring the Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use midyear_core::allocation::NonProjectAllocationType as CoreAllocationType;
use midyear_core::report::{CallType as CoreCallType, ReportStatus as CoreReportStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "report_status")]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    #[sea_orm(string_value = "not_started")]
    NotStarted,
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "submitted")]
    Submitted,
    #[sea_orm(string_value = "reopened")]
    Reopened,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "call_type")]
pub enum CallType {
    #[sea_orm(string_value = "Translation Investment")]
    #[serde(rename = "Translation Investment")]
    TranslationInvestment,
    #[sea_orm(string_value = "illumiNations Undesignated")]
    #[serde(rename = "illumiNations Undesignated")]
    IllumiNationsUndesignated,
    #[sea_orm(string_value = "Translation Tools")]
    #[serde(rename = "Translation Tools")]
    TranslationTools,
    #[sea_orm(string_value = "Capacity Building - Quality Assurance")]
    #[serde(rename = "Capacity Building - Quality Assurance")]
    CapacityBuildingQualityAssurance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    rs_type = "String",
    db_type = "Enum",
    enum_name = "non_project_allocation_type"
)]
#[serde(rename_all = "snake_case")]
pub enum NonProjectAllocationType {
    #[sea_orm(string_value = "indirect_costs")]
    IndirectCosts,
    #[sea_orm(string_value = "assessments")]
    Assessments,
    #[sea_orm(string_value = "unused_funds")]
    UnusedFunds,
    #[sea_orm(string_value = "other")]
    Other,
}

impl From<ReportStatus> for CoreReportStatus {
    fn from(status: ReportStatus) -> Self {
        match status {
            ReportStatus::NotStarted => Self::NotStarted,
            ReportStatus::Draft => Self::Draft,
            ReportStatus::Submitted => Self::Submitted,
            ReportStatus::Reopened => Self::Reopened,
        }
    }
}

impl From<CoreReportStatus> for ReportStatus {
    fn from(status: CoreReportStatus) -> Self {
        match status {
            CoreReportStatus::NotStarted => Self::NotStarted,
            CoreReportStatus::Draft => Self::Draft,
            CoreReportStatus::Submitted => Self::Submitted,
            CoreReportStatus::Reopened => Self::Reopened,
        }
    }
}

impl From<CallType> for CoreCallType {
    fn from(call_type: CallType) -> Self {
        match call_type {
            CallType::TranslationInvestment => Self::TranslationInvestment,
            CallType::IllumiNationsUndesignated => Self::IllumiNationsUndesignated,
            CallType::TranslationTools => Self::TranslationTools,
            CallType::CapacityBuildingQualityAssurance => Self::CapacityBuildingQualityAssurance,
        }
    }
}

impl From<NonProjectAllocationType> for CoreAllocationType {
    fn from(kind: NonProjectAllocationType) -> Self {
        match kind {
            NonProjectAllocationType::IndirectCosts => Self::IndirectCosts,
            NonProjectAllocationType::Assessments => Self::Assessments,
            NonProjectAllocationType::UnusedFunds => Self::UnusedFunds,
            NonProjectAllocationType::Other => Self::Other,
        }
    }
}

impl From<CoreAllocationType> for NonProjectAllocationType {
    fn from(kind: CoreAllocationType) -> Self {
        match kind {
            CoreAllocationType::IndirectCosts => Self::IndirectCosts,
            CoreAllocationType::Assessments => Self::Assessments,
            CoreAllocationType::UnusedFunds => Self::UnusedFunds,
            CoreAllocationType::Other => Self::Other,
        }
    }
}
