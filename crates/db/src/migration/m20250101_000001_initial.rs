//! Initial database migration.
//!
//! Creates the enums and tables for organizations, applications, period
//! financials, reports and their allocations.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: ORGANIZATIONS & APPLICATIONS
        // ============================================================
        db.execute_unprepared(ORGANIZATIONS_SQL).await?;
        db.execute_unprepared(APPLICATIONS_SQL).await?;
        db.execute_unprepared(APPLICATION_FINANCIALS_SQL).await?;

        // ============================================================
        // PART 3: REPORTS
        // ============================================================
        db.execute_unprepared(APPLICATION_REPORTS_SQL).await?;

        // ============================================================
        // PART 4: ALLOCATIONS
        // ============================================================
        db.execute_unprepared(PROJECT_ALLOCATIONS_SQL).await?;
        db.execute_unprepared(NON_PROJECT_ALLOCATIONS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE report_status AS ENUM ('not_started', 'draft', 'submitted', 'reopened');

CREATE TYPE call_type AS ENUM (
    'Translation Investment',
    'illumiNations Undesignated',
    'Translation Tools',
    'Capacity Building - Quality Assurance'
);

CREATE TYPE non_project_allocation_type AS ENUM (
    'indirect_costs',
    'assessments',
    'unused_funds',
    'other'
);
";

const ORGANIZATIONS_SQL: &str = r"
CREATE TABLE organizations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    code VARCHAR(50) UNIQUE,
    contact_email VARCHAR(255),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const APPLICATIONS_SQL: &str = r"
CREATE TABLE applications (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    title VARCHAR(500) NOT NULL,
    call_type call_type NOT NULL,
    funding_stream VARCHAR(255),
    application_reference VARCHAR(100),
    award_reference VARCHAR(100),
    total_awarded NUMERIC(15, 2),
    application_year INTEGER,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_total_awarded_non_negative CHECK (total_awarded IS NULL OR total_awarded >= 0)
);

CREATE INDEX idx_applications_org ON applications(organization_id);
";

const APPLICATION_FINANCIALS_SQL: &str = r"
CREATE TABLE application_financials (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    application_id UUID NOT NULL REFERENCES applications(id) ON DELETE CASCADE,
    reporting_period_start DATE NOT NULL,
    reporting_period_end DATE NOT NULL,
    funds_received NUMERIC(15, 2) NOT NULL DEFAULT 0,
    funds_prior_year NUMERIC(15, 2) NOT NULL DEFAULT 0,
    financial_context TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_financials_period UNIQUE (application_id, reporting_period_start, reporting_period_end),
    CONSTRAINT chk_financials_period CHECK (reporting_period_end >= reporting_period_start)
);
";

const APPLICATION_REPORTS_SQL: &str = r"
CREATE TABLE application_reports (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    application_id UUID NOT NULL REFERENCES applications(id) ON DELETE CASCADE,
    reporting_period_start DATE NOT NULL,
    reporting_period_end DATE NOT NULL,
    progress_narrative TEXT,
    variance_narrative TEXT,
    financial_summary_narrative TEXT,
    current_funds_spent NUMERIC(15, 2),
    project_allocations_total NUMERIC(15, 2) NOT NULL DEFAULT 0,
    non_project_allocations_total NUMERIC(15, 2) NOT NULL DEFAULT 0,
    grand_total NUMERIC(15, 2) NOT NULL DEFAULT 0,
    status report_status NOT NULL DEFAULT 'not_started',
    submitted_at TIMESTAMPTZ,
    submitted_by UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_report_period UNIQUE (application_id, reporting_period_start, reporting_period_end),
    CONSTRAINT chk_report_period CHECK (reporting_period_end >= reporting_period_start),
    CONSTRAINT chk_submitted_at_matches_status CHECK ((status = 'submitted') = (submitted_at IS NOT NULL)),
    CONSTRAINT chk_submitted_by_matches_status CHECK ((status = 'submitted') = (submitted_by IS NOT NULL))
);

CREATE INDEX idx_reports_status ON application_reports(status, updated_at DESC);
";

const PROJECT_ALLOCATIONS_SQL: &str = r"
CREATE TABLE project_allocations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    report_id UUID NOT NULL REFERENCES application_reports(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    language_name VARCHAR(255) NOT NULL DEFAULT '',
    language_code VARCHAR(20) NOT NULL DEFAULT '',
    country VARCHAR(255) NOT NULL DEFAULT '',
    dialect_number VARCHAR(50),
    amount NUMERIC(15, 2) NOT NULL,
    all_access_goal VARCHAR(255),
    all_access_status VARCHAR(255),
    eligible_for_funding BOOLEAN,
    language_population_group VARCHAR(255),
    first_language_population BIGINT,
    egids_level VARCHAR(20),
    is_sign_language BOOLEAN,
    region VARCHAR(255),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_project_amount_non_negative CHECK (amount >= 0),
    CONSTRAINT uq_project_position UNIQUE (report_id, position)
);

CREATE TABLE project_allocation_partners (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    project_allocation_id UUID NOT NULL REFERENCES project_allocations(id) ON DELETE CASCADE,
    partner_organization_name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_partners_allocation ON project_allocation_partners(project_allocation_id);
";

const NON_PROJECT_ALLOCATIONS_SQL: &str = r"
CREATE TABLE non_project_allocations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    report_id UUID NOT NULL REFERENCES application_reports(id) ON DELETE CASCADE,
    allocation_type non_project_allocation_type NOT NULL,
    amount NUMERIC(15, 2) NOT NULL,
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_non_project_type UNIQUE (report_id, allocation_type),
    CONSTRAINT chk_non_project_amount_positive CHECK (amount > 0)
);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS non_project_allocations CASCADE;
DROP TABLE IF EXISTS project_allocation_partners CASCADE;
DROP TABLE IF EXISTS project_allocations CASCADE;
DROP TABLE IF EXISTS application_reports CASCADE;
DROP TABLE IF EXISTS application_financials CASCADE;
DROP TABLE IF EXISTS applications CASCADE;
DROP TABLE IF EXISTS organizations CASCADE;
DROP TYPE IF EXISTS non_project_allocation_type;
DROP TYPE IF EXISTS call_type;
DROP TYPE IF EXISTS report_status;
";
