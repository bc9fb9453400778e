//! Development data seeder.
//!
//! Seeds one grantee organization with an investment application and a
//! tools application, plus their financials for the configured reporting
//! period, then prints bearer tokens for trying the API locally.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, EntityTrait, Set, sea_query::OnConflict};
use uuid::Uuid;

use midyear_db::entities::{
    application_financials, applications, organizations, sea_orm_active_enums::CallType,
};
use midyear_shared::{AppConfig, JwtConfig, JwtService, UserRole};

const DEMO_ORG_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0001);
const INVESTMENT_APP_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0101);
const TOOLS_APP_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0102);

/// A demo application and the money recorded against it for the period.
struct DemoApplication {
    id: Uuid,
    title: &'static str,
    call_type: CallType,
    total_awarded: Decimal,
    funds_received: Decimal,
    funds_prior_year: Decimal,
}

fn demo_applications() -> [DemoApplication; 2] {
    [
        DemoApplication {
            id: INVESTMENT_APP_ID,
            title: "Highlands Cluster Translation",
            call_type: CallType::TranslationInvestment,
            total_awarded: Decimal::new(25_000_000, 2),
            funds_received: Decimal::new(12_000_000, 2),
            funds_prior_year: Decimal::new(1_500_000, 2),
        },
        DemoApplication {
            id: TOOLS_APP_ID,
            title: "Consultant Checking Tools",
            call_type: CallType::TranslationTools,
            total_awarded: Decimal::new(4_000_000, 2),
            funds_received: Decimal::new(2_000_000, 2),
            funds_prior_year: Decimal::ZERO,
        },
    ]
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;

    println!("Connecting to database...");
    let db = midyear_db::connect(&config.database.url, 2, 1).await?;

    println!("Seeding demo organization...");
    seed_organization(&db).await?;

    println!("Seeding demo applications...");
    for app in demo_applications() {
        seed_application(&db, &app, &config).await?;
        println!("  {} ({})", app.title, app.id);
    }

    let jwt = JwtService::new(JwtConfig {
        secret: config.jwt.secret.clone(),
        ..JwtConfig::default()
    });
    println!("Development tokens (valid for one hour):");
    for (label, org, role) in [
        ("org_user", Some(DEMO_ORG_ID), UserRole::OrgUser),
        ("staff", None, UserRole::Staff),
        ("admin", None, UserRole::Admin),
    ] {
        let token = jwt.generate_access_token(Uuid::now_v7(), org, role)?;
        println!("  {label}: {token}");
    }

    println!("Seeding complete!");
    Ok(())
}

async fn seed_organization(db: &DatabaseConnection) -> anyhow::Result<()> {
    let now = Utc::now().into();
    let org = organizations::ActiveModel {
        id: Set(DEMO_ORG_ID),
        name: Set("Demo Bible Translation Partner".to_string()),
        code: Set(Some("DEMO".to_string())),
        contact_email: Set(Some("grants@demo.example".to_string())),
        created_at: Set(now),
        updated_at: Set(now),
    };

    organizations::Entity::insert(org)
        .on_conflict(
            OnConflict::column(organizations::Column::Id)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

async fn seed_application(
    db: &DatabaseConnection,
    app: &DemoApplication,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let now = Utc::now().into();
    let period_start = config.reporting.period_start;
    let period_end = config.reporting.period_end;

    let application = applications::ActiveModel {
        id: Set(app.id),
        organization_id: Set(DEMO_ORG_ID),
        title: Set(app.title.to_string()),
        call_type: Set(app.call_type),
        funding_stream: Set(None),
        application_reference: Set(None),
        award_reference: Set(None),
        total_awarded: Set(Some(app.total_awarded)),
        application_year: Set(Some(period_start.year())),
        created_at: Set(now),
        updated_at: Set(now),
    };
    applications::Entity::insert(application)
        .on_conflict(
            OnConflict::column(applications::Column::Id)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    let financials = application_financials::ActiveModel {
        id: Set(Uuid::now_v7()),
        application_id: Set(app.id),
        reporting_period_start: Set(period_start),
        reporting_period_end: Set(period_end),
        funds_received: Set(app.funds_received),
        funds_prior_year: Set(app.funds_prior_year),
        financial_context: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    application_financials::Entity::insert(financials)
        .on_conflict(
            OnConflict::columns([
                application_financials::Column::ApplicationId,
                application_financials::Column::ReportingPeriodStart,
                application_financials::Column::ReportingPeriodEnd,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    Ok(())
}
