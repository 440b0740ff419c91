//! Integration tests for the payroll engine.
//!
//! This suite drives the services end to end against in-memory stores:
//! - Gross-to-net scenarios (hourly, overtime, salaried, deductions)
//! - Employer taxes
//! - Pay run lifecycle and totals
//! - Referential integrity on employee delete
//! - Domain events
//! - Reports

use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use payroll_engine::config::{ConfigLoader, PayrollSettings};
use payroll_engine::error::EngineError;
use payroll_engine::events::{BroadcastNotifier, RecordingNotifier};
use payroll_engine::models::{
    Deduction, DeductionMethod, Employee, EmploymentStatus, NewDeduction, NewEmployee, NewPayRun,
    NewTimeEntry, PayBasis, PayFrequency, PayRun, PayRunStatus, PayType,
};
use payroll_engine::services::{
    ConfigurationRegistry, PayrollEngine, ReportingService, ServiceContext, Stores,
    WorkforceLedger,
};

// =============================================================================
// Test Helpers
// =============================================================================

struct Harness {
    ledger: WorkforceLedger,
    registry: ConfigurationRegistry,
    engine: PayrollEngine,
    reports: ReportingService,
    events: Arc<RecordingNotifier>,
}

fn harness() -> Harness {
    harness_with(PayrollSettings::default())
}

fn harness_with(settings: PayrollSettings) -> Harness {
    let events = Arc::new(RecordingNotifier::new());
    let ctx = ServiceContext::new(Stores::in_memory(), events.clone(), settings);
    Harness {
        ledger: WorkforceLedger::new(ctx.clone()),
        registry: ConfigurationRegistry::new(ctx.clone()),
        engine: PayrollEngine::new(ctx.clone()),
        reports: ReportingService::new(ctx),
        events,
    }
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::from_str(s).unwrap()
}

fn new_employee(first: &str, last: &str, ssn: &str, state: &str) -> NewEmployee {
    NewEmployee {
        first_name: first.to_string(),
        last_name: last.to_string(),
        ssn: ssn.to_string(),
        pay_basis: PayBasis::Hourly,
        pay_rate: dec("50"),
        pay_frequency: PayFrequency::Biweekly,
        state: Some(state.to_string()),
        locality: None,
        wc_class_code: None,
        department: None,
        hire_date: date("2025-06-02"),
    }
}

async fn hourly(h: &Harness, first: &str, last: &str, ssn: &str, state: &str) -> Employee {
    h.ledger
        .create_employee(new_employee(first, last, ssn, state))
        .await
        .unwrap()
}

async fn salaried(h: &Harness, last: &str, ssn: &str, annual: &str, state: &str) -> Employee {
    h.ledger
        .create_employee(NewEmployee {
            pay_basis: PayBasis::Salary,
            pay_rate: dec(annual),
            ..new_employee("Sam", last, ssn, state)
        })
        .await
        .unwrap()
}

async fn approved_hours(h: &Harness, employee_id: &str, day: &str, hours: &str, pay_type: PayType) {
    let entry = h
        .ledger
        .create_time_entry(NewTimeEntry {
            employee_id: employee_id.to_string(),
            job_id: None,
            date: date(day),
            hours: dec(hours),
            pay_type,
            description: None,
        })
        .await
        .unwrap();
    h.ledger.approve_time_entry(&entry.id, "supervisor").await.unwrap();
}

async fn pay_run(h: &Harness, start: &str, end: &str, pay_date: &str) -> PayRun {
    h.engine
        .create_pay_run(NewPayRun {
            period_start: date(start),
            period_end: date(end),
            pay_date: date(pay_date),
            notes: Some("integration".to_string()),
        })
        .await
        .unwrap()
}

async fn january_run(h: &Harness) -> PayRun {
    pay_run(h, "2026-01-05", "2026-01-18", "2026-01-23").await
}

// =============================================================================
// Gross-to-net scenarios
// =============================================================================

/// Scenario A: 40 regular hours at $50 for a California employee
#[tokio::test]
async fn test_scenario_a_hourly_california() {
    let h = harness();
    let emp = hourly(&h, "Ada", "Lovelace", "123-45-6789", "CA").await;
    approved_hours(&h, &emp.id, "2026-01-06", "40", PayType::Regular).await;
    let run = january_run(&h).await;

    let check = h.engine.add_pay_check(&run.id, &emp.id).await.unwrap();

    assert_eq!(check.gross_pay, dec("2000.00"));
    assert_eq!(check.federal_tax, dec("440.00"));
    assert_eq!(check.state_tax, dec("186.00"));
    assert_eq!(check.local_tax, Decimal::ZERO);
    assert_eq!(check.social_security, dec("124.00"));
    assert_eq!(check.medicare, dec("29.00"));
    assert_eq!(check.total_deductions, Decimal::ZERO);
    assert_eq!(check.net_pay, dec("1221.00"));
    assert_eq!(check.regular_hours, dec("40"));
    assert_eq!(check.pay_date, date("2026-01-23"));
}

/// Scenario B: 8 overtime hours add $600 and count as overtime
#[tokio::test]
async fn test_scenario_b_overtime() {
    let h = harness();
    let emp = hourly(&h, "Ada", "Lovelace", "123-45-6789", "CA").await;
    approved_hours(&h, &emp.id, "2026-01-06", "40", PayType::Regular).await;
    approved_hours(&h, &emp.id, "2026-01-07", "8", PayType::Overtime).await;
    let run = january_run(&h).await;

    let check = h.engine.add_pay_check(&run.id, &emp.id).await.unwrap();

    assert_eq!(check.gross_pay, dec("2600.00"));
    assert_eq!(check.regular_hours, dec("40"));
    assert_eq!(check.overtime_hours, dec("8"));
}

/// Scenario C: salaried Texas employee with no time entries
#[tokio::test]
async fn test_scenario_c_salaried_texas() {
    let h = harness();
    let emp = salaried(&h, "Houston", "222-33-4444", "78000", "TX").await;
    let run = january_run(&h).await;

    let check = h.engine.add_pay_check(&run.id, &emp.id).await.unwrap();

    assert_eq!(check.gross_pay, dec("3000.00"));
    assert_eq!(check.state_tax, Decimal::ZERO);
    assert_eq!(check.federal_tax, dec("660.00"));
    assert_eq!(check.regular_hours, Decimal::ZERO);
}

/// Scenario D: employer unemployment taxes cap at their wage bases
#[tokio::test]
async fn test_scenario_d_employer_taxes() {
    let h = harness();
    assert_eq!(h.engine.compute_futa(dec("10000")), dec("42.00"));
    assert_eq!(h.engine.compute_suta(dec("15000")), dec("270.00"));
}

/// Scenario E: an employee with a pay check cannot be deleted
#[tokio::test]
async fn test_scenario_e_delete_blocked_by_pay_check() {
    let h = harness();
    let paid = hourly(&h, "Ada", "Lovelace", "123-45-6789", "CA").await;
    let unpaid = hourly(&h, "Grace", "Hopper", "987-65-4321", "NY").await;
    approved_hours(&h, &paid.id, "2026-01-06", "8", PayType::Regular).await;
    let run = january_run(&h).await;
    h.engine.add_pay_check(&run.id, &paid.id).await.unwrap();

    let blocked = h.ledger.delete_employee(&paid.id).await;
    match blocked {
        Err(EngineError::ReferentialBlock { entity, id, .. }) => {
            assert_eq!(entity, "Employee");
            assert_eq!(id, paid.id);
        }
        other => panic!("Expected ReferentialBlock, got {:?}", other),
    }
    assert!(h.ledger.get_employee(&paid.id).await.is_ok());

    h.ledger.delete_employee(&unpaid.id).await.unwrap();
    assert!(matches!(
        h.ledger.get_employee(&unpaid.id).await,
        Err(EngineError::NotFound { .. })
    ));
}

// =============================================================================
// Per-check wage-base caps
// =============================================================================

/// Gross over $200,000: SS stops at its wage base, Medicare adds 0.9% above the threshold
#[tokio::test]
async fn test_large_gross_caps_social_security_and_adds_medicare() {
    let h = harness();
    let emp = h
        .ledger
        .create_employee(NewEmployee {
            pay_rate: dec("5000"),
            ..new_employee("Ada", "Lovelace", "123-45-6789", "CA")
        })
        .await
        .unwrap();
    approved_hours(&h, &emp.id, "2026-01-06", "50", PayType::Regular).await;
    let run = january_run(&h).await;

    let added = h.engine.add_pay_check(&run.id, &emp.id).await.unwrap();
    let check = h.engine.get_pay_check(&added.id).await.unwrap();

    assert_eq!(check.gross_pay, dec("250000.00"));
    assert_eq!(check.federal_tax, dec("55000.00"));
    assert_eq!(check.state_tax, dec("23250.00"));
    // 168,600 x 6.2%
    assert_eq!(check.social_security, dec("10453.20"));
    // 250,000 x 1.45% + 50,000 x 0.9%
    assert_eq!(check.medicare, dec("4075.00"));
    assert_eq!(check.net_pay, dec("157221.80"));

    let run = h.engine.get_pay_run(&run.id).await.unwrap();
    assert_eq!(run.total_taxes, dec("92778.20"));
}

/// Gross between the SS wage base and the Medicare threshold
#[tokio::test]
async fn test_salaried_gross_over_wage_base_caps_social_security_only() {
    let h = harness();
    // 4,680,000 / 26 = 180,000
    let emp = salaried(&h, "Houston", "222-33-4444", "4680000", "TX").await;
    let run = january_run(&h).await;

    let added = h.engine.add_pay_check(&run.id, &emp.id).await.unwrap();
    let check = h.engine.get_pay_check(&added.id).await.unwrap();

    assert_eq!(check.gross_pay, dec("180000.00"));
    assert_eq!(check.social_security, dec("10453.20"));
    assert_eq!(check.medicare, dec("2610.00"));
    assert_eq!(check.state_tax, Decimal::ZERO);
    assert_eq!(check.net_pay, dec("127336.80"));
}

#[tokio::test]
async fn test_out_of_range_gross_is_rejected_without_a_check() {
    let h = harness();
    let emp = h
        .ledger
        .create_employee(NewEmployee {
            pay_rate: Decimal::MAX,
            ..new_employee("Ada", "Lovelace", "123-45-6789", "CA")
        })
        .await
        .unwrap();
    approved_hours(&h, &emp.id, "2026-01-06", "8", PayType::Overtime).await;
    let run = january_run(&h).await;

    let result = h.engine.add_pay_check(&run.id, &emp.id).await;

    assert!(matches!(result, Err(EngineError::InvalidInput { .. })));
    assert!(h.engine.pay_checks_for_run(&run.id).await.unwrap().is_empty());
    let run = h.engine.get_pay_run(&run.id).await.unwrap();
    assert_eq!(run.employee_count, 0);
    assert_eq!(run.total_gross, Decimal::ZERO);
}

#[tokio::test]
async fn test_unapproved_and_out_of_period_entries_are_not_paid() {
    let h = harness();
    let emp = hourly(&h, "Ada", "Lovelace", "123-45-6789", "TX").await;
    approved_hours(&h, &emp.id, "2026-01-06", "8", PayType::Regular).await;
    approved_hours(&h, &emp.id, "2026-01-19", "8", PayType::Regular).await;
    h.ledger
        .create_time_entry(NewTimeEntry {
            employee_id: emp.id.clone(),
            job_id: None,
            date: date("2026-01-07"),
            hours: dec("8"),
            pay_type: PayType::Doubletime,
            description: Some("not approved".to_string()),
        })
        .await
        .unwrap();
    let run = january_run(&h).await;

    let check = h.engine.add_pay_check(&run.id, &emp.id).await.unwrap();

    assert_eq!(check.gross_pay, dec("400.00"));
    assert_eq!(check.overtime_hours, Decimal::ZERO);
}

#[tokio::test]
async fn test_global_deductions_apply_to_every_check() {
    let h = harness();
    h.registry
        .create::<Deduction>(NewDeduction {
            code: "401K".to_string(),
            name: "Retirement".to_string(),
            method: DeductionMethod::Percent { percent: dec("5") },
            max_per_period: Some(dec("120")),
            max_per_year: None,
        })
        .await
        .unwrap();
    h.registry
        .create::<Deduction>(NewDeduction {
            code: "PARK".to_string(),
            name: "Parking".to_string(),
            method: DeductionMethod::Flat { amount: dec("25") },
            max_per_period: None,
            max_per_year: None,
        })
        .await
        .unwrap();

    let ada = hourly(&h, "Ada", "Lovelace", "123-45-6789", "CA").await;
    let sam = salaried(&h, "Houston", "222-33-4444", "78000", "TX").await;
    approved_hours(&h, &ada.id, "2026-01-06", "40", PayType::Regular).await;
    let run = january_run(&h).await;

    let ada_check = h.engine.add_pay_check(&run.id, &ada.id).await.unwrap();
    let sam_check = h.engine.add_pay_check(&run.id, &sam.id).await.unwrap();

    // 5% of 2000 = 100, plus 25
    assert_eq!(ada_check.total_deductions, dec("125.00"));
    assert_eq!(ada_check.net_pay, dec("1096.00"));
    // 5% of 3000 = 150, capped at 120, plus 25
    assert_eq!(sam_check.total_deductions, dec("145.00"));
}

#[tokio::test]
async fn test_preview_carries_audit_trail() {
    let h = harness();
    let emp = hourly(&h, "Ada", "Lovelace", "123-45-6789", "CA").await;
    approved_hours(&h, &emp.id, "2026-01-06", "40", PayType::Regular).await;
    let run = january_run(&h).await;

    let preview = h.engine.preview_pay_check(&run.id, &emp.id).await.unwrap();
    let rules: Vec<&str> = preview.audit_steps.iter().map(|s| s.rule_id.as_str()).collect();

    assert_eq!(
        rules,
        vec![
            "gross_from_time_entries",
            "federal_income_tax",
            "state_income_tax",
            "local_income_tax",
            "social_security",
            "medicare",
            "deductions",
            "net_pay"
        ]
    );
    assert_eq!(preview.net_pay, dec("1221.00"));
    assert!(h.engine.pay_checks_for_run(&run.id).await.unwrap().is_empty());
}

// =============================================================================
// Pay run lifecycle
// =============================================================================

#[tokio::test]
async fn test_pay_run_totals_equal_sum_of_checks() {
    let h = harness();
    let ada = hourly(&h, "Ada", "Lovelace", "123-45-6789", "CA").await;
    let grace = hourly(&h, "Grace", "Hopper", "987-65-4321", "NY").await;
    let sam = salaried(&h, "Houston", "222-33-4444", "78000", "TX").await;
    approved_hours(&h, &ada.id, "2026-01-06", "40", PayType::Regular).await;
    approved_hours(&h, &grace.id, "2026-01-08", "12.5", PayType::Regular).await;
    approved_hours(&h, &grace.id, "2026-01-09", "3.25", PayType::Doubletime).await;
    let run = january_run(&h).await;
    h.engine.start_processing(&run.id).await.unwrap();

    let checks = h.engine.run_payroll(&run.id).await.unwrap();
    assert_eq!(checks.len(), 3);
    assert!(checks.iter().any(|c| c.employee_id == sam.id));

    let run = h.engine.get_pay_run(&run.id).await.unwrap();
    assert_eq!(run.employee_count, 3);
    assert_eq!(run.total_gross, checks.iter().map(|c| c.gross_pay).sum::<Decimal>());
    assert_eq!(run.total_net, checks.iter().map(|c| c.net_pay).sum::<Decimal>());
    assert_eq!(run.total_taxes, checks.iter().map(|c| c.total_taxes()).sum::<Decimal>());
    assert_eq!(
        run.total_deductions,
        checks.iter().map(|c| c.total_deductions).sum::<Decimal>()
    );
}

#[tokio::test]
async fn test_full_lifecycle_and_void() {
    let h = harness();
    let emp = hourly(&h, "Ada", "Lovelace", "123-45-6789", "CA").await;
    approved_hours(&h, &emp.id, "2026-01-06", "40", PayType::Regular).await;
    let run = january_run(&h).await;

    // draft accepts checks
    h.engine.add_pay_check(&run.id, &emp.id).await.unwrap();
    h.engine.start_processing(&run.id).await.unwrap();
    let completed = h.engine.complete_pay_run(&run.id).await.unwrap();
    assert_eq!(completed.status, PayRunStatus::Completed);

    let late_hire = hourly(&h, "Grace", "Hopper", "987-65-4321", "NY").await;
    assert!(matches!(
        h.engine.add_pay_check(&run.id, &late_hire.id).await,
        Err(EngineError::InvalidTransition { .. })
    ));

    let voided = h.engine.void_pay_run(&run.id).await.unwrap();
    assert_eq!(voided.status, PayRunStatus::Voided);
    // void leaves totals and checks alone
    assert_eq!(voided.total_gross, dec("2000.00"));
    assert_eq!(h.engine.pay_checks_for_run(&run.id).await.unwrap().len(), 1);

    assert!(matches!(
        h.engine.void_pay_run(&run.id).await,
        Err(EngineError::InvalidTransition { .. })
    ));
    assert!(matches!(
        h.engine.start_processing(&run.id).await,
        Err(EngineError::InvalidTransition { .. })
    ));
}

#[tokio::test]
async fn test_void_from_draft() {
    let h = harness();
    let run = january_run(&h).await;
    let voided = h.engine.void_pay_run(&run.id).await.unwrap();
    assert!(voided.voided_at.is_some());
}

// =============================================================================
// Events
// =============================================================================

#[tokio::test]
async fn test_events_emitted_in_order() {
    let h = harness();
    let emp = hourly(&h, "Ada", "Lovelace", "123-45-6789", "CA").await;
    approved_hours(&h, &emp.id, "2026-01-06", "8", PayType::Regular).await;
    let run = january_run(&h).await;
    h.engine.add_pay_check(&run.id, &emp.id).await.unwrap();
    h.engine.start_processing(&run.id).await.unwrap();
    h.engine.complete_pay_run(&run.id).await.unwrap();

    assert_eq!(
        h.events.names(),
        vec![
            "payroll.employee.created",
            "payroll.timeEntry.created",
            "payroll.timeEntry.approved",
            "payroll.payRun.created",
            "payroll.payCheck.created",
            "payroll.payRun.completed",
        ]
    );

    let (_, payload) = &h.events.events()[4];
    assert_eq!(payload["employee_id"], emp.id.as_str());
    assert_eq!(payload["gross_pay"], "400.00");
}

#[tokio::test]
async fn test_rejected_operations_emit_nothing() {
    let h = harness();
    let emp = hourly(&h, "Ada", "Lovelace", "123-45-6789", "CA").await;
    let before = h.events.names().len();

    let _ = h.ledger.create_employee(new_employee("Eve", "Clone", "123-45-6789", "CA")).await;
    let _ = h.ledger.approve_time_entry("te_missing", "supervisor").await;
    let _ = h.engine.complete_pay_run("run_missing").await;
    let _ = h.ledger.update_employee(
        &emp.id,
        payroll_engine::models::EmployeeUpdate {
            ssn: Some("bad".to_string()),
            ..Default::default()
        },
    )
    .await;

    assert_eq!(h.events.names().len(), before);
}

#[tokio::test]
async fn test_broadcast_subscribers_receive_events() {
    let notifier = Arc::new(BroadcastNotifier::new(16));
    let mut rx = notifier.subscribe();
    let ctx = ServiceContext::new(Stores::in_memory(), notifier.clone(), PayrollSettings::default());
    let ledger = WorkforceLedger::new(ctx);

    let emp = ledger
        .create_employee(new_employee("Ada", "Lovelace", "123-45-6789", "CA"))
        .await
        .unwrap();
    ledger
        .update_employee(
            &emp.id,
            payroll_engine::models::EmployeeUpdate {
                status: Some(EmploymentStatus::Inactive),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    ledger.delete_employee(&emp.id).await.unwrap();

    let (name, payload) = rx.recv().await.unwrap();
    assert_eq!(name, "payroll.employee.created");
    assert_eq!(payload["id"], emp.id.as_str());
    assert_eq!(rx.recv().await.unwrap().0, "payroll.employee.updated");
    let (name, payload) = rx.recv().await.unwrap();
    assert_eq!(name, "payroll.employee.deleted");
    assert_eq!(payload["id"], emp.id.as_str());
}

// =============================================================================
// Reports
// =============================================================================

#[tokio::test]
async fn test_payroll_register_sorted_by_name() {
    let h = harness();
    let zed = hourly(&h, "Zed", "Young", "111-22-3333", "CA").await;
    let ada = hourly(&h, "Ada", "Lovelace", "123-45-6789", "CA").await;
    let bob = hourly(&h, "Bob", "Lovelace", "987-65-4321", "CA").await;
    for emp in [&zed, &ada, &bob] {
        approved_hours(&h, &emp.id, "2026-01-06", "8", PayType::Regular).await;
    }
    let run = january_run(&h).await;
    for emp in [&zed, &ada, &bob] {
        h.engine.add_pay_check(&run.id, &emp.id).await.unwrap();
    }

    let register = h.reports.payroll_register(&run.id).await.unwrap();
    let names: Vec<&str> = register.lines.iter().map(|l| l.employee_name.as_str()).collect();

    assert_eq!(names, vec!["Lovelace, Ada", "Lovelace, Bob", "Young, Zed"]);
    assert_eq!(register.pay_run.employee_count, 3);
}

#[tokio::test]
async fn test_quarterly_summary_counts_completed_runs_only() {
    let h = harness();
    let ada = hourly(&h, "Ada", "Lovelace", "123-45-6789", "CA").await;
    let sam = salaried(&h, "Houston", "222-33-4444", "78000", "TX").await;
    approved_hours(&h, &ada.id, "2026-01-06", "40", PayType::Regular).await;
    approved_hours(&h, &ada.id, "2026-01-20", "40", PayType::Regular).await;

    // two completed runs in Q1
    let jan = january_run(&h).await;
    h.engine.run_payroll(&jan.id).await.unwrap();
    h.engine.start_processing(&jan.id).await.unwrap();
    h.engine.complete_pay_run(&jan.id).await.unwrap();

    let feb = pay_run(&h, "2026-01-19", "2026-02-01", "2026-02-06").await;
    h.engine.run_payroll(&feb.id).await.unwrap();
    h.engine.start_processing(&feb.id).await.unwrap();
    h.engine.complete_pay_run(&feb.id).await.unwrap();

    // a draft run and a voided run in Q1 are excluded
    let draft = pay_run(&h, "2026-02-02", "2026-02-15", "2026-02-20").await;
    h.engine.add_pay_check(&draft.id, &sam.id).await.unwrap();
    let voided = pay_run(&h, "2026-02-16", "2026-03-01", "2026-03-06").await;
    h.engine.add_pay_check(&voided.id, &sam.id).await.unwrap();
    h.engine.void_pay_run(&voided.id).await.unwrap();

    let summary = h.reports.quarterly_tax_summary(2026, 1).await.unwrap();

    assert_eq!(summary.pay_run_count, 2);
    assert_eq!(summary.employee_count, 2);
    // Ada 2000 twice, Sam 3000 twice
    assert_eq!(summary.total_gross, dec("10000.00"));
    assert_eq!(summary.federal_tax, dec("2200.00"));
    assert_eq!(summary.state_tax, dec("372.00"));
    assert_eq!(summary.social_security, dec("620.00"));
    assert_eq!(summary.medicare, dec("145.00"));
    // per-check caps: 2000 x 0.6% twice, 3000 x 0.6% twice
    assert_eq!(summary.futa, dec("60.00"));
    assert_eq!(summary.suta, dec("270.00"));

    let q2 = h.reports.quarterly_tax_summary(2026, 2).await.unwrap();
    assert_eq!(q2.pay_run_count, 0);
    assert_eq!(q2.total_gross, Decimal::ZERO);

    assert!(matches!(
        h.reports.quarterly_tax_summary(2026, 5).await,
        Err(EngineError::InvalidInput { .. })
    ));
}

#[tokio::test]
async fn test_earnings_history_running_totals() {
    let h = harness();
    let sam = salaried(&h, "Houston", "222-33-4444", "78000", "TX").await;
    let feb = pay_run(&h, "2026-01-19", "2026-02-01", "2026-02-06").await;
    let jan = january_run(&h).await;
    // paid out of order; history sorts by pay date
    h.engine.add_pay_check(&feb.id, &sam.id).await.unwrap();
    h.engine.add_pay_check(&jan.id, &sam.id).await.unwrap();

    let history = h.reports.employee_earnings_history(&sam.id).await.unwrap();

    assert_eq!(history.employee_name, "Houston, Sam");
    assert_eq!(history.entries.len(), 2);
    assert_eq!(history.entries[0].pay_check.pay_date, date("2026-01-23"));
    assert_eq!(history.entries[0].year_to_date.gross_pay, dec("3000.00"));
    assert_eq!(history.entries[1].year_to_date.gross_pay, dec("6000.00"));
    assert_eq!(history.totals.federal_tax, dec("1320.00"));
    assert_eq!(history.totals.net_pay, history.entries[1].year_to_date.net_pay);
}

// =============================================================================
// Configuration
// =============================================================================

#[tokio::test]
async fn test_settings_loaded_from_yaml_drive_the_engine() {
    let settings = ConfigLoader::load("./config/default").unwrap().into_settings();
    let h = harness_with(settings);
    let emp = hourly(&h, "Ada", "Lovelace", "123-45-6789", "ca").await;
    approved_hours(&h, &emp.id, "2026-01-06", "40", PayType::Regular).await;
    let run = january_run(&h).await;

    let check = h.engine.add_pay_check(&run.id, &emp.id).await.unwrap();
    assert_eq!(check.net_pay, dec("1221.00"));
}
