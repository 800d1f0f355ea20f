//! Client-side validation rules
//!
//! These checks decide what staff are allowed to submit. They never replace
//! the API's own checks.

use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::{CareQueueError, Result};
use crate::schemas::{
    Consultation, DispensedItem, Invoice, LabResult, Payment, Role, Stage, Visit, Vitals,
};

use super::access::{assignment_field, can_access_stage, get_assignment};
use super::stages::{
    get_stage_label, is_allowed_transition, is_department_stage, is_terminal_stage,
    requires_staff_selection,
};

lazy_static! {
    static ref BLOOD_PRESSURE_REGEX: Regex =
        Regex::new(r"^\s*(?P<sys>\d{2,3})\s*/\s*(?P<dia>\d{2,3})\s*$").unwrap();
}

/// Context required for validating a handoff
#[derive(Debug, Clone)]
pub struct ValidationContext {
    /// Role of the staff member acting
    pub role: Role,

    /// Invoice for the visit, when already fetched
    pub invoice: Option<Invoice>,
}

impl ValidationContext {
    pub fn for_role(role: Role) -> Self {
        ValidationContext {
            role,
            invoice: None,
        }
    }
}

/// Result of a validation check
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    /// Whether the validation passed
    pub valid: bool,

    /// Reason for failure (if valid is false)
    pub reason: Option<String>,

    /// The failure is about who is acting rather than what was entered
    pub forbidden: bool,
}

impl ValidationResult {
    /// Create a successful validation result
    pub fn success() -> Self {
        ValidationResult {
            valid: true,
            reason: None,
            forbidden: false,
        }
    }

    /// Create a failed validation result
    pub fn failure(reason: impl Into<String>) -> Self {
        ValidationResult {
            valid: false,
            reason: Some(reason.into()),
            forbidden: false,
        }
    }

    /// Create a failed result caused by the caller's role
    pub fn forbidden(reason: impl Into<String>) -> Self {
        ValidationResult {
            valid: false,
            reason: Some(reason.into()),
            forbidden: true,
        }
    }

    /// Convert into the crate error type
    pub fn into_result(self) -> Result<()> {
        if self.valid {
            return Ok(());
        }
        let reason = self
            .reason
            .unwrap_or_else(|| "validation failed".to_string());
        if self.forbidden {
            Err(CareQueueError::Unauthorized(reason))
        } else {
            Err(CareQueueError::Validation(reason))
        }
    }
}

/// Short-circuit helper: return early from a validator on failure
macro_rules! check {
    ($result:expr) => {{
        let result = $result;
        if !result.valid {
            return result;
        }
    }};
}

/// Validate that `role` can act on `visit` in its current stage.
pub fn can_act_on(visit: &Visit, role: Role) -> ValidationResult {
    if !can_access_stage(role, visit.current_stage) {
        return ValidationResult::forbidden(format!(
            "{} staff cannot act on visits at {}",
            role,
            get_stage_label(visit.current_stage)
        ));
    }
    ValidationResult::success()
}

/// Validate that the visit may leave `stage`.
pub fn can_leave_stage(visit: &Visit, stage: Stage, ctx: &ValidationContext) -> ValidationResult {
    match stage {
        Stage::Doctor => {
            let has_diagnosis = visit
                .record(Stage::Doctor)
                .and_then(|r| r.consultation.as_ref())
                .map(|c| !c.diagnosis.trim().is_empty())
                .unwrap_or(false);
            if !has_diagnosis {
                return ValidationResult::failure("no diagnosis recorded for this visit");
            }
            ValidationResult::success()
        }
        Stage::Billing => {
            let invoice = ctx
                .invoice
                .as_ref()
                .or_else(|| visit.record(Stage::Billing).and_then(|r| r.invoice.as_ref()));
            match invoice {
                None => ValidationResult::failure("no invoice raised for this visit"),
                Some(invoice) if !invoice.is_paid() => ValidationResult::failure(format!(
                    "invoice {} has an outstanding balance of {:.2}",
                    invoice.id,
                    invoice.balance()
                )),
                Some(_) => ValidationResult::success(),
            }
        }
        _ => ValidationResult::success(),
    }
}

/// Validate a handoff of `visit` from `current` to `target`.
///
/// Checks run in a fixed order so the first problem reported is the one staff
/// need to fix first.
pub fn validate_handoff(
    visit: &Visit,
    current: Stage,
    target: Stage,
    staff_id: Option<&str>,
    ctx: &ValidationContext,
) -> ValidationResult {
    check!(validate_route(visit, current, target, staff_id, ctx.role));
    can_leave_stage(visit, current, ctx)
}

/// The handoff checks that need nothing beyond the visit itself: access,
/// staleness, the table, staff selection and clock-in.
pub fn validate_route(
    visit: &Visit,
    current: Stage,
    target: Stage,
    staff_id: Option<&str>,
    role: Role,
) -> ValidationResult {
    check!(can_act_on(visit, role));

    if current != visit.current_stage {
        return ValidationResult::failure(format!(
            "visit {} is now at {}, not {}; refresh and try again",
            visit.id,
            get_stage_label(visit.current_stage),
            get_stage_label(current)
        ));
    }

    if !is_allowed_transition(current, target) {
        return ValidationResult::failure(format!(
            "cannot transition from {} to {}",
            current, target
        ));
    }

    let has_staff = staff_id.map(|s| !s.trim().is_empty()).unwrap_or(false);
    if requires_staff_selection(target) && !has_staff {
        return ValidationResult::failure(format!(
            "select a staff member to receive the patient at {}",
            get_stage_label(target)
        ));
    }

    if is_department_stage(current) && !visit.is_clocked_in(current) {
        return ValidationResult::failure(format!(
            "clock in to {} before handing off",
            get_stage_label(current)
        ));
    }

    ValidationResult::success()
}

/// Validate clocking in to the visit's current stage.
pub fn validate_clock_in(visit: &Visit, role: Role) -> ValidationResult {
    if is_terminal_stage(visit.current_stage) {
        return ValidationResult::failure(format!("visit {} is completed", visit.id));
    }
    check!(can_act_on(visit, role));

    let stage = visit.current_stage;
    if !is_department_stage(stage) {
        return ValidationResult::failure(format!(
            "{} does not use clock-in",
            get_stage_label(stage)
        ));
    }
    if visit.is_clocked_in(stage) {
        return ValidationResult::failure(format!(
            "already clocked in to {}",
            get_stage_label(stage)
        ));
    }

    let others: Vec<Stage> = visit
        .active_stages()
        .into_iter()
        .filter(|s| *s != stage)
        .collect();
    if let Some(other) = others.first() {
        return ValidationResult::failure(format!(
            "visit is still clocked in at {}",
            get_stage_label(*other)
        ));
    }

    ValidationResult::success()
}

/// Validate that `role` can record `stage` data on `visit` right now.
pub fn validate_stage_work(visit: &Visit, stage: Stage, role: Role) -> ValidationResult {
    if visit.current_stage != stage {
        return ValidationResult::failure(format!(
            "visit {} is at {}, not {}",
            visit.id,
            get_stage_label(visit.current_stage),
            get_stage_label(stage)
        ));
    }
    check!(can_act_on(visit, role));
    if is_department_stage(stage) && !visit.is_clocked_in(stage) {
        return ValidationResult::failure(format!(
            "clock in to {} first",
            get_stage_label(stage)
        ));
    }
    ValidationResult::success()
}

/// Validate moving the current stage's assignment to `staff_id`.
pub fn validate_reassignment(visit: &Visit, role: Role, staff_id: &str) -> ValidationResult {
    check!(can_act_on(visit, role));

    let stage = visit.current_stage;
    if assignment_field(stage).is_none() {
        return ValidationResult::failure(format!(
            "{} has no staff assignment to change",
            get_stage_label(stage)
        ));
    }
    let staff_id = staff_id.trim();
    if staff_id.is_empty() {
        return ValidationResult::failure("select a staff member to reassign to");
    }
    if let Some(current) = get_assignment(visit, stage) {
        if current.id == staff_id {
            return ValidationResult::failure(format!(
                "visit is already assigned to {}",
                current.display_name()
            ));
        }
    }
    ValidationResult::success()
}

/// Parse a "systolic/diastolic" reading.
pub fn parse_blood_pressure(raw: &str) -> Option<(u32, u32)> {
    let caps = BLOOD_PRESSURE_REGEX.captures(raw)?;
    let sys = caps.name("sys")?.as_str().parse().ok()?;
    let dia = caps.name("dia")?.as_str().parse().ok()?;
    Some((sys, dia))
}

fn in_range<T: PartialOrd + std::fmt::Display>(
    name: &str,
    value: Option<T>,
    min: T,
    max: T,
) -> ValidationResult {
    match value {
        Some(v) if v < min || v > max => ValidationResult::failure(format!(
            "{} {} is outside {}-{}",
            name, v, min, max
        )),
        _ => ValidationResult::success(),
    }
}

pub fn validate_vitals(vitals: &Vitals) -> ValidationResult {
    if vitals.is_empty() {
        return ValidationResult::failure("no vitals entered");
    }

    if let Some(bp) = &vitals.blood_pressure {
        match parse_blood_pressure(bp) {
            None => {
                return ValidationResult::failure(format!(
                    "blood pressure '{}' must look like 120/80",
                    bp
                ))
            }
            Some((sys, dia)) => {
                check!(in_range("systolic pressure", Some(sys), 50, 260));
                check!(in_range("diastolic pressure", Some(dia), 30, 160));
                if dia >= sys {
                    return ValidationResult::failure(
                        "diastolic pressure must be below systolic",
                    );
                }
            }
        }
    }

    check!(in_range("temperature", vitals.temperature, 30.0, 45.0));
    check!(in_range("pulse", vitals.pulse, 20, 250));
    check!(in_range("respiratory rate", vitals.respiratory_rate, 5, 80));
    check!(in_range("SpO2", vitals.spo2, 50, 100));
    check!(in_range("weight", vitals.weight_kg, 0.5, 400.0));
    check!(in_range("height", vitals.height_cm, 20.0, 250.0));
    ValidationResult::success()
}

pub fn validate_consultation(consultation: &Consultation) -> ValidationResult {
    if consultation.diagnosis.trim().is_empty() {
        return ValidationResult::failure("diagnosis is required");
    }
    if let Some(p) = consultation
        .prescriptions
        .iter()
        .find(|p| p.drug.trim().is_empty() || p.dosage.trim().is_empty())
    {
        return ValidationResult::failure(format!(
            "prescription '{}' needs both a drug and a dosage",
            p.drug
        ));
    }
    if consultation
        .lab_orders
        .iter()
        .any(|o| o.test_name.trim().is_empty())
    {
        return ValidationResult::failure("lab order is missing a test name");
    }
    ValidationResult::success()
}

pub fn validate_lab_results(results: &[LabResult]) -> ValidationResult {
    if results.is_empty() {
        return ValidationResult::failure("no lab results entered");
    }
    if let Some(r) = results
        .iter()
        .find(|r| r.test_name.trim().is_empty() || r.value.trim().is_empty())
    {
        return ValidationResult::failure(format!(
            "lab result '{}' needs a test name and a value",
            r.test_name
        ));
    }
    ValidationResult::success()
}

pub fn validate_dispense(items: &[DispensedItem]) -> ValidationResult {
    if items.is_empty() {
        return ValidationResult::failure("nothing dispensed");
    }
    if let Some(item) = items.iter().find(|i| i.drug.trim().is_empty()) {
        return ValidationResult::failure(format!(
            "dispensed item with quantity {} has no drug name",
            item.quantity
        ));
    }
    if let Some(item) = items.iter().find(|i| i.quantity == 0) {
        return ValidationResult::failure(format!("quantity for {} must be at least 1", item.drug));
    }
    ValidationResult::success()
}

pub fn validate_payment(invoice: &Invoice, payment: &Payment) -> ValidationResult {
    if invoice.is_paid() {
        return ValidationResult::failure(format!("invoice {} is already paid", invoice.id));
    }
    if !(payment.amount > 0.0) {
        return ValidationResult::failure("payment amount must be greater than zero");
    }
    if payment.amount > invoice.balance() + 0.005 {
        return ValidationResult::failure(format!(
            "payment {:.2} exceeds the outstanding balance {:.2}",
            payment.amount,
            invoice.balance()
        ));
    }
    ValidationResult::success()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::{
        InvoiceStatus, PatientRef, PaymentMethod, Prescription, StaffRef, StageRecord,
    };

    fn visit_at(stage: Stage) -> Visit {
        Visit::new(
            "v1",
            PatientRef {
                id: "p1".into(),
                name: "Test Patient".into(),
                hospital_number: None,
            },
        )
        .with_current_stage(stage)
    }

    fn clocked_in(stage: Stage) -> Visit {
        visit_at(stage).with_clock_in(stage, StaffRef::id("s1"))
    }

    fn with_diagnosis(visit: Visit, diagnosis: &str) -> Visit {
        let mut record = visit.record(Stage::Doctor).cloned().unwrap_or_default();
        record.consultation = Some(Consultation {
            diagnosis: diagnosis.to_string(),
            ..Default::default()
        });
        visit.with_record(Stage::Doctor, record)
    }

    fn invoice(total: f64, paid: f64) -> Invoice {
        Invoice {
            id: "inv1".into(),
            items: vec![],
            total,
            amount_paid: paid,
            status: if paid >= total {
                InvoiceStatus::Paid
            } else {
                InvoiceStatus::Pending
            },
        }
    }

    #[test]
    fn test_into_result_categories() {
        assert!(ValidationResult::success().into_result().is_ok());
        assert!(matches!(
            ValidationResult::failure("x").into_result(),
            Err(CareQueueError::Validation(_))
        ));
        assert!(matches!(
            ValidationResult::forbidden("x").into_result(),
            Err(CareQueueError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_handoff_doctor_to_billing() {
        let visit = with_diagnosis(clocked_in(Stage::Doctor), "Malaria");
        let ctx = ValidationContext::for_role(Role::Doctor);
        let result = validate_handoff(&visit, Stage::Doctor, Stage::Billing, None, &ctx);
        assert!(result.valid, "{:?}", result.reason);
    }

    #[test]
    fn test_handoff_wrong_role_is_forbidden() {
        let visit = with_diagnosis(clocked_in(Stage::Doctor), "Malaria");
        let ctx = ValidationContext::for_role(Role::Nurse);
        let result = validate_handoff(&visit, Stage::Doctor, Stage::Billing, None, &ctx);
        assert!(!result.valid);
        assert!(result.forbidden);
    }

    #[test]
    fn test_handoff_stale_stage() {
        let visit = clocked_in(Stage::Lab);
        let ctx = ValidationContext::for_role(Role::Admin);
        let result = validate_handoff(&visit, Stage::Doctor, Stage::Billing, None, &ctx);
        assert!(!result.valid);
        assert!(result.reason.unwrap().contains("refresh"));
    }

    #[test]
    fn test_handoff_out_of_table() {
        let visit = clocked_in(Stage::Billing);
        let ctx = ValidationContext::for_role(Role::Billing);
        let result = validate_handoff(&visit, Stage::Billing, Stage::Doctor, None, &ctx);
        assert!(!result.valid);
        assert!(result.reason.unwrap().contains("cannot transition"));
    }

    #[test]
    fn test_handoff_requires_staff_for_nurse_lab_pharmacy() {
        let visit = with_diagnosis(clocked_in(Stage::Doctor), "Typhoid");
        let ctx = ValidationContext::for_role(Role::Doctor);
        for target in [Stage::Nurse, Stage::Lab, Stage::Pharmacy] {
            let result = validate_handoff(&visit, Stage::Doctor, target, None, &ctx);
            assert!(!result.valid);
            assert!(result.reason.unwrap().contains("select a staff member"));

            let blank = validate_handoff(&visit, Stage::Doctor, target, Some("  "), &ctx);
            assert!(!blank.valid);

            let ok = validate_handoff(&visit, Stage::Doctor, target, Some("staff-9"), &ctx);
            assert!(ok.valid);
        }
    }

    #[test]
    fn test_handoff_requires_clock_in_for_department_stage() {
        let visit = with_diagnosis(visit_at(Stage::Doctor), "Flu");
        let ctx = ValidationContext::for_role(Role::Doctor);
        let result = validate_handoff(&visit, Stage::Doctor, Stage::Billing, None, &ctx);
        assert!(!result.valid);
        assert!(result.reason.unwrap().contains("clock in"));
    }

    #[test]
    fn test_handoff_front_desk_needs_no_clock_in() {
        let visit = visit_at(Stage::FrontDesk);
        let ctx = ValidationContext::for_role(Role::FrontDesk);
        let result = validate_handoff(&visit, Stage::FrontDesk, Stage::Nurse, Some("n1"), &ctx);
        assert!(result.valid);
    }

    #[test]
    fn test_leaving_doctor_requires_diagnosis() {
        let visit = clocked_in(Stage::Doctor);
        let ctx = ValidationContext::for_role(Role::Doctor);
        let result = validate_handoff(&visit, Stage::Doctor, Stage::Billing, None, &ctx);
        assert!(!result.valid);
        assert!(result.reason.unwrap().contains("diagnosis"));

        let blank = with_diagnosis(clocked_in(Stage::Doctor), "   ");
        assert!(!validate_handoff(&blank, Stage::Doctor, Stage::Billing, None, &ctx).valid);
    }

    #[test]
    fn test_leaving_billing_requires_paid_invoice() {
        let visit = clocked_in(Stage::Billing);
        let mut ctx = ValidationContext::for_role(Role::Billing);
        let target = Stage::ReturnedToFrontDesk;

        let none = validate_handoff(&visit, Stage::Billing, target, None, &ctx);
        assert!(none.reason.unwrap().contains("no invoice"));

        ctx.invoice = Some(invoice(100.0, 40.0));
        let partial = validate_handoff(&visit, Stage::Billing, target, None, &ctx);
        assert!(partial.reason.unwrap().contains("outstanding"));

        ctx.invoice = Some(invoice(100.0, 100.0));
        assert!(validate_handoff(&visit, Stage::Billing, target, None, &ctx).valid);
    }

    #[test]
    fn test_billing_invoice_from_visit_record() {
        let record = StageRecord {
            invoice: Some(invoice(50.0, 50.0)),
            ..Default::default()
        };
        let visit = clocked_in(Stage::Billing);
        let mut merged = visit.record(Stage::Billing).cloned().unwrap();
        merged.invoice = record.invoice;
        let visit = visit.with_record(Stage::Billing, merged);
        let ctx = ValidationContext::for_role(Role::Billing);
        assert!(can_leave_stage(&visit, Stage::Billing, &ctx).valid);
    }

    #[test]
    fn test_clock_in() {
        let visit = visit_at(Stage::Nurse);
        assert!(validate_clock_in(&visit, Role::Nurse).valid);
        assert!(validate_clock_in(&visit, Role::Doctor).forbidden);

        let already = clocked_in(Stage::Nurse);
        assert!(!validate_clock_in(&already, Role::Nurse).valid);

        let front = visit_at(Stage::FrontDesk);
        assert!(!validate_clock_in(&front, Role::FrontDesk).valid);

        let done = visit_at(Stage::Completed);
        assert!(validate_clock_in(&done, Role::Admin)
            .reason
            .unwrap()
            .contains("completed"));
    }

    #[test]
    fn test_clock_in_rejected_while_another_stage_active() {
        let visit = visit_at(Stage::Nurse)
            .with_clock_in(Stage::Nurse, StaffRef::id("n1"))
            .with_current_stage(Stage::Doctor);
        let result = validate_clock_in(&visit, Role::Doctor);
        assert!(!result.valid);
        assert!(result.reason.unwrap().contains("Nurse"));
    }

    #[test]
    fn test_stage_work() {
        assert!(validate_stage_work(&clocked_in(Stage::Lab), Stage::Lab, Role::Lab).valid);
        assert!(!validate_stage_work(&visit_at(Stage::Lab), Stage::Lab, Role::Lab).valid);
        assert!(!validate_stage_work(&clocked_in(Stage::Lab), Stage::Nurse, Role::Nurse).valid);
        assert!(validate_stage_work(&clocked_in(Stage::Lab), Stage::Lab, Role::Pharmacy).forbidden);
    }

    #[test]
    fn test_reassignment() {
        let mut visit = clocked_in(Stage::Doctor);
        visit.assigned_doctor = Some(StaffRef::id("d1"));
        assert!(validate_reassignment(&visit, Role::Doctor, "d2").valid);
        assert!(!validate_reassignment(&visit, Role::Doctor, "d1").valid);
        assert!(!validate_reassignment(&visit, Role::Doctor, "").valid);
        assert!(!validate_reassignment(&visit, Role::Doctor, " d1 ").valid);
        assert!(validate_reassignment(&visit, Role::Lab, "d2").forbidden);

        let front = visit_at(Stage::FrontDesk);
        assert!(!validate_reassignment(&front, Role::FrontDesk, "x").valid);
    }

    #[test]
    fn test_route_ignores_stage_completeness() {
        let visit = clocked_in(Stage::Billing);
        assert!(
            validate_route(&visit, Stage::Billing, Stage::ReturnedToFrontDesk, None, Role::Billing)
                .valid
        );
        assert!(
            !validate_handoff(
                &visit,
                Stage::Billing,
                Stage::ReturnedToFrontDesk,
                None,
                &ValidationContext::for_role(Role::Billing)
            )
            .valid
        );
        let back = validate_route(&visit, Stage::Billing, Stage::Nurse, None, Role::Billing);
        assert!(back.reason.unwrap().contains("cannot transition"));
    }

    #[test]
    fn test_parse_blood_pressure() {
        assert_eq!(parse_blood_pressure("120/80"), Some((120, 80)));
        assert_eq!(parse_blood_pressure(" 135 / 90 "), Some((135, 90)));
        assert_eq!(parse_blood_pressure("120-80"), None);
        assert_eq!(parse_blood_pressure("high"), None);
    }

    #[test]
    fn test_validate_vitals() {
        let ok = Vitals {
            blood_pressure: Some("120/80".into()),
            temperature: Some(37.2),
            pulse: Some(72),
            ..Default::default()
        };
        assert!(validate_vitals(&ok).valid);
        assert!(!validate_vitals(&Vitals::default()).valid);

        let inverted = Vitals {
            blood_pressure: Some("80/120".into()),
            ..Default::default()
        };
        assert!(!validate_vitals(&inverted).valid);

        let fever = Vitals {
            temperature: Some(48.0),
            ..Default::default()
        };
        assert!(validate_vitals(&fever).reason.unwrap().contains("temperature"));
    }

    #[test]
    fn test_validate_consultation() {
        assert!(!validate_consultation(&Consultation::default()).valid);
        let c = Consultation {
            diagnosis: "Hypertension".into(),
            prescriptions: vec![Prescription {
                drug: "Amlodipine".into(),
                dosage: "".into(),
                frequency: "daily".into(),
                duration: "30 days".into(),
            }],
            ..Default::default()
        };
        assert!(!validate_consultation(&c).valid);
    }

    #[test]
    fn test_validate_lab_and_dispense() {
        assert!(!validate_lab_results(&[]).valid);
        assert!(validate_lab_results(&[LabResult {
            test_name: "FBC".into(),
            value: "12.1".into(),
            unit: Some("g/dL".into()),
            reference_range: None,
            flag: None,
        }])
        .valid);

        assert!(!validate_dispense(&[]).valid);
        assert!(!validate_dispense(&[DispensedItem {
            drug: "Paracetamol".into(),
            quantity: 0,
            instructions: None,
        }])
        .valid);
    }

    #[test]
    fn test_validate_payment() {
        let inv = invoice(100.0, 30.0);
        let pay = |amount| Payment {
            amount,
            method: PaymentMethod::Cash,
            reference: None,
        };
        assert!(validate_payment(&inv, &pay(70.0)).valid);
        assert!(!validate_payment(&inv, &pay(0.0)).valid);
        assert!(!validate_payment(&inv, &pay(70.5)).valid);
        assert!(!validate_payment(&invoice(10.0, 10.0), &pay(1.0)).valid);
    }
}
