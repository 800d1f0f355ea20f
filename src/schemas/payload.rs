//! Stage-specific payloads recorded by each department

use serde::{Deserialize, Serialize};

/// Vital signs captured by the nurse
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vitals {
    /// Blood pressure as "systolic/diastolic", e.g. "120/80"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_pressure: Option<String>,

    /// Degrees Celsius
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Beats per minute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pulse: Option<u32>,

    /// Breaths per minute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respiratory_rate: Option<u32>,

    /// Oxygen saturation, percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spo2: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
}

impl Vitals {
    pub fn is_empty(&self) -> bool {
        *self == Vitals::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    pub drug: String,
    pub dosage: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub duration: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabPriority {
    #[default]
    Routine,
    Urgent,
    Stat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabOrder {
    pub test_name: String,
    #[serde(default)]
    pub priority: LabPriority,
}

/// What the doctor records during a consultation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consultation {
    pub diagnosis: String,
    #[serde(default)]
    pub prescriptions: Vec<Prescription>,
    #[serde(default)]
    pub lab_orders: Vec<LabOrder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultFlag {
    Normal,
    Low,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabResult {
    pub test_name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<ResultFlag>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispensedItem {
    pub drug: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    #[default]
    Pending,
    PartiallyPaid,
    Paid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub description: String,
    pub amount: f64,
}

/// The bill raised for a visit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(alias = "_id")]
    pub id: String,

    #[serde(default)]
    pub items: Vec<InvoiceItem>,

    pub total: f64,

    #[serde(default)]
    pub amount_paid: f64,

    #[serde(default)]
    pub status: InvoiceStatus,
}

impl Invoice {
    /// Amount still owed, never negative
    pub fn balance(&self) -> f64 {
        (self.total - self.amount_paid).max(0.0)
    }

    pub fn is_paid(&self) -> bool {
        self.status == InvoiceStatus::Paid || self.balance() <= f64::EPSILON
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
    Insurance,
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            "transfer" => Ok(PaymentMethod::Transfer),
            "insurance" => Ok(PaymentMethod::Insurance),
            _ => Err(format!("Unknown payment method: {}", s)),
        }
    }
}

/// A payment recorded against an invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub amount: f64,
    pub method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}
