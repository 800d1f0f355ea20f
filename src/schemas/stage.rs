//! Stage and role enumerations

use serde::{Deserialize, Serialize};

/// A department step in a visit's workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Registration at the front desk
    FrontDesk,
    /// Triage and vitals
    Nurse,
    /// Consultation
    Doctor,
    /// Laboratory tests
    Lab,
    /// Dispensing
    Pharmacy,
    /// Invoicing and payment
    Billing,
    /// Back at the front desk for checkout
    ReturnedToFrontDesk,
    /// Visit closed
    Completed,
}

impl Stage {
    /// The wire identifier for this stage
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::FrontDesk => "front_desk",
            Stage::Nurse => "nurse",
            Stage::Doctor => "doctor",
            Stage::Lab => "lab",
            Stage::Pharmacy => "pharmacy",
            Stage::Billing => "billing",
            Stage::ReturnedToFrontDesk => "returned_to_front_desk",
            Stage::Completed => "completed",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "front_desk" => Ok(Stage::FrontDesk),
            "nurse" => Ok(Stage::Nurse),
            "doctor" => Ok(Stage::Doctor),
            "lab" => Ok(Stage::Lab),
            "pharmacy" => Ok(Stage::Pharmacy),
            "billing" => Ok(Stage::Billing),
            "returned_to_front_desk" => Ok(Stage::ReturnedToFrontDesk),
            "completed" => Ok(Stage::Completed),
            _ => Err(format!("Unknown stage: {}", s)),
        }
    }
}

/// Staff role, as issued by the API at login
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    FrontDesk,
    Nurse,
    Doctor,
    Lab,
    Pharmacy,
    Billing,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::FrontDesk => "FRONT_DESK",
            Role::Nurse => "NURSE",
            Role::Doctor => "DOCTOR",
            Role::Lab => "LAB",
            Role::Pharmacy => "PHARMACY",
            Role::Billing => "BILLING",
            Role::Admin => "ADMIN",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('-', "_").as_str() {
            "FRONT_DESK" => Ok(Role::FrontDesk),
            "NURSE" => Ok(Role::Nurse),
            "DOCTOR" => Ok(Role::Doctor),
            "LAB" => Ok(Role::Lab),
            "PHARMACY" => Ok(Role::Pharmacy),
            "BILLING" => Ok(Role::Billing),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}
