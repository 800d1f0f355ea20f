//! Staff members, staff references and the logged-in session

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::stage::Role;

/// A staff member as listed by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    #[serde(alias = "_id")]
    pub id: String,

    pub name: String,

    pub role: Role,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Staff {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Staff {
            id: id.into(),
            name: name.into(),
            role,
            department: None,
            email: None,
        }
    }

    /// A lightweight reference to this staff member
    pub fn to_ref(&self) -> StaffRef {
        StaffRef {
            id: self.id.clone(),
            name: Some(self.name.clone()),
        }
    }
}

/// Reference to a staff member inside a visit record.
///
/// The API sends either a bare id or a populated object; both deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StaffRefRepr")]
pub struct StaffRef {
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl StaffRef {
    pub fn id(id: impl Into<String>) -> Self {
        StaffRef {
            id: id.into(),
            name: None,
        }
    }

    /// Name when populated, otherwise the id
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StaffRefRepr {
    Id(String),
    Populated {
        #[serde(alias = "_id")]
        id: String,
        #[serde(default)]
        name: Option<String>,
    },
}

impl From<StaffRefRepr> for StaffRef {
    fn from(repr: StaffRefRepr) -> Self {
        match repr {
            StaffRefRepr::Id(id) => StaffRef { id, name: None },
            StaffRefRepr::Populated { id, name } => StaffRef { id, name },
        }
    }
}

/// The authenticated staff member and their bearer token.
///
/// Passed explicitly to every operation that depends on who is acting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub staff: Staff,

    pub token: String,

    pub issued_at: DateTime<Utc>,
}

impl Session {
    pub fn new(staff: Staff, token: impl Into<String>) -> Self {
        Session {
            staff,
            token: token.into(),
            issued_at: Utc::now(),
        }
    }

    pub fn role(&self) -> Role {
        self.staff.role
    }
}

/// Body of a successful `POST /auth/login`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: Staff,
}
