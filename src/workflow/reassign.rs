//! Reassignment within the current stage

use serde_json::{Map, Value};
use tracing::info;

use crate::api::VisitApi;
use crate::domain::{assignment_field, validate_reassignment};
use crate::errors::{CareQueueError, Result};
use crate::schemas::{Session, Visit};

use super::{VisitEvent, VisitWorkflow};

impl<A: VisitApi> VisitWorkflow<A> {
    /// Point the current stage's assignment at `staff_id`.
    ///
    /// Only the assignment field changes; the visit stays where it is.
    pub async fn reassign(&self, session: &Session, visit: &Visit, staff_id: &str) -> Result<Visit> {
        validate_reassignment(visit, session.role(), staff_id).into_result()?;

        let stage = visit.current_stage;
        let field = assignment_field(stage).ok_or_else(|| {
            CareQueueError::Validation(format!("{} has no staff assignment", stage))
        })?;
        let staff_id = staff_id.trim();

        let mut fields = Map::new();
        fields.insert(field.to_string(), Value::String(staff_id.to_string()));
        let updated = self.api.update_visit(&visit.id, Value::Object(fields)).await?;

        info!(visit = %visit.id, %stage, to = staff_id, "Reassigned visit");
        self.events.publish(VisitEvent::Reassigned {
            visit_id: visit.id.clone(),
            stage,
            staff_id: staff_id.to_string(),
        });
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{patient, MockVisitApi};
    use crate::domain::get_assignment;
    use crate::schemas::{Role, Stage, Staff, StaffRef};
    use crate::workflow::VisitEvents;

    fn session(role: Role) -> Session {
        Session::new(Staff::new("me", "Me", role), "token")
    }

    fn lab_visit() -> Visit {
        let mut visit = Visit::new("v1", patient("p1"))
            .with_current_stage(Stage::Lab)
            .with_clock_in(Stage::Lab, StaffRef::id("l1"));
        visit.assigned_lab = Some(StaffRef::id("l1"));
        visit
    }

    #[tokio::test]
    async fn test_reassign_updates_field_only() {
        let visit = lab_visit();
        let workflow = VisitWorkflow::new(
            MockVisitApi::new().with_visit(visit.clone()),
            VisitEvents::new(),
        );
        let mut rx = workflow.events().subscribe();

        let updated = workflow
            .reassign(&session(Role::Lab), &visit, " l2 ")
            .await
            .unwrap();

        assert_eq!(updated.current_stage, Stage::Lab);
        assert_eq!(get_assignment(&updated, Stage::Lab).unwrap().id, "l2");
        assert_eq!(workflow.api().call_count("update_visit"), 1);
        assert_eq!(workflow.api().call_count("handoff"), 0);
        assert_eq!(
            rx.recv().await.unwrap(),
            VisitEvent::Reassigned {
                visit_id: "v1".into(),
                stage: Stage::Lab,
                staff_id: "l2".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_reassign_to_same_staff_rejected() {
        let visit = lab_visit();
        let workflow = VisitWorkflow::new(
            MockVisitApi::new().with_visit(visit.clone()),
            VisitEvents::new(),
        );
        for staff_id in ["l1", " l1 "] {
            let err = workflow
                .reassign(&session(Role::Lab), &visit, staff_id)
                .await
                .unwrap_err();
            assert!(matches!(err, CareQueueError::Validation(_)));
        }
        assert!(workflow.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_reassign_at_front_desk_rejected() {
        let visit = Visit::new("v2", patient("p2"));
        let workflow = VisitWorkflow::new(
            MockVisitApi::new().with_visit(visit.clone()),
            VisitEvents::new(),
        );
        let err = workflow
            .reassign(&session(Role::FrontDesk), &visit, "n1")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no staff assignment"));
    }
}
