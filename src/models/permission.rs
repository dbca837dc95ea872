use surrealdb::RecordId;

use crate::errors::{Error, Result};
use crate::models::event_member::{EventMember, Role};

/// Every gated operation on an event. The allowed set is per-action and
/// deliberately not derived from a rank ordering: `HoOC` passes only the
/// gates that list it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventAction {
    UpdateEvent,
    DeleteEvent,
    ManageEventImages,

    CreateDepartment,
    EditDepartment,
    DeleteDepartment,
    AssignHod,
    /// Adding/removing department members; the department-scope condition for
    /// HoD is checked separately via `is_hod_of`.
    ManageDepartmentMembers,

    CreateTask,
    EditTask,
    DeleteTask,
    AssignTask,
    /// Role gate only; the assignee identity check lives in the handler.
    UpdateTaskProgress,
    ViewTasks,
    ViewProgressChart,

    ManageMilestones,
    ViewMilestones,
}

impl EventAction {
    pub const fn allowed_roles(self) -> &'static [Role] {
        match self {
            EventAction::UpdateEvent
            | EventAction::DeleteEvent
            | EventAction::CreateDepartment
            | EventAction::EditDepartment
            | EventAction::DeleteDepartment
            | EventAction::AssignHod => &[Role::HoOC],

            EventAction::ManageEventImages
            | EventAction::ManageDepartmentMembers
            | EventAction::ViewProgressChart
            | EventAction::ManageMilestones => &[Role::HoOC, Role::HoD],

            EventAction::CreateTask
            | EventAction::EditTask
            | EventAction::DeleteTask
            | EventAction::AssignTask => &[Role::HoD],

            EventAction::UpdateTaskProgress => &[Role::Staff],

            EventAction::ViewTasks | EventAction::ViewMilestones => {
                &[Role::HoOC, Role::HoD, Role::Staff]
            }
        }
    }
}

/// Pure allow/deny decision: no membership is always a deny, otherwise the
/// requester's role must appear in the action's allowed set.
pub fn authorize(membership: Option<&EventMember>, action: EventAction) -> bool {
    match membership {
        Some(member) => action.allowed_roles().contains(&member.role),
        None => false,
    }
}

pub fn is_hod_of(membership: &EventMember, department_id: &RecordId) -> bool {
    membership.role == Role::HoD && membership.department_id.as_ref() == Some(department_id)
}

/// Handler-side entry point: turns a deny into `Error::Forbidden` and hands
/// the membership back for follow-up checks (department scope, assignee
/// identity).
pub trait RequireAction {
    fn require(self, action: EventAction) -> Result<EventMember>;
}

impl RequireAction for Option<EventMember> {
    fn require(self, action: EventAction) -> Result<EventMember> {
        match self {
            Some(member) if authorize(Some(&member), action) => Ok(member),
            _ => Err(Error::Forbidden),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::time_now;
    use surrealdb::RecordId;

    fn member(role: Role, department: Option<&str>) -> EventMember {
        EventMember {
            id: RecordId::from_table_key("event_members", "m1"),
            event_id: RecordId::from_table_key("events", "e1"),
            user_id: RecordId::from_table_key("users", "u1"),
            role,
            department_id: department.map(|d| RecordId::from_table_key("departments", d)),
            created_at: time_now(),
        }
    }

    #[test]
    fn no_membership_is_always_denied() {
        assert!(!authorize(None, EventAction::ViewTasks));
        assert!(!authorize(None, EventAction::UpdateEvent));
    }

    #[test]
    fn hooc_is_not_an_implicit_superuser() {
        let hooc = member(Role::HoOC, None);
        // HoD-only gates
        assert!(!authorize(Some(&hooc), EventAction::CreateTask));
        assert!(!authorize(Some(&hooc), EventAction::AssignTask));
        // staff-only gate
        assert!(!authorize(Some(&hooc), EventAction::UpdateTaskProgress));
    }

    #[test]
    fn hooc_passes_gates_that_list_it() {
        let hooc = member(Role::HoOC, None);
        assert!(authorize(Some(&hooc), EventAction::CreateDepartment));
        assert!(authorize(Some(&hooc), EventAction::AssignHod));
        assert!(authorize(Some(&hooc), EventAction::ManageEventImages));
        assert!(authorize(Some(&hooc), EventAction::ViewProgressChart));
    }

    #[test]
    fn staff_gates() {
        let staff = member(Role::Staff, Some("d1"));
        assert!(authorize(Some(&staff), EventAction::UpdateTaskProgress));
        assert!(authorize(Some(&staff), EventAction::ViewTasks));
        assert!(!authorize(Some(&staff), EventAction::CreateTask));
        assert!(!authorize(Some(&staff), EventAction::ViewProgressChart));
        assert!(!authorize(Some(&staff), EventAction::CreateDepartment));
    }

    #[test]
    fn plain_member_cannot_view_tasks() {
        // A joined-but-unassigned Member is outside every task gate.
        let plain = member(Role::Member, None);
        assert!(!authorize(Some(&plain), EventAction::ViewTasks));
        assert!(!authorize(Some(&plain), EventAction::UpdateTaskProgress));
    }

    #[test]
    fn hod_department_scope() {
        let hod = member(Role::HoD, Some("d1"));
        let d1 = RecordId::from_table_key("departments", "d1");
        let d2 = RecordId::from_table_key("departments", "d2");
        assert!(is_hod_of(&hod, &d1));
        assert!(!is_hod_of(&hod, &d2));

        let staff = member(Role::Staff, Some("d1"));
        assert!(!is_hod_of(&staff, &d1));
    }

    #[test]
    fn require_returns_forbidden_on_deny() {
        let err = Some(member(Role::Member, None))
            .require(EventAction::CreateTask)
            .unwrap_err();
        assert!(matches!(err, Error::Forbidden));

        let member_back = Some(member(Role::HoD, Some("d1")))
            .require(EventAction::CreateTask)
            .expect("HoD may create tasks");
        assert_eq!(member_back.role, Role::HoD);
    }
}
