//! Authorization policy
//!
//! All role and ownership rules live in [`authorize`]. Handlers and the
//! resolver ask it for a [`Decision`] instead of comparing roles themselves.

use shared::models::Role;
use surrealdb::RecordId;

/// Who is asking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester {
    pub user_id: RecordId,
    pub role: Role,
}

impl Requester {
    pub fn new(user_id: RecordId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// What is being acted on
#[derive(Debug, Clone, Copy)]
pub enum Resource<'a> {
    /// A reservation, identified by its owner
    Reservation { owner: &'a RecordId },
    /// Something with no owner (table inventory, reports, the full reservation list)
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ViewReservation,
    UpdateReservation,
    CancelReservation,
    DeleteReservation,
    ConfirmReservation,
    ListAllReservations,
    ManageTables,
    ViewReports,
}

impl Action {
    /// Message returned to the client when the action is refused
    pub fn denied_message(&self) -> &'static str {
        match self {
            Action::ViewReservation => "Not authorized to view this reservation",
            Action::UpdateReservation => "Not authorized to update this reservation",
            Action::CancelReservation => "Not authorized to cancel this reservation",
            Action::DeleteReservation => "Not authorized to delete this reservation",
            Action::ConfirmReservation
            | Action::ListAllReservations
            | Action::ManageTables
            | Action::ViewReports => "Access denied",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::ViewReservation => "view_reservation",
            Action::UpdateReservation => "update_reservation",
            Action::CancelReservation => "cancel_reservation",
            Action::DeleteReservation => "delete_reservation",
            Action::ConfirmReservation => "confirm_reservation",
            Action::ListAllReservations => "list_all_reservations",
            Action::ManageTables => "manage_tables",
            Action::ViewReports => "view_reports",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// Requester does not own the resource
    NotOwner,
    /// Action needs the admin role
    AdminRequired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Decide whether `requester` may perform `action` on `resource`
///
/// | Action | Rule |
/// |---|---|
/// | view, cancel, delete reservation | owner or admin |
/// | update reservation | owner only, no admin override |
/// | confirm, list all, manage tables, reports | admin |
pub fn authorize(requester: &Requester, resource: &Resource<'_>, action: Action) -> Decision {
    let is_owner = match resource {
        Resource::Reservation { owner } => *owner == &requester.user_id,
        Resource::System => false,
    };

    match action {
        Action::UpdateReservation => {
            if is_owner {
                Decision::Allow
            } else {
                Decision::Deny(DenyReason::NotOwner)
            }
        }
        Action::ViewReservation | Action::CancelReservation | Action::DeleteReservation => {
            if is_owner || requester.is_admin() {
                Decision::Allow
            } else {
                Decision::Deny(DenyReason::NotOwner)
            }
        }
        Action::ConfirmReservation
        | Action::ListAllReservations
        | Action::ManageTables
        | Action::ViewReports => {
            if requester.is_admin() {
                Decision::Allow
            } else {
                Decision::Deny(DenyReason::AdminRequired)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(key: &str) -> Requester {
        Requester::new(RecordId::from_table_key("user", key), Role::Client)
    }

    fn admin(key: &str) -> Requester {
        Requester::new(RecordId::from_table_key("user", key), Role::Admin)
    }

    #[test]
    fn test_update_is_owner_only() {
        let owner = RecordId::from_table_key("user", "ana");
        let res = Resource::Reservation { owner: &owner };

        assert_eq!(authorize(&client("ana"), &res, Action::UpdateReservation), Decision::Allow);
        assert_eq!(
            authorize(&client("bob"), &res, Action::UpdateReservation),
            Decision::Deny(DenyReason::NotOwner)
        );
        // admins get no override on update
        assert_eq!(
            authorize(&admin("root"), &res, Action::UpdateReservation),
            Decision::Deny(DenyReason::NotOwner)
        );
    }

    #[test]
    fn test_delete_and_cancel_allow_admin() {
        let owner = RecordId::from_table_key("user", "ana");
        let res = Resource::Reservation { owner: &owner };

        for action in [Action::DeleteReservation, Action::CancelReservation, Action::ViewReservation] {
            assert!(authorize(&client("ana"), &res, action).is_allowed());
            assert!(authorize(&admin("root"), &res, action).is_allowed());
            assert_eq!(
                authorize(&client("bob"), &res, action),
                Decision::Deny(DenyReason::NotOwner)
            );
        }
    }

    #[test]
    fn test_admin_actions() {
        for action in [
            Action::ConfirmReservation,
            Action::ListAllReservations,
            Action::ManageTables,
            Action::ViewReports,
        ] {
            assert!(authorize(&admin("root"), &Resource::System, action).is_allowed());
            assert_eq!(
                authorize(&client("ana"), &Resource::System, action),
                Decision::Deny(DenyReason::AdminRequired)
            );
        }
    }

    #[test]
    fn test_owner_does_not_confirm_own_reservation() {
        let owner = RecordId::from_table_key("user", "ana");
        let res = Resource::Reservation { owner: &owner };
        assert_eq!(
            authorize(&client("ana"), &res, Action::ConfirmReservation),
            Decision::Deny(DenyReason::AdminRequired)
        );
    }
}
