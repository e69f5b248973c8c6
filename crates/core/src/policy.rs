//! Access control policy for issues.
//!
//! Every guard is a pure function over the acting [`Actor`] and the
//! relevant issue fields, evaluated by handlers before any mutation. List
//! visibility is expressed as an [`IssueScope`] that the repository layer
//! compiles into a SQL predicate, so inaccessible rows never leave the
//! database (counts included).

use crate::department::Department;
use crate::error::CoreError;
use crate::issue;
use crate::roles::{Actor, Role};
use crate::types::DbId;

/// Which issues an actor may see in list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueScope {
    /// Admins: every issue.
    All,
    /// Department officers: issues assigned to their department.
    Department(Department),
    /// Citizens: issues they reported.
    Reporter(DbId),
}

/// Compute the list-visibility scope for an actor.
pub fn list_scope(actor: &Actor) -> IssueScope {
    match actor.role {
        Role::Admin => IssueScope::All,
        Role::Department(d) => IssueScope::Department(d),
        Role::Public => IssueScope::Reporter(actor.id),
    }
}

/// Single-issue read: same predicate as the list scope, evaluated against
/// the fetched row. Denial is 403, with a message that distinguishes the
/// reason, and never leaks another actor's data.
pub fn can_view(
    actor: &Actor,
    reporter_id: DbId,
    assigned_department: Option<Department>,
) -> Result<(), CoreError> {
    match actor.role {
        Role::Admin => Ok(()),
        Role::Public => {
            if reporter_id == actor.id {
                Ok(())
            } else {
                Err(CoreError::Forbidden(
                    "You can only view your own issues".into(),
                ))
            }
        }
        Role::Department(dept) => {
            if assigned_department == Some(dept) {
                Ok(())
            } else {
                Err(CoreError::Forbidden(
                    "You can only view issues assigned to your department".into(),
                ))
            }
        }
    }
}

/// Only citizens open issues; department accounts and admins act on
/// issues, they do not report them.
pub fn can_create(actor: &Actor) -> Result<(), CoreError> {
    if actor.role.is_public() {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Only public accounts can report issues".into(),
        ))
    }
}

/// Status changes, department notes, and verification submissions all
/// require an officer of the assigned department, or an admin.
pub fn can_act_for_department(
    actor: &Actor,
    assigned_department: Option<Department>,
) -> Result<(), CoreError> {
    match actor.role {
        Role::Admin => Ok(()),
        Role::Department(dept) if assigned_department == Some(dept) => Ok(()),
        Role::Department(_) => Err(CoreError::Forbidden(
            "This issue is not assigned to your department".into(),
        )),
        Role::Public => Err(CoreError::Forbidden(
            "Only department staff can perform this action".into(),
        )),
    }
}

/// Verification review (confirm or reject) belongs to the original
/// reporter alone; not even admins confirm on a citizen's behalf.
pub fn can_review_verification(actor: &Actor, reporter_id: DbId) -> Result<(), CoreError> {
    if actor.id == reporter_id {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Only the original reporter can review a verification".into(),
        ))
    }
}

/// Deletion: admin or the original reporter, unconditional once allowed.
pub fn can_delete(actor: &Actor, reporter_id: DbId) -> Result<(), CoreError> {
    if actor.role.is_admin() || actor.id == reporter_id {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Only admins and the issue reporter can delete an issue".into(),
        ))
    }
}

/// Generic field update (PATCH). The reporter may edit content fields
/// while the issue is still open; admins may edit anything. Department
/// accounts never use the generic update path -- status and notes have
/// their own guarded operations.
pub fn can_update_fields(
    actor: &Actor,
    reporter_id: DbId,
    status: &str,
) -> Result<(), CoreError> {
    match actor.role {
        Role::Admin => Ok(()),
        Role::Public => {
            if reporter_id != actor.id {
                return Err(CoreError::Forbidden(
                    "You can only update your own issues".into(),
                ));
            }
            if !issue::is_editable_by_reporter(status) {
                return Err(CoreError::Forbidden(
                    "Issues can no longer be edited once resolved".into(),
                ));
            }
            Ok(())
        }
        Role::Department(_) => Err(CoreError::Forbidden(
            "Department accounts update issues through status and note endpoints".into(),
        )),
    }
}

/// Explicit department reassignment is an administrative action.
pub fn can_assign_department(actor: &Actor) -> Result<(), CoreError> {
    if actor.role.is_admin() {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Only admins can reassign an issue's department".into(),
        ))
    }
}

/// Comment deletion: admin or the comment's author.
pub fn can_delete_comment(actor: &Actor, author_id: DbId) -> Result<(), CoreError> {
    if actor.role.is_admin() || actor.id == author_id {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Only admins and the comment author can delete a comment".into(),
        ))
    }
}
