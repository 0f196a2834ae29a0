//! Complaint and ticket submission forms.
//!
//! Validation runs before any request is built, so a rejected form never
//! reaches the network. Field values survive both validation and network
//! failures; only a successful submission clears the description.

use crate::bins::BinSelector;
use crate::model::{NewComplaint, NewTicket, STATUS_OPEN};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// A required form field is missing or malformed.
pub enum ValidationError {
    /// Complaint lacks bin, user, or description.
    #[error("Please fill bin, user, and description.")]
    Complaint,
    /// Ticket lacks bin, creator, or description.
    #[error("Please fill bin, created_by, and description.")]
    Ticket,
    /// Complaint category left blank.
    #[error("Please choose a complaint type.")]
    ComplaintType,
    /// Assignee is neither blank nor a user id.
    #[error("Assigned to must be a user id or left blank.")]
    Assignee,
}

/// Category a new complaint starts with.
pub const DEFAULT_COMPLAINT_TYPE: &str = "OVERFLOW";

/// Parse a user-entered id; blank, zero, negative, or non-numeric is `None`.
fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

#[derive(Debug, Clone)]
/// Fields of the new-complaint form.
pub struct ComplaintForm {
    /// Bin the complaint is about.
    pub bin: BinSelector,
    /// Reporting user id, as typed.
    pub user_id: String,
    /// Complaint category.
    pub complaint_type: String,
    /// Free-text description.
    pub description: String,
}

impl Default for ComplaintForm {
    fn default() -> Self {
        Self {
            bin: BinSelector::default(),
            user_id: String::new(),
            complaint_type: DEFAULT_COMPLAINT_TYPE.to_owned(),
            description: String::new(),
        }
    }
}

impl ComplaintForm {
    /// Validate the form and build the insert payload.
    ///
    /// The status is always `OPEN`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Complaint`] when bin, user, or trimmed
    /// description is missing, and [`ValidationError::ComplaintType`] when
    /// the type was cleared.
    pub fn to_payload(&self) -> Result<NewComplaint, ValidationError> {
        let description = self.description.trim();
        let (Some(bin_id), Some(user_id)) = (self.bin.current(), parse_id(&self.user_id)) else {
            return Err(ValidationError::Complaint);
        };
        if description.is_empty() {
            return Err(ValidationError::Complaint);
        }
        let complaint_type = self.complaint_type.trim();
        if complaint_type.is_empty() {
            return Err(ValidationError::ComplaintType);
        }
        Ok(NewComplaint {
            bin_id,
            user_id,
            complaint_type: complaint_type.to_owned(),
            description: description.to_owned(),
            status: STATUS_OPEN.to_owned(),
        })
    }

    /// Reset the description after a successful submission.
    pub fn clear_description(&mut self) {
        self.description.clear();
    }
}

#[derive(Debug, Clone)]
/// Fields of the new-ticket form.
pub struct TicketForm {
    /// Bin needing maintenance.
    pub bin: BinSelector,
    /// Initial status, passed through as entered.
    pub status: String,
    /// Description of the issue.
    pub description: String,
    /// Creator user id, as typed.
    pub created_by: String,
    /// Optional assignee user id, as typed.
    pub assigned_to: String,
}

impl Default for TicketForm {
    fn default() -> Self {
        Self {
            bin: BinSelector::default(),
            status: STATUS_OPEN.to_owned(),
            description: String::new(),
            created_by: String::new(),
            assigned_to: String::new(),
        }
    }
}

impl TicketForm {
    /// Validate the form and build the insert payload.
    ///
    /// A blank assignee becomes `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Ticket`] when bin, creator, or trimmed
    /// description is missing, and [`ValidationError::Assignee`] when the
    /// assignee is not blank but not an id either.
    pub fn to_payload(&self) -> Result<NewTicket, ValidationError> {
        let description = self.description.trim();
        let (Some(bin_id), Some(created_by)) = (self.bin.current(), parse_id(&self.created_by))
        else {
            return Err(ValidationError::Ticket);
        };
        if description.is_empty() {
            return Err(ValidationError::Ticket);
        }
        let assigned_to = match self.assigned_to.trim() {
            "" => None,
            raw => Some(parse_id(raw).ok_or(ValidationError::Assignee)?),
        };
        Ok(NewTicket {
            bin_id,
            status: self.status.trim().to_owned(),
            issue_desc: description.to_owned(),
            created_by,
            assigned_to,
        })
    }

    /// Reset the description after a successful submission.
    pub fn clear_description(&mut self) {
        self.description.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::model::BinId;

    fn complaint_form() -> ComplaintForm {
        let mut form = ComplaintForm::default();
        form.bin.populate(&fixtures::bins(), Some(BinId(2)));
        form.user_id = "7".to_owned();
        form.complaint_type = "OVERFLOW".to_owned();
        form.description = "  lid will not close  ".to_owned();
        form
    }

    fn ticket_form() -> TicketForm {
        let mut form = TicketForm::default();
        form.bin.populate(&fixtures::bins(), Some(BinId(1)));
        form.created_by = "3".to_owned();
        form.description = "sensor offline".to_owned();
        form
    }

    #[test]
    fn complaint_payload_forces_open_and_trims() {
        let payload = complaint_form().to_payload().expect("valid form");
        assert_eq!(payload.bin_id, BinId(2));
        assert_eq!(payload.user_id, 7);
        assert_eq!(payload.description, "lid will not close");
        assert_eq!(payload.status, "OPEN");
    }

    #[test]
    fn complaint_requires_bin_user_and_description() {
        let mut form = complaint_form();
        form.description = "   ".to_owned();
        assert_eq!(form.to_payload(), Err(ValidationError::Complaint));

        let mut form = complaint_form();
        form.user_id = "abc".to_owned();
        assert_eq!(form.to_payload(), Err(ValidationError::Complaint));

        let mut form = complaint_form();
        form.user_id = "0".to_owned();
        assert_eq!(form.to_payload(), Err(ValidationError::Complaint));

        let mut form = complaint_form();
        form.bin = BinSelector::default();
        assert_eq!(form.to_payload(), Err(ValidationError::Complaint));
    }

    #[test]
    fn complaint_type_starts_filled_and_may_not_be_blank() {
        let mut form = ComplaintForm::default();
        form.bin.populate(&fixtures::bins(), None);
        form.user_id = "7".to_owned();
        form.description = "smells".to_owned();
        let payload = form.to_payload().expect("default type is valid");
        assert_eq!(payload.complaint_type, "OVERFLOW");

        form.complaint_type = "  ".to_owned();
        assert_eq!(form.to_payload(), Err(ValidationError::ComplaintType));
    }

    #[test]
    fn blank_assignee_is_absent() {
        let mut form = ticket_form();
        form.assigned_to = "   ".to_owned();
        let payload = form.to_payload().expect("valid form");
        assert_eq!(payload.assigned_to, None);
        assert_eq!(payload.status, "OPEN");
    }

    #[test]
    fn ticket_status_is_passed_through() {
        let mut form = ticket_form();
        form.status = "IN_PROGRESS".to_owned();
        form.assigned_to = "12".to_owned();
        let payload = form.to_payload().expect("valid form");
        assert_eq!(payload.status, "IN_PROGRESS");
        assert_eq!(payload.assigned_to, Some(12));
    }

    #[test]
    fn ticket_rejects_missing_creator_and_bad_assignee() {
        let mut form = ticket_form();
        form.created_by.clear();
        assert_eq!(form.to_payload(), Err(ValidationError::Ticket));

        let mut form = ticket_form();
        form.assigned_to = "someone".to_owned();
        assert_eq!(form.to_payload(), Err(ValidationError::Assignee));
    }

    #[test]
    fn clearing_keeps_other_fields() {
        let mut form = complaint_form();
        form.clear_description();
        assert!(form.description.is_empty(), "description cleared");
        assert_eq!(form.user_id, "7");
        assert_eq!(form.bin.current(), Some(BinId(2)));
    }
}
