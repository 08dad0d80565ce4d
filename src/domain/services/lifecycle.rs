use crate::domain::models::booking::BookingStatus;
use crate::error::AppError;

/// Status state machine: forward-only through the enum order, CANCELLED
/// reachable from any non-terminal state, no transition out of a terminal
/// state.
pub fn validate_transition(from: BookingStatus, to: BookingStatus) -> Result<(), AppError> {
    if from.is_terminal() {
        return Err(AppError::Conflict(format!(
            "Booking is {} and cannot change status",
            from.as_str()
        )));
    }
    if to == BookingStatus::Cancelled {
        return Ok(());
    }
    if to <= from {
        return Err(AppError::Conflict(format!(
            "Cannot move booking from {} to {}",
            from.as_str(),
            to.as_str()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use BookingStatus::*;

    #[test]
    fn test_forward_transitions_allowed() {
        assert!(validate_transition(Inquiry, Tentative).is_ok());
        assert!(validate_transition(Tentative, Confirmed).is_ok());
        assert!(validate_transition(Confirmed, Ongoing).is_ok());
        assert!(validate_transition(Ongoing, Completed).is_ok());
        // Skipping forward is an operator shortcut, not an error.
        assert!(validate_transition(Inquiry, Confirmed).is_ok());
    }

    #[test]
    fn test_backward_transitions_rejected() {
        assert!(validate_transition(Confirmed, Tentative).is_err());
        assert!(validate_transition(Ongoing, Inquiry).is_err());
        assert!(validate_transition(Tentative, Tentative).is_err());
    }

    #[test]
    fn test_cancel_from_any_non_terminal() {
        for from in [Inquiry, Tentative, Confirmed, Ongoing] {
            assert!(validate_transition(from, Cancelled).is_ok());
        }
    }

    #[test]
    fn test_terminal_states_are_final() {
        assert!(validate_transition(Completed, Ongoing).is_err());
        assert!(validate_transition(Completed, Cancelled).is_err());
        assert!(validate_transition(Cancelled, Inquiry).is_err());
        assert!(validate_transition(Cancelled, Cancelled).is_err());
    }

    #[test]
    fn test_blocking_statuses() {
        for s in [Inquiry, Tentative, Confirmed, Ongoing] {
            assert!(s.is_blocking());
        }
        assert!(!Completed.is_blocking());
        assert!(!Cancelled.is_blocking());
    }
}
