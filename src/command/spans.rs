//! Annotation commands - activation and deletion of stored spans

use super::CommandStatus;
use crate::error::Result;
use crate::session::Session;

/// Activate the span under the cursor, or step to the next one stacked there
pub fn activate_at_point(session: &mut Session) -> Result<CommandStatus> {
    Ok(session.activate_at_cursor())
}

/// Activate the next span in the annotation list
pub fn next_annotation(session: &mut Session) -> Result<CommandStatus> {
    Ok(session.cycle_active(true))
}

/// Activate the previous span in the annotation list
pub fn previous_annotation(session: &mut Session) -> Result<CommandStatus> {
    Ok(session.cycle_active(false))
}

/// Delete the active span
pub fn delete_annotation(session: &mut Session) -> Result<CommandStatus> {
    Ok(session.delete_active())
}
