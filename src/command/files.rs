//! File commands - annotation export

use super::CommandStatus;
use crate::error::Result;
use crate::session::Session;

/// Write all annotations to the export file
pub fn export_annotations(session: &mut Session) -> Result<CommandStatus> {
    Ok(session.export())
}
