use serde::{Deserialize, Serialize};

use crate::domain::types::{UserId, WorkspaceId};

/// Agency workspace owning a scoped blog. Managed outside this crate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: String,
    pub slug: String,
}

/// Post author as exposed on public projections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Author {
    pub id: UserId,
    pub name: String,
    pub email: String,
}
