use diesel::prelude::*;

use crate::domain::types::TypeConstraintError;
use crate::domain::workspace::{Author, Workspace as DomainWorkspace};

/// Diesel model representing the `workspaces` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::workspaces)]
pub struct Workspace {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

/// Diesel model representing the `users` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::users)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
}

impl TryFrom<Workspace> for DomainWorkspace {
    type Error = TypeConstraintError;

    fn try_from(workspace: Workspace) -> Result<Self, Self::Error> {
        Ok(Self {
            id: workspace.id.try_into()?,
            name: workspace.name,
            slug: workspace.slug,
        })
    }
}

impl TryFrom<User> for Author {
    type Error = TypeConstraintError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: user.id.try_into()?,
            name: user.name,
            email: user.email,
        })
    }
}
