use serde::{Deserialize, Serialize};

use crate::dataset::{ConnectionType, Role};

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Background,
    Border,

    EraLabel,

    RoleComposer,
    RolePlayer,
    RoleBoth,
    BarLabel,
    BarOutline,

    ConnectionRelative,
    ConnectionStudentTeacher,

    AxisLine,
    AxisLabel,

    TextPrimary,
    TextMuted,
}

impl ThemeToken {
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Composer => Self::RoleComposer,
            Role::Player => Self::RolePlayer,
            Role::Both => Self::RoleBoth,
        }
    }

    pub fn for_connection(kind: ConnectionType) -> Self {
        match kind {
            ConnectionType::Relative => Self::ConnectionRelative,
            ConnectionType::StudentTeacher => Self::ConnectionStudentTeacher,
        }
    }
}
