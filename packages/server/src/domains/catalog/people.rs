//! People and their projects.

use super::statuses::{ACTIVE, PROJECT};
use crate::domains::resources::models::{
    DependentGuard, FieldSpec, ParentKey, ResourceType, SortOrder,
};

pub static TEAM_MEMBERS: ResourceType = ResourceType::new(
    "team-members",
    "Team member",
    &[
        FieldSpec::text("name").required(),
        FieldSpec::text("designation").required(),
        FieldSpec::text("department"),
        FieldSpec::text("email"),
        FieldSpec::long_text("bio"),
        FieldSpec::image("image"),
        FieldSpec::url("linkedin"),
        FieldSpec::number("order"),
    ],
)
.with_status(ACTIVE)
.sorted(SortOrder::Ascending("order"))
.searchable(&["name", "designation", "department"]);

pub static ADVISORY_BOARD: ResourceType = ResourceType::new(
    "advisory-board",
    "Advisory board member",
    &[
        FieldSpec::text("name").required(),
        FieldSpec::text("designation").required(),
        FieldSpec::text("organization"),
        FieldSpec::long_text("bio"),
        FieldSpec::image("image"),
        FieldSpec::number("order"),
    ],
)
.with_status(ACTIVE)
.sorted(SortOrder::Ascending("order"))
.searchable(&["name", "organization"]);

pub static FACULTY: ResourceType = ResourceType::new(
    "faculty",
    "Faculty member",
    &[
        FieldSpec::text("name").required(),
        FieldSpec::text("designation").required(),
        FieldSpec::text("department").required(),
        FieldSpec::text("email"),
        FieldSpec::text("specialization"),
        FieldSpec::long_text("bio"),
        FieldSpec::image("image"),
        FieldSpec::url("profileUrl"),
    ],
)
.with_status(ACTIVE)
.searchable(&["name", "department", "specialization"]);

pub static FACULTY_PROJECTS: ResourceType = ResourceType::new(
    "faculty-projects",
    "Faculty project",
    &[
        FieldSpec::text("title").required(),
        FieldSpec::long_text("description"),
        FieldSpec::text("fundingAgency"),
        FieldSpec::text("principalInvestigator"),
        FieldSpec::date("startDate"),
        FieldSpec::date("endDate"),
    ],
)
.with_status(PROJECT)
.searchable(&["title", "principalInvestigator", "fundingAgency"])
.protected_by(&[DependentGuard {
    child: "affiliated-faculty",
    field: "projectId",
    key: ParentKey::Id,
    noun: "affiliated faculty members",
}]);

pub static AFFILIATED_FACULTY: ResourceType = ResourceType::new(
    "affiliated-faculty",
    "Affiliated faculty member",
    &[
        FieldSpec::text("name").required(),
        FieldSpec::text("designation"),
        FieldSpec::text("institution"),
        FieldSpec::reference("projectId", "faculty-projects").required(),
        FieldSpec::text("email"),
        FieldSpec::image("image"),
    ],
)
.with_status(ACTIVE)
.searchable(&["name", "institution"]);
