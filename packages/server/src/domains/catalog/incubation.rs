//! Incubator programme: startup categories, startups and funded projects.

use super::statuses::ACTIVE;
use crate::domains::resources::models::{
    DependentGuard, FieldSpec, ParentKey, ResourceType, SortOrder,
};

/// Startups reference their category by name, not by id.
pub static INCUBATION_CATEGORIES: ResourceType = ResourceType::new(
    "incubation-categories",
    "Incubation category",
    &[
        FieldSpec::text("name").required(),
        FieldSpec::long_text("description"),
    ],
)
.with_status(ACTIVE)
.sorted(SortOrder::Ascending("name"))
.searchable(&["name"])
.protected_by(&[DependentGuard {
    child: "incubations",
    field: "category",
    key: ParentKey::Field("name"),
    noun: "startups",
}]);

pub static INCUBATIONS: ResourceType = ResourceType::new(
    "incubations",
    "Startup",
    &[
        FieldSpec::text("name").required(),
        FieldSpec::reference("category", "incubation-categories").required(),
        FieldSpec::text("founder"),
        FieldSpec::long_text("description"),
        FieldSpec::url("website"),
        FieldSpec::image("logo"),
        FieldSpec::number("yearOfIncubation"),
    ],
)
.with_status(ACTIVE)
.searchable(&["name", "founder", "category"])
.with_total();

pub static ONGOING_PROJECTS: ResourceType = ResourceType::new(
    "ongoing-projects",
    "Ongoing project",
    &[
        FieldSpec::number("sno"),
        FieldSpec::text("title").required(),
        FieldSpec::text("fundingAgency"),
        FieldSpec::text("principalInvestigator"),
        FieldSpec::text("duration"),
        FieldSpec::text("amount"),
    ],
)
.with_status(ACTIVE)
.sorted(SortOrder::Ascending("sno"))
.searchable(&["title", "principalInvestigator", "fundingAgency"])
.numbered_by("sno");
