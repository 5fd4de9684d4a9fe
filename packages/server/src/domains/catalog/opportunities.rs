//! Calls and openings: careers, internships, tenders, fellowships, workshops.

use super::statuses::{OPEN, SCHEDULED};
use crate::domains::resources::models::{FieldSpec, ResourceType, SortOrder};

pub static CAREERS: ResourceType = ResourceType::new(
    "careers",
    "Career",
    &[
        FieldSpec::text("title").required(),
        FieldSpec::text("department"),
        FieldSpec::text("location"),
        FieldSpec::rich_text("description").required(),
        FieldSpec::long_text("qualifications"),
        FieldSpec::date("lastDate").required(),
        FieldSpec::url("applyLink"),
        FieldSpec::pdf("pdf"),
    ],
)
.with_status(OPEN)
.searchable(&["title", "department", "location"])
.with_total();

pub static INTERNSHIPS: ResourceType = ResourceType::new(
    "internships",
    "Internship",
    &[
        FieldSpec::text("title").required(),
        FieldSpec::text("duration"),
        FieldSpec::text("stipend"),
        FieldSpec::rich_text("description").required(),
        FieldSpec::long_text("eligibility"),
        FieldSpec::date("lastDate"),
        FieldSpec::url("applyLink"),
    ],
)
.with_status(OPEN)
.searchable(&["title", "description"]);

pub static TENDERS: ResourceType = ResourceType::new(
    "tenders",
    "Tender",
    &[
        FieldSpec::text("refNo").required(),
        FieldSpec::date("dated").required(),
        FieldSpec::long_text("details").required(),
        FieldSpec::date("dateOfIssue").required(),
        FieldSpec::date("startDate").required(),
        FieldSpec::date("lastDate").required(),
        FieldSpec::date("openingDate").required(),
        FieldSpec::pdf("pdf"),
    ],
)
.with_status(OPEN)
.searchable(&["refNo", "details"])
.with_total();

pub static FELLOWSHIPS: ResourceType = ResourceType::new(
    "fellowships",
    "Fellowship",
    &[
        FieldSpec::text("title").required(),
        FieldSpec::rich_text("description"),
        FieldSpec::long_text("eligibility"),
        FieldSpec::text("amount"),
        FieldSpec::date("deadline"),
        FieldSpec::url("applyLink"),
        FieldSpec::image("image"),
    ],
)
.with_status(OPEN)
.searchable(&["title", "eligibility"]);

pub static WORKSHOPS: ResourceType = ResourceType::new(
    "workshops",
    "Workshop",
    &[
        FieldSpec::text("title").required(),
        FieldSpec::rich_text("description"),
        FieldSpec::date("date").required(),
        FieldSpec::text("venue"),
        FieldSpec::text("speaker"),
        FieldSpec::image("image"),
        FieldSpec::url("registrationLink"),
    ],
)
.with_status(SCHEDULED)
.sorted(SortOrder::Descending("date"))
.searchable(&["title", "speaker", "venue"]);
