//! Outputs and outreach: publications, reports, gallery, partners,
//! testimonials, FAQs and press coverage.

use super::statuses::ACTIVE;
use crate::domains::resources::models::{FieldSpec, ResourceType, SortOrder};

pub static PUBLICATIONS: ResourceType = ResourceType::new(
    "publications",
    "Publication",
    &[
        FieldSpec::text("title").required(),
        FieldSpec::text("authors").required(),
        FieldSpec::text("journal"),
        FieldSpec::number("year"),
        FieldSpec::text("doi"),
        FieldSpec::url("link"),
        FieldSpec::pdf("pdf"),
    ],
)
.with_status(ACTIVE)
.sorted(SortOrder::Descending("year"))
.searchable(&["title", "authors", "journal"])
.with_total();

pub static REPORTS: ResourceType = ResourceType::new(
    "reports",
    "Report",
    &[
        FieldSpec::text("title").required(),
        FieldSpec::number("year"),
        FieldSpec::long_text("description"),
        FieldSpec::pdf("pdf").required(),
        FieldSpec::image("coverImage"),
    ],
)
.with_status(ACTIVE)
.sorted(SortOrder::Descending("year"))
.searchable(&["title", "description"]);

pub static GALLERY: ResourceType = ResourceType::new(
    "gallery",
    "Gallery item",
    &[
        FieldSpec::text("title").required(),
        FieldSpec::image("image").required(),
        FieldSpec::long_text("caption"),
        FieldSpec::text("album"),
        FieldSpec::date("date"),
    ],
)
.with_status(ACTIVE)
.searchable(&["title", "album", "caption"]);

pub static PARTNERS: ResourceType = ResourceType::new(
    "partners",
    "Partner",
    &[
        FieldSpec::text("name").required(),
        FieldSpec::image("logo").required(),
        FieldSpec::url("website"),
        FieldSpec::text("category"),
    ],
)
.with_status(ACTIVE)
.sorted(SortOrder::Ascending("name"))
.searchable(&["name", "category"]);

pub static TESTIMONIALS: ResourceType = ResourceType::new(
    "testimonials",
    "Testimonial",
    &[
        FieldSpec::text("name").required(),
        FieldSpec::text("designation"),
        FieldSpec::long_text("message").required(),
        FieldSpec::image("image"),
    ],
)
.with_status(ACTIVE)
.searchable(&["name", "message"]);

pub static FAQS: ResourceType = ResourceType::new(
    "faqs",
    "FAQ",
    &[
        FieldSpec::text("question").required(),
        FieldSpec::rich_text("answer").required(),
        FieldSpec::text("category"),
        FieldSpec::number("order"),
    ],
)
.with_status(ACTIVE)
.sorted(SortOrder::Ascending("order"))
.searchable(&["question", "answer", "category"]);

pub static MEDIA_COVERAGE: ResourceType = ResourceType::new(
    "media-coverage",
    "Media coverage item",
    &[
        FieldSpec::text("title").required(),
        FieldSpec::text("outlet").required(),
        FieldSpec::date("date"),
        FieldSpec::url("link"),
        FieldSpec::image("image"),
    ],
)
.with_status(ACTIVE)
.sorted(SortOrder::Descending("date"))
.searchable(&["title", "outlet"]);
