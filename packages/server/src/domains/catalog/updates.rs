//! News-like content: announcements, blogs, news, events, notices.

use super::statuses::{ACTIVE, EDITORIAL, SCHEDULED};
use crate::domains::resources::models::{FieldSpec, ResourceType, SortOrder};

pub static ANNOUNCEMENTS: ResourceType = ResourceType::new(
    "announcements",
    "Announcement",
    &[
        FieldSpec::text("title").required(),
        FieldSpec::long_text("description"),
        FieldSpec::date("date"),
        FieldSpec::url("link"),
        FieldSpec::pdf("pdf"),
    ],
)
.with_status(ACTIVE)
.searchable(&["title", "description"]);

pub static BLOGS: ResourceType = ResourceType::new(
    "blogs",
    "Blog",
    &[
        FieldSpec::text("title").required(),
        FieldSpec::text("slug"),
        FieldSpec::text("author").required(),
        FieldSpec::long_text("excerpt"),
        FieldSpec::rich_text("content").required(),
        FieldSpec::image("coverImage"),
        FieldSpec::text("tags"),
    ],
)
.with_status(EDITORIAL)
.searchable(&["title", "author", "excerpt", "tags"])
.slug_from("title")
.published_when("published")
.counts_views()
.with_total();

pub static NEWS: ResourceType = ResourceType::new(
    "news",
    "News article",
    &[
        FieldSpec::text("title").required(),
        FieldSpec::text("slug"),
        FieldSpec::long_text("summary"),
        FieldSpec::rich_text("content").required(),
        FieldSpec::image("image"),
        FieldSpec::text("source"),
        FieldSpec::url("sourceUrl"),
    ],
)
.with_status(EDITORIAL)
.searchable(&["title", "summary", "source"])
.slug_from("title")
.published_when("published")
.counts_views()
.with_total();

pub static EVENTS: ResourceType = ResourceType::new(
    "events",
    "Event",
    &[
        FieldSpec::text("title").required(),
        FieldSpec::long_text("description"),
        FieldSpec::text("venue"),
        FieldSpec::date("date").required(),
        FieldSpec::text("time"),
        FieldSpec::image("image"),
        FieldSpec::url("registrationLink"),
    ],
)
.with_status(SCHEDULED)
.sorted(SortOrder::Descending("date"))
.searchable(&["title", "venue", "description"]);

pub static NOTICES: ResourceType = ResourceType::new(
    "notices",
    "Notice",
    &[
        FieldSpec::text("title").required(),
        FieldSpec::long_text("description"),
        FieldSpec::date("date").required(),
        FieldSpec::pdf("pdf"),
    ],
)
.with_status(ACTIVE)
.sorted(SortOrder::Descending("date"))
.searchable(&["title", "description"]);
