//! Catalog of content types served under `/api/<name>`.
//!
//! Each type is one static `ResourceType`; the generic engine in
//! `domains::resources` handles all of them.

pub mod incubation;
pub mod media;
pub mod opportunities;
pub mod people;
pub mod samples;
pub mod statuses;
pub mod updates;

use crate::domains::resources::models::ResourceType;

pub use incubation::{INCUBATIONS, INCUBATION_CATEGORIES, ONGOING_PROJECTS};
pub use media::{FAQS, GALLERY, MEDIA_COVERAGE, PARTNERS, PUBLICATIONS, REPORTS, TESTIMONIALS};
pub use opportunities::{CAREERS, FELLOWSHIPS, INTERNSHIPS, TENDERS, WORKSHOPS};
pub use people::{ADVISORY_BOARD, AFFILIATED_FACULTY, FACULTY, FACULTY_PROJECTS, TEAM_MEMBERS};
pub use updates::{ANNOUNCEMENTS, BLOGS, EVENTS, NEWS, NOTICES};

static ALL: [&ResourceType; 25] = [
    &ANNOUNCEMENTS,
    &BLOGS,
    &NEWS,
    &EVENTS,
    &NOTICES,
    &CAREERS,
    &INTERNSHIPS,
    &TENDERS,
    &FELLOWSHIPS,
    &WORKSHOPS,
    &TEAM_MEMBERS,
    &ADVISORY_BOARD,
    &FACULTY,
    &FACULTY_PROJECTS,
    &AFFILIATED_FACULTY,
    &INCUBATION_CATEGORIES,
    &INCUBATIONS,
    &ONGOING_PROJECTS,
    &PUBLICATIONS,
    &REPORTS,
    &GALLERY,
    &PARTNERS,
    &TESTIMONIALS,
    &FAQS,
    &MEDIA_COVERAGE,
];

pub fn all() -> &'static [&'static ResourceType] {
    &ALL
}

pub fn find(name: &str) -> Option<&'static ResourceType> {
    ALL.iter().copied().find(|ty| ty.name == name)
}
