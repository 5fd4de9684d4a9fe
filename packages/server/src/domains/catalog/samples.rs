//! Starter content for fresh installs and demos (`cms_admin seed`).

use serde_json::{json, Map, Value};

use super::{
    AFFILIATED_FACULTY, ANNOUNCEMENTS, BLOGS, EVENTS, FACULTY_PROJECTS, FAQS, INCUBATIONS,
    INCUBATION_CATEGORIES, ONGOING_PROJECTS, TENDERS,
};
use crate::common::ApiError;
use crate::domains::resources::{create_resource, Document, ResourceType};
use crate::kernel::ServerDeps;

fn fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Items with no cross-type links, in creation order.
pub fn standalone() -> Vec<(&'static ResourceType, Map<String, Value>)> {
    vec![
        (
            &ANNOUNCEMENTS,
            fields(json!({
                "title": "Admissions open for the 2025 research cohort",
                "description": "Applications close at the end of the month.",
                "date": "2025-01-15"
            })),
        ),
        (
            &BLOGS,
            fields(json!({
                "title": "Notes from the Annual Innovation Summit",
                "author": "Communications Office",
                "excerpt": "Highlights from three days of talks and demos.",
                "content": "<p>Over three days, founders and researchers...</p>",
                "status": "published"
            })),
        ),
        (
            &EVENTS,
            fields(json!({
                "title": "Demo Day",
                "venue": "Main Auditorium",
                "date": "2025-03-20",
                "time": "10:00"
            })),
        ),
        (
            &TENDERS,
            fields(json!({
                "refNo": "T-2025-001",
                "dated": "2025-01-10",
                "details": "Supply and installation of laboratory equipment.",
                "dateOfIssue": "2025-01-10",
                "startDate": "2025-01-11",
                "lastDate": "2025-02-10",
                "openingDate": "2025-02-12"
            })),
        ),
        (
            &ONGOING_PROJECTS,
            fields(json!({
                "title": "Low-cost water quality sensors",
                "fundingAgency": "Department of Science and Technology",
                "principalInvestigator": "Dr. A. Rao"
            })),
        ),
        (
            &FAQS,
            fields(json!({
                "question": "Who can apply for incubation?",
                "answer": "<p>Any early-stage startup with a working prototype.</p>",
                "order": 1
            })),
        ),
    ]
}

/// Create the sample set through the engine, linking dependents to their parents.
pub async fn seed(deps: &ServerDeps) -> Result<Vec<(&'static str, Document)>, ApiError> {
    let mut created = Vec::new();

    for (ty, body) in standalone() {
        created.push((ty.name, create_resource(ty, body, deps).await?));
    }

    let category = create_resource(
        &INCUBATION_CATEGORIES,
        fields(json!({"name": "AgriTech", "description": "Farm and food technology"})),
        deps,
    )
    .await?;
    let startup = create_resource(
        &INCUBATIONS,
        fields(json!({
            "name": "SoilSense",
            "category": category.str_field("name"),
            "founder": "Priya Menon",
            "yearOfIncubation": 2024
        })),
        deps,
    )
    .await?;
    created.push((INCUBATION_CATEGORIES.name, category));
    created.push((INCUBATIONS.name, startup));

    let project = create_resource(
        &FACULTY_PROJECTS,
        fields(json!({
            "title": "Edge AI for crop disease detection",
            "principalInvestigator": "Dr. S. Iyer",
            "startDate": "2024-07-01"
        })),
        deps,
    )
    .await?;
    let member = create_resource(
        &AFFILIATED_FACULTY,
        fields(json!({
            "name": "Dr. K. Bose",
            "institution": "State Agricultural University",
            "projectId": project.id.to_string()
        })),
        deps,
    )
    .await?;
    created.push((FACULTY_PROJECTS.name, project));
    created.push((AFFILIATED_FACULTY.name, member));

    Ok(created)
}
