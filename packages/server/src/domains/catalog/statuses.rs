//! Status enums shared by several resource types.

use crate::domains::resources::models::StatusSpec;

pub const ACTIVE: StatusSpec = StatusSpec::new(&["active", "inactive"], "active");

/// Editorial content; public lists show only published items unless asked.
pub const EDITORIAL: StatusSpec =
    StatusSpec::new(&["draft", "published"], "draft").listing_only("published");

pub const OPEN: StatusSpec = StatusSpec::new(&["open", "closed"], "open");

pub const SCHEDULED: StatusSpec =
    StatusSpec::new(&["upcoming", "ongoing", "completed"], "upcoming");

pub const PROJECT: StatusSpec = StatusSpec::new(&["ongoing", "completed"], "ongoing");
