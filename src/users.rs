//! User list: tag-filtered user statistics.

use tracing::warn;

use crate::api::{AdminApi, FetchError, User};
use crate::error::Result;
use crate::filter::UserFilters;
use crate::list_view::{Align, ColumnDescriptor, ListView, RenderedTable};

/// Users matching `filters`, plus the diagnostic if the request failed
#[derive(Debug, Default)]
pub struct UserLoad {
    pub users: Vec<User>,
    pub error: Option<FetchError>,
}

/// Fetch users for the selected tags.
///
/// With no tags selected nothing is requested and the list is empty. Request
/// failures are logged and yield an empty list.
pub async fn load_users<A: AdminApi>(api: &A, filters: &UserFilters) -> UserLoad {
    if filters.tags.is_empty() {
        return UserLoad::default();
    }

    match api.filter_users(&filters.query()).await {
        Ok(users) => UserLoad { users, error: None },
        Err(e) => {
            warn!(kind = e.kind(), error = %e, "failed to load users");
            UserLoad {
                users: Vec::new(),
                error: Some(e),
            }
        }
    }
}

pub fn columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("Username"),
        ColumnDescriptor::new("Level").aligned(Align::Right),
        ColumnDescriptor::new("Score").aligned(Align::Right),
        ColumnDescriptor::new("Games Started").aligned(Align::Right),
        ColumnDescriptor::new("Accuracy").aligned(Align::Right),
        ColumnDescriptor::new("Engagement").aligned(Align::Right),
    ]
}

pub fn render(users: &[User]) -> Result<RenderedTable> {
    ListView::render(&columns(), users, |u| u.username.clone(), |u| {
        vec![
            u.username.clone(),
            u.level.to_string(),
            format_number(u.score),
            u.games_started.to_string(),
            crate::summary::format_percent(u.accuracy),
            format_number(u.engagement),
        ]
    })
}

/// Whole numbers print without a fractional part.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}
