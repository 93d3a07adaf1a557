pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod feedback;
pub mod filter;
pub mod images;
pub mod list_view;
pub mod pagination;
pub mod summary;
pub mod users;

pub use api::{AdminApi, Feedback, FetchError, HttpAdminApi, User};
pub use config::Config;
pub use error::{AdminError, Result};
pub use feedback::{FeedbackLoader, FeedbackRow, FeedbackView, LoadTicket, PageLoad, RowImage};
pub use filter::{Category, FeedbackFilters, ResolvedFilter, SortOrder, UserFilters};
pub use images::{ImageHandle, ImageStore};
pub use list_view::{Align, ColumnDescriptor, ListView, RenderedTable};
pub use pagination::{PAGE_SIZE, PageInfo, Pagination};
pub use summary::DashboardSummary;
