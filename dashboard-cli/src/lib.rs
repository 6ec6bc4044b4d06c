mod controller;
mod form;

pub use controller::{view_details_enabled, Dashboard, DashboardPhase, StatusBadge};
pub use form::CreateForm;
