//! Profile dashboard: the signed-in user's profile, listings, searches and
//! contracts.

mod profile_view;
mod summary;

pub use profile_view::{ProfileView, display_name, initials};
pub use summary::{Dashboard, load_dashboard};
