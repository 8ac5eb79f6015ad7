//! Dashboard client for the SleepDash API.
//!
//! - `session`: the operator's token and profile, persisted between runs
//! - `api`: typed HTTP access to the backend
//! - `fetch`: one timeout-bounded request that degrades to a fallback
//! - `refresher`: runs a task now and then on a fixed period until stopped
//! - `view`: dashboard state published to observers

pub mod api;
pub mod error;
pub mod fetch;
pub mod refresher;
pub mod session;
pub mod view;

pub use api::ApiClient;
pub use error::{ClientError, SessionError};
pub use fetch::{FallbackReason, LoadingFlag, Snapshot, Source, fetch_with_fallback};
pub use refresher::{PeriodicRefresher, RefreshHandle};
pub use session::{AdminSession, FileSessionStore, MemorySessionStore, SessionContext, SessionStore};
pub use view::{DashboardView, ViewState};
