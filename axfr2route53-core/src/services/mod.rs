//! 业务逻辑服务层

mod sync_service;

pub use sync_service::{SyncReport, SyncService};
