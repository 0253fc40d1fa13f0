//! Delivery collaborators for the a11yfix workflow: source snapshot
//! packaging, the object-storage side (ensure a snapshot exists, return
//! its handle), and the work-order queue.

mod error;
mod queue;
mod snapshot;
mod store;

pub use error::DispatchError;
pub use queue::WorkQueue;
pub use snapshot::{create_archive, SNAPSHOT_PREFIX};
pub use store::{ensure_snapshot, SnapshotPolicy, SnapshotStore};

/// Loads the shared AWS SDK configuration for the given region.
///
/// Credentials come from the SDK's default provider chain (env vars,
/// profiles, SSO, instance metadata); missing credentials surface as a
/// [`DispatchError`] on first use rather than up front.
pub async fn load_sdk_config(region: &str) -> aws_config::SdkConfig {
    aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_owned()))
        .load()
        .await
}
