//! Gateway balance reconciliation.

mod snapshot;
mod tracker;

pub use snapshot::{signed_delta, BalanceSnapshot, BalanceUpdate, SnapshotStore};
pub use tracker::{resolve_gateways, BalanceDeltaTracker, GatewayAddress};
