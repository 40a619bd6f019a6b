//! Incremental synchronization of the remote campsite catalog.
//!
//! The orchestrator in [`service`] drives the batch loop; [`pager`] computes
//! the remote page window for a logical record range; [`reconciler`] performs
//! the per-record create-or-update against the store ports declared in
//! [`ports`].

pub mod pager;
pub mod ports;
pub mod reconciler;
pub mod service;
