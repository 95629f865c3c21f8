//! Core reactive primitives for SO-Grid.
//!
//! This crate provides the small set of building blocks the grid layers share:
//!
//! - **Signals**: an ordered observer list with per-listener panic isolation
//! - **Updaters**: the "literal value or function of the old value" update pattern
//! - **Logging**: tracing target names used across the workspace
//!
//! # Signal Example
//!
//! ```
//! use sogrid_core::Signal;
//!
//! let changed = Signal::<()>::new();
//! let subscription = changed.subscribe(|_| println!("state changed"));
//!
//! changed.emit(());
//! subscription.unsubscribe();
//! ```
//!
//! # Updater Example
//!
//! ```
//! use sogrid_core::Updater;
//!
//! let set: Updater<u32> = 5.into();
//! assert_eq!(set.apply(&1), 5);
//!
//! let bump = Updater::with(|old: &u32| old + 1);
//! assert_eq!(bump.apply(&1), 2);
//! ```

pub mod logging;
pub mod signal;
mod updater;

pub use signal::{ConnectionGuard, ConnectionId, Signal, Subscription};
pub use updater::Updater;
