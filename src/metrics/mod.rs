//! Metrics emitted by the auto loader.
//!
//! This crate does not install a recorder or start an exporter: events are
//! recorded against whatever global `metrics` recorder the host process sets up,
//! and are no-ops otherwise.

pub mod events;

/// Emit an internal event.
///
/// This macro calls the `InternalEvent::emit()` method on the given event,
/// which records the corresponding counter.
///
/// # Example
///
/// ```ignore
/// use autoloader::metrics::events::{ReaderConfigured, SchemaResolved, SchemaSource};
///
/// emit!(SchemaResolved { source: SchemaSource::File });
/// ```
#[macro_export]
macro_rules! emit {
    ($event:expr) => {
        $crate::metrics::events::InternalEvent::emit($event)
    };
}
