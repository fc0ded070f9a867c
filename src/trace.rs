/// Emits a `tracing` event at trace level when the `tracing` feature is on.
///
/// Only used on error-producing paths; the success path stays event-free.
macro_rules! trace_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        {
            tracing::trace!($($arg)*);
        }
    };
}

pub(crate) use trace_event;
