use super::HostSignal;

/// Implemented by anything that consumes host lifecycle signals.
///
/// Dispatch takes `&self`: implementations use interior locking, so one
/// handler can be shared between the host's tick thread and its event
/// thread.
pub trait SignalHandler {
    fn handle_signal(&self, signal: &HostSignal);
}
