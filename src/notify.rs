use tracing::warn;

/// Synchronous user-facing notice, shown when an action is refused locally.
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

/// Prints notices to stderr so they never mix with table output.
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn alert(&self, message: &str) {
        warn!("{}", message);
        eprintln!("! {}", message);
    }
}
