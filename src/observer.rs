use crate::state::SessionSnapshot;

/// Receives a fresh snapshot after every observable state change.
///
/// Callbacks run on whichever thread performed the transition, including
/// the background synthesis thread, so implementations must be cheap and
/// must not call [`crate::Session::subscribe`] from inside the callback.
pub trait SessionObserver: Send + Sync {
    fn state_changed(&self, snapshot: &SessionSnapshot);
}

impl<F> SessionObserver for F
where
    F: Fn(&SessionSnapshot) + Send + Sync,
{
    fn state_changed(&self, snapshot: &SessionSnapshot) {
        self(snapshot)
    }
}
