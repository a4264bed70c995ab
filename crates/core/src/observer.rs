/// Receives tracker events and decides whether to intervene.
///
/// Observers let callers monitor or steer a tracker without changing its
/// per-cycle API: logging, recording a trace for later plotting, or forcing a
/// fresh exploration when an external sensor disagrees with the tracker.
///
/// The `observe` method returns `Option<A>`, where `Some(action)` requests a
/// tracker-specific action and `None` lets the tracker continue unchanged.
///
/// Closures automatically implement `Observer`, and a built-in impl for `()`
/// provides a no-op observer that always returns `None`.
pub trait Observer<E, A> {
    /// Observes a tracker event and optionally returns a control action.
    fn observe(&mut self, event: &E) -> Option<A>;
}

impl<E, A, F> Observer<E, A> for F
where
    F: FnMut(&E) -> Option<A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}

impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _event: &E) -> Option<A> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Ping {
        Stop,
    }

    fn drive<O: Observer<u32, Ping>>(observer: &mut O, events: &[u32]) -> Option<usize> {
        events
            .iter()
            .position(|event| observer.observe(event) == Some(Ping::Stop))
    }

    #[test]
    fn unit_observer_never_acts() {
        assert_eq!(drive(&mut (), &[1, 2, 3]), None);
    }

    #[test]
    fn closure_observer_can_act() {
        let mut seen = 0;
        let mut observer = |event: &u32| {
            seen += 1;
            (*event == 2).then_some(Ping::Stop)
        };
        assert_eq!(drive(&mut observer, &[1, 2, 3]), Some(1));
        assert_eq!(seen, 2);
    }
}
