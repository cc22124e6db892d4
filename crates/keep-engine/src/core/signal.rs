/// FIFO of typed signals owned by a single coordinator. Signals published
/// while routing land in the next drain round of the same tick.
#[derive(Debug, Clone)]
pub struct SignalQueue<S> {
    signals: Vec<S>,
}

impl<S> SignalQueue<S> {
    /// Upper bound on drain rounds per tick; guards against signal ping-pong.
    pub const MAX_ROUNDS: usize = 8;

    pub fn new() -> Self {
        Self {
            signals: Vec::with_capacity(16),
        }
    }

    /// Publish a signal.
    pub fn publish(&mut self, signal: S) {
        self.signals.push(signal);
    }

    /// Publish several signals preserving order.
    pub fn publish_all(&mut self, signals: impl IntoIterator<Item = S>) {
        self.signals.extend(signals);
    }

    /// Take every pending signal, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<S> {
        std::mem::take(&mut self.signals)
    }

    pub fn iter(&self) -> impl Iterator<Item = &S> {
        self.signals.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }
}

impl<S> Default for SignalQueue<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Ping {
        Show(u8),
        Hide(u8),
    }

    #[test]
    fn drain_preserves_publish_order() {
        let mut q = SignalQueue::new();
        q.publish(Ping::Show(1));
        q.publish_all([Ping::Hide(1), Ping::Show(2)]);
        assert_eq!(q.len(), 3);
        assert_eq!(q.drain(), vec![Ping::Show(1), Ping::Hide(1), Ping::Show(2)]);
        assert!(q.is_empty());
    }

    #[test]
    fn late_subscriber_gets_nothing() {
        let mut q: SignalQueue<Ping> = SignalQueue::new();
        q.publish(Ping::Show(3));
        let _ = q.drain();
        assert!(q.drain().is_empty());
    }
}
