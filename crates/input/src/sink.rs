use crate::event::InputEvent;

/// Anything that accepts input events in arrival order.
///
/// The desktop loop forwards translated window events here; tests and the
/// headless CLI push scripted events instead.
pub trait InputSink {
    fn push_event(&mut self, event: InputEvent);

    fn push_events<I>(&mut self, events: I)
    where
        I: IntoIterator<Item = InputEvent>,
        Self: Sized,
    {
        for event in events {
            self.push_event(event);
        }
    }
}

/// Records events verbatim.
impl InputSink for Vec<InputEvent> {
    fn push_event(&mut self, event: InputEvent) {
        self.push(event);
    }
}
