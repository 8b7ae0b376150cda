// src/event_bus.rs
//! Outbound notification events.
//!
//! External systems (achievements, toasts) subscribe to named events. The
//! core only publishes; the absence of any subscriber changes nothing.

/// Milestones the core announces to the outside world.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    QuestCompleted { quest_id: String },
    CombatVictory { enemy_name: String },
    LevelUp { level: u32 },
}

pub trait EventSink {
    fn notify(&mut self, event: &GameEvent);
}

#[derive(Default)]
pub struct EventBus {
    sinks: Vec<Box<dyn EventSink>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl EventBus {
    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    pub fn emit(&mut self, event: GameEvent) {
        for sink in &mut self.sinks {
            sink.notify(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder(Rc<RefCell<Vec<GameEvent>>>);

    impl EventSink for Recorder {
        fn notify(&mut self, event: &GameEvent) {
            self.0.borrow_mut().push(event.clone());
        }
    }

    #[test]
    fn events_reach_every_subscriber() {
        let seen_a = Rc::new(RefCell::new(Vec::new()));
        let seen_b = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::default();
        bus.subscribe(Box::new(Recorder(seen_a.clone())));
        bus.subscribe(Box::new(Recorder(seen_b.clone())));

        bus.emit(GameEvent::LevelUp { level: 2 });
        assert_eq!(seen_a.borrow().len(), 1);
        assert_eq!(seen_b.borrow().len(), 1);
    }

    #[test]
    fn emitting_without_subscribers_is_fine() {
        let mut bus = EventBus::default();
        bus.emit(GameEvent::CombatVictory {
            enemy_name: "Goblin".to_string(),
        });
    }
}
