use tracing::warn;

use crate::actions::{self, Action};
use crate::cache::Cache;
use crate::effects::{self, Effect};
use crate::store::Store;

pub struct State {
    pub store: Store,
    pub cache: Cache,
    action_queue: Vec<Action>,
    effect_queue: Vec<Effect>,
}

impl State {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            cache: Cache::new(),
            action_queue: Vec::new(),
            effect_queue: Vec::new(),
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        self.action_queue.push(action);
    }

    pub fn dispatch_all(&mut self, actions: impl IntoIterator<Item = Action>) {
        self.action_queue.extend(actions);
    }

    pub fn flush_actions(&mut self) {
        let actions = std::mem::take(&mut self.action_queue);
        for action in actions {
            let mut effects = actions::update(&mut self.store, action);
            self.effect_queue.append(&mut effects);
        }
    }

    /// Effects may queue follow-up actions; those run on the next flush.
    pub fn flush_effects(&mut self) {
        let effects = std::mem::take(&mut self.effect_queue);
        for effect in effects {
            let follow_up = effects::run(&mut self.store, effect);
            self.action_queue.extend(follow_up);
        }
    }

    /// Turn a finished AI reply into an action.
    pub fn poll_ai(&mut self) {
        let Some(reply) = self.store.ai.poll() else {
            return;
        };
        match reply.result {
            Ok(graph) => self.dispatch(Action::ApplyAiImport {
                key: reply.key,
                text: reply.text,
                graph,
            }),
            Err(e) => {
                warn!(error = %e, "AI concept map import failed");
                self.dispatch(actions::import_failed(e.to_string()));
            }
        }
    }

    /// One full dispatch round.
    pub fn flush(&mut self) {
        self.flush_actions();
        self.flush_effects();
        self.flush_actions();
    }
}
