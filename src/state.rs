use crate::counter::CounterState;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub counter: Arc<Mutex<CounterState>>,
}

impl AppState {
    pub fn new(counter: CounterState) -> Self {
        Self {
            counter: Arc::new(Mutex::new(counter)),
        }
    }
}
