// Fanout: the per-cycle dispatcher and the scheduler that serializes cycles.

pub mod dispatcher;
pub mod scheduler;
