// Data models and small numeric helpers shared by the engine and its consumers
// (dashboard detail view, compact badge, notifier).

pub mod models;
pub mod utils;
