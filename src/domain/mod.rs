//! Domain layer: record identity, the records written by the coordinated
//! write, and the write state machine.

pub mod record;
pub mod record_id;
pub mod write_stage;

pub use record::{Message, Pet};
pub use record_id::RecordId;
pub use write_stage::WriteStage;
