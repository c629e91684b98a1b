pub mod pcm_pipe;
pub mod registry;

pub use pcm_pipe::{EncodeSummary, pump};
pub use registry::{SessionHandle, SessionRegistry};
