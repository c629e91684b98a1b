pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod utils {
    pub mod config;
    pub mod env;
    pub mod logging;
}

pub use application::registry::{SessionHandle, SessionRegistry};
pub use domain::params::SessionParams;
pub use domain::pcm::BitDepth;
pub use domain::session::{EncoderSession, SessionState};
pub use error::{FlacStreamError, Result};
