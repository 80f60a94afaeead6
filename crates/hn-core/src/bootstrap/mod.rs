//! Cold-start bootstrap domain: the resolver state machine, its result type
//! and the failure taxonomy.

pub mod failure;
pub mod result;
pub mod state_machine;

pub use failure::BootstrapFailure;
pub use result::AppBootstrapResult;
pub use state_machine::{
    BootstrapAction, BootstrapEvent, BootstrapMachine, BootstrapState, LaunchContext,
};
