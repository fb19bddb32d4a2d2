//! Contract deployed by the provisioner on both sides of a relayed channel.
//!
//! It remembers the last channel it opened, sends packets over it on
//! request, and answers incoming packets through their acknowledgement.
//! Every entry point records what it saw as the "last operation", which
//! tests query to follow the relayer's progress.

pub mod contract;
pub mod ibc;
pub mod msg;
pub mod state;
