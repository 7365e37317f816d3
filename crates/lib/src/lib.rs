//! Ringback core library: config, outreach flow, telephony provider client, and the
//! webhook gateway used by the CLI.

pub mod config;
pub mod gateway;
pub mod init;
pub mod outreach;
pub mod provider;
