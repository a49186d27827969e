pub mod config;
pub mod logging;

pub mod control;
pub mod etag;
pub mod location;
pub mod progress;
pub mod remote;
pub mod verify;
