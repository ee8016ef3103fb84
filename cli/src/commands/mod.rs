mod helpers;
mod log;
mod setup;
mod snapshot;
mod summary;

pub(crate) use log::{cmd_add, cmd_log, cmd_photo, cmd_remove};
pub(crate) use setup::{cmd_setup, cmd_targets};
pub(crate) use snapshot::{cmd_export, cmd_import, cmd_reset};
pub(crate) use summary::{cmd_day, cmd_history};
