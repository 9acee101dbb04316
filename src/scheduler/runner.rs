use std::thread::{self, JoinHandle};

use log::warn;

use super::Scheduler;
use crate::command::CommandSender;
use crate::error::{Error, Result};
use crate::output::OutputDevice;

const THREAD_NAME: &str = "light-scheduler";

/// Scheduler running on its own thread
///
/// Stopping is cooperative: the loop notices the cancellation at the top
/// of its next iteration or while waiting, so a frame is never abandoned
/// halfway. Dropping the handle stops the thread too.
pub struct SchedulerThread {
    commands: CommandSender,
    handle: Option<JoinHandle<Result<()>>>,
}

impl SchedulerThread {
    pub fn spawn<O: OutputDevice + 'static>(mut scheduler: Scheduler<O>) -> Result<Self> {
        let commands = scheduler.command_sender();
        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || scheduler.run())?;
        Ok(Self {
            commands,
            handle: Some(handle),
        })
    }

    /// Handle for sending commands to the running scheduler
    pub fn commands(&self) -> &CommandSender {
        &self.commands
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Cancel the loop and wait for the thread to exit
    ///
    /// Returns the error that ended the loop early, if any.
    pub fn stop(mut self) -> Result<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<()> {
        self.commands.cancel();
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| Error::device_unavailable("scheduler thread panicked"))?,
            None => Ok(()),
        }
    }
}

impl Drop for SchedulerThread {
    fn drop(&mut self) {
        if let Err(err) = self.shutdown() {
            warn!("scheduler ended with an error: {err}");
        }
    }
}
