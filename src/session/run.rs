use crate::error::SessionError;
use crate::session::main::{Flow, Session};

impl Session {
    /// Blocks handling commands until `Command::Shutdown`. A failing command
    /// is logged and the loop carries on.
    pub fn run(&mut self) -> Result<(), SessionError> {
        let _ = self.logger.info("Waiting for commands");

        loop {
            let command = match self.command_receiver.recv() {
                Ok(command) => command,
                Err(_) => break,
            };

            match self.handle_command(command) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Stop) => break,
                Err(error) => {
                    let _ = self.logger.warn(&error.to_string());
                }
            }
        }

        let _ = self.logger.info(&format!(
            "Stopped in state {} with {} numeric buffers in memory",
            self.state,
            self.memory.live()
        ));
        Ok(())
    }
}
