use crate::library::scheduler::interface::Tick;

/// Requests fed to a running session through its command channel.
#[derive(Debug, Clone)]
pub enum Command {
    ToggleGather { class_id: usize },
    Train,
    Save { name: String },
    Reset,
    Tick(Tick),
    Shutdown,
}
