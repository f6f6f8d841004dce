pub mod completion_controller;
pub mod system_controller;
