// Library surface: the game core, its ports and the event runtime.
// Terminal rendering lives in the binary (main.rs / ui.rs).
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod controller;
pub mod layout;
pub mod logging;
pub mod ports;
pub mod runtime;
pub mod time_codec;
pub mod validator;
