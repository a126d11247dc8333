pub mod state;
pub mod session;
pub mod interests;
pub mod window;
pub mod cortex;
pub mod advisor;
pub mod r#loop;
