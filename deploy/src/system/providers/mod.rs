//! Operating system specific providers

#[cfg(target_os = "linux")]
pub mod linux;
