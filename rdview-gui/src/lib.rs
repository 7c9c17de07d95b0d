//! # rdview-gui: Remote Desktop Viewer Window
//!
//! Hosts the display loop from `rdview-core` in a native window:
//! winit supplies the window, input events and custom cursors,
//! softbuffer presents the framebuffer, and the loopback session
//! stands in for a protocol client.

pub mod config;
pub mod display;
pub mod keys;
pub mod loopback;
pub mod window;
