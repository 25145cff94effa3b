//! # Shell App
//!
//! The user-management shell built on `shell-framework`: it hosts remote modules, owns the
//! shared user store and answers the requests modules publish on the event bus.
//!
//! - **[model]**: [`User`](model::User) and its create/update payloads.
//! - **[users]**: the mock user backend and the store + action-layer factory.
//! - **[events]**: the bus vocabulary and publishing helpers.
//! - **[i18n]**, **[config]**, **[router]**: translator, remote locations, navigation table.
//! - **[context]**: the bundle handed to every view.
//! - **[lifecycle]**: [`Shell`](lifecycle::Shell) boot, navigation and shutdown.

pub mod config;
pub mod context;
pub mod events;
pub mod i18n;
pub mod lifecycle;
pub mod model;
pub mod router;
pub mod users;
