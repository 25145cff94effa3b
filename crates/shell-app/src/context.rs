//! The bundle every view is handed on activation.

use crate::events::{EventHelpers, ShellBus};
use crate::i18n::Translator;
use crate::model::User;
use crate::users::UserActions;
use shell_framework::StoreClient;
use std::sync::Arc;

/// Shared services, built once at boot and cloned into every activated view.
///
/// Holding a context keeps the user store alive: drop it before
/// [`Shell::shutdown`](crate::lifecycle::Shell::shutdown).
#[derive(Clone)]
pub struct ShellContext {
    pub store: StoreClient<User>,
    pub actions: UserActions,
    pub bus: ShellBus,
    pub helpers: EventHelpers,
    pub i18n: Arc<Translator>,
}
