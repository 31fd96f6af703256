mod comment_pane;
mod confirm_pane;
mod custom_tweak_pane;
mod log_pane;
mod path_pane;
mod tweak_edit_pane;
mod tweak_list_pane;

pub use comment_pane::CommentPane;
pub use confirm_pane::{ConfirmPane, PendingAction};
pub use custom_tweak_pane::CustomTweakPane;
pub use log_pane::LogPane;
pub use path_pane::{PathPane, PathPurpose};
pub use tweak_edit_pane::TweakEditPane;
pub use tweak_list_pane::TweakListPane;
