// UI-facing layer: validation, background runner, tabs, controller

pub mod controller;
pub mod runner;
pub mod tabs;
pub mod validate;

pub use controller::Controller;
pub use runner::{OperationInFlight, TaskRunner, UiUpdate};
pub use tabs::{
    ChannelInfoForm, DownloadForm, FormError, PlaylistInfoForm, StatusKind, StatusLine, TabId,
    TabView, VideoInfoForm,
};
pub use validate::validate_watch_url;
