//! Transient notices and table helpers that operate on a [`voltbill_dom::Document`].
//!
//! Every widget follows the same shape: `show` inserts a node and returns a
//! [`NoticeHandle`], timers are queued on a [`voltbill_dom::Scheduler`] as
//! [`WidgetTask`] values, and dismissal is idempotent.

pub mod dialog;
pub mod format;
pub mod notice;
pub mod notification;
pub mod spinner;
pub mod table;
pub mod timing;
pub mod toast;

pub use dialog::{ConfirmDialog, DialogOutcome, DialogTarget};
pub use format::{format_currency, format_date, format_number, DEFAULT_CURRENCY};
pub use notice::{dismiss, run_due, run_task, Dismissal, NoticeHandle, NoticeKind, WidgetTask};
pub use notification::{hide_notification, show_notification, NotificationKind, NotificationTimings};
pub use spinner::{hide_loading, show_loading};
pub use table::{SearchSummary, SortDirection, SortOutcome, TableError, TableSearch, TableSort};
pub use timing::{Debouncer, Throttle};
pub use toast::{show_toast, DEFAULT_TOAST_DURATION};
