//! Bilingual page behaviour on top of [`voltbill_dom`].
//!
//! [`BindingRegistry`] records every translatable element once,
//! [`TextApplicator`] writes the active language into those bindings, and
//! [`LanguageSwitcher`] ties both to a persisted [`voltbill_settings::LanguagePreference`].
//! The remaining modules cover the page chrome the bill and dashboard pages
//! share, and [`BillPage`] wires everything together.

pub mod actions;
pub mod applicator;
pub mod bindings;
pub mod navigation;
pub mod page;
pub mod share;
pub mod status;
pub mod switcher;

pub use actions::{action_message, pulse_card, CARD_PULSE_RESET};
pub use applicator::{ApplyReport, MissingText, TextApplicator};
pub use bindings::{Binding, BindingRegistry, BindingSource, BindingTarget, IncompleteBinding, ScanReport};
pub use navigation::{set_active_navigation, update_user_info, MobileMenu, DEFAULT_PAGE};
pub use page::{BillPage, PageEnvironment, PageError, StatusTask};
pub use share::{share, NoShare, ShareCapabilities, ShareFailure, ShareOutcome, ShareRequest};
pub use status::{simulated_battery_level, update_battery, update_clock, BATTERY_LOW, BATTERY_OK};
pub use switcher::{LanguageSwitcher, SwitchOutcome};
