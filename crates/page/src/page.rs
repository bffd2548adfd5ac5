//! Bill page bootstrap: everything the page does between load and teardown.

use std::time::Duration;

use chrono::NaiveTime;
use thiserror::Error;
use tracing::{debug, info};
use voltbill_dom::{Document, DomError, NodeId, Scheduler};
use voltbill_settings::{
    KeyValueStorage, LanguageChanged, LanguageCode, LanguagePreference, MemoryStorage, PageConfig,
    PreferencesError, SubscriptionId, TextCatalog,
};
use voltbill_widgets::{
    hide_loading, run_due, show_loading, show_notification, show_toast, ConfirmDialog, Dismissal,
    NoticeHandle, NotificationKind, NotificationTimings, WidgetTask,
};

use crate::actions::{action_message, pulse_card};
use crate::applicator::ApplyReport;
use crate::navigation::{set_active_navigation, update_user_info, MobileMenu};
use crate::share::{share, ShareCapabilities, ShareOutcome};
use crate::status::{simulated_battery_level, update_battery, update_clock};
use crate::switcher::{LanguageSwitcher, SwitchOutcome};

#[derive(Debug, Error)]
pub enum PageError {
    #[error("failed to load page markup: {0}")]
    Markup(#[from] DomError),
    #[error(transparent)]
    Preference(#[from] PreferencesError),
}

/// Periodic status bar refreshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTask {
    Clock,
    Battery,
}

/// 頁面所處的環境。 / Facts about the host the page is opened in.
#[derive(Debug, Clone)]
pub struct PageEnvironment {
    /// Location path, used to pick the active navigation link.
    pub path: String,
    pub viewport_width: u32,
    /// Wall-clock time when the page opened; the status clock counts on from here.
    pub started_at: NaiveTime,
    /// Session-scoped storage holding the signed-in username.
    pub session: MemoryStorage,
    /// Seed for the simulated battery level; random when `None`.
    pub seed: Option<u64>,
}

impl Default for PageEnvironment {
    fn default() -> Self {
        Self {
            path: "/index.html".to_string(),
            viewport_width: 1280,
            started_at: NaiveTime::MIN,
            session: MemoryStorage::new(),
            seed: None,
        }
    }
}

/// 帳單頁面。 / A loaded bill page with its language switcher, widgets and timers.
#[derive(Debug)]
pub struct BillPage<S: KeyValueStorage> {
    doc: Document,
    switcher: LanguageSwitcher<S>,
    config: PageConfig,
    widgets: Scheduler<WidgetTask>,
    status: Scheduler<StatusTask>,
    menu: MobileMenu,
    rng: fastrand::Rng,
    started_at: NaiveTime,
    initial: ApplyReport,
}

impl<S: KeyValueStorage> BillPage<S> {
    /// Loads the preference, applies it, wires the chrome and starts the status timers.
    pub fn open(
        markup: &str,
        storage: S,
        catalog: TextCatalog,
        mut config: PageConfig,
        env: PageEnvironment,
    ) -> Result<Self, PageError> {
        config.sanitize();
        let mut doc = Document::parse(markup)?;

        let preference = if config.force_default_language {
            LanguagePreference::forced(storage, config.language_key.clone(), config.default_language)?
        } else {
            LanguagePreference::load(storage, config.language_key.clone(), config.default_language)
        };

        set_active_navigation(&mut doc, &env.path);
        let menu = MobileMenu::install(&mut doc, env.viewport_width, config.mobile_breakpoint_px);
        update_user_info(&mut doc, &env.session);

        let (switcher, initial) = LanguageSwitcher::init(&mut doc, preference, catalog);

        let mut rng = match env.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        update_battery(&mut doc, simulated_battery_level(&mut rng));
        update_clock(&mut doc, env.started_at);

        let mut status = Scheduler::new();
        status.schedule_repeating(config.clock_interval(), StatusTask::Clock);
        status.schedule_repeating(config.battery_interval(), StatusTask::Battery);

        info!(
            language = %switcher.current(),
            bindings = switcher.registry().len(),
            "bill page opened"
        );
        Ok(Self {
            doc,
            switcher,
            config,
            widgets: Scheduler::new(),
            status,
            menu,
            rng,
            started_at: env.started_at,
            initial,
        })
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn language(&self) -> LanguageCode {
        self.switcher.current()
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn switcher(&self) -> &LanguageSwitcher<S> {
        &self.switcher
    }

    /// What the initial application changed.
    pub fn initial_report(&self) -> &ApplyReport {
        &self.initial
    }

    pub fn elapsed(&self) -> Duration {
        self.status.now()
    }

    /// 目前的模擬時間。 / The page's wall-clock time.
    pub fn now(&self) -> NaiveTime {
        let elapsed = chrono::Duration::from_std(self.elapsed()).unwrap_or_else(|_| chrono::Duration::zero());
        self.started_at.overflowing_add_signed(elapsed).0
    }

    /// Applies the current language again; a no-op unless the document drifted.
    pub fn reapply(&mut self) -> ApplyReport {
        self.switcher.apply(&mut self.doc)
    }

    pub fn switch_language(&mut self, raw: &str) -> Result<SwitchOutcome, PreferencesError> {
        self.switcher.switch(&mut self.doc, raw)
    }

    pub fn toggle_language(&mut self) -> Result<SwitchOutcome, PreferencesError> {
        self.switcher.toggle(&mut self.doc)
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&LanguageChanged) + 'static,
    {
        self.switcher.subscribe(listener)
    }

    /// 推進虛擬時間並執行到期的工作。 / Advances the page clock and runs whatever came due.
    pub fn tick(&mut self, elapsed: Duration) {
        let target = self.status.now() + elapsed;
        while let Some(task) = self.status.pop_due(target) {
            match task {
                StatusTask::Clock => {
                    let now = self.now();
                    update_clock(&mut self.doc, now);
                }
                StatusTask::Battery => {
                    let level = simulated_battery_level(&mut self.rng);
                    update_battery(&mut self.doc, level);
                }
            }
        }
        self.status.settle(target);
        let ran = run_due(&mut self.doc, &mut self.widgets, elapsed);
        if ran > 0 {
            debug!(tasks = ran, "ran widget tasks");
        }
    }

    fn text(&self, key: &str) -> String {
        self.switcher
            .catalog()
            .text(self.language(), key)
            .unwrap_or(key)
            .to_string()
    }

    pub fn toast(&mut self, message: &str) -> NoticeHandle {
        show_toast(&mut self.doc, &mut self.widgets, message, self.config.toast_duration())
    }

    pub fn notify(&mut self, message: &str, kind: NotificationKind) -> NoticeHandle {
        let timings = NotificationTimings::from(&self.config);
        show_notification(&mut self.doc, &mut self.widgets, message, kind, timings)
    }

    pub fn confirm<F>(&mut self, message: &str, continuation: F) -> ConfirmDialog
    where
        F: FnOnce(bool) + 'static,
    {
        let language = self.language();
        ConfirmDialog::open(
            &mut self.doc,
            language,
            self.switcher.catalog(),
            message,
            continuation,
        )
    }

    pub fn show_loading(&mut self, host: NodeId) -> NoticeHandle {
        let language = self.language();
        show_loading(&mut self.doc, host, language, self.switcher.catalog())
    }

    pub fn hide_loading(&mut self, host: NodeId) -> Dismissal {
        hide_loading(&mut self.doc, host)
    }

    pub fn click_date_selector(&mut self) -> NoticeHandle {
        let message = self.text("toast.date-selector");
        self.toast(&message)
    }

    pub fn click_switch_account(&mut self) -> NoticeHandle {
        let message = self.text("toast.switch-account");
        self.toast(&message)
    }

    /// An `.action-btn` click: the button's label picks the message.
    pub fn click_action(&mut self, button: NodeId) -> NoticeHandle {
        let label = self.doc.text_content(button);
        let message = action_message(self.switcher.catalog(), self.language(), &label);
        self.toast(&message)
    }

    pub fn click_usage_card(&mut self, card: NodeId) {
        pulse_card(&mut self.doc, &mut self.widgets, card);
    }

    pub fn share<C: ShareCapabilities + ?Sized>(&mut self, capabilities: &mut C, url: &str) -> ShareOutcome {
        let language = self.language();
        share(
            &mut self.doc,
            &mut self.widgets,
            capabilities,
            self.switcher.catalog(),
            language,
            url,
            self.config.toast_duration(),
        )
    }

    pub fn toggle_mobile_menu(&mut self) -> bool {
        self.menu.toggle(&mut self.doc)
    }

    pub fn resize(&mut self, width: u32) -> bool {
        self.menu.on_resize(&mut self.doc, width)
    }

    pub fn to_markup(&self) -> Result<String, DomError> {
        self.doc.to_markup()
    }

    pub fn into_preference(self) -> LanguagePreference<S> {
        self.switcher.into_preference()
    }
}
