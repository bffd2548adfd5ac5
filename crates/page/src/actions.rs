use std::time::Duration;

use voltbill_dom::{Document, NodeId, Scheduler};
use voltbill_settings::{LanguageCode, TextCatalog};
use voltbill_widgets::WidgetTask;

/// Delay before a pulsed usage card returns to its normal size.
pub const CARD_PULSE_RESET: Duration = Duration::from_millis(200);

const ACTION_KEY_PREFIX: &str = "action.";

/// 將操作按鈕文字對應到提示訊息。 / Maps an action button's label to the message it shows.
///
/// The label is matched against the catalog text for `language`; the button
/// key found that way selects an `action.<key>` message. Unknown labels are
/// echoed back unchanged.
pub fn action_message(catalog: &TextCatalog, language: LanguageCode, label: &str) -> String {
    let label = label.trim();
    catalog
        .key_for_text(language, label)
        .and_then(|key| catalog.text(language, &format!("{ACTION_KEY_PREFIX}{key}")))
        .unwrap_or(label)
        .to_string()
}

/// Briefly enlarges a usage card, restoring it after [`CARD_PULSE_RESET`].
pub fn pulse_card(doc: &mut Document, scheduler: &mut Scheduler<WidgetTask>, card: NodeId) {
    let next = if doc.style(card, "transform") == Some("scale(1.02)") {
        "scale(1)"
    } else {
        "scale(1.02)"
    };
    doc.set_style(card, "transform", next);
    scheduler.schedule(
        CARD_PULSE_RESET,
        WidgetTask::Restyle {
            node: card,
            property: "transform",
            value: "scale(1)",
        },
    );
}
