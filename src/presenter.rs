//! Presentation side of the status page.
//!
//! [`StatusPresenter`] maps a [`PresentationState`] onto three UI elements
//! (status text, version text, retry control) through an [`ElementSink`].
//! The poller only sees the [`StatusView`] capability, so tests can swap the
//! whole presenter for a recorder.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

/// Visual category of a status message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatusKind {
    Info,
    Success,
    Running,
    Error,
    Warning,
}

impl StatusKind {
    pub const ALL: [StatusKind; 5] = [
        StatusKind::Info,
        StatusKind::Success,
        StatusKind::Running,
        StatusKind::Error,
        StatusKind::Warning,
    ];

    /// Looks up a kind by its wire name. Unknown names have no kind.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusKind::Info => "info",
            StatusKind::Success => "success",
            StatusKind::Running => "running",
            StatusKind::Error => "error",
            StatusKind::Warning => "warning",
        }
    }

    /// Style class applied to the target element.
    pub fn css_class(self) -> &'static str {
        match self {
            StatusKind::Info => "status-info",
            StatusKind::Success => "status-success",
            StatusKind::Running => "status-running",
            StatusKind::Error => "status-error",
            StatusKind::Warning => "status-warning",
        }
    }
}

/// Renders `"Retrying (attempt N) in X.Xs..."`.
///
/// Tenths are rounded half up, so 250 ms reads "0.3s".
pub fn format_retry_message(attempt: u32, delay: Duration) -> String {
    let tenths = (delay.as_millis() + 50) / 100;
    format!(
        "Retrying (attempt {attempt}) in {}.{}s...",
        tenths / 10,
        tenths % 10
    )
}

/// What the status page currently shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PresentationState {
    Loading,
    /// A retry is pending; carries the formatted retry message.
    Warning(String),
    /// Carries the status string reported by the device.
    Success(String),
    Error,
}

/// Render capability the poller depends on.
pub trait StatusView {
    fn render(&self, state: &PresentationState);
    fn set_version(&self, version: &str);
}

/// Minimal DOM-like surface: elements addressed by an opaque id.
///
/// Writes to ids that do not exist are ignored.
pub trait ElementSink {
    fn set_text(&self, id: &str, text: &str);
    fn add_class(&self, id: &str, class: &str);
    fn remove_class(&self, id: &str, class: &str);
    fn set_hidden(&self, id: &str, hidden: bool);
}

/// Ids of the elements the presenter writes to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementIds {
    pub status: String,
    pub version: String,
    pub retry: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            status: "status".to_owned(),
            version: "version".to_owned(),
            retry: "retry-button".to_owned(),
        }
    }
}

/// Maps presentation states onto an [`ElementSink`].
#[derive(Debug)]
pub struct StatusPresenter<S> {
    sink: S,
    ids: ElementIds,
}

impl<S: ElementSink> StatusPresenter<S> {
    pub fn new(sink: S) -> Self {
        Self::with_ids(sink, ElementIds::default())
    }

    pub fn with_ids(sink: S, ids: ElementIds) -> Self {
        Self { sink, ids }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn ids(&self) -> &ElementIds {
        &self.ids
    }

    /// Shows `message` on `target_id` styled as `kind`.
    ///
    /// Every recognised status class is removed first, so at most one is
    /// active afterwards. An unrecognised `kind` leaves the text unstyled.
    pub fn present(&self, target_id: &str, message: &str, kind: &str) {
        for known in StatusKind::ALL {
            self.sink.remove_class(target_id, known.css_class());
        }
        if let Some(kind) = StatusKind::parse(kind) {
            self.sink.add_class(target_id, kind.css_class());
        }
        self.sink.set_text(target_id, message);
    }
}

impl<S: ElementSink> StatusView for StatusPresenter<S> {
    fn render(&self, state: &PresentationState) {
        let status_id = self.ids.status.as_str();
        match state {
            PresentationState::Loading => {
                self.present(status_id, "Loading...", StatusKind::Info.as_str());
                self.sink.set_hidden(&self.ids.retry, true);
            }
            PresentationState::Warning(message) => {
                self.present(status_id, message, StatusKind::Warning.as_str());
            }
            // the device's status string doubles as the kind selector
            PresentationState::Success(status) => {
                self.present(status_id, status, status);
                self.sink.set_hidden(&self.ids.retry, true);
            }
            PresentationState::Error => {
                self.present(status_id, "Error", StatusKind::Error.as_str());
                self.sink.set_hidden(&self.ids.retry, false);
            }
        }
    }

    fn set_version(&self, version: &str) {
        self.sink.set_text(&self.ids.version, version);
    }
}

/// Snapshot of one element held by [`MemoryElements`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementState {
    pub text: String,
    pub classes: BTreeSet<String>,
    pub hidden: bool,
}

/// In-memory [`ElementSink`] for headless use and tests.
///
/// Unlike a real document, elements spring into existence on first write.
#[derive(Debug, Default)]
pub struct MemoryElements {
    elements: RefCell<BTreeMap<String, ElementState>>,
}

impl MemoryElements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(&self, id: &str) -> Option<ElementState> {
        self.elements.borrow().get(id).cloned()
    }

    pub fn text(&self, id: &str) -> Option<String> {
        self.element(id).map(|element| element.text)
    }

    pub fn classes(&self, id: &str) -> Vec<String> {
        self.element(id)
            .map(|element| element.classes.into_iter().collect())
            .unwrap_or_default()
    }

    pub fn is_hidden(&self, id: &str) -> bool {
        self.element(id).is_some_and(|element| element.hidden)
    }

    fn with_element(&self, id: &str, update: impl FnOnce(&mut ElementState)) {
        let mut elements = self.elements.borrow_mut();
        update(elements.entry(id.to_owned()).or_default());
    }
}

impl ElementSink for MemoryElements {
    fn set_text(&self, id: &str, text: &str) {
        self.with_element(id, |element| element.text = text.to_owned());
    }

    fn add_class(&self, id: &str, class: &str) {
        self.with_element(id, |element| {
            element.classes.insert(class.to_owned());
        });
    }

    fn remove_class(&self, id: &str, class: &str) {
        self.with_element(id, |element| {
            element.classes.remove(class);
        });
    }

    fn set_hidden(&self, id: &str, hidden: bool) {
        self.with_element(id, |element| element.hidden = hidden);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn presenter() -> StatusPresenter<MemoryElements> {
        StatusPresenter::new(MemoryElements::new())
    }

    #[test]
    fn retry_message_uses_one_decimal_second() {
        assert_eq!(
            format_retry_message(2, Duration::from_millis(4_000)),
            "Retrying (attempt 2) in 4.0s..."
        );
        assert_eq!(
            format_retry_message(1, Duration::from_millis(1_500)),
            "Retrying (attempt 1) in 1.5s..."
        );
    }

    #[test]
    fn retry_message_rounds_ties_up() {
        assert_eq!(
            format_retry_message(1, Duration::from_millis(250)),
            "Retrying (attempt 1) in 0.3s..."
        );
        assert_eq!(
            format_retry_message(2, Duration::from_millis(1_250)),
            "Retrying (attempt 2) in 1.3s..."
        );
        assert_eq!(
            format_retry_message(3, Duration::from_millis(2_249)),
            "Retrying (attempt 3) in 2.2s..."
        );
        assert_eq!(
            format_retry_message(4, Duration::from_millis(30_000)),
            "Retrying (attempt 4) in 30.0s..."
        );
    }

    #[test]
    fn kinds_round_trip_through_wire_names() {
        for kind in StatusKind::ALL {
            assert_eq!(StatusKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(StatusKind::parse("Running"), None);
        assert_eq!(StatusKind::parse("stopped"), None);
    }

    #[test]
    fn new_kind_replaces_previous_class() {
        let presenter = presenter();
        presenter.present("status", "running", "running");
        presenter.present("status", "broken", "error");

        assert_eq!(presenter.sink().classes("status"), vec!["status-error"]);
        assert_eq!(presenter.sink().text("status").as_deref(), Some("broken"));
    }

    #[test]
    fn unknown_kind_shows_text_without_class() {
        let presenter = presenter();
        presenter.present("status", "warming up", "warning");
        presenter.present("status", "idle", "idle");

        assert!(presenter.sink().classes("status").is_empty());
        assert_eq!(presenter.sink().text("status").as_deref(), Some("idle"));
    }

    #[test]
    fn unrelated_classes_survive_present() {
        let presenter = presenter();
        presenter.sink().add_class("status", "card");
        presenter.present("status", "ok", "success");

        assert_eq!(
            presenter.sink().classes("status"),
            vec!["card", "status-success"]
        );
    }

    #[test]
    fn error_state_reveals_retry_control_and_loading_hides_it() {
        let presenter = presenter();

        presenter.render(&PresentationState::Error);
        assert_eq!(presenter.sink().text("status").as_deref(), Some("Error"));
        assert!(!presenter.sink().is_hidden("retry-button"));

        presenter.render(&PresentationState::Loading);
        assert_eq!(
            presenter.sink().text("status").as_deref(),
            Some("Loading...")
        );
        assert_eq!(presenter.sink().classes("status"), vec!["status-info"]);
        assert!(presenter.sink().is_hidden("retry-button"));
    }

    #[test]
    fn success_uses_status_as_kind() {
        let presenter = presenter();
        presenter.render(&PresentationState::Success("running".to_owned()));
        presenter.set_version("1.2.3");

        assert_eq!(presenter.sink().classes("status"), vec!["status-running"]);
        assert_eq!(presenter.sink().text("version").as_deref(), Some("1.2.3"));
    }

    #[test]
    fn custom_ids_are_honoured() {
        let ids = ElementIds {
            status: "device-status".to_owned(),
            version: "fw".to_owned(),
            retry: "again".to_owned(),
        };
        let presenter = StatusPresenter::with_ids(MemoryElements::new(), ids);
        presenter.render(&PresentationState::Warning("Retrying".to_owned()));
        presenter.set_version("N/A");

        assert_eq!(
            presenter.sink().classes("device-status"),
            vec!["status-warning"]
        );
        assert_eq!(presenter.sink().text("fw").as_deref(), Some("N/A"));
        assert!(presenter.sink().element("status").is_none());
    }
}
