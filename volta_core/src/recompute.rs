//! # Recompute Controller
//!
//! Keeps a panel's published totals consistent with its inputs.
//!
//! ```text
//!          edit                 process()
//! Idle ───────────▶ Dirty ─────────────────▶ Recomputed ──▶ Idle
//!                     ▲                            │
//!                     └──────── next edit ◀────────┘
//! ```
//!
//! A pass runs Material → Labor → Summary in one synchronous call, stores
//! the result on the panel and then notifies observers:
//!
//! - [`EstimateObserver::on_totals_changed`] after every pass
//! - [`EstimateObserver::on_content_flag_changed`] only when a
//!   manufacturer's "has content" flag flips
//!
//! A pass never fails. Row-level parse faults end up in
//! [`MaterialTotals::skipped_rows`].

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};
use uuid::Uuid;

use crate::calculations::{compute_panel_totals, LaborTotals, MaterialTotals, PanelTotals, SummaryTotals};
use crate::config::EstimatorConfig;
use crate::materials::{Manufacturer, MANUFACTURER_COUNT};
use crate::panel::Panel;

/// Where a panel is in the edit/recompute cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelState {
    /// Published totals match the inputs
    #[default]
    Idle,
    /// An input changed since the last pass
    Dirty,
    /// Totals stored, observers being notified
    Recomputed,
}

/// Presentation hook notified by the controller.
///
/// Implementations must not block; they run inside the recompute pass.
pub trait EstimateObserver: Send + Sync {
    /// New totals were published for a panel
    fn on_totals_changed(
        &self,
        panel_id: Uuid,
        materials: &MaterialTotals,
        labor: &LaborTotals,
        summary: &SummaryTotals,
    );

    /// A manufacturer table of a panel gained or lost its last active row
    fn on_content_flag_changed(&self, panel_id: Uuid, manufacturer: Manufacturer, has_content: bool);
}

/// Notification as a value, for logs and tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EstimateEvent {
    TotalsChanged {
        panel_id: Uuid,
        totals: PanelTotals,
    },
    ContentFlagChanged {
        panel_id: Uuid,
        manufacturer: Manufacturer,
        has_content: bool,
    },
}

/// Observer that records every notification.
///
/// Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<EstimateEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the recorded events
    pub fn events(&self) -> Vec<EstimateEvent> {
        self.lock().clone()
    }

    /// Drain the recorded events
    pub fn take(&self) -> Vec<EstimateEvent> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<EstimateEvent>> {
        // Poisoned: keep what was recorded so far
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn push(&self, event: EstimateEvent) {
        self.lock().push(event);
    }
}

impl EstimateObserver for EventLog {
    fn on_totals_changed(
        &self,
        panel_id: Uuid,
        materials: &MaterialTotals,
        labor: &LaborTotals,
        summary: &SummaryTotals,
    ) {
        self.push(EstimateEvent::TotalsChanged {
            panel_id,
            totals: PanelTotals {
                materials: materials.clone(),
                labor: *labor,
                summary: *summary,
            },
        });
    }

    fn on_content_flag_changed(&self, panel_id: Uuid, manufacturer: Manufacturer, has_content: bool) {
        self.push(EstimateEvent::ContentFlagChanged {
            panel_id,
            manufacturer,
            has_content,
        });
    }
}

/// Observer that forwards notifications to `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingObserver;

impl EstimateObserver for LoggingObserver {
    fn on_totals_changed(
        &self,
        panel_id: Uuid,
        materials: &MaterialTotals,
        labor: &LaborTotals,
        summary: &SummaryTotals,
    ) {
        debug!(
            %panel_id,
            material = materials.total_price,
            labor = labor.total_cost,
            final_total = summary.final_total,
            "totals changed"
        );
    }

    fn on_content_flag_changed(&self, panel_id: Uuid, manufacturer: Manufacturer, has_content: bool) {
        debug!(%panel_id, %manufacturer, has_content, "content flag changed");
    }
}

/// Runs recompute passes against the shared configuration.
#[derive(Clone)]
pub struct RecomputeController {
    config: Arc<EstimatorConfig>,
    observers: Vec<Arc<dyn EstimateObserver>>,
}

impl std::fmt::Debug for RecomputeController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecomputeController")
            .field("config", &self.config)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl RecomputeController {
    pub fn new(config: Arc<EstimatorConfig>) -> Self {
        RecomputeController {
            config,
            observers: Vec::new(),
        }
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Register an observer for every later pass.
    pub fn subscribe(&mut self, observer: Arc<dyn EstimateObserver>) {
        self.observers.push(observer);
    }

    /// Recompute `panel` if it is dirty. Returns whether a pass ran.
    pub fn process(&self, panel: &mut Panel) -> bool {
        if !panel.is_dirty() {
            trace!(panel = panel.name(), "panel clean, nothing to recompute");
            return false;
        }
        self.recompute(panel);
        true
    }

    /// Unconditional pass: compute, publish, notify, return to idle.
    ///
    /// Running it twice on unchanged inputs publishes identical totals and
    /// no content-flag notification the second time.
    #[instrument(level = "trace", skip_all, fields(panel = %panel.name()))]
    pub fn recompute(&self, panel: &mut Panel) {
        let totals = compute_panel_totals(
            panel.collections(),
            panel.labor_entries(),
            panel.labor_type(),
            panel.margin_percent(),
            &self.config,
        );

        let mut flags = [false; MANUFACTURER_COUNT];
        for collection in panel.collections() {
            flags[collection.manufacturer().index()] = collection.has_content();
        }

        if !totals.materials.skipped_rows.is_empty() {
            debug!(
                panel = panel.name(),
                skipped = totals.materials.skipped_rows.len(),
                "rows excluded from material totals"
            );
        }

        let flipped = panel.publish(totals, flags);
        panel.set_state(PanelState::Recomputed);

        let panel_id = panel.id();
        let published = panel.totals();
        for observer in &self.observers {
            observer.on_totals_changed(panel_id, &published.materials, &published.labor, &published.summary);
        }
        for (manufacturer, has_content) in flipped {
            for observer in &self.observers {
                observer.on_content_flag_changed(panel_id, manufacturer, has_content);
            }
        }

        trace!(final_total = published.summary.final_total, "recompute complete");
        panel.set_state(PanelState::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::labor::{LaborCategory, LaborType};

    const EPS: f64 = 1e-9;

    fn setup() -> (RecomputeController, EventLog, InMemoryCatalog) {
        let config = Arc::new(EstimatorConfig::builtin().unwrap());
        let log = EventLog::new();
        let mut controller = RecomputeController::new(config);
        controller.subscribe(Arc::new(log.clone()));
        (controller, log, InMemoryCatalog::with_sample_products())
    }

    #[test]
    fn test_state_cycle() {
        let (controller, log, catalog) = setup();
        let mut panel = Panel::new("TD-1", controller.config());
        assert_eq!(panel.state(), PanelState::Dirty);

        assert!(controller.process(&mut panel));
        assert_eq!(panel.state(), PanelState::Idle);
        assert_eq!(log.len(), 1);

        // Clean panel: no pass, no notification
        assert!(!controller.process(&mut panel));
        assert_eq!(log.len(), 1);

        panel.set_reference(Manufacturer::Schneider, 0, "A9F74206", &catalog).unwrap();
        assert_eq!(panel.state(), PanelState::Dirty);
        assert!(controller.process(&mut panel));
        assert_eq!(panel.state(), PanelState::Idle);
    }

    #[test]
    fn test_published_totals() {
        let (controller, _, catalog) = setup();
        let mut panel = Panel::new("TD-1", controller.config());
        panel.set_reference(Manufacturer::Knx, 0, "MTN6003-0002", &catalog).unwrap();
        panel.set_quantity(Manufacturer::Knx, 0, "2").unwrap();
        panel.set_hours(LaborCategory::Schematics, "10");
        controller.process(&mut panel);

        let totals = panel.totals();
        assert!((totals.materials.total_price - 840.0).abs() < EPS);
        assert_eq!(totals.materials.modules.knx_modules, 4.0);
        assert!((totals.labor.total_cost - 960.0).abs() < EPS);
        assert!((totals.summary.final_total - (840.0 * 1.25 + 960.0)).abs() < EPS);
        assert!(panel.has_content(Manufacturer::Knx));
        assert!(!panel.has_content(Manufacturer::Schneider));
    }

    #[test]
    fn test_content_flag_only_on_transition() {
        let (controller, log, catalog) = setup();
        let mut panel = Panel::new("TD-1", controller.config());
        controller.process(&mut panel);
        log.take();

        panel.set_reference(Manufacturer::Hager, 0, "HTS232E", &catalog).unwrap();
        panel.set_quantity(Manufacturer::Hager, 0, "1").unwrap();
        controller.process(&mut panel);
        let events = log.take();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[1],
            EstimateEvent::ContentFlagChanged { manufacturer: Manufacturer::Hager, has_content: true, .. }
        ));

        // Numeric change only: totals event, no flag event
        panel.set_quantity(Manufacturer::Hager, 0, "3").unwrap();
        controller.process(&mut panel);
        let events = log.take();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], EstimateEvent::TotalsChanged { .. }));

        // Bad quantity: the table loses its only active row
        panel.set_quantity(Manufacturer::Hager, 0, "abc").unwrap();
        controller.process(&mut panel);
        let events = log.take();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[1],
            EstimateEvent::ContentFlagChanged { has_content: false, .. }
        ));
        assert_eq!(panel.totals().materials.skipped_rows.len(), 1);
        assert_eq!(panel.totals().materials.total_price, 0.0);
    }

    #[test]
    fn test_bad_row_beside_valid_row() {
        let (controller, log, catalog) = setup();
        let mut panel = Panel::new("TD-1", controller.config());
        panel.set_reference(Manufacturer::Schneider, 0, "A9F74206", &catalog).unwrap();
        panel.set_quantity(Manufacturer::Schneider, 0, "2").unwrap();
        controller.process(&mut panel);
        log.take();

        panel.set_reference(Manufacturer::Schneider, 1, "A9F74216", &catalog).unwrap();
        panel.set_quantity(Manufacturer::Schneider, 1, "abc").unwrap();
        controller.process(&mut panel);

        let materials = &panel.totals().materials;
        assert!((materials.total_price - 91.2).abs() < EPS);
        assert!((materials.total_time_minutes - 30.0).abs() < EPS);
        assert_eq!(materials.modules.one_two_pole, 2.0);
        assert_eq!(materials.skipped_rows.len(), 1);
        assert_eq!(materials.skipped_rows[0].row, 1);
        assert!(panel.has_content(Manufacturer::Schneider));

        // Flag unchanged: totals event only
        let events = log.take();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], EstimateEvent::TotalsChanged { .. }));
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let (controller, log, catalog) = setup();
        let mut panel = Panel::new("TD-1", controller.config());
        panel.set_reference(Manufacturer::Mcr, 2, "MCR003", &catalog).unwrap();
        panel.set_quantity(Manufacturer::Mcr, 2, "2,5").unwrap();
        panel.set_labor_type(LaborType::External);
        panel.set_hours(LaborCategory::WiringAssembly, "6");

        controller.recompute(&mut panel);
        let first = serde_json::to_string(panel.totals()).unwrap();
        controller.recompute(&mut panel);
        let second = serde_json::to_string(panel.totals()).unwrap();
        assert_eq!(first, second);

        // One flag event from the first pass only
        let flag_events = log
            .events()
            .into_iter()
            .filter(|e| matches!(e, EstimateEvent::ContentFlagChanged { .. }))
            .count();
        assert_eq!(flag_events, 1);
    }

    #[test]
    fn test_panels_are_independent() {
        let (controller, _, catalog) = setup();
        let mut a = Panel::new("A", controller.config());
        let mut b = Panel::new("B", controller.config());
        b.set_reference(Manufacturer::Swisspro, 0, "SP003", &catalog).unwrap();
        b.set_quantity(Manufacturer::Swisspro, 0, "2").unwrap();
        controller.process(&mut b);
        let before = b.totals().clone();

        a.set_reference(Manufacturer::Schneider, 0, "A9F74225", &catalog).unwrap();
        a.set_quantity(Manufacturer::Schneider, 0, "9").unwrap();
        controller.process(&mut a);

        assert_eq!(b.totals(), &before);
    }

    #[test]
    fn test_event_serialization() {
        let event = EstimateEvent::ContentFlagChanged {
            panel_id: Uuid::nil(),
            manufacturer: Manufacturer::Knx,
            has_content: true,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event\":\"content_flag_changed\""));
        assert!(json.contains("\"KNX\""));
    }
}
