//! Periodic evaluation loop driving the engine against collaborators.
//!
//! The loop owns no scheduling logic of its own: each tick it assembles
//! an [`EvaluationSnapshot`] from the `SnapshotSource`, runs the alert
//! evaluation, and hands every event to the `AlertDispatcher`. A
//! per-medicine lookup failure downgrades to
//! skipping that medicine for the tick; the loop itself never dies.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use thiserror::Error;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::engine::evaluate;
use crate::engine::types::{AlertEvent, EvaluationSnapshot};
use crate::models::{Caregiver, Intake, Medicine, Patient, Schedule};

/// Sleep granularity for shutdown responsiveness.
const SLEEP_GRANULARITY_SECS: u64 = 1;

/// Collaborator lookup failure. Never fatal to the loop: a failed
/// medicine is skipped for the tick, a failed tick is retried on the
/// next one.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("lookup failed: {0}")]
    Lookup(String),

    #[error("lookup timed out: {0}")]
    Timeout(String),
}

/// Read side: the stores the engine pulls records from. One
/// implementation per deployment; the engine never sees where the
/// records live.
pub trait SnapshotSource: Send + Sync {
    fn patient(&self) -> Result<Patient, SourceError>;
    fn medicines(&self) -> Result<Vec<Medicine>, SourceError>;
    fn schedules(&self, medicine_id: Uuid) -> Result<Vec<Schedule>, SourceError>;
    fn intakes(
        &self,
        medicine_id: Uuid,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Vec<Intake>, SourceError>;
    fn caregivers(&self) -> Result<Vec<Caregiver>, SourceError>;
}

/// Write side: consumes emitted events. Owns delivery channel choice,
/// suppression (via [`AlertEvent::dedup_key`]), and persistence.
pub trait AlertDispatcher: Send + Sync {
    fn dispatch(&self, event: &AlertEvent, patient: &Patient);
}

/// One evaluation pass at `now`. Public so embedders can tick on their
/// own cadence. Returns the number of dispatched events.
pub fn run_tick(
    source: &dyn SnapshotSource,
    dispatcher: &dyn AlertDispatcher,
    now: NaiveDateTime,
    config: &EngineConfig,
) -> Result<usize, SourceError> {
    let patient = source.patient()?;
    let all_medicines = source.medicines()?;
    let caregivers = source.caregivers()?;

    // Fetch intakes slightly beyond the evaluation window so boundary
    // occurrences still find their match candidates.
    let from = now - config.look_back - config.match_window;
    let to = now + config.look_ahead + config.match_window;

    let mut medicines = Vec::with_capacity(all_medicines.len());
    let mut schedules = HashMap::new();
    let mut intakes = HashMap::new();

    for medicine in all_medicines {
        let med_schedules = match source.schedules(medicine.id) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(medicine = %medicine.id, error = %e, "schedule lookup failed, skipping medicine this tick");
                continue;
            }
        };
        let med_intakes = match source.intakes(medicine.id, from, to) {
            Ok(i) => i,
            Err(e) => {
                tracing::warn!(medicine = %medicine.id, error = %e, "intake lookup failed, skipping medicine this tick");
                continue;
            }
        };
        schedules.insert(medicine.id, med_schedules);
        intakes.insert(medicine.id, med_intakes);
        medicines.push(medicine);
    }

    let snapshot = EvaluationSnapshot {
        patient: patient.clone(),
        medicines,
        schedules,
        intakes,
        caregivers,
    };

    let events = evaluate(now, &snapshot, config);
    for event in &events {
        dispatcher.dispatch(event, &patient);
    }
    Ok(events.len())
}

/// Handle for the background evaluation loop thread.
///
/// Supports graceful shutdown via `shutdown()` or automatic cleanup on
/// `Drop`.
pub struct EvaluationLoopHandle {
    shutdown: Arc<AtomicBool>,
    handle: Option<std::thread::JoinHandle<()>>,
}

impl EvaluationLoopHandle {
    /// Request graceful shutdown. A tick in flight completes; no new
    /// tick starts.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

impl Drop for EvaluationLoopHandle {
    fn drop(&mut self) {
        self.shutdown();
        if let Some(h) = self.handle.take() {
            let _ = h.join();
        }
    }
}

/// Start the evaluation loop on a background thread, ticking every
/// `config.tick_interval_secs`. Returns a handle that supports graceful
/// shutdown. Keep it alive for as long as evaluations should run.
pub fn start_evaluation_loop(
    source: Arc<dyn SnapshotSource>,
    dispatcher: Arc<dyn AlertDispatcher>,
    config: EngineConfig,
) -> EvaluationLoopHandle {
    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = shutdown.clone();

    let handle = std::thread::spawn(move || {
        tracing::info!(
            interval_secs = config.tick_interval_secs,
            "evaluation loop started"
        );
        evaluation_loop(&*source, &*dispatcher, &config, &flag);
    });

    EvaluationLoopHandle {
        shutdown,
        handle: Some(handle),
    }
}

fn evaluation_loop(
    source: &dyn SnapshotSource,
    dispatcher: &dyn AlertDispatcher,
    config: &EngineConfig,
    shutdown: &AtomicBool,
) {
    while !shutdown.load(Ordering::Relaxed) {
        let now = Local::now().naive_local();
        match run_tick(source, dispatcher, now, config) {
            Ok(count) => tracing::debug!(events = count, "tick complete"),
            Err(e) => tracing::warn!(error = %e, "tick skipped"),
        }

        // Sleep in small increments for responsive shutdown.
        for _ in 0..config.tick_interval_secs.max(1) / SLEEP_GRANULARITY_SECS {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }
            std::thread::sleep(Duration::from_secs(SLEEP_GRANULARITY_SECS));
        }
    }
    tracing::info!("evaluation loop shutting down");
}
