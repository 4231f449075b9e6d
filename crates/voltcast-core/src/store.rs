// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of VoltCast.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Current forecast state shared between concurrent fetches.
//!
//! Every fetch takes a ticket from a monotonically increasing sequence before
//! it starts. A completion is applied only while its ticket is still the most
//! recently issued one, so a slow response for an old period can never
//! overwrite the data of a newer selection.

use crate::normalize::normalize_forecast;
use crate::view::{ComparisonView, DashboardView};
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};
use voltcast_types::{DataSource, ForecastBatch, ForecastDayNormalized, ForecastPeriod, ModelComparisonDay};

/// Proof of having started a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    sequence: u64,
    period: ForecastPeriod,
}

impl FetchTicket {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn period(&self) -> ForecastPeriod {
        self.period
    }
}

/// Issues fetch tickets and tells whether one is still current
#[derive(Debug, Default)]
pub struct FetchSequencer {
    latest: AtomicU64,
}

impl FetchSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self, period: ForecastPeriod) -> FetchTicket {
        let sequence = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        FetchTicket { sequence, period }
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.sequence
    }
}

/// A successfully loaded and normalized forecast
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedForecast {
    pub period: ForecastPeriod,
    pub source: DataSource,
    pub loaded_at: DateTime<Utc>,
    pub sectors: Arc<[ForecastDayNormalized]>,
    pub models: Arc<[ModelComparisonDay]>,
}

impl LoadedForecast {
    pub fn from_batch(batch: &ForecastBatch) -> Self {
        let normalized = normalize_forecast(&batch.days);
        Self {
            period: batch.period,
            source: batch.source,
            loaded_at: Utc::now(),
            sectors: normalized.sectors.into(),
            models: normalized.models.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty() && self.models.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    Loading { period: ForecastPeriod },
    Loaded(Arc<LoadedForecast>),
    Failed { period: ForecastPeriod, message: String },
}

impl LoadState {
    pub fn status(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading { .. } => "loading",
            Self::Loaded(_) => "loaded",
            Self::Failed { .. } => "failed",
        }
    }
}

struct CachedView {
    records: Arc<[ForecastDayNormalized]>,
    view: Arc<DashboardView>,
}

/// Keeps the dashboard view of the last record array it was asked about.
///
/// Records are compared by identity: the view is recomputed only when a
/// different array is passed in.
#[derive(Default)]
pub struct ViewCache {
    slot: Mutex<Option<CachedView>>,
    derivations: AtomicU64,
}

impl std::fmt::Debug for ViewCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewCache")
            .field("cached", &self.slot.lock().is_some())
            .field("derivations", &self.derivations())
            .finish()
    }
}

impl ViewCache {
    pub fn get_or_derive(&self, records: &Arc<[ForecastDayNormalized]>) -> Arc<DashboardView> {
        let mut slot = self.slot.lock();
        if let Some(cached) = slot.as_ref()
            && Arc::ptr_eq(&cached.records, records)
        {
            return Arc::clone(&cached.view);
        }

        let view = Arc::new(DashboardView::derive(records));
        self.derivations.fetch_add(1, Ordering::Relaxed);
        *slot = Some(CachedView {
            records: Arc::clone(records),
            view: Arc::clone(&view),
        });
        view
    }

    /// Number of times a view was actually computed
    pub fn derivations(&self) -> u64 {
        self.derivations.load(Ordering::Relaxed)
    }
}

/// Single owner of the current forecast state
#[derive(Debug)]
pub struct ForecastStore {
    sequencer: FetchSequencer,
    state: RwLock<LoadState>,
    views: ViewCache,
}

impl Default for ForecastStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ForecastStore {
    pub fn new() -> Self {
        Self {
            sequencer: FetchSequencer::new(),
            state: RwLock::new(LoadState::Idle),
            views: ViewCache::default(),
        }
    }

    /// Starts a fetch for `period` and marks the state as loading
    pub fn begin(&self, period: ForecastPeriod) -> FetchTicket {
        let mut state = self.state.write();
        let ticket = self.sequencer.issue(period);
        *state = LoadState::Loading { period };
        debug!(sequence = ticket.sequence, %period, "Forecast fetch started");
        ticket
    }

    /// Applies a finished fetch; returns false when a newer fetch superseded it
    pub fn complete(&self, ticket: FetchTicket, loaded: Arc<LoadedForecast>) -> bool {
        let mut state = self.state.write();
        if !self.sequencer.is_current(&ticket) {
            debug!(
                sequence = ticket.sequence,
                period = %ticket.period,
                "Discarding stale forecast response"
            );
            return false;
        }

        info!(
            period = %loaded.period,
            source = ?loaded.source,
            sector_days = loaded.sectors.len(),
            model_days = loaded.models.len(),
            "Forecast loaded"
        );
        *state = LoadState::Loaded(loaded);
        true
    }

    /// Records a failed fetch; returns false when a newer fetch superseded it
    pub fn fail(&self, ticket: FetchTicket, message: impl Into<String>) -> bool {
        let message = message.into();
        let mut state = self.state.write();
        if !self.sequencer.is_current(&ticket) {
            debug!(sequence = ticket.sequence, "Discarding stale forecast failure");
            return false;
        }

        warn!(period = %ticket.period, error = %message, "Forecast fetch failed");
        *state = LoadState::Failed {
            period: ticket.period,
            message,
        };
        true
    }

    pub fn state(&self) -> LoadState {
        self.state.read().clone()
    }

    pub fn loaded(&self) -> Option<Arc<LoadedForecast>> {
        match &*self.state.read() {
            LoadState::Loaded(loaded) => Some(Arc::clone(loaded)),
            LoadState::Idle | LoadState::Loading { .. } | LoadState::Failed { .. } => None,
        }
    }

    /// Dashboard view of the current forecast, derived once per loaded batch
    pub fn dashboard_view(&self) -> Option<Arc<DashboardView>> {
        self.loaded().map(|loaded| self.view_of(&loaded))
    }

    /// Dashboard view of `loaded`, shared with the current state when it is the same batch
    pub fn view_of(&self, loaded: &LoadedForecast) -> Arc<DashboardView> {
        self.views.get_or_derive(&loaded.sectors)
    }

    pub fn comparison_view(&self) -> Option<ComparisonView> {
        self.loaded()
            .map(|loaded| ComparisonView::derive(&loaded.models))
    }

    pub fn view_derivations(&self) -> u64 {
        self.views.derivations()
    }
}
