//! Stage queue view
//!
//! A page of visits waiting at one stage. Refreshed by polling and kept in
//! step with local [`VisitEvent`]s between polls.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::api::VisitApi;
use crate::domain::{can_access_stage, get_stage_label};
use crate::errors::{CareQueueError, Result};
use crate::schemas::{Session, Stage, Visit};

use super::VisitEvent;

#[derive(Debug, Clone)]
pub struct QueueView {
    stage: Stage,
    page: u32,
    limit: u32,
    visits: Vec<Visit>,
    total: u32,
    pages: u32,
    last_refreshed: Option<DateTime<Utc>>,
}

impl QueueView {
    /// Open the queue for `stage`, if the session's role may see it.
    pub fn new(session: &Session, stage: Stage, limit: u32) -> Result<Self> {
        if !can_access_stage(session.role(), stage) {
            return Err(CareQueueError::Unauthorized(format!(
                "{} staff cannot open the {} queue",
                session.role(),
                get_stage_label(stage)
            )));
        }
        Ok(Self {
            stage,
            page: 1,
            limit: limit.max(1),
            visits: Vec::new(),
            total: 0,
            pages: 1,
            last_refreshed: None,
        })
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn pages(&self) -> u32 {
        self.pages
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn visits(&self) -> &[Visit] {
        &self.visits
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.last_refreshed
    }

    pub fn contains(&self, visit_id: &str) -> bool {
        self.visits.iter().any(|v| v.id == visit_id)
    }

    /// Move to the next page. Takes effect on the next refresh.
    pub fn next_page(&mut self) -> bool {
        if self.page < self.pages {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Replace the page with what the service currently has.
    pub async fn refresh<A: VisitApi + ?Sized>(&mut self, api: &A) -> Result<()> {
        let mut result = api.queue(self.stage, self.page, self.limit).await?;

        // The queue shrank under us; fall back to its last page.
        if result.pages > 0 && self.page > result.pages {
            self.page = result.pages;
            result = api.queue(self.stage, self.page, self.limit).await?;
        }

        self.visits = result.visits;
        self.total = result.total;
        self.pages = result.pages.max(1);
        self.last_refreshed = Some(Utc::now());
        debug!(stage = %self.stage, page = self.page, total = self.total, "Queue refreshed");
        Ok(())
    }

    /// Apply a confirmed change. Returns true when the view can only be
    /// brought up to date by refreshing.
    pub fn apply_event(&mut self, event: &VisitEvent) -> bool {
        match event {
            VisitEvent::HandedOff { visit_id, from, to } => {
                let mut stale = false;
                if *from == self.stage && self.contains(visit_id) {
                    self.visits.retain(|v| &v.id != visit_id);
                    self.total = self.total.saturating_sub(1);
                }
                if *to == self.stage {
                    stale = true;
                }
                stale
            }
            VisitEvent::Reassigned { visit_id, .. }
            | VisitEvent::ClockedIn { visit_id, .. }
            | VisitEvent::StageDataRecorded { visit_id, .. } => self.contains(visit_id),
        }
    }

    /// Keep the view current until `shutdown` resolves.
    ///
    /// Polls every `interval` and applies events from `events` in between.
    /// Failed polls are logged and retried on the next tick; only the first
    /// load is fatal. `on_update` runs after every change to the view.
    pub async fn watch<A, S, F>(
        &mut self,
        api: &A,
        mut events: broadcast::Receiver<VisitEvent>,
        interval: Duration,
        shutdown: S,
        mut on_update: F,
    ) -> Result<()>
    where
        A: VisitApi + ?Sized,
        S: Future<Output = ()>,
        F: FnMut(&QueueView),
    {
        self.refresh(api).await?;
        on_update(self);

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker.tick().await;

        tokio::pin!(shutdown);
        let mut events_open = true;

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    match self.refresh(api).await {
                        Ok(()) => on_update(self),
                        Err(e) => warn!(stage = %self.stage, "Queue refresh failed: {}", e),
                    }
                }
                received = events.recv(), if events_open => {
                    match received {
                        Ok(event) => {
                            let stale = self.apply_event(&event);
                            if stale {
                                if let Err(e) = self.refresh(api).await {
                                    warn!(stage = %self.stage, "Queue refresh failed: {}", e);
                                }
                            }
                            on_update(self);
                        }
                        Err(RecvError::Lagged(missed)) => {
                            debug!(missed, "Missed visit events, refreshing");
                            if self.refresh(api).await.is_ok() {
                                on_update(self);
                            }
                        }
                        Err(RecvError::Closed) => events_open = false,
                    }
                }
            }
        }

        Ok(())
    }
}
