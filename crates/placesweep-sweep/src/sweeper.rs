//! Drives a paginated source to exhaustion for one query and merges the
//! in-region, previously unseen places into the session.
//!
//! ## Run algorithm
//!
//! 1. The region's bounding box is computed once and sent with every page
//!    request.
//! 2. Each page is filtered with the precise polygon test.
//! 3. Surviving ids are claimed (checked against the live result set and the
//!    run's claimed set, then added to the claimed set) *before* any detail
//!    request is issued.
//! 4. Details for a page are fetched concurrently; unavailable details are
//!    dropped silently.
//! 5. The page is merged in one step through [`Session`], in the order the
//!    detail requests completed.
//! 6. A continuation token is honoured after the provider's token delay.
//!
//! A provider failure, on a search page or on any detail lookup, ends the
//! run with [`RunStatus::Failed`]. The failing page contributes nothing;
//! everything merged from earlier pages stays. There is no timeout beyond the HTTP
//! client's own: a provider call that never returns leaves the run
//! `InProgress`.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{FuturesUnordered, StreamExt};
use placesweep_core::{Candidate, PlaceDetail, PlaceId, Query, Region};
use placesweep_places::{DetailError, PlaceSource, ProviderError};
use serde::Serialize;
use tokio::sync::watch;
use uuid::Uuid;

use crate::error::SweepError;
use crate::session::Session;

/// Default upper bound on pages per run.
pub const DEFAULT_MAX_PAGES: usize = 10;

/// Public progress of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunStatus {
    /// Published before the first page and after every page merge.
    InProgress {
        pages: usize,
        added: usize,
        total: usize,
    },
    Completed {
        pages: usize,
        added: usize,
        total: usize,
    },
    Failed {
        pages: usize,
        added: usize,
        total: usize,
        error: String,
    },
}

impl RunStatus {
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress { .. })
    }

    /// Size of the result set when this status was published.
    #[must_use]
    pub const fn total(&self) -> usize {
        match self {
            Self::InProgress { total, .. }
            | Self::Completed { total, .. }
            | Self::Failed { total, .. } => *total,
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InProgress { total, .. } => write!(f, "searching... {total} places so far"),
            Self::Completed { added, total, .. } => {
                write!(f, "done: {added} new, {total} places in total")
            }
            Self::Failed { total, error, .. } => {
                write!(f, "search failed ({error}); keeping {total} places")
            }
        }
    }
}

/// Final report of one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub query: Query,
    pub pages: usize,
    pub added: usize,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Starts runs against a shared session.
pub struct Sweeper {
    source: Arc<dyn PlaceSource>,
    session: Session,
    max_pages: usize,
}

impl Sweeper {
    pub fn new(source: Arc<dyn PlaceSource>, session: Session) -> Self {
        Self {
            source,
            session,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Caps pages per run; values below 1 are treated as 1.
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Binds `raw_query` to the session's active region.
    ///
    /// Nothing is sent to the provider until [`Run::execute`] is awaited.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::InvalidInvocation`] when there is no active
    /// region or the query is blank.
    pub fn start(&self, raw_query: &str) -> Result<Run, SweepError> {
        let region = self.session.region().ok_or_else(|| {
            SweepError::InvalidInvocation("no search region has been drawn".to_string())
        })?;
        let query = Query::parse(raw_query)
            .map_err(|e| SweepError::InvalidInvocation(e.to_string()))?;

        let (status, _) = watch::channel(RunStatus::InProgress {
            pages: 0,
            added: 0,
            total: self.session.len(),
        });

        Ok(Run {
            id: Uuid::new_v4(),
            query,
            region,
            source: Arc::clone(&self.source),
            session: self.session.clone(),
            max_pages: self.max_pages,
            status,
        })
    }
}

/// One (region, query) search, ready to execute.
pub struct Run {
    id: Uuid,
    query: Query,
    region: Region,
    source: Arc<dyn PlaceSource>,
    session: Session,
    max_pages: usize,
    status: watch::Sender<RunStatus>,
}

impl Run {
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub const fn query(&self) -> &Query {
        &self.query
    }

    /// Subscribes to progress updates. The receiver keeps the terminal
    /// status after the run finishes.
    #[must_use]
    pub fn status(&self) -> watch::Receiver<RunStatus> {
        self.status.subscribe()
    }

    /// Pages through the source until it is exhausted or fails.
    pub async fn execute(self) -> RunSummary {
        let started_at = Utc::now();
        let bounds = self.region.bounding_box();
        let mut claimed = self.session.id_set();
        let mut page_token: Option<String> = None;
        let mut pages = 0usize;
        let mut added = 0usize;

        tracing::info!(run_id = %self.id, query = %self.query, "search run started");

        let outcome: Result<(), SweepError> = loop {
            if pages > 0 {
                if pages >= self.max_pages {
                    break Err(SweepError::PaginationLimit {
                        max_pages: self.max_pages,
                    });
                }
                let delay = self.source.page_token_delay();
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }

            let page = match self
                .source
                .search_page(&self.query, bounds, page_token.as_deref())
                .await
            {
                Ok(page) => page,
                Err(err) => break Err(err.into()),
            };

            let received = page.candidates.len();
            let fresh = self.claim(page.candidates, &mut claimed);
            let claimed_count = fresh.len();
            let details = match self.fetch_details(fresh).await {
                Ok(details) => details,
                Err(err) => break Err(err.into()),
            };
            pages += 1;
            let merge = self.session.merge(&self.query, details);
            added += merge.added;

            tracing::debug!(
                run_id = %self.id,
                page = pages,
                received,
                claimed = claimed_count,
                added = merge.added,
                total = merge.total,
                "page merged"
            );
            self.status.send_replace(RunStatus::InProgress {
                pages,
                added,
                total: merge.total,
            });

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break Ok(()),
            }
        };

        let total = self.session.len();
        let status = match outcome {
            Ok(()) => {
                tracing::info!(run_id = %self.id, query = %self.query, pages, added, total, "search run completed");
                RunStatus::Completed {
                    pages,
                    added,
                    total,
                }
            }
            Err(err) => {
                tracing::warn!(run_id = %self.id, query = %self.query, pages, added, error = %err, "search run failed");
                RunStatus::Failed {
                    pages,
                    added,
                    total,
                    error: err.to_string(),
                }
            }
        };
        self.status.send_replace(status.clone());

        RunSummary {
            run_id: self.id,
            query: self.query,
            pages,
            added,
            status,
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// Keeps in-region candidates whose ids are neither in the live result
    /// set nor already claimed by this run, claiming them as it goes.
    fn claim(&self, candidates: Vec<Candidate>, claimed: &mut HashSet<PlaceId>) -> Vec<Candidate> {
        candidates
            .into_iter()
            .filter(|c| {
                let inside = self.region.contains(c.location);
                if !inside {
                    tracing::trace!(place_id = %c.id, location = %c.location, "outside region");
                }
                inside
            })
            .filter(|c| !self.session.contains(&c.id) && claimed.insert(c.id.clone()))
            .collect()
    }

    /// Fetches details concurrently, yielding them in completion order.
    ///
    /// The first provider failure abandons the rest of the page.
    async fn fetch_details(
        &self,
        candidates: Vec<Candidate>,
    ) -> Result<Vec<(PlaceId, PlaceDetail)>, ProviderError> {
        let mut pending: FuturesUnordered<_> = candidates
            .into_iter()
            .map(|c| async move {
                let detail = self.source.fetch_detail(&c.id).await;
                (c.id, detail)
            })
            .collect();

        let mut resolved = Vec::new();
        while let Some((id, detail)) = pending.next().await {
            match detail {
                Ok(detail) => resolved.push((id, detail)),
                Err(DetailError::Unavailable(err)) => {
                    tracing::debug!(run_id = %self.id, place_id = %id, reason = %err.reason, "detail unavailable; dropping candidate");
                }
                Err(DetailError::Provider(err)) => {
                    tracing::debug!(run_id = %self.id, place_id = %id, error = %err, "detail lookup failed; abandoning page");
                    return Err(err);
                }
            }
        }
        Ok(resolved)
    }
}
