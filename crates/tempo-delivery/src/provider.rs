//! Injectable source of historical work items.
//!
//! The "load all historical completed issues" step that backs confidence
//! intervals and team baselines stays outside the calculation core: callers
//! hand the engine whatever sample their provider returns, keeping the core
//! pure and the provider mockable.

use anyhow::Result;

use tempo_core::model::{ReportingWindow, WorkItem};

/// What slice of history a provider should return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryScope {
    /// Restrict to items completed within this window.
    pub completed_within: Option<ReportingWindow>,
    /// Cap on the number of items returned.
    pub limit: Option<usize>,
}

/// Source of historical completed work items.
pub trait HistoricalSampleProvider {
    /// Fetch the historical sample for `scope`.
    ///
    /// # Errors
    ///
    /// Implementations backed by remote trackers may fail; the in-memory
    /// provider never does.
    fn fetch(&self, scope: &HistoryScope) -> Result<Vec<WorkItem>>;
}

/// Provider over an already-loaded snapshot, used by tests and by callers
/// that batch their tracker reads up front.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    items: Vec<WorkItem>,
}

impl InMemoryProvider {
    #[must_use]
    pub const fn new(items: Vec<WorkItem>) -> Self {
        Self { items }
    }
}

impl HistoricalSampleProvider for InMemoryProvider {
    fn fetch(&self, scope: &HistoryScope) -> Result<Vec<WorkItem>> {
        let mut matched: Vec<WorkItem> = self
            .items
            .iter()
            .filter(|item| {
                item.is_completed()
                    && scope.completed_within.is_none_or(|window| {
                        item.completed_at.is_some_and(|at| window.contains(at))
                    })
            })
            .cloned()
            .collect();

        if let Some(limit) = scope.limit {
            matched.truncate(limit);
        }

        Ok(matched)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use tempo_core::model::StateCategory;

    fn ts(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn completed(id: &str, day: u32) -> WorkItem {
        WorkItem {
            id: id.to_string(),
            points: None,
            state: "Done".to_string(),
            category: StateCategory::Completed,
            created_at: ts(1),
            started_at: None,
            completed_at: Some(ts(day)),
            tags: Vec::new(),
            history: Vec::new(),
        }
    }

    #[test]
    fn only_completed_items_are_returned() {
        let mut open = completed("OPEN", 5);
        open.category = StateCategory::InProgress;

        let provider = InMemoryProvider::new(vec![completed("DONE", 5), open]);
        let fetched = provider
            .fetch(&HistoryScope::default())
            .expect("in-memory fetch");

        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].id, "DONE");
    }

    #[test]
    fn window_scope_filters_by_completion() {
        let provider = InMemoryProvider::new(vec![completed("IN", 5), completed("OUT", 25)]);
        let scope = HistoryScope {
            completed_within: Some(ReportingWindow {
                starts_at: ts(1),
                ends_at: ts(10),
            }),
            limit: None,
        };

        let fetched = provider.fetch(&scope).expect("in-memory fetch");
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].id, "IN");
    }

    #[test]
    fn limit_caps_the_sample() {
        let provider = InMemoryProvider::new(vec![
            completed("A", 4),
            completed("B", 5),
            completed("C", 6),
        ]);
        let scope = HistoryScope {
            completed_within: None,
            limit: Some(2),
        };

        assert_eq!(provider.fetch(&scope).expect("in-memory fetch").len(), 2);
    }
}
