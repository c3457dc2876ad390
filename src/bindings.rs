//! The five cached fetches behind the cycle page.
//!
//! Each binding is a key plus a fetcher. The key is `None` (binding disabled,
//! nothing requested) unless the route parameters it needs are present.

use std::future::Future;

use serde::{de::DeserializeOwned, Serialize};

use crate::cache::{CacheKey, FetchCache};
use crate::error::Result;
use crate::route::RouteParams;
use crate::services::PlaneServices;
use crate::types::{Cycle, CycleDetails, CycleIssueAssociation, Issue, ProjectDetails};

pub fn project_key(params: &RouteParams) -> Option<CacheKey> {
    let (workspace, project) = params.project_scope()?;
    Some(CacheKey::ProjectDetails {
        workspace: workspace.to_string(),
        project: project.to_string(),
    })
}

pub fn project_issues_key(params: &RouteParams) -> Option<CacheKey> {
    let (workspace, project) = params.project_scope()?;
    Some(CacheKey::ProjectIssues {
        workspace: workspace.to_string(),
        project: project.to_string(),
    })
}

pub fn cycles_key(params: &RouteParams) -> Option<CacheKey> {
    let (workspace, project) = params.project_scope()?;
    Some(CacheKey::ProjectCycles {
        workspace: workspace.to_string(),
        project: project.to_string(),
    })
}

pub fn cycle_details_key(params: &RouteParams) -> Option<CacheKey> {
    let (workspace, project, cycle) = params.cycle_scope()?;
    Some(CacheKey::CycleDetails {
        workspace: workspace.to_string(),
        project: project.to_string(),
        cycle: cycle.to_string(),
    })
}

pub fn cycle_issues_key(params: &RouteParams) -> Option<CacheKey> {
    let (workspace, project, cycle) = params.cycle_scope()?;
    Some(CacheKey::CycleIssues {
        workspace: workspace.to_string(),
        project: project.to_string(),
        cycle: cycle.to_string(),
    })
}

/// Resolved binding values. `None` means pending: disabled, failed, or not loaded yet.
#[derive(Debug, Clone, Default)]
pub struct PageData {
    pub project: Option<ProjectDetails>,
    pub issues: Option<Vec<Issue>>,
    pub cycles: Option<Vec<Cycle>>,
    pub cycle: Option<CycleDetails>,
    pub cycle_issues: Option<Vec<CycleIssueAssociation>>,
}

struct Binding {
    key: Option<CacheKey>,
    fetch: bool,
}

impl Binding {
    fn plan(cache: &FetchCache, key: Option<CacheKey>) -> Self {
        let fetch = key.as_ref().is_some_and(|k| !cache.is_fresh(k));
        Self { key, fetch }
    }

    /// Store the outcome and return what the page should see.
    fn settle<T>(self, cache: &mut FetchCache, fetched: Option<Result<T>>) -> Option<T>
    where
        T: Serialize + DeserializeOwned,
    {
        let key = self.key?;
        match fetched {
            None => cache.peek(&key),
            Some(Ok(value)) => {
                cache.insert(key, &value);
                Some(value)
            }
            Some(Err(e)) => {
                tracing::warn!(?key, error = %e, "binding fetch failed");
                cache.peek(&key)
            }
        }
    }
}

async fn maybe<T>(fetch: Option<impl Future<Output = Result<T>>>) -> Option<Result<T>> {
    match fetch {
        Some(fetch) => Some(fetch.await),
        None => None,
    }
}

impl PageData {
    /// Issue every enabled binding that is not fresh in `cache`, all at once.
    pub async fn load<S: PlaneServices>(
        cache: &mut FetchCache,
        services: &S,
        params: &RouteParams,
    ) -> Self {
        let project = Binding::plan(&*cache, project_key(params));
        let issues = Binding::plan(&*cache, project_issues_key(params));
        let cycles = Binding::plan(&*cache, cycles_key(params));
        let cycle = Binding::plan(&*cache, cycle_details_key(params));
        let cycle_issues = Binding::plan(&*cache, cycle_issues_key(params));

        let project_scope = params.project_scope();
        let cycle_scope = params.cycle_scope();

        let (project_res, issues_res, cycles_res, cycle_res, cycle_issues_res) = tokio::join!(
            maybe(
                project_scope
                    .filter(|_| project.fetch)
                    .map(|(ws, p)| services.get_project(ws, p))
            ),
            maybe(
                project_scope
                    .filter(|_| issues.fetch)
                    .map(|(ws, p)| services.get_issues(ws, p))
            ),
            maybe(
                project_scope
                    .filter(|_| cycles.fetch)
                    .map(|(ws, p)| services.get_cycles(ws, p))
            ),
            maybe(
                cycle_scope
                    .filter(|_| cycle.fetch)
                    .map(|(ws, p, c)| services.get_cycle_details(ws, p, c))
            ),
            maybe(
                cycle_scope
                    .filter(|_| cycle_issues.fetch)
                    .map(|(ws, p, c)| services.get_cycle_issues(ws, p, c))
            ),
        );

        Self {
            project: project.settle(cache, project_res),
            issues: issues.settle(cache, issues_res.map(|r| r.map(|list| list.results))),
            cycles: cycles.settle(cache, cycles_res),
            cycle: cycle.settle(cache, cycle_res),
            cycle_issues: cycle_issues.settle(cache, cycle_issues_res),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::testing::{association, cycle_details, issue, FakePlane};

    fn fresh_cache() -> FetchCache {
        FetchCache::new(Duration::from_secs(60))
    }

    #[test]
    fn test_keys_disabled_without_workspace_or_project() {
        for path in ["/", "/acme", "/acme/projects", "/acme/settings/p1/cycles/c1"] {
            let params = RouteParams::parse(path).unwrap();
            assert_eq!(project_key(&params), None, "{path}");
            assert_eq!(project_issues_key(&params), None, "{path}");
            assert_eq!(cycles_key(&params), None, "{path}");
            assert_eq!(cycle_details_key(&params), None, "{path}");
            assert_eq!(cycle_issues_key(&params), None, "{path}");
        }
    }

    #[test]
    fn test_cycle_keys_need_cycle_id() {
        let params = RouteParams::parse("/acme/projects/p1").unwrap();
        assert!(project_key(&params).is_some());
        assert!(cycle_details_key(&params).is_none());
        assert!(cycle_issues_key(&params).is_none());
    }

    #[tokio::test]
    async fn test_load_without_project_issues_no_requests() {
        let fake = FakePlane::with_cycle("c1", vec![]);
        let mut cache = fresh_cache();
        let params = RouteParams::parse("/acme").unwrap();

        let data = PageData::load(&mut cache, &fake, &params).await;

        assert!(fake.calls().is_empty());
        assert!(data.project.is_none());
        assert!(data.cycle_issues.is_none());
    }

    #[tokio::test]
    async fn test_load_resolves_all_bindings() {
        let fake = FakePlane::with_cycle("c1", vec![association("b1", issue("i1", "First"), "c1")]);
        let mut cache = fresh_cache();
        let params = RouteParams::parse("/acme/projects/p1/cycles/c1").unwrap();

        let data = PageData::load(&mut cache, &fake, &params).await;

        assert!(data.project.is_some());
        assert!(data.issues.is_some());
        assert!(data.cycles.is_some());
        assert_eq!(data.cycle, Some(cycle_details("c1")));
        assert_eq!(data.cycle_issues.map(|a| a.len()), Some(1));
        for key in [
            project_key(&params),
            project_issues_key(&params),
            cycles_key(&params),
            cycle_details_key(&params),
            cycle_issues_key(&params),
        ] {
            assert!(cache.contains(&key.unwrap()));
        }
    }

    #[tokio::test]
    async fn test_failed_binding_stays_pending_others_resolve() {
        let mut fake = FakePlane::with_cycle("c1", vec![]);
        fake.project = None;
        let mut cache = fresh_cache();
        let params = RouteParams::parse("/acme/projects/p1/cycles/c1").unwrap();

        let data = PageData::load(&mut cache, &fake, &params).await;

        assert!(data.project.is_none());
        assert_eq!(data.cycle_issues, Some(vec![]));
        assert!(!cache.contains(&project_key(&params).unwrap()));
    }

    #[tokio::test]
    async fn test_fresh_entries_are_not_refetched() {
        let fake = FakePlane::with_cycle("c1", vec![]);
        let mut cache = fresh_cache();
        let params = RouteParams::parse("/acme/projects/p1/cycles/c1").unwrap();

        PageData::load(&mut cache, &fake, &params).await;
        let data = PageData::load(&mut cache, &fake, &params).await;

        assert_eq!(fake.calls_to("get_cycle_issues"), 1);
        assert_eq!(fake.calls_to("get_project"), 1);
        assert!(data.project.is_some());
    }

    #[tokio::test]
    async fn test_stale_entry_survives_failed_revalidation() {
        let mut fake = FakePlane::with_cycle("c1", vec![]);
        let mut cache = FetchCache::new(Duration::ZERO);
        let params = RouteParams::parse("/acme/projects/p1/cycles/c1").unwrap();

        PageData::load(&mut cache, &fake, &params).await;
        fake.project = None;
        let data = PageData::load(&mut cache, &fake, &params).await;

        assert_eq!(fake.calls_to("get_project"), 2);
        assert!(data.project.is_some());
    }

    #[tokio::test]
    async fn test_dropped_load_does_not_block_next_load() {
        let mut stalled = FakePlane::with_cycle("c1", vec![]);
        stalled.stall_cycle_issues = true;
        let fake = FakePlane::with_cycle("c1", vec![association("b1", issue("i1", "First"), "c1")]);
        let mut cache = fresh_cache();
        let params = RouteParams::parse("/acme/projects/p1/cycles/c1").unwrap();

        tokio::select! {
            biased;
            _ = PageData::load(&mut cache, &stalled, &params) => panic!("stalled load finished"),
            _ = std::future::ready(()) => {}
        }
        assert_eq!(stalled.calls_to("get_cycle_issues"), 1);

        let data = PageData::load(&mut cache, &fake, &params).await;

        assert_eq!(fake.calls_to("get_cycle_issues"), 1);
        assert_eq!(data.cycle_issues.map(|a| a.len()), Some(1));
    }
}
