//! The pagination engine.

use tracing::{debug, trace, warn};

use crate::config::{ConfigError, PaginatorConfig};
use crate::error::PaginateError;
use crate::pagination::{
    BoundaryError, CursorError, Keyset, KeysetCondition, Page, PageInfo, decode_cursor,
};
use crate::query::{Fetched, Predicate, Query, QuerySource, Record, SortDir};
use crate::request::{PaginateRequest, RequestError};

/// Which cursor, if any, a request paged from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// No cursor: the first page in display order.
    Start,
    /// Paging forward from an `after` cursor.
    After,
    /// Paging backward from a `before` cursor.
    Before,
}

/// Cursor pagination over one collection.
///
/// Constructed once per collection with its [`PaginatorConfig`]; holds no
/// mutable state, so one instance can serve concurrent calls.
///
/// ```
/// use keyset_page::{MemoryStore, PaginateRequest, Paginator, Value};
///
/// let store = MemoryStore::from_rows(vec![
///     [("id", Value::Int(1)), ("score", Value::Int(10))],
///     [("id", Value::Int(2)), ("score", Value::Int(10))],
///     [("id", Value::Int(3)), ("score", Value::Int(20))],
/// ]);
/// let paginator = Paginator::new(store);
///
/// let first = futures::executor::block_on(
///     paginator.paginate(&PaginateRequest::new(2).paginate_by("score")),
/// )
/// .unwrap();
/// assert!(first.has_next());
///
/// let second = futures::executor::block_on(
///     paginator.paginate(&PaginateRequest::new(2).paginate_by("score").after(first.after())),
/// )
/// .unwrap();
/// assert_eq!(second.results.len(), 1);
/// assert!(second.has_previous());
/// ```
#[derive(Debug, Clone)]
pub struct Paginator<S> {
    source: S,
    config: PaginatorConfig,
}

impl<S> Paginator<S> {
    /// Create a paginator with the default configuration (primary key `id`).
    pub fn new(source: S) -> Self {
        Self {
            source,
            config: PaginatorConfig::default(),
        }
    }

    /// Create a paginator with an explicit configuration.
    pub fn with_config(source: S, config: PaginatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { source, config })
    }

    /// The configuration.
    pub const fn config(&self) -> &PaginatorConfig {
        &self.config
    }

    /// The underlying source.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Keyset a request paginates on.
    pub fn keyset(&self, request: &PaginateRequest) -> Keyset {
        let field = request
            .pagination_field
            .as_deref()
            .unwrap_or(self.config.primary_key_field.as_str());
        Keyset::new(field, self.config.primary_key_field.as_str())
    }

    /// Validate a request and build the query for it without running it.
    ///
    /// Fails on malformed requests and undecodable cursors; no source is
    /// touched.
    pub fn plan(&self, request: &PaginateRequest) -> Result<PagePlan, PlanError> {
        if let Err(e) = request.validate(self.config.max_limit) {
            warn!(name = %self.config.name, error = %e, "rejected pagination request");
            return Err(e.into());
        }

        let before = decode_cursor(request.before.as_deref()).inspect_err(|e| {
            warn!(name = %self.config.name, error = %e, "rejected before cursor");
        })?;
        let after = decode_cursor(request.after.as_deref()).inspect_err(|e| {
            warn!(name = %self.config.name, error = %e, "rejected after cursor");
        })?;

        let (anchor, position) = match (before, after) {
            (Some(p), None) => (Anchor::Before, Some(p)),
            (None, Some(p)) => (Anchor::After, Some(p)),
            (None, None) => (Anchor::Start, None),
            (Some(_), Some(_)) => return Err(RequestError::ConflictingCursors.into()),
        };

        // Walking backward means scanning against the display order, then
        // reversing the fetched rows.
        let cursor_desc = if anchor == Anchor::Before {
            !request.desc
        } else {
            request.desc
        };
        let dir = SortDir::from_desc(cursor_desc);
        let keyset = self.keyset(request);

        let seek = position
            .map(|p| KeysetCondition::new(&keyset, p, dir))
            .transpose()
            .inspect_err(|e| {
                warn!(name = %self.config.name, error = %e, "cursor does not fit keyset");
            })?
            .map(|condition| condition.to_predicate());
        let filter = Predicate::conjoin(request.filter.clone(), seek);

        let mut attributes = request.attributes.clone();
        if !attributes.is_empty() {
            for field in [keyset.field(), keyset.primary_key()] {
                if !attributes.iter().any(|a| a == field) {
                    attributes.push(field.to_string());
                }
            }
        }

        // One extra row tells whether more data exists beyond this page
        let fetch_limit = request
            .limit
            .checked_add(1)
            .ok_or(RequestError::LimitTooLarge {
                limit: request.limit,
                max: usize::MAX - 1,
            })?;

        debug!(
            name = %self.config.name,
            field = keyset.field(),
            limit = request.limit,
            desc = request.desc,
            anchor = ?anchor,
            "planned page query"
        );

        let query = Query {
            filter,
            attributes,
            include: request.include.clone(),
            order: keyset.order(dir),
            limit: fetch_limit,
            index_hints: request.index_hints.clone(),
            count: request.row_count,
        };

        Ok(PagePlan {
            query,
            window: PageWindow {
                keyset,
                limit: request.limit,
                anchor,
                row_count: request.row_count,
            },
        })
    }
}

impl<S: QuerySource> Paginator<S> {
    /// Fetch one page.
    ///
    /// Makes exactly one call to the source; its errors are returned as
    /// [`PaginateError::Query`] without retry.
    pub async fn paginate(
        &self,
        request: &PaginateRequest,
    ) -> Result<Page<S::Record>, PaginateError<S::Error>> {
        let PagePlan { query, window } = self.plan(request)?;
        let fetched = self
            .source
            .fetch(query)
            .await
            .map_err(PaginateError::Query)?;
        let fetched_rows = fetched.rows.len();
        let page = window.finish(fetched)?;

        trace!(
            name = %self.config.name,
            fetched = fetched_rows,
            returned = page.results.len(),
            has_next = page.has_next(),
            has_previous = page.has_previous(),
            "page assembled"
        );
        Ok(page)
    }
}

/// A validated request: the query to run plus what is needed to turn its
/// rows into a [`Page`].
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct PagePlan {
    /// Query for the source, over-fetching by one row.
    pub query: Query,
    /// Post-processing for the fetched rows.
    pub window: PageWindow,
}

/// Post-processing state for one page.
#[derive(Debug, Clone)]
pub struct PageWindow {
    keyset: Keyset,
    limit: usize,
    anchor: Anchor,
    row_count: bool,
}

impl PageWindow {
    /// The requested page size.
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Which cursor the page was requested from.
    pub const fn anchor(&self) -> Anchor {
        self.anchor
    }

    /// Trim the over-fetch, restore display order, derive flags and cursors.
    pub fn finish<R: Record>(self, fetched: Fetched<R>) -> Result<Page<R>, BoundaryError> {
        let mut results = fetched.rows;
        let has_more = results.len() > self.limit;
        if has_more {
            results.truncate(self.limit);
        }

        let before = self.anchor == Anchor::Before;
        let after = self.anchor == Anchor::After;
        if before {
            results.reverse();
        }

        // The side we came from always exists; the side we move toward only
        // if the over-fetch found an extra row.
        let mut cursors = PageInfo::new(before || has_more, after || (before && has_more));

        if let (Some(first), Some(last)) = (results.first(), results.last()) {
            let first = self.keyset.position_of(first)?;
            let last = self.keyset.position_of(last)?;
            cursors = cursors.with_bounds(&first, &last)?;
        }

        let count = if self.row_count { fetched.count } else { None };
        Ok(Page::new(results, count, cursors))
    }
}

/// Why a request could not be planned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum PlanError {
    /// See [`CursorError`].
    #[error("invalid cursor: {0}")]
    Cursor(#[from] CursorError),
    /// See [`RequestError`].
    #[error("invalid pagination request: {0}")]
    Request(#[from] RequestError),
}

impl<E> From<PlanError> for PaginateError<E> {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::Cursor(e) => Self::Cursor(e),
            PlanError::Request(e) => Self::Request(e),
        }
    }
}
