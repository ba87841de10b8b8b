//! Keyset paging reader
//!
//! Reads any page of a [`PagingQueryProvider`]'s query. Page 0 runs the
//! first-page query. Later pages first run the jump-to-item query to find
//! the last row of the preceding page, then run the remaining-pages query
//! resuming after that row's sort keys.

use paging_query::{GeneratedQuery, Page, PageRequest, PagingQueryProvider};
use std::sync::Arc;

use crate::errors::StoreError;
use crate::executor::{QueryExecutor, Row};

#[derive(Clone)]
pub struct PagingReader {
    executor: Arc<dyn QueryExecutor>,
    provider: PagingQueryProvider,
}

impl std::fmt::Debug for PagingReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagingReader")
            .field("provider", &self.provider)
            .finish_non_exhaustive()
    }
}

impl PagingReader {
    pub fn new(executor: Arc<dyn QueryExecutor>, provider: PagingQueryProvider) -> Self {
        Self { executor, provider }
    }

    pub fn provider(&self) -> &PagingQueryProvider {
        &self.provider
    }

    pub async fn count(&self) -> Result<i64, StoreError> {
        let query = self.provider.generate_count_query();
        self.executor.fetch_count(query.sql(), &query.values()?).await
    }

    /// Read the page described by `request`, with the total row count
    pub async fn read_page(&self, request: &PageRequest) -> Result<Page<Row>, StoreError> {
        let total = self.count().await?;
        let offset = request.offset();

        tracing::debug!(
            page = request.page(),
            size = request.size(),
            total,
            "reading page"
        );

        if offset >= total {
            return Ok(Page::empty(request, total));
        }

        let rows = if request.page() == 0 {
            let query = self.provider.generate_first_page_query(request.size())?;
            self.run(&query, None).await?
        } else {
            let jump = self
                .provider
                .generate_jump_to_item_query(offset, request.size())?;
            match self.run(&jump, None).await?.into_iter().next() {
                Some(resume_row) => self.read_after(&resume_row, request.size()).await?,
                None => Vec::new(),
            }
        };

        Ok(Page::new(rows, request, total))
    }

    /// Up to `page_size` rows after `resume_row` in sort order
    pub async fn read_after(&self, resume_row: &Row, page_size: i64) -> Result<Vec<Row>, StoreError> {
        let query = self.provider.generate_remaining_pages_query(page_size)?;
        self.run(&query, Some(resume_row)).await
    }

    /// Every row, fetched `page_size` rows at a time
    pub async fn read_all(&self, page_size: i64) -> Result<Vec<Row>, StoreError> {
        let first = self.provider.generate_first_page_query(page_size)?;
        let mut page = self.run(&first, None).await?;
        let mut rows = Vec::new();

        loop {
            let full = page.len() as i64 == page_size;
            let last = page.last().cloned();
            rows.append(&mut page);

            match last {
                Some(last) if full => page = self.read_after(&last, page_size).await?,
                _ => break,
            }
        }

        Ok(rows)
    }

    async fn run(&self, query: &GeneratedQuery, resume_row: Option<&Row>) -> Result<Vec<Row>, StoreError> {
        let values = match resume_row {
            Some(row) => query.bind_values(row)?,
            None => query.values()?,
        };
        self.executor.fetch_all(query.sql(), &values).await
    }
}
