use crate::JournalEntry;

/// Page size used when the virtualization control probes with `count == 0`.
pub const DEFAULT_JOURNAL_PAGE_SIZE: usize = 10;

/// Slice of the journal requested by the virtualization control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchRequest {
    /// Index of the first visible row.
    pub start_index: usize,
    /// Number of rows requested, zero meaning the default page size.
    pub count: usize,
}

impl FetchRequest {
    /// Creates a fetch request.
    #[must_use]
    pub fn new(start_index: usize, count: usize) -> Self {
        Self { start_index, count }
    }
}

/// Rows served for one fetch request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchResult {
    /// Visible entries in backend order.
    pub items: Vec<JournalEntry>,
    /// Logical list length as presented to the virtualization control.
    pub total_count: usize,
}

impl FetchResult {
    /// Returns the result served while no workflow instance is assigned.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Backend pagination derived from one fetch request.
///
/// Any window that does not start at row zero reaches one record further back
/// so the first visible row has a predecessor for its relative time metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JournalWindow {
    start_index: usize,
    take: usize,
    backend_skip: usize,
    local_skip: usize,
}

impl JournalWindow {
    /// Computes the backend window for a request.
    #[must_use]
    pub fn for_request(request: FetchRequest) -> Self {
        let take = if request.count == 0 {
            DEFAULT_JOURNAL_PAGE_SIZE
        } else {
            request.count
        };
        let has_probe = request.start_index > 0;

        Self {
            start_index: request.start_index,
            take,
            backend_skip: if has_probe { request.start_index - 1 } else { 0 },
            local_skip: usize::from(has_probe),
        }
    }

    /// Returns the first visible row index.
    #[must_use]
    pub fn start_index(&self) -> usize {
        self.start_index
    }

    /// Returns the backend page size.
    #[must_use]
    pub fn take(&self) -> usize {
        self.take
    }

    /// Returns the backend row offset.
    #[must_use]
    pub fn backend_skip(&self) -> usize {
        self.backend_skip
    }

    /// Returns how many leading fetched records are excluded from the visible rows.
    #[must_use]
    pub fn local_skip(&self) -> usize {
        self.local_skip
    }

    /// Returns whether the window fetches a probe record.
    #[must_use]
    pub fn has_probe(&self) -> bool {
        self.local_skip > 0
    }

    /// Adjusts the backend-reported total for the probe record.
    #[must_use]
    pub fn visible_total_count(&self, raw_total_count: usize) -> usize {
        raw_total_count.saturating_sub(self.local_skip)
    }
}
