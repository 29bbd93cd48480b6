use serde::Serialize;

fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = (current_page + right_current + 1).min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// `"Menampilkan {start} - {end} dari {total} data"` for the table footer.
pub fn page_window_label(page: usize, per_page: usize, total: usize) -> String {
    if total == 0 {
        return "Menampilkan 0 - 0 dari 0 data".to_string();
    }
    let page = page.max(1);
    let start = (page - 1) * per_page + 1;
    let end = (page * per_page).min(total);
    format!("Menampilkan {start} - {end} dari {total} data")
}

/// One page of records together with the paging metadata reported by the
/// backend.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ResultPage<T> {
    pub records: Vec<T>,
    pub total_records: usize,
    /// Never zero; an empty result still has one (empty) page.
    pub total_pages: usize,
    pub page: usize,
    pub per_page: usize,
}

impl<T> ResultPage<T> {
    pub fn new(
        records: Vec<T>,
        total_records: usize,
        total_pages: usize,
        page: usize,
        per_page: usize,
    ) -> Self {
        Self {
            records,
            total_records,
            total_pages: total_pages.max(1),
            page: page.max(1),
            per_page,
        }
    }

    pub fn empty(per_page: usize) -> Self {
        Self::new(Vec::new(), 0, 1, 1, per_page)
    }

    pub fn window_label(&self) -> String {
        page_window_label(self.page, self.per_page, self.total_records)
    }

    pub fn position_label(&self) -> String {
        format!("Halaman {} dari {}", self.page, self.total_pages)
    }

    /// Compact page-number strip; `None` marks a gap.
    pub fn page_strip(&self) -> Vec<Option<usize>> {
        get_pages(self.total_pages, self.page, 1, 1, 1, 1)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_strip_inserts_gaps_around_current_page() {
        assert_eq!(
            get_pages(10, 5, 1, 1, 1, 1),
            vec![
                Some(1),
                None,
                Some(4),
                Some(5),
                Some(6),
                None,
                Some(10)
            ]
        );
        assert_eq!(
            get_pages(3, 1, 1, 1, 1, 1),
            vec![Some(1), Some(2), Some(3)]
        );
        assert!(get_pages(0, 1, 1, 1, 1, 1).is_empty());
    }

    #[test]
    fn window_label_matches_footer_text() {
        assert_eq!(page_window_label(1, 10, 47), "Menampilkan 1 - 10 dari 47 data");
        assert_eq!(page_window_label(5, 10, 47), "Menampilkan 41 - 47 dari 47 data");
        assert_eq!(page_window_label(1, 10, 0), "Menampilkan 0 - 0 dari 0 data");
    }

    #[test]
    fn result_page_never_reports_zero_pages() {
        let page: ResultPage<u8> = ResultPage::new(Vec::new(), 0, 0, 1, 10);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.position_label(), "Halaman 1 dari 1");
        assert!(!page.has_next());
        assert!(!page.has_previous());
    }

    #[test]
    fn result_page_keeps_server_page_count() {
        let page = ResultPage::new(vec![1, 2, 3], 47, 5, 2, 10);
        assert_eq!(page.total_pages, 5);
        assert_eq!(page.window_label(), "Menampilkan 11 - 20 dari 47 data");
        assert!(page.has_next());
        assert!(page.has_previous());
    }
}
