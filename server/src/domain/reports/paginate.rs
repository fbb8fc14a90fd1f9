//! Pagination facet

/// One page of a sorted result set plus the size of the whole set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub total_count: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            rows: self.rows.into_iter().map(f).collect(),
            total_count: self.total_count,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
        }
    }
}

/// Slice `rows` to `page` (1-based)
///
/// `page` and `page_size` below 1 are treated as 1. A page past the end is
/// empty but still reports the full count.
pub fn paginate<T>(rows: Vec<T>, page: u32, page_size: u32) -> Page<T> {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total_count = rows.len() as u64;
    let skip = (page as usize - 1).saturating_mul(page_size as usize);

    let rows: Vec<T> = rows.into_iter().skip(skip).take(page_size as usize).collect();

    Page {
        rows,
        total_count,
        page,
        page_size,
        total_pages: total_count.div_ceil(page_size as u64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page() {
        let p = paginate((1..=45).collect::<Vec<_>>(), 1, 20);
        assert_eq!(p.rows, (1..=20).collect::<Vec<_>>());
        assert_eq!(p.total_count, 45);
        assert_eq!(p.total_pages, 3);
    }

    #[test]
    fn test_last_partial_page() {
        let p = paginate((1..=45).collect::<Vec<_>>(), 3, 20);
        assert_eq!(p.rows, (41..=45).collect::<Vec<_>>());
        assert_eq!(p.page, 3);
    }

    #[test]
    fn test_page_past_end_keeps_total() {
        let p = paginate(vec!["a", "b", "c"], 5, 2);
        assert!(p.rows.is_empty());
        assert_eq!(p.total_count, 3);
        assert_eq!(p.total_pages, 2);
    }

    #[test]
    fn test_empty_input() {
        let p = paginate(Vec::<u8>::new(), 1, 20);
        assert!(p.rows.is_empty());
        assert_eq!(p.total_count, 0);
        assert_eq!(p.total_pages, 0);
    }

    #[test]
    fn test_zero_inputs_clamped() {
        let p = paginate(vec![1, 2, 3], 0, 0);
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, 1);
        assert_eq!(p.rows, vec![1]);
        assert_eq!(p.total_pages, 3);
    }

    #[test]
    fn test_row_count_property() {
        for total in 0..30usize {
            for size in 1..7u32 {
                for page in 1..8u32 {
                    let p = paginate(vec![0; total], page, size);
                    let skip = (page - 1) as usize * size as usize;
                    let expected = total.saturating_sub(skip).min(size as usize);
                    assert_eq!(p.rows.len(), expected);
                    assert_eq!(p.total_pages, (total as u64).div_ceil(size as u64));
                }
            }
        }
    }

    #[test]
    fn test_map_keeps_meta() {
        let p = paginate(vec![1, 2, 3], 2, 2).map(|n| n * 10);
        assert_eq!(p.rows, vec![30]);
        assert_eq!(p.total_count, 3);
        assert_eq!(p.page, 2);
    }
}
