//! Fixed-size paging over trip rows.
//!
//! When the row count is not a multiple of [`CHUNK_SIZE`] the final chunk is
//! clamped to the rows that remain; it is never padded and never an error.

use std::iter::FusedIterator;

use crate::table::TripRecord;

pub const CHUNK_SIZE: usize = 5;

/// Consecutive rows shown together.
#[derive(Debug, Clone, Copy)]
pub struct Chunk<'a> {
    /// Position of the first row within the table.
    pub start: usize,
    pub rows: &'a [TripRecord],
}

/// One-shot iterator over [`Chunk`]s of at most [`CHUNK_SIZE`] rows.
#[derive(Debug)]
pub struct RowPager<'a> {
    rows: &'a [TripRecord],
    next: usize,
}

impl<'a> RowPager<'a> {
    pub fn new(rows: &'a [TripRecord]) -> Self {
        Self { rows, next: 0 }
    }

    /// Rows not yet handed out.
    pub fn remaining(&self) -> usize {
        self.rows.len() - self.next
    }
}

impl<'a> Iterator for RowPager<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.rows.len() {
            return None;
        }
        let start = self.next;
        let end = (start + CHUNK_SIZE).min(self.rows.len());
        self.next = end;
        Some(Chunk {
            start,
            rows: &self.rows[start..end],
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let chunks = self.remaining().div_ceil(CHUNK_SIZE);
        (chunks, Some(chunks))
    }
}

impl ExactSizeIterator for RowPager<'_> {}

impl FusedIterator for RowPager<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::read_trips;
    use std::path::Path;

    fn rows(n: usize) -> Vec<TripRecord> {
        let mut csv = String::from("Start Time,Trip Duration,Start Station,End Station,User Type\n");
        for i in 0..n {
            csv.push_str(&format!("2017-01-02 08:05:00,{i},A,B,Subscriber\n"));
        }
        read_trips(csv.as_bytes(), Path::new("pager.csv"))
            .unwrap()
            .rows()
            .to_vec()
    }

    fn chunk_sizes(rows: &[TripRecord]) -> Vec<usize> {
        RowPager::new(rows).map(|c| c.rows.len()).collect()
    }

    #[test]
    fn test_seven_rows_clamp_last_chunk() {
        let rows = rows(7);
        assert_eq!(chunk_sizes(&rows), vec![5, 2]);

        let last = RowPager::new(&rows).last().unwrap();
        assert_eq!(last.start, 5);
        assert_eq!(last.rows[1].trip_duration, 6.0);
    }

    #[test]
    fn test_ten_rows_two_full_chunks() {
        assert_eq!(chunk_sizes(&rows(10)), vec![5, 5]);
    }

    #[test]
    fn test_empty_table_has_no_chunks() {
        assert!(chunk_sizes(&rows(0)).is_empty());
    }

    #[test]
    fn test_pager_is_one_shot() {
        let rows = rows(3);
        let mut pager = RowPager::new(&rows);
        assert_eq!(pager.len(), 1);
        assert!(pager.next().is_some());
        assert!(pager.next().is_none());
        assert!(pager.next().is_none());
        assert_eq!(pager.remaining(), 0);
    }

    #[test]
    fn test_chunks_keep_row_order() {
        let rows = rows(6);
        let starts: Vec<usize> = RowPager::new(&rows).map(|c| c.start).collect();
        assert_eq!(starts, vec![0, 5]);
        let first = RowPager::new(&rows).next().unwrap();
        let durations: Vec<f64> = first.rows.iter().map(|r| r.trip_duration).collect();
        assert_eq!(durations, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }
}
