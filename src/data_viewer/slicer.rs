//! Projection of N-D datasets onto a paged 2-D grid.
//!
//! Height is always axis 0, width axis 1 and the page axis 2. Axes past the
//! page axis stay pinned at index 0; there is no control to move them.

use crate::data::{AxisSelector, Container, ObjectPath, ScalarValue, Storage};
use crate::error::{Result, ViewerError};
use crate::navigation::ResolvedObject;
use ndarray::{Array2, ArrayD, Ix2};
use std::path::{Path, PathBuf};

/// Axis shown as grid rows.
pub const HEIGHT_AXIS: usize = 0;
/// Axis shown as grid columns.
pub const WIDTH_AXIS: usize = 1;
/// Axis stepped through by the paging controls.
pub const PAGE_AXIS: usize = 2;

/// Paged 2-D view of one dataset.
#[derive(Debug, Clone)]
pub struct DatasetView {
    source: PathBuf,
    path: ObjectPath,
    shape: Vec<usize>,
    page_index: usize,
    grid: Array2<ScalarValue>,
}

impl DatasetView {
    /// Open a view on `object` and read its first page.
    pub fn open<C: Container>(
        container: &C,
        source: &Path,
        object: &ResolvedObject,
    ) -> Result<Self> {
        let shape = container.shape(&object.path)?;
        let grid = read_grid(container, &object.path, &shape, &selection_for(shape.len(), 0))?;
        tracing::debug!("Opened view on {} with shape {:?}", object.path, shape);
        Ok(Self {
            source: source.to_path_buf(),
            path: object.path.clone(),
            shape,
            page_index: 0,
            grid,
        })
    }

    /// Dataset name (last path segment).
    pub fn name(&self) -> &str {
        self.path.name().unwrap_or("/")
    }

    /// Dataset path inside the file.
    pub fn path(&self) -> &ObjectPath {
        &self.path
    }

    /// File the dataset was read from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Dataset shape.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Whether the dataset holds no elements.
    pub fn is_empty(&self) -> bool {
        self.shape.iter().any(|&len| len == 0)
    }

    /// Whether the page axis exists and paging controls apply.
    pub fn has_paging(&self) -> bool {
        self.rank() > PAGE_AXIS
    }

    /// Number of pages along the page axis, when paging applies.
    pub fn page_count(&self) -> Option<usize> {
        self.has_paging().then(|| self.shape[PAGE_AXIS])
    }

    /// Index of the current page.
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Number of grid rows.
    pub fn rows(&self) -> usize {
        self.grid.nrows()
    }

    /// Number of grid columns.
    pub fn cols(&self) -> usize {
        self.grid.ncols()
    }

    /// Cells of the current page.
    pub fn grid(&self) -> &Array2<ScalarValue> {
        &self.grid
    }

    /// Cell at `(row, col)` of the current page.
    pub fn cell(&self, row: usize, col: usize) -> Option<&ScalarValue> {
        self.grid.get((row, col))
    }

    /// Fixed-index list selecting `page` (one selector per axis).
    pub fn selection(&self, page: usize) -> Vec<AxisSelector> {
        selection_for(self.rank(), page)
    }

    /// Move `delta` pages.
    ///
    /// Moves that would land below 0 or at/after the page count are refused
    /// and return `Ok(false)`; the view is unchanged.
    pub fn advance<S: Storage>(&mut self, storage: &S, delta: isize) -> Result<bool> {
        let Some(count) = self.page_count().filter(|_| !self.is_empty()) else {
            return Ok(false);
        };
        let target = (self.page_index as isize)
            .checked_add(delta)
            .filter(|&t| delta != 0 && t >= 0 && (t as usize) < count);
        let Some(target) = target else {
            tracing::debug!("Page move {} from {} refused", delta, self.page_index);
            return Ok(false);
        };
        self.load_page(storage, target as usize)?;
        Ok(true)
    }

    /// Jump to `target` if it is a valid page index; otherwise ignored.
    pub fn jump_to<S: Storage>(&mut self, storage: &S, target: i64) -> Result<bool> {
        let Some(count) = self.page_count().filter(|_| !self.is_empty()) else {
            return Ok(false);
        };
        if target < 0 || target > count as i64 - 1 {
            tracing::debug!("Page jump to {} refused", target);
            return Ok(false);
        }
        self.load_page(storage, target as usize)?;
        Ok(true)
    }

    /// Current page as tab-separated text.
    pub fn to_tsv(&self) -> String {
        let mut out = String::new();
        for row in self.grid.rows() {
            let line: Vec<String> = row.iter().map(ToString::to_string).collect();
            out.push_str(&line.join("\t"));
            out.push('\n');
        }
        out
    }

    fn load_page<S: Storage>(&mut self, storage: &S, page: usize) -> Result<()> {
        let container = storage.open(&self.source)?;
        let grid = read_grid(&container, &self.path, &self.shape, &self.selection(page))?;
        self.grid = grid;
        self.page_index = page;
        tracing::debug!("{} now on page {}", self.path, page);
        Ok(())
    }
}

fn selection_for(rank: usize, page: usize) -> Vec<AxisSelector> {
    (0..rank)
        .map(|axis| match axis {
            HEIGHT_AXIS | WIDTH_AXIS => AxisSelector::Free,
            PAGE_AXIS => AxisSelector::Fixed(page),
            _ => AxisSelector::Fixed(0),
        })
        .collect()
}

/// Read exactly the cells picked by `selection`.
fn read_grid<C: Container>(
    container: &C,
    path: &ObjectPath,
    shape: &[usize],
    selection: &[AxisSelector],
) -> Result<Array2<ScalarValue>> {
    if shape.iter().any(|&len| len == 0) {
        let cols = shape.get(WIDTH_AXIS).copied().unwrap_or(1);
        return Array2::from_shape_vec((0, cols), Vec::new())
            .map_err(|e| ViewerError::Storage(e.to_string()));
    }

    let slice = container.read_slice(path, selection)?;
    into_grid(slice)
}

/// Reshape a read slice with at most two axes into a grid.
fn into_grid(slice: ArrayD<ScalarValue>) -> Result<Array2<ScalarValue>> {
    match slice.ndim() {
        0 => {
            let values = slice.into_raw_vec_and_offset().0;
            Array2::from_shape_vec((1, 1), values).map_err(|e| ViewerError::Storage(e.to_string()))
        },
        1 => {
            let rows = slice.len();
            slice
                .into_shape_with_order((rows, 1))
                .map_err(|e| ViewerError::Storage(e.to_string()))
        },
        2 => slice
            .into_dimensionality::<Ix2>()
            .map_err(|e| ViewerError::Storage(e.to_string())),
        n => Err(ViewerError::Storage(format!(
            "slice has {} free axes, expected at most 2",
            n
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::{MemoryDataset, MemoryGroup, MemoryStorage};
    use crate::data::NodeKind;

    const FILE: &str = "cube.h5";

    fn storage_with(shape: &[usize]) -> MemoryStorage {
        let root = MemoryGroup::new().with_dataset("d", MemoryDataset::iota(shape));
        MemoryStorage::new().with_file(FILE, root)
    }

    fn open(storage: &MemoryStorage) -> DatasetView {
        let container = storage.open(Path::new(FILE)).unwrap();
        let object = ResolvedObject {
            path: ObjectPath::parse("d"),
            kind: NodeKind::Dataset,
        };
        DatasetView::open(&container, Path::new(FILE), &object).unwrap()
    }

    fn flat(shape: &[usize], index: &[usize]) -> i64 {
        let mut offset = 0;
        for (len, i) in shape.iter().zip(index) {
            offset = offset * len + i;
        }
        offset as i64
    }

    #[test]
    fn rank_one_is_a_single_column() {
        let storage = storage_with(&[5]);
        let view = open(&storage);

        assert_eq!((view.rows(), view.cols()), (5, 1));
        for i in 0..5 {
            assert_eq!(view.cell(i, 0), Some(&ScalarValue::Int(i as i64)));
        }
        assert!(!view.has_paging());
    }

    #[test]
    fn rank_two_matches_pairwise() {
        let storage = storage_with(&[3, 4]);
        let view = open(&storage);

        assert_eq!((view.rows(), view.cols()), (3, 4));
        for i in 0..3 {
            for j in 0..4 {
                assert_eq!(view.cell(i, j), Some(&ScalarValue::Int(flat(&[3, 4], &[i, j]))));
            }
        }
        assert_eq!(view.page_count(), None);
    }

    #[test]
    fn rank_three_pages_through_axis_two() {
        let shape = [2, 3, 4];
        let storage = storage_with(&shape);
        let mut view = open(&storage);
        assert_eq!(view.page_count(), Some(4));

        for k in 0..3 {
            assert!(view.advance(&storage, 1).unwrap());
            assert_eq!(view.page_index(), k + 1);
            for i in 0..2 {
                for j in 0..3 {
                    assert_eq!(
                        view.cell(i, j),
                        Some(&ScalarValue::Int(flat(&shape, &[i, j, k + 1])))
                    );
                }
            }
        }
    }

    #[test]
    fn advance_refuses_past_either_end() {
        let storage = storage_with(&[2, 2, 3]);
        let mut view = open(&storage);
        let first = view.grid().clone();

        assert!(!view.advance(&storage, -1).unwrap());
        assert_eq!(view.page_index(), 0);
        assert_eq!(view.grid(), &first);

        assert!(view.advance(&storage, 2).unwrap());
        assert_eq!(view.page_index(), 2);
        assert!(!view.advance(&storage, 1).unwrap());
        assert_eq!(view.page_index(), 2);
        assert!(!view.advance(&storage, -5).unwrap());
        assert_eq!(view.page_index(), 2);
    }

    #[test]
    fn huge_moves_are_refused() {
        let storage = storage_with(&[2, 2, 3]);
        let mut view = open(&storage);
        assert!(view.advance(&storage, 1).unwrap());
        let page = view.grid().clone();

        assert!(!view.advance(&storage, isize::MAX).unwrap());
        assert_eq!(view.page_index(), 1);
        assert!(!view.advance(&storage, isize::MIN).unwrap());
        assert_eq!(view.page_index(), 1);
        assert_eq!(view.grid(), &page);
    }

    #[test]
    fn jump_to_ignores_out_of_range_targets() {
        let storage = storage_with(&[2, 2, 3]);
        let mut view = open(&storage);

        assert!(view.jump_to(&storage, 2).unwrap());
        assert_eq!(view.page_index(), 2);
        assert!(!view.jump_to(&storage, 3).unwrap());
        assert!(!view.jump_to(&storage, -1).unwrap());
        assert_eq!(view.page_index(), 2);
        assert!(view.jump_to(&storage, 0).unwrap());
        assert_eq!(view.page_index(), 0);
    }

    #[test]
    fn higher_axes_are_pinned_at_zero() {
        let shape = [2, 2, 3, 5, 2];
        let storage = storage_with(&shape);
        let mut view = open(&storage);
        assert!(view.jump_to(&storage, 1).unwrap());

        assert_eq!(
            view.selection(1),
            vec![
                AxisSelector::Free,
                AxisSelector::Free,
                AxisSelector::Fixed(1),
                AxisSelector::Fixed(0),
                AxisSelector::Fixed(0),
            ]
        );
        assert_eq!(
            view.cell(1, 1),
            Some(&ScalarValue::Int(flat(&shape, &[1, 1, 1, 0, 0])))
        );
        assert_eq!((view.rows(), view.cols()), (2, 2));
    }

    #[test]
    fn paging_is_refused_without_a_page_axis() {
        let storage = storage_with(&[3, 3]);
        let mut view = open(&storage);
        assert!(!view.advance(&storage, 1).unwrap());
        assert!(!view.jump_to(&storage, 0).unwrap());
    }

    #[test]
    fn failed_reread_keeps_current_page() {
        let mut storage = storage_with(&[2, 2, 3]);
        let mut view = open(&storage);
        let before = view.grid().clone();

        storage.set_file(FILE, None);
        assert!(view.advance(&storage, 1).is_err());
        assert_eq!(view.page_index(), 0);
        assert_eq!(view.grid(), &before);
    }

    #[test]
    fn page_change_releases_the_file() {
        let storage = storage_with(&[2, 2, 3]);
        let mut view = open(&storage);
        view.advance(&storage, 1).unwrap();
        assert_eq!(storage.open_handles(), 0);
    }

    #[test]
    fn empty_dataset_has_no_rows_and_no_pages_to_move_to() {
        let storage = storage_with(&[0, 4, 2]);
        let mut view = open(&storage);
        assert_eq!(view.rows(), 0);
        assert!(view.is_empty());
        assert!(!view.advance(&storage, 1).unwrap());
        assert!(!view.jump_to(&storage, 1).unwrap());
        assert_eq!(view.page_index(), 0);
    }

    #[test]
    fn scalar_dataset_is_one_cell() {
        let root = MemoryGroup::new().with_dataset(
            "d",
            MemoryDataset::from_shape(&[], vec![ScalarValue::Float(2.5)]).unwrap(),
        );
        let storage = MemoryStorage::new().with_file(FILE, root);
        let view = open(&storage);
        assert_eq!((view.rows(), view.cols()), (1, 1));
        assert_eq!(view.to_tsv(), "2.5\n");
    }

    #[test]
    fn tsv_has_one_line_per_row() {
        let storage = storage_with(&[2, 3]);
        let view = open(&storage);
        assert_eq!(view.to_tsv(), "0\t1\t2\n3\t4\t5\n");
    }
}
