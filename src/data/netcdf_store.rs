//! File backend built on the netCDF-4 library.
//!
//! netCDF-4 files are HDF5 files, and the library reads most plain HDF5
//! containers as well. Variables map to datasets and groups to groups.

use super::storage::{
    selection_shape, validate_selection, AxisSelector, ChildEntry, Container, Storage,
};
use super::{AttributeValue, NodeKind, ObjectPath, ScalarValue};
use crate::error::{Result, ViewerError};
use ndarray::{ArrayD, IxDyn};
use netcdf::types::{FloatType, IntType, NcVariableType};
use netcdf::{Extent, Extents};
use std::path::Path;

/// Storage backed by `netcdf::open`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetcdfStorage;

impl Storage for NetcdfStorage {
    type Container = NetcdfContainer;

    fn open(&self, path: &Path) -> Result<NetcdfContainer> {
        let file = netcdf::open(path).map_err(|e| ViewerError::open(path, e))?;
        tracing::debug!("Opened {}", path.display());
        Ok(NetcdfContainer { file })
    }
}

/// One open netCDF/HDF5 file. Closed on drop.
pub struct NetcdfContainer {
    file: netcdf::File,
}

impl std::fmt::Debug for NetcdfContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetcdfContainer").finish_non_exhaustive()
    }
}

impl NetcdfContainer {
    fn variable(&self, at: &ObjectPath) -> Option<netcdf::Variable<'_>> {
        if at.is_root() {
            return None;
        }
        self.file.variable(&at.relative())
    }

    fn require_variable(&self, at: &ObjectPath) -> Result<netcdf::Variable<'_>> {
        self.variable(at)
            .ok_or_else(|| ViewerError::Storage(format!("Variable '{}' not found", at)))
    }

    fn group(&self, at: &ObjectPath) -> Result<netcdf::Group<'_>> {
        let group = if at.is_root() {
            self.file.root()
        } else {
            self.file.group(&at.relative())?
        };
        group.ok_or_else(|| ViewerError::Storage(format!("Group '{}' not found", at)))
    }
}

impl Container for NetcdfContainer {
    fn list_children(&self, at: &ObjectPath) -> Result<Vec<ChildEntry>> {
        if self.variable(at).is_some() {
            return Ok(Vec::new());
        }
        let group = self.group(at)?;

        let mut children: Vec<ChildEntry> = group
            .variables()
            .map(|var| ChildEntry::new(var.name(), NodeKind::Dataset))
            .collect();
        children.extend(
            group
                .groups()
                .map(|g| ChildEntry::new(g.name(), NodeKind::Group)),
        );
        Ok(children)
    }

    fn attributes(&self, at: &ObjectPath) -> Result<Vec<(String, AttributeValue)>> {
        let attrs: Vec<(String, AttributeValue)> = if let Some(var) = self.variable(at) {
            var.attributes()
                .map(|attr| (attr.name().to_string(), convert_attribute(&attr)))
                .collect()
        } else {
            self.group(at)?
                .attributes()
                .map(|attr| (attr.name().to_string(), convert_attribute(&attr)))
                .collect()
        };
        Ok(attrs)
    }

    fn shape(&self, at: &ObjectPath) -> Result<Vec<usize>> {
        let var = self.require_variable(at)?;
        Ok(var.dimensions().iter().map(|d| d.len()).collect())
    }

    fn read_slice(
        &self,
        at: &ObjectPath,
        selection: &[AxisSelector],
    ) -> Result<ArrayD<ScalarValue>> {
        let var = self.require_variable(at)?;
        let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
        validate_selection(&shape, selection)?;

        let out_shape = selection_shape(&shape, selection);
        if out_shape.iter().any(|&len| len == 0) {
            return ArrayD::from_shape_vec(IxDyn(&out_shape), Vec::new())
                .map_err(|e| ViewerError::Storage(e.to_string()));
        }

        let values = read_values(&var, &shape, selection)?;
        ArrayD::from_shape_vec(IxDyn(&out_shape), values)
            .map_err(|e| ViewerError::Storage(format!("Invalid shape/data size: {}", e)))
    }
}

fn extents(shape: &[usize], selection: &[AxisSelector]) -> Extents {
    let ranges: Vec<Extent> = shape
        .iter()
        .zip(selection)
        .map(|(&len, sel)| {
            let (start, count) = sel.extent(len);
            Extent::from(start..start + count)
        })
        .collect();
    Extents::from(ranges)
}

macro_rules! read_as {
    ($var:expr, $extents:expr, $t:ty, $wrap:expr) => {{
        let values: Vec<$t> = $var.get_values::<$t, _>($extents)?;
        values.into_iter().map($wrap).collect::<Vec<ScalarValue>>()
    }};
}

fn read_values(
    var: &netcdf::Variable<'_>,
    shape: &[usize],
    selection: &[AxisSelector],
) -> Result<Vec<ScalarValue>> {
    let ext = extents(shape, selection);
    let vartype = var.vartype();

    let values = match vartype {
        NcVariableType::Float(FloatType::F64) => read_as!(var, ext, f64, ScalarValue::Float),
        NcVariableType::Float(FloatType::F32) => {
            read_as!(var, ext, f32, |v| ScalarValue::Float(v as f64))
        },
        NcVariableType::Int(IntType::I64) => read_as!(var, ext, i64, ScalarValue::Int),
        NcVariableType::Int(IntType::I32) => {
            read_as!(var, ext, i32, |v| ScalarValue::Int(v as i64))
        },
        NcVariableType::Int(IntType::I16) => {
            read_as!(var, ext, i16, |v| ScalarValue::Int(v as i64))
        },
        NcVariableType::Int(IntType::I8) => {
            read_as!(var, ext, i8, |v| ScalarValue::Int(v as i64))
        },
        NcVariableType::Int(IntType::U64) => read_as!(var, ext, u64, ScalarValue::UInt),
        NcVariableType::Int(IntType::U32) => {
            read_as!(var, ext, u32, |v| ScalarValue::UInt(v as u64))
        },
        NcVariableType::Int(IntType::U16) => {
            read_as!(var, ext, u16, |v| ScalarValue::UInt(v as u64))
        },
        NcVariableType::Int(IntType::U8) => {
            read_as!(var, ext, u8, |v| ScalarValue::UInt(v as u64))
        },
        NcVariableType::Char | NcVariableType::String => {
            return Err(ViewerError::UnsupportedType(
                "character/string datasets cannot be tabulated".to_string(),
            ));
        },
        other => {
            return Err(ViewerError::UnsupportedType(format!("{:?}", other)));
        },
    };
    Ok(values)
}

fn convert_attribute(attr: &netcdf::Attribute<'_>) -> AttributeValue {
    use netcdf::AttributeValue as Nc;

    fn array<T>(values: Vec<T>, wrap: impl Fn(T) -> ScalarValue) -> AttributeValue {
        AttributeValue::Array(values.into_iter().map(wrap).collect())
    }

    match attr.value() {
        Ok(Nc::Uchar(v)) => ScalarValue::UInt(v as u64).into(),
        Ok(Nc::Schar(v)) => ScalarValue::Int(v as i64).into(),
        Ok(Nc::Ushort(v)) => ScalarValue::UInt(v as u64).into(),
        Ok(Nc::Short(v)) => ScalarValue::Int(v as i64).into(),
        Ok(Nc::Uint(v)) => ScalarValue::UInt(v as u64).into(),
        Ok(Nc::Int(v)) => ScalarValue::Int(v as i64).into(),
        Ok(Nc::Ulonglong(v)) => ScalarValue::UInt(v).into(),
        Ok(Nc::Longlong(v)) => ScalarValue::Int(v).into(),
        Ok(Nc::Float(v)) => ScalarValue::Float(v as f64).into(),
        Ok(Nc::Double(v)) => ScalarValue::Float(v).into(),
        Ok(Nc::Str(v)) => ScalarValue::Bytes(v.into_bytes()).into(),
        Ok(Nc::Uchars(v)) => array(v, |x| ScalarValue::UInt(x as u64)),
        Ok(Nc::Schars(v)) => array(v, |x| ScalarValue::Int(x as i64)),
        Ok(Nc::Ushorts(v)) => array(v, |x| ScalarValue::UInt(x as u64)),
        Ok(Nc::Shorts(v)) => array(v, |x| ScalarValue::Int(x as i64)),
        Ok(Nc::Uints(v)) => array(v, |x| ScalarValue::UInt(x as u64)),
        Ok(Nc::Ints(v)) => array(v, |x| ScalarValue::Int(x as i64)),
        Ok(Nc::Ulonglongs(v)) => array(v, ScalarValue::UInt),
        Ok(Nc::Longlongs(v)) => array(v, ScalarValue::Int),
        Ok(Nc::Floats(v)) => array(v, |x| ScalarValue::Float(x as f64)),
        Ok(Nc::Doubles(v)) => array(v, ScalarValue::Float),
        Ok(Nc::Strs(v)) => array(v, |s| ScalarValue::Bytes(s.into_bytes())),
        Err(e) => {
            tracing::warn!("Unreadable attribute '{}': {}", attr.name(), e);
            ScalarValue::Bytes(format!("<unreadable: {}>", e).into_bytes()).into()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::attributes::project;
    use crate::data::{Node, ValueKind};
    use crate::data_viewer::image::classify;
    use crate::data_viewer::slicer::DatasetView;
    use crate::navigation::{build_tree, resolve, ResolvedObject};
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// `survey.nc`:
    ///
    /// ```text
    /// /            title="survey", sources=["a", "b"]
    /// ├── scalar   f64, rank 0
    /// └── g1/
    ///     ├── cube     i16 (2, 3, 4), valid_range=[0.5, 2.0]
    ///     ├── preview  u8 (2, 3), CLASS="IMAGE\0\0"
    ///     └── sub/
    /// ```
    fn survey() -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("survey.nc");

        let mut file = netcdf::create(&path).unwrap();
        file.add_dimension("y", 2).unwrap();
        file.add_dimension("x", 3).unwrap();
        file.add_dimension("t", 4).unwrap();
        file.add_attribute("title", "survey").unwrap();
        file.add_attribute("sources", vec!["a", "b"]).unwrap();

        {
            // Group added before the root variable; listing still puts it last.
            let mut g1 = file.add_group("g1").unwrap();
            g1.add_group("sub").unwrap();

            let values: Vec<i16> = (0..24).collect();
            let mut cube = g1.add_variable::<i16>("cube", &["y", "x", "t"]).unwrap();
            cube.put_values::<i16, _>(&values, ..).unwrap();
            cube.put_attribute("valid_range", vec![0.5f32, 2.0]).unwrap();

            let mut preview = g1.add_variable::<u8>("preview", &["y", "x"]).unwrap();
            preview.put_values::<u8, _>(&[0, 64, 128, 255, 32, 16], ..).unwrap();
            preview.put_attribute("CLASS", "IMAGE\0\0").unwrap();
        }

        let mut scalar = file.add_variable::<f64>("scalar", &[]).unwrap();
        scalar.put_value(2.5f64, ()).unwrap();
        drop(file);

        (dir, path)
    }

    fn child_names(node: &Node) -> Vec<&str> {
        node.children.iter().map(Node::name).collect()
    }

    fn locate(container: &NetcdfContainer, tree: &Node, path: &str) -> ResolvedObject {
        let node = tree.find(path).unwrap();
        resolve(container, node).unwrap()
    }

    #[test]
    fn variables_are_listed_before_groups() {
        let (_dir, path) = survey();
        let container = NetcdfStorage.open(&path).unwrap();
        let tree = build_tree(&container, "survey.nc").unwrap();

        assert_eq!(child_names(&tree), vec!["scalar", "g1"]);
        let g1 = &tree.children[1];
        assert_eq!(child_names(g1), vec!["cube", "preview", "sub"]);
        assert_eq!(g1.kind, NodeKind::Group);
        assert_eq!(g1.children[0].kind, NodeKind::Dataset);
        assert_eq!(g1.children[2].kind, NodeKind::Group);
        assert_eq!(tree.count(), 6);
    }

    #[test]
    fn attributes_convert_strings_and_arrays() {
        let (_dir, path) = survey();
        let container = NetcdfStorage.open(&path).unwrap();

        let root = project(&container, &ResolvedObject::root()).unwrap();
        assert_eq!(root[0].name, "title");
        assert_eq!(root[0].kind, ValueKind::ByteString);
        assert_eq!(root[0].display_text, "survey");
        assert_eq!(root[1].kind, ValueKind::Array);
        assert_eq!(root[1].display_text, "a, b");
        assert_eq!(root[1].length, 2);

        let tree = build_tree(&container, "survey.nc").unwrap();
        let cube = locate(&container, &tree, "/g1/cube");
        let entries = project(&container, &cube).unwrap();
        assert_eq!(entries[0].name, "valid_range");
        assert_eq!(entries[0].type_label(), "Array (float)");
        assert_eq!(entries[0].display_text, "0.5, 2");
    }

    #[test]
    fn padded_class_attribute_marks_an_image() {
        let (_dir, path) = survey();
        let container = NetcdfStorage.open(&path).unwrap();
        let tree = build_tree(&container, "survey.nc").unwrap();

        let preview = locate(&container, &tree, "/g1/preview");
        assert!(classify(&container, &preview).unwrap());
        let cube = locate(&container, &tree, "/g1/cube");
        assert!(!classify(&container, &cube).unwrap());

        let entries = project(&container, &preview).unwrap();
        assert_eq!(entries[0].display_text, "IMAGE");
    }

    #[test]
    fn cube_pages_through_the_third_axis() {
        let (_dir, path) = survey();
        let storage = NetcdfStorage;
        let container = storage.open(&path).unwrap();
        let tree = build_tree(&container, "survey.nc").unwrap();
        let cube = locate(&container, &tree, "/g1/cube");

        let mut view = DatasetView::open(&container, &path, &cube).unwrap();
        drop(container);
        assert_eq!((view.rows(), view.cols()), (2, 3));
        assert_eq!(view.page_count(), Some(4));
        // cell (y, x) on page t holds y * 12 + x * 4 + t
        assert_eq!(view.cell(1, 2), Some(&ScalarValue::Int(20)));

        assert!(view.advance(&storage, 1).unwrap());
        assert_eq!(view.cell(1, 2), Some(&ScalarValue::Int(21)));
        assert!(view.jump_to(&storage, 3).unwrap());
        assert_eq!(view.cell(0, 1), Some(&ScalarValue::Int(7)));
        assert!(!view.advance(&storage, 1).unwrap());
        assert_eq!(view.page_index(), 3);
    }

    #[test]
    fn unsigned_bytes_read_as_uint() {
        let (_dir, path) = survey();
        let container = NetcdfStorage.open(&path).unwrap();

        let row = container
            .read_slice(
                &ObjectPath::parse("g1/preview"),
                &[AxisSelector::Fixed(1), AxisSelector::Free],
            )
            .unwrap();
        let values: Vec<ScalarValue> = row.iter().cloned().collect();
        assert_eq!(
            values,
            vec![
                ScalarValue::UInt(255),
                ScalarValue::UInt(32),
                ScalarValue::UInt(16)
            ]
        );
    }

    #[test]
    fn scalar_variable_reads_with_an_empty_selection() {
        let (_dir, path) = survey();
        let container = NetcdfStorage.open(&path).unwrap();
        let scalar = ObjectPath::parse("scalar");

        assert!(container.shape(&scalar).unwrap().is_empty());
        assert!(container.list_children(&scalar).unwrap().is_empty());
        let value = container.read_slice(&scalar, &[]).unwrap();
        assert_eq!(value.ndim(), 0);
        assert_eq!(value.iter().next(), Some(&ScalarValue::Float(2.5)));
    }

    #[test]
    fn missing_objects_and_files_fail() {
        let (dir, path) = survey();
        let container = NetcdfStorage.open(&path).unwrap();
        assert!(matches!(
            container.shape(&ObjectPath::parse("g1/nothing")),
            Err(ViewerError::Storage(_))
        ));
        assert!(container
            .read_slice(&ObjectPath::parse("scalar"), &[AxisSelector::Free])
            .is_err());

        let missing = dir.path().join("missing.h5");
        assert!(matches!(
            NetcdfStorage.open(&missing),
            Err(ViewerError::Open { .. })
        ));
    }

    #[test]
    fn extents_span_free_axes_and_pin_fixed_ones() {
        let selection = [
            AxisSelector::Free,
            AxisSelector::Free,
            AxisSelector::Fixed(2),
        ];
        let Extents::Extent(ranges) = extents(&[2, 3, 4], &selection) else {
            panic!("expected explicit extents");
        };
        let bounds: Vec<(usize, usize)> = ranges
            .iter()
            .map(|extent| match *extent {
                Extent::SliceEnd { start, end, .. } => (start, end),
                other => panic!("unexpected extent {:?}", other),
            })
            .collect();
        assert_eq!(bounds, vec![(0, 2), (0, 3), (2, 3)]);

        let Extents::Extent(ranges) = extents(&[], &[]) else {
            panic!("expected explicit extents");
        };
        assert!(ranges.is_empty());
    }
}
