//! Layout configuration for the panels and the data viewer overlay.

/// Configuration for the grid table.
#[derive(Debug, Clone)]
pub struct TableLayoutConfig {
    /// Rows lost to borders and the header row.
    pub border_padding: usize,
    /// Width of each column in characters.
    pub column_width: u16,
    /// Maximum number of visible columns.
    pub max_visible_columns: usize,
    /// Width of the row index column.
    pub row_header_width: u16,
}

impl Default for TableLayoutConfig {
    fn default() -> Self {
        Self {
            border_padding: 4,
            column_width: 12,
            max_visible_columns: 20,
            row_header_width: 7,
        }
    }
}

/// Configuration for the paging bar under the grid.
#[derive(Debug, Clone)]
pub struct PagingLayoutConfig {
    /// Height of the bar including its top border.
    pub height: u16,
    /// Width of the page number field.
    pub input_width: usize,
}

impl Default for PagingLayoutConfig {
    fn default() -> Self {
        Self {
            height: 2,
            input_width: 6,
        }
    }
}

/// Configuration for image viewers.
#[derive(Debug, Clone)]
pub struct ImageLayoutConfig {
    /// Largest bitmap width the viewer fits to, in pixels.
    pub max_width: usize,
    /// Largest bitmap height the viewer fits to, in pixels.
    pub max_height: usize,
}

impl Default for ImageLayoutConfig {
    fn default() -> Self {
        Self {
            max_width: 600,
            max_height: 450,
        }
    }
}

/// Configuration for the attribute table.
#[derive(Debug, Clone)]
pub struct AttributeLayoutConfig {
    /// Width of the name column.
    pub name_width: u16,
    /// Width of the type column.
    pub type_width: u16,
    /// Width of the array size column.
    pub size_width: u16,
}

impl Default for AttributeLayoutConfig {
    fn default() -> Self {
        Self {
            name_width: 20,
            type_width: 16,
            size_width: 10,
        }
    }
}

/// Combined layout configuration.
#[derive(Debug, Clone, Default)]
pub struct LayoutConfig {
    /// Grid table.
    pub table: TableLayoutConfig,
    /// Paging bar.
    pub paging: PagingLayoutConfig,
    /// Image viewers.
    pub image: ImageLayoutConfig,
    /// Attribute table.
    pub attributes: AttributeLayoutConfig,
}
