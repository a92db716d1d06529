//! A two-dimensional layout that arranges elements in columns and rows.

use core::num::NonZeroUsize;

use alloc::vec::Vec;

use trellis_core::{
    AnyElement, Axis, Element, ElementContent, ElementKey, Layout, LayoutAttributes,
    LayoutContent, LayoutItem, Point, Rect, Size, SizeConstraint, equivalent_by_value,
};

/// Horizontal placement of a child within its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HorizontalAlignment {
    /// Leading edge.
    #[default]
    Leading,
    /// Centred.
    Center,
    /// Trailing edge.
    Trailing,
    /// Full cell width.
    Fill,
}

/// Vertical placement of a child within its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VerticalAlignment {
    /// Top edge.
    #[default]
    Top,
    /// Centred.
    Center,
    /// Bottom edge.
    Bottom,
    /// Full row height.
    Fill,
}

/// The core layout engine for a [`Grid`].
///
/// Children fill the grid left to right, top to bottom. Every column has the
/// same width: the widest child's natural width, limited to an equal share
/// of the incoming width constraint. Each row is as tall as its tallest cell.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridLayout {
    columns: NonZeroUsize,
    spacing: Size, // (horizontal, vertical)
    horizontal: HorizontalAlignment,
    vertical: VerticalAlignment,
}

impl GridLayout {
    /// Creates a layout with `columns` columns, no spacing and top-leading cells.
    #[must_use]
    pub const fn new(columns: NonZeroUsize) -> Self {
        Self {
            columns,
            spacing: Size::zero(),
            horizontal: HorizontalAlignment::Leading,
            vertical: VerticalAlignment::Top,
        }
    }

    /// The number of columns.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns.get()
    }

    #[allow(clippy::cast_precision_loss)]
    fn column_spacing(&self) -> f32 {
        self.spacing.width * (self.columns.get() - 1) as f32
    }

    #[allow(clippy::cast_precision_loss)]
    fn row_spacing(&self, rows: usize) -> f32 {
        self.spacing.height * rows.saturating_sub(1) as f32
    }

    #[allow(clippy::cast_precision_loss)]
    fn column_width(&self, width: Axis, items: &[LayoutItem<'_, ()>]) -> f32 {
        let natural = items
            .iter()
            .map(|item| item.measure(SizeConstraint::UNCONSTRAINED).width)
            .fold(0.0, f32::max);
        match width.constrained_value() {
            Some(width) => {
                let share = ((width - self.column_spacing()) / self.columns.get() as f32).max(0.0);
                natural.min(share)
            }
            None => natural,
        }
    }

    fn row_heights(&self, sizes: &[Size]) -> Vec<f32> {
        sizes
            .chunks(self.columns.get())
            .map(|row| row.iter().map(|size| size.height).fold(0.0, f32::max))
            .collect()
    }
}

fn cell_sizes(column_width: f32, items: &[LayoutItem<'_, ()>]) -> Vec<Size> {
    let constraint = SizeConstraint::new(Axis::at_most(column_width), Axis::Unconstrained);
    items.iter().map(|item| item.measure(constraint)).collect()
}

#[allow(clippy::cast_precision_loss)]
impl Layout for GridLayout {
    type Traits = ();

    fn measure(&self, constraint: SizeConstraint, items: &[LayoutItem<'_, ()>]) -> Size {
        if items.is_empty() {
            return Size::zero();
        }

        let column_width = self.column_width(constraint.width, items);
        let sizes = cell_sizes(column_width, items);
        let row_heights = self.row_heights(&sizes);

        // Fewer children than columns still reserve every column.
        let width = column_width * self.columns.get() as f32 + self.column_spacing();
        let height = row_heights.iter().sum::<f32>() + self.row_spacing(row_heights.len());
        Size::new(width, height)
    }

    fn layout(&self, size: Size, items: &[LayoutItem<'_, ()>]) -> Vec<LayoutAttributes> {
        if items.is_empty() {
            return Vec::new();
        }

        let columns = self.columns.get();
        let column_width =
            ((size.width - self.column_spacing()) / columns as f32).max(0.0);
        let sizes = cell_sizes(column_width, items);
        let row_heights = self.row_heights(&sizes);

        let mut placements = Vec::with_capacity(items.len());
        let mut cursor_y = 0.0;

        for (row_sizes, row_height) in sizes.chunks(columns).zip(row_heights) {
            let mut cursor_x = 0.0;

            for measured in row_sizes {
                let cell = Rect::new(
                    Point::new(cursor_x, cursor_y),
                    Size::new(column_width, row_height),
                );

                let width = match self.horizontal {
                    HorizontalAlignment::Fill => cell.width(),
                    _ => measured.width.min(cell.width()),
                };
                let height = match self.vertical {
                    VerticalAlignment::Fill => cell.height(),
                    _ => measured.height.min(cell.height()),
                };

                let x = match self.horizontal {
                    HorizontalAlignment::Leading | HorizontalAlignment::Fill => cell.x(),
                    HorizontalAlignment::Center => cell.x() + (cell.width() - width) / 2.0,
                    HorizontalAlignment::Trailing => cell.max_x() - width,
                };
                let y = match self.vertical {
                    VerticalAlignment::Top | VerticalAlignment::Fill => cell.y(),
                    VerticalAlignment::Center => cell.y() + (cell.height() - height) / 2.0,
                    VerticalAlignment::Bottom => cell.max_y() - height,
                };

                placements.push(LayoutAttributes::new(Rect::new(
                    Point::new(x, y),
                    Size::new(width, height),
                )));

                cursor_x += column_width + self.spacing.width;
            }

            cursor_y += row_height + self.spacing.height;
        }

        placements
    }
}

/// A grid of elements with a fixed column count.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    layout: GridLayout,
    children: Vec<(Option<ElementKey>, AnyElement)>,
}

impl Grid {
    /// Creates an empty grid.
    ///
    /// # Panics
    ///
    /// Panics if `columns` is zero.
    #[must_use]
    pub fn new(columns: usize) -> Self {
        let Some(columns) = NonZeroUsize::new(columns) else {
            panic!("a grid needs at least one column");
        };
        Self {
            layout: GridLayout::new(columns),
            children: Vec::new(),
        }
    }

    /// Sets the horizontal and vertical gaps between cells.
    ///
    /// # Panics
    ///
    /// Panics if either gap is negative, NaN, or infinite.
    #[must_use]
    pub fn spacing(mut self, horizontal: f32, vertical: f32) -> Self {
        self.layout.spacing = Size::new(
            crate::checked_spacing(horizontal),
            crate::checked_spacing(vertical),
        );
        self
    }

    /// Sets how children are aligned within their cells.
    #[must_use]
    pub const fn alignment(
        mut self,
        horizontal: HorizontalAlignment,
        vertical: VerticalAlignment,
    ) -> Self {
        self.layout.horizontal = horizontal;
        self.layout.vertical = vertical;
        self
    }

    /// Appends a cell.
    #[must_use]
    pub fn child(mut self, element: impl Into<AnyElement>) -> Self {
        self.children.push((None, element.into()));
        self
    }

    /// Appends a keyed cell.
    #[must_use]
    pub fn keyed_child(mut self, key: impl Into<ElementKey>, element: impl Into<AnyElement>) -> Self {
        self.children.push((Some(key.into()), element.into()));
        self
    }

    /// The layout configuration.
    #[must_use]
    pub const fn layout(&self) -> &GridLayout {
        &self.layout
    }
}

impl Element for Grid {
    fn content(&self) -> ElementContent {
        let mut builder = LayoutContent::builder(self.layout);
        for (key, element) in &self.children {
            builder.add_with((), key.clone(), element.clone());
        }
        builder.build().into()
    }

    fn is_equivalent(&self, other: &dyn Element) -> bool {
        equivalent_by_value(self, other)
    }
}
