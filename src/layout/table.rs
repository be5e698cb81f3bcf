//! Grid tables with spanning cells, per-side borders and repeated header rows.

use super::{
    Content, DrawContext, Drawable, HorizontalAlignment, Margins, Positioning, VerticalAlignment,
};
use crate::{block::Block, colour::Colour, colours, content::Op, units::Pt, Document, PDFError};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum BorderStyle {
    #[default]
    None,
    Single,
    /// Two parallel strokes, one border width apart
    Double,
}

/// One side of a cell's border
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CellBorder {
    pub style: BorderStyle,
    pub width: Pt,
    pub colour: Colour,
}

impl Default for CellBorder {
    fn default() -> Self {
        CellBorder {
            style: BorderStyle::None,
            width: Pt(1.0),
            colour: colours::BLACK,
        }
    }
}

impl CellBorder {
    pub fn single(width: Pt, colour: Colour) -> CellBorder {
        CellBorder {
            style: BorderStyle::Single,
            width,
            colour,
        }
    }

    pub fn double(width: Pt, colour: Colour) -> CellBorder {
        CellBorder {
            style: BorderStyle::Double,
            width,
            colour,
        }
    }

    fn is_visible(&self) -> bool {
        self.style != BorderStyle::None && self.width > Pt::ZERO
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct CellBorders {
    pub top: CellBorder,
    pub right: CellBorder,
    pub bottom: CellBorder,
    pub left: CellBorder,
}

/// A cell of a [Table], spanning one or more rows and columns
#[derive(Debug, Clone)]
pub struct TableCell {
    row: usize,
    col: usize,
    rowspan: usize,
    colspan: usize,
    horizontal_alignment: HorizontalAlignment,
    vertical_alignment: VerticalAlignment,
    indent: Pt,
    borders: CellBorders,
    background: Option<Colour>,
    content: Option<Content>,
}

impl TableCell {
    fn new(row: usize, col: usize, rowspan: usize, colspan: usize) -> TableCell {
        TableCell {
            row,
            col,
            rowspan,
            colspan,
            horizontal_alignment: HorizontalAlignment::Left,
            vertical_alignment: VerticalAlignment::Top,
            indent: Pt(5.0),
            borders: CellBorders::default(),
            background: None,
            content: None,
        }
    }

    /// 1-based row of the cell's top left corner
    pub fn row(&self) -> usize {
        self.row
    }

    /// 1-based column of the cell's top left corner
    pub fn col(&self) -> usize {
        self.col
    }

    pub fn rowspan(&self) -> usize {
        self.rowspan
    }

    pub fn colspan(&self) -> usize {
        self.colspan
    }

    pub fn content(&self) -> Option<&Content> {
        self.content.as_ref()
    }

    /// Set what the cell shows. Page breaks can't be placed in a cell.
    pub fn set_content<C: Into<Content>>(&mut self, content: C) -> Result<(), PDFError> {
        let content = content.into();
        if let Content::PageBreak = content {
            return Err(PDFError::UnsupportedContent {
                container: "table cell",
                content: content.kind(),
            });
        }
        self.content = Some(content);
        Ok(())
    }

    pub fn borders(&self) -> &CellBorders {
        &self.borders
    }

    pub fn set_border(&mut self, side: Side, border: CellBorder) {
        match side {
            Side::Top => self.borders.top = border,
            Side::Right => self.borders.right = border,
            Side::Bottom => self.borders.bottom = border,
            Side::Left => self.borders.left = border,
        }
    }

    /// Use the same border on all four sides
    pub fn set_borders(&mut self, border: CellBorder) {
        self.borders = CellBorders {
            top: border,
            right: border,
            bottom: border,
            left: border,
        };
    }

    pub fn set_background(&mut self, colour: Colour) {
        self.background = Some(colour);
    }

    pub fn set_horizontal_alignment(&mut self, alignment: HorizontalAlignment) {
        self.horizontal_alignment = alignment;
    }

    pub fn set_vertical_alignment(&mut self, alignment: VerticalAlignment) {
        self.vertical_alignment = alignment;
    }

    /// Padding between the left edge and the content, 5pt by default
    pub fn set_indent(&mut self, indent: Pt) {
        self.indent = indent;
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum HeaderState {
    Normal,
    /// Repeating the header rows at the top of a new page; `position` indexes the
    /// header cells, `resume` is the cell that didn't fit on the previous page
    DrawingHeader { resume: usize, position: usize },
}

/// A table with a fixed number of columns and as many rows as its cells need.
///
/// Cells are added in reading order with [Table::new_cell] and friends; the
/// position of the next cell can be moved along with the `skip_*` methods. Rows
/// and columns are numbered from 1.
///
/// ```
/// use pdf_compose::layout::Table;
///
/// let mut table = Table::new(4);
/// for _ in 0..8 {
///     table.new_cell();
/// }
/// table.skip_cells(1);
/// table.skip_rows(2);
/// table.skip_over(3, -2);
/// let cell = table.new_cell();
/// assert_eq!((cell.row(), cell.col()), (7, 2));
/// ```
#[derive(Debug, Clone)]
pub struct Table {
    rows: usize,
    cols: usize,
    cur_cell: usize,
    col_widths: Vec<f32>,
    row_heights: Vec<Pt>,
    default_row_height: Pt,
    cells: Vec<TableCell>,
    header: Option<(usize, usize)>,
    margins: Margins,
    positioning: Positioning,
}

impl Table {
    /// An empty table with `cols` equally wide columns
    pub fn new(cols: usize) -> Table {
        let cols = if cols == 0 {
            log::warn!("a table needs at least one column, using 1");
            1
        } else {
            cols
        };
        Table {
            rows: 0,
            cols,
            cur_cell: 0,
            col_widths: vec![1.0 / cols as f32; cols],
            row_heights: Vec::new(),
            default_row_height: Pt(10.0),
            cells: Vec::new(),
            header: None,
            margins: Margins::empty(),
            positioning: Positioning::Relative,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The cells, ordered by row and then column
    pub fn cells(&self) -> &[TableCell] {
        &self.cells
    }

    pub fn new_cell(&mut self) -> &mut TableCell {
        self.multi_cell(1, 1)
    }

    pub fn multi_col_cell(&mut self, colspan: usize) -> &mut TableCell {
        self.multi_cell(1, colspan)
    }

    pub fn multi_row_cell(&mut self, rowspan: usize) -> &mut TableCell {
        self.multi_cell(rowspan, 1)
    }

    /// Add a cell at the current position spanning `rowspan` rows and `colspan`
    /// columns. Spans are at least 1, and a column span reaching past the last
    /// column is cut short.
    pub fn multi_cell(&mut self, rowspan: usize, colspan: usize) -> &mut TableCell {
        self.cur_cell += 1;
        let row = (self.cur_cell - 1) / self.cols + 1;
        let col = (self.cur_cell - 1) % self.cols + 1;

        let rowspan = if rowspan < 1 {
            log::warn!("row span must be at least 1, got {rowspan}");
            1
        } else {
            rowspan
        };
        let mut colspan = if colspan < 1 {
            log::warn!("column span must be at least 1, got {colspan}");
            1
        } else {
            colspan
        };
        let available = self.cols - col + 1;
        if colspan > available {
            log::warn!("column span {colspan} at column {col} exceeds the table, clamping to {available}");
            colspan = available;
        }
        self.cur_cell += colspan - 1;
        self.ensure_rows(row + rowspan - 1);

        let cell = TableCell::new(row, col, rowspan, colspan);
        let pos = self
            .cells
            .partition_point(|c| (c.row, c.col) <= (row, col));
        self.cells.insert(pos, cell);
        &mut self.cells[pos]
    }

    fn ensure_rows(&mut self, rows: usize) {
        while self.rows < rows {
            self.rows += 1;
            self.row_heights.push(self.default_row_height);
        }
    }

    /// Leave the next `n` cells empty
    pub fn skip_cells(&mut self, n: isize) {
        if n < 0 {
            log::debug!("can't skip a negative number of cells ({n})");
            return;
        }
        self.cur_cell += n as usize;
    }

    /// Move the position down `n` rows, keeping the column
    pub fn skip_rows(&mut self, n: isize) {
        let offset = n * self.cols as isize - 1;
        self.skip_offset(offset);
    }

    /// Move the position down `rows` rows and right `cols` columns
    pub fn skip_over(&mut self, rows: isize, cols: isize) {
        let offset = rows * self.cols as isize + cols - 1;
        self.skip_offset(offset);
    }

    fn skip_offset(&mut self, offset: isize) {
        if offset < 0 {
            log::debug!("can't move the table position backwards ({offset} cells)");
            return;
        }
        self.cur_cell += offset as usize;
    }

    /// Set the relative widths of the columns, as fractions of the table width
    pub fn set_column_widths(&mut self, widths: &[f32]) -> Result<(), PDFError> {
        if widths.len() != self.cols {
            return Err(PDFError::InvalidColumnWidths {
                expected: self.cols,
                got: widths.len(),
            });
        }
        self.col_widths = widths.to_vec();
        Ok(())
    }

    /// The minimum height of `row`; rows grow to fit their content
    pub fn set_row_height(&mut self, row: usize, height: Pt) -> Result<(), PDFError> {
        if row < 1 || row > self.rows {
            return Err(PDFError::RowOutOfRange {
                row,
                rows: self.rows,
            });
        }
        self.row_heights[row - 1] = height;
        Ok(())
    }

    pub fn row_height(&self, row: usize) -> Option<Pt> {
        row.checked_sub(1)
            .and_then(|i| self.row_heights.get(i))
            .copied()
    }

    /// The height of rows added from now on
    pub fn set_default_row_height(&mut self, height: Pt) {
        self.default_row_height = height;
    }

    /// Repeat rows `start..=end` at the top of every page the table continues on
    pub fn set_header_rows(&mut self, start: usize, end: usize) -> Result<(), PDFError> {
        if start == 0 || end == 0 || start > end {
            return Err(PDFError::InvalidHeaderRows { start, end });
        }
        self.header = Some((start, end));
        Ok(())
    }

    pub fn set_margins(&mut self, margins: Margins) {
        self.margins = margins;
    }

    /// Draw at a fixed position, `y` measured from the top of the page. The table
    /// takes the width available in the context it's drawn in.
    pub fn set_pos(&mut self, x: Pt, y: Pt) {
        self.positioning = Positioning::Absolute { x, y };
    }

    /// Copy the cells of `subtable` into this table with its top left cell at
    /// (`row`, `col`). The table gains columns and rows as needed; gaining columns
    /// resets the column widths to equal widths.
    pub fn add_subtable(&mut self, row: usize, col: usize, subtable: Table) {
        let row = row.max(1);
        let col = col.max(1);
        let Table {
            cells,
            row_heights: sub_heights,
            default_row_height: sub_default,
            ..
        } = subtable;

        for mut cell in cells {
            let sub_height = sub_heights
                .get(cell.row - 1)
                .copied()
                .unwrap_or(sub_default);
            cell.row += row - 1;
            cell.col += col - 1;

            let last_col = cell.col + cell.colspan - 1;
            if last_col > self.cols {
                log::debug!(
                    "subtable widens the table from {} to {last_col} columns, resetting column widths",
                    self.cols
                );
                self.cols = last_col;
                self.col_widths = vec![1.0 / last_col as f32; last_col];
            }

            if cell.row > self.rows {
                self.ensure_rows(cell.row);
                self.row_heights[cell.row - 1] = sub_height;
            } else {
                let height = &mut self.row_heights[cell.row - 1];
                *height = (*height).max(sub_height);
            }
            self.ensure_rows(cell.row + cell.rowspan - 1);
            self.cells.push(cell);
        }
        self.cells.sort_by_key(|c| (c.row, c.col));
    }

    fn col_offset(&self, col: usize, table_width: Pt) -> Pt {
        let fraction: f32 = self.col_widths.iter().take(col - 1).sum();
        table_width * fraction
    }

    fn span_width(&self, cell: &TableCell, table_width: Pt) -> Pt {
        let fraction: f32 = self
            .col_widths
            .iter()
            .skip(cell.col - 1)
            .take(cell.colspan)
            .sum();
        table_width * fraction
    }

    /// Row heights after growing rows to fit the cell contents. Extra height needed
    /// by a spanning cell goes to the last row it spans.
    fn measure_rows(&self, doc: &Document, table_width: Pt) -> Result<Vec<Pt>, PDFError> {
        let mut heights = self.row_heights.clone();
        for cell in &self.cells {
            let Some(content) = &cell.content else {
                continue;
            };
            let width = self.span_width(cell, table_width) - cell.indent;
            let needed = content.required_height(doc, width)?;
            let last = cell.row + cell.rowspan - 1;
            let current: Pt = heights[cell.row - 1..last].iter().copied().sum();
            if needed > current {
                heights[last - 1] += needed - current;
            }
        }
        Ok(heights)
    }

    /// The table's height when laid out `width` wide, including margins
    pub(crate) fn measured_height(&self, doc: &Document, width: Pt) -> Result<Pt, PDFError> {
        let heights = self.measure_rows(doc, width - self.margins.horizontal())?;
        Ok(heights.into_iter().sum::<Pt>() + self.margins.vertical())
    }

    fn draw_frame(&self, block: &mut Block, cell: &TableCell, area: CellArea, page_height: Pt) {
        let CellArea { x, y, width, height } = area;
        if let Some(background) = cell.background {
            block.extend([
                Op::SaveState,
                Op::FillColour(background),
                Op::Rectangle(x, page_height - y - height, width, height),
                Op::Fill,
                Op::RestoreState,
            ]);
        }

        let top = page_height - y;
        let bottom = top - height;
        let right = x + width;
        // each side with the direction pointing into the cell
        let sides = [
            (cell.borders.top, (x, top), (right, top), (0.0, -1.0)),
            (cell.borders.right, (right, top), (right, bottom), (-1.0, 0.0)),
            (cell.borders.bottom, (x, bottom), (right, bottom), (0.0, 1.0)),
            (cell.borders.left, (x, top), (x, bottom), (1.0, 0.0)),
        ];
        for (border, (x1, y1), (x2, y2), (dx, dy)) in sides {
            if !border.is_visible() {
                continue;
            }
            block.extend([
                Op::SaveState,
                Op::StrokeColour(border.colour),
                Op::LineWidth(border.width),
                Op::MoveTo(x1, y1),
                Op::LineTo(x2, y2),
            ]);
            if border.style == BorderStyle::Double {
                let offset = border.width * 2.0;
                block.extend([
                    Op::MoveTo(x1 + offset * dx, y1 + offset * dy),
                    Op::LineTo(x2 + offset * dx, y2 + offset * dy),
                ]);
            }
            block.extend([Op::Stroke, Op::RestoreState]);
        }
    }

    fn draw_cell(
        &self,
        doc: &Document,
        block: &mut Block,
        cell: &TableCell,
        area: CellArea,
        ctx: &DrawContext,
    ) -> Result<(), PDFError> {
        self.draw_frame(block, cell, area, ctx.page_height);
        let Some(content) = &cell.content else {
            return Ok(());
        };

        let available = area.width - cell.indent;
        let (content_width, content_height) = content.measure(doc, available)?;
        let x = match cell.horizontal_alignment {
            HorizontalAlignment::Left => area.x + cell.indent,
            HorizontalAlignment::Center => area.x + ((area.width - content_width) / 2.0).max(Pt::ZERO),
            HorizontalAlignment::Right => area.x + (area.width - content_width).max(Pt::ZERO),
        };
        let y = match cell.vertical_alignment {
            VerticalAlignment::Top => area.y,
            VerticalAlignment::Middle => area.y + ((area.height - content_height) / 2.0).max(Pt::ZERO),
            VerticalAlignment::Bottom => area.y + (area.height - content_height).max(Pt::ZERO),
        };

        let content_ctx = DrawContext {
            x,
            y,
            width: available,
            height: (ctx.y + ctx.height - y).max(area.height),
            inline: false,
            ..*ctx
        };
        let (blocks, _) = content.layout(doc, content_ctx)?;
        if blocks.len() > 1 {
            return Err(PDFError::TooManyBlocks(blocks.len()));
        }
        for content_block in blocks {
            block.merge(content_block);
        }
        Ok(())
    }
}

/// Position and size of a cell on the page, top-down
#[derive(Debug, Copy, Clone)]
struct CellArea {
    x: Pt,
    y: Pt,
    width: Pt,
    height: Pt,
}

impl Drawable for Table {
    fn layout(
        &self,
        doc: &Document,
        ctx: DrawContext,
    ) -> Result<(Vec<Block>, DrawContext), PDFError> {
        let orig = ctx;
        let (left, mut top, table_width, mut ctx) = match self.positioning {
            Positioning::Absolute { x, y } => {
                let limit = ctx.page_height - ctx.margins.bottom;
                (x, y, ctx.width, DrawContext { y, height: limit - y, ..ctx })
            }
            Positioning::Relative => (
                ctx.x + self.margins.left,
                ctx.y + self.margins.top,
                ctx.width - self.margins.horizontal(),
                ctx,
            ),
        };

        let heights = self.measure_rows(doc, table_width)?;
        let rows_height = |from: usize, to: usize| -> Pt {
            if to <= from {
                return Pt::ZERO;
            }
            heights[from..to].iter().copied().sum()
        };

        let header_cells: Vec<usize> = match self.header {
            Some((start, end)) => self
                .cells
                .iter()
                .enumerate()
                .filter(|(_, cell)| cell.row >= start && cell.row <= end)
                .map(|(i, _)| i)
                .collect(),
            None => Vec::new(),
        };

        let mut blocks = Vec::new();
        let mut block = Block::for_page(&ctx);
        let mut limit = ctx.y + ctx.height;
        // 0-based index of the row drawn at `top`
        let mut start_row = 0;
        let mut bottom = top;
        let mut state = HeaderState::Normal;
        let mut next = 0;
        let mut broken_at: Option<usize> = None;

        loop {
            let index = match state {
                HeaderState::Normal if next >= self.cells.len() => break,
                HeaderState::Normal => next,
                HeaderState::DrawingHeader { position, .. } => header_cells[position],
            };
            let cell = &self.cells[index];
            let width = self.span_width(cell, table_width);
            let height = rows_height(cell.row - 1, cell.row + cell.rowspan - 1);
            let mut y = top + rows_height(start_row, cell.row - 1);

            let may_break = state == HeaderState::Normal && broken_at != Some(index);
            if may_break && y + height > limit && y > ctx.margins.top {
                let next_ctx = ctx.next_page();
                blocks.push(std::mem::replace(&mut block, Block::for_page(&next_ctx)));
                ctx = next_ctx;
                limit = ctx.y + ctx.height;
                top = ctx.y;
                bottom = top;
                start_row = cell.row - 1;
                broken_at = Some(index);
                log::debug!("table continues on page {} at row {}", ctx.page + 1, cell.row);

                if let Some((header_start, header_end)) = self.header {
                    if cell.row > header_end && !header_cells.is_empty() {
                        start_row = header_start - 1;
                        state = HeaderState::DrawingHeader {
                            resume: index,
                            position: 0,
                        };
                        continue;
                    }
                }
                y = top;
            }

            let area = CellArea {
                x: left + self.col_offset(cell.col, table_width),
                y,
                width,
                height,
            };
            self.draw_cell(doc, &mut block, cell, area, &ctx)?;
            bottom = bottom.max(y + height);

            match state {
                HeaderState::Normal => next += 1,
                HeaderState::DrawingHeader { resume, position } => {
                    if position + 1 < header_cells.len() {
                        state = HeaderState::DrawingHeader {
                            resume,
                            position: position + 1,
                        };
                    } else {
                        let (header_start, header_end) = self.header.unwrap_or((1, 0));
                        top += rows_height(header_start - 1, header_end);
                        start_row = self.cells[resume].row - 1;
                        next = resume;
                        state = HeaderState::Normal;
                    }
                }
            }
        }
        blocks.push(block);

        if !self.positioning.is_relative() {
            return Ok((blocks, orig));
        }

        let end = bottom + self.margins.bottom;
        let advance = end - ctx.y;
        let ctx = DrawContext {
            x: orig.x,
            width: orig.width,
            inline: orig.inline,
            ..ctx.advance(advance)
        };
        Ok((blocks, ctx))
    }

    /// Tables take the width they are given, so have no natural width of their own
    fn width(&self, _doc: &Document) -> Result<Pt, PDFError> {
        Ok(self.margins.horizontal())
    }

    /// The height from the set row heights, before rows grow to fit their content
    fn height(&self, _doc: &Document) -> Result<Pt, PDFError> {
        Ok(self.row_heights.iter().copied().sum::<Pt>() + self.margins.vertical())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        layout::{wrap::test::helvetica_doc, Paragraph, TextStyle},
        pagesize::LETTER,
        Transform,
    };

    fn ctx() -> DrawContext {
        DrawContext::new(LETTER, Margins::all(Pt(72.0)))
    }

    #[test]
    fn skipping_moves_the_cell_cursor() {
        let mut table = Table::new(4);
        for _ in 0..8 {
            table.new_cell();
        }
        table.skip_cells(1);
        table.skip_rows(2);
        table.skip_over(3, -2);
        let cell = table.new_cell();
        assert_eq!((cell.row(), cell.col()), (7, 2));
        assert_eq!(table.rows(), 7);
    }

    #[test]
    fn negative_skips_are_ignored() {
        let mut table = Table::new(3);
        table.new_cell();
        table.skip_cells(-2);
        table.skip_rows(0);
        table.skip_over(0, -1);
        let cell = table.new_cell();
        assert_eq!((cell.row(), cell.col()), (1, 2));
    }

    #[test]
    fn spans_are_clamped() {
        let mut table = Table::new(3);
        table.new_cell();
        let wide = table.multi_col_cell(5);
        assert_eq!((wide.col(), wide.colspan()), (2, 2));
        let zero = table.multi_cell(0, 0);
        assert_eq!((zero.row(), zero.col()), (2, 1));
        assert_eq!((zero.rowspan(), zero.colspan()), (1, 1));

        let tall = table.multi_row_cell(3);
        assert_eq!(tall.rowspan(), 3);
        assert_eq!(table.rows(), 4);
    }

    #[test]
    fn configuration_errors() {
        let mut table = Table::new(3);
        table.new_cell();
        assert!(matches!(
            table.set_column_widths(&[0.5, 0.5]),
            Err(PDFError::InvalidColumnWidths {
                expected: 3,
                got: 2
            })
        ));
        assert!(table.set_column_widths(&[0.5, 0.25, 0.25]).is_ok());
        assert!(matches!(
            table.set_header_rows(0, 1),
            Err(PDFError::InvalidHeaderRows { .. })
        ));
        assert!(matches!(
            table.set_header_rows(2, 1),
            Err(PDFError::InvalidHeaderRows { .. })
        ));
        assert!(matches!(
            table.set_row_height(2, Pt(20.0)),
            Err(PDFError::RowOutOfRange { row: 2, rows: 1 })
        ));
        assert!(table.set_row_height(1, Pt(20.0)).is_ok());
        assert_eq!(table.row_height(1), Some(Pt(20.0)));
    }

    #[test]
    fn page_breaks_are_not_allowed_in_cells() {
        let mut table = Table::new(1);
        assert!(matches!(
            table.new_cell().set_content(Content::PageBreak),
            Err(PDFError::UnsupportedContent {
                container: "table cell",
                ..
            })
        ));
    }

    #[test]
    fn rows_grow_to_fit_text() {
        let (doc, helvetica) = helvetica_doc();
        let mut table = Table::new(2);
        table
            .new_cell()
            .set_content(Paragraph::new("Hello", TextStyle::new(helvetica, Pt(10.0))))
            .unwrap();
        table.new_cell();
        // one 10pt line plus half a line of padding
        assert_eq!(table.measured_height(&doc, Pt(400.0)).unwrap(), Pt(15.0));
        assert_eq!(table.height(&doc).unwrap(), Pt(10.0));

        let (blocks, next) = table.layout(&doc, ctx()).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(next.y, Pt(87.0));
    }

    #[test]
    fn header_rows_repeat_on_new_pages() {
        let doc = crate::Document::default();
        let mut table = Table::new(1);
        table.new_cell().set_background(colours::RED);
        for _ in 0..99 {
            table.new_cell();
        }
        table.set_header_rows(1, 1).unwrap();

        let (blocks, next) = table.layout(&doc, ctx()).unwrap();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[1].ops().contains(&Op::FillColour(colours::RED)));
        // the header and the remaining 36 rows
        assert_eq!(next.page, 1);
        assert_eq!(next.y, Pt(442.0));
    }

    #[test]
    fn columns_narrower_than_the_indent_keep_line_feeds() {
        let (doc, helvetica) = helvetica_doc();
        let style = TextStyle::new(helvetica, Pt(10.0));
        let mut table = Table::new(2);
        table.set_column_widths(&[0.99, 0.01]).unwrap();
        table.new_cell().set_content(Paragraph::new("a", style.clone())).unwrap();
        table.new_cell().set_content(Paragraph::new("a\nb", style)).unwrap();

        let ctx = DrawContext::new(LETTER, Margins::all(Pt(72.0)));
        let (blocks, _) = table.layout(&doc, ctx).unwrap();
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn cells_are_aligned() {
        let (doc, helvetica) = helvetica_doc();
        let mut table = Table::new(1);
        let cell = table.new_cell();
        cell.set_content(Paragraph::new("Hi", TextStyle::new(helvetica, Pt(10.0))))
            .unwrap();
        cell.set_horizontal_alignment(HorizontalAlignment::Right);

        let ctx = DrawContext::new((Pt(344.0), Pt(400.0)), Margins::all(Pt(72.0)));
        let (blocks, _) = table.layout(&doc, ctx).unwrap();
        let x = blocks[0].ops().iter().find_map(|op| match op {
            Op::TextMatrix(Transform { e, .. }) => Some(*e),
            _ => None,
        });
        // "Hi" is 9.44 points wide and ends at the right edge of the cell
        assert!((x.unwrap() - (72.0 + 200.0 - 9.44)).abs() < 0.01);
    }

    #[test]
    fn double_borders_draw_two_strokes() {
        let doc = crate::Document::default();
        let mut table = Table::new(1);
        table
            .new_cell()
            .set_border(Side::Top, CellBorder::double(Pt(1.0), colours::BLACK));
        let (blocks, _) = table.layout(&doc, ctx()).unwrap();
        let ops = blocks[0].ops();
        assert!(ops.contains(&Op::MoveTo(Pt(72.0), Pt(720.0))));
        assert!(ops.contains(&Op::MoveTo(Pt(72.0), Pt(718.0))));
        assert_eq!(ops.iter().filter(|op| **op == Op::Stroke).count(), 1);
    }

    #[test]
    fn subtables_extend_the_table() {
        let mut table = Table::new(2);
        table.new_cell();
        table.new_cell();

        let mut sub = Table::new(2);
        sub.new_cell();
        sub.new_cell();
        sub.new_cell();
        sub.set_row_height(2, Pt(30.0)).unwrap();

        table.add_subtable(1, 2, sub);
        assert_eq!(table.cols(), 3);
        assert_eq!(table.rows(), 2);
        assert_eq!(table.row_height(2), Some(Pt(30.0)));
        let positions: Vec<(usize, usize)> =
            table.cells().iter().map(|c| (c.row(), c.col())).collect();
        assert_eq!(positions, vec![(1, 1), (1, 2), (1, 2), (1, 3), (2, 2)]);
    }
}
