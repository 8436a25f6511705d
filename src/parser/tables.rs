//! Inflection tables: locating navigation frames after an entry and decoding
//! their grids through declarative coordinate layouts.

use scraper::ElementRef;

use super::dom;
use crate::entry::{Tag, Variant};
use crate::error::{ExtractError, Result};

/// A collapsible `div.NavFrame`: a head line naming the table and its body.
#[derive(Debug, Clone, Copy)]
pub struct NavFrame<'a> {
    pub root: ElementRef<'a>,
    pub table: Option<ElementRef<'a>>,
}

impl<'a> NavFrame<'a> {
    pub fn from_root(root: ElementRef<'a>) -> Self {
        NavFrame {
            root,
            table: dom::first_named(root, "table"),
        }
    }

    /// Text of the first nested `div`, which renders as the frame's title.
    pub fn head(&self) -> String {
        dom::first_named(self.root, "div")
            .map(|div| dom::text(div).trim().to_string())
            .unwrap_or_default()
    }

    pub fn table(&self) -> Result<ElementRef<'a>> {
        self.table
            .ok_or_else(|| ExtractError::mismatch(format!("navigation frame {:?} has no table", self.head())))
    }
}

pub fn is_nav_frame(el: ElementRef<'_>) -> bool {
    dom::is(el, "div") && dom::has_class(el, "NavFrame")
}

/// Navigation frames among the siblings following `heading`.
pub fn nav_frames<'a>(heading: ElementRef<'a>) -> impl Iterator<Item = NavFrame<'a>> {
    dom::next_siblings(heading)
        .filter(|el| is_nav_frame(*el))
        .map(NavFrame::from_root)
}

/// Which inline children of a cell hold its forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inline {
    /// Every `span`.
    Span,
    /// Every `span.Latn`.
    Latin,
    /// Every link.
    Link,
    /// Every `span.Latn`, or every link when there is none.
    LatinOrLink,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellMode {
    /// The whole cell is one form.
    Direct,
    /// One form per matching inline child, for cells listing alternatives.
    Inline(Inline),
}

#[derive(Debug, Clone)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub tags: Vec<Tag>,
    pub mode: CellMode,
}

/// Coordinates of every tagged cell in one rendered table shape.
#[derive(Debug, Clone)]
pub struct Layout {
    pub name: &'static str,
    /// Exact number of rows the shape has, when the table family comes in
    /// several shapes that must not be confused.
    pub rows: Option<usize>,
    pub cells: Vec<Cell>,
}

impl Layout {
    pub fn new(name: &'static str) -> Self {
        Layout {
            name,
            rows: None,
            cells: Vec::new(),
        }
    }

    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = Some(rows);
        self
    }

    pub fn cell(mut self, row: usize, col: usize, tags: &[Tag], mode: CellMode) -> Self {
        self.cells.push(Cell {
            row,
            col,
            tags: tags.to_vec(),
            mode,
        });
        self
    }

    /// Columns `0..width` of `row`, all tagged `tags`.
    pub fn uniform_row(mut self, row: usize, width: usize, tags: &[Tag], mode: CellMode) -> Self {
        for col in 0..width {
            self = self.cell(row, col, tags, mode);
        }
        self
    }

    /// One cell per column, starting at column 0, each tagged `tags` plus the
    /// column's own tag.
    pub fn row_across(mut self, row: usize, tags: &[Tag], columns: &[Tag], mode: CellMode) -> Self {
        for (col, &column_tag) in columns.iter().enumerate() {
            let mut cell_tags = tags.to_vec();
            cell_tags.push(column_tag);
            self = self.cell(row, col, &cell_tags, mode);
        }
        self
    }
}

/// Rows from `from` onwards are displaced by `by` extra rows.
#[derive(Debug, Clone, Copy)]
pub struct RowShift {
    pub from: usize,
    pub by: usize,
}

impl RowShift {
    pub fn apply(&self, row: usize) -> usize {
        if row >= self.from {
            row + self.by
        } else {
            row
        }
    }
}

/// Row/column view of a rendered table. Rows count every `tr`, columns only
/// count `td` cells, so header cells never shift coordinates.
pub struct Grid<'a> {
    name: &'static str,
    rows: Vec<ElementRef<'a>>,
}

impl<'a> Grid<'a> {
    pub fn new(name: &'static str, table: ElementRef<'a>) -> Self {
        Grid {
            name,
            rows: dom::descendants(table).filter(|e| dom::is(*e, "tr")).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, row: usize) -> Result<ElementRef<'a>> {
        self.rows.get(row).copied().ok_or(ExtractError::MissingCell {
            table: self.name,
            row,
            col: 0,
        })
    }

    /// Trimmed text of the first header cell in `row`.
    pub fn header(&self, row: usize) -> Option<String> {
        let tr = self.rows.get(row)?;
        dom::first_named(*tr, "th").map(|th| dom::text(th).trim().to_string())
    }

    pub fn cells(&self, row: usize) -> Result<Vec<ElementRef<'a>>> {
        let tr = self.row(row)?;
        Ok(dom::descendants(tr).filter(|e| dom::is(*e, "td")).collect())
    }

    pub fn cell(&self, row: usize, col: usize) -> Result<ElementRef<'a>> {
        self.cells(row)?
            .get(col)
            .copied()
            .ok_or(ExtractError::MissingCell {
                table: self.name,
                row,
                col,
            })
    }

    pub fn read(&self, row: usize, col: usize, mode: CellMode) -> Result<Vec<String>> {
        Ok(read_cell(self.cell(row, col)?, mode))
    }
}

pub fn read_cell(td: ElementRef<'_>, mode: CellMode) -> Vec<String> {
    match mode {
        CellMode::Direct => {
            let text = dom::text(td);
            let text = text.trim();
            if text.is_empty() {
                Vec::new()
            } else {
                vec![text.to_string()]
            }
        }
        CellMode::Inline(inline) => inline_texts(td, inline),
    }
}

/// Forms held by the inline children of `el`, which may be a single cell or a
/// whole table.
pub fn inline_texts(el: ElementRef<'_>, inline: Inline) -> Vec<String> {
    let spans = || dom::descendants(el).filter(|e| dom::is(*e, "span"));
    let latin = || spans().filter(|e| dom::has_class(*e, "Latn"));
    let links = || dom::descendants(el).filter(|e| dom::is(*e, "a"));
    let picked: Vec<_> = match inline {
        Inline::Span => spans().collect(),
        Inline::Latin => latin().collect(),
        Inline::Link => links().collect(),
        Inline::LatinOrLink => {
            let found: Vec<_> = latin().collect();
            if found.is_empty() {
                links().collect()
            } else {
                found
            }
        }
    };
    picked
        .into_iter()
        .map(|e| dom::text(e).trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Decode every cell of `layout` from `grid`. A grid whose row count differs
/// from the layout's, or that lacks a listed cell, is rejected rather than
/// read at the wrong coordinates.
pub fn decode(grid: &Grid<'_>, layout: &Layout, shift: Option<RowShift>) -> Result<Vec<Variant>> {
    if let Some(expected) = layout.rows {
        if grid.len() != expected {
            return Err(ExtractError::UnrecognizedTableShape {
                table: layout.name,
                rows: grid.len(),
            });
        }
    }
    let mut variants = Vec::new();
    for cell in &layout.cells {
        let row = shift.map_or(cell.row, |s| s.apply(cell.row));
        for form in grid.read(row, cell.col, cell.mode)? {
            variants.push(Variant::new(cell.tags.clone(), form));
        }
    }
    Ok(variants)
}

/// The layout whose exact row count matches the grid.
pub fn layout_for<'l>(grid: &Grid<'_>, name: &'static str, layouts: &[&'l Layout]) -> Result<&'l Layout> {
    layouts
        .iter()
        .copied()
        .find(|l| l.rows == Some(grid.len()))
        .ok_or(ExtractError::UnrecognizedTableShape {
            table: name,
            rows: grid.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    const SAMPLE: &str = r#"<table>
        <tr><th>infinitive</th><td>cantar</td></tr>
        <tr><th></th><td><span>canto</span></td><td><span>cantas</span>, <span>cantás</span></td><td>—</td></tr>
        <tr><td><span class="Latn">ir</span> <a>ver</a></td><td><a>ver</a></td></tr>
    </table>"#;

    fn with_grid<F: FnOnce(&Grid<'_>)>(source: &str, f: F) {
        let html = Html::parse_fragment(source);
        let sel = Selector::parse("table").unwrap();
        let table = html.select(&sel).next().unwrap();
        f(&Grid::new("sample", table));
    }

    #[test]
    fn reads_cells_by_mode() {
        with_grid(SAMPLE, |grid| {
            assert_eq!(grid.len(), 3);
            assert_eq!(grid.header(0).as_deref(), Some("infinitive"));
            assert_eq!(grid.read(0, 0, CellMode::Direct).unwrap(), vec!["cantar"]);
            assert_eq!(grid.read(1, 1, CellMode::Inline(Inline::Span)).unwrap(), vec!["cantas", "cantás"]);
            assert!(grid.read(1, 2, CellMode::Inline(Inline::Span)).unwrap().is_empty());
            assert_eq!(grid.read(2, 0, CellMode::Inline(Inline::LatinOrLink)).unwrap(), vec!["ir"]);
            assert_eq!(grid.read(2, 1, CellMode::Inline(Inline::LatinOrLink)).unwrap(), vec!["ver"]);
        });
    }

    #[test]
    fn decode_follows_layout_and_shift() {
        let layout = Layout::new("sample")
            .cell(0, 0, &["INF"], CellMode::Direct)
            .row_across(1, &["PRES"], &["1s", "2s"], CellMode::Inline(Inline::Span));
        with_grid(SAMPLE, |grid| {
            let variants = decode(grid, &layout, None).unwrap();
            let got: Vec<_> = variants.iter().map(|v| (v.tags.join(" "), v.form.as_str())).collect();
            assert_eq!(
                got,
                vec![
                    ("INF".to_string(), "cantar"),
                    ("PRES 1s".to_string(), "canto"),
                    ("PRES 2s".to_string(), "cantas"),
                    ("PRES 2s".to_string(), "cantás"),
                ]
            );

            let shifted = Layout::new("sample").cell(1, 1, &["X"], CellMode::Inline(Inline::LatinOrLink));
            let variants = decode(grid, &shifted, Some(RowShift { from: 1, by: 1 })).unwrap();
            assert_eq!(variants, vec![Variant::new(vec!["X"], "ver")]);
        });
    }

    #[test]
    fn missing_cells_and_wrong_shapes_fail() {
        with_grid(SAMPLE, |grid| {
            let layout = Layout::new("sample").cell(1, 5, &["X"], CellMode::Direct);
            assert!(matches!(
                decode(grid, &layout, None),
                Err(ExtractError::MissingCell { row: 1, col: 5, .. })
            ));
            let layout = Layout::new("sample").cell(7, 0, &["X"], CellMode::Direct);
            assert!(matches!(
                decode(grid, &layout, None),
                Err(ExtractError::MissingCell { row: 7, .. })
            ));
            let layout = Layout::new("sample").with_rows(4);
            assert!(matches!(
                decode(grid, &layout, None),
                Err(ExtractError::UnrecognizedTableShape { rows: 3, .. })
            ));
            let small = Layout::new("small").with_rows(2);
            let exact = Layout::new("exact").with_rows(3);
            assert_eq!(layout_for(grid, "sample", &[&small, &exact]).unwrap().name, "exact");
            assert!(layout_for(grid, "sample", &[&small]).is_err());
        });
    }

    #[test]
    fn finds_frames_after_heading() {
        let html = Html::parse_fragment(
            r#"<h3>Verb</h3><p>x</p>
            <div class="NavFrame"><div class="NavHead">Conjugation of <i>cantar</i></div><div class="NavContent"><table><tr><td>a</td></tr></table></div></div>
            <!-- stray -->
            <div class="other"></div>
            <div class="NavFrame"><div class="NavHead">Selected combined forms of cantar</div></div>"#,
        );
        let sel = Selector::parse("h3").unwrap();
        let h3 = html.select(&sel).next().unwrap();
        let frames: Vec<_> = nav_frames(h3).collect();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].head(), "Conjugation of cantar");
        assert!(frames[0].table().is_ok());
        assert!(frames[1].table().is_err());
    }
}
