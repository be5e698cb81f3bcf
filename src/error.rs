use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum PDFError {
    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsingError(#[from] owned_ttf_parser::FaceParsingError),

    #[error(transparent)]
    /// [image] failed to parse the image
    Image(#[from] image::ImageError),

    #[error("font '{font}' has no glyph for {ch:?}")]
    /// A character could not be measured or encoded with the font it was styled with
    MissingGlyph { ch: char, font: String },

    #[error("expected {expected} column widths, got {got}")]
    /// [crate::layout::Table::set_column_widths] was given the wrong number of widths
    InvalidColumnWidths { expected: usize, got: usize },

    #[error("invalid header row range {start}..={end}")]
    /// Header rows must be 1-based with `start <= end`
    InvalidHeaderRows { start: usize, end: usize },

    #[error("row {row} is out of range (table has {rows} rows)")]
    /// A row index outside of the table was addressed
    RowOutOfRange { row: usize, rows: usize },

    #[error("{content} cannot be placed in a {container}")]
    /// The container does not accept that kind of content
    UnsupportedContent {
        container: &'static str,
        content: &'static str,
    },

    #[error("expected content to fit in a single block, but it produced {0}")]
    /// Content drawn into a fixed block spilled over onto more pages
    TooManyBlocks(usize),

    #[error("page is missing from the document")]
    /// A page referenced by the page order no longer exists
    PageMissing,
}
