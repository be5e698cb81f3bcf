//! Vector shapes drawn at fixed page positions.
//!
//! Shape coordinates are top-down page coordinates like the rest of the layout API.
//! Shapes never move the cursor.

use super::{DrawContext, Drawable};
use crate::{
    block::{Block, GraphicsState},
    colour::Colour,
    colours,
    content::Op,
    units::Pt,
    Document, PDFError,
};

/// A point `(x, y)`
pub type Point = (Pt, Pt);

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rectangle(Rectangle),
    Line(Line),
    Polygon(Polygon),
}

/// Fill and stroke settings shared by the closed shapes
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ShapeStyle {
    pub fill: Option<Colour>,
    pub border: Option<Colour>,
    pub border_width: Pt,
    pub fill_opacity: f32,
    pub border_opacity: f32,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        ShapeStyle {
            fill: None,
            border: None,
            border_width: Pt(1.0),
            fill_opacity: 1.0,
            border_opacity: 1.0,
        }
    }
}

impl ShapeStyle {
    /// Push the colour, width and opacity ops for this style
    fn begin(&self, block: &mut Block) {
        block.push(Op::SaveState);
        if let Some(fill) = self.fill {
            block.push(Op::FillColour(fill));
        }
        if let Some(border) = self.border {
            block.push(Op::StrokeColour(border));
            block.push(Op::LineWidth(self.border_width));
        }
        let fill_opacity = (self.fill.is_some() && self.fill_opacity < 1.0).then_some(self.fill_opacity);
        let stroke_opacity =
            (self.border.is_some() && self.border_opacity < 1.0).then_some(self.border_opacity);
        if fill_opacity.is_some() || stroke_opacity.is_some() {
            let name = block.resources_mut().add_graphics_state(GraphicsState {
                fill_opacity,
                stroke_opacity,
            });
            block.push(Op::GraphicsState(name));
        }
    }

    /// Push the painting op and close the state opened by [ShapeStyle::begin]
    fn finish(&self, block: &mut Block) {
        match (self.fill.is_some(), self.border.is_some()) {
            (true, true) => block.push(Op::FillStroke),
            (true, false) => block.push(Op::Fill),
            (false, true) => block.push(Op::Stroke),
            (false, false) => {}
        }
        block.push(Op::RestoreState);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    pub x: Pt,
    pub y: Pt,
    pub width: Pt,
    pub height: Pt,
    pub style: ShapeStyle,
}

impl Rectangle {
    /// A rectangle with a 1pt black border and no fill, its top left corner at `(x, y)`
    pub fn new(x: Pt, y: Pt, width: Pt, height: Pt) -> Rectangle {
        Rectangle {
            x,
            y,
            width,
            height,
            style: ShapeStyle {
                border: Some(colours::BLACK),
                ..ShapeStyle::default()
            },
        }
    }

    /// Draw the rectangle into `block`, whose ops use bottom-up coordinates
    pub fn render(&self, block: &mut Block) {
        self.style.begin(block);
        block.push(Op::Rectangle(
            self.x,
            block.height - self.y - self.height,
            self.width,
            self.height,
        ));
        self.style.finish(block);
    }
}

/// A straight line segment
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub from: Point,
    pub to: Point,
    pub colour: Colour,
    pub width: Pt,
    pub opacity: f32,
}

impl Line {
    pub fn new(from: Point, to: Point) -> Line {
        Line {
            from,
            to,
            colour: colours::BLACK,
            width: Pt(1.0),
            opacity: 1.0,
        }
    }

    pub fn render(&self, block: &mut Block) {
        let height = block.height;
        block.push(Op::SaveState);
        block.push(Op::StrokeColour(self.colour));
        block.push(Op::LineWidth(self.width));
        if self.opacity < 1.0 {
            let name = block.resources_mut().add_graphics_state(GraphicsState {
                fill_opacity: None,
                stroke_opacity: Some(self.opacity),
            });
            block.push(Op::GraphicsState(name));
        }
        block.push(Op::MoveTo(self.from.0, height - self.from.1));
        block.push(Op::LineTo(self.to.0, height - self.to.1));
        block.push(Op::Stroke);
        block.push(Op::RestoreState);
    }
}

/// A shape made of one or more closed rings of points
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub rings: Vec<Vec<Point>>,
    pub style: ShapeStyle,
}

impl Polygon {
    /// A polygon without fill or border
    pub fn new(rings: Vec<Vec<Point>>) -> Polygon {
        Polygon {
            rings,
            style: ShapeStyle::default(),
        }
    }

    /// Push the path ops for the polygon with its points taken as they are, in
    /// bottom-up PDF coordinates
    pub fn render_path(&self, block: &mut Block) {
        self.style.begin(block);
        for ring in &self.rings {
            let Some((&(x, y), rest)) = ring.split_first() else {
                continue;
            };
            block.push(Op::MoveTo(x, y));
            for &(x, y) in rest {
                block.push(Op::LineTo(x, y));
            }
            block.push(Op::ClosePath);
        }
        self.style.finish(block);
    }

    /// Draw the polygon into `block`, flipping its top-down points
    pub fn render(&self, block: &mut Block) {
        let height = block.height;
        let flipped = Polygon {
            rings: self
                .rings
                .iter()
                .map(|ring| ring.iter().map(|&(x, y)| (x, height - y)).collect())
                .collect(),
            style: self.style,
        };
        flipped.render_path(block);
    }

    fn bounds(&self) -> Option<(Point, Point)> {
        let mut points = self.rings.iter().flatten();
        let &(x, y) = points.next()?;
        Some(points.fold(((x, y), (x, y)), |((x1, y1), (x2, y2)), &(x, y)| {
            ((x1.min(x), y1.min(y)), (x2.max(x), y2.max(y)))
        }))
    }
}

impl Shape {
    fn size(&self) -> (Pt, Pt) {
        match self {
            Shape::Rectangle(r) => (r.width, r.height),
            Shape::Line(l) => (
                (l.to.0 - l.from.0).abs(),
                (l.to.1 - l.from.1).abs(),
            ),
            Shape::Polygon(p) => match p.bounds() {
                Some(((x1, y1), (x2, y2))) => (x2 - x1, y2 - y1),
                None => (Pt::ZERO, Pt::ZERO),
            },
        }
    }
}

impl Drawable for Shape {
    fn layout(
        &self,
        _doc: &Document,
        ctx: DrawContext,
    ) -> Result<(Vec<Block>, DrawContext), PDFError> {
        let mut block = Block::for_page(&ctx);
        match self {
            Shape::Rectangle(r) => r.render(&mut block),
            Shape::Line(l) => l.render(&mut block),
            Shape::Polygon(p) => p.render(&mut block),
        }
        Ok((vec![block], ctx))
    }

    fn width(&self, _doc: &Document) -> Result<Pt, PDFError> {
        Ok(self.size().0)
    }

    fn height(&self, _doc: &Document) -> Result<Pt, PDFError> {
        Ok(self.size().1)
    }
}

impl From<Rectangle> for Shape {
    fn from(r: Rectangle) -> Self {
        Shape::Rectangle(r)
    }
}

impl From<Line> for Shape {
    fn from(l: Line) -> Self {
        Shape::Line(l)
    }
}

impl From<Polygon> for Shape {
    fn from(p: Polygon) -> Self {
        Shape::Polygon(p)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{content::render_ops, layout::Margins, pagesize::LETTER};

    fn rendered(block: &Block) -> String {
        String::from_utf8(render_ops(block.ops()).unwrap()).unwrap()
    }

    #[test]
    fn bare_polygon_paths() {
        let polygon = Polygon::new(vec![vec![(Pt(1.0), Pt(2.0))]]);
        let mut block = Block::new(Pt(10.0), Pt(10.0));
        polygon.render_path(&mut block);
        assert_eq!(rendered(&block), "q\n1 2 m\nh\nQ\n");
    }

    #[test]
    fn filled_and_bordered_polygons() {
        let mut polygon = Polygon::new(vec![vec![
            (Pt(0.0), Pt(0.0)),
            (Pt(10.0), Pt(0.0)),
            (Pt(10.0), Pt(10.0)),
        ]]);
        polygon.style.fill = Some(colours::RED);
        polygon.style.border = Some(colours::BLACK);
        polygon.style.fill_opacity = 0.5;

        let mut block = Block::new(Pt(100.0), Pt(100.0));
        polygon.render(&mut block);
        assert_eq!(
            rendered(&block),
            "q\n1 0 0 rg\n0 G\n1 w\n/GS1 gs\n0 100 m\n10 100 l\n10 90 l\nh\nB\nQ\n"
        );
        assert_eq!(
            block.resources().graphics_state("GS1"),
            Some(GraphicsState {
                fill_opacity: Some(0.5),
                stroke_opacity: None
            })
        );
    }

    #[test]
    fn rectangles_are_placed_from_the_top() {
        let doc = Document::default();
        let mut rect = Rectangle::new(Pt(10.0), Pt(20.0), Pt(30.0), Pt(40.0));
        rect.style.fill = Some(colours::GREEN);
        rect.style.border = None;
        let shape = Shape::from(rect);
        let ctx = DrawContext::new(LETTER, Margins::all(Pt(72.0)));
        let (blocks, next) = shape.layout(&doc, ctx).unwrap();
        assert_eq!(next, ctx);
        assert!(blocks[0]
            .ops()
            .contains(&Op::Rectangle(Pt(10.0), Pt(732.0), Pt(30.0), Pt(40.0))));
        assert!(blocks[0].ops().contains(&Op::Fill));
        assert_eq!(shape.width(&doc).unwrap(), Pt(30.0));
    }

    #[test]
    fn translucent_lines_use_a_graphics_state() {
        let mut line = Line::new((Pt(0.0), Pt(0.0)), (Pt(50.0), Pt(25.0)));
        line.opacity = 0.25;
        let mut block = Block::new(Pt(100.0), Pt(100.0));
        line.render(&mut block);
        assert!(block.ops().contains(&Op::GraphicsState("GS1".into())));
        assert!(block.ops().contains(&Op::LineTo(Pt(50.0), Pt(75.0))));
        let shape = Shape::Line(line);
        let doc = Document::default();
        assert_eq!(shape.height(&doc).unwrap(), Pt(25.0));
    }
}
