//! PDF backend built on `lopdf`.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, StringFormat, dictionary};

use crate::error::RenderError;
use crate::geometry::{PageSize, Point, Rect, mm_to_pt};
use crate::surface::{Color, DrawingSurface, Paint, Stroke, TextStyle, aligned_left};

const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";

struct PdfPage {
    size: PageSize,
    ops: Vec<Operation>,
}

/// Surface that accumulates PDF content streams, one per page.
///
/// Uses the built-in Helvetica faces, so text outside Latin-1 is replaced
/// with `?`.
#[derive(Default)]
pub struct PdfSurface {
    title: Option<String>,
    pages: Vec<PdfPage>,
}

impl PdfSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            pages: Vec::new(),
        }
    }

    fn current(&mut self) -> &mut PdfPage {
        if self.pages.is_empty() {
            self.begin_page(PageSize::A4);
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn page_height_pt(&mut self) -> f64 {
        mm_to_pt(self.current().size.height_mm)
    }

    fn push(&mut self, op: Operation) {
        self.current().ops.push(op);
    }

    /// Serialise all pages into a PDF file.
    pub fn finish(self) -> Result<Vec<u8>, RenderError> {
        if self.pages.is_empty() {
            return Err(RenderError::Empty);
        }

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                FONT_REGULAR => regular_id,
                FONT_BOLD => bold_id,
            },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(self.pages.len());
        for page in self.pages {
            let content = Content {
                operations: page.ops,
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let media_box: Vec<Object> = vec![
                0.into(),
                0.into(),
                mm_to_pt(page.size.width_mm).into(),
                mm_to_pt(page.size.height_mm).into(),
            ];
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "MediaBox" => media_box,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        if let Some(title) = self.title {
            let info_id = doc.add_object(dictionary! {
                "Title" => Object::String(encode_win_ansi(&title), StringFormat::Literal),
                "Producer" => Object::String(b"packforge".to_vec(), StringFormat::Literal),
            });
            doc.trailer.set("Info", info_id);
        }

        doc.compress();
        let mut out = Vec::new();
        doc.save_to(&mut out)?;
        tracing::debug!(bytes = out.len(), "pdf serialised");
        Ok(out)
    }
}

/// Latin-1 subset of WinAnsi; anything else becomes `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| {
            let code = c as u32;
            if (32..127).contains(&code) || (160..=255).contains(&code) {
                code as u8
            } else {
                b'?'
            }
        })
        .collect()
}

fn color_ops(color: Color, stroking: bool) -> Operation {
    let op = if stroking { "RG" } else { "rg" };
    Operation::new(op, vec![color.r.into(), color.g.into(), color.b.into()])
}

fn stroke_state_ops(stroke: &Stroke) -> Vec<Operation> {
    let dash: Vec<Object> = if stroke.dashed {
        vec![2.into(), 2.into()]
    } else {
        Vec::new()
    };
    vec![
        color_ops(stroke.color, true),
        Operation::new("w", vec![mm_to_pt(stroke.width_mm).into()]),
        Operation::new("d", vec![Object::Array(dash), 0.into()]),
    ]
}

impl DrawingSurface for PdfSurface {
    fn begin_page(&mut self, size: PageSize) {
        self.pages.push(PdfPage {
            size,
            ops: Vec::new(),
        });
    }

    fn text(&mut self, x: f64, baseline: f64, text: &str, style: &TextStyle) {
        if text.is_empty() {
            return;
        }
        let height = self.page_height_pt();
        let left = aligned_left(x, text, style);
        let font = if style.bold { FONT_BOLD } else { FONT_REGULAR };

        self.push(Operation::new("BT", vec![]));
        self.push(color_ops(style.color, false));
        self.push(Operation::new("Tf", vec![font.into(), style.size_pt.into()]));
        self.push(Operation::new(
            "Td",
            vec![mm_to_pt(left).into(), (height - mm_to_pt(baseline)).into()],
        ));
        self.push(Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
        ));
        self.push(Operation::new("ET", vec![]));
    }

    fn rect(&mut self, rect: Rect, paint: Paint) {
        let height = self.page_height_pt();
        let operands: Vec<Object> = vec![
            mm_to_pt(rect.x).into(),
            (height - mm_to_pt(rect.bottom())).into(),
            mm_to_pt(rect.width).into(),
            mm_to_pt(rect.height).into(),
        ];

        self.push(Operation::new("q", vec![]));
        match paint {
            Paint::Stroke(stroke) => {
                for op in stroke_state_ops(&stroke) {
                    self.push(op);
                }
                self.push(Operation::new("re", operands));
                self.push(Operation::new("S", vec![]));
            }
            Paint::Fill(color) => {
                self.push(color_ops(color, false));
                self.push(Operation::new("re", operands));
                self.push(Operation::new("f", vec![]));
            }
        }
        self.push(Operation::new("Q", vec![]));
    }

    fn line(&mut self, from: Point, to: Point, stroke: Stroke) {
        let height = self.page_height_pt();
        self.push(Operation::new("q", vec![]));
        for op in stroke_state_ops(&stroke) {
            self.push(op);
        }
        self.push(Operation::new(
            "m",
            vec![mm_to_pt(from.x).into(), (height - mm_to_pt(from.y)).into()],
        ));
        self.push(Operation::new(
            "l",
            vec![mm_to_pt(to.x).into(), (height - mm_to_pt(to.y)).into()],
        ));
        self.push(Operation::new("S", vec![]));
        self.push(Operation::new("Q", vec![]));
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }
}
