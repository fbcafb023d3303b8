use base64::Engine;
use chrono::NaiveDate;
use log::{debug, warn};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

use crate::model::{DeliveryRecord, OrderItem};

pub const TITLE: &str = "Purchase Order";
pub const TABLE_HEADER: [&str; 4] = ["Item", "Detail", "Quantity", "UOM"];

// Все размеры в миллиметрах, вертикальные отступы считаются от верха листа.
const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_LEFT: f32 = 20.0;
const MARGIN_BOTTOM: f32 = 20.0;
const TITLE_TOP: f32 = 15.0;
const HEADER_TOP: f32 = 30.0;
const HEADER_STEP: f32 = 10.0;
const TABLE_TOP_FIRST: f32 = 110.0;
const TABLE_TOP_NEXT: f32 = 20.0;
const ROW_HEIGHT: f32 = 8.0;
const COLUMNS: [f32; 4] = [20.0, 85.0, 140.0, 170.0];

const TITLE_FONT_SIZE: f32 = 18.0;
const HEADER_FONT_SIZE: f32 = 12.0;
const TABLE_FONT_SIZE: f32 = 10.0;

/// Одна строка таблицы: Item, Detail, Quantity, UOM.
pub type Row = [String; 4];

/// Содержимое заказа, разложенное по местам документа.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub title: String,
    pub header: Vec<(&'static str, String)>,
    pub rows: Vec<Row>,
}

impl Layout {
    pub fn new(record: &DeliveryRecord, items: &[OrderItem], date: NaiveDate) -> Self {
        let header = vec![
            ("Date", date.format("%d/%m/%Y").to_string()),
            ("Company Name", record.company_name.clone()),
            ("Site Contact Name", record.site_contact_name.clone()),
            ("Phone Number", record.phone_number.clone()),
            ("Delivery Address", record.delivery_address.clone()),
            ("Delivery Date", record.delivery_date.clone()),
            ("Delivery Time", record.delivery_time.clone()),
            ("Crane Truck", record.crane_truck.clone()),
        ];

        let rows = items
            .iter()
            .map(|item| {
                [
                    item.name.to_owned(),
                    item.detail_column(),
                    item.quantity.to_string(),
                    item.unit.to_owned(),
                ]
            })
            .collect();

        Self {
            title: TITLE.to_owned(),
            header,
            rows,
        }
    }
}

/// Разбивает строки таблицы по страницам.
///
/// На первой странице помещается `first` строк, на остальных по `rest`.
/// Страница есть всегда, даже если строк нет.
pub fn paginate(rows: &[Row], first: usize, rest: usize) -> Vec<&[Row]> {
    let first = first.max(1);
    let rest = rest.max(1);

    let split = first.min(rows.len());
    let mut pages = vec![&rows[..split]];
    pages.extend(rows[split..].chunks(rest));
    pages
}

/// Сколько строк данных влезает под шапкой таблицы, начинающейся с `top`.
fn rows_fitting(top: f32) -> usize {
    let lines = ((PAGE_HEIGHT - top - MARGIN_BOTTOM) / ROW_HEIGHT) as usize;
    lines.saturating_sub(1)
}

/// Символы кодировки WinAnsi сверх Latin-1, которые есть во встроенных
/// шрифтах PDF.
const WIN_ANSI_EXTRA: &str = "€‚ƒ„…†‡ˆ‰Š‹ŒŽ‘’“”•–—˜™š›œžŸ";

/// Может ли встроенный шрифт показать символ.
fn is_win_ansi(c: char) -> bool {
    matches!(c, ' '..='~' | '\u{a0}'..='\u{ff}') || WIN_ANSI_EXTRA.contains(c)
}

/// Заменяет символы, которых нет во встроенном шрифте, на `?`. Иначе
/// printpdf молча теряет такой текст целиком.
fn printable(text: &str) -> String {
    text.chars()
        .map(|c| if is_win_ansi(c) { c } else { '?' })
        .collect()
}

fn warn_unprintable(layout: &Layout) {
    let header = layout.header.iter().map(|(label, value)| (*label, value));
    let cells = layout
        .rows
        .iter()
        .flat_map(|row| TABLE_HEADER.iter().copied().zip(row.iter()));

    for (name, value) in header.chain(cells) {
        if !value.chars().all(is_win_ansi) {
            warn!(
                "{} \"{}\" has characters the PDF font cannot show, they are replaced with '?'",
                name, value
            );
        }
    }
}

/// Готовый документ.
#[derive(Debug, Clone)]
pub struct Document {
    bytes: Vec<u8>,
}

impl Document {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Кодирует документ для вложения в письмо.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(self.bytes())
    }
}

/// Рендерит заказ в PDF.
pub fn render(layout: &Layout) -> RenderResult {
    let (doc, first_page, first_layer) = PdfDocument::new(
        layout.title.clone(),
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| RenderError::Font(format!("{:?}", e)))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| RenderError::Font(format!("{:?}", e)))?;

    let pages = paginate(
        &layout.rows,
        rows_fitting(TABLE_TOP_FIRST),
        rows_fitting(TABLE_TOP_NEXT),
    );
    debug!("Render {} rows on {} page(s)", layout.rows.len(), pages.len());
    warn_unprintable(layout);

    let mut canvas = doc.get_page(first_page).get_layer(first_layer);

    for (n, rows) in pages.iter().enumerate() {
        let mut top = if n == 0 {
            draw_header(&canvas, layout, &regular, &bold);
            TABLE_TOP_FIRST
        } else {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            canvas = doc.get_page(page).get_layer(layer);
            TABLE_TOP_NEXT
        };

        let header_row = TABLE_HEADER.map(|t| t.to_owned());
        draw_row(&canvas, &header_row, top, &bold);

        for row in rows.iter() {
            top += ROW_HEIGHT;
            draw_row(&canvas, row, top, &regular);
        }
    }

    let bytes = doc
        .save_to_bytes()
        .map_err(|e| RenderError::Save(format!("{:?}", e)))?;

    Ok(Document { bytes })
}

fn draw_header(
    canvas: &PdfLayerReference,
    layout: &Layout,
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
) {
    // Встроенные шрифты не умеют выравнивать, поэтому центрируем на глаз.
    let title_width = layout.title.chars().count() as f32 * TITLE_FONT_SIZE * 0.18;
    canvas.use_text(
        layout.title.clone(),
        TITLE_FONT_SIZE,
        Mm((PAGE_WIDTH - title_width) / 2.0),
        Mm(PAGE_HEIGHT - TITLE_TOP),
        bold,
    );

    for (n, (label, value)) in layout.header.iter().enumerate() {
        let top = HEADER_TOP + HEADER_STEP * n as f32;
        canvas.use_text(
            printable(&format!("{}: {}", label, value)),
            HEADER_FONT_SIZE,
            Mm(MARGIN_LEFT),
            Mm(PAGE_HEIGHT - top),
            regular,
        );
    }
}

fn draw_row(canvas: &PdfLayerReference, row: &Row, top: f32, font: &IndirectFontRef) {
    for (cell, x) in row.iter().zip(COLUMNS) {
        canvas.use_text(printable(cell), TABLE_FONT_SIZE, Mm(x), Mm(PAGE_HEIGHT - top), font);
    }
}

pub type RenderResult = std::result::Result<Document, RenderError>;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("load font: {0}")]
    Font(String),

    #[error("save document: {0}")]
    Save(String),
}
