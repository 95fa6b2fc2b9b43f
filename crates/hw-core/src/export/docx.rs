//! Word (Office Open XML) exporter
//!
//! The package is assembled by hand: a handful of fixed XML parts plus
//! `word/document.xml` built paragraph by paragraph, and one PNG per embedded
//! attachment under `word/media/`.
//!
//! Attachments are best-effort. A fetch that yields nothing, or bytes the
//! `image` crate cannot decode, turn into an italic `[image] <url>` line and the
//! document is still produced.

use super::exporter::{Exporter, RenderContext, SessionExport};
use crate::emit::Payload;
use crate::error::Result;
use crate::fetch::ImageFetcher;
use crate::normalize::{Content, NormalizedMessage};
use crate::types::ExportFormat;
use std::io::{Cursor, Write};
use tracing::{debug, warn};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// English Metric Units per pixel at 96 DPI
const EMU_PER_PIXEL: u64 = 9525;

/// Logical size of embedded images, in pixels
pub const IMAGE_WIDTH_PX: u64 = 400;
pub const IMAGE_HEIGHT_PX: u64 = 300;

const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_WP: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_PIC: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Default Extension="png" ContentType="image/png"/>
<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
</Types>"#;

const PACKAGE_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
</Relationships>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:eastAsia="Microsoft YaHei"/><w:sz w:val="22"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="120"/></w:pPr></w:pPrDefault></w:docDefaults>
<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
<w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:pPr><w:spacing w:after="240"/></w:pPr><w:rPr><w:b/><w:sz w:val="40"/></w:rPr></w:style>
<w:style w:type="paragraph" w:styleId="Heading3"><w:name w:val="heading 3"/><w:basedOn w:val="Normal"/><w:pPr><w:keepNext/><w:spacing w:before="120" w:after="60"/></w:pPr><w:rPr><w:b/><w:sz w:val="24"/></w:rPr></w:style>
</w:styles>"#;

/// Word exporter
pub struct DocxExporter<'a> {
    /// Shared rendering settings
    context: RenderContext,
    /// Source of attachment bytes
    fetcher: &'a dyn ImageFetcher,
}

impl<'a> DocxExporter<'a> {
    /// Create a new Word exporter
    pub fn new(context: RenderContext, fetcher: &'a dyn ImageFetcher) -> Self {
        Self { context, fetcher }
    }
}

impl Exporter for DocxExporter<'_> {
    fn format(&self) -> ExportFormat {
        ExportFormat::Word
    }

    fn export(&self, export: &SessionExport) -> Result<Payload> {
        let mut builder = DocumentBuilder::new(self.fetcher);
        let session = &export.session;

        builder.title(session.display_title());
        builder.labeled("Subject", session.display_subject());
        builder.labeled("Created", &self.context.format_time(session.created_at));
        builder.labeled("Messages", &export.message_count().to_string());
        builder.divider();

        let last = export.messages.len().saturating_sub(1);
        for (index, message) in export.messages.iter().enumerate() {
            self.render_message(&mut builder, message);
            if index < last {
                builder.divider();
            }
        }

        let bytes = builder.finish(session.display_title(), &self.context)?;
        Ok(Payload::Bytes(bytes))
    }
}

impl DocxExporter<'_> {
    fn render_message(&self, builder: &mut DocumentBuilder<'_>, message: &NormalizedMessage) {
        builder.bold_line(&format!(
            "{} — {}",
            message.role.label(),
            self.context.format_time(message.timestamp)
        ));

        if let Some(ref url) = message.image_url {
            builder.image_or_fallback(url);
        }

        match &message.content {
            Content::Structured(structured) => {
                for (section, text) in structured.sections() {
                    builder.heading(section.label());
                    builder.body(text);
                }
            }
            Content::PlainText(text) => builder.body(text),
        }
    }
}

/// Incremental `word/document.xml` body plus embedded media
pub struct DocumentBuilder<'a> {
    fetcher: &'a dyn ImageFetcher,
    body: String,
    media: Vec<Vec<u8>>,
}

impl<'a> DocumentBuilder<'a> {
    /// Create an empty document
    pub fn new(fetcher: &'a dyn ImageFetcher) -> Self {
        Self {
            fetcher,
            body: String::new(),
            media: Vec::new(),
        }
    }

    /// Centered title paragraph
    pub fn title(&mut self, text: &str) {
        self.body.push_str(&format!(
            r#"<w:p><w:pPr><w:pStyle w:val="Title"/><w:jc w:val="center"/></w:pPr>{}</w:p>"#,
            run(text, RunStyle::Plain)
        ));
    }

    /// Paragraph with a bold label and a plain value
    pub fn labeled(&mut self, label: &str, value: &str) {
        self.body.push_str(&format!(
            "<w:p>{}{}</w:p>",
            run(&format!("{}: ", label), RunStyle::Bold),
            run(value, RunStyle::Plain)
        ));
    }

    /// Horizontal divider
    pub fn divider(&mut self) {
        self.body.push_str(
            r#"<w:p><w:pPr><w:pBdr><w:bottom w:val="single" w:sz="6" w:space="1" w:color="auto"/></w:pBdr></w:pPr></w:p>"#,
        );
    }

    /// Bold single-line paragraph
    pub fn bold_line(&mut self, text: &str) {
        self.body
            .push_str(&format!("<w:p>{}</w:p>", run(text, RunStyle::Bold)));
    }

    /// Section heading
    pub fn heading(&mut self, text: &str) {
        self.body.push_str(&format!(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading3"/></w:pPr>{}</w:p>"#,
            run(text, RunStyle::Bold)
        ));
    }

    /// Body text, one paragraph per line
    pub fn body(&mut self, text: &str) {
        for line in text.lines() {
            self.body
                .push_str(&format!("<w:p>{}</w:p>", run(line, RunStyle::Plain)));
        }
    }

    /// Embed the image behind `url`, or write the fallback line
    pub fn image_or_fallback(&mut self, url: &str) {
        match self.load_png(url) {
            Some(png) => {
                self.media.push(png);
                let index = self.media.len();
                self.body.push_str(&drawing_paragraph(index));
                debug!("Embedded image {} from {}", index, url);
            }
            None => self.fallback(url),
        }
    }

    fn fallback(&mut self, url: &str) {
        self.body.push_str(&format!(
            "<w:p>{}</w:p>",
            run(&format!("[image] {}", url), RunStyle::Italic)
        ));
    }

    /// Fetch, decode and re-encode as PNG; `None` on any failure
    fn load_png(&self, url: &str) -> Option<Vec<u8>> {
        let bytes = self.fetcher.fetch(url)?;

        let decoded = match image::load_from_memory(&bytes) {
            Ok(img) => img,
            Err(e) => {
                warn!("Could not decode image from {}: {}", url, e);
                return None;
            }
        };

        let mut png = Vec::new();
        if let Err(e) = decoded.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png) {
            warn!("Could not re-encode image from {}: {}", url, e);
            return None;
        }
        Some(png)
    }

    /// Assemble the package
    pub fn finish(self, title: &str, context: &RenderContext) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(CONTENT_TYPES_XML.as_bytes())?;

        zip.start_file("_rels/.rels", options)?;
        zip.write_all(PACKAGE_RELS_XML.as_bytes())?;

        zip.start_file("docProps/core.xml", options)?;
        zip.write_all(core_properties_xml(title, context).as_bytes())?;

        zip.start_file("word/styles.xml", options)?;
        zip.write_all(STYLES_XML.as_bytes())?;

        zip.start_file("word/_rels/document.xml.rels", options)?;
        zip.write_all(document_rels_xml(self.media.len()).as_bytes())?;

        zip.start_file("word/document.xml", options)?;
        zip.write_all(self.document_xml().as_bytes())?;

        for (i, png) in self.media.iter().enumerate() {
            zip.start_file(format!("word/media/image{}.png", i + 1), options)?;
            zip.write_all(png)?;
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }

    fn document_xml(&self) -> String {
        format!(
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                "\n",
                r#"<w:document xmlns:w="{}" xmlns:r="{}" xmlns:wp="{}" xmlns:a="{}" xmlns:pic="{}">"#,
                "<w:body>{}",
                r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>"#,
                "</w:body></w:document>"
            ),
            NS_W, NS_R, NS_WP, NS_A, NS_PIC, self.body
        )
    }
}

#[derive(Clone, Copy)]
enum RunStyle {
    Plain,
    Bold,
    Italic,
}

fn run(text: &str, style: RunStyle) -> String {
    let props = match style {
        RunStyle::Plain => "",
        RunStyle::Bold => "<w:rPr><w:b/></w:rPr>",
        RunStyle::Italic => "<w:rPr><w:i/></w:rPr>",
    };
    format!(
        r#"<w:r>{}<w:t xml:space="preserve">{}</w:t></w:r>"#,
        props,
        escape_xml(text)
    )
}

fn drawing_paragraph(index: usize) -> String {
    let cx = IMAGE_WIDTH_PX * EMU_PER_PIXEL;
    let cy = IMAGE_HEIGHT_PX * EMU_PER_PIXEL;
    format!(
        concat!(
            "<w:p><w:r><w:drawing>",
            r#"<wp:inline distT="0" distB="0" distL="0" distR="0">"#,
            r#"<wp:extent cx="{cx}" cy="{cy}"/>"#,
            r#"<wp:docPr id="{i}" name="Picture {i}"/>"#,
            r#"<a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
            r#"<pic:pic><pic:nvPicPr><pic:cNvPr id="{i}" name="image{i}.png"/><pic:cNvPicPr/></pic:nvPicPr>"#,
            r#"<pic:blipFill><a:blip r:embed="rIdImage{i}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>"#,
            r#"<pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
            r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr>"#,
            "</pic:pic></a:graphicData></a:graphic></wp:inline>",
            "</w:drawing></w:r></w:p>"
        ),
        cx = cx,
        cy = cy,
        i = index
    )
}

fn document_rels_xml(image_count: usize) -> String {
    let mut rels = String::from(concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        "\n",
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#
    ));
    for i in 1..=image_count {
        rels.push_str(&format!(
            r#"<Relationship Id="rIdImage{i}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/image{i}.png"/>"#,
            i = i
        ));
    }
    rels.push_str("</Relationships>");
    rels
}

fn core_properties_xml(title: &str, context: &RenderContext) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            "\n",
            r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
            r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
            "<dc:title>{}</dc:title><dc:creator>{}</dc:creator>",
            r#"<dcterms:created xsi:type="dcterms:W3CDTF">{}</dcterms:created>"#,
            "</cp:coreProperties>"
        ),
        escape_xml(title),
        escape_xml(&context.product_name),
        context.exported_at.format("%Y-%m-%dT%H:%M:%SZ")
    )
}

/// Escape text for XML, dropping characters XML 1.0 cannot carry
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(c),
            c if (c as u32) < 0x20 => {}
            c => out.push(c),
        }
    }
    out
}
