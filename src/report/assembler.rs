//! Report assembly state machine
//!
//! One [`ReportAssembler`] call walks a request through every [`Stage`] in
//! order on a canvas owned by that call alone. Each step hands the cursor it
//! finished at to the next one. Lower-layer failures are tagged with the stage
//! they happened in; the canvas and every staged temporary file are dropped on
//! both the success and the failure path.

use crate::analytics::AnalyticsEngine;
use crate::charts::{ChartError, ChartImage, ChartKind, ChartRenderer};
use crate::domain::request::{RenderedReport, ReportRequest, SignatureImage};
use crate::error::{ReportError, Result};
use crate::layout::canvas::{Canvas, LayoutError};
use crate::layout::fonts::FontFace;
use crate::layout::geometry::{LayoutCursor, Rect};
use crate::layout::text_flow::TextFlow;
use crate::pdf::{write_pdf, DocumentInfo, PdfError};
use crate::report::constants::{figures, paragraph};
use crate::report::grid::MetricsGrid;
use crate::report::header::HeaderFields;
use crate::report::messages::MessageCatalog;
use crate::report::narrative;
use crate::report::options::ReportOptions;
use crate::report::stage::Stage;
use crate::report::template::ReportTemplate;
use chrono::{DateTime, Utc};
use std::io::Write;
use tracing::{debug, info};

/// Stage-tagging for the error types of the drawing layers
trait AtStage<T> {
    fn at_stage(self, stage: Stage) -> Result<T>;
}

impl<T> AtStage<T> for std::result::Result<T, LayoutError> {
    fn at_stage(self, stage: Stage) -> Result<T> {
        self.map_err(|e| match e {
            // Missing font metrics are a deployment defect, not a drawing one
            LayoutError::Metrics(inner) => inner,
            other => ReportError::generation(stage, other),
        })
    }
}

impl<T> AtStage<T> for std::result::Result<T, ChartError> {
    fn at_stage(self, stage: Stage) -> Result<T> {
        self.map_err(|e| ReportError::generation(stage, e))
    }
}

impl<T> AtStage<T> for std::result::Result<T, PdfError> {
    fn at_stage(self, stage: Stage) -> Result<T> {
        self.map_err(|e| ReportError::generation(stage, e))
    }
}

impl<T> AtStage<T> for std::io::Result<T> {
    fn at_stage(self, stage: Stage) -> Result<T> {
        self.map_err(|e| ReportError::generation(stage, e))
    }
}

/// A fully drawn report that has not been serialized yet
#[derive(Debug)]
pub struct AssembledReport {
    pub file_name: String,
    pub canvas: Canvas,
}

#[derive(Debug, Clone)]
pub struct ReportAssembler {
    template: ReportTemplate,
    messages: MessageCatalog,
    options: ReportOptions,
    engine: AnalyticsEngine,
    charts: ChartRenderer,
    grid: MetricsGrid,
    text_flow: TextFlow,
}

impl ReportAssembler {
    /// Assembler over the embedded template and the pt-BR catalog
    pub fn new(options: ReportOptions) -> Result<Self> {
        Ok(Self::with_assets(
            ReportTemplate::embedded()?,
            MessageCatalog::pt_br()?,
            options,
        ))
    }

    pub fn with_assets(
        template: ReportTemplate,
        messages: MessageCatalog,
        options: ReportOptions,
    ) -> Self {
        let engine = AnalyticsEngine::new(
            options.time_zone,
            options.sampling_interval,
            options.streak_limit,
        );
        Self {
            template,
            messages,
            options,
            engine,
            charts: ChartRenderer::default(),
            grid: MetricsGrid,
            text_flow: TextFlow::new(paragraph::LINE_SPACING, paragraph::BOTTOM_MARGIN),
        }
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    pub fn messages(&self) -> &MessageCatalog {
        &self.messages
    }

    /// `<Measurement> <dd.MM> a <dd.MM> <sector> <equipment type>`
    pub fn file_name(&self, request: &ReportRequest) -> String {
        self.messages.file_name(
            request.reading_type,
            &request.period,
            request.device.sector.as_ref(),
            request.device.equipment_type.as_ref(),
        )
    }

    /// Run every drawing stage and return the finished canvas
    pub fn assemble(&self, request: &ReportRequest) -> Result<AssembledReport> {
        let readings = request.readings.as_slice();
        let reading_type = request.reading_type;

        debug!(stage = %Stage::LoadTemplate, template = %self.template.name, "Entering stage");
        let mut canvas = self.template.new_canvas().at_stage(Stage::LoadTemplate)?;
        let page = canvas.ensure_page();
        let cursor = LayoutCursor::new(page, 0.0, canvas.format().height);

        debug!(stage = %Stage::DrawGrid, days = request.period.number_of_days(), "Entering stage");
        let cursor = self
            .grid
            .draw(&mut canvas, cursor, request.period.number_of_days())
            .at_stage(Stage::DrawGrid)?;

        debug!(stage = %Stage::FillHeader, "Entering stage");
        let header = HeaderFields::new(
            &self.messages,
            request.branch,
            &request.period,
            &request.device,
            reading_type,
        );
        let cursor = header.draw(&mut canvas, cursor).at_stage(Stage::FillHeader)?;

        debug!(stage = %Stage::FillGrid, readings = readings.len(), "Entering stage");
        let analytics = self
            .engine
            .analyze(readings, request.device.working_range(reading_type));
        let cursor = self
            .grid
            .fill(
                &mut canvas,
                cursor,
                self.messages.grid_title(reading_type),
                &request.period,
                &analytics,
            )
            .at_stage(Stage::FillGrid)?;

        debug!(stage = %Stage::RenderCharts, "Entering stage");
        let (frequency, trend) = self
            .charts
            .render_both(reading_type, readings)
            .at_stage(Stage::RenderCharts)?;

        debug!(stage = %Stage::InsertChartsAndSignature, "Entering stage");
        let cursor = self
            .insert_charts_and_signature(&mut canvas, cursor, [frequency, trend], &request.signature)?;

        debug!(stage = %Stage::InsertParagraph, "Entering stage");
        let text = narrative::compose(
            &self.messages,
            &self.options,
            &request.device,
            reading_type,
            &request.period,
            &analytics,
        );
        let cursor = self
            .text_flow
            .insert_paragraph(
                &mut canvas,
                cursor,
                paragraph::MAX_WIDTH,
                FontFace::Regular,
                paragraph::FONT_SIZE,
                &text,
            )
            .at_stage(Stage::InsertParagraph)?;

        debug!(
            pages = canvas.page_count(),
            final_page = cursor.page,
            "Report drawn"
        );

        Ok(AssembledReport {
            file_name: self.file_name(request),
            canvas,
        })
    }

    /// Place both charts side by side below the grid, then the signature
    ///
    /// Chart files are consumed here and removed once their pixels are on the
    /// canvas. Returns the cursor at the first paragraph baseline.
    fn insert_charts_and_signature(
        &self,
        canvas: &mut Canvas,
        cursor: LayoutCursor,
        charts: [ChartImage; 2],
        signature: &SignatureImage,
    ) -> Result<LayoutCursor> {
        let stage = Stage::InsertChartsAndSignature;
        let chart_y = cursor.y - figures::CHART_OFFSET;

        for chart in charts {
            let x = match chart.kind() {
                ChartKind::Frequency => figures::FREQUENCY_X,
                ChartKind::Trend => figures::TREND_X,
            };
            let rect = Rect::new(x, chart_y, figures::CHART_WIDTH, figures::CHART_HEIGHT);
            let bytes = chart.read_bytes().at_stage(stage)?;
            canvas.draw_image(cursor.page, rect, &bytes).at_stage(stage)?;
            canvas
                .draw_text(
                    cursor.page,
                    x,
                    rect.top() + figures::CAPTION_GAP,
                    self.messages.chart_caption(chart.kind()),
                    FontFace::Regular,
                    figures::CAPTION_FONT_SIZE,
                )
                .at_stage(stage)?;
        }

        let staged = stage_signature(signature).at_stage(stage)?;
        let bytes = std::fs::read(staged.path()).at_stage(stage)?;
        let first_page = canvas.ensure_page();
        canvas
            .draw_image(
                first_page,
                Rect::new(
                    figures::SIGNATURE_X,
                    figures::SIGNATURE_Y,
                    figures::SIGNATURE_WIDTH,
                    figures::SIGNATURE_HEIGHT,
                ),
                &bytes,
            )
            .at_stage(stage)?;

        Ok(cursor.at(paragraph::X, chart_y - paragraph::OFFSET))
    }

    /// Assemble and serialize one report
    ///
    /// `generated_at` becomes the document's creation date; it is the only
    /// input that differs between two otherwise identical runs.
    pub fn generate(
        &self,
        request: &ReportRequest,
        generated_at: DateTime<Utc>,
    ) -> Result<RenderedReport> {
        let AssembledReport { file_name, canvas } = self.assemble(request)?;

        debug!(stage = %Stage::Serialize, "Entering stage");
        let info = DocumentInfo::new(file_name.as_str(), generated_at);
        let pdf = write_pdf(&canvas, &info).at_stage(Stage::Serialize)?;
        let pages = canvas.page_count();
        drop(canvas);

        info!(
            file_name = %file_name,
            pages,
            bytes = pdf.len(),
            "Report generated"
        );
        Ok(RenderedReport::from_pdf(file_name, &pdf))
    }
}

/// Write the signature raster to a request-scoped temporary file
fn stage_signature(signature: &SignatureImage) -> std::io::Result<tempfile::NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("temp-signature")
        .suffix(&format!(".{}", signature.format()))
        .tempfile()?;
    file.write_all(signature.bytes())?;
    file.flush()?;
    Ok(file)
}
