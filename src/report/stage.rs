//! Assembly stages of a single report
//!
//! A report moves through these stages strictly in order. Each stage takes the
//! document built so far plus the cursor handed over by the previous stage.

use derive_more::Display;

/// One state of the report assembly state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub enum Stage {
    #[display("load template")]
    LoadTemplate,
    #[display("draw grid")]
    DrawGrid,
    #[display("fill header")]
    FillHeader,
    #[display("fill grid")]
    FillGrid,
    #[display("render charts")]
    RenderCharts,
    #[display("insert charts and signature")]
    InsertChartsAndSignature,
    #[display("insert paragraph")]
    InsertParagraph,
    #[display("serialize")]
    Serialize,
}

impl Stage {
    /// Stages in execution order
    pub const ORDER: [Stage; 8] = [
        Stage::LoadTemplate,
        Stage::DrawGrid,
        Stage::FillHeader,
        Stage::FillGrid,
        Stage::RenderCharts,
        Stage::InsertChartsAndSignature,
        Stage::InsertParagraph,
        Stage::Serialize,
    ];

    /// The stage that follows this one, `None` after serialization
    pub fn next(self) -> Option<Stage> {
        let position = Self::ORDER.iter().position(|stage| *stage == self)?;
        Self::ORDER.get(position + 1).copied()
    }
}
