//! Fixed coordinates of the printed form
//!
//! All values are PDF points on an A4 page with a bottom-left origin.

/// Header block above the grid
pub mod header {
    pub const FONT_SIZE: f32 = 11.0;

    pub const TITLE_X: f32 = 75.0;
    pub const TITLE_Y: f32 = 700.0;

    /// Period, branch and sector share one column
    pub const DETAILS_X: f32 = 410.0;
    pub const PERIOD_Y: f32 = 770.0;
    pub const BRANCH_Y: f32 = 752.0;
    pub const SECTOR_Y: f32 = 734.0;

    pub const DEVICE_Y: f32 = 665.0;
    pub const FUNCTION_X: f32 = 95.0;
    pub const EQUIPMENT_TYPE_X: f32 = 245.0;
    pub const PATRIMONY_X: f32 = 460.0;
}

/// Daily metrics grid
pub mod grid {
    /// Bottom edge of the first data row
    pub const INITIAL_Y: f32 = 575.8;
    pub const ROW_HEIGHT: f32 = 17.6;
    pub const LINE_WIDTH: f32 = 0.7;

    /// `(x, width)` of each of the ten columns, left to right
    pub const CELLS: [(f32, f32); 10] = [
        (47.1, 39.2),
        (86.1, 39.9),
        (126.0, 45.0),
        (171.0, 46.0),
        (217.1, 39.8),
        (256.9, 42.5),
        (299.6, 44.7),
        (344.5, 42.4),
        (387.1, 42.4),
        (429.7, 136.7),
    ];

    pub const FONT_SIZE: f32 = 10.0;

    pub const TITLE_X: f32 = 225.0;
    pub const TITLE_Y: f32 = 633.0;

    pub const DAY_X: f32 = 61.0;
    pub const PERIOD_X: [f32; 6] = [93.0, 136.0, 182.0, 225.0, 266.0, 309.0];
    pub const MAX_X: f32 = 353.0;
    pub const MIN_X: f32 = 396.0;
    pub const STD_DEV_X: f32 = 486.0;

    /// Text baseline above a row's bottom edge
    pub const BASELINE_OFFSET: f32 = 4.2;
}

/// Charts and signature below the grid
pub mod figures {
    /// Distance from the grid's bottom edge to the charts' bottom edge
    pub const CHART_OFFSET: f32 = 95.0;
    pub const CHART_WIDTH: f32 = 200.0;
    pub const CHART_HEIGHT: f32 = 100.0;
    pub const FREQUENCY_X: f32 = 70.0;
    pub const TREND_X: f32 = 325.0;

    pub const CAPTION_FONT_SIZE: f32 = 8.0;
    /// Caption baseline above the chart's top edge
    pub const CAPTION_GAP: f32 = 4.0;

    pub const SIGNATURE_X: f32 = 70.0;
    pub const SIGNATURE_Y: f32 = 80.0;
    pub const SIGNATURE_WIDTH: f32 = 200.0;
    pub const SIGNATURE_HEIGHT: f32 = 65.0;
}

/// Narrative paragraph below the charts
pub mod paragraph {
    pub const X: f32 = 25.0;
    /// Distance from the charts' bottom edge to the first baseline
    pub const OFFSET: f32 = 25.0;
    pub const MAX_WIDTH: f32 = 550.0;
    pub const FONT_SIZE: f32 = 10.0;
    pub const LINE_SPACING: f32 = 1.5;
    pub const BOTTOM_MARGIN: f32 = 50.0;
}
