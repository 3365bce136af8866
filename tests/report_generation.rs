//! End-to-end report generation scenarios

mod common;

use chrono::{TimeZone, Utc};
use common::*;
use compliance_report::config::Settings;
use compliance_report::domain::PeriodViolation;
use compliance_report::layout::DrawOp;
use compliance_report::report::constants::{grid, paragraph};
use compliance_report::report::{narrative, MessageCatalog, ReportTemplate};
use compliance_report::{
    Branch, DeviceFunction, ReadingType, ReportAssembler, ReportError, ReportOptions,
    ReportService, Stage,
};
use rstest::rstest;

fn assembler() -> ReportAssembler {
    ReportAssembler::new(ReportOptions::default()).unwrap()
}

fn service() -> ReportService {
    ReportService::new(&Settings::default()).unwrap()
}

/// Paragraph lines across all pages, in drawing order
fn paragraph_lines(canvas: &compliance_report::layout::Canvas) -> Vec<(usize, f32, String)> {
    canvas
        .pages()
        .iter()
        .enumerate()
        .flat_map(|(page, content)| {
            content.ops().iter().filter_map(move |op| match op {
                DrawOp::Text { x, y, text, .. } if *x == paragraph::X => {
                    Some((page, *y, text.clone()))
                }
                _ => None,
            })
        })
        .collect()
}

fn paragraph_text(canvas: &compliance_report::layout::Canvas) -> String {
    paragraph_lines(canvas)
        .into_iter()
        .map(|(_, _, line)| line)
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn test_full_compliant_day_is_in_range_for_one_day() {
    let request = request(
        date(2024, 6, 3),
        date(2024, 6, 3),
        ReadingType::Temperature,
        compliant_readings(READINGS_PER_DAY),
    );
    let report = assembler().assemble(&request).unwrap();
    let text = paragraph_text(&report.canvas);

    assert!(text.contains("durante 1 dia, 0 horas, 0 minutos."));
    assert!(!text.contains("Importante"));
}

#[test]
fn test_long_excursion_warns_exactly_once() {
    let values = std::iter::repeat(20.0)
        .take(30)
        .chain(std::iter::repeat(15.0).take(20))
        .chain(std::iter::repeat(20.0).take(30));
    let request = request(
        date(2024, 6, 3),
        date(2024, 6, 3),
        ReadingType::Temperature,
        readings(values),
    );
    let report = assembler().assemble(&request).unwrap();
    let text = paragraph_text(&report.canvas);

    assert_eq!(text.matches("Importante").count(), 1);
    assert!(text.contains("verificar a vedação"));
}

#[test]
fn test_single_day_request_has_one_row_and_repeated_date_in_file_name() {
    let request = request(
        date(2024, 6, 3),
        date(2024, 6, 3),
        ReadingType::Temperature,
        compliant_readings(10),
    );
    let report = assembler().assemble(&request).unwrap();

    let day_labels: Vec<&str> = report.canvas.pages()[0]
        .ops()
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text { x, y, text, .. } if *x == grid::DAY_X && *y < grid::INITIAL_Y + 5.0 => {
                Some(text.as_str())
            }
            _ => None,
        })
        .collect();
    assert_eq!(day_labels, vec!["3"]);

    assert_eq!(report.file_name.matches("03.06").count(), 2);
    assert_eq!(
        report.file_name,
        "Relatório de Temperatura 03.06 a 03.06 Farmácia Geladeira"
    );
}

#[rstest]
#[case(14, true)]
#[case(15, false)]
fn test_period_length_boundary(#[case] span: i64, #[case] accepted: bool) {
    let start = date(2024, 2, 1);
    let end = start + chrono::Duration::days(span);
    let result = service().prepare_request(
        Branch::SaoPaulo,
        start,
        end,
        device(DeviceFunction::Environment),
        ReadingType::Humidity,
        compliant_readings(10),
        &signature_data_url(),
    );

    assert_eq!(result.is_ok(), accepted);
    if let Err(err) = result {
        assert!(matches!(
            err,
            ReportError::InvalidPeriod {
                violation: PeriodViolation::ExceedsMaximum { .. },
                ..
            }
        ));
    }
}

#[test]
fn test_end_before_start_is_invalid_period() {
    let err = service()
        .generate_report(
            Branch::SaoPaulo,
            date(2024, 2, 10),
            date(2024, 2, 9),
            device(DeviceFunction::Equipment),
            ReadingType::Temperature,
            compliant_readings(10),
            &signature_data_url(),
        )
        .unwrap_err();

    assert!(matches!(
        err,
        ReportError::InvalidPeriod {
            violation: PeriodViolation::EndBeforeStart,
            ..
        }
    ));
}

#[test]
fn test_identical_inputs_give_identical_documents() {
    let service = service();
    let request = request(
        date(2024, 6, 3),
        date(2024, 6, 5),
        ReadingType::Humidity,
        readings((0..READINGS_PER_DAY * 3).map(|i| 45.0 + (i % 37) as f64 * 0.5)),
    );
    let generated_at = Utc.with_ymd_and_hms(2024, 6, 6, 4, 0, 0).unwrap();

    let first = service.generate_at(&request, generated_at).unwrap();
    let second = service.generate_at(&request, generated_at).unwrap();
    assert_eq!(first, second);

    let pdf = first.decode_document().unwrap();
    assert_eq!(page_count(&pdf), 1);
}

#[test]
fn test_rendered_report_serializes_with_camel_case_fields() {
    let report = service()
        .generate_report(
            Branch::SaoPaulo,
            date(2024, 6, 3),
            date(2024, 6, 3),
            device(DeviceFunction::Equipment),
            ReadingType::Temperature,
            compliant_readings(30),
            &signature_data_url(),
        )
        .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(
        json["fileName"],
        "Relatório de Temperatura 03.06 a 03.06 Farmácia Geladeira"
    );
    assert!(json["documentBase64"]
        .as_str()
        .unwrap()
        .starts_with("data:application/pdf;base64,"));
}

#[test]
fn test_long_paragraph_flows_onto_new_pages() {
    let mut messages = MessageCatalog::pt_br().unwrap();
    let filler = " Os registros foram conferidos diariamente pela equipe responsável.";
    messages.narrative = format!("{}{}", messages.narrative, filler.repeat(200));

    let options = ReportOptions::default();
    let assembler =
        ReportAssembler::with_assets(ReportTemplate::embedded().unwrap(), messages, options);
    let request = request(
        date(2024, 6, 3),
        date(2024, 6, 4),
        ReadingType::Temperature,
        compliant_readings(READINGS_PER_DAY * 2),
    );

    let report = assembler.assemble(&request).unwrap();
    let lines = paragraph_lines(&report.canvas);
    let pitch = paragraph::LINE_SPACING * paragraph::FONT_SIZE;

    // Every line sits above the margin and nothing is lost or duplicated
    assert!(lines.iter().all(|(_, y, _)| *y > paragraph::BOTTOM_MARGIN));
    let expected_text = narrative::compose(
        assembler.messages(),
        assembler.options(),
        &request.device,
        request.reading_type,
        &request.period,
        &compliance_report::analytics::AnalyticsEngine::default().analyze(
            request.readings.as_slice(),
            request.device.working_range(request.reading_type),
        ),
    );
    assert_eq!(
        paragraph_text(&report.canvas),
        expected_text.split_whitespace().collect::<Vec<_>>().join(" ")
    );

    let first_y = lines[0].1;
    let first_page_lines = ((first_y - paragraph::BOTTOM_MARGIN) / pitch).ceil() as usize;
    let continuation_top = report.canvas.format().height - paragraph::BOTTOM_MARGIN;
    let per_page = ((continuation_top - paragraph::BOTTOM_MARGIN) / pitch).ceil() as usize;
    let remaining = lines.len().saturating_sub(first_page_lines);
    let expected_pages = 1 + remaining.div_ceil(per_page);

    assert!(expected_pages > 1);
    assert_eq!(report.canvas.page_count(), expected_pages);
    assert!(lines
        .iter()
        .filter(|(page, _, _)| *page > 0)
        .all(|(_, y, _)| *y <= continuation_top));

    let generated_at = Utc.with_ymd_and_hms(2024, 6, 5, 4, 0, 0).unwrap();
    let pdf = assembler
        .generate(&request, generated_at)
        .unwrap()
        .decode_document()
        .unwrap();
    assert_eq!(page_count(&pdf), expected_pages);
}

#[test]
fn test_malformed_signature_fails_generation_with_stage() {
    let mut request = request(
        date(2024, 6, 3),
        date(2024, 6, 3),
        ReadingType::Temperature,
        compliant_readings(20),
    );
    request.signature = compliance_report::SignatureImage::from_data_url(
        "data:image/png;base64,AAAA",
    )
    .unwrap();

    let err = assembler()
        .generate(&request, Utc::now())
        .unwrap_err();
    assert!(matches!(
        err,
        ReportError::ReportGeneration {
            stage: Stage::InsertChartsAndSignature,
            ..
        }
    ));
    assert!(!err.is_caller_error());
}

#[tokio::test]
async fn test_batch_skips_empty_requests_and_keeps_order() {
    let requests = vec![
        request(
            date(2024, 6, 3),
            date(2024, 6, 3),
            ReadingType::Temperature,
            compliant_readings(READINGS_PER_DAY),
        ),
        request(
            date(2024, 6, 3),
            date(2024, 6, 3),
            ReadingType::Temperature,
            Vec::new(),
        ),
        request(
            date(2024, 6, 3),
            date(2024, 6, 4),
            ReadingType::Humidity,
            readings((0..200).map(|i| 50.0 + (i % 7) as f64)),
        ),
    ];

    let bundle = service().generate_all(requests).await.unwrap();

    let names: Vec<&str> = bundle.reports.iter().map(|r| r.file_name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Relatório de Temperatura 03.06 a 03.06 Farmácia Geladeira",
            "Relatório de Umidade 03.06 a 04.06 Farmácia Geladeira",
        ]
    );
    for report in &bundle.reports {
        assert_eq!(page_count(&report.decode_document().unwrap()), 1);
    }
}

#[tokio::test]
async fn test_batch_fails_on_first_broken_request() {
    let mut broken = request(
        date(2024, 6, 3),
        date(2024, 6, 3),
        ReadingType::Humidity,
        compliant_readings(50),
    );
    broken.signature =
        compliance_report::SignatureImage::from_data_url("data:image/png;base64,AAAA").unwrap();

    let requests = vec![
        request(
            date(2024, 6, 3),
            date(2024, 6, 3),
            ReadingType::Temperature,
            compliant_readings(50),
        ),
        broken,
    ];

    let err = service().generate_all(requests).await.unwrap_err();
    assert!(matches!(err, ReportError::ReportGeneration { .. }));
}
